use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Modifier flags delivered with a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        alt: false,
        ctrl: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    pub fn any(self) -> bool {
        self.shift || self.alt || self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Backspace,
    Home,
    End,
    /// A printable character.
    Char(char),
    /// Any key the engine does not recognize, by name.
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }
}

/// The closed set of host events the engine reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    Key(KeyEvent),
    /// A pointer click resolved by the host to a document position.
    Click { pos: usize },
    /// Text about to replace `range`.
    TextInput {
        range: Range<usize>,
        text: String,
        #[serde(default)]
        composing: bool,
    },
    CompositionStart,
    CompositionEnd,
}

impl InputEvent {
    pub fn key(key: Key) -> Self {
        InputEvent::Key(KeyEvent::plain(key))
    }

    pub fn text(range: Range<usize>, text: impl Into<String>) -> Self {
        InputEvent::TextInput {
            range,
            text: text.into(),
            composing: false,
        }
    }
}
