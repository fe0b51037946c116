//! A reference host for scripted sessions.
//!
//! [`native_transaction`] is what a plain editor would do with an event the
//! engine passed through. [`Host`] drives a [`Session`] the way a real editor
//! integration does: ask for a decision, and on PassThrough run the native
//! behaviour and report it back as a host transaction.

use serde::Serialize;

use crate::actions::Outcome;
use crate::editing::Transaction;
use crate::error::EngineError;
use crate::event::{InputEvent, Key, KeyEvent};
use crate::model::{Document, Selection};
use crate::position::{Direction, clamp, nearest_selectable};
use crate::session::Session;
use crate::view::{GridProjection, Point, Projection};

/// Default handling of `event`, or `None` when a plain editor does nothing.
pub fn native_transaction(
    doc: &Document,
    selection: Selection,
    event: &InputEvent,
    grid: &GridProjection,
) -> Option<Transaction> {
    match event {
        InputEvent::Key(key) => native_key(doc, selection, key, grid),
        InputEvent::Click { pos } => {
            Some(Transaction::new().set_selection(Selection::caret(clamp(doc, *pos))))
        }
        InputEvent::TextInput {
            text, composing, ..
        } => Some(insert(selection, text, *composing)),
        InputEvent::CompositionStart | InputEvent::CompositionEnd => None,
    }
}

fn native_key(
    doc: &Document,
    selection: Selection,
    event: &KeyEvent,
    grid: &GridProjection,
) -> Option<Transaction> {
    let modifiers = event.modifiers;
    let head = selection.head;
    let moved = |target: usize| {
        let selection = if modifiers.shift {
            selection.extend_to(target)
        } else {
            Selection::caret(target)
        };
        Some(Transaction::new().set_selection(selection))
    };

    match &event.key {
        Key::ArrowLeft | Key::ArrowRight if !selection.is_empty() && !modifiers.shift => {
            let edge = match event.key {
                Key::ArrowLeft => selection.from(),
                _ => selection.to(),
            };
            moved(edge)
        }
        Key::ArrowLeft => moved(nearest_selectable(doc, head, Direction::Backward)),
        Key::ArrowRight => moved(nearest_selectable(doc, head, Direction::Forward)),
        Key::ArrowUp | Key::ArrowDown => {
            let caret = grid.coords_at_pos(head)?;
            let y = match event.key {
                Key::ArrowUp => caret.top - 1.0,
                _ => caret.bottom + 1.0,
            };
            let hit = grid.pos_at_coords(Point { x: caret.left, y })?;
            moved(hit.pos)
        }
        Key::Home => moved(grid.row_start(head)?),
        Key::End => moved(grid.row_end(head)?),
        Key::Backspace if !selection.is_empty() => Some(
            Transaction::new()
                .delete_range(selection.from()..selection.to())
                .set_selection(Selection::caret(selection.from())),
        ),
        Key::Backspace => {
            let prev = head.checked_sub(1)?;
            doc.char_at(prev)?;
            Some(
                Transaction::new()
                    .delete_range(prev..head)
                    .set_selection(Selection::caret(prev)),
            )
        }
        // printable keys arrive again as text input
        Key::Char(_) | Key::Other(_) => None,
    }
}

/// The text a printable key press produces.
fn typed(event: &InputEvent) -> Option<String> {
    match event {
        InputEvent::Key(KeyEvent {
            key: Key::Char(ch),
            modifiers,
        }) if !(modifiers.alt || modifiers.ctrl || modifiers.meta) => Some(ch.to_string()),
        _ => None,
    }
}

/// Replaces the selection with `text`.
fn insert(selection: Selection, text: &str, composing: bool) -> Transaction {
    let from = selection.from();
    let end = from + text.chars().count();
    let after = if composing {
        Selection::new(from, end)
    } else {
        Selection::caret(end)
    };
    Transaction::new()
        .replace_range(from..selection.to(), text)
        .set_selection(after)
}

/// Result of one scripted event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub outcome: Outcome,
    /// Whether the native behaviour ran and changed something.
    pub native: bool,
}

/// Drives a session with the reference host behaviour on a monospace grid.
#[derive(Debug, Clone)]
pub struct Host {
    session: Session,
    columns: usize,
}

impl Host {
    pub fn new(session: Session, columns: usize) -> Self {
        Self { session, columns }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    pub fn grid(&self) -> GridProjection {
        GridProjection::new(self.session.doc(), self.columns)
    }

    pub fn step(&mut self, event: &InputEvent) -> Result<Step, EngineError> {
        let grid = self.grid();
        let dispatch = self.session.handle(event, Some(&grid))?;
        if dispatch.outcome == Outcome::Handled {
            return Ok(Step {
                outcome: dispatch.outcome,
                native: false,
            });
        }

        if let Some(text) = typed(event) {
            let selection = self.session.selection();
            return self.step(&InputEvent::TextInput {
                range: selection.from()..selection.to(),
                text,
                composing: false,
            });
        }

        // the decision may have edited the document
        let grid = self.grid();
        let native = native_transaction(self.session.doc(), self.session.selection(), event, &grid);
        if let Some(tr) = &native {
            self.session.apply(tr)?;
        }
        Ok(Step {
            outcome: dispatch.outcome,
            native: native.is_some(),
        })
    }

    /// Clicks wherever `pos` is drawn, resolving the point the way a host's
    /// hit test would.
    pub fn click_at_pos(&mut self, pos: usize) -> Result<Option<Step>, EngineError> {
        let grid = self.grid();
        let Some(rect) = grid.coords_at_pos(pos) else {
            return Ok(None);
        };
        let point = Point {
            x: rect.left,
            y: rect.top + 1.0,
        };
        let Some(hit) = grid.pos_at_coords(point) else {
            return Ok(None);
        };
        self.step(&InputEvent::Click { pos: hit.pos }).map(Some)
    }
}
