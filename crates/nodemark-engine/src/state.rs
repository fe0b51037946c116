use serde::{Deserialize, Serialize};

/// A Home/End press waiting for the host's native caret move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "key", rename_all = "snake_case")]
pub enum Pending {
    Home { extend: bool },
    End { extend: bool },
}

impl Pending {
    pub fn extend(self) -> bool {
        match self {
            Pending::Home { extend } | Pending::End { extend } => extend,
        }
    }
}

/// Per-session interaction flags.
///
/// `typing` guards the interceptor against the host's follow-up edits for
/// one keystroke. `active` is derived after every applied transaction and
/// drives the fake caret. `same_pos` is one-shot: set when an arrow vacates a
/// unit and consumed by the next click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionState {
    pub active: bool,
    pub typing: bool,
    pub pending: Option<Pending>,
    pub same_pos: bool,
}

impl InteractionState {
    /// Shallow-merges `meta` into the state; a reset happens first.
    pub fn merge(&mut self, meta: &StateMeta) {
        if meta.reset {
            *self = Self::default();
        }
        if let Some(typing) = meta.typing {
            self.typing = typing;
        }
        if let Some(pending) = meta.pending {
            self.pending = pending;
        }
        if let Some(same_pos) = meta.same_pos {
            self.same_pos = same_pos;
        }
    }
}

/// Flags a transaction carries for the interaction state. Unset fields leave
/// the current value alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateMeta {
    reset: bool,
    typing: Option<bool>,
    pending: Option<Option<Pending>>,
    same_pos: Option<bool>,
}

impl StateMeta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to defaults before applying any other field.
    pub fn reset() -> Self {
        Self {
            reset: true,
            ..Self::default()
        }
    }

    pub fn typing(mut self, typing: bool) -> Self {
        self.typing = Some(typing);
        self
    }

    pub fn pending(mut self, pending: Option<Pending>) -> Self {
        self.pending = Some(pending);
        self
    }

    pub fn same_pos(mut self, same_pos: bool) -> Self {
        self.same_pos = Some(same_pos);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn merge_is_shallow() {
        let mut state = InteractionState {
            typing: true,
            same_pos: true,
            ..Default::default()
        };
        state.merge(&StateMeta::new().pending(Some(Pending::Home { extend: false })));
        assert_eq!(
            state,
            InteractionState {
                active: false,
                typing: true,
                pending: Some(Pending::Home { extend: false }),
                same_pos: true,
            }
        );

        state.merge(&StateMeta::new().typing(false).pending(None));
        assert!(!state.typing);
        assert_eq!(state.pending, None);
        assert!(state.same_pos);
    }

    #[test]
    fn reset_clears_before_merging() {
        let mut state = InteractionState {
            active: true,
            typing: true,
            pending: Some(Pending::End { extend: true }),
            same_pos: true,
        };
        state.merge(&StateMeta::reset().same_pos(true));
        assert_eq!(
            state,
            InteractionState {
                same_pos: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn pending_extend_flag() {
        assert!(Pending::End { extend: true }.extend());
        assert!(!Pending::Home { extend: false }.extend());
    }
}
