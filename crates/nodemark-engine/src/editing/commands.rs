use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::model::{Document, Selection};
use crate::state::StateMeta;

/// A single edit against the reference document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Cmd {
    InsertText { at: usize, text: String },
    DeleteRange { range: Range<usize> },
    ReplaceRange { range: Range<usize>, text: String },
    SetSelection { selection: Selection },
}

impl Cmd {
    /// True for commands that change document content.
    pub fn is_edit(&self) -> bool {
        !matches!(self, Cmd::SetSelection { .. })
    }

    /// Applies the command, mapping `selection` through it. Returns the new
    /// selection and the changed range in the new document, if any.
    fn apply(
        &self,
        doc: &mut Document,
        selection: Selection,
    ) -> Result<(Selection, Option<Range<usize>>), EngineError> {
        match self {
            Cmd::InsertText { at, text } => {
                let at = *at;
                let n = text.chars().count();
                doc.insert_text(at, text)?;
                let mapped = selection.map(|pos| if pos >= at { pos + n } else { pos });
                Ok((mapped, Some(at..at + n)))
            }
            Cmd::DeleteRange { range } => {
                let (mapped, start) = delete(doc, selection, range);
                Ok((mapped, Some(start..start)))
            }
            Cmd::ReplaceRange { range, text } => {
                let (mapped, start) = delete(doc, selection, range);
                let n = text.chars().count();
                doc.insert_text(start, text)?;
                let mapped = mapped.map(|pos| if pos > start { pos + n } else { pos });
                Ok((mapped, Some(start..start + n)))
            }
            Cmd::SetSelection { selection } => Ok((*selection, None)),
        }
    }
}

fn delete(doc: &mut Document, selection: Selection, range: &Range<usize>) -> (Selection, usize) {
    let end = range.end.min(doc.content_size());
    let start = range.start.min(end);
    let removed = doc.delete_range(start, end);
    let mapped = selection.map(|pos| {
        if pos <= start {
            pos
        } else if pos >= end {
            pos - removed
        } else {
            start
        }
    });
    (mapped, start)
}

/// An ordered batch of commands plus optional interaction-state metadata.
///
/// Transactions built by the engine carry metadata; host transactions don't.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    cmds: Vec<Cmd>,
    meta: Option<StateMeta>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_text(mut self, at: usize, text: impl Into<String>) -> Self {
        self.cmds.push(Cmd::InsertText {
            at,
            text: text.into(),
        });
        self
    }

    pub fn delete_range(mut self, range: Range<usize>) -> Self {
        self.cmds.push(Cmd::DeleteRange { range });
        self
    }

    pub fn replace_range(mut self, range: Range<usize>, text: impl Into<String>) -> Self {
        self.cmds.push(Cmd::ReplaceRange {
            range,
            text: text.into(),
        });
        self
    }

    pub fn set_selection(mut self, selection: Selection) -> Self {
        self.cmds.push(Cmd::SetSelection { selection });
        self
    }

    pub fn set_meta(mut self, meta: StateMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn cmds(&self) -> &[Cmd] {
        &self.cmds
    }

    pub fn meta(&self) -> Option<&StateMeta> {
        self.meta.as_ref()
    }

    /// No commands and no metadata.
    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty() && self.meta.is_none()
    }

    /// Whether any command changes document content.
    pub fn has_edits(&self) -> bool {
        self.cmds.iter().any(Cmd::is_edit)
    }

    /// Applies every command in order. On error `doc` may be partially
    /// edited; callers apply to a scratch copy.
    pub fn apply_to(
        &self,
        doc: &mut Document,
        selection: Selection,
    ) -> Result<(Selection, Vec<Range<usize>>), EngineError> {
        let mut selection = selection;
        let mut changed = Vec::new();
        for cmd in &self.cmds {
            let (next, range) = cmd.apply(doc, selection)?;
            selection = next;
            changed.extend(range);
        }
        Ok((selection, changed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Schema, parse, render};
    use pretty_assertions::assert_eq;

    fn apply(markup: &str, tr: Transaction) -> (String, Vec<Range<usize>>) {
        let parsed = parse(&Schema::basic().with_atom("chip"), markup).expect("valid markup");
        let mut doc = parsed.doc;
        let selection = parsed.selection.expect("markup has a caret");
        let (selection, changed) = tr.apply_to(&mut doc, selection).expect("edit applies");
        (render(&doc, Some(selection)), changed)
    }

    #[test]
    fn insert_shifts_caret_after_text() {
        let (out, changed) = apply("<p>a|b</p>", Transaction::new().insert_text(2, "xy"));
        assert_eq!(out, "<p>axy|b</p>");
        assert_eq!(changed, vec![2..4]);
    }

    #[test]
    fn delete_maps_positions_inside_to_start() {
        let (out, changed) = apply("<p>ab|cd</p>", Transaction::new().delete_range(2..4));
        assert_eq!(out, "<p>a|d</p>");
        assert_eq!(changed, vec![2..2]);
    }

    #[test]
    fn delete_shifts_later_positions_by_removed_size() {
        let (out, _) = apply("<p>A<chip>xy</chip>B|</p>", Transaction::new().delete_range(2..6));
        assert_eq!(out, "<p>AB|</p>");
    }

    #[test]
    fn replace_and_explicit_selection() {
        let tr = Transaction::new()
            .replace_range(1..3, "z")
            .set_selection(Selection::caret(1));
        let (out, changed) = apply("<p>ab|c</p>", tr);
        assert_eq!(out, "<p>|zc</p>");
        assert_eq!(changed, vec![1..2]);
    }

    #[test]
    fn insert_outside_inline_content_fails() {
        let parsed = parse(&Schema::basic(), "<p>a|</p><hr/>").expect("valid markup");
        let mut doc = parsed.doc;
        let err = Transaction::new()
            .insert_text(0, "x")
            .apply_to(&mut doc, Selection::caret(1))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInsertPosition { pos: 0, .. }));
    }

    #[test]
    fn meta_and_edit_flags() {
        let tr = Transaction::new().set_selection(Selection::caret(1));
        assert!(!tr.has_edits());
        assert!(!tr.is_empty());
        assert!(Transaction::new().is_empty());
        let tr = tr.set_meta(StateMeta::new().typing(false));
        assert_eq!(tr.meta(), Some(&StateMeta::new().typing(false)));
    }
}
