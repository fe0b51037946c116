//! Boundary decisions, one pure function per recognized input.
//!
//! A decision reads a [`Context`] snapshot and returns the [`Transaction`]
//! to apply plus whether the host's default behaviour must be suppressed.
//! Nothing here mutates the document or the interaction state.

pub mod arrows;
pub mod backspace;
pub mod click;
pub mod home_end;

pub use arrows::on_arrow;
pub use backspace::on_backspace;
pub use click::on_click;
pub use home_end::{HomeEnd, apply_pending, on_home_end_deferred, on_home_end_geometry};

use serde::{Deserialize, Serialize};

use crate::classify::{ActiveCheck, check_active};
use crate::editing::Transaction;
use crate::model::{Document, NodeType, Selection};
use crate::position::Neighbors;
use crate::state::{InteractionState, StateMeta};

/// Read-only inputs of a decision.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub doc: &'a Document,
    pub selection: Selection,
    pub state: &'a InteractionState,
    pub atom: &'a NodeType,
}

impl<'a> Context<'a> {
    pub fn new(
        doc: &'a Document,
        selection: Selection,
        state: &'a InteractionState,
        atom: &'a NodeType,
    ) -> Self {
        Self {
            doc,
            selection,
            state,
            atom,
        }
    }

    pub fn neighbors(&self, origin: usize) -> Neighbors<'a> {
        Neighbors::new(self.doc, origin)
    }

    pub fn check_active(&self, pos: Option<usize>) -> ActiveCheck {
        check_active(self.doc, self.selection, self.atom, pos)
    }
}

/// Whether the host's default handling must be suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Handled,
    PassThrough,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub outcome: Outcome,
    pub transaction: Transaction,
}

impl Decision {
    pub fn handled(transaction: Transaction) -> Self {
        Self {
            outcome: Outcome::Handled,
            transaction,
        }
    }

    pub fn pass(transaction: Transaction) -> Self {
        Self {
            outcome: Outcome::PassThrough,
            transaction,
        }
    }

    /// Declines and clears the typing guard.
    pub fn pass_typing_false() -> Self {
        Self::pass(Transaction::new().set_meta(StateMeta::new().typing(false)))
    }

    /// Declines and returns the interaction state to its defaults.
    pub fn pass_reset() -> Self {
        Self::pass(Transaction::new().set_meta(StateMeta::reset()))
    }

    pub fn is_handled(&self) -> bool {
        self.outcome == Outcome::Handled
    }
}

/// Caret move at `pos`, clearing the typing guard.
pub(crate) fn move_caret(pos: usize) -> Transaction {
    Transaction::new()
        .set_selection(Selection::caret(pos))
        .set_meta(StateMeta::new().typing(false))
}
