use thiserror::Error;

use crate::model::NodeType;

/// Errors produced by the reference document model.
///
/// Decision functions never fail; only building documents from markup and
/// applying edits to the model can.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Unknown node type `{name}`")]
    UnknownNodeType { name: String },

    #[error("Node type `{node_type}` cannot be used as an atomic unit: it must be inline with inline content")]
    InvalidAtomType { node_type: NodeType },

    #[error("Markup error at offset {offset}: {message}")]
    Markup { offset: usize, message: String },

    #[error("Cannot insert text at {pos}: parent `{parent}` does not accept inline content")]
    InvalidInsertPosition { pos: usize, parent: NodeType },

    #[error("Position {pos} is outside the document (content size {size})")]
    OutOfRange { pos: usize, size: usize },
}

impl EngineError {
    pub(crate) fn markup(offset: usize, message: impl Into<String>) -> Self {
        Self::Markup {
            offset,
            message: message.into(),
        }
    }
}
