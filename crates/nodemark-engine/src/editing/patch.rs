use std::ops::Range;

use serde::Serialize;

use crate::model::Selection;

/// Result of applying a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Patch {
    pub changed: Vec<Range<usize>>,
    pub new_selection: Selection,
    pub version: u64,
}
