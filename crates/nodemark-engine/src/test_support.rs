use crate::model::{Document, NodeType, Schema, Selection, parse};

pub(crate) fn chip() -> NodeType {
    NodeType::new("chip")
}

/// Parses markup over the basic schema plus `chip`; the caret defaults to 1.
pub(crate) fn fixture(markup: &str) -> (Document, Selection) {
    let parsed = parse(&Schema::basic().with_atom("chip"), markup).expect("valid markup");
    (
        parsed.doc,
        parsed.selection.unwrap_or(Selection::caret(1)),
    )
}
