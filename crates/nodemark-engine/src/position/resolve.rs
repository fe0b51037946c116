use std::ops::Range;

use crate::model::{Document, Element, Node, NodeType};

/// One level of a resolved position's ancestor path.
#[derive(Debug, Clone, Copy)]
struct Step<'a> {
    node: &'a Element,
    /// Index of the child the position points into (or before).
    index: usize,
    /// Absolute position of the node's content start.
    start: usize,
}

/// A position together with the chain of elements enclosing it.
///
/// Derived on demand from a document snapshot and never kept across edits.
#[derive(Debug, Clone)]
pub struct ResolvedPos<'a> {
    pub pos: usize,
    path: Vec<Step<'a>>,
    parent_offset: usize,
}

impl<'a> ResolvedPos<'a> {
    /// Depth of the innermost enclosing element (the root is depth 0).
    pub fn depth(&self) -> usize {
        self.path.len() - 1
    }

    pub fn node(&self, depth: usize) -> &'a Element {
        self.path[depth].node
    }

    pub fn parent(&self) -> &'a Element {
        self.node(self.depth())
    }

    pub fn index(&self, depth: usize) -> usize {
        self.path[depth].index
    }

    pub fn start(&self, depth: usize) -> usize {
        self.path[depth].start
    }

    /// Position directly before the node at `depth` (depth >= 1).
    pub fn before(&self, depth: usize) -> usize {
        self.start(depth).saturating_sub(1)
    }

    /// Position directly after the node at `depth` (depth >= 1).
    pub fn after(&self, depth: usize) -> usize {
        self.start(depth) + self.node(depth).content_size() + 1
    }

    /// Offset of the position within its parent's content.
    pub fn parent_offset(&self) -> usize {
        self.parent_offset
    }

    /// Enclosing node types, deepest first.
    pub fn ancestors(&self) -> impl Iterator<Item = &'a NodeType> + '_ {
        self.path.iter().rev().map(|step| &step.node.node_type)
    }
}

/// Clamps `pos` into the selectable range `[1, content_size]`.
pub fn clamp(doc: &Document, pos: usize) -> usize {
    pos.max(1).min(doc.content_size())
}

/// Resolves `pos` (bounded to the document) to its ancestor path.
pub fn resolve(doc: &Document, pos: usize) -> ResolvedPos<'_> {
    let pos = pos.min(doc.content_size());
    let mut path = Vec::new();
    let mut node = doc.root();
    let mut start = 0;
    let mut rel = pos;

    loop {
        let (index, offset) = find_index(node, rel);
        path.push(Step { node, index, start });
        let rem = rel - offset;
        if rem == 0 {
            break;
        }
        match node.children.get(index) {
            Some(Node::Element(child)) if !child.is_leaf() => {
                node = child;
                start += offset + 1;
                rel = rem - 1;
            }
            _ => break,
        }
    }

    ResolvedPos {
        pos,
        path,
        parent_offset: rel,
    }
}

/// Resolves after clamping into the selectable range.
pub fn resolve_clamped(doc: &Document, pos: usize) -> ResolvedPos<'_> {
    resolve(doc, clamp(doc, pos))
}

/// Whether any element enclosing the clamped `pos` has type `node_type`.
pub fn contains_type(doc: &Document, pos: usize, node_type: &NodeType) -> bool {
    let found = resolve_clamped(doc, pos)
        .ancestors()
        .any(|ancestor| ancestor == node_type);
    log::trace!("contains_type {node_type} at {pos}: {found}");
    found
}

/// Range `[before, after)` of the innermost `node_type` element around `pos`.
pub fn enclosing(doc: &Document, pos: usize, node_type: &NodeType) -> Option<Range<usize>> {
    let rp = resolve_clamped(doc, pos);
    (1..=rp.depth())
        .rev()
        .find(|&depth| &rp.node(depth).node_type == node_type)
        .map(|depth| rp.before(depth)..rp.after(depth))
}

/// Child index containing `rel` and that child's start offset; a position on a
/// child boundary maps to the following child.
fn find_index(node: &Element, rel: usize) -> (usize, usize) {
    let mut offset = 0;
    for (index, child) in node.children.iter().enumerate() {
        let end = offset + child.node_size();
        if rel < end {
            return (index, offset);
        }
        offset = end;
    }
    (node.children.len(), offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Schema, parse};

    fn doc(markup: &str) -> Document {
        parse(&Schema::basic().with_atom("chip"), markup)
            .expect("valid markup")
            .doc
    }

    fn chain(doc: &Document, pos: usize) -> Vec<String> {
        resolve(doc, pos)
            .ancestors()
            .map(|t| t.name().to_string())
            .collect()
    }

    #[test]
    fn resolves_ancestor_chain() {
        let d = doc("<p>A<chip>xy</chip>B</p>");
        assert_eq!(chain(&d, 0), ["doc"]);
        assert_eq!(chain(&d, 1), ["p", "doc"]);
        assert_eq!(chain(&d, 2), ["p", "doc"]);
        assert_eq!(chain(&d, 3), ["chip", "p", "doc"]);
        assert_eq!(chain(&d, 5), ["chip", "p", "doc"]);
        assert_eq!(chain(&d, 6), ["p", "doc"]);
        assert_eq!(chain(&d, 8), ["doc"]);
    }

    #[test]
    fn before_and_after_bracket_the_node() {
        let d = doc("<p>A<chip>xy</chip>B</p>");
        let rp = resolve(&d, 4);
        assert_eq!(rp.depth(), 2);
        assert_eq!(rp.before(2), 2);
        assert_eq!(rp.after(2), 6);
        assert_eq!(rp.parent_offset(), 1);
        assert_eq!(rp.index(1), 1);
    }

    #[test]
    fn positions_are_clamped() {
        let d = doc("<p>ab</p>");
        assert_eq!(clamp(&d, 0), 1);
        assert_eq!(clamp(&d, 99), 4);
        assert_eq!(resolve(&d, 99).pos, 4);
    }

    #[test]
    fn contains_type_checks_every_ancestor() {
        let d = doc("<p>A<chip>xy</chip>B</p>");
        let chip = NodeType::new("chip");
        let found: Vec<bool> = (0..=8).map(|p| contains_type(&d, p, &chip)).collect();
        assert_eq!(
            found,
            [false, false, false, true, true, true, false, false, false]
        );
        assert!(!contains_type(&d, 4, &NodeType::new("mention")));
    }

    #[test]
    fn enclosing_finds_unit_range() {
        let d = doc("<p>A<chip>xy</chip>B</p>");
        let chip = NodeType::new("chip");
        assert_eq!(enclosing(&d, 4, &chip), Some(2..6));
        assert_eq!(enclosing(&d, 6, &chip), None);
    }
}
