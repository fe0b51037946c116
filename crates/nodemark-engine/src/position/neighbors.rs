use serde::{Deserialize, Serialize};

use crate::model::{Document, Element, Node, NodeType};
use crate::position::resolve::{ResolvedPos, contains_type, resolve_clamped};

/// Direction of travel through the position space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Backward,
    Forward,
}

impl Direction {
    pub fn sign(self) -> isize {
        match self {
            Direction::Backward => -1,
            Direction::Forward => 1,
        }
    }

    /// Moves `pos` one raw position, saturating at 0.
    pub fn step(self, pos: usize) -> usize {
        match self {
            Direction::Backward => pos.saturating_sub(1),
            Direction::Forward => pos + 1,
        }
    }
}

/// First selectable position at or beyond `rp` in `dir`.
///
/// Positions whose parent has inline content are selectable as they are.
/// Otherwise the search descends into the nearest inline-content node (or
/// stops before a selectable leaf block), climbing ancestors as needed.
pub fn find_from(rp: &ResolvedPos<'_>, dir: Direction) -> Option<usize> {
    let parent = rp.parent();
    if parent.inline_content() {
        return Some(rp.pos);
    }
    if let Some(found) = find_in(parent, rp.pos, rp.index(rp.depth()), dir) {
        return Some(found);
    }
    (0..rp.depth()).rev().find_map(|depth| match dir {
        Direction::Backward => find_in(rp.node(depth), rp.before(depth + 1), rp.index(depth), dir),
        Direction::Forward => {
            find_in(rp.node(depth), rp.after(depth + 1), rp.index(depth) + 1, dir)
        }
    })
}

fn find_in(node: &Element, pos: usize, index: usize, dir: Direction) -> Option<usize> {
    if node.inline_content() {
        return Some(pos);
    }
    let mut pos = pos;
    let indices: Box<dyn Iterator<Item = usize>> = match dir {
        Direction::Forward => Box::new(index..node.children.len()),
        Direction::Backward => Box::new((0..index.min(node.children.len())).rev()),
    };
    for i in indices {
        let child = &node.children[i];
        let size = child.node_size();
        match child {
            Node::Element(el) if !el.is_leaf() => {
                let (inner_pos, inner_index) = match dir {
                    Direction::Forward => (pos + 1, 0),
                    Direction::Backward => (pos - 1, el.children.len()),
                };
                if let Some(found) = find_in(el, inner_pos, inner_index, dir) {
                    return Some(found);
                }
            }
            Node::Element(_) => {
                return Some(match dir {
                    Direction::Forward => pos,
                    Direction::Backward => pos - size,
                });
            }
            Node::Text(_) => {}
        }
        pos = match dir {
            Direction::Forward => pos + size,
            Direction::Backward => pos - size,
        };
    }
    None
}

/// The next independently selectable position from `from` in `dir`.
///
/// Falls back to `from` stepped by one (bounded to the document) when nothing
/// selectable lies in that direction.
pub fn nearest_selectable(doc: &Document, from: usize, dir: Direction) -> usize {
    let target = dir.step(from).min(doc.content_size());
    let rp = resolve_clamped(doc, target);
    let found = find_from(&rp, dir).unwrap_or(target);
    log::trace!("nearest_selectable from {from} {dir:?}: {found}");
    found
}

/// Furthest relative offset kept in the [`Neighbors`] cache.
pub const REACH: usize = 2;

/// Relative neighbors of an origin position, computed by stepping outward.
///
/// Offset `-2` is always derived from offset `-1` (never directly from the
/// origin), because each step depends on where the previous one landed.
/// Offsets within [`REACH`] are memoized.
#[derive(Debug)]
pub struct Neighbors<'a> {
    doc: &'a Document,
    origin: usize,
    cache: [Option<usize>; 2 * REACH + 1],
}

impl<'a> Neighbors<'a> {
    pub fn new(doc: &'a Document, origin: usize) -> Self {
        let mut cache = [None; 2 * REACH + 1];
        cache[REACH] = Some(origin);
        Self { doc, origin, cache }
    }

    pub fn origin(&self) -> usize {
        self.origin
    }

    /// Position reached after `offset` selectable steps from the origin.
    pub fn at(&mut self, offset: isize) -> usize {
        let dir = if offset < 0 {
            Direction::Backward
        } else {
            Direction::Forward
        };
        let mut step = 0isize;
        let mut pos = self.origin;
        while step != offset {
            step += dir.sign();
            pos = match self.cached(step) {
                Some(found) => found,
                None => {
                    let found = nearest_selectable(self.doc, pos, dir);
                    self.store(step, found);
                    found
                }
            };
        }
        pos
    }

    /// Whether the neighbor at `offset` lies inside a `node_type` element.
    pub fn contains(&mut self, offset: isize, node_type: &NodeType) -> bool {
        let pos = self.at(offset);
        contains_type(self.doc, pos, node_type)
    }

    fn slot(offset: isize) -> Option<usize> {
        let slot = offset + REACH as isize;
        (0..=(2 * REACH) as isize)
            .contains(&slot)
            .then_some(slot as usize)
    }

    fn cached(&self, offset: isize) -> Option<usize> {
        Self::slot(offset).and_then(|slot| self.cache[slot])
    }

    fn store(&mut self, offset: isize, pos: usize) {
        if let Some(slot) = Self::slot(offset) {
            self.cache[slot] = Some(pos);
        }
    }
}
