use serde::{Deserialize, Serialize};

/// A selection as an (anchor, head) pair; a caret when both are equal.
///
/// The anchor is the fixed end, the head moves when the selection is extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub fn caret(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// Keeps the anchor and moves the head to `head`.
    pub fn extend_to(&self, head: usize) -> Self {
        Self::new(self.anchor, head)
    }

    pub(crate) fn map(&self, map: impl Fn(usize) -> usize) -> Self {
        Self::new(map(self.anchor), map(self.head))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_and_to_are_ordered() {
        let sel = Selection::new(7, 3);
        assert_eq!(sel.from(), 3);
        assert_eq!(sel.to(), 7);
        assert!(!sel.is_empty());
        assert!(Selection::caret(4).is_empty());
    }

    #[test]
    fn extend_keeps_anchor() {
        let sel = Selection::new(7, 5).extend_to(2);
        assert_eq!(sel, Selection::new(7, 2));
    }
}
