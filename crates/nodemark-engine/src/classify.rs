//! Classification of a position relative to atomic units.
//!
//! Every action consults [`classify`] (through [`Adjacency`]) on each event;
//! nothing here is cached between events.

use serde::{Deserialize, Serialize};

use crate::model::{Document, NodeType, Selection};
use crate::position::{Direction, Neighbors};

/// Where a position sits relative to the nearest atomic unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    None,
    /// Just before the unit's open token.
    OutsideBefore,
    /// Just after the open token, inside the unit.
    InsideStart,
    /// Just before the close token, inside the unit.
    InsideEnd,
    /// Just after the unit's close token.
    OutsideAfter,
    /// Between two abutting units; both outside-after and outside-before.
    BetweenUnits,
}

impl Boundary {
    pub const ALL: [Boundary; 6] = [
        Boundary::None,
        Boundary::OutsideBefore,
        Boundary::InsideStart,
        Boundary::InsideEnd,
        Boundary::OutsideAfter,
        Boundary::BetweenUnits,
    ];

    /// Numeric code: -2, -1, +1, +2 for the one-sided offsets, 10 for the
    /// abutting case and 0 otherwise.
    pub fn code(self) -> i8 {
        match self {
            Boundary::None => 0,
            Boundary::OutsideBefore => -2,
            Boundary::InsideStart => -1,
            Boundary::InsideEnd => 1,
            Boundary::OutsideAfter => 2,
            Boundary::BetweenUnits => 10,
        }
    }

    pub fn is_boundary(self) -> bool {
        self != Boundary::None
    }
}

/// Containment of the previous, current and next selectable positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Adjacency {
    pub before: bool,
    pub current: bool,
    pub after: bool,
}

impl Adjacency {
    pub fn at(doc: &Document, pos: usize, node_type: &NodeType) -> Self {
        let mut n = Neighbors::new(doc, pos);
        Self {
            before: n.contains(-1, node_type),
            current: n.contains(0, node_type),
            after: n.contains(1, node_type),
        }
    }

    pub fn boundary(self) -> Boundary {
        let Adjacency {
            before,
            current,
            after,
        } = self;
        match (before, current, after) {
            (true, false, true) => Boundary::BetweenUnits,
            (false, true, _) => Boundary::InsideStart,
            (_, true, false) => Boundary::InsideEnd,
            (_, false, true) => Boundary::OutsideBefore,
            (true, false, _) => Boundary::OutsideAfter,
            _ => Boundary::None,
        }
    }
}

/// Boundary code of `pos` for units of `node_type`.
///
/// An empty unit's only interior position reports [`Boundary::InsideStart`];
/// use [`classify_toward`] when the direction of travel matters.
pub fn classify(doc: &Document, pos: usize, node_type: &NodeType) -> Boundary {
    Adjacency::at(doc, pos, node_type).boundary()
}

/// Like [`classify`], but resolves ambiguous positions toward `dir`.
///
/// Between two units, moving forward means standing before the next unit and
/// moving backward means standing after the previous one. Inside an empty
/// unit, moving forward means being at its end and moving backward at its
/// start.
pub fn classify_toward(
    doc: &Document,
    pos: usize,
    node_type: &NodeType,
    dir: Direction,
) -> Boundary {
    let adjacency = Adjacency::at(doc, pos, node_type);
    match (adjacency.boundary(), dir) {
        (Boundary::BetweenUnits, Direction::Forward) => Boundary::OutsideBefore,
        (Boundary::BetweenUnits, Direction::Backward) => Boundary::OutsideAfter,
        (Boundary::InsideStart, Direction::Forward) if !adjacency.after => Boundary::InsideEnd,
        (boundary, _) => boundary,
    }
}

/// Result of [`check_active`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActiveCheck {
    pub is_active: bool,
    pub boundary: Boundary,
}

/// Whether the caret, or a hypothetical caret at `pos`, is parked at a unit
/// boundary. A non-empty selection is never active unless `pos` is given.
pub fn check_active(
    doc: &Document,
    selection: Selection,
    node_type: &NodeType,
    pos: Option<usize>,
) -> ActiveCheck {
    let at = match pos {
        Some(pos) => pos,
        None if selection.is_empty() => selection.head,
        None => {
            return ActiveCheck {
                is_active: false,
                boundary: Boundary::None,
            };
        }
    };
    let boundary = classify(doc, at, node_type);
    log::debug!("check_active at {at}: {boundary:?}");
    ActiveCheck {
        is_active: boundary.is_boundary(),
        boundary,
    }
}

/// The outside position rendered at the same spot as an inside boundary.
pub fn outside_twin(doc: &Document, pos: usize, boundary: Boundary) -> Option<usize> {
    let mut n = Neighbors::new(doc, pos);
    match boundary {
        Boundary::InsideStart => Some(n.at(-1)),
        Boundary::InsideEnd => Some(n.at(1)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Schema, parse};
    use rstest::rstest;

    fn doc(markup: &str) -> Document {
        parse(&Schema::basic().with_atom("chip"), markup)
            .expect("valid markup")
            .doc
    }

    fn chip() -> NodeType {
        NodeType::new("chip")
    }

    #[rstest]
    #[case(1, Boundary::None)]
    #[case(2, Boundary::OutsideBefore)]
    #[case(3, Boundary::InsideStart)]
    #[case(4, Boundary::None)]
    #[case(5, Boundary::InsideEnd)]
    #[case(6, Boundary::OutsideAfter)]
    #[case(7, Boundary::None)]
    fn classifies_single_unit(#[case] pos: usize, #[case] expected: Boundary) {
        let d = doc("<p>A<chip>xy</chip>B</p>");
        assert_eq!(classify(&d, pos, &chip()), expected);
    }

    #[rstest]
    #[case(1, Boundary::OutsideBefore)]
    #[case(4, Boundary::BetweenUnits)]
    #[case(7, Boundary::OutsideAfter)]
    fn classifies_adjacent_units(#[case] pos: usize, #[case] expected: Boundary) {
        let d = doc("<p><chip>a</chip><chip>b</chip></p>");
        assert_eq!(classify(&d, pos, &chip()), expected);
    }

    #[test]
    fn codes_match_boundary_offsets() {
        let codes: Vec<i8> = Boundary::ALL.iter().map(|b| b.code()).collect();
        assert_eq!(codes, [0, -2, -1, 1, 2, 10]);
    }

    #[test]
    fn classification_is_stable() {
        let d = doc("<p>A<chip>xy</chip>B<chip></chip><chip>z</chip></p><p>c</p>");
        for pos in 0..=d.content_size() + 2 {
            let first = classify(&d, pos, &chip());
            assert!(Boundary::ALL.contains(&first));
            assert_eq!(classify(&d, pos, &chip()), first);
        }
    }

    #[test]
    fn absent_type_is_never_a_boundary() {
        let d = doc("<p>A<chip>xy</chip>B</p>");
        for pos in 0..=d.content_size() {
            assert_eq!(classify(&d, pos, &NodeType::new("mention")), Boundary::None);
        }
    }

    #[test]
    fn direction_breaks_ties() {
        let d = doc("<p><chip>a</chip><chip>b</chip></p>");
        assert_eq!(
            classify_toward(&d, 4, &chip(), Direction::Forward),
            Boundary::OutsideBefore
        );
        assert_eq!(
            classify_toward(&d, 4, &chip(), Direction::Backward),
            Boundary::OutsideAfter
        );

        let empty = doc("<p>a<chip></chip>b</p>");
        assert_eq!(classify(&empty, 3, &chip()), Boundary::InsideStart);
        assert_eq!(
            classify_toward(&empty, 3, &chip(), Direction::Forward),
            Boundary::InsideEnd
        );
        assert_eq!(
            classify_toward(&empty, 3, &chip(), Direction::Backward),
            Boundary::InsideStart
        );
    }

    #[test]
    fn check_active_uses_caret_or_hypothetical_pos() {
        let d = doc("<p>A<chip>xy</chip>B</p>");
        let c = chip();
        assert_eq!(
            check_active(&d, Selection::caret(6), &c, None),
            ActiveCheck {
                is_active: true,
                boundary: Boundary::OutsideAfter
            }
        );
        assert!(!check_active(&d, Selection::caret(4), &c, None).is_active);
        assert!(!check_active(&d, Selection::new(2, 6), &c, None).is_active);
        assert!(check_active(&d, Selection::new(2, 6), &c, Some(3)).is_active);
    }

    #[test]
    fn between_units_is_active() {
        let d = doc("<p><chip>a</chip><chip>b</chip></p>");
        let check = check_active(&d, Selection::caret(4), &chip(), None);
        assert!(check.is_active);
        assert_eq!(check.boundary, Boundary::BetweenUnits);
    }

    #[test]
    fn twins_share_a_screen_spot() {
        let d = doc("<p>A<chip>xy</chip>B</p>");
        assert_eq!(outside_twin(&d, 5, Boundary::InsideEnd), Some(6));
        assert_eq!(outside_twin(&d, 3, Boundary::InsideStart), Some(2));
        assert_eq!(outside_twin(&d, 6, Boundary::OutsideAfter), None);
    }
}
