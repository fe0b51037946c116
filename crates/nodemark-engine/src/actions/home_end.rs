use serde::{Deserialize, Serialize};

use crate::actions::{Context, Decision, move_caret};
use crate::classify::{Boundary, classify_toward};
use crate::editing::Transaction;
use crate::event::Modifiers;
use crate::model::{Document, NodeType, Selection};
use crate::position::{Direction, Neighbors};
use crate::state::{Pending, StateMeta};
use crate::view::{Point, Projection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeEnd {
    Home,
    End,
}

/// Synchronous Home/End: predicts the landing position from row geometry
/// and snaps to it when it sits at a unit boundary.
///
/// Declines when no projection is available or it cannot place the caret.
pub fn on_home_end_geometry(
    cx: &Context<'_>,
    key: HomeEnd,
    modifiers: Modifiers,
    projection: Option<&dyn Projection>,
) -> Decision {
    if modifiers.any() {
        return Decision::pass_typing_false();
    }
    let Some(projection) = projection else {
        log::debug!("on_home_end {key:?}: no projection");
        return Decision::pass_typing_false();
    };

    let head = cx.selection.head;
    let Some(caret) = projection.coords_at_pos(head) else {
        log::debug!("on_home_end {key:?}: no coords at {head}");
        return Decision::pass_typing_false();
    };
    let bounds = projection.bounds();
    let x = match key {
        HomeEnd::Home => bounds.left + 1.0,
        HomeEnd::End => bounds.right - 1.0,
    };
    let Some(hit) = projection.pos_at_coords(Point { x, y: caret.top }) else {
        return Decision::pass_typing_false();
    };

    let candidate = match (key, hit.inside) {
        // probe landed outside any content, e.g. just before a block
        (HomeEnd::Home, None) => cx.neighbors(hit.pos).at(1),
        // a unit ending the row shares its last column with the outside edge
        (HomeEnd::End, _)
            if classify_toward(cx.doc, hit.pos, cx.atom, Direction::Forward)
                == Boundary::InsideEnd =>
        {
            cx.neighbors(hit.pos).at(1)
        }
        _ => hit.pos,
    };
    let snap = match key {
        HomeEnd::Home => cx.check_active(Some(candidate)).is_active,
        HomeEnd::End => {
            cx.check_active(Some(candidate)).is_active || cx.check_active(None).is_active
        }
    };
    log::debug!("on_home_end {key:?} from {head}: candidate {candidate}, snap {snap}");

    if snap {
        Decision::handled(move_caret(candidate))
    } else {
        Decision::pass_typing_false()
    }
}

/// Deferred Home/End: lets the host move the caret and records what to
/// check once it has.
pub fn on_home_end_deferred(cx: &Context<'_>, key: HomeEnd, modifiers: Modifiers) -> Decision {
    if modifiers.alt || modifiers.ctrl || modifiers.meta {
        return Decision::pass_typing_false();
    }
    let extend = modifiers.shift;
    let pending = match key {
        HomeEnd::Home => Pending::Home { extend },
        HomeEnd::End => Pending::End { extend },
    };
    log::debug!("on_home_end {key:?} at {}: deferred", cx.selection.head);
    Decision::pass(
        Transaction::new().set_meta(StateMeta::new().typing(false).pending(Some(pending))),
    )
}

/// Correction for a host Home/End that stopped one step short, inside a
/// unit. `before` and `after` are the selections around the host's move.
pub fn apply_pending(
    doc: &Document,
    atom: &NodeType,
    pending: Pending,
    before: Selection,
    after: Selection,
) -> Option<Transaction> {
    let head = after.head;
    let target = match pending {
        Pending::Home { .. }
            if head < before.head
                && classify_toward(doc, head, atom, Direction::Backward)
                    == Boundary::InsideStart =>
        {
            Neighbors::new(doc, head).at(-1)
        }
        Pending::End { .. }
            if head > before.head
                && classify_toward(doc, head, atom, Direction::Forward) == Boundary::InsideEnd =>
        {
            Neighbors::new(doc, head).at(1)
        }
        _ => return None,
    };
    log::debug!("apply_pending {pending:?}: {head} -> {target}");

    let selection = if pending.extend() {
        after.extend_to(target)
    } else {
        Selection::caret(target)
    };
    Some(Transaction::new().set_selection(selection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Outcome;
    use crate::editing::Cmd;
    use crate::state::InteractionState;
    use crate::test_support::{chip, fixture};
    use crate::view::GridProjection;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn geometry(markup: &str, key: HomeEnd, with_projection: bool) -> Decision {
        let (doc, selection) = fixture(markup);
        let grid = GridProjection::new(&doc, 40);
        let projection: Option<&dyn Projection> =
            with_projection.then_some(&grid as &dyn Projection);
        let state = InteractionState::default();
        let atom = chip();
        on_home_end_geometry(
            &Context::new(&doc, selection, &state, &atom),
            key,
            Modifiers::NONE,
            projection,
        )
    }

    fn target(decision: &Decision) -> Option<usize> {
        decision.transaction.cmds().iter().find_map(|cmd| match cmd {
            Cmd::SetSelection { selection } => Some(selection.head),
            _ => None,
        })
    }

    #[rstest]
    #[case::unit_starts_row("<p><chip>a|b</chip>c</p>", HomeEnd::Home, Some(1))]
    #[case::unit_starts_second_row("<p>ab</p><p><chip>x</chip>y|</p>", HomeEnd::Home, Some(5))]
    #[case::text_starts_row("<p>xy<chip>a</chip>|</p>", HomeEnd::Home, None)]
    #[case::unit_ends_row("<p>x|<chip>ab</chip></p>", HomeEnd::End, Some(6))]
    #[case::text_ends_row("<p>|x<chip>ab</chip>yz</p>", HomeEnd::End, None)]
    #[case::caret_at_unit_edge("<p>|<chip>ab</chip>yz</p>", HomeEnd::End, Some(7))]
    fn geometry_snaps_to_boundaries(
        #[case] markup: &str,
        #[case] key: HomeEnd,
        #[case] expected: Option<usize>,
    ) {
        let decision = geometry(markup, key, true);
        assert_eq!(target(&decision), expected);
        assert_eq!(decision.is_handled(), expected.is_some());
    }

    #[test]
    fn geometry_declines_without_projection() {
        let decision = geometry("<p><chip>a|b</chip>c</p>", HomeEnd::Home, false);
        assert_eq!(decision.outcome, Outcome::PassThrough);
        assert_eq!(decision.transaction.meta(), Some(&StateMeta::new().typing(false)));
    }

    #[test]
    fn deferred_records_pending() {
        let (doc, selection) = fixture("<p><chip>a|b</chip>c</p>");
        let state = InteractionState::default();
        let atom = chip();
        let cx = Context::new(&doc, selection, &state, &atom);

        let decision = on_home_end_deferred(&cx, HomeEnd::End, Modifiers::SHIFT);
        assert_eq!(decision.outcome, Outcome::PassThrough);
        assert_eq!(
            decision.transaction.meta(),
            Some(
                &StateMeta::new()
                    .typing(false)
                    .pending(Some(Pending::End { extend: true }))
            )
        );

        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        };
        let decision = on_home_end_deferred(&cx, HomeEnd::Home, ctrl);
        assert_eq!(decision.transaction.meta(), Some(&StateMeta::new().typing(false)));
    }

    fn corrected(
        markup: &str,
        pending: Pending,
        before: Selection,
        after: Selection,
    ) -> Option<Selection> {
        let (doc, _) = fixture(markup);
        let tr = apply_pending(&doc, &chip(), pending, before, after)?;
        match tr.cmds() {
            [Cmd::SetSelection { selection }] => Some(*selection),
            other => panic!("unexpected commands {other:?}"),
        }
    }

    #[test]
    fn pending_home_steps_out_of_unit() {
        let markup = "<p><chip>ab</chip>c|</p>";
        let home = Pending::Home { extend: false };
        assert_eq!(
            corrected(markup, home, Selection::caret(6), Selection::caret(2)),
            Some(Selection::caret(1))
        );
        // already outside, or the host did not move left
        assert_eq!(corrected(markup, home, Selection::caret(6), Selection::caret(1)), None);
        assert_eq!(corrected(markup, home, Selection::caret(2), Selection::caret(2)), None);
    }

    #[test]
    fn pending_end_steps_out_of_unit() {
        let markup = "<p>c|<chip>ab</chip></p>";
        assert_eq!(
            corrected(
                markup,
                Pending::End { extend: false },
                Selection::caret(1),
                Selection::caret(5)
            ),
            Some(Selection::caret(6))
        );
    }

    #[test]
    fn pending_with_extend_keeps_anchor() {
        let markup = "<p><chip>ab</chip>c|</p>";
        assert_eq!(
            corrected(
                markup,
                Pending::Home { extend: true },
                Selection::caret(6),
                Selection::new(6, 2)
            ),
            Some(Selection::new(6, 1))
        );
    }

    #[test]
    fn pending_end_handles_empty_unit() {
        let markup = "<p>c|<chip></chip></p>";
        assert_eq!(
            corrected(
                markup,
                Pending::End { extend: false },
                Selection::caret(1),
                Selection::caret(3)
            ),
            Some(Selection::caret(4))
        );
    }
}
