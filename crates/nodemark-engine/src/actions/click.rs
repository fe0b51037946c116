use crate::actions::{Context, Decision};
use crate::classify::outside_twin;
use crate::editing::Transaction;
use crate::model::Selection;
use crate::position::contains_type;
use crate::state::StateMeta;

/// A click the host resolved to `pos`.
pub fn on_click(cx: &Context<'_>, pos: usize) -> Decision {
    let check = cx.check_active(Some(pos));
    log::debug!(
        "on_click at {pos}: {:?}, same_pos {}",
        check.boundary,
        cx.state.same_pos
    );

    if check.is_active {
        let head = cx.selection.head;
        let repeat = cx.state.same_pos
            && cx.selection.is_empty()
            && outside_twin(cx.doc, pos, check.boundary) == Some(head);
        return place(if repeat { head } else { pos });
    }

    // Undershoot into the zero-width gap before a unit's outside edge.
    let inside = |p: usize| contains_type(cx.doc, p, cx.atom);
    let undershoot = !inside(pos.saturating_sub(1))
        && !inside(pos)
        && inside(pos + 2)
        && cx.doc.char_at(pos).is_none();
    if undershoot {
        return place(pos + 1);
    }

    Decision::pass(Transaction::new().set_meta(consumed()))
}

fn place(target: usize) -> Decision {
    Decision::handled(
        Transaction::new()
            .set_selection(Selection::caret(target))
            .set_meta(consumed()),
    )
}

/// Clicks clear the typing guard and use up `same_pos`.
fn consumed() -> StateMeta {
    StateMeta::new().typing(false).same_pos(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Outcome;
    use crate::editing::Cmd;
    use crate::state::InteractionState;
    use crate::test_support::{chip, fixture};
    use rstest::rstest;

    fn click(markup: &str, pos: usize, same_pos: bool) -> Decision {
        let (doc, selection) = fixture(markup);
        let state = InteractionState {
            same_pos,
            ..Default::default()
        };
        let atom = chip();
        on_click(&Context::new(&doc, selection, &state, &atom), pos)
    }

    fn target(decision: &Decision) -> Option<usize> {
        decision.transaction.cmds().iter().find_map(|cmd| match cmd {
            Cmd::SetSelection { selection } => Some(selection.head),
            _ => None,
        })
    }

    #[rstest]
    #[case::outside_before(2, Some(2))]
    #[case::inside_start(3, Some(3))]
    #[case::mid_unit(4, None)]
    #[case::inside_end(5, Some(5))]
    #[case::outside_after(6, Some(6))]
    #[case::plain_text(7, None)]
    fn click_places_caret_at_boundaries(#[case] pos: usize, #[case] expected: Option<usize>) {
        let decision = click("<p>|A<chip>xy</chip>B</p>", pos, false);
        assert_eq!(target(&decision), expected);
        assert_eq!(decision.is_handled(), expected.is_some());
    }

    #[test]
    fn repeated_click_after_leaving_unit_stays_outside() {
        // caret already outside-after; the hit-test offers the inside twin
        let decision = click("<p>A<chip>xy</chip>|B</p>", 5, true);
        assert_eq!(target(&decision), Some(6));
        assert_eq!(
            decision.transaction.meta(),
            Some(&StateMeta::new().typing(false).same_pos(false))
        );

        let decision = click("<p>A<chip>xy</chip>|B</p>", 5, false);
        assert_eq!(target(&decision), Some(5));
    }

    #[test]
    fn same_pos_ignores_unrelated_positions() {
        let decision = click("<p>A<chip>xy</chip>|B</p>", 3, true);
        assert_eq!(target(&decision), Some(3));
    }

    #[test]
    fn undershoot_before_leading_unit_is_nudged() {
        // the second <p> opens at 3, so 4 is the unit's outside edge
        let decision = click("<p>a</p><p><chip>xy</chip>|</p>", 3, false);
        assert_eq!(target(&decision), Some(4));
    }

    #[test]
    fn text_before_unit_is_not_nudged() {
        // 5 is inside, but 3 is a character position rather than a gap
        let decision = click("<p>A|BC<chip>xy</chip></p>", 3, false);
        assert_eq!(decision.outcome, Outcome::PassThrough);
        assert_eq!(
            decision.transaction.meta(),
            Some(&StateMeta::new().typing(false).same_pos(false))
        );
    }
}
