//! Text insertion at unit boundaries.
//!
//! Inside and outside of a unit edge render at the same spot, so the host's
//! own insertion can land on the wrong side. Two strategies keep the text
//! where the caret logically is: rewriting the insertion ourselves, or
//! planting a zero-width anchor that the host's insertion then replaces.

use serde::{Deserialize, Serialize};

use crate::actions::{Context, Decision};
use crate::editing::Transaction;
use crate::model::Selection;
use crate::state::StateMeta;

/// Placeholder the anchor strategy selects before the host inserts.
pub const ZERO_WIDTH_ANCHOR: char = '\u{200B}';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextInputStrategy {
    /// Insert the text ourselves and suppress the host's insertion.
    #[default]
    Rewrite,
    /// Pre-position a placeholder before input or composition starts.
    Anchor,
}

/// Whether the interceptor may act: not mid-keystroke, caret collapsed and
/// parked at a boundary.
fn armed(cx: &Context<'_>) -> bool {
    !cx.state.typing && cx.selection.is_empty() && cx.check_active(None).is_active
}

/// A text insertion about to happen at the selection.
pub fn on_text_input(
    cx: &Context<'_>,
    strategy: TextInputStrategy,
    text: &str,
    composing: bool,
) -> Decision {
    if strategy != TextInputStrategy::Rewrite || !armed(cx) {
        return Decision::pass(Transaction::new());
    }

    let head = cx.selection.head;
    let end = head + text.chars().count();
    log::debug!("on_text_input {text:?} at {head}, composing {composing}");
    let selection = if composing {
        Selection::new(head, end)
    } else {
        Selection::caret(end)
    };
    Decision::handled(
        Transaction::new()
            .insert_text(head, text)
            .set_selection(selection)
            .set_meta(StateMeta::new().typing(true)),
    )
}

/// A printable key press or composition start, before any text arrives.
///
/// The host's insertion must still run, so the anchor edit rides on a
/// pass-through decision.
pub fn on_before_input(cx: &Context<'_>, strategy: TextInputStrategy) -> Decision {
    if strategy != TextInputStrategy::Anchor || !armed(cx) {
        return Decision::pass(Transaction::new());
    }

    let head = cx.selection.head;
    log::debug!("on_before_input: anchor at {head}");
    Decision::pass(
        Transaction::new()
            .insert_text(head, ZERO_WIDTH_ANCHOR.to_string())
            .set_selection(Selection::new(head, head + 1))
            .set_meta(StateMeta::new().typing(true)),
    )
}

/// End of composition: clears the typing guard and drops an anchor the
/// composition never replaced.
pub fn on_composition_end(cx: &Context<'_>) -> Decision {
    let meta = StateMeta::new().typing(false);
    let (from, to) = (cx.selection.from(), cx.selection.to());
    let leftover =
        to == from + 1 && cx.doc.text_between(from, to) == ZERO_WIDTH_ANCHOR.to_string();
    log::debug!(
        "on_composition_end: typing was {}, leftover anchor {leftover}",
        cx.state.typing
    );

    if leftover {
        Decision::handled(
            Transaction::new()
                .delete_range(from..to)
                .set_selection(Selection::caret(from))
                .set_meta(meta),
        )
    } else {
        Decision::pass(Transaction::new().set_meta(meta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Outcome;
    use crate::model::{Document, render};
    use crate::state::InteractionState;
    use crate::test_support::{chip, fixture};
    use pretty_assertions::assert_eq;

    fn run(
        markup: &str,
        typing: bool,
        decide: impl Fn(&Context<'_>) -> Decision,
    ) -> (Decision, Document, Selection) {
        let (mut doc, selection) = fixture(markup);
        let state = InteractionState {
            typing,
            ..Default::default()
        };
        let atom = chip();
        let decision = decide(&Context::new(&doc, selection, &state, &atom));
        let (selection, _) = decision
            .transaction
            .apply_to(&mut doc, selection)
            .expect("edit applies");
        (decision, doc, selection)
    }

    #[test]
    fn rewrite_keeps_text_inside_unit_start() {
        let (decision, doc, selection) = run("<p>A<chip>|xy</chip>B</p>", false, |cx| {
            on_text_input(cx, TextInputStrategy::Rewrite, "x", false)
        });
        assert_eq!(decision.outcome, Outcome::Handled);
        assert_eq!(selection, Selection::caret(4));
        insta::assert_snapshot!(render(&doc, Some(selection)), @"<p>A<chip>x|xy</chip>B</p>");
    }

    #[test]
    fn rewrite_keeps_text_outside_unit_end() {
        let (_, doc, selection) = run("<p>A<chip>xy</chip>|B</p>", false, |cx| {
            on_text_input(cx, TextInputStrategy::Rewrite, "zz", false)
        });
        assert_eq!(render(&doc, Some(selection)), "<p>A<chip>xy</chip>zz|B</p>");
    }

    #[test]
    fn rewrite_selects_composed_text() {
        let (decision, doc, selection) = run("<p>A<chip>xy|</chip>B</p>", false, |cx| {
            on_text_input(cx, TextInputStrategy::Rewrite, "k", true)
        });
        assert_eq!(
            decision.transaction.meta(),
            Some(&StateMeta::new().typing(true))
        );
        assert_eq!(render(&doc, Some(selection)), "<p>A<chip>xy[k]</chip>B</p>");
    }

    fn type_x(cx: &Context<'_>) -> Decision {
        on_text_input(cx, TextInputStrategy::Rewrite, "x", false)
    }

    #[test]
    fn guard_and_position_make_rewrite_pass() {
        for (markup, guard) in [
            ("<p>A<chip>|xy</chip>B</p>", true),
            ("<p>A<chip>x|y</chip>B</p>", false),
            ("<p>[A<chip>]xy</chip>B</p>", false),
        ] {
            let (decision, _, _) = run(markup, guard, type_x);
            assert_eq!(decision, Decision::pass(Transaction::new()), "{markup}");
        }
    }

    #[test]
    fn anchor_is_planted_and_selected() {
        let (decision, doc, selection) = run("<p>A<chip>xy|</chip>B</p>", false, |cx| {
            on_before_input(cx, TextInputStrategy::Anchor)
        });
        assert_eq!(decision.outcome, Outcome::PassThrough);
        assert_eq!(selection, Selection::new(5, 6));
        assert_eq!(doc.text_between(3, 6), "xy\u{200B}");
    }

    #[test]
    fn strategies_ignore_each_others_events() {
        let (decision, _, _) = run("<p>A<chip>xy|</chip>B</p>", false, |cx| {
            on_before_input(cx, TextInputStrategy::Rewrite)
        });
        assert!(decision.transaction.is_empty());
        let (decision, _, _) = run("<p>A<chip>xy|</chip>B</p>", false, |cx| {
            on_text_input(cx, TextInputStrategy::Anchor, "x", false)
        });
        assert!(decision.transaction.is_empty());
    }

    #[test]
    fn composition_end_removes_leftover_anchor() {
        let (decision, doc, selection) =
            run("<p>A<chip>xy[\u{200B}]</chip>B</p>", true, on_composition_end);
        assert_eq!(decision.outcome, Outcome::Handled);
        assert_eq!(render(&doc, Some(selection)), "<p>A<chip>xy|</chip>B</p>");

        let (decision, _, _) = run("<p>A<chip>xy|</chip>B</p>", true, on_composition_end);
        assert_eq!(decision.outcome, Outcome::PassThrough);
        assert_eq!(
            decision.transaction.meta(),
            Some(&StateMeta::new().typing(false))
        );
    }
}
