use crate::actions::{Context, Decision};
use crate::editing::Transaction;
use crate::event::Modifiers;
use crate::model::Selection;
use crate::position::Direction;
use crate::state::StateMeta;

/// ArrowLeft / ArrowRight.
///
/// Takes exactly one selectable step in `dir` whenever the caret is about to
/// cross or enter a unit edge, so positions the host would skip (the inside
/// and outside of an edge render at the same spot) are each visited once.
pub fn on_arrow(cx: &Context<'_>, dir: Direction, modifiers: Modifiers) -> Decision {
    if modifiers.shift || modifiers.alt || modifiers.ctrl || !cx.selection.is_empty() {
        return Decision::pass_typing_false();
    }

    let step = dir.sign();
    let head = cx.selection.head;
    let mut n = cx.neighbors(head);
    let current = n.contains(0, cx.atom);
    let next = n.contains(step, cx.atom);
    let beyond = n.contains(2 * step, cx.atom);
    log::debug!("on_arrow {dir:?} at {head}: current {current}, next {next}, beyond {beyond}");

    let snap = (!current && !next && beyond)
        || (!current && next)
        || (current && next && !beyond)
        || (current && !next);
    if !snap {
        return Decision::pass_typing_false();
    }

    let target = n.at(step);
    let vacated = current && !next;
    Decision::handled(
        Transaction::new()
            .set_selection(Selection::caret(target))
            .set_meta(StateMeta::new().typing(false).same_pos(vacated)),
    )
}
