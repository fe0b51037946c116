use crate::actions::{Context, Decision};
use crate::editing::Transaction;
use crate::event::Modifiers;
use crate::model::Selection;
use crate::position::enclosing;
use crate::state::StateMeta;

pub fn on_backspace(cx: &Context<'_>, modifiers: Modifiers) -> Decision {
    if modifiers.any() {
        return Decision::pass_typing_false();
    }
    if cx.selection.is_empty() {
        collapsed(cx)
    } else {
        ranged(cx)
    }
}

fn collapsed(cx: &Context<'_>) -> Decision {
    let head = cx.selection.head;
    let mut n = cx.neighbors(head);
    let current = n.contains(0, cx.atom);
    let prev = n.contains(-1, cx.atom);
    let before_prev = n.contains(-2, cx.atom);
    log::debug!(
        "on_backspace at {head}: current {current}, prev {prev}, before_prev {before_prev}"
    );

    // Just past the close token: the unit goes as a whole.
    if !current && prev {
        let unit = enclosing(cx.doc, n.at(-1), cx.atom).filter(|unit| unit.end == head);
        if let Some(unit) = unit {
            return delete(unit.start..head, unit.start);
        }
    }

    // One character past the close: delete it ourselves so the caret lands
    // outside the unit rather than inside it.
    let prev_pos = n.at(-1);
    if !current && !prev && before_prev && prev_pos + 1 == head {
        return delete(prev_pos..head, prev_pos);
    }

    Decision::pass_typing_false()
}

fn ranged(cx: &Context<'_>) -> Decision {
    let (from, to) = (cx.selection.from(), cx.selection.to());
    let mut start = cx.neighbors(from);
    let at_start = start.contains(0, cx.atom);
    let after_unit = !at_start && start.contains(-1, cx.atom);
    let at_end = cx.neighbors(to).contains(0, cx.atom);
    log::debug!(
        "on_backspace {from}..{to}: at_start {at_start}, after_unit {after_unit}, at_end {at_end}"
    );

    if at_start || after_unit || at_end {
        delete(from..to, from)
    } else {
        Decision::pass_typing_false()
    }
}

fn delete(range: std::ops::Range<usize>, caret: usize) -> Decision {
    Decision::handled(
        Transaction::new()
            .delete_range(range)
            .set_selection(Selection::caret(caret))
            .set_meta(StateMeta::new().typing(false)),
    )
}
