use serde::{Deserialize, Serialize};

use crate::actions::{
    Context, Decision, HomeEnd, Outcome, apply_pending, on_arrow, on_backspace, on_click,
    on_home_end_deferred, on_home_end_geometry,
};
use crate::classify::check_active;
use crate::editing::{Patch, Transaction};
use crate::error::EngineError;
use crate::event::{InputEvent, Key, KeyEvent};
use crate::intercept::{TextInputStrategy, on_before_input, on_composition_end, on_text_input};
use crate::model::{Document, NodeType, Selection};
use crate::position::Direction;
use crate::state::InteractionState;
use crate::view::{Decoration, Projection, decorations};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeEndStrategy {
    /// Predict the landing position from row geometry.
    #[default]
    Geometry,
    /// Let the host move first, correct on the next apply.
    Deferred,
}

/// Per-instance engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    pub atom: NodeType,
    #[serde(default)]
    pub home_end: HomeEndStrategy,
    #[serde(default)]
    pub text_input: TextInputStrategy,
}

impl Options {
    pub fn new(atom: NodeType) -> Self {
        Self {
            atom,
            home_end: HomeEndStrategy::default(),
            text_input: TextInputStrategy::default(),
        }
    }
}

/// What happened to one input event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dispatch {
    pub outcome: Outcome,
    /// Present when the decision carried edits or state flags.
    pub patch: Option<Patch>,
}

/// One editing session: the document, its selection and the interaction
/// state, all owned here and mutated only through [`Session::handle`] and
/// [`Session::apply`].
#[derive(Debug, Clone)]
pub struct Session {
    doc: Document,
    selection: Selection,
    state: InteractionState,
    options: Options,
    version: u64,
}

impl Session {
    pub fn new(doc: Document, selection: Selection, options: Options) -> Self {
        let mut session = Self {
            doc,
            selection,
            state: InteractionState::default(),
            options,
            version: 0,
        };
        session.state.active = session.is_at_boundary(&session.doc, session.selection);
        session
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// The decision for `event` against the current snapshot, without
    /// applying it.
    pub fn decide(&self, event: &InputEvent, projection: Option<&dyn Projection>) -> Decision {
        let cx = Context::new(&self.doc, self.selection, &self.state, &self.options.atom);
        match event {
            InputEvent::Key(key) => self.decide_key(&cx, key, projection),
            InputEvent::Click { pos } => on_click(&cx, *pos),
            InputEvent::TextInput {
                text, composing, ..
            } => on_text_input(&cx, self.options.text_input, text, *composing),
            InputEvent::CompositionStart => on_before_input(&cx, self.options.text_input),
            InputEvent::CompositionEnd => on_composition_end(&cx),
        }
    }

    fn decide_key(
        &self,
        cx: &Context<'_>,
        event: &KeyEvent,
        projection: Option<&dyn Projection>,
    ) -> Decision {
        let modifiers = event.modifiers;
        let home_end = |key: HomeEnd| match self.options.home_end {
            HomeEndStrategy::Geometry => on_home_end_geometry(cx, key, modifiers, projection),
            HomeEndStrategy::Deferred => on_home_end_deferred(cx, key, modifiers),
        };
        match &event.key {
            Key::ArrowLeft => on_arrow(cx, Direction::Backward, modifiers),
            Key::ArrowRight => on_arrow(cx, Direction::Forward, modifiers),
            Key::Backspace => on_backspace(cx, modifiers),
            Key::Home => home_end(HomeEnd::Home),
            Key::End => home_end(HomeEnd::End),
            Key::Char(_) if !(modifiers.alt || modifiers.ctrl || modifiers.meta) => {
                on_before_input(cx, self.options.text_input)
            }
            Key::ArrowUp | Key::ArrowDown | Key::Char(_) | Key::Other(_) => Decision::pass_reset(),
        }
    }

    /// Decides `event` and applies the decision's transaction in the same
    /// call. On PassThrough the host then runs its default behaviour and
    /// reports it through [`Session::apply`].
    pub fn handle(
        &mut self,
        event: &InputEvent,
        projection: Option<&dyn Projection>,
    ) -> Result<Dispatch, EngineError> {
        let decision = self.decide(event, projection);
        log::debug!(
            "handle {event:?} at {:?}: {:?}",
            self.selection,
            decision.outcome
        );
        let patch = if decision.transaction.is_empty() {
            None
        } else {
            Some(self.apply(&decision.transaction)?)
        };
        Ok(Dispatch {
            outcome: decision.outcome,
            patch,
        })
    }

    /// Applies a transaction from the engine or the host.
    ///
    /// Host transactions carry no metadata. After one, a pending Home/End
    /// correction runs, and the state resets unless the transaction continues
    /// an edit the interceptor started. Nothing changes if any command fails.
    pub fn apply(&mut self, tr: &Transaction) -> Result<Patch, EngineError> {
        let mut doc = self.doc.clone();
        let before = self.selection;
        let (mut selection, mut changed) = tr.apply_to(&mut doc, before)?;
        let mut state = self.state;

        match tr.meta() {
            Some(meta) => state.merge(meta),
            None => {
                if let Some(pending) = state.pending.take() {
                    let correction =
                        apply_pending(&doc, &self.options.atom, pending, before, selection);
                    if let Some(correction) = correction {
                        let (corrected, more) = correction.apply_to(&mut doc, selection)?;
                        selection = corrected;
                        changed.extend(more);
                    }
                }
                let continuation = state.typing && tr.has_edits();
                if !continuation {
                    state = InteractionState::default();
                }
            }
        }
        state.active = state.typing || self.is_at_boundary(&doc, selection);

        self.doc = doc;
        self.selection = selection;
        self.state = state;
        self.version += 1;
        log::debug!(
            "apply v{}: selection {:?}, state {:?}",
            self.version,
            self.selection,
            self.state
        );
        Ok(Patch {
            changed,
            new_selection: selection,
            version: self.version,
        })
    }

    /// Widgets the host should draw for the current state.
    pub fn decorations(&self) -> Vec<Decoration> {
        decorations(&self.state, self.selection)
    }

    /// Whether the host should hide its native caret.
    pub fn hides_native_caret(&self) -> bool {
        self.state.active
    }

    fn is_at_boundary(&self, doc: &Document, selection: Selection) -> bool {
        check_active(doc, selection, &self.options.atom, None).is_active
    }
}
