//! Boundary navigation and edit interception for atomic inline units.
//!
//! An atomic unit is an inline node (a chip, a mention, a tag) whose edges the
//! host editor renders as a single spot even though the document has two
//! caret positions there, one inside and one outside. The engine classifies
//! every caret position against those edges and decides, per input event,
//! whether to take over from the host's default behaviour.

pub mod actions;
pub mod classify;
pub mod editing;
pub mod error;
pub mod event;
pub mod intercept;
pub mod model;
pub mod native;
pub mod position;
pub mod session;
pub mod state;
pub mod view;

#[cfg(test)]
mod test_support;

// Re-export key types for easier usage
pub use actions::{Context, Decision, HomeEnd, Outcome};
pub use classify::{ActiveCheck, Adjacency, Boundary, check_active, classify, classify_toward};
pub use editing::{Cmd, Patch, Transaction};
pub use error::EngineError;
pub use event::{InputEvent, Key, KeyEvent, Modifiers};
pub use intercept::{TextInputStrategy, ZERO_WIDTH_ANCHOR};
pub use model::{Document, NodeType, Schema, Selection, parse, render};
pub use native::Host;
pub use session::{Dispatch, HomeEndStrategy, Options, Session};
pub use state::{InteractionState, Pending, StateMeta};
pub use view::{Decoration, GridProjection, Projection};
