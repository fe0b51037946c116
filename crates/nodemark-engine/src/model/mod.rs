//! Reference document model: a typed tree flattened into a position space.
//!
//! A text node of `n` characters has size `n`, an element with content has
//! size `content + 2` (open and close tokens) and a leaf element has size 1.
//! Positions run from 0 to the root's content size.

pub mod markup;
pub mod node;
pub mod schema;
pub mod selection;

pub use markup::{Parsed, parse, render};
pub use node::{Document, Element, Node};
pub use schema::{ContentModel, NodeSpec, NodeType, Schema};
pub use selection::Selection;
