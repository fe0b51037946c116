//! Position resolution: clamping, ancestor chains and selectable neighbors.

pub mod neighbors;
pub mod resolve;

pub use neighbors::{Direction, Neighbors, REACH, find_from, nearest_selectable};
pub use resolve::{ResolvedPos, clamp, contains_type, enclosing, resolve, resolve_clamped};
