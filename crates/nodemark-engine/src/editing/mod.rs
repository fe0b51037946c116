/*!
 * # Edit Commands
 *
 * Every change to a session flows through a [`Transaction`]: an ordered list
 * of [`Cmd`]s plus optional interaction-state metadata. Decisions build
 * transactions, the host builds its own for native behaviour, and the
 * session applies both through the same cycle, producing a [`Patch`].
 *
 * - **`commands`**: `Cmd`, `Transaction` and selection mapping
 * - **`patch`**: changed ranges, new selection and version of one apply
 */

pub mod commands;
pub mod patch;

pub use commands::{Cmd, Transaction};
pub use patch::Patch;
