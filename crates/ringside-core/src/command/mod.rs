//! Action-to-input translation.
//!
//! An agent asks for a move by name; the translator looks the name up in
//! [`COMMAND_TABLE`], expands the resulting pad notation into one
//! [`KeyVector`](ringside_types::KeyVector) per frame, mirrors it for the
//! character's facing, and queues it for delivery one vector per tick.
//!
//! - [`table`] -- the static name-to-notation table.
//! - [`notation`] -- tokenizer, mirroring, and expansion (pure functions).
//! - [`center`] -- [`CommandCenter`], the per-side key queues.

pub mod center;
pub mod notation;
pub mod table;

pub use center::CommandCenter;
pub use notation::{Button, Pad, Token, expand};
pub use table::{COMMAND_TABLE, CommandEntry};
