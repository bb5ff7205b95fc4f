//! Shared type definitions for the Ringside agent plugin.
//!
//! This crate is the single source of truth for the data exchanged between
//! the host fighting engine, the agent controllers, and the command
//! translator.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers (match identifiers)
//! - [`enums`] -- Sides, facing, input keys, and the action vocabulary
//! - [`input`] -- [`KeyVector`] and [`KeyPair`] input state
//! - [`frame`] -- Per-tick snapshots, screen captures, and match constants

pub mod enums;
pub mod frame;
pub mod ids;
pub mod input;

// Re-export all public types at crate root for convenience.
pub use enums::{Action, Facing, Key, Side, UnknownAction};
pub use frame::{
    CharacterState, FighterInfo, RoundResult, ScreenCapture, Snapshot, StaticMatchInfo,
};
pub use ids::MatchId;
pub use input::{KeyPair, KeyVector};
