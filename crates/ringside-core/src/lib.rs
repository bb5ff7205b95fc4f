//! Decision-cycle controller and action translator for Ringside agents.
//!
//! Each side of a match gets one [`AgentController`] running on its own
//! thread. The engine feeds it snapshots, raises a shared [`TickBarrier`],
//! and reads back the published [`KeyPair`](ringside_types::KeyPair).
//! Agents that think in moves rather than raw keys use a
//! [`CommandCenter`] to turn action names into queued key vectors.
//!
//! # Modules
//!
//! - [`agent`] -- [`AgentPolicy`] capability trait and [`IdlePolicy`] stub.
//! - [`barrier`] -- [`TickBarrier`] contract and the [`TickGate`]
//!   reference implementation.
//! - [`buffer`] -- [`SnapshotBuffer`], the fixed input-latency queue.
//! - [`command`] -- Action-name table, notation expansion, and
//!   [`CommandCenter`].
//! - [`config`] -- Configuration loading from `ringside-config.yaml` into
//!   strongly-typed structs.
//! - [`controller`] -- [`AgentController`], the per-side decision loop.

pub mod agent;
pub mod barrier;
pub mod buffer;
pub mod command;
pub mod config;
pub mod controller;

pub use agent::{AgentError, AgentPolicy, IdlePolicy};
pub use barrier::{TickBarrier, TickGate, TickSignal};
pub use buffer::{DEFAULT_INPUT_DELAY, SnapshotBuffer};
pub use command::CommandCenter;
pub use config::{ConfigError, RingsideConfig};
pub use controller::{AgentController, ControllerError, ControllerPhase};
