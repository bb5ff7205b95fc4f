//! Agent capability trait and stub implementation.
//!
//! Each tick the controller hands the agent its delayed [`Snapshot`] and
//! the latest [`ScreenCapture`], then asks it for a [`KeyPair`]. The
//! [`AgentPolicy`] trait abstracts whatever produces that input -- a
//! scripted bot, a learned policy behind a bridge, or a test stub. Its
//! internals are opaque to the controller.

use ringside_types::{KeyPair, ScreenCapture, Side, Snapshot, StaticMatchInfo};

/// Errors an agent may report to its controller.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// One-time setup failed; the controller will not start.
    #[error("agent setup failed: {message}")]
    Setup {
        /// Description of the failure.
        message: String,
    },

    /// The decision for this tick failed; the controller publishes neutral
    /// input instead.
    #[error("agent decision failed: {message}")]
    Decision {
        /// Description of the failure.
        message: String,
    },
}

/// A source of per-tick input for one controller.
///
/// Hooks are called from two threads: `on_tick` and `decide` from the
/// controller's own thread, `on_round_end` and `on_shutdown` from the
/// engine thread. The controller serializes them, so implementations only
/// need to be [`Send`].
pub trait AgentPolicy: Send {
    /// One-time setup with the match constants, before the first tick.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Setup`] if the agent cannot play this match.
    fn initialize(&mut self, info: &StaticMatchInfo, side: Side) -> Result<(), AgentError>;

    /// Receive the delayed snapshot and the latest screen capture.
    fn on_tick(&mut self, snapshot: &Snapshot, screen: Option<&ScreenCapture>);

    /// Produce this tick's input.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Decision`] if no input can be produced; the
    /// controller substitutes neutral input for the tick.
    fn decide(&mut self) -> Result<KeyPair, AgentError>;

    /// A round ended with the given remaining hit points.
    fn on_round_end(&mut self, p1_hp: i32, p2_hp: i32, elapsed_frames: u32);

    /// The match is over; no further hooks will be called.
    fn on_shutdown(&mut self);
}

/// A policy that never presses anything.
///
/// Used when a side has no agent attached, and in tests to exercise the
/// controller loop without decision logic.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdlePolicy;

impl IdlePolicy {
    /// Create a new idle policy.
    pub const fn new() -> Self {
        Self
    }
}

impl AgentPolicy for IdlePolicy {
    fn initialize(&mut self, _info: &StaticMatchInfo, _side: Side) -> Result<(), AgentError> {
        Ok(())
    }

    fn on_tick(&mut self, _snapshot: &Snapshot, _screen: Option<&ScreenCapture>) {}

    fn decide(&mut self) -> Result<KeyPair, AgentError> {
        Ok(KeyPair::NEUTRAL)
    }

    fn on_round_end(&mut self, _p1_hp: i32, _p2_hp: i32, _elapsed_frames: u32) {}

    fn on_shutdown(&mut self) {}
}
