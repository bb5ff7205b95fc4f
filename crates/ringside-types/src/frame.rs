//! Per-tick simulation data and per-match constants.
//!
//! Everything in this module is produced by the host engine. The plugin
//! stores copies and reads them; it never mutates engine state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::enums::{Facing, Side};
use crate::ids::MatchId;

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// State of one character at a single tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterState {
    /// Horizontal stage position (pixels, left edge = 0).
    pub x: i32,
    /// Vertical stage position (pixels, top edge = 0).
    pub y: i32,
    /// Remaining hit points.
    pub hp: i32,
    /// Current energy gauge.
    pub energy: i32,
    /// Engine identifier of the action state the character is in
    /// (e.g. `"STAND"`, `"DASH"`, `"STAND_D_DF_FA"`).
    pub action: String,
    /// Which way the character is facing.
    pub facing: Facing,
}

/// Immutable record of the simulation at one tick.
///
/// The default snapshot is the neutral "empty frame": both characters at
/// the origin with zeroed stats, marked with `empty == true`. The snapshot
/// buffer pads itself with these so the latency window is always full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Frames elapsed since the round started.
    pub frame_number: u32,
    /// Round number (1-based; 0 for an empty frame).
    pub round: u32,
    /// Frames left before the round times out.
    pub remaining_frames: u32,
    /// Player one's character.
    pub p1: CharacterState,
    /// Player two's character.
    pub p2: CharacterState,
    /// Whether this is a placeholder rather than engine-produced data.
    pub empty: bool,
}

impl Snapshot {
    /// The neutral placeholder snapshot.
    pub fn neutral() -> Self {
        Self {
            frame_number: 0,
            round: 0,
            remaining_frames: 0,
            p1: CharacterState::default(),
            p2: CharacterState::default(),
            empty: true,
        }
    }

    /// State of the character on `side`.
    pub const fn character(&self, side: Side) -> &CharacterState {
        match side {
            Side::P1 => &self.p1,
            Side::P2 => &self.p2,
        }
    }

    /// Facing of the character on `side`.
    pub const fn facing(&self, side: Side) -> Facing {
        self.character(side).facing
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::neutral()
    }
}

/// The rendered frame that accompanies a snapshot.
///
/// Pixel data is shared behind an [`Arc`] so handing the latest capture to
/// the agent each tick is a reference-count bump, not a copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenCapture {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Raw pixel bytes, row-major, in the engine's native format.
    pub pixels: Arc<[u8]>,
}

impl ScreenCapture {
    /// Wrap raw pixel bytes.
    pub fn new(width: u32, height: u32, pixels: impl Into<Arc<[u8]>>) -> Self {
        Self {
            width,
            height,
            pixels: pixels.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Match-level data
// ---------------------------------------------------------------------------

/// Per-side constants of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FighterInfo {
    /// Name of the character being played.
    pub character_name: String,
    /// Name of the agent driving the character.
    pub agent_name: String,
    /// Hit points at round start.
    pub max_hp: i32,
    /// Energy gauge ceiling.
    pub max_energy: i32,
}

/// Immutable per-match constants, delivered once at controller start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticMatchInfo {
    /// Identifier of this match.
    pub match_id: MatchId,
    /// Stage width in pixels.
    pub stage_width: u32,
    /// Stage height in pixels.
    pub stage_height: u32,
    /// Player one's constants.
    pub p1: FighterInfo,
    /// Player two's constants.
    pub p2: FighterInfo,
}

impl StaticMatchInfo {
    /// Constants for the fighter on `side`.
    pub const fn fighter(&self, side: Side) -> &FighterInfo {
        match side {
            Side::P1 => &self.p1,
            Side::P2 => &self.p2,
        }
    }
}

/// Summary of a finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    /// Round number (1-based).
    pub round: u32,
    /// Player one's remaining hit points.
    pub p1_hp: i32,
    /// Player two's remaining hit points.
    pub p2_hp: i32,
    /// Frames the round lasted.
    pub elapsed_frames: u32,
}

impl RoundResult {
    /// Remaining hit points of `side`.
    pub const fn remaining_hp(&self, side: Side) -> i32 {
        match side {
            Side::P1 => self.p1_hp,
            Side::P2 => self.p2_hp,
        }
    }
}
