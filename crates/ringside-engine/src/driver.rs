//! Dry-run match driver.
//!
//! Plays the engine's side of the tick protocol without a real game: it
//! wires two [`AgentController`]s to a [`TickGate`], feeds them synthetic
//! snapshots (fixed positions, fighters facing each other, no rules or
//! physics), and reads back their inputs. Useful for exercising agents and
//! the controller end to end.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use ringside_core::config::{MatchConfig, PolicyKind, StageConfig};
use ringside_core::{AgentController, RingsideConfig, TickBarrier, TickGate};
use ringside_types::{
    CharacterState, Facing, FighterInfo, MatchId, RoundResult, ScreenCapture, Side, Snapshot,
    StaticMatchInfo,
};
use tracing::{debug, info, warn};

use crate::error::EngineError;
use crate::policies;

/// Width of the blank screen capture handed to agents.
const SCREEN_WIDTH: u32 = 96;
/// Height of the blank screen capture handed to agents.
const SCREEN_HEIGHT: u32 = 64;
/// Byte length of the blank grayscale capture.
const SCREEN_BYTES: usize = 96 * 64;

/// Shared stop flag and wall-clock start of a match run.
#[derive(Debug)]
pub struct MatchControl {
    /// Whether a stop has been requested.
    stop_requested: AtomicBool,
    /// Wall-clock time when the run started.
    started_at: DateTime<Utc>,
}

impl MatchControl {
    /// Create control state for a run starting now.
    pub fn new() -> Self {
        Self {
            stop_requested: AtomicBool::new(false),
            started_at: Utc::now(),
        }
    }

    /// Request a clean stop before the next tick.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Milliseconds since the run started.
    pub fn elapsed_ms(&self) -> u64 {
        let elapsed = Utc::now()
            .signed_duration_since(self.started_at)
            .num_milliseconds();
        u64::try_from(elapsed.max(0)).unwrap_or(u64::MAX)
    }
}

impl Default for MatchControl {
    fn default() -> Self {
        Self::new()
    }
}

/// Why a match run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEndReason {
    /// Every configured round was played.
    Completed,
    /// A stop was requested (Ctrl-C).
    OperatorStop,
}

/// Outcome of a match run.
#[derive(Debug)]
pub struct MatchSummary {
    /// Identifier of the match.
    pub match_id: MatchId,
    /// The reason the run ended.
    pub end_reason: MatchEndReason,
    /// Rounds played to completion.
    pub rounds_played: u32,
    /// Ticks released and collected.
    pub total_ticks: u64,
    /// Per-round results, in order.
    pub round_results: Vec<RoundResult>,
    /// Ticks on which P1 held at least one key.
    pub p1_active_ticks: u64,
    /// Ticks on which P2 held at least one key.
    pub p2_active_ticks: u64,
    /// Wall-clock duration of the run.
    pub elapsed_ms: u64,
}

impl MatchSummary {
    const fn record_active(&mut self, side: Side) {
        let counter = match side {
            Side::P1 => &mut self.p1_active_ticks,
            Side::P2 => &mut self.p2_active_ticks,
        };
        *counter = counter.saturating_add(1);
    }
}

/// Run a full match with the configured policies.
///
/// Blocks the calling thread; run it on a blocking task from async code.
/// Both controllers are terminated and joined before this returns.
///
/// # Errors
///
/// Returns [`EngineError::Controller`] if a controller fails to start or
/// its thread panics.
pub fn run_match(
    config: &RingsideConfig,
    control: &MatchControl,
) -> Result<MatchSummary, EngineError> {
    let settings = &config.match_settings;
    let match_id = MatchId::new();
    let info = static_match_info(match_id, &config.stage, settings);
    let gate = Arc::new(TickGate::for_both_sides());

    let controllers = Side::ALL.map(|side| {
        let kind = policy_kind(settings, side);
        AgentController::new(
            side,
            policies::build_policy(kind, settings, side),
            config.controller.input_delay_frames,
        )
    });
    for controller in &controllers {
        let barrier: Arc<dyn TickBarrier> = gate.clone();
        controller.initialize(barrier, &info)?;
    }

    info!(
        %match_id,
        rounds = settings.rounds,
        frames_per_round = settings.frames_per_round,
        p1_policy = ?settings.p1_policy,
        p2_policy = ?settings.p2_policy,
        "Match starting"
    );

    let screen = ScreenCapture::new(SCREEN_WIDTH, SCREEN_HEIGHT, vec![0_u8; SCREEN_BYTES]);
    let timeout = Duration::from_millis(settings.collect_timeout_ms.max(1));
    let mut summary = MatchSummary {
        match_id,
        end_reason: MatchEndReason::Completed,
        rounds_played: 0,
        total_ticks: 0,
        round_results: Vec::new(),
        p1_active_ticks: 0,
        p2_active_ticks: 0,
        elapsed_ms: 0,
    };

    'rounds: for round in 1..=settings.rounds {
        for frame in 0..settings.frames_per_round {
            if control.is_stop_requested() {
                summary.end_reason = MatchEndReason::OperatorStop;
                break 'rounds;
            }

            let snapshot =
                synthetic_snapshot(&config.stage, round, frame, settings.frames_per_round);
            for controller in &controllers {
                controller.set_frame_data(Some(snapshot.clone()));
                controller.set_screen_data(screen.clone());
            }

            let tick = gate.release();
            if !wait_for_controllers(&gate, timeout, control, tick) {
                summary.end_reason = MatchEndReason::OperatorStop;
                break 'rounds;
            }
            summary.total_ticks = summary.total_ticks.saturating_add(1);

            for controller in &controllers {
                let side = controller.side();
                if !controller.get_input().get(side).is_neutral() {
                    summary.record_active(side);
                }
            }
        }

        let result = RoundResult {
            round,
            p1_hp: config.stage.max_hp,
            p2_hp: config.stage.max_hp,
            elapsed_frames: settings.frames_per_round,
        };
        for controller in &controllers {
            controller.inform_round_result(&result);
            controller.clear();
        }
        info!(round, "Round finished");
        summary.round_results.push(result);
        summary.rounds_played = round;
    }

    for controller in &controllers {
        controller.game_end();
    }
    for controller in &controllers {
        if summary.end_reason == MatchEndReason::Completed {
            controller.join()?;
        } else if !controller.join_timeout(timeout)? {
            warn!(
                side = %controller.side(),
                "Controller still deciding, leaving its thread behind"
            );
        }
    }

    summary.elapsed_ms = control.elapsed_ms();
    Ok(summary)
}

/// Collect the current tick, polling the stop flag between timeouts.
///
/// Returns `false` if a stop was requested before both sides completed.
fn wait_for_controllers(
    gate: &TickGate,
    timeout: Duration,
    control: &MatchControl,
    tick: u64,
) -> bool {
    loop {
        if gate.collect_timeout(timeout) {
            return true;
        }
        if control.is_stop_requested() {
            warn!(tick, "Stop requested while controllers were still deciding");
            return false;
        }
        debug!(
            tick,
            p1_pending = gate.is_pending(Side::P1),
            p2_pending = gate.is_pending(Side::P2),
            "Controllers still deciding"
        );
    }
}

/// The configured policy for `side`.
const fn policy_kind(settings: &MatchConfig, side: Side) -> PolicyKind {
    match side {
        Side::P1 => settings.p1_policy,
        Side::P2 => settings.p2_policy,
    }
}

/// Match constants handed to both controllers at initialization.
fn static_match_info(
    match_id: MatchId,
    stage: &StageConfig,
    settings: &MatchConfig,
) -> StaticMatchInfo {
    let fighter = |character: &str, side: Side| FighterInfo {
        character_name: character.to_owned(),
        agent_name: policies::policy_name(policy_kind(settings, side)).to_owned(),
        max_hp: stage.max_hp,
        max_energy: stage.max_energy,
    };
    StaticMatchInfo {
        match_id,
        stage_width: stage.width,
        stage_height: stage.height,
        p1: fighter(&stage.p1_character, Side::P1),
        p2: fighter(&stage.p2_character, Side::P2),
    }
}

/// Snapshot for `frame` of `round`: P1 on the left facing right, P2 on the
/// right facing left, both standing at full HP.
pub fn synthetic_snapshot(
    stage: &StageConfig,
    round: u32,
    frame: u32,
    frames_per_round: u32,
) -> Snapshot {
    let quarter = i32::try_from(stage.width / 4).unwrap_or(i32::MAX);
    let character = |x: i32, facing: Facing| CharacterState {
        x,
        y: 0,
        hp: stage.max_hp,
        energy: 0,
        action: "STAND".to_owned(),
        facing,
    };
    Snapshot {
        frame_number: frame,
        round,
        remaining_frames: frames_per_round.saturating_sub(frame),
        p1: character(quarter, Facing::Forward),
        p2: character(quarter.saturating_mul(3), Facing::Backward),
        empty: false,
    }
}

/// Log the outcome of a match run.
pub fn log_match_end(summary: &MatchSummary) {
    info!(
        match_id = %summary.match_id,
        reason = ?summary.end_reason,
        rounds_played = summary.rounds_played,
        total_ticks = summary.total_ticks,
        p1_active_ticks = summary.p1_active_ticks,
        p2_active_ticks = summary.p2_active_ticks,
        elapsed_ms = summary.elapsed_ms,
        "Match ended"
    );
    for result in &summary.round_results {
        info!(
            round = result.round,
            p1_hp = result.remaining_hp(Side::P1),
            p2_hp = result.remaining_hp(Side::P2),
            elapsed_frames = result.elapsed_frames,
            "Round summary"
        );
    }
    if summary.total_ticks == 0 {
        warn!("Match ended with no ticks executed");
    }
}
