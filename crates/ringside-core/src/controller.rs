//! Per-side agent controller.
//!
//! A controller owns one dedicated thread that runs the decision cycle:
//!
//! 1. park on the [`TickBarrier`] until the engine releases a tick (or the
//!    controller is terminated),
//! 2. pop the oldest snapshot from the [`SnapshotBuffer`],
//! 3. hand it and the latest screen capture to the agent,
//! 4. ask the agent for a [`KeyPair`],
//! 5. publish that pair and report completion to the barrier.
//!
//! Engine-facing calls ([`get_input`], [`set_frame_data`],
//! [`set_screen_data`], [`inform_round_result`], [`clear`], [`game_end`])
//! and the publish step share one lock. The agent's decision runs outside
//! it, so the engine can keep feeding snapshots while a slow agent thinks.
//! Round-end and shutdown hooks need the agent too; they never hold the
//! state lock while waiting for it, and [`game_end`] hands the shutdown
//! hook to the controller thread instead of waiting on a busy agent.
//! A slow agent only delays its own completion signal; nothing here
//! enforces a deadline.
//!
//! [`KeyPair`] is `Copy`: the published value is a private copy of what the
//! agent returned, never a view into agent-owned memory.
//!
//! [`get_input`]: AgentController::get_input
//! [`set_frame_data`]: AgentController::set_frame_data
//! [`set_screen_data`]: AgentController::set_screen_data
//! [`inform_round_result`]: AgentController::inform_round_result
//! [`clear`]: AgentController::clear
//! [`game_end`]: AgentController::game_end

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use ringside_types::{
    KeyPair, RoundResult, ScreenCapture, Side, Snapshot, StaticMatchInfo,
};
use tracing::{debug, info, info_span, trace, warn};

use crate::agent::{AgentError, AgentPolicy};
use crate::barrier::{TickBarrier, TickSignal};
use crate::buffer::SnapshotBuffer;

/// Errors that can occur while starting or stopping a controller.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// [`AgentController::initialize`] was called more than once.
    #[error("controller for {side} is already initialized")]
    AlreadyInitialized {
        /// The controller's side.
        side: Side,
    },

    /// The agent's one-time setup failed.
    #[error("agent setup for {side} failed: {source}")]
    Setup {
        /// The controller's side.
        side: Side,
        /// The agent's error.
        #[source]
        source: AgentError,
    },

    /// The controller thread could not be spawned.
    #[error("failed to spawn controller thread for {side}: {source}")]
    Spawn {
        /// The controller's side.
        side: Side,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The controller thread panicked outside the guarded decision hook.
    #[error("controller thread for {side} panicked")]
    ThreadPanicked {
        /// The controller's side.
        side: Side,
    },
}

/// How often [`AgentController::join_timeout`] checks the thread.
const JOIN_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Lifecycle phase of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    /// Created, not yet initialized.
    Uninitialized,
    /// Initialized; the thread is starting.
    Ready,
    /// Parked on the barrier.
    WaitingForTick,
    /// The agent is deciding.
    Deciding,
    /// Publishing the decision.
    Publishing,
    /// [`AgentController::game_end`] was called.
    Terminated,
}

/// State shared between the engine thread and the controller thread,
/// guarded by [`Shared::state`].
struct ControllerState {
    /// Current lifecycle phase.
    phase: ControllerPhase,
    /// Delayed snapshots awaiting delivery.
    frames: SnapshotBuffer,
    /// Latest screen capture from the engine.
    screen: Option<ScreenCapture>,
    /// Last published input; `None` until the first publish.
    published: Option<KeyPair>,
    /// Barrier bound at initialization.
    barrier: Option<Arc<dyn TickBarrier>>,
    /// Completed decision iterations.
    ticks_processed: u64,
}

/// Everything the controller thread needs, reference-counted.
struct Shared {
    /// The side this controller plays.
    side: Side,
    /// Engine-visible state; the per-controller lock.
    state: Mutex<ControllerState>,
    /// The agent. Locked separately so deciding does not hold `state`.
    agent: Mutex<Box<dyn AgentPolicy>>,
    /// Set once by `game_end`; read by the loop without locking.
    terminated: AtomicBool,
    /// `game_end` found the agent busy; the loop runs the shutdown hook.
    shutdown_pending: AtomicBool,
    /// The shutdown hook has run.
    shutdown_done: AtomicBool,
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_agent(&self) -> MutexGuard<'_, Box<dyn AgentPolicy>> {
        self.agent.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }

    /// Run the shutdown hook unless it already ran. Caller holds the agent.
    fn shutdown_agent(&self, agent: &mut dyn AgentPolicy) {
        if !self.shutdown_done.swap(true, Ordering::SeqCst) {
            agent.on_shutdown();
            debug!(side = %self.side, "agent shut down");
        }
    }

    /// Run the shutdown hook now if no decision holds the agent.
    fn try_shutdown_agent(&self) -> bool {
        match self.agent.try_lock() {
            Ok(mut agent) => {
                self.shutdown_agent(&mut **agent);
                true
            }
            Err(TryLockError::Poisoned(poisoned)) => {
                let mut agent = poisoned.into_inner();
                self.shutdown_agent(&mut **agent);
                true
            }
            Err(TryLockError::WouldBlock) => false,
        }
    }

    /// Move to `phase` unless the controller has already terminated.
    fn transition(&self, phase: ControllerPhase) {
        let mut state = self.lock_state();
        if state.phase != ControllerPhase::Terminated {
            state.phase = phase;
        }
    }
}

/// Drives one agent through the tick-synchronized decision cycle.
pub struct AgentController {
    /// State shared with the controller thread.
    shared: Arc<Shared>,
    /// The controller thread, once spawned.
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl AgentController {
    /// Create a controller for `side` whose snapshot buffer delays input
    /// by `input_delay` ticks.
    pub fn new(side: Side, agent: Box<dyn AgentPolicy>, input_delay: usize) -> Self {
        let state = ControllerState {
            phase: ControllerPhase::Uninitialized,
            frames: SnapshotBuffer::new(input_delay),
            screen: None,
            published: None,
            barrier: None,
            ticks_processed: 0,
        };
        Self {
            shared: Arc::new(Shared {
                side,
                state: Mutex::new(state),
                agent: Mutex::new(agent),
                terminated: AtomicBool::new(false),
                shutdown_pending: AtomicBool::new(false),
                shutdown_done: AtomicBool::new(false),
            }),
            handle: Mutex::new(None),
        }
    }

    /// Bind the barrier, reset buffered state, run the agent's setup, and
    /// start the controller thread.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::AlreadyInitialized`] on a second call,
    /// [`ControllerError::Setup`] if the agent's setup fails, or
    /// [`ControllerError::Spawn`] if the thread cannot be started.
    pub fn initialize(
        &self,
        barrier: Arc<dyn TickBarrier>,
        info: &StaticMatchInfo,
    ) -> Result<(), ControllerError> {
        let side = self.shared.side;
        {
            let mut state = self.shared.lock_state();
            if state.phase != ControllerPhase::Uninitialized {
                return Err(ControllerError::AlreadyInitialized { side });
            }
            state.barrier = Some(Arc::clone(&barrier));
            state.frames.reset();
            state.screen = None;
            state.published = None;
        }

        self.shared
            .lock_agent()
            .initialize(info, side)
            .map_err(|source| ControllerError::Setup { side, source })?;
        self.shared.transition(ControllerPhase::Ready);

        let shared = Arc::clone(&self.shared);
        let match_id = info.match_id;
        let handle = thread::Builder::new()
            .name(format!("ringside-{side}"))
            .spawn(move || {
                let span = info_span!("controller", side = %side, match_id = %match_id);
                let _entered = span.enter();
                run_loop(&shared, barrier.as_ref());
            })
            .map_err(|source| ControllerError::Spawn { side, source })?;

        *self.handle.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
        info!(%side, %match_id, "controller initialized");
        Ok(())
    }

    /// The most recently published input, or neutral before the first
    /// publish.
    pub fn get_input(&self) -> KeyPair {
        self.shared
            .lock_state()
            .published
            .unwrap_or(KeyPair::NEUTRAL)
    }

    /// Buffer the engine's snapshot for this tick; `None` buffers a
    /// neutral snapshot.
    pub fn set_frame_data(&self, snapshot: Option<Snapshot>) {
        self.shared
            .lock_state()
            .frames
            .push(snapshot.unwrap_or_default());
    }

    /// Store the latest screen capture for the next decision.
    pub fn set_screen_data(&self, capture: ScreenCapture) {
        self.shared.lock_state().screen = Some(capture);
    }

    /// Forward a round result to the agent.
    ///
    /// Waits for an in-flight decision to finish. Other engine-facing calls
    /// are not blocked meanwhile.
    pub fn inform_round_result(&self, result: &RoundResult) {
        info!(
            side = %self.shared.side,
            round = result.round,
            p1_hp = result.p1_hp,
            p2_hp = result.p2_hp,
            elapsed_frames = result.elapsed_frames,
            "round result"
        );
        self.shared
            .lock_agent()
            .on_round_end(result.p1_hp, result.p2_hp, result.elapsed_frames);
    }

    /// Refill the snapshot buffer with neutral snapshots (round reset).
    pub fn clear(&self) {
        self.shared.lock_state().frames.reset();
    }

    /// Stop the controller: no further ticks are processed, a parked
    /// thread is woken, and the agent's shutdown hook runs once.
    ///
    /// Never waits on the agent. An in-flight decision finishes and is
    /// still published; the shutdown hook then runs on the controller
    /// thread as it exits. Calling this again is a no-op.
    pub fn game_end(&self) {
        let (was_initialized, ticks_processed) = {
            let mut state = self.shared.lock_state();
            if state.phase == ControllerPhase::Terminated {
                return;
            }
            let was_initialized = state.phase != ControllerPhase::Uninitialized;
            self.shared.terminated.store(true, Ordering::SeqCst);
            state.phase = ControllerPhase::Terminated;
            if let Some(barrier) = &state.barrier {
                barrier.interrupt();
            }
            (was_initialized, state.ticks_processed)
        };

        if was_initialized && !self.shared.try_shutdown_agent() {
            self.shared.shutdown_pending.store(true, Ordering::SeqCst);
            // The loop may have released the agent and checked the flag
            // between the two calls.
            self.shared.try_shutdown_agent();
        }
        info!(
            side = %self.shared.side,
            ticks_processed,
            "controller terminated"
        );
    }

    /// Wait for the controller thread to exit.
    ///
    /// Returns immediately if the thread was never started or has already
    /// been joined. Call [`game_end`](Self::game_end) first, or this blocks
    /// for the rest of the match.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::ThreadPanicked`] if the thread panicked.
    pub fn join(&self) -> Result<(), ControllerError> {
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match handle {
            Some(handle) => handle.join().map_err(|_panic| ControllerError::ThreadPanicked {
                side: self.shared.side,
            }),
            None => Ok(()),
        }
    }

    /// Like [`join`](Self::join) but gives up after `timeout`.
    ///
    /// Returns `Ok(false)` if the thread is still running, for example
    /// because its agent is stuck in a decision. The handle is kept, so
    /// the thread can still be joined later.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::ThreadPanicked`] if the thread panicked.
    pub fn join_timeout(&self, timeout: Duration) -> Result<bool, ControllerError> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.join().map(|()| true);
        };
        loop {
            let finished = self
                .handle
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .as_ref()
                .is_none_or(JoinHandle::is_finished);
            if finished {
                return self.join().map(|()| true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            thread::sleep(JOIN_POLL_INTERVAL);
        }
    }

    /// The side this controller plays.
    pub fn side(&self) -> Side {
        self.shared.side
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> ControllerPhase {
        self.shared.lock_state().phase
    }

    /// Number of completed decision iterations.
    pub fn ticks_processed(&self) -> u64 {
        self.shared.lock_state().ticks_processed
    }

    /// Number of snapshots currently buffered.
    pub fn buffered_frames(&self) -> usize {
        self.shared.lock_state().frames.len()
    }
}

impl Drop for AgentController {
    fn drop(&mut self) {
        // Lets the thread exit; it is not joined here.
        self.game_end();
    }
}

impl std::fmt::Debug for AgentController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentController")
            .field("side", &self.shared.side)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

/// The controller thread body.
fn run_loop(shared: &Shared, barrier: &dyn TickBarrier) {
    let side = shared.side;
    let should_stop = || shared.is_terminated();
    let mut seen = 0_u64;
    info!("controller loop started");

    loop {
        shared.transition(ControllerPhase::WaitingForTick);
        let tick = match barrier.wait_for_tick(seen, &should_stop) {
            TickSignal::Advanced(generation) => generation,
            TickSignal::Stopped => break,
        };
        seen = tick;

        let (snapshot, screen) = {
            let mut state = shared.lock_state();
            if state.phase != ControllerPhase::Terminated {
                state.phase = ControllerPhase::Deciding;
            }
            (state.frames.pop(), state.screen.clone())
        };

        let keys = {
            let mut agent = shared.lock_agent();
            // Checked under the agent lock: once game_end has run the
            // shutdown hook, no further decisions may start.
            if should_stop() {
                break;
            }
            guarded_decide(&mut **agent, side, tick, &snapshot, screen.as_ref())
        };

        {
            let mut state = shared.lock_state();
            if state.phase != ControllerPhase::Terminated {
                state.phase = ControllerPhase::Publishing;
            }
            state.published = Some(keys);
            state.ticks_processed = state.ticks_processed.saturating_add(1);
        }
        barrier.complete(side);
        trace!(tick, frame = snapshot.frame_number, ?keys, "input published");
    }

    barrier.detach(side);
    if shared.shutdown_pending.load(Ordering::SeqCst) {
        let mut agent = shared.lock_agent();
        shared.shutdown_agent(&mut **agent);
    }
    shared.transition(ControllerPhase::Terminated);
    info!("controller loop exited");
}

/// Run the agent's tick hooks, masking any failure as neutral input.
fn guarded_decide(
    agent: &mut dyn AgentPolicy,
    side: Side,
    tick: u64,
    snapshot: &Snapshot,
    screen: Option<&ScreenCapture>,
) -> KeyPair {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        agent.on_tick(snapshot, screen);
        agent.decide()
    }));

    match outcome {
        Ok(Ok(keys)) => keys,
        Ok(Err(e)) => {
            warn!(%side, tick, error = %e, "decision failed, publishing neutral input");
            KeyPair::NEUTRAL
        }
        Err(payload) => {
            warn!(
                %side,
                tick,
                panic = panic_message(payload.as_ref()),
                "decision panicked, publishing neutral input"
            );
            KeyPair::NEUTRAL
        }
    }
}

/// Best-effort text of a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ringside_types::{FighterInfo, MatchId};

    use super::*;
    use crate::agent::IdlePolicy;
    use crate::barrier::TickGate;

    fn match_info() -> StaticMatchInfo {
        let fighter = FighterInfo {
            character_name: "ZEN".to_owned(),
            agent_name: "idle".to_owned(),
            max_hp: 400,
            max_energy: 300,
        };
        StaticMatchInfo {
            match_id: MatchId::new(),
            stage_width: 960,
            stage_height: 640,
            p1: fighter.clone(),
            p2: fighter,
        }
    }

    #[test]
    fn input_is_neutral_before_first_publish() {
        let controller = AgentController::new(Side::P1, Box::new(IdlePolicy::new()), 15);
        assert_eq!(controller.get_input(), KeyPair::NEUTRAL);
        assert_eq!(controller.phase(), ControllerPhase::Uninitialized);
    }

    #[test]
    fn initialize_prefills_buffer_and_rejects_second_call() {
        let gate: Arc<dyn TickBarrier> = Arc::new(TickGate::new(&[Side::P1]));
        let controller = AgentController::new(Side::P1, Box::new(IdlePolicy::new()), 15);
        controller.initialize(Arc::clone(&gate), &match_info()).unwrap();
        assert_eq!(controller.buffered_frames(), 15);

        let err = controller.initialize(gate, &match_info()).unwrap_err();
        assert!(matches!(err, ControllerError::AlreadyInitialized { side: Side::P1 }));

        controller.game_end();
        controller.join().unwrap();
        assert_eq!(controller.phase(), ControllerPhase::Terminated);
    }

    #[test]
    fn set_frame_data_none_buffers_neutral_snapshot() {
        let controller = AgentController::new(Side::P2, Box::new(IdlePolicy::new()), 3);
        controller.set_frame_data(None);
        controller.set_frame_data(Some(Snapshot {
            frame_number: 7,
            empty: false,
            ..Snapshot::neutral()
        }));
        assert_eq!(controller.buffered_frames(), 2);
        controller.clear();
        assert_eq!(controller.buffered_frames(), 3);
    }

    #[test]
    fn game_end_before_initialize_is_harmless() {
        let controller = AgentController::new(Side::P1, Box::new(IdlePolicy::new()), 15);
        controller.game_end();
        controller.game_end();
        assert_eq!(controller.phase(), ControllerPhase::Terminated);
        assert!(controller.join().is_ok());
    }

    #[test]
    fn panic_message_reads_str_and_string_payloads() {
        let literal: Box<dyn Any + Send> = Box::new("boom");
        let owned: Box<dyn Any + Send> = Box::new(String::from("bang"));
        let other: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(literal.as_ref()), "boom");
        assert_eq!(panic_message(owned.as_ref()), "bang");
        assert_eq!(panic_message(other.as_ref()), "non-string panic payload");
    }
}
