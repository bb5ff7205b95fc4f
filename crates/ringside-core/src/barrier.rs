//! Tick barrier shared by the engine and both agent controllers.
//!
//! The engine owns the barrier. Each tick it calls [`TickGate::release`],
//! which bumps a generation counter and wakes every parked controller, then
//! [`TickGate::collect`] to wait until every participating side has called
//! [`TickBarrier::complete`]. Controllers remember the last generation they
//! served, so a release that lands while a controller is still deciding is
//! picked up on its next wait instead of being lost.
//!
//! Controllers see the barrier only through the [`TickBarrier`] trait so a
//! host can plug in its own release/collect primitive.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use ringside_types::Side;

/// Outcome of waiting on the barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSignal {
    /// The engine released a new tick; carries its generation.
    Advanced(u64),
    /// The waiter's stop condition became true.
    Stopped,
}

/// The controller-facing half of the tick barrier.
pub trait TickBarrier: Send + Sync {
    /// Block until the generation moves past `seen` or `should_stop`
    /// returns `true`, whichever comes first.
    ///
    /// Wake-ups that satisfy neither condition are retried internally.
    fn wait_for_tick(&self, seen: u64, should_stop: &dyn Fn() -> bool) -> TickSignal;

    /// Wake every parked waiter so it re-checks its stop condition.
    fn interrupt(&self);

    /// Report that `side` finished the current tick.
    fn complete(&self, side: Side);

    /// Report that `side` will not complete any further ticks.
    fn detach(&self, side: Side);
}

/// Mutable barrier state, guarded by [`TickGate::state`].
#[derive(Debug, Default)]
struct GateState {
    /// Number of ticks released so far.
    generation: u64,
    /// Whether player one takes part in ticks.
    p1_joined: bool,
    /// Whether player two takes part in ticks.
    p2_joined: bool,
    /// Whether player one still owes a completion for the current tick.
    p1_pending: bool,
    /// Whether player two still owes a completion for the current tick.
    p2_pending: bool,
}

impl GateState {
    const fn joined_mut(&mut self, side: Side) -> &mut bool {
        match side {
            Side::P1 => &mut self.p1_joined,
            Side::P2 => &mut self.p2_joined,
        }
    }

    const fn pending_mut(&mut self, side: Side) -> &mut bool {
        match side {
            Side::P1 => &mut self.p1_pending,
            Side::P2 => &mut self.p2_pending,
        }
    }

    const fn pending(&self, side: Side) -> bool {
        match side {
            Side::P1 => self.p1_pending,
            Side::P2 => self.p2_pending,
        }
    }

    const fn any_pending(&self) -> bool {
        self.p1_pending || self.p2_pending
    }
}

/// Condition-variable implementation of the tick barrier.
#[derive(Debug, Default)]
pub struct TickGate {
    /// Generation counter and per-side bookkeeping.
    state: Mutex<GateState>,
    /// Signalled on every release and interrupt.
    advanced: Condvar,
    /// Signalled whenever a side completes or detaches.
    completed: Condvar,
}

impl TickGate {
    /// Create a gate whose ticks wait on the given sides.
    pub fn new(participants: &[Side]) -> Self {
        let mut state = GateState::default();
        for &side in participants {
            *state.joined_mut(side) = true;
        }
        Self {
            state: Mutex::new(state),
            advanced: Condvar::new(),
            completed: Condvar::new(),
        }
    }

    /// Create a gate for both sides.
    pub fn for_both_sides() -> Self {
        Self::new(&Side::ALL)
    }

    /// Release the next tick to every waiting controller.
    ///
    /// Returns the new generation.
    pub fn release(&self) -> u64 {
        let mut state = self.lock();
        state.generation = state.generation.saturating_add(1);
        state.p1_pending = state.p1_joined;
        state.p2_pending = state.p2_joined;
        let generation = state.generation;
        drop(state);
        self.advanced.notify_all();
        generation
    }

    /// Block until every participating side has completed the current tick.
    pub fn collect(&self) {
        let state = self.lock();
        let _state = self
            .completed
            .wait_while(state, |state| state.any_pending())
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Like [`collect`](Self::collect) but gives up after `timeout`.
    ///
    /// Returns `true` if every side completed in time.
    pub fn collect_timeout(&self, timeout: Duration) -> bool {
        let state = self.lock();
        let (state, _timed_out) = self
            .completed
            .wait_timeout_while(state, timeout, |state| state.any_pending())
            .unwrap_or_else(PoisonError::into_inner);
        !state.any_pending()
    }

    /// Number of ticks released so far.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Whether `side` still owes a completion for the current tick.
    pub fn is_pending(&self, side: Side) -> bool {
        self.lock().pending(side)
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TickBarrier for TickGate {
    fn wait_for_tick(&self, seen: u64, should_stop: &dyn Fn() -> bool) -> TickSignal {
        let mut state = self.lock();
        loop {
            if should_stop() {
                return TickSignal::Stopped;
            }
            if state.generation > seen {
                return TickSignal::Advanced(state.generation);
            }
            state = self
                .advanced
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn interrupt(&self) {
        // Taking the lock orders this wake after any waiter's stop check.
        let _state = self.lock();
        self.advanced.notify_all();
    }

    fn complete(&self, side: Side) {
        let mut state = self.lock();
        *state.pending_mut(side) = false;
        drop(state);
        self.completed.notify_all();
    }

    fn detach(&self, side: Side) {
        let mut state = self.lock();
        *state.joined_mut(side) = false;
        *state.pending_mut(side) = false;
        drop(state);
        self.completed.notify_all();
    }
}
