//! Input-latency snapshot buffer.
//!
//! The engine pushes one snapshot per tick; the controller pops one per
//! tick. Because the buffer is pre-filled to capacity with neutral
//! snapshots and trimmed back to capacity after every push, the snapshot an
//! agent decides on trails the engine by a fixed number of ticks regardless
//! of how fast the agent is.

use std::collections::VecDeque;

use ringside_types::Snapshot;

/// Default buffer capacity, in ticks.
pub const DEFAULT_INPUT_DELAY: usize = 15;

/// Bounded FIFO of snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotBuffer {
    /// Buffered snapshots, oldest at the front.
    frames: VecDeque<Snapshot>,
    /// Maximum number of buffered snapshots (always at least 1).
    capacity: usize,
}

impl SnapshotBuffer {
    /// Create an empty buffer holding at most `capacity` snapshots.
    ///
    /// A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            frames: VecDeque::with_capacity(capacity.saturating_add(1)),
            capacity,
        }
    }

    /// Append a snapshot, evicting the oldest ones beyond capacity.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.frames.push_back(snapshot);
        while self.frames.len() > self.capacity {
            self.frames.pop_front();
        }
    }

    /// Remove and return the oldest snapshot, or a neutral one if empty.
    pub fn pop(&mut self) -> Snapshot {
        self.frames.pop_front().unwrap_or_default()
    }

    /// Discard everything and pre-fill with `capacity` neutral snapshots.
    pub fn reset(&mut self) {
        self.frames.clear();
        self.frames.resize_with(self.capacity, Snapshot::neutral);
    }

    /// Number of buffered snapshots.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the buffer holds nothing.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Maximum number of buffered snapshots.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for SnapshotBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(n: u32) -> Snapshot {
        Snapshot {
            frame_number: n,
            round: 1,
            empty: false,
            ..Snapshot::neutral()
        }
    }

    #[test]
    fn holds_min_of_pushes_and_capacity() {
        for pushes in 0..40_u32 {
            let mut buffer = SnapshotBuffer::new(DEFAULT_INPUT_DELAY);
            for n in 0..pushes {
                buffer.push(frame(n));
            }
            let expected = usize::try_from(pushes).unwrap_or(usize::MAX).min(DEFAULT_INPUT_DELAY);
            assert_eq!(buffer.len(), expected, "after {pushes} pushes");
        }
    }

    #[test]
    fn pops_in_push_order() {
        let mut buffer = SnapshotBuffer::new(4);
        for n in 1..=3 {
            buffer.push(frame(n));
        }
        assert_eq!(buffer.pop().frame_number, 1);
        assert_eq!(buffer.pop().frame_number, 2);
        assert_eq!(buffer.pop().frame_number, 3);
    }

    #[test]
    fn overflow_evicts_oldest() {
        let mut buffer = SnapshotBuffer::new(3);
        for n in 1..=5 {
            buffer.push(frame(n));
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.pop().frame_number, 3);
        assert_eq!(buffer.pop().frame_number, 4);
        assert_eq!(buffer.pop().frame_number, 5);
    }

    #[test]
    fn pop_on_empty_yields_neutral() {
        let mut buffer = SnapshotBuffer::new(2);
        let snapshot = buffer.pop();
        assert!(snapshot.empty);
        assert!(buffer.is_empty());
    }

    #[test]
    fn reset_prefills_neutral_frames() {
        let mut buffer = SnapshotBuffer::new(DEFAULT_INPUT_DELAY);
        buffer.push(frame(9));
        buffer.reset();
        assert_eq!(buffer.len(), DEFAULT_INPUT_DELAY);
        for _ in 0..DEFAULT_INPUT_DELAY {
            assert!(buffer.pop().empty);
        }
        assert!(buffer.is_empty());
    }

    #[test]
    fn steady_state_trails_by_capacity() {
        // After a reset, each push-then-pop tick returns the snapshot pushed
        // `capacity - 1` ticks earlier: the push trims the oldest padding.
        let mut buffer = SnapshotBuffer::new(3);
        buffer.reset();
        let mut popped = Vec::new();
        for n in 1..=6 {
            buffer.push(frame(n));
            popped.push(buffer.pop());
        }
        let numbers: Vec<_> = popped.iter().map(|s| (s.empty, s.frame_number)).collect();
        assert_eq!(
            numbers,
            vec![(true, 0), (true, 0), (false, 1), (false, 2), (false, 3), (false, 4)]
        );
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut buffer = SnapshotBuffer::new(0);
        assert_eq!(buffer.capacity(), 1);
        buffer.push(frame(1));
        buffer.push(frame(2));
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.pop().frame_number, 2);
    }
}
