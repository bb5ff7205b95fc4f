//! Per-side queues of pending key vectors.
//!
//! A side's queue is only filled while empty: once a move is committed it
//! plays out frame by frame until drained or cancelled, and further
//! [`CommandCenter::command_call`]s are ignored in the meantime.

use std::collections::VecDeque;

use ringside_types::{Action, Facing, KeyVector, Side, Snapshot};
use tracing::debug;

use super::notation;
use super::table;

/// Translates move names into queued key vectors for both sides.
#[derive(Debug, Clone, Default)]
pub struct CommandCenter {
    /// Pending keys for player one.
    p1_keys: VecDeque<KeyVector>,
    /// Pending keys for player two.
    p2_keys: VecDeque<KeyVector>,
    /// Player one's facing from the most recent snapshot.
    p1_facing: Facing,
    /// Player two's facing from the most recent snapshot.
    p2_facing: Facing,
}

impl CommandCenter {
    /// Create a translator with empty queues and both sides facing forward.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the expansion of `name` for `side` if nothing is pending.
    ///
    /// Recognized move names are looked up in the command table; any other
    /// string is parsed as literal notation. Returns `true` if the command
    /// was queued, `false` if an earlier command is still in flight.
    pub fn command_call(&mut self, name: &str, side: Side) -> bool {
        if !self.queue(side).is_empty() {
            return false;
        }

        let facing = self.facing(side);
        let frames = notation::expand(table::resolve(name), facing);
        debug!(%side, command = name, ?facing, frames = frames.len(), "command queued");
        self.queue_mut(side).extend(frames);
        true
    }

    /// Typed form of [`command_call`](Self::command_call).
    pub fn call_action(&mut self, action: Action, side: Side) -> bool {
        self.command_call(action.as_str(), side)
    }

    /// Take the next pending key for `side`, or neutral if none.
    pub fn next_skill_key(&mut self, side: Side) -> KeyVector {
        self.queue_mut(side).pop_front().unwrap_or_default()
    }

    /// Whether `side` has keys pending.
    pub fn skill_flag(&self, side: Side) -> bool {
        !self.queue(side).is_empty()
    }

    /// Copy of the keys pending for `side`, oldest first.
    pub fn skill_keys(&self, side: Side) -> Vec<KeyVector> {
        self.queue(side).iter().copied().collect()
    }

    /// Drop every key pending for `side`.
    pub fn skill_cancel(&mut self, side: Side) {
        let dropped = self.queue(side).len();
        self.queue_mut(side).clear();
        if dropped > 0 {
            debug!(%side, dropped, "command cancelled");
        }
    }

    /// Record both characters' facing for future expansions.
    ///
    /// Keys already queued keep the orientation they were expanded with.
    pub fn set_frame_data(&mut self, snapshot: &Snapshot) {
        self.p1_facing = snapshot.facing(Side::P1);
        self.p2_facing = snapshot.facing(Side::P2);
    }

    /// Facing that the next expansion for `side` will use.
    pub const fn facing(&self, side: Side) -> Facing {
        match side {
            Side::P1 => self.p1_facing,
            Side::P2 => self.p2_facing,
        }
    }

    /// Empty both queues (round reset).
    pub fn reset(&mut self) {
        self.p1_keys.clear();
        self.p2_keys.clear();
    }

    const fn queue(&self, side: Side) -> &VecDeque<KeyVector> {
        match side {
            Side::P1 => &self.p1_keys,
            Side::P2 => &self.p2_keys,
        }
    }

    const fn queue_mut(&mut self, side: Side) -> &mut VecDeque<KeyVector> {
        match side {
            Side::P1 => &mut self.p1_keys,
            Side::P2 => &mut self.p2_keys,
        }
    }
}

#[cfg(test)]
mod tests {
    use ringside_types::Key;

    use super::*;

    fn facing_snapshot(p1: Facing, p2: Facing) -> Snapshot {
        let mut snapshot = Snapshot::neutral();
        snapshot.p1.facing = p1;
        snapshot.p2.facing = p2;
        snapshot
    }

    fn drain(center: &mut CommandCenter, side: Side) -> Vec<KeyVector> {
        let mut keys = Vec::new();
        while center.skill_flag(side) {
            keys.push(center.next_skill_key(side));
        }
        keys
    }

    #[test]
    fn dash_respects_facing() {
        let mut center = CommandCenter::new();
        center.set_frame_data(&facing_snapshot(Facing::Forward, Facing::Backward));
        assert!(center.command_call("DASH", Side::P1));
        assert!(center.command_call("DASH", Side::P2));

        let right = KeyVector::from_keys(&[Key::Right]);
        let left = KeyVector::from_keys(&[Key::Left]);
        assert_eq!(drain(&mut center, Side::P1), vec![right, KeyVector::NEUTRAL, right]);
        assert_eq!(drain(&mut center, Side::P2), vec![left, KeyVector::NEUTRAL, left]);
    }

    #[test]
    fn throw_is_one_merged_frame() {
        let mut center = CommandCenter::new();
        center.call_action(Action::ThrowA, Side::P1);
        assert_eq!(
            center.skill_keys(Side::P1),
            vec![KeyVector::from_keys(&[Key::Left, Key::ButtonA])]
        );

        center.reset();
        center.set_frame_data(&facing_snapshot(Facing::Backward, Facing::Forward));
        center.call_action(Action::ThrowA, Side::P1);
        assert_eq!(
            center.skill_keys(Side::P1),
            vec![KeyVector::from_keys(&[Key::Right, Key::ButtonA])]
        );
    }

    #[test]
    fn flag_stays_set_until_sequence_drained() {
        let mut center = CommandCenter::new();
        assert!(!center.skill_flag(Side::P1));
        assert!(center.command_call("STAND_D_DF_FA", Side::P1));

        for _ in 0..3 {
            assert!(center.skill_flag(Side::P1));
            center.next_skill_key(Side::P1);
        }
        assert!(!center.skill_flag(Side::P1));
    }

    #[test]
    fn second_call_while_pending_is_ignored() {
        let mut center = CommandCenter::new();
        assert!(center.command_call("DASH", Side::P2));
        center.next_skill_key(Side::P2);
        let before = center.skill_keys(Side::P2);

        assert!(!center.command_call("STAND_A", Side::P2));
        assert_eq!(center.skill_keys(Side::P2), before);
    }

    #[test]
    fn cancel_clears_mid_sequence() {
        let mut center = CommandCenter::new();
        center.command_call("STAND_F_D_DFB", Side::P1);
        center.next_skill_key(Side::P1);
        center.skill_cancel(Side::P1);
        assert!(!center.skill_flag(Side::P1));
        assert!(center.next_skill_key(Side::P1).is_neutral());
        assert!(center.command_call("JUMP", Side::P1));
    }

    #[test]
    fn facing_change_does_not_touch_queued_keys() {
        let mut center = CommandCenter::new();
        center.command_call("FORWARD_WALK", Side::P1);
        center.set_frame_data(&facing_snapshot(Facing::Backward, Facing::Backward));
        assert_eq!(
            center.next_skill_key(Side::P1),
            KeyVector::from_keys(&[Key::Right])
        );
        assert_eq!(center.facing(Side::P1), Facing::Backward);
    }

    #[test]
    fn sides_are_independent() {
        let mut center = CommandCenter::new();
        center.command_call("DASH", Side::P1);
        assert!(!center.skill_flag(Side::P2));
        assert!(center.command_call("CROUCH", Side::P2));
        center.skill_cancel(Side::P2);
        assert_eq!(center.skill_keys(Side::P1).len(), 3);
    }

    #[test]
    fn empty_queue_yields_neutral() {
        let mut center = CommandCenter::new();
        assert!(center.next_skill_key(Side::P2).is_neutral());
    }

    #[test]
    fn literal_notation_passes_through() {
        let mut literal = CommandCenter::new();
        let mut named = CommandCenter::new();
        assert!(literal.command_call("2 3 6 _ C", Side::P1));
        assert!(named.call_action(Action::StandDDfFc, Side::P1));
        assert_eq!(literal.skill_keys(Side::P1), named.skill_keys(Side::P1));
    }
}
