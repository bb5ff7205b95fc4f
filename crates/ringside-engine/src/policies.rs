//! Demo agent policies for the dry-run driver.
//!
//! Neither policy plays well. They exist to exercise the controller and the
//! command translator end to end: [`ScriptedPolicy`] walks a fixed move
//! list, [`RandomPolicy`] picks moves from a seeded RNG.

use rand::SeedableRng as _;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom as _;
use ringside_core::config::{MatchConfig, PolicyKind};
use ringside_core::{AgentError, AgentPolicy, CommandCenter, IdlePolicy};
use ringside_types::{Action, KeyPair, KeyVector, ScreenCapture, Side, Snapshot, StaticMatchInfo};
use tracing::{debug, warn};

/// Build the configured policy for `side`.
pub fn build_policy(kind: PolicyKind, settings: &MatchConfig, side: Side) -> Box<dyn AgentPolicy> {
    match kind {
        PolicyKind::Idle => Box::new(IdlePolicy::new()),
        PolicyKind::Scripted => Box::new(ScriptedPolicy::new(settings.script.clone())),
        PolicyKind::Random => {
            let offset = u64::try_from(side.index()).unwrap_or_default();
            let seed = settings.seed.wrapping_add(offset);
            Box::new(RandomPolicy::new(seed))
        }
    }
}

/// Short name of a policy kind, used as the agent name in match info.
pub const fn policy_name(kind: PolicyKind) -> &'static str {
    match kind {
        PolicyKind::Idle => "idle",
        PolicyKind::Scripted => "scripted",
        PolicyKind::Random => "random",
    }
}

/// Put `keys` on `side`'s channel, leaving the other neutral.
const fn own_channel(side: Side, keys: KeyVector) -> KeyPair {
    let mut pair = KeyPair::NEUTRAL;
    pair.set(side, keys);
    pair
}

// ---------------------------------------------------------------------------
// ScriptedPolicy
// ---------------------------------------------------------------------------

/// Cycles through a fixed list of action names.
///
/// A new action is queued only once the previous one has fully drained.
/// Losing HP cancels whatever is still queued.
#[derive(Debug)]
pub struct ScriptedPolicy {
    /// Action names, table keys or literal notation.
    script: Vec<String>,
    /// Index of the next script entry to queue.
    cursor: usize,
    /// Side being played; set by `initialize`.
    side: Side,
    /// Translator and key queues.
    commands: CommandCenter,
    /// Own HP on the previous non-empty snapshot.
    last_hp: Option<i32>,
}

impl ScriptedPolicy {
    /// Create a policy that plays `script` in order, forever.
    pub fn new(script: Vec<String>) -> Self {
        Self {
            script,
            cursor: 0,
            side: Side::P1,
            commands: CommandCenter::new(),
            last_hp: None,
        }
    }

    fn queue_next(&mut self) {
        let Some(name) = self.script.get(self.cursor) else {
            return;
        };
        self.commands.command_call(name, self.side);
        self.cursor = self.cursor.saturating_add(1);
        if self.cursor >= self.script.len() {
            self.cursor = 0;
        }
    }
}

impl AgentPolicy for ScriptedPolicy {
    fn initialize(&mut self, info: &StaticMatchInfo, side: Side) -> Result<(), AgentError> {
        if self.script.is_empty() {
            return Err(AgentError::Setup {
                message: "scripted policy needs at least one action".to_owned(),
            });
        }
        for name in &self.script {
            if name.parse::<Action>().is_err() {
                warn!(
                    %side,
                    action = name.as_str(),
                    "not a table action, using it as literal notation"
                );
            }
        }
        self.side = side;
        self.cursor = 0;
        self.last_hp = None;
        self.commands.reset();
        debug!(
            %side,
            character = info.fighter(side).character_name.as_str(),
            steps = self.script.len(),
            "scripted policy ready"
        );
        Ok(())
    }

    fn on_tick(&mut self, snapshot: &Snapshot, _screen: Option<&ScreenCapture>) {
        if snapshot.empty {
            return;
        }
        self.commands.set_frame_data(snapshot);
        let hp = snapshot.character(self.side).hp;
        if self.last_hp.is_some_and(|previous| hp < previous) && self.commands.skill_flag(self.side)
        {
            debug!(side = %self.side, hp, "hit taken, cancelling queued command");
            self.commands.skill_cancel(self.side);
        }
        self.last_hp = Some(hp);
    }

    fn decide(&mut self) -> Result<KeyPair, AgentError> {
        if !self.commands.skill_flag(self.side) {
            self.queue_next();
        }
        Ok(own_channel(self.side, self.commands.next_skill_key(self.side)))
    }

    fn on_round_end(&mut self, _p1_hp: i32, _p2_hp: i32, _elapsed_frames: u32) {
        self.commands.reset();
        self.last_hp = None;
    }

    fn on_shutdown(&mut self) {
        debug!(side = %self.side, "scripted policy shut down");
    }
}

// ---------------------------------------------------------------------------
// RandomPolicy
// ---------------------------------------------------------------------------

/// Picks a random action from the full vocabulary whenever the queue is
/// empty. Deterministic for a given seed.
#[derive(Debug)]
pub struct RandomPolicy {
    /// Seeded generator.
    rng: StdRng,
    /// Side being played; set by `initialize`.
    side: Side,
    /// Translator and key queues.
    commands: CommandCenter,
}

impl RandomPolicy {
    /// Create a policy seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            side: Side::P1,
            commands: CommandCenter::new(),
        }
    }
}

impl AgentPolicy for RandomPolicy {
    fn initialize(&mut self, _info: &StaticMatchInfo, side: Side) -> Result<(), AgentError> {
        self.side = side;
        self.commands.reset();
        Ok(())
    }

    fn on_tick(&mut self, snapshot: &Snapshot, _screen: Option<&ScreenCapture>) {
        if !snapshot.empty {
            self.commands.set_frame_data(snapshot);
        }
    }

    fn decide(&mut self) -> Result<KeyPair, AgentError> {
        if !self.commands.skill_flag(self.side) {
            if let Some(&action) = Action::ALL.choose(&mut self.rng) {
                self.commands.call_action(action, self.side);
            }
        }
        Ok(own_channel(self.side, self.commands.next_skill_key(self.side)))
    }

    fn on_round_end(&mut self, _p1_hp: i32, _p2_hp: i32, _elapsed_frames: u32) {
        self.commands.reset();
    }

    fn on_shutdown(&mut self) {}
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ringside_types::{CharacterState, Facing, FighterInfo, Key, MatchId};

    use super::*;

    fn info() -> StaticMatchInfo {
        let fighter = FighterInfo {
            character_name: "ZEN".to_owned(),
            agent_name: "demo".to_owned(),
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

    fn snapshot(p1_hp: i32, p1_facing: Facing) -> Snapshot {
        Snapshot {
            frame_number: 1,
            p1: CharacterState {
                hp: p1_hp,
                facing: p1_facing,
                ..CharacterState::default()
            },
            empty: false,
            ..Snapshot::neutral()
        }
    }

    fn right() -> KeyVector {
        KeyVector::NEUTRAL.with(Key::Right)
    }

    #[test]
    fn scripted_plays_dash_on_own_channel() {
        let mut policy = ScriptedPolicy::new(vec!["DASH".to_owned()]);
        policy.initialize(&info(), Side::P1).unwrap();
        policy.on_tick(&snapshot(400, Facing::Forward), None);

        let keys: Vec<KeyPair> = (0..3).map(|_| policy.decide().unwrap()).collect();
        assert_eq!(keys[0].p1, right());
        assert!(keys[1].p1.is_neutral());
        assert_eq!(keys[2].p1, right());
        assert!(keys.iter().all(|pair| pair.p2.is_neutral()));
    }

    #[test]
    fn scripted_cycles_back_to_the_first_entry() {
        let mut policy = ScriptedPolicy::new(vec!["6".to_owned(), "4".to_owned()]);
        policy.initialize(&info(), Side::P1).unwrap();

        let pads: Vec<KeyVector> = (0..3).map(|_| policy.decide().unwrap().p1).collect();
        assert_eq!(pads, vec![right(), KeyVector::NEUTRAL.with(Key::Left), right()]);
    }

    #[test]
    fn scripted_cancels_queue_when_hit() {
        let mut policy = ScriptedPolicy::new(vec!["DASH".to_owned()]);
        policy.initialize(&info(), Side::P1).unwrap();
        policy.on_tick(&snapshot(400, Facing::Forward), None);
        policy.decide().unwrap();
        assert!(policy.commands.skill_flag(Side::P1));

        policy.on_tick(&snapshot(350, Facing::Forward), None);
        assert!(!policy.commands.skill_flag(Side::P1));
    }

    #[test]
    fn scripted_mirrors_when_facing_backward() {
        let mut policy = ScriptedPolicy::new(vec!["DASH".to_owned()]);
        policy.initialize(&info(), Side::P1).unwrap();
        policy.on_tick(&snapshot(400, Facing::Backward), None);

        assert_eq!(policy.decide().unwrap().p1, KeyVector::NEUTRAL.with(Key::Left));
    }

    #[test]
    fn scripted_rejects_empty_script() {
        let mut policy = ScriptedPolicy::new(Vec::new());
        let err = policy.initialize(&info(), Side::P2).unwrap_err();
        assert!(matches!(err, AgentError::Setup { .. }));
    }

    #[test]
    fn random_is_deterministic_per_seed() {
        let play = |seed| {
            let mut policy = RandomPolicy::new(seed);
            policy.initialize(&info(), Side::P2).unwrap();
            (0..64)
                .map(|_| policy.decide().unwrap())
                .collect::<Vec<KeyPair>>()
        };
        let first = play(7);
        assert_eq!(first, play(7));
        assert!(first.iter().all(|pair| pair.p1.is_neutral()));
        assert!(first.iter().any(|pair| !pair.p2.is_neutral()));
    }

    #[test]
    fn build_policy_seeds_sides_differently() {
        let settings = MatchConfig {
            p1_policy: PolicyKind::Random,
            p2_policy: PolicyKind::Random,
            ..MatchConfig::default()
        };
        let mut p1 = build_policy(settings.p1_policy, &settings, Side::P1);
        let mut p2 = build_policy(settings.p2_policy, &settings, Side::P2);
        p1.initialize(&info(), Side::P1).unwrap();
        p2.initialize(&info(), Side::P2).unwrap();
        let p1_keys: Vec<KeyVector> = (0..64).map(|_| p1.decide().unwrap().p1).collect();
        let p2_keys: Vec<KeyVector> = (0..64).map(|_| p2.decide().unwrap().p2).collect();
        assert_ne!(p1_keys, p2_keys);
    }
}
