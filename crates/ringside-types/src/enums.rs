//! Enumeration types for the Ringside agent plugin.
//!
//! Sides and facing describe the two characters on the stage; [`Key`] names
//! the primitive input flags; [`Action`] is the closed vocabulary of move
//! names the command translator knows how to expand.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Sides and orientation
// ---------------------------------------------------------------------------

/// One of the two competing characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Player one (left spawn).
    P1,
    /// Player two (right spawn).
    P2,
}

impl Side {
    /// Both sides, in channel order.
    pub const ALL: [Self; 2] = [Self::P1, Self::P2];

    /// Channel index of this side (0 for P1, 1 for P2).
    pub const fn index(self) -> usize {
        match self {
            Self::P1 => 0,
            Self::P2 => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::P1 => f.write_str("p1"),
            Self::P2 => f.write_str("p2"),
        }
    }
}

/// Horizontal orientation of a character relative to its opponent.
///
/// Move notation is written for a character facing forward (toward the
/// right of the pad); a character facing backward has every directional
/// input mirrored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    /// Facing the default direction; notation is used as written.
    #[default]
    Forward,
    /// Facing the other way; directional notation is mirrored.
    Backward,
}

impl Facing {
    /// Whether directional input must be mirrored for this facing.
    pub const fn is_mirrored(self) -> bool {
        matches!(self, Self::Backward)
    }
}

/// A primitive input flag of a [`KeyVector`](crate::KeyVector).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// Left on the directional pad.
    Left,
    /// Right on the directional pad.
    Right,
    /// Up on the directional pad.
    Up,
    /// Down on the directional pad.
    Down,
    /// Attack button A.
    ButtonA,
    /// Attack button B.
    ButtonB,
    /// Attack button C.
    ButtonC,
}

// ---------------------------------------------------------------------------
// Action vocabulary
// ---------------------------------------------------------------------------

/// A move name the command translator can expand into key sequences.
///
/// The serialized form is the upper snake case name used on the wire
/// (`"STAND_D_DF_FA"`). Names outside this vocabulary are still accepted
/// by the translator as literal notation, so the enum is a convenience for
/// typed callers, not a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    // --- Movement ---
    /// Walk toward the opponent.
    ForwardWalk,
    /// Forward dash (double tap forward).
    Dash,
    /// Back step (double tap back).
    BackStep,
    /// Crouch in place.
    Crouch,
    /// Vertical jump.
    Jump,
    /// Jump toward the opponent.
    ForJump,
    /// Jump away from the opponent.
    BackJump,

    // --- Guard ---
    /// Standing guard.
    StandGuard,
    /// Crouching guard.
    CrouchGuard,
    /// Guard while airborne.
    AirGuard,

    // --- Throws ---
    /// Light throw.
    ThrowA,
    /// Heavy throw.
    ThrowB,

    // --- Normals ---
    /// Standing light attack.
    StandA,
    /// Standing heavy attack.
    StandB,
    /// Crouching light attack.
    CrouchA,
    /// Crouching heavy attack.
    CrouchB,
    /// Aerial light attack.
    AirA,
    /// Aerial heavy attack.
    AirB,
    /// Aerial downward light attack.
    AirDa,
    /// Aerial downward heavy attack.
    AirDb,
    /// Standing forward light attack.
    StandFa,
    /// Standing forward heavy attack.
    StandFb,
    /// Crouching forward light attack.
    CrouchFa,
    /// Crouching forward heavy attack.
    CrouchFb,
    /// Aerial forward light attack.
    AirFa,
    /// Aerial forward heavy attack.
    AirFb,
    /// Aerial upward light attack.
    AirUa,
    /// Aerial upward heavy attack.
    AirUb,

    // --- Specials ---
    /// Quarter circle forward, light.
    StandDDfFa,
    /// Quarter circle forward, heavy.
    StandDDfFb,
    /// Dragon punch motion, light.
    StandFDDfa,
    /// Dragon punch motion, heavy.
    StandFDDfb,
    /// Quarter circle back, light.
    StandDDbBa,
    /// Quarter circle back, heavy.
    StandDDbBb,
    /// Aerial quarter circle forward, light.
    AirDDfFa,
    /// Aerial quarter circle forward, heavy.
    AirDDfFb,
    /// Aerial dragon punch motion, light.
    AirFDDfa,
    /// Aerial dragon punch motion, heavy.
    AirFDDfb,
    /// Aerial quarter circle back, light.
    AirDDbBa,
    /// Aerial quarter circle back, heavy.
    AirDDbBb,
    /// Quarter circle forward, super.
    StandDDfFc,
}

/// Error returned when parsing a string that is not a known [`Action`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action name: {name}")]
pub struct UnknownAction {
    /// The name that failed to parse.
    pub name: String,
}

impl Action {
    /// Every action in declaration order.
    pub const ALL: [Self; 41] = [
        Self::ForwardWalk,
        Self::Dash,
        Self::BackStep,
        Self::Crouch,
        Self::Jump,
        Self::ForJump,
        Self::BackJump,
        Self::StandGuard,
        Self::CrouchGuard,
        Self::AirGuard,
        Self::ThrowA,
        Self::ThrowB,
        Self::StandA,
        Self::StandB,
        Self::CrouchA,
        Self::CrouchB,
        Self::AirA,
        Self::AirB,
        Self::AirDa,
        Self::AirDb,
        Self::StandFa,
        Self::StandFb,
        Self::CrouchFa,
        Self::CrouchFb,
        Self::AirFa,
        Self::AirFb,
        Self::AirUa,
        Self::AirUb,
        Self::StandDDfFa,
        Self::StandDDfFb,
        Self::StandFDDfa,
        Self::StandFDDfb,
        Self::StandDDbBa,
        Self::StandDDbBb,
        Self::AirDDfFa,
        Self::AirDDfFb,
        Self::AirFDDfa,
        Self::AirFDDfb,
        Self::AirDDbBa,
        Self::AirDDbBb,
        Self::StandDDfFc,
    ];

    /// The wire name of this action.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ForwardWalk => "FORWARD_WALK",
            Self::Dash => "DASH",
            Self::BackStep => "BACK_STEP",
            Self::Crouch => "CROUCH",
            Self::Jump => "JUMP",
            Self::ForJump => "FOR_JUMP",
            Self::BackJump => "BACK_JUMP",
            Self::StandGuard => "STAND_GUARD",
            Self::CrouchGuard => "CROUCH_GUARD",
            Self::AirGuard => "AIR_GUARD",
            Self::ThrowA => "THROW_A",
            Self::ThrowB => "THROW_B",
            Self::StandA => "STAND_A",
            Self::StandB => "STAND_B",
            Self::CrouchA => "CROUCH_A",
            Self::CrouchB => "CROUCH_B",
            Self::AirA => "AIR_A",
            Self::AirB => "AIR_B",
            Self::AirDa => "AIR_DA",
            Self::AirDb => "AIR_DB",
            Self::StandFa => "STAND_FA",
            Self::StandFb => "STAND_FB",
            Self::CrouchFa => "CROUCH_FA",
            Self::CrouchFb => "CROUCH_FB",
            Self::AirFa => "AIR_FA",
            Self::AirFb => "AIR_FB",
            Self::AirUa => "AIR_UA",
            Self::AirUb => "AIR_UB",
            Self::StandDDfFa => "STAND_D_DF_FA",
            Self::StandDDfFb => "STAND_D_DF_FB",
            Self::StandFDDfa => "STAND_F_D_DFA",
            Self::StandFDDfb => "STAND_F_D_DFB",
            Self::StandDDbBa => "STAND_D_DB_BA",
            Self::StandDDbBb => "STAND_D_DB_BB",
            Self::AirDDfFa => "AIR_D_DF_FA",
            Self::AirDDfFb => "AIR_D_DF_FB",
            Self::AirFDDfa => "AIR_F_D_DFA",
            Self::AirFDDfb => "AIR_F_D_DFB",
            Self::AirDDbBa => "AIR_D_DB_BA",
            Self::AirDDbBb => "AIR_D_DB_BB",
            Self::StandDDfFc => "STAND_D_DF_FC",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| UnknownAction { name: s.to_owned() })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn side_index_follows_channel_order() {
        assert_eq!(Side::P1.index(), 0);
        assert_eq!(Side::P2.index(), 1);
        assert_eq!(Side::ALL.map(Side::index), [0, 1]);
    }

    #[test]
    fn only_backward_facing_mirrors() {
        assert_eq!(Facing::default(), Facing::Forward);
        assert!(!Facing::Forward.is_mirrored());
        assert!(Facing::Backward.is_mirrored());
    }

    #[test]
    fn action_names_round_trip_through_from_str() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>().unwrap(), action);
        }
    }

    #[test]
    fn action_serde_name_matches_wire_name() {
        for action in Action::ALL {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.as_str()));
        }
    }

    #[test]
    fn unknown_action_is_rejected() {
        let err = "6 2 3 _ A".parse::<Action>().unwrap_err();
        assert_eq!(err.name, "6 2 3 _ A");
    }
}
