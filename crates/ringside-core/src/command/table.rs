//! Static table mapping move names to pad notation.
//!
//! Notation is written for a character facing forward, using numeric pad
//! directions (`1`-`9`, `5` = neutral), `_` to hold a direction together
//! with the next button, and the buttons `A`, `B`, `C`:
//!
//! ```text
//! 7 8 9
//! 4 5 6
//! 1 2 3
//! ```

use ringside_types::Action;

/// One row of [`COMMAND_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandEntry {
    /// The move.
    pub action: Action,
    /// Whitespace-separated pad notation for the move.
    pub notation: &'static str,
}

/// Shorthand for a table row.
const fn entry(action: Action, notation: &'static str) -> CommandEntry {
    CommandEntry { action, notation }
}

/// Every move the translator recognizes by name.
pub const COMMAND_TABLE: &[CommandEntry] = &[
    // --- Movement ---
    entry(Action::ForwardWalk, "6"),
    entry(Action::Dash, "6 5 6"),
    entry(Action::BackStep, "4 5 4"),
    entry(Action::Crouch, "2"),
    entry(Action::Jump, "8"),
    entry(Action::ForJump, "9"),
    entry(Action::BackJump, "7"),
    // --- Guard ---
    entry(Action::StandGuard, "4"),
    entry(Action::CrouchGuard, "1"),
    entry(Action::AirGuard, "4"),
    // --- Throws ---
    entry(Action::ThrowA, "4 _ A"),
    entry(Action::ThrowB, "4 _ B"),
    // --- Normals ---
    entry(Action::StandA, "A"),
    entry(Action::StandB, "B"),
    entry(Action::CrouchA, "2 _ A"),
    entry(Action::CrouchB, "2 _ B"),
    entry(Action::AirA, "A"),
    entry(Action::AirB, "B"),
    entry(Action::AirDa, "2 _ A"),
    entry(Action::AirDb, "2 _ B"),
    entry(Action::StandFa, "6 _ A"),
    entry(Action::StandFb, "6 _ B"),
    entry(Action::CrouchFa, "3 _ A"),
    entry(Action::CrouchFb, "3 _ B"),
    entry(Action::AirFa, "9 _ A"),
    entry(Action::AirFb, "9 _ B"),
    entry(Action::AirUa, "8 _ A"),
    entry(Action::AirUb, "8 _ B"),
    // --- Specials ---
    entry(Action::StandDDfFa, "2 3 6 _ A"),
    entry(Action::StandDDfFb, "2 3 6 _ B"),
    entry(Action::StandFDDfa, "6 2 3 _ A"),
    entry(Action::StandFDDfb, "6 2 3 _ B"),
    entry(Action::StandDDbBa, "2 1 4 _ A"),
    entry(Action::StandDDbBb, "2 1 4 _ B"),
    entry(Action::AirDDfFa, "2 3 6 _ A"),
    entry(Action::AirDDfFb, "2 3 6 _ B"),
    entry(Action::AirFDDfa, "6 2 3 _ A"),
    entry(Action::AirFDDfb, "6 2 3 _ B"),
    entry(Action::AirDDbBa, "2 1 4 _ A"),
    entry(Action::AirDDbBb, "2 1 4 _ B"),
    entry(Action::StandDDfFc, "2 3 6 _ C"),
];

/// Notation for a known action.
pub fn notation_for(action: Action) -> Option<&'static str> {
    COMMAND_TABLE
        .iter()
        .find(|row| row.action == action)
        .map(|row| row.notation)
}

/// Resolve a move name to notation.
///
/// Recognized names map through [`COMMAND_TABLE`]; anything else is
/// returned unchanged and parsed as literal notation.
pub fn resolve(name: &str) -> &str {
    name.parse::<Action>()
        .ok()
        .and_then(notation_for)
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn every_action_has_exactly_one_row() {
        let mut seen = BTreeSet::new();
        for row in COMMAND_TABLE {
            assert!(seen.insert(row.action), "{} listed twice", row.action);
        }
        for action in Action::ALL {
            assert!(notation_for(action).is_some(), "{action} missing from table");
        }
    }

    #[test]
    fn known_names_resolve_through_table() {
        assert_eq!(resolve("DASH"), "6 5 6");
        assert_eq!(resolve("THROW_A"), "4 _ A");
        assert_eq!(resolve("STAND_D_DF_FC"), "2 3 6 _ C");
    }

    #[test]
    fn unknown_names_pass_through() {
        assert_eq!(resolve("6 2 3 _ B"), "6 2 3 _ B");
        assert_eq!(resolve("dash"), "dash");
        assert_eq!(resolve(""), "");
    }
}
