//! Pad notation tokenizer and expander.
//!
//! Expansion is total: unknown tokens become neutral frames instead of
//! errors.

use ringside_types::{Facing, Key, KeyVector};

/// A numeric pad direction (`1`-`9`, `5` = neutral).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pad {
    /// `1`
    DownLeft,
    /// `2`
    Down,
    /// `3`
    DownRight,
    /// `4`
    Left,
    /// `5`
    Neutral,
    /// `6`
    Right,
    /// `7`
    UpLeft,
    /// `8`
    Up,
    /// `9`
    UpRight,
}

impl Pad {
    /// Parse a numeric digit or a letter alias (`L`, `R`, `D`, `U`, `LD`,
    /// `LU`, `RD`, `RU`).
    pub fn parse(token: &str) -> Option<Self> {
        let pad = match token {
            "1" | "LD" => Self::DownLeft,
            "2" | "D" => Self::Down,
            "3" | "RD" => Self::DownRight,
            "4" | "L" => Self::Left,
            "5" => Self::Neutral,
            "6" | "R" => Self::Right,
            "7" | "LU" => Self::UpLeft,
            "8" | "U" => Self::Up,
            "9" | "RU" => Self::UpRight,
            _ => return None,
        };
        Some(pad)
    }

    /// Reflect left and right. Vertical directions and neutral are fixed
    /// points.
    #[must_use]
    pub const fn mirrored(self) -> Self {
        match self {
            Self::DownLeft => Self::DownRight,
            Self::DownRight => Self::DownLeft,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::UpLeft => Self::UpRight,
            Self::UpRight => Self::UpLeft,
            Self::Down | Self::Neutral | Self::Up => self,
        }
    }

    /// Directional flags held for this pad position.
    pub const fn keys(self) -> KeyVector {
        let neutral = KeyVector::NEUTRAL;
        match self {
            Self::DownLeft => neutral.with(Key::Left).with(Key::Down),
            Self::Down => neutral.with(Key::Down),
            Self::DownRight => neutral.with(Key::Right).with(Key::Down),
            Self::Left => neutral.with(Key::Left),
            Self::Neutral => neutral,
            Self::Right => neutral.with(Key::Right),
            Self::UpLeft => neutral.with(Key::Left).with(Key::Up),
            Self::Up => neutral.with(Key::Up),
            Self::UpRight => neutral.with(Key::Right).with(Key::Up),
        }
    }
}

/// An attack button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// `A`
    A,
    /// `B`
    B,
    /// `C`
    C,
}

impl Button {
    /// The key flag for this button.
    pub const fn key(self) -> Key {
        match self {
            Self::A => Key::ButtonA,
            Self::B => Key::ButtonB,
            Self::C => Key::ButtonC,
        }
    }
}

/// One whitespace-separated notation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// A pad direction.
    Direction(Pad),
    /// `_`: hold the preceding direction together with the next button.
    Hold,
    /// A button press.
    Button(Button),
    /// Anything else.
    Unknown,
}

impl Token {
    /// Classify a single token. Never fails.
    pub fn parse(token: &str) -> Self {
        match token {
            "_" => Self::Hold,
            "A" => Self::Button(Button::A),
            "B" => Self::Button(Button::B),
            "C" => Self::Button(Button::C),
            other => Pad::parse(other).map_or(Self::Unknown, Self::Direction),
        }
    }

    /// Reflect a direction token; other tokens are unchanged.
    #[must_use]
    pub const fn mirrored(self) -> Self {
        match self {
            Self::Direction(pad) => Self::Direction(pad.mirrored()),
            other => other,
        }
    }
}

/// Split notation on whitespace, mirroring every direction when `facing`
/// requires it.
pub fn tokenize(notation: &str, facing: Facing) -> Vec<Token> {
    let mirror = facing.is_mirrored();
    notation
        .split_whitespace()
        .map(Token::parse)
        .map(|token| if mirror { token.mirrored() } else { token })
        .collect()
}

/// Expand notation into one [`KeyVector`] per frame.
///
/// `dir _ button` merges into a single frame; a lone button is a
/// button-only frame; `_` without that shape and unknown tokens are
/// neutral frames. Notation with no tokens at all expands to a single
/// neutral frame, matching how an unknown one-word name behaves.
pub fn expand(notation: &str, facing: Facing) -> Vec<KeyVector> {
    let tokens = tokenize(notation, facing);
    if tokens.is_empty() {
        return vec![KeyVector::NEUTRAL];
    }

    let mut frames = Vec::with_capacity(tokens.len());
    let mut rest = tokens.as_slice();
    while let Some((first, tail)) = rest.split_first() {
        rest = match (first, tail) {
            (Token::Direction(pad), [Token::Hold, Token::Button(button), after @ ..]) => {
                frames.push(pad.keys().with(button.key()));
                after
            }
            (Token::Direction(pad), _) => {
                frames.push(pad.keys());
                tail
            }
            (Token::Button(button), _) => {
                frames.push(KeyVector::NEUTRAL.with(button.key()));
                tail
            }
            (Token::Hold | Token::Unknown, _) => {
                frames.push(KeyVector::NEUTRAL);
                tail
            }
        };
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(list: &[Key]) -> KeyVector {
        KeyVector::from_keys(list)
    }

    #[test]
    fn dash_forward_and_backward() {
        assert_eq!(
            expand("6 5 6", Facing::Forward),
            vec![keys(&[Key::Right]), KeyVector::NEUTRAL, keys(&[Key::Right])]
        );
        assert_eq!(
            expand("6 5 6", Facing::Backward),
            vec![keys(&[Key::Left]), KeyVector::NEUTRAL, keys(&[Key::Left])]
        );
    }

    #[test]
    fn held_direction_merges_with_button() {
        assert_eq!(
            expand("4 _ A", Facing::Forward),
            vec![keys(&[Key::Left, Key::ButtonA])]
        );
        assert_eq!(
            expand("4 _ A", Facing::Backward),
            vec![keys(&[Key::Right, Key::ButtonA])]
        );
    }

    #[test]
    fn motion_input_is_mirrored_uniformly() {
        assert_eq!(
            expand("2 3 6 _ A", Facing::Backward),
            vec![
                keys(&[Key::Down]),
                keys(&[Key::Left, Key::Down]),
                keys(&[Key::Left, Key::ButtonA]),
            ]
        );
        assert_eq!(
            expand("2 1 4 _ C", Facing::Forward),
            vec![
                keys(&[Key::Down]),
                keys(&[Key::Left, Key::Down]),
                keys(&[Key::Left, Key::ButtonC]),
            ]
        );
    }

    #[test]
    fn mirror_table_fixes_vertical_and_neutral() {
        for (pad, mirrored) in [
            (Pad::DownLeft, Pad::DownRight),
            (Pad::Left, Pad::Right),
            (Pad::UpLeft, Pad::UpRight),
        ] {
            assert_eq!(pad.mirrored(), mirrored);
            assert_eq!(mirrored.mirrored(), pad);
        }
        for pad in [Pad::Down, Pad::Neutral, Pad::Up] {
            assert_eq!(pad.mirrored(), pad);
        }
        assert_eq!(Token::Button(Button::B).mirrored(), Token::Button(Button::B));
    }

    #[test]
    fn bare_button_is_button_only() {
        assert_eq!(expand("B", Facing::Backward), vec![keys(&[Key::ButtonB])]);
    }

    #[test]
    fn neutral_pad_with_button() {
        assert_eq!(expand("5 _ C", Facing::Forward), vec![keys(&[Key::ButtonC])]);
    }

    #[test]
    fn letter_aliases_match_digits() {
        assert_eq!(expand("RD", Facing::Forward), expand("3", Facing::Forward));
        assert_eq!(expand("L _ B", Facing::Backward), expand("4 _ B", Facing::Backward));
        assert_eq!(expand("U", Facing::Forward), vec![keys(&[Key::Up])]);
    }

    #[test]
    fn unknown_tokens_become_neutral() {
        assert_eq!(expand("STAND", Facing::Forward), vec![KeyVector::NEUTRAL]);
        assert_eq!(
            expand("6 x 6", Facing::Forward),
            vec![keys(&[Key::Right]), KeyVector::NEUTRAL, keys(&[Key::Right])]
        );
    }

    #[test]
    fn dangling_hold_is_neutral() {
        assert_eq!(
            expand("4 _", Facing::Forward),
            vec![keys(&[Key::Left]), KeyVector::NEUTRAL]
        );
        assert_eq!(
            expand("_ A", Facing::Forward),
            vec![KeyVector::NEUTRAL, keys(&[Key::ButtonA])]
        );
    }

    #[test]
    fn hold_before_direction_does_not_merge() {
        assert_eq!(
            expand("2 _ 6", Facing::Forward),
            vec![keys(&[Key::Down]), KeyVector::NEUTRAL, keys(&[Key::Right])]
        );
    }

    #[test]
    fn empty_notation_is_one_neutral_frame() {
        assert_eq!(expand("", Facing::Forward), vec![KeyVector::NEUTRAL]);
        assert_eq!(expand("   ", Facing::Backward), vec![KeyVector::NEUTRAL]);
    }

    #[test]
    fn extra_whitespace_is_ignored() {
        assert_eq!(expand("  6   5\t6 ", Facing::Forward).len(), 3);
    }
}
