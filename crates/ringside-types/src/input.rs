//! Primitive input state delivered to the engine each tick.
//!
//! A [`KeyVector`] is the set of pad directions and buttons held on one
//! frame; a [`KeyPair`] carries one vector per input channel. Both are
//! `Copy`, so every handoff between the controller thread and the engine
//! thread is a value copy and never aliases a buffer the other side may be
//! writing.

use serde::{Deserialize, Serialize};

use crate::enums::{Key, Side};

/// The set of keys held on a single frame.
///
/// Two vectors are equal iff every flag matches. The default vector is
/// neutral (nothing held).
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyVector {
    /// Left on the directional pad.
    pub left: bool,
    /// Right on the directional pad.
    pub right: bool,
    /// Up on the directional pad.
    pub up: bool,
    /// Down on the directional pad.
    pub down: bool,
    /// Attack button A.
    pub a: bool,
    /// Attack button B.
    pub b: bool,
    /// Attack button C.
    pub c: bool,
}

impl KeyVector {
    /// The neutral vector: no direction, no button.
    pub const NEUTRAL: Self = Self {
        left: false,
        right: false,
        up: false,
        down: false,
        a: false,
        b: false,
        c: false,
    };

    /// Build a vector holding exactly the given keys.
    pub fn from_keys(keys: &[Key]) -> Self {
        keys.iter().fold(Self::NEUTRAL, |vector, &key| vector.with(key))
    }

    /// Return a copy of this vector with `key` also held.
    #[must_use]
    pub const fn with(mut self, key: Key) -> Self {
        match key {
            Key::Left => self.left = true,
            Key::Right => self.right = true,
            Key::Up => self.up = true,
            Key::Down => self.down = true,
            Key::ButtonA => self.a = true,
            Key::ButtonB => self.b = true,
            Key::ButtonC => self.c = true,
        }
        self
    }

    /// Whether nothing is held.
    pub const fn is_neutral(self) -> bool {
        !(self.left || self.right || self.up || self.down || self.a || self.b || self.c)
    }
}

/// One [`KeyVector`] per input channel, indexed by [`Side`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyPair {
    /// Input for the P1 channel.
    pub p1: KeyVector,
    /// Input for the P2 channel.
    pub p2: KeyVector,
}

impl KeyPair {
    /// Both channels neutral.
    pub const NEUTRAL: Self = Self {
        p1: KeyVector::NEUTRAL,
        p2: KeyVector::NEUTRAL,
    };

    /// Build a pair from the two channel vectors.
    pub const fn new(p1: KeyVector, p2: KeyVector) -> Self {
        Self { p1, p2 }
    }

    /// Input on the channel for `side`.
    pub const fn get(&self, side: Side) -> KeyVector {
        match side {
            Side::P1 => self.p1,
            Side::P2 => self.p2,
        }
    }

    /// Replace the input on the channel for `side`.
    pub const fn set(&mut self, side: Side, keys: KeyVector) {
        match side {
            Side::P1 => self.p1 = keys,
            Side::P2 => self.p2 = keys,
        }
    }

    /// Whether both channels are neutral.
    pub const fn is_neutral(&self) -> bool {
        self.p1.is_neutral() && self.p2.is_neutral()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_neutral() {
        assert!(KeyVector::default().is_neutral());
        assert_eq!(KeyVector::default(), KeyVector::NEUTRAL);
        assert!(KeyPair::default().is_neutral());
    }

    #[test]
    fn from_keys_sets_exactly_those_flags() {
        let keys = KeyVector::from_keys(&[Key::Left, Key::ButtonA]);
        assert!(keys.left);
        assert!(keys.a);
        assert!(!keys.right && !keys.up && !keys.down && !keys.b && !keys.c);
    }

    #[test]
    fn equality_is_flagwise() {
        let a = KeyVector::from_keys(&[Key::Down, Key::Right]);
        let b = KeyVector::NEUTRAL.with(Key::Right).with(Key::Down);
        assert_eq!(a, b);
        assert_ne!(a, KeyVector::from_keys(&[Key::Down]));
    }

    #[test]
    fn pair_channels_are_independent() {
        let mut pair = KeyPair::NEUTRAL;
        pair.set(Side::P2, KeyVector::from_keys(&[Key::Up]));
        assert!(pair.get(Side::P1).is_neutral());
        assert_eq!(pair.get(Side::P2), KeyVector::from_keys(&[Key::Up]));
        assert!(!pair.is_neutral());
    }
}
