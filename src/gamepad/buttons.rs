//! Digital button enumeration for the streamed controller
//!
//! The remote input sink expects button state as a single bitmask. The flag
//! values below are the ones used by the game-streaming protocol, so a state
//! snapshot can be forwarded without translation.
//!
//! ```text
//!   bit  0..3   D-Pad (up, down, left, right)
//!   bit  4..5   Play/Start, Back/Select
//!   bit  6..7   Stick clicks
//!   bit  8..10  Bumpers, Special (guide)
//!   bit 12..15  Face buttons (A, B, X, Y)
//!   bit 16..21  Paddles, touchpad, misc
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};
use tracing::warn;

/// Bitmask over the digital buttons of a virtual controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ButtonFlags(u32);

impl ButtonFlags {
    pub const NONE: Self = Self(0);
    pub const UP: Self = Self(0x0001);
    pub const DOWN: Self = Self(0x0002);
    pub const LEFT: Self = Self(0x0004);
    pub const RIGHT: Self = Self(0x0008);
    pub const PLAY: Self = Self(0x0010);
    pub const BACK: Self = Self(0x0020);
    pub const LS_CLK: Self = Self(0x0040);
    pub const RS_CLK: Self = Self(0x0080);
    pub const LB: Self = Self(0x0100);
    pub const RB: Self = Self(0x0200);
    pub const SPECIAL: Self = Self(0x0400);
    pub const A: Self = Self(0x1000);
    pub const B: Self = Self(0x2000);
    pub const X: Self = Self(0x4000);
    pub const Y: Self = Self(0x8000);
    pub const PADDLE1: Self = Self(0x01_0000);
    pub const PADDLE2: Self = Self(0x02_0000);
    pub const PADDLE3: Self = Self(0x04_0000);
    pub const PADDLE4: Self = Self(0x08_0000);
    pub const TOUCHPAD: Self = Self(0x10_0000);
    pub const MISC: Self = Self(0x20_0000);

    /// Wrap a raw bitmask
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bitmask value
    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `other` is set in `self`
    pub const fn contains(self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    /// Set or clear exactly the bits of `flag`
    pub fn set(&mut self, flag: Self, pressed: bool) {
        if pressed {
            self.0 |= flag.0;
        } else {
            self.0 &= !flag.0;
        }
    }

    /// Every named button with its canonical name
    pub fn all() -> &'static [(&'static str, ButtonFlags)] {
        &[
            ("up", Self::UP),
            ("down", Self::DOWN),
            ("left", Self::LEFT),
            ("right", Self::RIGHT),
            ("play", Self::PLAY),
            ("back", Self::BACK),
            ("ls_clk", Self::LS_CLK),
            ("rs_clk", Self::RS_CLK),
            ("lb", Self::LB),
            ("rb", Self::RB),
            ("special", Self::SPECIAL),
            ("a", Self::A),
            ("b", Self::B),
            ("x", Self::X),
            ("y", Self::Y),
            ("paddle1", Self::PADDLE1),
            ("paddle2", Self::PADDLE2),
            ("paddle3", Self::PADDLE3),
            ("paddle4", Self::PADDLE4),
            ("touchpad", Self::TOUCHPAD),
            ("misc", Self::MISC),
        ]
    }

    /// Parse a button name (case-insensitive)
    ///
    /// Accepts the canonical names from [`ButtonFlags::all`] plus the common
    /// aliases `start`, `select`, `guide`, `l1`, `r1`, `l3` and `r3`.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        let canonical = match lower.as_str() {
            "start" => "play",
            "select" => "back",
            "guide" | "home" => "special",
            "l1" => "lb",
            "r1" => "rb",
            "l3" => "ls_clk",
            "r3" => "rs_clk",
            other => other,
        };

        let found = Self::all()
            .iter()
            .find(|(n, _)| *n == canonical)
            .map(|(_, flag)| *flag);

        if found.is_none() {
            warn!("Unknown button name: {:?}", name);
        }
        found
    }

    /// Canonical name of a single-bit flag
    pub fn name(self) -> Option<&'static str> {
        Self::all()
            .iter()
            .find(|(_, flag)| *flag == self)
            .map(|(n, _)| *n)
    }

    /// Names of every set bit, lowest bit first
    pub fn names(self) -> Vec<&'static str> {
        Self::all()
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(n, _)| *n)
            .collect()
    }
}

impl BitOr for ButtonFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ButtonFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ButtonFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for ButtonFlags {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl fmt::Display for ButtonFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:06X}", self.0)
    }
}
