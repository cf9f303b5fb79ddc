//! The closed set of character kinds.
//!
//! The discriminant of each kind is its position on the RPSKL cycle: kind `i`
//! defeats kinds `i + 1` and `i + 2` (mod 5). Each kind also carries a fixed
//! sprite size and a [`MovementRule`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::movement::MovementRule;
use crate::InvalidTypeError;

/// Number of character kinds.
pub const KIND_COUNT: usize = 5;

/// A character type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum CharacterKind {
    /// Sits still.
    HelloKitty = 0,
    /// Walks left to right.
    BadtzMaru = 1,
    /// Walks right to left.
    Kuromi = 2,
    /// Walks downward.
    MyMelody = 3,
    /// Flies upward.
    Cinnamoroll = 4,
}

impl CharacterKind {
    /// All kinds in cycle order.
    pub const ALL: [CharacterKind; KIND_COUNT] = [
        CharacterKind::HelloKitty,
        CharacterKind::BadtzMaru,
        CharacterKind::Kuromi,
        CharacterKind::MyMelody,
        CharacterKind::Cinnamoroll,
    ];

    /// Numeric tag (position on the cycle).
    #[inline]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Row/column index into an outcome table.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look a kind up by its numeric tag.
    pub fn from_tag(tag: u8) -> Result<Self, InvalidTypeError> {
        match tag {
            0 => Ok(CharacterKind::HelloKitty),
            1 => Ok(CharacterKind::BadtzMaru),
            2 => Ok(CharacterKind::Kuromi),
            3 => Ok(CharacterKind::MyMelody),
            4 => Ok(CharacterKind::Cinnamoroll),
            _ => Err(InvalidTypeError::UnknownTag(tag)),
        }
    }

    /// Display name, as shown on the spawn buttons.
    pub const fn name(self) -> &'static str {
        match self {
            CharacterKind::HelloKitty => "Hello Kitty",
            CharacterKind::BadtzMaru => "Badtz Maru",
            CharacterKind::Kuromi => "Kuromi",
            CharacterKind::MyMelody => "My Melody",
            CharacterKind::Cinnamoroll => "Cinnamoroll",
        }
    }

    /// Sprite size `(width, height)` in pixels. Always strictly positive.
    pub const fn size(self) -> (u32, u32) {
        match self {
            CharacterKind::HelloKitty => (75, 95),
            CharacterKind::BadtzMaru => (75, 90),
            CharacterKind::Kuromi => (80, 100),
            CharacterKind::MyMelody => (80, 120),
            CharacterKind::Cinnamoroll => (150, 120),
        }
    }

    /// How this kind moves each tick.
    pub const fn movement(self) -> MovementRule {
        match self {
            CharacterKind::HelloKitty => MovementRule::Stationary,
            CharacterKind::BadtzMaru => MovementRule::LeftToRight,
            CharacterKind::Kuromi => MovementRule::RightToLeft,
            CharacterKind::MyMelody => MovementRule::Downward,
            CharacterKind::Cinnamoroll => MovementRule::Upward,
        }
    }

    /// Whether `self` beats `other` on the cycle.
    pub const fn defeats(self, other: CharacterKind) -> bool {
        let distance = (other.index() + KIND_COUNT - self.index()) % KIND_COUNT;
        distance == 1 || distance == 2
    }
}

impl fmt::Display for CharacterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for CharacterKind {
    type Error = InvalidTypeError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Self::from_tag(tag)
    }
}

impl FromStr for CharacterKind {
    type Err = InvalidTypeError;

    /// Case-insensitive match on the display name, ignoring surrounding
    /// whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        CharacterKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| InvalidTypeError::UnknownName(s.to_owned()))
    }
}

impl TryFrom<&str> for CharacterKind {
    type Error = InvalidTypeError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl TryFrom<&String> for CharacterKind {
    type Error = InvalidTypeError;

    fn try_from(name: &String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

/// Lower-cased known names, comma separated. Used in error messages.
pub(crate) fn known_names() -> String {
    CharacterKind::ALL
        .iter()
        .map(|kind| kind.name().to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join(", ")
}
