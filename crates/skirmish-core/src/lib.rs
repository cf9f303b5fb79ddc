//! Skirmish Core -- character kinds, movement rules, and the outcome table.
//!
//! This crate holds the pure rules of the battlefield: which characters exist,
//! how each of them moves per tick, how their bounding boxes are computed, and
//! who wins when two of them collide. Nothing here owns a live set of
//! entities; that is the job of `skirmish-engine`.
//!
//! # Quick Start
//!
//! ```
//! use skirmish_core::prelude::*;
//!
//! let mut allocator = EntityAllocator::new();
//! let mut badtz = Character::new(allocator.allocate(), CharacterKind::BadtzMaru, Point::new(0, 0));
//! for _ in 0..5 {
//!     badtz.advance();
//! }
//! assert_eq!(badtz.position(), Point::new(15, 0));
//!
//! let table = OutcomeTable::rpskl();
//! assert_eq!(
//!     table.resolve(CharacterKind::HelloKitty, CharacterKind::BadtzMaru),
//!     Outcome::AWins
//! );
//! ```

#![deny(unsafe_code)]

pub mod character;
pub mod entity;
pub mod geometry;
pub mod kind;
pub mod movement;
pub mod outcome;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// A character type tag outside the closed set of five kinds.
///
/// Raised when a spawn request or a raw table lookup names a type that does
/// not exist. Never fatal to the simulation: the caller decides whether to
/// log it or ignore it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidTypeError {
    /// A numeric tag outside `0..KIND_COUNT`.
    #[error("unknown character type tag {0} (expected 0..{count})", count = kind::KIND_COUNT)]
    UnknownTag(u8),

    /// A name that matches none of the known characters.
    #[error("unknown character type name '{0}'. Known names: [{known}]", known = kind::known_names())]
    UnknownName(String),
}

/// Errors produced when building a custom [`OutcomeTable`](outcome::OutcomeTable).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// A cell holds something other than -1, 0, or 1.
    #[error("table cell [{row}][{col}] = {value} is outside {{-1, 0, 1}}")]
    OutOfRange { row: usize, col: usize, value: i8 },

    /// A kind does not tie with itself.
    #[error("table diagonal [{index}][{index}] = {value}, expected 0")]
    NonZeroDiagonal { index: usize, value: i8 },

    /// `table[a][b]` is not the negation of `table[b][a]`.
    #[error("table is not antisymmetric at [{a}][{b}]: {forward} vs {backward}")]
    NotAntisymmetric {
        a: usize,
        b: usize,
        forward: i8,
        backward: i8,
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::character::{Character, DrawSurface};
    pub use crate::entity::{EntityAllocator, EntityId};
    pub use crate::geometry::{Point, Rect};
    pub use crate::kind::{CharacterKind, KIND_COUNT};
    pub use crate::movement::{MovementRule, MOVEMENT_SPEED};
    pub use crate::outcome::{Outcome, OutcomeTable};
    pub use crate::{InvalidTypeError, TableError};
}

// ---------------------------------------------------------------------------
// Integration Tests
// ---------------------------------------------------------------------------
