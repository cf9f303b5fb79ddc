//! Per-kind movement rules.
//!
//! Every moving character travels along exactly one axis at a fixed speed.
//! There is no clamping at the canvas edges; characters may walk off-screen.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Pixels travelled per tick by every moving character.
pub const MOVEMENT_SPEED: i32 = 3;

/// How a character moves each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementRule {
    /// Never moves.
    Stationary,
    /// `x` increases.
    LeftToRight,
    /// `x` decreases.
    RightToLeft,
    /// `y` decreases (toward the top of the canvas).
    Upward,
    /// `y` increases (toward the bottom of the canvas).
    Downward,
}

impl MovementRule {
    /// Per-tick displacement `(dx, dy)` for this rule.
    #[inline]
    pub const fn displacement(self) -> (i32, i32) {
        match self {
            MovementRule::Stationary => (0, 0),
            MovementRule::LeftToRight => (MOVEMENT_SPEED, 0),
            MovementRule::RightToLeft => (-MOVEMENT_SPEED, 0),
            MovementRule::Upward => (0, -MOVEMENT_SPEED),
            MovementRule::Downward => (0, MOVEMENT_SPEED),
        }
    }

    /// Position after one step from `position`.
    #[inline]
    pub const fn step(self, position: Point) -> Point {
        let (dx, dy) = self.displacement();
        position.offset(dx, dy)
    }
}
