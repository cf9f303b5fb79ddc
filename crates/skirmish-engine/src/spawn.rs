//! Spawn requests, random placement, and the surprise tally.
//!
//! The input layer raises a [`SpawnRequest`] whenever the player picks a
//! character, either at a chosen point or at a random point inside the
//! [`SpawnArea`]. Every successful spawn is counted by a [`SpawnTally`], which
//! fires once the count reaches a randomly drawn threshold.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use skirmish_core::prelude::*;

/// Upper bound (inclusive) for a freshly drawn surprise threshold.
pub const MAX_SURPRISE_THRESHOLD: u32 = 50;

// ---------------------------------------------------------------------------
// SpawnRequest
// ---------------------------------------------------------------------------

/// A request to place one character, keyed by the character's name.
///
/// The name is resolved when the request is applied, so an unknown name is
/// only reported at that point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRequest {
    /// Character name, matched case-insensitively.
    pub tag: String,
    /// Top-left corner of the new character.
    pub position: Point,
}

impl SpawnRequest {
    /// A request for `tag` at `position`.
    pub fn new(tag: impl Into<String>, position: impl Into<Point>) -> Self {
        Self {
            tag: tag.into(),
            position: position.into(),
        }
    }

    /// Resolve the tag to a kind.
    pub fn kind(&self) -> Result<CharacterKind, InvalidTypeError> {
        self.tag.parse()
    }
}

// ---------------------------------------------------------------------------
// SpawnArea
// ---------------------------------------------------------------------------

/// The rectangle `[0, width) x [0, height)` random spawns land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnArea {
    /// Exclusive upper bound for `x`.
    pub width: u32,
    /// Exclusive upper bound for `y`.
    pub height: u32,
}

impl SpawnArea {
    /// An area of `width` by `height` pixels anchored at the origin.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A uniformly random point inside the area.
    ///
    /// A zero-sized axis always yields 0 on that axis.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        Point::new(random_coord(rng, self.width), random_coord(rng, self.height))
    }
}

impl Default for SpawnArea {
    /// 800x600.
    fn default() -> Self {
        Self::new(800, 600)
    }
}

fn random_coord<R: Rng + ?Sized>(rng: &mut R, extent: u32) -> i32 {
    if extent == 0 {
        return 0;
    }
    let upper = extent.min(i32::MAX as u32) as i32;
    rng.gen_range(0..upper)
}

// ---------------------------------------------------------------------------
// SpawnTally
// ---------------------------------------------------------------------------

/// Counts spawns and reports when a random threshold is reached.
///
/// Every threshold is drawn from `1..=MAX_SURPRISE_THRESHOLD` unless the first
/// one is fixed at construction. After firing, the count resets to zero and
/// the next threshold is drawn.
#[derive(Debug, Clone)]
pub struct SpawnTally {
    count: u32,
    threshold: u32,
    rng: Pcg32,
}

impl SpawnTally {
    /// A tally whose first threshold is `initial_threshold`, or drawn from
    /// `rng` when `None`. A fixed threshold of 0 is treated as 1.
    pub fn new(initial_threshold: Option<u32>, mut rng: Pcg32) -> Self {
        let threshold = match initial_threshold {
            Some(fixed) => fixed.max(1),
            None => draw_threshold(&mut rng),
        };
        Self {
            count: 0,
            threshold,
            rng,
        }
    }

    /// Count one spawn. Returns the count that fired, if the threshold was
    /// reached.
    pub fn record(&mut self) -> Option<u32> {
        self.count += 1;
        if self.count < self.threshold {
            return None;
        }
        let fired = self.count;
        self.count = 0;
        self.threshold = draw_threshold(&mut self.rng);
        tracing::info!(spawns = fired, next_threshold = self.threshold, "surprise!");
        Some(fired)
    }

    /// Spawns counted since the last firing.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Count at which the tally fires next.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

fn draw_threshold(rng: &mut Pcg32) -> u32 {
    rng.gen_range(1..=MAX_SURPRISE_THRESHOLD)
}
