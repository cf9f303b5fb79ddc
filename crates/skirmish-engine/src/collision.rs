//! Pairwise overlap detection.
//!
//! Detection is a brute-force O(n²) sweep over the live set. Pairs come out
//! in discovery order: outer index ascending, then inner index ascending, over
//! the character order at the start of the sweep. Each pair records the ids
//! *and* kinds of its participants, so it can still be resolved after one of
//! them has been removed.

use skirmish_core::prelude::*;

use crate::events::BattleEvent;

/// Two characters whose bounding boxes overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    /// The character that comes first in the live set.
    pub entity_a: EntityId,
    /// Kind of `entity_a` at detection time.
    pub kind_a: CharacterKind,
    /// The character that comes second in the live set.
    pub entity_b: EntityId,
    /// Kind of `entity_b` at detection time.
    pub kind_b: CharacterKind,
}

impl CollisionPair {
    /// Convert this pair into a [`BattleEvent::Collision`].
    pub fn to_battle_event(&self) -> BattleEvent {
        BattleEvent::Collision {
            a: self.entity_a,
            b: self.entity_b,
        }
    }
}

/// Find every overlapping pair among `characters`.
pub fn detect_collisions(characters: &[Character]) -> Vec<CollisionPair> {
    // Positions are frozen for the duration of the sweep.
    let bounds: Vec<Rect> = characters.iter().map(Character::bounds).collect();

    let mut pairs = Vec::new();
    for i in 0..characters.len() {
        for j in (i + 1)..characters.len() {
            if bounds[i].intersects(&bounds[j]) {
                let (a, b) = (&characters[i], &characters[j]);
                tracing::trace!(a = %a.id(), b = %b.id(), "overlap detected");
                pairs.push(CollisionPair {
                    entity_a: a.id(),
                    kind_a: a.kind(),
                    entity_b: b.id(),
                    kind_b: b.kind(),
                });
            }
        }
    }
    pairs
}
