//! Battle events.
//!
//! Every observable thing that happens during a tick (a spawn, a detected
//! overlap, a defeat, a stalemate) is reported as a [`BattleEvent`], in the
//! order it happened. Events are informational: the battlefield state is the
//! source of truth, and dropping the events changes nothing.

use serde::{Deserialize, Serialize};
use skirmish_core::prelude::*;

/// Something that happened on the battlefield.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEvent {
    /// A character entered the battlefield.
    Spawned {
        entity: EntityId,
        kind: CharacterKind,
        position: Point,
    },
    /// Two characters' bounding boxes overlap after the advance phase.
    Collision { a: EntityId, b: EntityId },
    /// A collision was decided in favour of `winner`.
    ///
    /// `removed` is `false` when the loser had already been removed by an
    /// earlier pair in the same tick.
    Defeated {
        winner: EntityId,
        loser: EntityId,
        loser_kind: CharacterKind,
        removed: bool,
    },
    /// A collision between kinds that tie; nobody was removed.
    Stalemate { a: EntityId, b: EntityId },
    /// The spawn tally reached its threshold.
    SurpriseTriggered { spawn_count: u32 },
}

impl BattleEvent {
    /// Whether this event removed a character from the live set.
    pub fn is_removal(&self) -> bool {
        matches!(self, BattleEvent::Defeated { removed: true, .. })
    }

    /// One-line human readable description.
    pub fn describe(&self) -> String {
        match self {
            BattleEvent::Spawned {
                entity,
                kind,
                position,
            } => format!(
                "{kind} {entity} spawned at ({}, {})",
                position.x, position.y
            ),
            BattleEvent::Collision { a, b } => format!("{a} collided with {b}"),
            BattleEvent::Defeated {
                winner,
                loser,
                loser_kind,
                removed: true,
            } => format!("{winner} defeated {loser_kind} {loser}"),
            BattleEvent::Defeated {
                winner,
                loser,
                loser_kind,
                removed: false,
            } => format!("{winner} defeated {loser_kind} {loser}, which was already gone"),
            BattleEvent::Stalemate { a, b } => format!("{a} and {b} tied"),
            BattleEvent::SurpriseTriggered { spawn_count } => {
                format!("surprise after {spawn_count} spawns")
            }
        }
    }
}
