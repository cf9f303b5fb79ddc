//! Skirmish Engine -- the battlefield simulation and its deterministic driver.
//!
//! This crate builds on [`skirmish_core`] to run battles: a [`Battlefield`]
//! holds the live set of characters and performs the advance / detect /
//! resolve tick, and a [`TickLoop`] feeds it spawn input at a fixed cadence.
//! Snapshots and replay logs make runs reproducible and checkable.
//!
//! [`Battlefield`]: battlefield::Battlefield
//! [`TickLoop`]: tick::TickLoop
//!
//! # Quick Start
//!
//! ```
//! use skirmish_engine::prelude::*;
//!
//! let mut field = Battlefield::new();
//! field.add_entity(0u8, (0, 0)).unwrap();
//! field.add_entity(1u8, (0, 0)).unwrap();
//! field.add_entity(3u8, (0, 0)).unwrap();
//!
//! let outcome = field.tick();
//! assert_eq!(outcome.collisions.len(), 3);
//! assert!(field.is_empty());
//!
//! assert!(matches!(field.add_entity(9u8, (0, 0)), Err(InvalidTypeError::UnknownTag(9))));
//! ```

#![deny(unsafe_code)]

pub mod battlefield;
pub mod collision;
pub mod events;
pub mod replay;
pub mod snapshot;
pub mod spawn;
pub mod tick;

/// Re-export the rules crate for convenience.
pub use skirmish_core;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    pub use skirmish_core::prelude::*;

    pub use crate::battlefield::{
        Battlefield, BattlefieldSnapshot, CharacterView, RestoreError, TickOutcome,
    };
    pub use crate::collision::{detect_collisions, CollisionPair};
    pub use crate::events::BattleEvent;
    pub use crate::replay::{
        replay, ReplayDivergence, ReplayEntry, ReplayLog, ReplayRecorder, ReplayResult,
    };
    pub use crate::snapshot::EngineSnapshot;
    pub use crate::spawn::{SpawnArea, SpawnRequest, SpawnTally, MAX_SURPRISE_THRESHOLD};
    pub use crate::tick::{InputFrame, TickConfig, TickDiagnostics, TickLoop};
}
