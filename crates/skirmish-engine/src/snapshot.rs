//! Whole-driver snapshots, hashed with BLAKE3.
//!
//! An [`EngineSnapshot`] holds everything that decides how the battle plays
//! out from here: the battlefield, the tick counter, the time step, and the
//! input queued for the next tick. Its `hash` is a BLAKE3 digest over the
//! canonical JSON of those fields, used both for integrity checks on restore
//! and for determinism checks during replay.
//!
//! # Usage
//!
//! ```
//! use skirmish_engine::prelude::*;
//!
//! let mut tick_loop = TickLoop::new(Battlefield::new(), TickConfig::default());
//! tick_loop.queue_spawn(SpawnRequest::new("Kuromi", (500, 0)));
//! tick_loop.run_ticks(10);
//!
//! let saved = tick_loop.capture_snapshot();
//! assert_eq!(saved.tick_counter, 10);
//! assert_eq!(saved.hash.len(), 64);
//!
//! tick_loop.run_ticks(25);
//! tick_loop.restore_from_snapshot(&saved).unwrap();
//! assert_eq!(tick_loop.tick_count(), 10);
//! assert_eq!(tick_loop.state_hash(), saved.hash);
//! ```
//!
//! # Not captured
//!
//! - **RNG and surprise tally**: random placement is resolved when a spawn is
//!   queued, so queued input already carries its position. The tally only
//!   drives events, never state.
//! - **Outcome table**: the restored battlefield keeps its own table.
//! - **Diagnostics**: per-tick timing is transient.

use serde::{Deserialize, Serialize};

use crate::battlefield::BattlefieldSnapshot;
use crate::tick::{InputFrame, TickLoop};

// ---------------------------------------------------------------------------
// EngineSnapshot
// ---------------------------------------------------------------------------

/// Serializable state of a [`TickLoop`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Allocator and live set.
    pub battlefield: BattlefieldSnapshot,
    /// Ticks executed at capture time.
    pub tick_counter: u64,
    /// Seconds per tick.
    pub fixed_dt: f64,
    /// Input queued for the next tick at capture time.
    pub current_input: InputFrame,
    /// BLAKE3 hex digest of the fields above.
    pub hash: String,
}

// ---------------------------------------------------------------------------
// Hashing helpers
// ---------------------------------------------------------------------------

fn compute_hash(
    battlefield: &BattlefieldSnapshot,
    tick_counter: u64,
    fixed_dt: f64,
    input: &InputFrame,
) -> String {
    #[derive(Serialize)]
    struct HashedFields<'a> {
        battlefield: &'a BattlefieldSnapshot,
        tick_counter: u64,
        fixed_dt: f64,
        current_input: &'a InputFrame,
    }

    let fields = HashedFields {
        battlefield,
        tick_counter,
        fixed_dt,
        current_input: input,
    };

    let json_bytes = serde_json::to_vec(&fields)
        .expect("engine state should always be JSON-serializable");

    blake3::hash(&json_bytes).to_hex().to_string()
}

// ---------------------------------------------------------------------------
// TickLoop snapshot/restore methods
// ---------------------------------------------------------------------------

impl TickLoop {
    /// Capture the current state with its hash.
    pub fn capture_snapshot(&self) -> EngineSnapshot {
        let battlefield = self.battlefield().capture_snapshot();
        let hash = compute_hash(
            &battlefield,
            self.tick_count(),
            self.fixed_dt(),
            self.current_input(),
        );
        EngineSnapshot {
            battlefield,
            tick_counter: self.tick_count(),
            fixed_dt: self.fixed_dt(),
            current_input: self.current_input().clone(),
            hash,
        }
    }

    /// Restore state from `snapshot`.
    ///
    /// # Errors
    ///
    /// Fails without touching the loop when `fixed_dt` is invalid, the hash
    /// does not match the contents, or the battlefield part is inconsistent.
    pub fn restore_from_snapshot(&mut self, snapshot: &EngineSnapshot) -> Result<(), anyhow::Error> {
        anyhow::ensure!(
            snapshot.fixed_dt > 0.0 && snapshot.fixed_dt.is_finite(),
            "snapshot has invalid fixed_dt {} (needs a positive, finite step)",
            snapshot.fixed_dt
        );

        let recomputed = compute_hash(
            &snapshot.battlefield,
            snapshot.tick_counter,
            snapshot.fixed_dt,
            &snapshot.current_input,
        );
        anyhow::ensure!(
            recomputed == snapshot.hash,
            "snapshot hash mismatch at tick {}: stored {}, contents hash to {}",
            snapshot.tick_counter,
            snapshot.hash,
            recomputed
        );

        // Battlefield restore validates before it mutates, so a failure here
        // still leaves the loop untouched.
        self.battlefield_mut()
            .restore(&snapshot.battlefield)
            .map_err(|e| anyhow::anyhow!("failed to restore battlefield from snapshot: {e}"))?;

        self.set_tick_counter(snapshot.tick_counter);
        self.set_fixed_dt(snapshot.fixed_dt);
        self.set_input(snapshot.current_input.clone());

        tracing::debug!(
            tick = snapshot.tick_counter,
            live = snapshot.battlefield.characters.len(),
            "restored snapshot"
        );
        Ok(())
    }

    /// Hash of the current state, equal to `capture_snapshot().hash`.
    pub fn state_hash(&self) -> String {
        compute_hash(
            &self.battlefield().capture_snapshot(),
            self.tick_count(),
            self.fixed_dt(),
            self.current_input(),
        )
    }

    /// Capture a branch point. Restore it on any loop to explore another path.
    pub fn fork_snapshot(&self) -> EngineSnapshot {
        self.capture_snapshot()
    }
}
