//! Recording sessions and replaying them to check determinism.
//!
//! A [`ReplayRecorder`] collects the non-empty [`InputFrame`]s of a session
//! plus periodic state-hash checkpoints into a [`ReplayLog`]. [`replay`]
//! restores the log's initial snapshot, feeds the inputs back tick by tick,
//! and reports the first checkpoint whose hash does not match.
//!
//! Inputs and checkpoints are recorded *before* the tick they belong to runs,
//! after its input has been queued:
//!
//! ```
//! use skirmish_engine::prelude::*;
//! use skirmish_engine::replay::{replay, ReplayRecorder};
//!
//! let mut tick_loop = TickLoop::new(Battlefield::new(), TickConfig::default());
//! let mut recorder = ReplayRecorder::new(tick_loop.capture_snapshot(), 5);
//!
//! for i in 0..20 {
//!     if i % 4 == 0 {
//!         tick_loop.queue_random_spawn("Kuromi");
//!     }
//!     let tick = tick_loop.tick_count();
//!     recorder.record_tick(tick, tick_loop.current_input(), Some(tick_loop.state_hash()));
//!     tick_loop.tick();
//! }
//! let log = recorder.finish();
//!
//! let mut fresh = TickLoop::new(Battlefield::new(), TickConfig::default());
//! let result = replay(&mut fresh, &log).unwrap();
//! assert!(result.completed);
//! assert_eq!(fresh.state_hash(), tick_loop.state_hash());
//! ```

use std::collections::BTreeMap;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::snapshot::EngineSnapshot;
use crate::tick::{InputFrame, TickLoop};

// ---------------------------------------------------------------------------
// ReplayLog
// ---------------------------------------------------------------------------

/// A recorded session.
///
/// Only ticks with non-empty input get an `Input` entry; every other tick in
/// `initial_snapshot.tick_counter..initial_snapshot.tick_counter + total_ticks`
/// replays with an empty frame. The log is plain serde data and is usually
/// stored as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayLog {
    /// State before the first recorded tick.
    pub initial_snapshot: EngineSnapshot,
    /// Number of ticks recorded.
    pub total_ticks: u64,
    /// Inputs and checkpoints, in recording order.
    pub entries: Vec<ReplayEntry>,
}

// ---------------------------------------------------------------------------
// ReplayEntry
// ---------------------------------------------------------------------------

/// One recorded item, keyed by the tick it belongs to.
///
/// A log holds at most one entry of each variant per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReplayEntry {
    /// Input applied at the start of `tick`.
    Input { tick: u64, input: InputFrame },
    /// State hash just before `tick` ran.
    Checkpoint { tick: u64, state_hash: String },
}

impl ReplayEntry {
    /// The tick this entry belongs to.
    pub fn tick(&self) -> u64 {
        match self {
            ReplayEntry::Input { tick, .. } | ReplayEntry::Checkpoint { tick, .. } => *tick,
        }
    }
}

// ---------------------------------------------------------------------------
// ReplayResult
// ---------------------------------------------------------------------------

/// What [`replay`] observed.
///
/// A divergence is a result, not an error: the loop is left at the diverging
/// tick so the caller can inspect it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayResult {
    /// `true` when every tick ran and every checkpoint matched.
    pub completed: bool,
    /// Ticks executed before replay stopped.
    pub ticks_replayed: u64,
    /// The first mismatching checkpoint, if any.
    pub first_divergence: Option<ReplayDivergence>,
}

/// The first checkpoint that did not match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayDivergence {
    /// Tick whose pre-tick hash differed.
    pub tick: u64,
    /// Hash stored in the log.
    pub expected_hash: String,
    /// Hash the replaying loop produced.
    pub actual_hash: String,
}

// ---------------------------------------------------------------------------
// ReplayRecorder
// ---------------------------------------------------------------------------

/// Builds a [`ReplayLog`] while a session runs.
///
/// Call [`record_tick`](Self::record_tick) once per tick, after queuing that
/// tick's input and before running it, then [`finish`](Self::finish).
pub struct ReplayRecorder {
    log: ReplayLog,
    checkpoint_interval: u64,
    ticks_recorded: u64,
    last_tick: Option<u64>,
}

impl ReplayRecorder {
    /// Start recording from `snapshot`.
    ///
    /// A checkpoint is kept on every tick divisible by `checkpoint_interval`;
    /// an interval of 0 keeps every hash that is provided.
    pub fn new(snapshot: EngineSnapshot, checkpoint_interval: u64) -> Self {
        Self {
            log: ReplayLog {
                initial_snapshot: snapshot,
                total_ticks: 0,
                entries: Vec::new(),
            },
            checkpoint_interval,
            ticks_recorded: 0,
            last_tick: None,
        }
    }

    /// Record one tick's input and, optionally, its pre-tick state hash.
    ///
    /// # Panics
    ///
    /// Panics if `tick` is not strictly greater than the previous one.
    pub fn record_tick(&mut self, tick: u64, input: &InputFrame, state_hash: Option<String>) {
        if let Some(prev) = self.last_tick {
            assert!(
                tick > prev,
                "ReplayRecorder::record_tick: tick {tick} is not strictly greater than previous tick {prev}"
            );
        }
        self.last_tick = Some(tick);
        self.ticks_recorded += 1;

        if !input.is_empty() {
            self.log.entries.push(ReplayEntry::Input {
                tick,
                input: input.clone(),
            });
        }

        if let Some(hash) = state_hash {
            let keep = self.checkpoint_interval == 0 || tick % self.checkpoint_interval == 0;
            if keep {
                self.log.entries.push(ReplayEntry::Checkpoint {
                    tick,
                    state_hash: hash,
                });
            }
        }
    }

    /// Close the recording and return the log.
    pub fn finish(mut self) -> ReplayLog {
        self.log.total_ticks = self.ticks_recorded;
        self.log
    }
}

// ---------------------------------------------------------------------------
// replay()
// ---------------------------------------------------------------------------

/// Replay `log` on `tick_loop`.
///
/// Restores the initial snapshot, then for each recorded tick sets the input,
/// compares the checkpoint hash if there is one, and runs the tick. Replay
/// stops at the first mismatch. An empty log returns a completed result
/// without touching the loop.
///
/// # Errors
///
/// The log is validated before the loop is touched: duplicate entries,
/// entries outside the recorded range, and tick overflow are rejected, as is
/// an initial snapshot that fails to restore.
pub fn replay(tick_loop: &mut TickLoop, log: &ReplayLog) -> Result<ReplayResult, anyhow::Error> {
    let start_tick = log.initial_snapshot.tick_counter;
    let total_ticks = log.total_ticks;
    let Some(end_tick) = start_tick.checked_add(total_ticks) else {
        anyhow::bail!("replay of {total_ticks} ticks from tick {start_tick} overflows the tick counter");
    };

    let mut input_map: BTreeMap<u64, &InputFrame> = BTreeMap::new();
    let mut checkpoint_map: BTreeMap<u64, &str> = BTreeMap::new();

    for entry in &log.entries {
        let tick = entry.tick();
        anyhow::ensure!(
            (start_tick..end_tick).contains(&tick),
            "replay log entry at tick {tick} is outside the recorded range {start_tick}..{end_tick}"
        );
        match entry {
            ReplayEntry::Input { input, .. } => {
                anyhow::ensure!(
                    input_map.insert(tick, input).is_none(),
                    "replay log has two Input entries for tick {tick}"
                );
            }
            ReplayEntry::Checkpoint { state_hash, .. } => {
                anyhow::ensure!(
                    checkpoint_map.insert(tick, state_hash).is_none(),
                    "replay log has two Checkpoint entries for tick {tick}"
                );
            }
        }
    }

    if total_ticks == 0 {
        return Ok(ReplayResult {
            completed: true,
            ticks_replayed: 0,
            first_divergence: None,
        });
    }

    tick_loop
        .restore_from_snapshot(&log.initial_snapshot)
        .context("replay could not restore its starting snapshot")?;

    let mut ticks_replayed = 0u64;
    for tick in start_tick..end_tick {
        // The recorded hash covers the queued input, so set it first.
        let input = input_map.get(&tick).map(|i| (*i).clone()).unwrap_or_default();
        tick_loop.set_input(input);

        if let Some(expected_hash) = checkpoint_map.get(&tick) {
            let actual_hash = tick_loop.state_hash();
            if actual_hash != *expected_hash {
                tracing::warn!(tick, "replay diverged");
                return Ok(ReplayResult {
                    completed: false,
                    ticks_replayed,
                    first_divergence: Some(ReplayDivergence {
                        tick,
                        expected_hash: (*expected_hash).to_owned(),
                        actual_hash,
                    }),
                });
            }
        }

        tick_loop.tick();
        ticks_replayed += 1;
    }

    Ok(ReplayResult {
        completed: true,
        ticks_replayed,
        first_divergence: None,
    })
}
