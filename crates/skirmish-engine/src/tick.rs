//! Fixed-timestep tick driver.
//!
//! The [`TickLoop`] owns a [`Battlefield`] and drives it forward one tick at a
//! time. Each tick:
//!
//! 1. The queued [`InputFrame`] is taken and its spawn requests are applied in
//!    order. Unknown names are logged and dropped.
//! 2. The battlefield runs advance, detect, and resolve.
//! 3. Diagnostics are updated and the tick counter advances.
//!
//! Random placement happens when a spawn is *queued*, not when it is applied,
//! so an input frame always carries concrete positions. Replaying the same
//! frames therefore reproduces the same battle without the RNG.
//!
//! # Example
//!
//! ```
//! use skirmish_engine::prelude::*;
//!
//! let config = TickConfig { headless: true, ..Default::default() };
//! let mut tick_loop = TickLoop::new(Battlefield::new(), config);
//!
//! tick_loop.queue_spawn(SpawnRequest::new("Badtz Maru", (0, 0)));
//! // The spawn lands on tick 1, which also advances it.
//! tick_loop.run_ticks(5);
//!
//! let views = tick_loop.battlefield().snapshot();
//! assert_eq!(views[0].position, Point::new(15, 0));
//! assert_eq!(tick_loop.tick_count(), 5);
//! ```

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use skirmish_core::prelude::*;

use crate::battlefield::Battlefield;
use crate::events::BattleEvent;
use crate::spawn::{SpawnArea, SpawnRequest, SpawnTally};

// ---------------------------------------------------------------------------
// TickConfig
// ---------------------------------------------------------------------------

/// Configuration for the tick driver.
///
/// Every field has a default, so a JSON config file only needs to name the
/// fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Fixed time step in seconds per tick. Must be positive and finite.
    pub fixed_dt: f64,
    /// Headless mode: no rendering, tick as fast as possible.
    pub headless: bool,
    /// Seed for random spawn placement and surprise thresholds.
    pub seed: u64,
    /// Area random spawns land in.
    pub arena: SpawnArea,
    /// Spawn count at which the first surprise fires. `None` draws it from
    /// the seed, like every later threshold.
    pub initial_surprise_threshold: Option<u32>,
}

impl Default for TickConfig {
    /// 50 ms per tick, windowed, seed 0, an 800x600 arena, and a random first
    /// surprise threshold.
    fn default() -> Self {
        Self {
            fixed_dt: 0.05,
            headless: false,
            seed: 0,
            arena: SpawnArea::default(),
            initial_surprise_threshold: None,
        }
    }
}

// ---------------------------------------------------------------------------
// TickDiagnostics
// ---------------------------------------------------------------------------

/// Timings and counts for the last tick.
///
/// Reset at the start of every tick. Timings are wall-clock and never feed
/// back into the simulation.
#[derive(Debug, Clone, Default)]
pub struct TickDiagnostics {
    /// Time spent applying queued spawn requests.
    pub spawn_time: Duration,
    /// Time spent moving every character one step.
    pub advance_time: Duration,
    /// Time spent in the pairwise overlap sweep.
    pub detect_time: Duration,
    /// Time spent resolving pairs and removing losers.
    pub resolve_time: Duration,
    /// Total time for the tick, all phases included.
    pub total_time: Duration,
    /// Spawn requests applied.
    pub spawned: usize,
    /// Spawn requests dropped for naming no known kind.
    pub rejected: usize,
    /// Overlapping pairs found in the detect phase.
    pub collisions: usize,
    /// Characters actually removed in the resolve phase.
    pub removed: usize,
    /// Characters alive at the end of the tick.
    pub live: usize,
}

// ---------------------------------------------------------------------------
// InputFrame
// ---------------------------------------------------------------------------

/// External input applied at the start of the next tick.
///
/// Positions are already resolved, so a recorded frame replays identically
/// without any RNG state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Spawns to apply, in the order they were queued.
    pub spawns: Vec<SpawnRequest>,
}

impl InputFrame {
    /// Whether the frame carries no input.
    pub fn is_empty(&self) -> bool {
        self.spawns.is_empty()
    }
}

// ---------------------------------------------------------------------------
// TickLoop
// ---------------------------------------------------------------------------

/// The deterministic fixed-timestep driver.
///
/// All mutation goes through `&mut self`, so ticks and spawns are serialised
/// by construction. Share a loop across threads by wrapping it in a `Mutex`.
pub struct TickLoop {
    battlefield: Battlefield,
    tick_counter: u64,
    fixed_dt: f64,
    config: TickConfig,
    last_diagnostics: TickDiagnostics,
    /// Input for the next tick.
    current_input: InputFrame,
    rng: Pcg32,
    tally: SpawnTally,
}

impl TickLoop {
    /// Create a driver for `battlefield`.
    ///
    /// # Panics
    ///
    /// Panics if `config.fixed_dt` is not positive and finite.
    pub fn new(battlefield: Battlefield, config: TickConfig) -> Self {
        assert!(
            config.fixed_dt > 0.0 && config.fixed_dt.is_finite(),
            "fixed_dt must be positive and finite, got {}",
            config.fixed_dt
        );
        let rng = Pcg32::seed_from_u64(config.seed);
        let tally = SpawnTally::new(
            config.initial_surprise_threshold,
            Pcg32::seed_from_u64(config.seed.wrapping_add(1)),
        );
        Self {
            battlefield,
            tick_counter: 0,
            fixed_dt: config.fixed_dt,
            config,
            last_diagnostics: TickDiagnostics::default(),
            current_input: InputFrame::default(),
            rng,
            tally,
        }
    }

    /// Queue a spawn for the next tick.
    pub fn queue_spawn(&mut self, request: SpawnRequest) {
        self.current_input.spawns.push(request);
    }

    /// Queue a spawn at a random point inside the arena.
    ///
    /// Returns the chosen point.
    pub fn queue_random_spawn(&mut self, tag: impl Into<String>) -> Point {
        let position = self.config.arena.random_point(&mut self.rng);
        self.queue_spawn(SpawnRequest::new(tag, position));
        position
    }

    /// Execute one tick and return the events it produced, in order.
    pub fn tick(&mut self) -> Vec<BattleEvent> {
        let tick_start = Instant::now();
        let mut events = Vec::new();

        // Phase 0: apply queued input.
        let input = std::mem::take(&mut self.current_input);
        let mut spawned = 0;
        let mut rejected = 0;
        for request in input.spawns {
            match request.kind() {
                Ok(kind) => {
                    let entity = self.battlefield.spawn(kind, request.position);
                    spawned += 1;
                    events.push(BattleEvent::Spawned {
                        entity,
                        kind,
                        position: request.position,
                    });
                    if let Some(spawn_count) = self.tally.record() {
                        events.push(BattleEvent::SurpriseTriggered { spawn_count });
                    }
                }
                Err(err) => {
                    rejected += 1;
                    tracing::warn!(tick = self.tick_counter, %err, "dropping spawn request");
                }
            }
        }
        let spawn_time = tick_start.elapsed();

        // Phase 1: advance.
        let phase_start = Instant::now();
        self.battlefield.advance_all();
        let advance_time = phase_start.elapsed();

        // Phase 2: detect.
        let phase_start = Instant::now();
        let collisions = self.battlefield.detect();
        let detect_time = phase_start.elapsed();

        // Phase 3: resolve.
        let phase_start = Instant::now();
        let resolved = self.battlefield.resolve(&collisions);
        let resolve_time = phase_start.elapsed();
        let removed = resolved.iter().filter(|e| e.is_removal()).count();
        events.extend(resolved);

        self.tick_counter += 1;

        self.last_diagnostics = TickDiagnostics {
            spawn_time,
            advance_time,
            detect_time,
            resolve_time,
            total_time: tick_start.elapsed(),
            spawned,
            rejected,
            collisions: collisions.len(),
            removed,
            live: self.battlefield.len(),
        };

        events
    }

    /// Run `count` ticks. Returns the number of characters removed across
    /// all of them.
    pub fn run_ticks(&mut self, count: u64) -> u64 {
        let mut removed = 0u64;
        for _ in 0..count {
            self.tick();
            removed += self.last_diagnostics.removed as u64;
        }
        removed
    }

    // -- accessors ----------------------------------------------------------

    /// Ticks executed so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_counter
    }

    /// Simulation time in seconds, computed as `tick_count * fixed_dt`.
    pub fn sim_time(&self) -> f64 {
        self.tick_counter as f64 * self.fixed_dt
    }

    /// Seconds per tick. Restoring a snapshot replaces it.
    pub fn fixed_dt(&self) -> f64 {
        self.fixed_dt
    }

    /// The configuration the loop was built with.
    pub fn config(&self) -> &TickConfig {
        &self.config
    }

    /// The battlefield being driven.
    pub fn battlefield(&self) -> &Battlefield {
        &self.battlefield
    }

    /// Mutable access to the battlefield, for setup and tests.
    pub fn battlefield_mut(&mut self) -> &mut Battlefield {
        &mut self.battlefield
    }

    /// Timings and counts from the most recent tick.
    pub fn last_diagnostics(&self) -> &TickDiagnostics {
        &self.last_diagnostics
    }

    /// Replace the input for the next tick (used by replay).
    pub fn set_input(&mut self, input: InputFrame) {
        self.current_input = input;
    }

    /// Input that the next tick will apply.
    pub fn current_input(&self) -> &InputFrame {
        &self.current_input
    }

    /// The spawn counter behind `SurpriseTriggered` events.
    pub fn surprise_tally(&self) -> &SpawnTally {
        &self.tally
    }

    /// Whether the loop was configured to run without rendering.
    pub fn is_headless(&self) -> bool {
        self.config.headless
    }

    pub(crate) fn set_tick_counter(&mut self, tick: u64) {
        self.tick_counter = tick;
    }

    pub(crate) fn set_fixed_dt(&mut self, fixed_dt: f64) {
        self.fixed_dt = fixed_dt;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
