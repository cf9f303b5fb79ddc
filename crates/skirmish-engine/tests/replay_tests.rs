//! Integration tests for snapshots and deterministic replay.
//!
//! These tests record real sessions through the public API, serialize the
//! resulting logs to JSON, and replay them on fresh loops.

use skirmish_engine::prelude::*;

fn config(seed: u64) -> TickConfig {
    TickConfig {
        headless: true,
        seed,
        arena: SpawnArea::new(500, 400),
        ..Default::default()
    }
}

/// Run `ticks` ticks, spawning a random character every few ticks, and
/// return the loop together with its recording.
fn record_session(seed: u64, ticks: u64, interval: u64) -> (TickLoop, ReplayLog) {
    let mut tick_loop = TickLoop::new(Battlefield::new(), config(seed));
    let mut recorder = ReplayRecorder::new(tick_loop.capture_snapshot(), interval);
    for i in 0..ticks {
        if i % 2 == 0 {
            let kind = CharacterKind::ALL[(i as usize / 2) % CharacterKind::ALL.len()];
            tick_loop.queue_random_spawn(kind.name());
        }
        let tick = tick_loop.tick_count();
        recorder.record_tick(tick, tick_loop.current_input(), Some(tick_loop.state_hash()));
        tick_loop.tick();
    }
    (tick_loop, recorder.finish())
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

#[test]
fn fork_explores_identical_branches() {
    let (mut tick_loop, _) = record_session(3, 40, 10);
    let fork = tick_loop.fork_snapshot();

    tick_loop.run_ticks(30);
    let hash_a = tick_loop.state_hash();

    tick_loop.restore_from_snapshot(&fork).unwrap();
    tick_loop.run_ticks(30);
    assert_eq!(tick_loop.state_hash(), hash_a);
}

#[test]
fn restore_on_a_fresh_loop_continues_identically() {
    let (mut original, _) = record_session(5, 30, 10);
    let snap = original.capture_snapshot();

    let mut copy = TickLoop::new(Battlefield::new(), config(5));
    copy.restore_from_snapshot(&snap).unwrap();

    original.run_ticks(50);
    copy.run_ticks(50);
    assert_eq!(copy.battlefield().snapshot(), original.battlefield().snapshot());
    assert_eq!(copy.state_hash(), original.state_hash());
}

#[test]
fn restore_keeps_the_time_step() {
    let mut tick_loop = TickLoop::new(
        Battlefield::new(),
        TickConfig {
            fixed_dt: 0.1,
            ..config(0)
        },
    );
    tick_loop.run_ticks(4);
    let snap = tick_loop.capture_snapshot();

    let mut other = TickLoop::new(Battlefield::new(), config(0));
    other.restore_from_snapshot(&snap).unwrap();
    assert_eq!(other.fixed_dt(), 0.1);
    assert!((other.sim_time() - 0.4).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

#[test]
fn replay_after_json_round_trip() {
    let (original, log) = record_session(8, 60, 10);
    let json = serde_json::to_string(&log).unwrap();
    let log: ReplayLog = serde_json::from_str(&json).unwrap();

    // A different seed does not matter: inputs carry their positions.
    let mut fresh = TickLoop::new(Battlefield::new(), config(999));
    let result = replay(&mut fresh, &log).unwrap();

    assert!(result.completed);
    assert_eq!(result.ticks_replayed, 60);
    assert_eq!(fresh.state_hash(), original.state_hash());
}

#[test]
fn replay_detects_a_tampered_checkpoint() {
    let (_, mut log) = record_session(2, 30, 10);
    for entry in &mut log.entries {
        if let ReplayEntry::Checkpoint { tick: 20, state_hash } = entry {
            *state_hash = "0".repeat(64);
        }
    }

    let mut fresh = TickLoop::new(Battlefield::new(), config(2));
    let result = replay(&mut fresh, &log).unwrap();

    assert!(!result.completed);
    let divergence = result.first_divergence.unwrap();
    assert_eq!(divergence.tick, 20);
    assert_eq!(divergence.expected_hash, "0".repeat(64));
}

#[test]
fn replay_from_a_mid_session_snapshot() {
    let mut tick_loop = TickLoop::new(Battlefield::new(), config(4));
    for name in ["Kuromi", "Hello Kitty", "Cinnamoroll"] {
        tick_loop.queue_random_spawn(name);
    }
    tick_loop.run_ticks(15);

    let mut recorder = ReplayRecorder::new(tick_loop.capture_snapshot(), 0);
    for _ in 0..15 {
        let tick = tick_loop.tick_count();
        recorder.record_tick(tick, tick_loop.current_input(), Some(tick_loop.state_hash()));
        tick_loop.tick();
    }
    let log = recorder.finish();
    assert_eq!(log.initial_snapshot.tick_counter, 15);

    let mut fresh = TickLoop::new(Battlefield::new(), config(4));
    let result = replay(&mut fresh, &log).unwrap();
    assert!(result.completed);
    assert_eq!(fresh.tick_count(), 30);
    assert_eq!(fresh.state_hash(), tick_loop.state_hash());
}

#[test]
fn corrupted_initial_snapshot_fails_cleanly() {
    let (_, mut log) = record_session(6, 10, 5);
    log.initial_snapshot.hash = "deadbeef".into();

    let mut target = TickLoop::new(Battlefield::new(), config(6));
    target.queue_spawn(SpawnRequest::new("Kuromi", (1, 1)));
    target.tick();
    let before = target.state_hash();

    let err = replay(&mut target, &log).unwrap_err();
    assert!(err.to_string().contains("could not restore its starting snapshot"));
    assert_eq!(target.state_hash(), before);
}
