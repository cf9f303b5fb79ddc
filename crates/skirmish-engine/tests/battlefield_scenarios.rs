//! Integration tests for whole-battle scenarios.
//!
//! Each test sets up a small battlefield through the public API, runs a few
//! ticks, and checks the live set that remains.

use skirmish_engine::prelude::*;

fn kinds(field: &Battlefield) -> Vec<CharacterKind> {
    field.snapshot().iter().map(|v| v.kind).collect()
}

// ---------------------------------------------------------------------------
// Movement
// ---------------------------------------------------------------------------

#[test]
fn stationary_character_stays_put() {
    let mut field = Battlefield::new();
    let id = field.add_entity(0u8, (100, 100)).unwrap();
    for _ in 0..10 {
        field.tick();
    }
    assert_eq!(field.get(id).unwrap().position(), Point::new(100, 100));
}

#[test]
fn left_to_right_character_moves_three_per_tick() {
    let mut field = Battlefield::new();
    let id = field.add_entity(1u8, (0, 0)).unwrap();
    for _ in 0..5 {
        field.tick();
    }
    let view = field.snapshot()[0];
    assert_eq!(view.id, id);
    assert_eq!(view.position, Point::new(15, 0));
    assert_eq!((view.width, view.height), (75, 90));
}

#[test]
fn every_kind_moves_along_its_axis() {
    let mut field = Battlefield::new();
    // Far enough apart that nobody collides in ten ticks.
    for (i, kind) in CharacterKind::ALL.into_iter().enumerate() {
        field.spawn(kind, Point::new(i as i32 * 1_000, 1_000));
    }
    for _ in 0..10 {
        field.tick();
    }
    let positions: Vec<Point> = field.snapshot().iter().map(|v| v.position).collect();
    assert_eq!(
        positions,
        vec![
            Point::new(0, 1_000),
            Point::new(1_030, 1_000),
            Point::new(1_970, 1_000),
            Point::new(3_000, 1_030),
            Point::new(4_000, 970),
        ]
    );
}

#[test]
fn characters_may_leave_the_canvas() {
    let mut field = Battlefield::new();
    let id = field.spawn(CharacterKind::Cinnamoroll, Point::new(0, 0));
    for _ in 0..4 {
        field.tick();
    }
    assert_eq!(field.get(id).unwrap().position(), Point::new(0, -12));
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

#[test]
fn overlapping_winner_and_loser() {
    let mut field = Battlefield::new();
    field.add_entity(0u8, (0, 0)).unwrap();
    field.add_entity(1u8, (0, 0)).unwrap();

    field.tick();

    assert_eq!(kinds(&field), vec![CharacterKind::HelloKitty]);
}

#[test]
fn overlapping_same_kind_both_survive() {
    let mut field = Battlefield::new();
    field.add_entity(2u8, (0, 0)).unwrap();
    field.add_entity(2u8, (0, 0)).unwrap();

    let outcome = field.tick();

    assert_eq!(field.len(), 2);
    assert_eq!(outcome.removed(), 0);
}

#[test]
fn stale_pair_empties_the_field() {
    let mut field = Battlefield::new();
    field.add_entity(0u8, (0, 0)).unwrap();
    field.add_entity(1u8, (0, 0)).unwrap();
    field.add_entity(3u8, (0, 0)).unwrap();

    let outcome = field.tick();

    assert!(field.is_empty());
    assert_eq!(outcome.removed(), 3);
}

#[test]
fn unknown_tag_is_rejected() {
    let mut field = Battlefield::new();
    field.add_entity(4u8, (0, 0)).unwrap();

    let err = field.add_entity(7u8, (0, 0)).unwrap_err();

    assert_eq!(err, InvalidTypeError::UnknownTag(7));
    assert_eq!(field.len(), 1);
    assert!(err.to_string().contains('7'));
}

#[test]
fn collision_happens_once_paths_cross() {
    let mut field = Battlefield::new();
    // Badtz Maru walks right into My Melody's column and beats it.
    let badtz = field.spawn(CharacterKind::BadtzMaru, Point::new(0, 500));
    let melody = field.spawn(CharacterKind::MyMelody, Point::new(200, 400));

    let mut first_removal = None;
    for tick in 1..=60 {
        if field.tick().removed() > 0 {
            first_removal = Some(tick);
            break;
        }
    }

    assert!(first_removal.is_some());
    assert!(field.contains(badtz));
    assert!(!field.contains(melody));
}

#[test]
fn touching_edges_do_not_fight() {
    let mut field = Battlefield::new();
    // Two stationary characters side by side, sharing an edge.
    field.spawn(CharacterKind::HelloKitty, Point::new(0, 0));
    field.spawn(CharacterKind::HelloKitty, Point::new(75, 0));
    let outcome = field.tick();
    assert!(outcome.collisions.is_empty());
}

#[test]
fn custom_table_changes_the_winner() {
    // Reverse every outcome of the standard table.
    let mut cells = *OutcomeTable::rpskl().matrix();
    for row in cells.iter_mut() {
        for cell in row.iter_mut() {
            *cell = -*cell;
        }
    }
    let mut field = Battlefield::with_table(OutcomeTable::from_matrix(cells).unwrap());
    field.add_entity(0u8, (0, 0)).unwrap();
    field.add_entity(1u8, (0, 0)).unwrap();

    field.tick();

    assert_eq!(kinds(&field), vec![CharacterKind::BadtzMaru]);
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

#[test]
fn driver_runs_a_seeded_battle_reproducibly() {
    let run = |seed: u64| {
        let config = TickConfig {
            headless: true,
            seed,
            arena: SpawnArea::new(400, 300),
            ..Default::default()
        };
        let mut tick_loop = TickLoop::new(Battlefield::new(), config);
        for kind in CharacterKind::ALL {
            for _ in 0..4 {
                tick_loop.queue_random_spawn(kind.name());
            }
        }
        tick_loop.run_ticks(100);
        tick_loop.state_hash()
    };

    assert_eq!(run(11), run(11));
}
