//! Property tests for the rules crate.
//!
//! These tests use `proptest` to check the outcome table, rectangle overlap,
//! and movement against every kind and a wide range of coordinates.

use proptest::prelude::*;
use skirmish_core::prelude::*;

fn any_kind() -> impl Strategy<Value = CharacterKind> {
    (0u8..KIND_COUNT as u8).prop_map(|tag| CharacterKind::from_tag(tag).unwrap())
}

/// Coordinates well inside the i32 range so sums never saturate.
fn coord() -> impl Strategy<Value = i32> {
    -100_000i32..100_000i32
}

fn any_rect() -> impl Strategy<Value = Rect> {
    (coord(), coord(), 0u32..400, 0u32..400).prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    #[test]
    fn table_is_antisymmetric(a in any_kind(), b in any_kind()) {
        let table = OutcomeTable::rpskl();
        prop_assert_eq!(table.resolve(a, b), table.resolve(b, a).inverse());
        prop_assert_eq!(table.cell(a, b), -table.cell(b, a));
        if a == b {
            prop_assert_eq!(table.resolve(a, b), Outcome::Neutral);
        }
    }

    #[test]
    fn table_follows_the_cycle(a in any_kind(), offset in 0usize..KIND_COUNT) {
        let table = OutcomeTable::rpskl();
        let b = CharacterKind::ALL[(a.index() + offset) % KIND_COUNT];
        let expected = match offset {
            0 => Outcome::Neutral,
            1 | 2 => Outcome::AWins,
            _ => Outcome::BWins,
        };
        prop_assert_eq!(table.resolve(a, b), expected);
    }

    #[test]
    fn intersects_is_symmetric(a in any_rect(), b in any_rect()) {
        prop_assert_eq!(a.intersects(&b), b.intersects(&a));
    }

    #[test]
    fn adjacent_rects_never_intersect(
        x in coord(), y in coord(), w in 1u32..400, h in 1u32..400, other_w in 1u32..400,
    ) {
        let left = Rect::new(x, y, w, h);
        let right = Rect::new(x + w as i32, y, other_w, h);
        prop_assert!(!left.intersects(&right));
    }

    #[test]
    fn movement_is_deterministic(
        kind in any_kind(), x in coord(), y in coord(), steps in 0u32..500,
    ) {
        let run = || {
            let mut c = Character::new(EntityId::new(0, 0), kind, Point::new(x, y));
            for _ in 0..steps {
                c.advance();
            }
            c.position()
        };
        let first = run();
        prop_assert_eq!(first, run());
        let (dx, dy) = kind.movement().displacement();
        let steps = steps as i32;
        prop_assert_eq!(first, Point::new(x, y).offset(dx * steps, dy * steps));
    }

    #[test]
    fn bounds_keep_the_kind_size(kind in any_kind(), x in coord(), y in coord(), steps in 0u32..50) {
        let mut c = Character::new(EntityId::new(0, 0), kind, Point::new(x, y));
        for _ in 0..steps {
            c.advance();
        }
        let bounds = c.bounds();
        prop_assert_eq!((bounds.width, bounds.height), kind.size());
        prop_assert_eq!(Point::new(bounds.x, bounds.y), c.position());
    }
}

#[test]
fn character_serializes_with_kind_and_position() {
    let c = Character::new(EntityId::new(3, 1), CharacterKind::Kuromi, Point::new(-4, 9));
    let json = serde_json::to_value(&c).unwrap();
    assert_eq!(json["kind"], "Kuromi");
    assert_eq!(json["position"]["x"], -4);
    let back: Character = serde_json::from_value(json).unwrap();
    assert_eq!(back, c);
}
