//! The on-field character entity.
//!
//! A [`Character`] is plain data: an id, a kind, and a position. Size and
//! movement come from the kind, so they can never drift for the lifetime of
//! the character.

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::geometry::{Point, Rect};
use crate::kind::CharacterKind;

/// Something a renderer can draw characters into.
///
/// The renderer maps the kind to an asset and the rectangle to pixels.
pub trait DrawSurface {
    /// Draw one character of `kind` filling `bounds`.
    fn draw_character(&mut self, kind: CharacterKind, bounds: Rect);
}

/// A single character on the battlefield.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    id: EntityId,
    kind: CharacterKind,
    position: Point,
}

impl Character {
    /// Create a character of `kind` at `position`.
    pub fn new(id: EntityId, kind: CharacterKind, position: Point) -> Self {
        Self { id, kind, position }
    }

    /// Identity issued when the character was placed.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Kind, fixed for the character's lifetime.
    pub fn kind(&self) -> CharacterKind {
        self.kind
    }

    /// Top-left corner.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Width in pixels, taken from the kind.
    pub fn width(&self) -> u32 {
        self.kind.size().0
    }

    /// Height in pixels, taken from the kind.
    pub fn height(&self) -> u32 {
        self.kind.size().1
    }

    /// Move one step according to the kind's movement rule.
    ///
    /// Touches nothing but this character's position.
    #[inline]
    pub fn advance(&mut self) {
        self.position = self.kind.movement().step(self.position);
    }

    /// Bounding box at the current position. Computed on every call.
    #[inline]
    pub fn bounds(&self) -> Rect {
        let (width, height) = self.kind.size();
        Rect::at(self.position, width, height)
    }

    /// Hand this character to a renderer.
    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        surface.draw_character(self.kind, self.bounds());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(CharacterKind, Rect)>,
    }

    impl DrawSurface for Recorder {
        fn draw_character(&mut self, kind: CharacterKind, bounds: Rect) {
            self.calls.push((kind, bounds));
        }
    }

    #[test]
    fn bounds_follow_position() {
        let mut c = Character::new(EntityId::new(0, 0), CharacterKind::Kuromi, Point::new(50, 20));
        assert_eq!(c.bounds(), Rect::new(50, 20, 80, 100));
        c.advance();
        assert_eq!(c.bounds(), Rect::new(47, 20, 80, 100));
    }

    #[test]
    fn size_comes_from_kind() {
        let c = Character::new(EntityId::new(1, 0), CharacterKind::Cinnamoroll, Point::new(0, 0));
        assert_eq!((c.width(), c.height()), (150, 120));
    }

    #[test]
    fn advance_n_times_moves_n_steps() {
        let mut c = Character::new(EntityId::new(0, 0), CharacterKind::MyMelody, Point::new(5, 5));
        for _ in 0..10 {
            c.advance();
        }
        assert_eq!(c.position(), Point::new(5, 35));
    }

    #[test]
    fn draw_hands_kind_and_bounds_to_surface() {
        let c = Character::new(EntityId::new(0, 0), CharacterKind::HelloKitty, Point::new(3, 4));
        let mut surface = Recorder::default();
        c.draw(&mut surface);
        assert_eq!(
            surface.calls,
            vec![(CharacterKind::HelloKitty, Rect::new(3, 4, 75, 95))]
        );
    }
}
