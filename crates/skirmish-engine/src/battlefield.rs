//! The battlefield: the live set of characters and the three-phase tick.
//!
//! Each [`Battlefield::tick`] is one atomic transition:
//!
//! 1. **Advance**: every live character moves one step.
//! 2. **Detect**: every overlapping pair is recorded, in discovery order.
//! 3. **Resolve**: each pair is looked up in the [`OutcomeTable`] and the loser
//!    is removed.
//!
//! Pairs are a snapshot taken in phase 2 while removals happen in phase 3, so
//! a pair whose participant is already gone still resolves with the recorded
//! kinds and may remove its other participant. Removing a character that is no
//! longer live is a silent no-op.
//!
//! # Example
//!
//! ```
//! use skirmish_engine::battlefield::Battlefield;
//!
//! let mut field = Battlefield::new();
//! let kitty = field.add_entity(0u8, (0, 0)).unwrap();
//! let badtz = field.add_entity("Badtz Maru", (0, 0)).unwrap();
//!
//! field.tick();
//!
//! assert!(field.contains(kitty));
//! assert!(!field.contains(badtz));
//! ```

use serde::{Deserialize, Serialize};
use skirmish_core::entity::AllocatorSnapshot;
use skirmish_core::prelude::*;

use crate::collision::{detect_collisions, CollisionPair};
use crate::events::BattleEvent;

// ---------------------------------------------------------------------------
// Views and outcomes
// ---------------------------------------------------------------------------

/// Read-only view of one live character, as handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterView {
    pub id: EntityId,
    pub kind: CharacterKind,
    pub position: Point,
    pub width: u32,
    pub height: u32,
}

impl From<&Character> for CharacterView {
    fn from(character: &Character) -> Self {
        Self {
            id: character.id(),
            kind: character.kind(),
            position: character.position(),
            width: character.width(),
            height: character.height(),
        }
    }
}

/// What a single tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Overlapping pairs found in the detect phase, in discovery order.
    pub collisions: Vec<CollisionPair>,
    /// Events emitted during the tick, in the order they happened.
    pub events: Vec<BattleEvent>,
}

impl TickOutcome {
    /// Number of characters actually removed during the tick.
    pub fn removed(&self) -> usize {
        self.events.iter().filter(|e| e.is_removal()).count()
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Serializable state of a [`Battlefield`].
///
/// The outcome table is not captured: restoring keeps whatever table the
/// target battlefield was built with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattlefieldSnapshot {
    /// Id allocator state, including the free queue.
    pub allocator: AllocatorSnapshot,
    /// Live characters in insertion order.
    pub characters: Vec<Character>,
}

/// Reasons a [`BattlefieldSnapshot`] cannot be restored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RestoreError {
    /// A character refers to an id the allocator does not consider alive.
    #[error("character {0} is not alive in the allocator snapshot")]
    DeadEntity(EntityId),
    /// The same id appears more than once in the character list.
    #[error("character {0} appears more than once")]
    DuplicateEntity(EntityId),
    /// The allocator and the character list disagree on the live count.
    #[error("allocator has {alive} live ids but the snapshot holds {characters} characters")]
    CountMismatch { alive: usize, characters: usize },
    /// The allocator's free list names a slot that is out of range, occupied,
    /// or already listed.
    #[error("free list entry {0} is out of range, occupied, or repeated")]
    InvalidFreeSlot(u32),
}

// ---------------------------------------------------------------------------
// Battlefield
// ---------------------------------------------------------------------------

/// The set of characters currently in play.
///
/// Characters are kept in insertion order; that order drives pair discovery
/// and therefore which removals a tick performs.
#[derive(Debug, Clone)]
pub struct Battlefield {
    allocator: EntityAllocator,
    characters: Vec<Character>,
    table: OutcomeTable,
}

impl Battlefield {
    /// An empty battlefield using the standard RPSKL table.
    pub fn new() -> Self {
        Self::with_table(OutcomeTable::rpskl())
    }

    /// An empty battlefield using a custom outcome table.
    pub fn with_table(table: OutcomeTable) -> Self {
        Self {
            allocator: EntityAllocator::new(),
            characters: Vec::new(),
            table,
        }
    }

    /// Add a character by numeric tag or by name.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTypeError`] when the tag names no known kind. The
    /// battlefield is left unchanged in that case.
    pub fn add_entity<T>(
        &mut self,
        tag: T,
        position: impl Into<Point>,
    ) -> Result<EntityId, InvalidTypeError>
    where
        T: TryInto<CharacterKind, Error = InvalidTypeError>,
    {
        let kind = tag.try_into()?;
        Ok(self.spawn(kind, position.into()))
    }

    /// Add a character of a known kind.
    pub fn spawn(&mut self, kind: CharacterKind, position: Point) -> EntityId {
        let id = self.allocator.allocate();
        self.characters.push(Character::new(id, kind, position));
        tracing::debug!(entity = %id, %kind, x = position.x, y = position.y, "spawned");
        id
    }

    /// Remove a character. Returns `false` if `id` was not live.
    pub fn remove(&mut self, id: EntityId) -> bool {
        if !self.allocator.is_alive(id) {
            return false;
        }
        if let Some(index) = self.index_of(id) {
            // `Vec::remove` keeps the remaining characters in order.
            self.characters.remove(index);
        }
        self.allocator.deallocate(id);
        tracing::debug!(entity = %id, "removed");
        true
    }

    // -- phases -------------------------------------------------------------

    /// Phase 1: advance every live character one step.
    pub fn advance_all(&mut self) {
        for character in &mut self.characters {
            character.advance();
        }
    }

    /// Phase 2: find every overlapping pair.
    pub fn detect(&self) -> Vec<CollisionPair> {
        detect_collisions(&self.characters)
    }

    /// Phase 3: resolve `pairs` in order, removing losers.
    ///
    /// Pairs whose participants are already gone still resolve with their
    /// recorded kinds.
    pub fn resolve(&mut self, pairs: &[CollisionPair]) -> Vec<BattleEvent> {
        let mut events = Vec::with_capacity(pairs.len() * 2);
        for pair in pairs {
            events.push(pair.to_battle_event());
            let (winner, loser, loser_kind) = match self.table.resolve(pair.kind_a, pair.kind_b) {
                Outcome::AWins => (pair.entity_a, pair.entity_b, pair.kind_b),
                Outcome::BWins => (pair.entity_b, pair.entity_a, pair.kind_a),
                Outcome::Neutral => {
                    events.push(BattleEvent::Stalemate {
                        a: pair.entity_a,
                        b: pair.entity_b,
                    });
                    continue;
                }
            };
            let removed = self.remove(loser);
            events.push(BattleEvent::Defeated {
                winner,
                loser,
                loser_kind,
                removed,
            });
        }
        events
    }

    /// Run advance, detect, and resolve.
    pub fn tick(&mut self) -> TickOutcome {
        self.advance_all();
        let collisions = self.detect();
        let events = self.resolve(&collisions);
        TickOutcome { collisions, events }
    }

    // -- queries ------------------------------------------------------------

    /// Ordered views of every live character.
    pub fn snapshot(&self) -> Vec<CharacterView> {
        self.characters.iter().map(CharacterView::from).collect()
    }

    /// Draw every live character, in order.
    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        for character in &self.characters {
            character.draw(surface);
        }
    }

    /// Number of live characters.
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// Whether no character is live.
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Whether `id` names a live character. Ids of removed characters never
    /// match again, even after their slot is reused.
    ///
    /// ```
    /// use skirmish_engine::prelude::*;
    ///
    /// let mut field = Battlefield::new();
    /// let old = field.spawn(CharacterKind::Kuromi, Point::new(0, 0));
    /// field.remove(old);
    /// let new = field.spawn(CharacterKind::Kuromi, Point::new(0, 0));
    ///
    /// assert_eq!(old.index(), new.index());
    /// assert!(!field.contains(old));
    /// assert!(field.get(old).is_none());
    /// assert_eq!(field.get(new).map(Character::kind), Some(CharacterKind::Kuromi));
    /// ```
    pub fn contains(&self, id: EntityId) -> bool {
        self.allocator.is_alive(id)
    }

    /// The live character behind `id`.
    pub fn get(&self, id: EntityId) -> Option<&Character> {
        if !self.allocator.is_alive(id) {
            return None;
        }
        self.index_of(id).map(|index| &self.characters[index])
    }

    /// Live characters in insertion order.
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    /// The outcome table used to resolve collisions.
    pub fn table(&self) -> &OutcomeTable {
        &self.table
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.characters.iter().position(|c| c.id() == id)
    }

    // -- snapshot -----------------------------------------------------------

    /// Capture the allocator and the ordered live set.
    pub fn capture_snapshot(&self) -> BattlefieldSnapshot {
        BattlefieldSnapshot {
            allocator: self.allocator.snapshot_state(),
            characters: self.characters.clone(),
        }
    }

    /// Replace the live set with the contents of `snapshot`.
    ///
    /// The snapshot is validated first; on error nothing changes. Besides the
    /// character list, the allocator's free list must only name unoccupied
    /// slots in range, each once, so later spawns never reuse a live id.
    pub fn restore(&mut self, snapshot: &BattlefieldSnapshot) -> Result<(), RestoreError> {
        let slots = &snapshot.allocator.slots;
        let mut listed = vec![false; slots.len()];
        for &index in &snapshot.allocator.free {
            match slots.get(index as usize) {
                Some(slot) if !slot.occupied && !listed[index as usize] => {
                    listed[index as usize] = true;
                }
                _ => return Err(RestoreError::InvalidFreeSlot(index)),
            }
        }

        let allocator = EntityAllocator::restore_from_snapshot(&snapshot.allocator);

        let mut seen = std::collections::HashSet::with_capacity(snapshot.characters.len());
        for character in &snapshot.characters {
            let id = character.id();
            if !allocator.is_alive(id) {
                return Err(RestoreError::DeadEntity(id));
            }
            if !seen.insert(id) {
                return Err(RestoreError::DuplicateEntity(id));
            }
        }
        if allocator.alive_count() != snapshot.characters.len() {
            return Err(RestoreError::CountMismatch {
                alive: allocator.alive_count(),
                characters: snapshot.characters.len(),
            });
        }

        self.allocator = allocator;
        self.characters = snapshot.characters.clone();
        Ok(())
    }
}

impl Default for Battlefield {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
