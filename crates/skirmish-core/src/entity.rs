//! Character identifiers and allocation.
//!
//! Every character on the field gets an [`EntityId`]: a slot index plus the
//! slot's generation at the time it was handed out. Freeing a slot bumps its
//! generation, so an id kept around after its character was defeated can never
//! name the newcomer that later takes the same slot. Removing a loser twice in
//! one tick is therefore harmless.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A generational character identifier, displayed as `{index}v{generation}`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    /// Build an id from its parts. Mostly useful in tests; live ids come
    /// from [`EntityAllocator::allocate`].
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot this id points at.
    #[inline]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// How many times the slot had been freed when this id was issued.
    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({self})")
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// State of one allocator slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Bumped every time the slot is freed.
    pub generation: u32,
    /// Whether a live id currently names this slot.
    pub occupied: bool,
}

/// Hands out [`EntityId`]s and recycles freed slots.
///
/// Freed slots are reused oldest first.
#[derive(Debug, Clone, Default)]
pub struct EntityAllocator {
    slots: Vec<Slot>,
    free: VecDeque<u32>,
    live: usize,
}

impl EntityAllocator {
    /// An allocator with no slots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue an id, reusing the oldest free slot if there is one.
    pub fn allocate(&mut self) -> EntityId {
        self.live += 1;
        match self.free.pop_front() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.occupied = true;
                EntityId::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    occupied: true,
                });
                EntityId::new(index, 0)
            }
        }
    }

    /// Free the slot behind `id`. Returns `false`, changing nothing, when
    /// `id` is not live.
    pub fn deallocate(&mut self, id: EntityId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let slot = &mut self.slots[id.index() as usize];
        slot.occupied = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push_back(id.index());
        self.live -= 1;
        true
    }

    /// Whether `id` names an occupied slot at its current generation. Ids
    /// for slots the allocator never issued are not alive.
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.slots
            .get(id.index() as usize)
            .is_some_and(|slot| slot.occupied && slot.generation == id.generation())
    }

    /// Number of ids currently live.
    pub fn alive_count(&self) -> usize {
        self.live
    }

    /// Copy out the slot table and free queue.
    pub fn snapshot_state(&self) -> AllocatorSnapshot {
        AllocatorSnapshot {
            slots: self.slots.clone(),
            free: self.free.iter().copied().collect(),
        }
    }

    /// Rebuild an allocator from a snapshot.
    ///
    /// The free queue keeps its order, so the ids issued after a restore are
    /// the ones the captured allocator would have issued. The snapshot is
    /// trusted as is; callers restoring untrusted data check the free list
    /// first, as `Battlefield::restore` does.
    pub fn restore_from_snapshot(snapshot: &AllocatorSnapshot) -> Self {
        Self {
            slots: snapshot.slots.clone(),
            free: snapshot.free.iter().copied().collect(),
            live: snapshot.slots.iter().filter(|slot| slot.occupied).count(),
        }
    }
}

/// Serializable state of an [`EntityAllocator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatorSnapshot {
    /// Every slot ever created, by index.
    pub slots: Vec<Slot>,
    /// Free slot indices, oldest first.
    pub free: Vec<u32>,
}
