//! Fixed-capacity slot arena shared by tiles, asteroids and rockets.

use scrap_station_core::{Event, PoolKind, SlotId};

/// Outcome of inserting a value into a [`SlotPool`].
#[derive(Clone, Debug, PartialEq)]
pub struct Allocation<T> {
    /// Slot now holding the inserted value.
    pub slot: SlotId,
    /// Previous occupant overwritten because no free slot was found.
    pub evicted: Option<T>,
}

/// Arena of optional slots with a persistent round-robin scan cursor.
///
/// Insertion starts at the remembered cursor and advances, wrapping, while
/// the slot under the cursor is occupied. The scan gives up after `capacity`
/// advances, at which point it has wrapped back to the slot it started from
/// and overwrites that occupant. The cursor stays on the written slot.
#[derive(Clone, Debug)]
pub struct SlotPool<T> {
    slots: Vec<Option<T>>,
    cursor: usize,
}

impl<T> SlotPool<T> {
    /// Creates an empty pool with `capacity` slots. A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { slots, cursor: 0 }
    }

    /// Number of slots reserved for the pool.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Reports whether every slot is free.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Slot the next insertion starts scanning from.
    #[must_use]
    pub fn cursor(&self) -> SlotId {
        slot_id(self.cursor)
    }

    /// Stores `value` in the next free slot, evicting an occupant under saturation.
    pub fn insert(&mut self, value: T) -> Allocation<T> {
        let capacity = self.slots.len();
        let mut failsafe = capacity;
        while self.slots[self.cursor].is_some() && failsafe > 0 {
            failsafe -= 1;
            self.cursor = (self.cursor + 1) % capacity;
        }

        let evicted = self.slots[self.cursor].replace(value);
        Allocation {
            slot: slot_id(self.cursor),
            evicted,
        }
    }

    /// Frees the slot, returning its occupant.
    pub fn release(&mut self, slot: SlotId) -> Option<T> {
        self.slots.get_mut(index(slot)).and_then(Option::take)
    }

    /// Returns the occupant of the slot, if any.
    #[must_use]
    pub fn get(&self, slot: SlotId) -> Option<&T> {
        self.slots.get(index(slot)).and_then(Option::as_ref)
    }

    /// Returns mutable access to the occupant of the slot, if any.
    pub fn get_mut(&mut self, slot: SlotId) -> Option<&mut T> {
        self.slots.get_mut(index(slot)).and_then(Option::as_mut)
    }

    /// Every slot identifier in scan order, occupied or not.
    ///
    /// The iterator does not borrow the pool, so callers may mutate slots
    /// (including inserting) while walking it.
    pub fn slot_ids(&self) -> impl Iterator<Item = SlotId> {
        (0..self.slots.len()).map(slot_id)
    }

    /// Iterator over occupied slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|value| (slot_id(index), value)))
    }

    /// Mutable iterator over occupied slots in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_mut().map(|value| (slot_id(index), value)))
    }

    /// Frees every occupied slot for which `keep` returns `false`.
    pub fn retain(&mut self, mut keep: impl FnMut(&mut T) -> bool) {
        for slot in &mut self.slots {
            if let Some(value) = slot {
                if !keep(value) {
                    *slot = None;
                }
            }
        }
    }
}

/// Publishes a diagnostic when an insertion overwrote a live entity.
pub(crate) fn report_eviction<T>(
    pool: PoolKind,
    allocation: &Allocation<T>,
    out_events: &mut Vec<Event>,
) {
    if allocation.evicted.is_some() {
        tracing::debug!(?pool, slot = allocation.slot.get(), "pool saturated, slot evicted");
        out_events.push(Event::SlotEvicted {
            pool,
            slot: allocation.slot,
        });
    }
}

fn slot_id(index: usize) -> SlotId {
    SlotId::new(u32::try_from(index).unwrap_or(u32::MAX))
}

fn index(slot: SlotId) -> usize {
    usize::try_from(slot.get()).unwrap_or(usize::MAX)
}
