//! Pure, synchronous board state and its mutations
//!
//! Every mutation leaves `position` equal to each slot's index. Invalid arguments
//! (unknown ids, out-of-range indices, size limits) leave the board untouched.

use crate::board::slot::{ImageSlot, SlotFill, SlotId, SlotIdAllocator};
use crate::io::configuration::{MAX_SLOTS, MIN_SLOTS};
use crate::io::error::{Result, invalid_parameter};

/// How many slots may be locked at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockPolicy {
    /// At most one locked slot; locking another releases it and triggers a
    /// similarity-seeded regenerate
    #[default]
    Single,
    /// Any subset may be locked; locking never regenerates
    Multi,
}

/// Floor and ceiling on the collection size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotLimits {
    min: usize,
    max: usize,
}

impl SlotLimits {
    /// Limits with `1 <= min <= max`
    ///
    /// # Errors
    ///
    /// Returns an error if `min` is zero or exceeds `max`
    pub fn new(min: usize, max: usize) -> Result<Self> {
        if min == 0 {
            return Err(invalid_parameter("min_slots", &min, &"must be at least 1"));
        }
        if min > max {
            return Err(invalid_parameter(
                "max_slots",
                &max,
                &format!("must not be below min_slots ({min})"),
            ));
        }
        Ok(Self { min, max })
    }

    /// Smallest allowed size
    pub const fn min(self) -> usize {
        self.min
    }

    /// Largest allowed size
    pub const fn max(self) -> usize {
        self.max
    }

    /// Whether `count` lies within the limits
    pub const fn contains(self, count: usize) -> bool {
        count >= self.min && count <= self.max
    }
}

impl Default for SlotLimits {
    fn default() -> Self {
        Self {
            min: MIN_SLOTS,
            max: MAX_SLOTS,
        }
    }
}

/// Result of flipping a slot's lock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockChange {
    /// No slot carries the id
    Unknown,
    /// The slot is now locked
    Locked {
        /// Tag of the newly locked slot, the similarity seed
        tag: String,
        /// Slots unlocked to honor [`LockPolicy::Single`]
        released: Vec<SlotId>,
    },
    /// The slot is now unlocked
    Unlocked,
}

/// Ordered slot collection
#[derive(Debug, Clone)]
pub struct Board {
    slots: Vec<ImageSlot>,
    ids: SlotIdAllocator,
    limits: SlotLimits,
    policy: LockPolicy,
}

impl Board {
    /// Empty board; filled by [`Board::reset`]
    pub const fn new(limits: SlotLimits, policy: LockPolicy) -> Self {
        Self {
            slots: Vec::new(),
            ids: SlotIdAllocator::new(),
            limits,
            policy,
        }
    }

    /// Slots in position order
    pub fn slots(&self) -> &[ImageSlot] {
        &self.slots
    }

    /// Number of slots
    pub const fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the board holds no slots
    pub const fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Size limits in force
    pub const fn limits(&self) -> SlotLimits {
        self.limits
    }

    /// Lock cardinality in force
    pub const fn policy(&self) -> LockPolicy {
        self.policy
    }

    /// Slot carrying `id`
    pub fn get(&self, id: SlotId) -> Option<&ImageSlot> {
        self.slots.iter().find(|slot| slot.id == id)
    }

    /// Current index of the slot carrying `id`
    pub fn index_of(&self, id: SlotId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.id == id)
    }

    /// Tags of locked slots in position order
    pub fn locked_tags(&self) -> Vec<String> {
        self.slots
            .iter()
            .filter(|slot| slot.is_locked)
            .map(|slot| slot.tag.clone())
            .collect()
    }

    /// Number of slots a regenerate would replace
    pub fn unlocked_count(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.is_locked).count()
    }

    /// Whether `add` would be refused
    pub const fn is_full(&self) -> bool {
        self.slots.len() >= self.limits.max
    }

    /// Whether `remove` would be refused
    pub const fn is_at_floor(&self) -> bool {
        self.slots.len() <= self.limits.min
    }

    /// Whether positions form `0..len` in order
    pub fn positions_consistent(&self) -> bool {
        self.slots
            .iter()
            .enumerate()
            .all(|(index, slot)| slot.position == index)
    }

    fn make_slot(&mut self, fill: SlotFill, position: usize) -> ImageSlot {
        ImageSlot {
            id: self.ids.allocate(),
            location: fill.location,
            tag: fill.tag,
            is_locked: false,
            position,
            origin: fill.origin,
        }
    }

    fn renumber(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            slot.position = index;
        }
    }

    /// Replace the whole collection with fresh, unlocked slots
    pub fn reset(&mut self, fills: Vec<SlotFill>) {
        let slots = fills
            .into_iter()
            .enumerate()
            .map(|(position, fill)| self.make_slot(fill, position))
            .collect();
        self.slots = slots;
    }

    /// Replace unlocked slots, in slot order, with fresh slots built from `fills`
    ///
    /// Locked slots keep their id, tag, location and index. Unlocked slots beyond
    /// the supplied fills are kept as they are. Returns how many were replaced.
    pub fn replace_unlocked(&mut self, fills: Vec<SlotFill>) -> usize {
        let mut fills = fills.into_iter();
        let mut replaced = 0;
        let previous = std::mem::take(&mut self.slots);
        let mut next = Vec::with_capacity(previous.len());

        for (position, slot) in previous.into_iter().enumerate() {
            if slot.is_locked {
                next.push(slot);
                continue;
            }
            match fills.next() {
                Some(fill) => {
                    next.push(self.make_slot(fill, position));
                    replaced += 1;
                }
                None => next.push(slot),
            }
        }

        self.slots = next;
        self.renumber();
        replaced
    }

    /// Flip the lock on the slot carrying `id`
    pub fn toggle_lock(&mut self, id: SlotId) -> LockChange {
        let Some(index) = self.index_of(id) else {
            return LockChange::Unknown;
        };

        let now_locked = self.slots.get(index).is_some_and(|slot| !slot.is_locked);
        if !now_locked {
            if let Some(slot) = self.slots.get_mut(index) {
                slot.is_locked = false;
            }
            return LockChange::Unlocked;
        }

        let mut released = Vec::new();
        if self.policy == LockPolicy::Single {
            for slot in &mut self.slots {
                if slot.is_locked && slot.id != id {
                    slot.is_locked = false;
                    released.push(slot.id);
                }
            }
        }

        let mut tag = String::new();
        if let Some(slot) = self.slots.get_mut(index) {
            slot.is_locked = true;
            tag.clone_from(&slot.tag);
        }
        LockChange::Locked { tag, released }
    }

    /// Move the slot at `from` so it ends up at index `to` (splice, not swap)
    ///
    /// Returns false and leaves the board untouched when the indices are equal or
    /// either is out of bounds.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.slots.len();
        if from == to || from >= len || to >= len {
            return false;
        }
        let slot = self.slots.remove(from);
        self.slots.insert(to, slot);
        self.renumber();
        true
    }

    /// Append a fresh unlocked slot unless the board is at its ceiling
    pub fn push(&mut self, fill: SlotFill) -> Option<SlotId> {
        if self.is_full() {
            return None;
        }
        let slot = self.make_slot(fill, self.slots.len());
        let id = slot.id;
        self.slots.push(slot);
        Some(id)
    }

    /// Remove the slot carrying `id` unless the board is at its floor
    pub fn remove(&mut self, id: SlotId) -> bool {
        if self.is_at_floor() {
            return false;
        }
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.slots.remove(index);
        self.renumber();
        true
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(SlotLimits::default(), LockPolicy::default())
    }
}
