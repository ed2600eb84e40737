//! Fixed-capacity ring buffer of trajectory points.
//!
//! The store fills slot by slot until it holds `capacity` points and from
//! then on overwrites the oldest slot. Callers only see chronological order:
//! logical index 0 is always the oldest live point.

use crate::lorenz::TrajectoryPoint;

#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryStore {
    slots: Box<[TrajectoryPoint]>,
    /// Next slot to write.
    index: usize,
    len: usize,
}

impl TrajectoryStore {
    /// Creates an empty store. A zero capacity is bumped to one slot.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![TrajectoryPoint::default(); capacity.max(1)].into_boxed_slice(),
            index: 0,
            len: 0,
        }
    }

    /// Rebuilds a store from its raw parts, or `None` when `index`/`len`
    /// cannot describe a buffer of this capacity.
    pub(crate) fn from_raw_parts(
        slots: Box<[TrajectoryPoint]>,
        index: usize,
        len: usize,
    ) -> Option<Self> {
        let capacity = slots.len();
        if capacity == 0 || len > capacity || index >= capacity {
            return None;
        }
        // While growing, the cursor always equals the count.
        if len < capacity && index != len {
            return None;
        }
        Some(Self { slots, index, len })
    }

    pub(crate) fn slots(&self) -> &[TrajectoryPoint] {
        &self.slots
    }

    pub(crate) fn write_index(&self) -> usize {
        self.index
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Stores `point` as the newest entry, evicting the oldest one once full.
    pub fn append(&mut self, point: TrajectoryPoint) {
        let capacity = self.capacity();
        self.slots[self.index] = point;
        self.index = (self.index + 1) % capacity;
        if self.len < capacity {
            self.len += 1;
        }
    }

    /// Returns the point at chronological position `logical` (0 = oldest).
    ///
    /// # Panics
    /// Panics if `logical >= self.len()`.
    pub fn at(&self, logical: usize) -> TrajectoryPoint {
        assert!(
            logical < self.len,
            "logical index {logical} out of range for {} points",
            self.len
        );
        self.slots[self.physical(logical)]
    }

    /// Like [`TrajectoryStore::at`] but returns `None` when out of range.
    pub fn get(&self, logical: usize) -> Option<TrajectoryPoint> {
        (logical < self.len).then(|| self.slots[self.physical(logical)])
    }

    pub fn newest(&self) -> Option<TrajectoryPoint> {
        self.len.checked_sub(1).and_then(|last| self.get(last))
    }

    /// Iterates live points oldest to newest.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = TrajectoryPoint> + '_ {
        (0..self.len).map(move |logical| self.slots[self.physical(logical)])
    }

    fn physical(&self, logical: usize) -> usize {
        let capacity = self.capacity();
        // Growth phase keeps the oldest point in slot 0 and index == len,
        // so this reduces to `logical` until the buffer wraps.
        let oldest = (self.index + capacity - self.len) % capacity;
        (oldest + logical) % capacity
    }
}
