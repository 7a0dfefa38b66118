use crate::TailError;

/// Fixed-capacity circular store of the most recently pushed items.
///
/// Slots are overwritten in place once the buffer has wrapped; the oldest
/// surviving item always sits at the write cursor. Storage grows lazily up to
/// `capacity` and never beyond it, regardless of how many items are pushed.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    slots: Vec<T>,
    capacity: usize,
    cursor: usize,
    total_seen: usize,
}

impl<T> RingBuffer<T> {
    /// Create an empty ring buffer holding at most `capacity` items.
    ///
    /// Returns [`TailError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, TailError> {
        if capacity == 0 {
            return Err(TailError::InvalidCapacity(0));
        }
        Ok(Self {
            slots: Vec::new(),
            capacity,
            cursor: 0,
            total_seen: 0,
        })
    }

    /// Push an item, overwriting the oldest one when full.
    pub fn push(&mut self, value: T) {
        if self.slots.len() < self.capacity {
            if self.slots.len() == self.slots.capacity() {
                // Grow geometrically but never past `capacity`.
                let additional = self
                    .slots
                    .len()
                    .max(16)
                    .min(self.capacity - self.slots.len());
                self.slots.reserve_exact(additional);
            }
            self.slots.push(value);
        } else {
            self.slots[self.cursor] = value;
        }
        self.cursor = (self.cursor + 1) % self.capacity;
        self.total_seen = self.total_seen.saturating_add(1);
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let (newer, older) = self.slots.split_at(self.oldest_index());
        older.iter().chain(newer.iter())
    }

    /// Consume the buffer, returning its items oldest first.
    pub fn linearize(mut self) -> Vec<T> {
        let oldest = self.oldest_index();
        self.slots.rotate_left(oldest);
        self.slots
    }

    /// Number of items currently retained.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Maximum number of items the buffer retains.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether every slot has been written at least once.
    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    /// Count of every item ever pushed, including overwritten ones.
    pub fn total_seen(&self) -> usize {
        self.total_seen
    }

    fn oldest_index(&self) -> usize {
        if self.is_full() { self.cursor } else { 0 }
    }
}

impl<T: AsRef<str>> RingBuffer<T> {
    /// Join the retained items oldest first with `sep` between them.
    pub fn join(&self, sep: &str) -> String {
        let mut out = String::new();
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                out.push_str(sep);
            }
            out.push_str(item.as_ref());
        }
        out
    }
}
