//! Buckets: fixed-capacity slot blocks and the arena that owns them.
//!
//! Every bucket holds exactly `block_capacity` slots and a stack of the slot
//! indices that are currently free. The arena addresses buckets by `u32`
//! index and links them into a doubly-linked list in creation order.
//!
//! # Slot reuse order
//!
//! A fresh bucket hands out slots in ascending index order. Once a slot is
//! released it goes back on top of the stack, so the most recently vacated
//! slot of a bucket is the next one reused (LIFO).

use crate::error::AllocError;

/// Sentinel for an empty bucket link.
pub(crate) const BUCKET_NONE: u32 = u32::MAX;

/// A slot in a bucket - either vacant or occupied.
#[derive(Debug)]
pub(crate) enum Slot<T> {
    Vacant,
    Occupied(T),
}

// =============================================================================
// SlotStack
// =============================================================================

/// Growable stack of free slot indices for one bucket.
///
/// Grows by doubling. A failed growth leaves the stack untouched.
#[derive(Debug)]
pub(crate) struct SlotStack {
    buf: Vec<u32>,
}

impl SlotStack {
    #[inline]
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Builds a stack holding `0..count`, arranged so pops yield ascending indices.
    pub fn seeded(count: u32) -> Result<Self, AllocError> {
        let mut stack = Self::new();
        for idx in (0..count).rev() {
            stack.push(idx)?;
        }
        Ok(stack)
    }

    /// Pushes a slot index, doubling the buffer when it is full.
    pub fn push(&mut self, idx: u32) -> Result<(), AllocError> {
        if self.buf.len() == self.buf.capacity() {
            let additional = self.buf.capacity().max(1);
            self.buf.try_reserve_exact(additional)?;
        }
        self.buf.push(idx);
        Ok(())
    }

    /// Pushes an index that is known to fit in the current buffer.
    ///
    /// Used to hand back a slot that was popped earlier, so the buffer
    /// already has room for it.
    #[inline]
    pub fn restore(&mut self, idx: u32) {
        debug_assert!(self.buf.len() < self.buf.capacity(), "free stack overflow");
        self.buf.push(idx);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<u32> {
        self.buf.pop()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }
}

// =============================================================================
// Bucket
// =============================================================================

/// A fixed block of slots plus its free-slot tracking.
///
/// Invariant: `live + free.len() == slots.len()`.
#[derive(Debug)]
pub(crate) struct Bucket<T> {
    slots: Box<[Slot<T>]>,
    free: SlotStack,
    live: u32,

    /// Previous bucket in creation order, or BUCKET_NONE.
    pub prev: u32,
    /// Next bucket in creation order, or BUCKET_NONE.
    pub next: u32,
}

impl<T> Bucket<T> {
    /// Allocates a bucket with `capacity` vacant slots.
    pub fn new(capacity: u32) -> Result<Self, AllocError> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity as usize)?;
        slots.resize_with(capacity as usize, || Slot::Vacant);

        Ok(Self {
            slots: slots.into_boxed_slice(),
            free: SlotStack::seeded(capacity)?,
            live: 0,
            prev: BUCKET_NONE,
            next: BUCKET_NONE,
        })
    }

    /// Returns true if at least one slot is free.
    #[inline]
    pub fn has_capacity(&self) -> bool {
        (self.live as usize) < self.slots.len()
    }

    /// Returns true if no slot is occupied.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    #[cfg(test)]
    pub fn live(&self) -> u32 {
        self.live
    }

    /// Takes a free slot out of the stack.
    ///
    /// The slot is handed back unless [`SlotReservation::commit`] is called,
    /// so a failing (or panicking) constructor leaves the bucket unchanged.
    #[inline]
    pub fn reserve(&mut self) -> Option<SlotReservation<'_, T>> {
        let slot = self.free.pop()?;
        Some(SlotReservation { bucket: self, slot })
    }

    /// Drops the value out of `slot` and returns the slot to the free stack.
    ///
    /// # Panics
    ///
    /// Panics if the slot is vacant.
    pub fn remove(&mut self, slot: u32) -> T {
        let entry = core::mem::replace(&mut self.slots[slot as usize], Slot::Vacant);
        let Slot::Occupied(value) = entry else {
            panic!("removing from vacant slot");
        };
        self.free.restore(slot);
        self.live -= 1;
        debug_assert_eq!(self.live as usize + self.free.len(), self.slots.len());
        value
    }

    #[inline]
    pub fn get(&self, slot: u32) -> Option<&T> {
        match self.slots.get(slot as usize)? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant => None,
        }
    }

    #[inline]
    pub fn get_mut(&mut self, slot: u32) -> Option<&mut T> {
        match self.slots.get_mut(slot as usize)? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant => None,
        }
    }
}

/// A free slot taken out of a bucket, pending construction of its value.
pub(crate) struct SlotReservation<'a, T> {
    bucket: &'a mut Bucket<T>,
    slot: u32,
}

impl<T> SlotReservation<'_, T> {
    /// Writes `value` into the reserved slot and returns the slot index.
    #[inline]
    pub fn commit(self, value: T) -> u32 {
        let slot = self.slot;
        let bucket = &mut *self.bucket;
        bucket.slots[slot as usize] = Slot::Occupied(value);
        bucket.live += 1;
        // The slot now belongs to the value; skip the release in Drop.
        core::mem::forget(self);
        slot
    }
}

impl<T> Drop for SlotReservation<'_, T> {
    fn drop(&mut self) {
        self.bucket.free.restore(self.slot);
    }
}

// =============================================================================
// Buckets - arena + creation-order list
// =============================================================================

/// Arena of live buckets.
///
/// Destroyed buckets release their slot storage immediately; their arena
/// index is kept on a vacant stack for the next bucket created.
#[derive(Debug)]
pub(crate) struct Buckets<T> {
    entries: Vec<Option<Bucket<T>>>,
    vacant: Vec<u32>,
    first: u32,
    last: u32,
    count: usize,
}

impl<T> Buckets<T> {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            vacant: Vec::new(),
            first: BUCKET_NONE,
            last: BUCKET_NONE,
            count: 0,
        }
    }

    /// Number of live buckets.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Oldest live bucket, or BUCKET_NONE.
    #[cfg(test)]
    pub fn first(&self) -> u32 {
        self.first
    }

    /// Index the next [`create`](Self::create) call will use.
    #[inline]
    pub fn next_index(&self) -> u32 {
        match self.vacant.last() {
            Some(&idx) => idx,
            None => self.entries.len() as u32,
        }
    }

    /// Allocates a bucket and appends it to the creation-order list.
    ///
    /// On failure nothing observable changes.
    pub fn create(&mut self, capacity: u32) -> Result<u32, AllocError> {
        let bucket = Bucket::new(capacity)?;

        let idx = match self.vacant.pop() {
            Some(idx) => idx,
            None => {
                debug_assert!(self.entries.len() < BUCKET_NONE as usize);
                self.entries.try_reserve(1)?;
                // Keep room to recycle every index without allocating on destroy.
                let needed = self.entries.len() + 1 - self.vacant.len();
                self.vacant.try_reserve(needed)?;
                self.entries.push(None);
                (self.entries.len() - 1) as u32
            }
        };

        self.entries[idx as usize] = Some(bucket);
        self.link_back(idx);
        self.count += 1;
        Ok(idx)
    }

    /// Unlinks a bucket from the creation-order list and frees its storage.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not a live bucket.
    pub fn destroy(&mut self, idx: u32) {
        self.unlink(idx);
        let bucket = self.entries[idx as usize].take();
        assert!(bucket.is_some(), "destroying vacant bucket");
        debug_assert!(bucket.as_ref().is_some_and(Bucket::is_empty));
        self.vacant.push(idx);
        self.count -= 1;
        debug_assert_eq!(self.count == 0, self.first == BUCKET_NONE);
    }

    /// # Panics
    ///
    /// Panics if `idx` is not a live bucket.
    #[inline]
    pub fn get(&self, idx: u32) -> &Bucket<T> {
        match self.entries.get(idx as usize) {
            Some(Some(bucket)) => bucket,
            _ => panic!("invalid bucket index"),
        }
    }

    /// # Panics
    ///
    /// Panics if `idx` is not a live bucket.
    #[inline]
    pub fn get_mut(&mut self, idx: u32) -> &mut Bucket<T> {
        match self.entries.get_mut(idx as usize) {
            Some(Some(bucket)) => bucket,
            _ => panic!("invalid bucket index"),
        }
    }

    /// Base pointer of every bucket's slot array, indexed by bucket index.
    /// Vacant arena entries map to null.
    ///
    /// Each bucket is borrowed once here; pointers derived from the result
    /// stay valid until the arena is next touched.
    pub fn slot_bases(&mut self) -> Vec<*mut Slot<T>> {
        self.entries
            .iter_mut()
            .map(|entry| match entry {
                Some(bucket) => bucket.slots.as_mut_ptr(),
                None => core::ptr::null_mut(),
            })
            .collect()
    }

    fn link_back(&mut self, idx: u32) {
        let last = self.last;
        {
            let bucket = self.get_mut(idx);
            bucket.prev = last;
            bucket.next = BUCKET_NONE;
        }

        if last != BUCKET_NONE {
            self.get_mut(last).next = idx;
        } else {
            self.first = idx;
        }
        self.last = idx;
    }

    fn unlink(&mut self, idx: u32) {
        let (prev, next) = {
            let bucket = self.get(idx);
            (bucket.prev, bucket.next)
        };

        if prev != BUCKET_NONE {
            self.get_mut(prev).next = next;
        } else {
            self.first = next;
        }

        if next != BUCKET_NONE {
            self.get_mut(next).prev = prev;
        } else {
            self.last = prev;
        }

        let bucket = self.get_mut(idx);
        bucket.prev = BUCKET_NONE;
        bucket.next = BUCKET_NONE;
    }
}
