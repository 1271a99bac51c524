//! nexus-bucket - bucketed slot storage with stable, insertion-ordered positions.
//!
//! Elements live in fixed-size buckets of `block_capacity` slots. Iteration
//! does not follow physical layout: a separate chain of logical nodes keeps
//! elements in the order they were inserted, and every element is addressed
//! by a [`Position`] that stays valid while other elements come and go.
//!
//! ```text
//! buckets (physical)            chain (logical, insertion order)
//! ┌──────────┬──────────┐
//! │ b0: A  C │ b1: B  _ │       A ──► B ──► C ──► end
//! └──────────┴──────────┘
//! registry (buckets with a free slot, used as a stack): [b1]
//! ```
//!
//! # Example
//!
//! ```
//! use nexus_bucket::BucketStorage;
//!
//! let mut storage = BucketStorage::with_block_capacity(2);
//!
//! let a = storage.insert("a");
//! let b = storage.insert("b");
//! let c = storage.insert("c");
//! assert_eq!(storage.capacity(), 4);
//!
//! // Erase returns the position that followed the erased element.
//! assert_eq!(storage.erase(b), c);
//!
//! // Other positions are untouched.
//! assert_eq!(storage[a], "a");
//! assert_eq!(storage[c], "c");
//!
//! // Emptying a bucket frees it immediately.
//! storage.erase(a);
//! assert_eq!(storage.capacity(), 2);
//! assert_eq!(storage.iter().copied().collect::<Vec<_>>(), ["c"]);
//! ```
//!
//! # Allocation Policy
//!
//! Growth is lazy and shrink is eager:
//!
//! - A bucket is allocated only when an insert finds no registered bucket
//!   with a free slot.
//! - A bucket is freed by the erase that removes its last element. No empty
//!   bucket survives between two operations.
//!
//! `capacity()` is therefore always `bucket_count() * block_capacity()`.
//! Workloads that hover around a bucket boundary pay one bucket allocation
//! per crossing.
//!
//! # Insertion Target
//!
//! Buckets with free slots sit in a registry used as a stack. Inserts fill the
//! most recently registered bucket first. Within a bucket, a fresh bucket
//! fills in ascending slot order and afterwards the most recently vacated
//! slot is reused first.
//!
//! # Positions
//!
//! A [`Position`] is the storage's iterator. It is `Copy`, does not borrow the
//! storage, and orders by insertion time. Reading or erasing through a
//! position whose element is gone is detected: `get` returns `None`, while
//! `erase`, `next`, `prev` and indexing panic with `"invalid position"`.
//!
//! | Operation | Cost |
//! |-----------|------|
//! | `insert` | O(1), plus one bucket allocation when all buckets are full |
//! | `erase` / `remove` | O(1), plus one bucket release when it empties |
//! | `get` / `next` / `prev` | O(1) |
//! | `advance(pos, n)` | O(n) |
//! | `shrink_to_fit` / `clone` | O(len) |
//! | `swap` / `take` | O(1) |
//!
//! # Concurrency
//!
//! No internal synchronization. `BucketStorage<T>` is `Send`/`Sync` when `T`
//! is, and shared access follows the usual `&`/`&mut` rules.

mod bucket;
mod chain;
mod error;
mod iter;
mod position;
mod registry;

use core::convert::Infallible;
use core::fmt;
use core::ops::{Index, IndexMut};

use bucket::Buckets;
use chain::{Chain, NODE_NONE, Node};
use registry::Registry;

pub use error::{AllocError, ConfigError, InsertError, Rejected};
pub use iter::{Cursor, Drain, IntoIter, Iter, IterMut, Positions};
pub use position::Position;

/// Slots per bucket when none is configured.
pub const DEFAULT_BLOCK_CAPACITY: usize = 64;

/// Largest supported block capacity (slot indices are 32-bit).
pub const MAX_BLOCK_CAPACITY: usize = u32::MAX as usize;

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`BucketStorage`].
///
/// ```
/// use nexus_bucket::{BucketStorage, BucketStorageBuilder};
///
/// let storage: BucketStorage<u64> = BucketStorageBuilder::default()
///     .block_capacity(16)
///     .build()
///     .unwrap();
/// assert_eq!(storage.block_capacity(), 16);
/// assert_eq!(storage.capacity(), 0); // nothing allocated yet
/// ```
#[derive(Clone, Debug)]
pub struct BucketStorageBuilder {
    block_capacity: usize,
}

impl Default for BucketStorageBuilder {
    fn default() -> Self {
        Self {
            block_capacity: DEFAULT_BLOCK_CAPACITY,
        }
    }
}

impl BucketStorageBuilder {
    /// Number of slots in every bucket. Default: 64.
    pub fn block_capacity(mut self, slots: usize) -> Self {
        self.block_capacity = slots;
        self
    }

    /// Build an empty storage. Allocates nothing.
    pub fn build<T>(self) -> Result<BucketStorage<T>, ConfigError> {
        if self.block_capacity == 0 {
            return Err(ConfigError::ZeroBlockCapacity);
        }
        if self.block_capacity > MAX_BLOCK_CAPACITY {
            return Err(ConfigError::BlockCapacityTooLarge {
                requested: self.block_capacity,
                max: MAX_BLOCK_CAPACITY,
            });
        }
        Ok(BucketStorage::empty(self.block_capacity as u32))
    }
}

// =============================================================================
// BucketStorage
// =============================================================================

/// Container storing elements in fixed-size buckets, iterated in insertion
/// order through stable [`Position`]s.
///
/// See the [crate docs](crate) for the allocation policy.
pub struct BucketStorage<T> {
    buckets: Buckets<T>,
    registry: Registry,
    chain: Chain,
    capacity: usize,
    block_capacity: u32,
    /// Timestamp for the next insert.
    clock: u64,
}

impl<T> BucketStorage<T> {
    /// Creates an empty storage with [`DEFAULT_BLOCK_CAPACITY`] slots per bucket.
    #[inline]
    pub const fn new() -> Self {
        Self::empty(DEFAULT_BLOCK_CAPACITY as u32)
    }

    /// Creates an empty storage with `block_capacity` slots per bucket.
    ///
    /// # Panics
    ///
    /// Panics if `block_capacity` is 0 or exceeds [`MAX_BLOCK_CAPACITY`].
    pub fn with_block_capacity(block_capacity: usize) -> Self {
        match BucketStorageBuilder::default()
            .block_capacity(block_capacity)
            .build()
        {
            Ok(storage) => storage,
            Err(err) => panic!("{err}"),
        }
    }

    const fn empty(block_capacity: u32) -> Self {
        Self {
            buckets: Buckets::new(),
            registry: Registry::new(),
            chain: Chain::new(),
            capacity: 0,
            block_capacity,
            clock: 0,
        }
    }

    /// Number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Returns `true` if no elements are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chain.len() == 0
    }

    /// Total slots across allocated buckets.
    ///
    /// Always `bucket_count() * block_capacity()`.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots per bucket.
    #[inline]
    pub fn block_capacity(&self) -> usize {
        self.block_capacity as usize
    }

    /// Number of allocated buckets.
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.count()
    }

    // ========================================================================
    // Insert
    // ========================================================================

    /// Inserts a value at the end of the insertion order.
    ///
    /// # Panics
    ///
    /// Panics if memory for a bucket or node cannot be allocated. Use
    /// [`try_insert`](Self::try_insert) to handle that case.
    #[inline]
    pub fn insert(&mut self, value: T) -> Position {
        match self.try_insert(value) {
            Ok(pos) => pos,
            Err(_) => alloc_failed(),
        }
    }

    /// Inserts a value, handing it back if memory cannot be allocated.
    ///
    /// On error the storage is unchanged.
    pub fn try_insert(&mut self, value: T) -> Result<Position, Rejected<T>> {
        let bucket = match self.prepare() {
            Ok(Some(bucket)) => bucket,
            Ok(None) => match self.grow() {
                Ok(bucket) => bucket,
                Err(_) => return Err(Rejected(value)),
            },
            Err(_) => return Err(Rejected(value)),
        };
        Ok(self.place(bucket, value))
    }

    /// Inserts the value produced by `make`.
    ///
    /// The target slot is reserved first and handed back if `make` returns
    /// an error or panics, so a failed insert leaves size, capacity and every
    /// existing position unchanged.
    ///
    /// ```
    /// use nexus_bucket::{BucketStorage, InsertError};
    ///
    /// let mut storage: BucketStorage<u32> = BucketStorage::with_block_capacity(4);
    /// storage.insert(1);
    ///
    /// let err = storage.try_insert_with(|| "42x".parse::<u32>());
    /// assert!(matches!(err, Err(InsertError::Construct(_))));
    /// assert_eq!(storage.len(), 1);
    ///
    /// let pos = storage.try_insert_with(|| "42".parse::<u32>()).unwrap();
    /// assert_eq!(storage[pos], 42);
    /// ```
    pub fn try_insert_with<E, F>(&mut self, make: F) -> Result<Position, InsertError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        match self.prepare()? {
            Some(bucket) => self.construct_in(bucket, make).map_err(InsertError::Construct),
            None => {
                // No bucket has room. Build the value before allocating one so
                // a failing constructor never leaves an empty bucket behind.
                let value = make().map_err(InsertError::Construct)?;
                let bucket = self.grow()?;
                Ok(self.place(bucket, value))
            }
        }
    }

    /// Inserts a clone of `value`.
    ///
    /// If `T::clone` panics the storage is left unchanged.
    pub fn insert_clone(&mut self, value: &T) -> Position
    where
        T: Clone,
    {
        match self.try_insert_with(|| Ok::<T, Infallible>(value.clone())) {
            Ok(pos) => pos,
            Err(InsertError::Alloc(_)) => alloc_failed(),
            Err(InsertError::Construct(never)) => match never {},
        }
    }

    /// Reserves the node for the next insert and picks the target bucket.
    ///
    /// Returns `None` when no registered bucket has a free slot.
    fn prepare(&mut self) -> Result<Option<u32>, AllocError> {
        self.chain.try_reserve()?;
        Ok(self.registry.peek())
    }

    /// Allocates a new bucket, appends it to the bucket list and registers it.
    fn grow(&mut self) -> Result<u32, AllocError> {
        self.registry.reserve_for(self.buckets.next_index())?;
        let bucket = self.buckets.create(self.block_capacity)?;
        self.registry.push(bucket);
        self.capacity += self.block_capacity as usize;
        Ok(bucket)
    }

    #[inline]
    fn place(&mut self, bucket: u32, value: T) -> Position {
        let Ok(pos) = self.construct_in(bucket, || Ok::<T, Infallible>(value));
        pos
    }

    /// Constructs a value into a free slot of `bucket` and links its node at
    /// the end of the chain. The node must already be reserved.
    fn construct_in<E, F>(&mut self, bucket_idx: u32, make: F) -> Result<Position, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        debug_assert!(self.registry.contains(bucket_idx));
        let bucket = self.buckets.get_mut(bucket_idx);
        let Some(reservation) = bucket.reserve() else {
            unreachable!("registered bucket has no free slot");
        };
        let slot = reservation.commit(make()?);

        // Popped for this insert; only stays registered while it has room.
        if !bucket.has_capacity() {
            let popped = self.registry.pop();
            debug_assert_eq!(popped, Some(bucket_idx));
        }

        let stamp = self.clock;
        self.clock += 1;
        let (node, generation) = self.chain.link_back(bucket_idx, slot, stamp);

        Ok(Position::new(node, generation, stamp))
    }

    // ========================================================================
    // Remove
    // ========================================================================

    /// Erases the element at `pos` and returns the position that followed it.
    ///
    /// Erasing the last element in insertion order returns
    /// [`end()`](Self::end). Only `pos` is invalidated.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is the end position or its element was already erased.
    pub fn erase(&mut self, pos: Position) -> Position {
        match self.remove_entry(pos) {
            Some((_, next)) => next,
            None => panic!("invalid position"),
        }
    }

    /// Removes and returns the element at `pos`.
    ///
    /// Returns `None` if `pos` is the end position or already erased.
    #[inline]
    pub fn remove(&mut self, pos: Position) -> Option<T> {
        self.remove_entry(pos).map(|(value, _)| value)
    }

    /// Removes and returns the oldest element.
    #[inline]
    pub fn pop_front(&mut self) -> Option<T> {
        let front = self.begin();
        self.remove(front)
    }

    /// Removes and returns the newest element.
    #[inline]
    pub fn pop_back(&mut self) -> Option<T> {
        let back = self.last();
        self.remove(back)
    }

    fn remove_entry(&mut self, pos: Position) -> Option<(T, Position)> {
        let next = self.position_of(self.resolve(pos)?.next);
        let (bucket_idx, slot) = self.chain.unlink(pos.node);

        let bucket = self.buckets.get_mut(bucket_idx);
        if !bucket.has_capacity() {
            // About to gain a free slot.
            self.registry.push(bucket_idx);
        }
        let value = bucket.remove(slot);

        if bucket.is_empty() {
            let registered = self.registry.remove(bucket_idx);
            debug_assert!(registered, "emptied bucket {bucket_idx} was not registered");
            self.buckets.destroy(bucket_idx);
            self.capacity -= self.block_capacity as usize;
        }

        Some((value, next))
    }

    /// Erases every element. All buckets are released.
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
        debug_assert_eq!(self.capacity, 0);
        debug_assert!(self.registry.is_empty());
    }

    // ========================================================================
    // Bulk
    // ========================================================================

    /// Repacks elements into as few buckets as possible, keeping their order.
    ///
    /// Afterwards at most one bucket has free slots. All previously obtained
    /// positions are invalidated and no longer resolve.
    ///
    /// # Panics
    ///
    /// Panics if memory for the repacked buckets cannot be allocated. The
    /// storage is left untouched in that case.
    pub fn shrink_to_fit(&mut self) {
        if self.try_shrink_to_fit().is_err() {
            alloc_failed()
        }
    }

    /// Fallible [`shrink_to_fit`](Self::shrink_to_fit).
    ///
    /// Every bucket and node the repacked storage needs is allocated before
    /// the first element moves, so on error the storage and its positions
    /// are unchanged.
    pub fn try_shrink_to_fit(&mut self) -> Result<(), AllocError> {
        let len = self.len();
        let mut packed = self.successor();
        packed.chain.try_reserve_many(len)?;
        for _ in 0..len.div_ceil(self.block_capacity as usize) {
            packed.grow()?;
        }

        // Infallible from here: nothing below allocates.
        while let Some(value) = self.pop_front() {
            let Some(bucket) = packed.registry.peek() else {
                unreachable!("repacked buckets hold every element");
            };
            packed.place(bucket, value);
        }
        *self = packed;
        Ok(())
    }

    /// Exchanges the contents of two storages in O(1).
    ///
    /// No element moves, so positions keep naming the same elements; they
    /// must afterwards be used with the storage that now holds them.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// Moves every element out into a new storage in O(1).
    ///
    /// `self` is left empty and reusable with its block capacity unchanged.
    /// Positions move with the elements.
    ///
    /// ```
    /// use nexus_bucket::BucketStorage;
    ///
    /// let mut source = BucketStorage::with_block_capacity(8);
    /// let pos = source.insert(5);
    ///
    /// let moved = source.take();
    /// assert_eq!(moved[pos], 5);
    /// assert!(source.is_empty());
    /// assert_eq!(source.block_capacity(), 8);
    ///
    /// source.insert(6); // still usable
    /// ```
    pub fn take(&mut self) -> Self {
        let empty = self.successor();
        core::mem::replace(self, empty)
    }

    /// Empty storage with the same block capacity whose timestamps continue
    /// from this one, so positions handed out before never resolve in it.
    fn successor(&self) -> Self {
        let mut next = Self::empty(self.block_capacity);
        next.clock = self.clock;
        next
    }

    /// Copies every element, in order, into a fresh storage with the same
    /// block capacity.
    ///
    /// The copy is packed; it does not reproduce this storage's bucket layout.
    pub fn try_clone(&self) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        let mut copy = Self::empty(self.block_capacity);
        for value in self.iter() {
            match copy.try_insert_with(|| Ok::<T, Infallible>(value.clone())) {
                Ok(_) => {}
                Err(InsertError::Alloc(err)) => return Err(err),
                Err(InsertError::Construct(never)) => match never {},
            }
        }
        Ok(copy)
    }

    // ========================================================================
    // Positions
    // ========================================================================

    /// Position of the oldest element, or [`end()`](Self::end) if empty.
    #[inline]
    pub fn begin(&self) -> Position {
        self.position_of(self.chain.head())
    }

    /// The end position. Equal to [`Position::END`].
    #[inline]
    pub fn end(&self) -> Position {
        Position::END
    }

    /// Position of the newest element, or [`end()`](Self::end) if empty.
    #[inline]
    pub fn last(&self) -> Position {
        self.position_of(self.chain.tail())
    }

    /// Position after `pos` in insertion order.
    ///
    /// The end position stays at the end.
    ///
    /// # Panics
    ///
    /// Panics if `pos` names an erased element.
    pub fn next(&self, pos: Position) -> Position {
        if pos.is_end() {
            return Position::END;
        }
        match self.resolve(pos) {
            Some(node) => self.position_of(node.next),
            None => panic!("invalid position"),
        }
    }

    /// Position before `pos` in insertion order.
    ///
    /// Stepping back from the end yields the newest element; stepping back
    /// from the oldest element yields the end position.
    ///
    /// # Panics
    ///
    /// Panics if `pos` names an erased element.
    pub fn prev(&self, pos: Position) -> Position {
        if pos.is_end() {
            return self.last();
        }
        match self.resolve(pos) {
            Some(node) => self.position_of(node.prev),
            None => panic!("invalid position"),
        }
    }

    /// Walks `distance` steps from `pos`: forward if positive, backward if
    /// negative. O(|distance|).
    ///
    /// ```
    /// use nexus_bucket::BucketStorage;
    ///
    /// let storage: BucketStorage<_> = (0..10).collect();
    /// let pos = storage.advance(storage.begin(), 4);
    /// assert_eq!(storage[pos], 4);
    /// assert_eq!(storage[storage.advance(pos, -3)], 1);
    /// assert_eq!(storage.advance(pos, 6), storage.end());
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the walk passes through an erased element.
    pub fn advance(&self, pos: Position, distance: isize) -> Position {
        let mut pos = pos;
        if distance >= 0 {
            for _ in 0..distance {
                pos = self.next(pos);
            }
        } else {
            for _ in 0..distance.unsigned_abs() {
                pos = self.prev(pos);
            }
        }
        pos
    }

    /// Returns `true` if `pos` names a live element of this storage.
    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        self.resolve(pos).is_some()
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// Returns a reference to the element at `pos`.
    #[inline]
    pub fn get(&self, pos: Position) -> Option<&T> {
        let node = self.resolve(pos)?;
        self.buckets.get(node.bucket).get(node.slot)
    }

    /// Returns a mutable reference to the element at `pos`.
    #[inline]
    pub fn get_mut(&mut self, pos: Position) -> Option<&mut T> {
        let node = *self.resolve(pos)?;
        self.buckets.get_mut(node.bucket).get_mut(node.slot)
    }

    /// Returns the oldest element.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.get(self.begin())
    }

    /// Returns the oldest element mutably.
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        let front = self.begin();
        self.get_mut(front)
    }

    /// Returns the newest element.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.get(self.last())
    }

    /// Returns the newest element mutably.
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        let back = self.last();
        self.get_mut(back)
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Iterates elements in insertion order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Iterates elements mutably in insertion order.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self)
    }

    /// Iterates the positions of all elements in insertion order.
    ///
    /// Collect them first to erase while walking.
    #[inline]
    pub fn positions(&self) -> Positions<'_, T> {
        Positions::new(self)
    }

    /// Removes every element, yielding them in insertion order.
    ///
    /// Elements not consumed are dropped when the iterator is.
    #[inline]
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain::new(self)
    }

    /// Returns a cursor at the oldest element.
    #[inline]
    pub fn cursor_front(&mut self) -> Cursor<'_, T> {
        let front = self.begin();
        Cursor::new(self, front)
    }

    /// Returns a cursor at the newest element.
    #[inline]
    pub fn cursor_back(&mut self) -> Cursor<'_, T> {
        let back = self.last();
        Cursor::new(self, back)
    }

    /// Returns a cursor at `pos`.
    #[inline]
    pub fn cursor_at(&mut self, pos: Position) -> Cursor<'_, T> {
        Cursor::new(self, pos)
    }

    // ========================================================================
    // Internal
    // ========================================================================

    /// Resolves a position to its live node, checking generation and stamp.
    #[inline]
    fn resolve(&self, pos: Position) -> Option<&Node> {
        if pos.is_end() {
            return None;
        }
        self.chain
            .resolve(pos.node, pos.generation)
            .filter(|node| node.stamp == pos.stamp)
    }

    /// Builds the position for a chain link (NODE_NONE maps to end).
    #[inline]
    fn position_of(&self, idx: u32) -> Position {
        if idx == NODE_NONE {
            return Position::END;
        }
        let node = self.chain.node(idx);
        Position::new(idx, node.generation, node.stamp)
    }

    /// Element referenced by a live node.
    #[inline]
    fn value_of(&self, node: &Node) -> &T {
        match self.buckets.get(node.bucket).get(node.slot) {
            Some(value) => value,
            None => unreachable!("live node points at a vacant slot"),
        }
    }
}

#[cold]
#[inline(never)]
fn alloc_failed() -> ! {
    panic!("bucket storage: {}", AllocError)
}

// =============================================================================
// Trait impls
// =============================================================================

impl<T> Default for BucketStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for BucketStorage<T> {
    /// Re-inserts every element in order into a fresh storage.
    ///
    /// # Panics
    ///
    /// Panics if memory cannot be allocated; see
    /// [`try_clone`](BucketStorage::try_clone).
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(copy) => copy,
            Err(_) => alloc_failed(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for BucketStorage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for BucketStorage<T> {
    /// Element-wise comparison in insertion order. Bucket layout and block
    /// capacity are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for BucketStorage<T> {}

impl<T> Index<Position> for BucketStorage<T> {
    type Output = T;

    fn index(&self, pos: Position) -> &T {
        match self.get(pos) {
            Some(value) => value,
            None => panic!("invalid position"),
        }
    }
}

impl<T> IndexMut<Position> for BucketStorage<T> {
    fn index_mut(&mut self, pos: Position) -> &mut T {
        match self.get_mut(pos) {
            Some(value) => value,
            None => panic!("invalid position"),
        }
    }
}

impl<T> Extend<T> for BucketStorage<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for BucketStorage<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        for &value in iter {
            self.insert(value);
        }
    }
}

impl<T> FromIterator<T> for BucketStorage<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut storage = Self::new();
        storage.extend(iter);
        storage
    }
}

impl<T> IntoIterator for BucketStorage<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter::new(self)
    }
}

impl<'a, T> IntoIterator for &'a BucketStorage<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut BucketStorage<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}
