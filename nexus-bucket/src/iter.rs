//! Iterators and cursors over a [`BucketStorage`].
//!
//! Everything here walks the insertion-order chain, never the physical
//! bucket layout.

use core::iter::FusedIterator;
use core::marker::PhantomData;

use crate::bucket::Slot;
use crate::chain::Chain;
use crate::{BucketStorage, Position};

// =============================================================================
// Iter
// =============================================================================

/// Iterator over references to elements, oldest first.
///
/// Created by [`BucketStorage::iter`].
pub struct Iter<'a, T> {
    storage: &'a BucketStorage<T>,
    front: u32,
    back: u32,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(storage: &'a BucketStorage<T>) -> Self {
        Self {
            front: storage.chain.head(),
            back: storage.chain.tail(),
            remaining: storage.len(),
            storage,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.storage.chain.node(self.front);
        self.front = node.next;
        self.remaining -= 1;
        Some(self.storage.value_of(node))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.storage.chain.node(self.back);
        self.back = node.prev;
        self.remaining -= 1;
        Some(self.storage.value_of(node))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

// =============================================================================
// IterMut
// =============================================================================

/// Iterator over mutable references to elements, oldest first.
///
/// Created by [`BucketStorage::iter_mut`].
pub struct IterMut<'a, T> {
    /// Slot array base per bucket index, taken once up front so yielding
    /// never re-borrows a bucket that already handed out a reference.
    bases: Vec<*mut Slot<T>>,
    chain: &'a Chain,
    front: u32,
    back: u32,
    remaining: usize,
    _marker: PhantomData<&'a mut T>,
}

// Safety: behaves like `&'a mut [T]`; the raw bases are only used to hand out
// disjoint `&'a mut T`.
unsafe impl<T: Send> Send for IterMut<'_, T> {}
unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

impl<'a, T> IterMut<'a, T> {
    pub(crate) fn new(storage: &'a mut BucketStorage<T>) -> Self {
        Self {
            bases: storage.buckets.slot_bases(),
            front: storage.chain.head(),
            back: storage.chain.tail(),
            remaining: storage.len(),
            chain: &storage.chain,
            _marker: PhantomData,
        }
    }

    #[inline]
    fn value_at(&mut self, idx: u32) -> &'a mut T {
        let node = self.chain.node(idx);
        let base = self.bases[node.bucket as usize];
        debug_assert!(!base.is_null());
        // Safety: the storage is mutably borrowed for 'a and not touched
        // through any other path. Every live node names a distinct
        // (bucket, slot) inside its bucket's array, and each node is yielded
        // exactly once, so the returned references never alias.
        let slot = unsafe { &mut *base.add(node.slot as usize) };
        match slot {
            Slot::Occupied(value) => value,
            Slot::Vacant => unreachable!("live node points at a vacant slot"),
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let idx = self.front;
        self.front = self.chain.node(idx).next;
        self.remaining -= 1;
        Some(self.value_at(idx))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let idx = self.back;
        self.back = self.chain.node(idx).prev;
        self.remaining -= 1;
        Some(self.value_at(idx))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

// =============================================================================
// Positions
// =============================================================================

/// Iterator over the positions of all elements, oldest first.
///
/// Created by [`BucketStorage::positions`].
pub struct Positions<'a, T> {
    storage: &'a BucketStorage<T>,
    front: u32,
    back: u32,
    remaining: usize,
}

impl<'a, T> Positions<'a, T> {
    pub(crate) fn new(storage: &'a BucketStorage<T>) -> Self {
        Self {
            front: storage.chain.head(),
            back: storage.chain.tail(),
            remaining: storage.len(),
            storage,
        }
    }
}

impl<T> Iterator for Positions<'_, T> {
    type Item = Position;

    #[inline]
    fn next(&mut self) -> Option<Position> {
        if self.remaining == 0 {
            return None;
        }
        let pos = self.storage.position_of(self.front);
        self.front = self.storage.chain.node(self.front).next;
        self.remaining -= 1;
        Some(pos)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Positions<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Position> {
        if self.remaining == 0 {
            return None;
        }
        let pos = self.storage.position_of(self.back);
        self.back = self.storage.chain.node(self.back).prev;
        self.remaining -= 1;
        Some(pos)
    }
}

impl<T> ExactSizeIterator for Positions<'_, T> {}
impl<T> FusedIterator for Positions<'_, T> {}

// =============================================================================
// IntoIter / Drain
// =============================================================================

/// Owning iterator, oldest first. Buckets are released as they empty.
///
/// Created by `BucketStorage::into_iter`.
pub struct IntoIter<T> {
    storage: BucketStorage<T>,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(storage: BucketStorage<T>) -> Self {
        Self { storage }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.storage.pop_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.storage.len(), Some(self.storage.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.storage.pop_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

/// Draining iterator, oldest first.
///
/// Created by [`BucketStorage::drain`]. Remaining elements are dropped when
/// the iterator is, leaving the storage empty with no buckets allocated.
pub struct Drain<'a, T> {
    storage: &'a mut BucketStorage<T>,
}

impl<'a, T> Drain<'a, T> {
    pub(crate) fn new(storage: &'a mut BucketStorage<T>) -> Self {
        Self { storage }
    }
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.storage.pop_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.storage.len(), Some(self.storage.len()))
    }
}

impl<T> DoubleEndedIterator for Drain<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.storage.pop_back()
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}
impl<T> FusedIterator for Drain<'_, T> {}

impl<T> Drop for Drain<'_, T> {
    fn drop(&mut self) {
        for _ in self.by_ref() {}
    }
}

// =============================================================================
// Cursor
// =============================================================================

/// A cursor with mutable access and in-place removal.
///
/// Walks elements in insertion order. Removing the current element moves
/// the cursor to its successor; inserting appends at the back without
/// moving the cursor.
///
/// ```
/// use nexus_bucket::BucketStorage;
///
/// let mut orders: BucketStorage<u64> = BucketStorage::with_block_capacity(8);
/// orders.extend([100, 50, 70]);
///
/// let mut incoming = 160u64;
/// let mut cursor = orders.cursor_front();
/// while let Some(resting) = cursor.current_mut() {
///     let fill = incoming.min(*resting);
///     *resting -= fill;
///     incoming -= fill;
///
///     if *resting == 0 {
///         cursor.remove_current();
///     } else {
///         cursor.move_next();
///     }
///     if incoming == 0 {
///         break;
///     }
/// }
///
/// assert_eq!(orders.iter().copied().collect::<Vec<_>>(), [60]);
/// ```
pub struct Cursor<'a, T> {
    storage: &'a mut BucketStorage<T>,
    current: Position,
}

impl<'a, T> Cursor<'a, T> {
    pub(crate) fn new(storage: &'a mut BucketStorage<T>, current: Position) -> Self {
        Self { storage, current }
    }

    /// Current element, or `None` at the end.
    #[inline]
    pub fn current(&self) -> Option<&T> {
        self.storage.get(self.current)
    }

    /// Current element mutably, or `None` at the end.
    #[inline]
    pub fn current_mut(&mut self) -> Option<&mut T> {
        self.storage.get_mut(self.current)
    }

    /// Position of the current element.
    #[inline]
    pub fn position(&self) -> Position {
        self.current
    }

    /// Returns `true` if the cursor is at the end.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.current.is_end()
    }

    /// Moves to the next element. Stays put at the end.
    #[inline]
    pub fn move_next(&mut self) {
        self.current = self.storage.next(self.current);
    }

    /// Moves to the previous element. From the end this is the newest
    /// element; from the oldest element it is the end.
    #[inline]
    pub fn move_prev(&mut self) {
        self.current = self.storage.prev(self.current);
    }

    /// Removes the current element and moves to its successor.
    ///
    /// Returns `None` at the end.
    pub fn remove_current(&mut self) -> Option<T> {
        let (value, next) = self.storage.remove_entry(self.current)?;
        self.current = next;
        Some(value)
    }

    /// Peeks at the element after the current one.
    #[inline]
    pub fn peek_next(&self) -> Option<&T> {
        if self.current.is_end() {
            return None;
        }
        self.storage.get(self.storage.next(self.current))
    }

    /// Appends a value at the back of the insertion order.
    ///
    /// A cursor at the end stays at the end.
    #[inline]
    pub fn insert(&mut self, value: T) -> Position {
        self.storage.insert(value)
    }
}

impl<T> Extend<T> for Cursor<'_, T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.storage.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use crate::BucketStorage;
    use std::cell::Cell;
    use std::rc::Rc;

    fn storage_with(block: usize, values: impl IntoIterator<Item = u32>) -> BucketStorage<u32> {
        let mut storage = BucketStorage::with_block_capacity(block);
        storage.extend(values);
        storage
    }

    #[test]
    fn iter_follows_insertion_not_layout() {
        let mut storage = storage_with(2, 0..4);
        let first = storage.begin();
        storage.erase(first);
        // Fills the slot vacated in the first bucket.
        storage.insert(9);
        assert_eq!(storage.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 9]);
        assert_eq!(storage.iter().rev().copied().collect::<Vec<_>>(), [9, 3, 2, 1]);
    }

    #[test]
    fn iter_meets_in_the_middle() {
        let storage = storage_with(3, 0..5);
        let mut iter = storage.iter();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.next(), Some(&0));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&3));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.len(), 0);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn iter_empty() {
        let storage: BucketStorage<u32> = BucketStorage::new();
        assert_eq!(storage.iter().next(), None);
        assert_eq!(storage.positions().next(), None);
    }

    #[test]
    fn iter_mut_updates_in_place() {
        let mut storage = storage_with(2, 0..5);
        for value in storage.iter_mut() {
            *value *= 10;
        }
        for value in (&mut storage).into_iter().rev().take(1) {
            *value += 1;
        }
        assert_eq!(storage.iter().copied().collect::<Vec<_>>(), [0, 10, 20, 30, 41]);
    }

    #[test]
    fn iter_mut_references_coexist() {
        let mut storage = storage_with(3, 0..8);
        let first = storage.begin();
        storage.erase(first);
        storage.insert(8);

        let refs: Vec<&mut u32> = storage.iter_mut().collect();
        assert_eq!(refs.len(), 8);
        for value in refs {
            *value += 100;
        }

        let mut both_ends = storage.iter_mut();
        let head = both_ends.next().unwrap();
        let tail = both_ends.next_back().unwrap();
        *head += 1;
        *tail += 1;

        assert_eq!(
            storage.iter().copied().collect::<Vec<_>>(),
            [102, 102, 103, 104, 105, 106, 107, 109]
        );
    }

    #[test]
    fn positions_resolve_to_elements() {
        let storage = storage_with(2, 10..15);
        let positions: Vec<_> = storage.positions().collect();
        assert_eq!(positions.len(), 5);
        assert_eq!(positions[0], storage.begin());
        let values: Vec<_> = positions.iter().map(|&p| storage[p]).collect();
        assert_eq!(values, [10, 11, 12, 13, 14]);

        let last = storage.positions().next_back();
        assert_eq!(last, Some(storage.last()));
    }

    #[test]
    fn erase_while_walking_collected_positions() {
        let mut storage = storage_with(3, 0..10);
        let positions: Vec<_> = storage.positions().collect();
        for pos in positions {
            if storage[pos] % 2 == 1 {
                storage.erase(pos);
            }
        }
        assert_eq!(storage.iter().copied().collect::<Vec<_>>(), [0, 2, 4, 6, 8]);
    }

    #[test]
    fn into_iter_both_ends() {
        let storage = storage_with(2, 0..5);
        let mut iter = storage.into_iter();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.next(), Some(0));
        assert_eq!(iter.next_back(), Some(4));
        assert_eq!(iter.collect::<Vec<_>>(), [1, 2, 3]);
    }

    #[test]
    fn drain_empties_and_releases_buckets() {
        let mut storage = storage_with(2, 0..5);
        let drained: Vec<_> = storage.drain().collect();
        assert_eq!(drained, [0, 1, 2, 3, 4]);
        assert!(storage.is_empty());
        assert_eq!(storage.capacity(), 0);
    }

    #[test]
    fn drain_drop_removes_unconsumed() {
        let drops = Rc::new(Cell::new(0));

        struct Counted(Rc<Cell<usize>>);
        impl Drop for Counted {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }

        let mut storage = BucketStorage::with_block_capacity(2);
        for _ in 0..5 {
            storage.insert(Counted(drops.clone()));
        }

        {
            let mut drain = storage.drain();
            drop(drain.next());
            assert_eq!(drops.get(), 1);
        }

        assert_eq!(drops.get(), 5);
        assert!(storage.is_empty());
        assert_eq!(storage.bucket_count(), 0);
    }

    #[test]
    fn cursor_remove_advances() {
        let mut storage = storage_with(2, 0..6);
        let mut cursor = storage.cursor_front();
        while let Some(&value) = cursor.current() {
            if value % 3 == 0 {
                assert_eq!(cursor.remove_current(), Some(value));
            } else {
                cursor.move_next();
            }
        }
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.remove_current(), None);
        assert_eq!(storage.iter().copied().collect::<Vec<_>>(), [1, 2, 4, 5]);
    }

    #[test]
    fn cursor_move_prev_from_end() {
        let mut storage = storage_with(4, 0..3);
        let end = storage.end();
        let mut cursor = storage.cursor_at(end);
        assert_eq!(cursor.current(), None);

        cursor.move_prev();
        assert_eq!(cursor.current(), Some(&2));
        cursor.move_prev();
        cursor.move_prev();
        assert_eq!(cursor.current(), Some(&0));
        cursor.move_prev();
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn cursor_peek_and_insert() {
        let mut storage = storage_with(2, 0..2);
        let mut cursor = storage.cursor_back();
        assert_eq!(cursor.current(), Some(&1));
        assert_eq!(cursor.peek_next(), None);

        let pos = cursor.insert(7);
        assert_eq!(cursor.peek_next(), Some(&7));
        cursor.move_next();
        assert_eq!(cursor.position(), pos);
        if let Some(value) = cursor.current_mut() {
            *value += 1;
        }
        assert_eq!(storage.back(), Some(&8));
    }
}
