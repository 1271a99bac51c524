//! Free-bucket registry.
//!
//! A doubly-linked list of bucket indices used as a stack: every bucket with
//! at least one free slot is registered, the most recently pushed bucket is
//! the insertion target, and any bucket can be pulled out in O(1) when it
//! empties while sitting mid-list.
//!
//! Links live in a parallel array indexed by bucket index, so each bucket
//! carries its registry position without storing it itself.

use crate::bucket::BUCKET_NONE;
use crate::error::AllocError;

/// Registry position of one bucket.
#[derive(Clone, Copy, Debug)]
struct Entry {
    prev: u32,
    next: u32,
    linked: bool,
}

impl Entry {
    const UNLINKED: Self = Self {
        prev: BUCKET_NONE,
        next: BUCKET_NONE,
        linked: false,
    };
}

#[derive(Debug)]
pub(crate) struct Registry {
    entries: Vec<Entry>,
    head: u32,
    tail: u32,
    len: usize,
}

impl Registry {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            head: BUCKET_NONE,
            tail: BUCKET_NONE,
            len: 0,
        }
    }

    /// Makes room for a registry entry for bucket `idx`.
    ///
    /// Must succeed before `idx` is pushed; afterwards push/pop/remove never
    /// allocate.
    pub fn reserve_for(&mut self, idx: u32) -> Result<(), AllocError> {
        let needed = idx as usize + 1;
        if needed > self.entries.len() {
            self.entries.try_reserve(needed - self.entries.len())?;
            self.entries.resize(needed, Entry::UNLINKED);
        }
        Ok(())
    }

    /// Appends a bucket at the tail. O(1).
    ///
    /// # Panics
    ///
    /// Panics if no entry was reserved for `idx`.
    pub fn push(&mut self, idx: u32) {
        let tail = self.tail;
        let entry = &mut self.entries[idx as usize];
        debug_assert!(!entry.linked, "bucket registered twice");
        entry.prev = tail;
        entry.next = BUCKET_NONE;
        entry.linked = true;

        if tail != BUCKET_NONE {
            self.entries[tail as usize].next = idx;
        } else {
            self.head = idx;
        }

        self.tail = idx;
        self.len += 1;
    }

    /// Removes and returns the most recently pushed bucket. O(1).
    pub fn pop(&mut self) -> Option<u32> {
        let tail = self.peek()?;
        self.remove(tail);
        Some(tail)
    }

    /// Returns the most recently pushed bucket without removing it.
    #[inline]
    pub fn peek(&self) -> Option<u32> {
        if self.tail == BUCKET_NONE {
            None
        } else {
            Some(self.tail)
        }
    }

    /// Detaches a bucket from anywhere in the registry. O(1).
    ///
    /// Returns `false` if the bucket was not registered.
    pub fn remove(&mut self, idx: u32) -> bool {
        let Some(&entry) = self.entries.get(idx as usize) else {
            return false;
        };
        if !entry.linked {
            return false;
        }

        if entry.prev != BUCKET_NONE {
            self.entries[entry.prev as usize].next = entry.next;
        } else {
            self.head = entry.next;
        }

        if entry.next != BUCKET_NONE {
            self.entries[entry.next as usize].prev = entry.prev;
        } else {
            self.tail = entry.prev;
        }

        self.entries[idx as usize] = Entry::UNLINKED;
        self.len -= 1;
        true
    }

    #[inline]
    pub fn contains(&self, idx: u32) -> bool {
        self.entries
            .get(idx as usize)
            .is_some_and(|entry| entry.linked)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(indices: &[u32]) -> Registry {
        let mut registry = Registry::new();
        for &idx in indices {
            registry.reserve_for(idx).unwrap();
            registry.push(idx);
        }
        registry
    }

    fn drain(registry: &mut Registry) -> Vec<u32> {
        let mut out = Vec::new();
        while let Some(idx) = registry.pop() {
            out.push(idx);
        }
        out
    }

    #[test]
    fn new_registry_is_empty() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert_eq!(registry.peek(), None);
        assert_eq!(registry.pop(), None);
        assert!(!registry.contains(0));
    }

    #[test]
    fn pop_is_lifo() {
        let mut registry = registry_with(&[0, 1, 2]);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.peek(), Some(2));
        assert_eq!(drain(&mut registry), vec![2, 1, 0]);
        assert!(registry.is_empty());
    }

    #[test]
    fn remove_middle() {
        let mut registry = registry_with(&[4, 1, 7]);
        assert!(registry.remove(1));
        assert!(!registry.contains(1));
        assert_eq!(registry.len(), 2);
        assert_eq!(drain(&mut registry), vec![7, 4]);
    }

    #[test]
    fn remove_head_and_tail() {
        let mut registry = registry_with(&[0, 1, 2, 3]);
        assert!(registry.remove(0));
        assert!(registry.remove(3));
        assert_eq!(registry.peek(), Some(2));
        assert_eq!(drain(&mut registry), vec![2, 1]);
    }

    #[test]
    fn remove_unregistered_is_noop() {
        let mut registry = registry_with(&[0]);
        assert!(!registry.remove(5));
        assert!(registry.remove(0));
        assert!(!registry.remove(0));
        assert!(registry.is_empty());
    }

    #[test]
    fn push_after_remove_goes_to_tail() {
        let mut registry = registry_with(&[0, 1, 2]);
        registry.remove(0);
        registry.push(0);
        assert_eq!(drain(&mut registry), vec![0, 2, 1]);
    }

    #[test]
    fn reserve_for_is_idempotent() {
        let mut registry = Registry::new();
        registry.reserve_for(3).unwrap();
        registry.reserve_for(1).unwrap();
        assert_eq!(registry.entries.len(), 4);
        assert!(registry.entries.iter().all(|e| !e.linked));
    }
}
