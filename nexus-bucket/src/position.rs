//! Stable positions into a [`BucketStorage`](crate::BucketStorage).
//!
//! A [`Position`] is the storage's iterator: a small `Copy` handle naming one
//! element (or the end). It does not borrow the storage, so it survives any
//! number of inserts and erases of *other* elements.
//!
//! Positions are ordered by insertion time, which matches traversal order:
//! for two live positions `a < b` iff `a` is visited before `b`. The end
//! position sorts after every element.
//!
//! # Example
//!
//! ```
//! use nexus_bucket::{BucketStorage, Position};
//!
//! let mut storage = BucketStorage::with_block_capacity(4);
//! let a = storage.insert("a");
//! let b = storage.insert("b");
//!
//! assert!(a < b);
//! assert!(b < storage.end());
//! assert_eq!(storage.end(), Position::END);
//! assert_eq!(Position::default(), Position::END);
//! ```

use core::cmp::Ordering;
use core::hash::{Hash, Hasher};

use crate::chain::{NODE_NONE, STAMP_END};

/// Handle to an element of a [`BucketStorage`](crate::BucketStorage), or to
/// its end.
///
/// Obtained from `insert`, `begin`, `end`, `next`, `prev`, `advance` and
/// `erase`. A position stays valid until its own element is erased; after
/// that the storage reports it as stale (`get` returns `None`).
#[derive(Clone, Copy)]
pub struct Position {
    pub(crate) node: u32,
    pub(crate) generation: u32,
    pub(crate) stamp: u64,
}

impl Position {
    /// The end position. Equal to `end()` of every storage.
    pub const END: Position = Position {
        node: NODE_NONE,
        generation: 0,
        stamp: STAMP_END,
    };

    #[inline]
    pub(crate) const fn new(node: u32, generation: u32, stamp: u64) -> Self {
        Self {
            node,
            generation,
            stamp,
        }
    }

    /// Returns `true` if this is the end position.
    #[inline]
    pub const fn is_end(self) -> bool {
        self.stamp == STAMP_END
    }

    /// Insertion timestamp of the element, or `None` for the end position.
    ///
    /// Timestamps increase strictly with every insert into one storage.
    #[inline]
    pub const fn stamp(self) -> Option<u64> {
        if self.is_end() {
            None
        } else {
            Some(self.stamp)
        }
    }

    /// Comparison key: every end position collapses to one value.
    #[inline]
    const fn key(self) -> (u64, u32, u32) {
        if self.is_end() {
            (STAMP_END, NODE_NONE, 0)
        } else {
            (self.stamp, self.node, self.generation)
        }
    }
}

impl Default for Position {
    #[inline]
    fn default() -> Self {
        Self::END
    }
}

impl PartialEq for Position {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Position {}

impl PartialOrd for Position {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl core::fmt::Debug for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_end() {
            write!(f, "Position(end)")
        } else {
            f.debug_struct("Position")
                .field("node", &self.node)
                .field("generation", &self.generation)
                .field("stamp", &self.stamp)
                .finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn end_variants_are_equal() {
        let sentinel = Position::new(NODE_NONE, 0, STAMP_END);
        let odd_end = Position::new(17, 3, STAMP_END);

        assert_eq!(Position::END, Position::default());
        assert_eq!(Position::END, sentinel);
        assert_eq!(Position::END, odd_end);
        assert!(odd_end.is_end());
        assert_eq!(odd_end.stamp(), None);
    }

    #[test]
    fn ordering_follows_stamps() {
        let a = Position::new(5, 0, 1);
        let b = Position::new(0, 0, 2);
        let c = Position::new(3, 9, 10);

        assert!(a < b);
        assert!(b < c);
        assert!(c > a);
        assert!(a <= a);
        assert!(c >= c);
        assert!(c < Position::END);
        assert!(Position::END <= Position::END);
        assert!(Position::END >= Position::default());
    }

    #[test]
    fn identity_includes_generation() {
        let old = Position::new(2, 0, 4);
        let reused = Position::new(2, 1, 7);
        assert_ne!(old, reused);
        assert_eq!(old.stamp(), Some(4));
    }

    #[test]
    fn hash_agrees_with_eq() {
        let mut set = HashSet::new();
        set.insert(Position::END);
        set.insert(Position::new(9, 9, STAMP_END));
        set.insert(Position::new(1, 0, 0));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", Position::END), "Position(end)");
        assert_eq!(
            format!("{:?}", Position::new(1, 2, 3)),
            "Position { node: 1, generation: 2, stamp: 3 }"
        );
    }
}
