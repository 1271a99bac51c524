//! Error types for bucket storage.

use core::fmt;
use std::collections::TryReserveError;

/// Memory for a bucket, a logical node, or a free-slot stack could not be
/// acquired.
///
/// The operation that reported it left the storage unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError;

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "memory allocation failed")
    }
}

impl std::error::Error for AllocError {}

impl From<TryReserveError> for AllocError {
    #[inline]
    fn from(_: TryReserveError) -> Self {
        AllocError
    }
}

/// Error returned by [`try_insert`](crate::BucketStorage::try_insert).
///
/// Contains the value that could not be inserted, allowing recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejected<T>(
    /// The value that could not be inserted.
    pub T,
);

impl<T> Rejected<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "insert rejected: {}", AllocError)
    }
}

impl<T: fmt::Debug> std::error::Error for Rejected<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&AllocError)
    }
}

/// Error returned by [`try_insert_with`](crate::BucketStorage::try_insert_with).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError<E> {
    /// Storage for the element could not be allocated.
    Alloc(AllocError),
    /// The constructor failed. The reserved slot was returned to its bucket.
    Construct(E),
}

impl<E> From<AllocError> for InsertError<E> {
    #[inline]
    fn from(err: AllocError) -> Self {
        InsertError::Alloc(err)
    }
}

impl<E: fmt::Display> fmt::Display for InsertError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::Alloc(err) => write!(f, "{err}"),
            InsertError::Construct(err) => write!(f, "value construction failed: {err}"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for InsertError<E> {}

/// Error during storage construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Block capacity is zero. Every bucket needs at least one slot.
    ZeroBlockCapacity,
    /// Block capacity does not fit the 32-bit slot index.
    BlockCapacityTooLarge { requested: usize, max: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroBlockCapacity => write!(f, "block capacity cannot be zero"),
            ConfigError::BlockCapacityTooLarge { requested, max } => {
                write!(f, "block capacity ({requested}) exceeds maximum ({max})")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
