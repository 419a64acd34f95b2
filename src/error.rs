//! Error types for the cache and the shootout harness.

use thiserror::Error;

/// Errors raised while constructing an [`LruCache`](crate::LruCache).
///
/// Lookups never fail: a missing key is reported as `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A cache must be able to hold at least one entry.
    #[error("cache capacity must be positive")]
    ZeroCapacity,
}

/// Errors raised by the shootout harness.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShootoutError {
    /// The lock name did not match any known strategy.
    #[error("unknown lock strategy: {0}")]
    UnknownLock(String),

    /// Thread count outside `1..=MAX_THREADS`.
    #[error("invalid thread count: {0}")]
    InvalidThreadCount(usize),

    /// The no-op lock cannot protect a cache shared between threads.
    #[error("only one thread allowed without locking, got {0}")]
    NoLockNeedsSingleThread(usize),

    /// Shootout parameters that cannot produce a meaningful run.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// A populated key was missing during the get workload.
    #[error("key {0} missing from a fully populated cache")]
    UnexpectedMiss(String),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Convenience alias for harness results.
pub type Result<T> = std::result::Result<T, ShootoutError>;
