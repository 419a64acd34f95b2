//! A thread-safe LRU (Least Recently Used) cache that is generic over its
//! locking strategy.
//!
//! This crate provides:
//!
//! 1. [`LruCache`] - A fixed-capacity LRU cache with O(1) get/set/erase
//! 2. [`LockStrategy`] - The exclusive-lock capability the cache is built on,
//!    with no-op, blocking, spin-then-block and reader/writer implementations
//! 3. [`shootout`] - A harness that times the cache under each strategy
//!
//! # Features
//!
//! - Lock chosen as a type parameter, no runtime dispatch
//! - Arena-backed recency list, no per-entry allocation after warm-up
//! - Shared values via `Arc`, eviction never invalidates a caller's handle
//! - Generic key type support with pluggable hashing
//!
//! # Examples
//!
//! ```rust
//! use lru_shootout::{LruCache, NoLock, SpinThenBlock};
//!
//! // The default lock is a parking_lot mutex
//! let cache: LruCache<String, String> = LruCache::new(1000);
//! cache.set("key".to_string(), "value".to_string());
//! assert_eq!(cache.get(&"key".to_string()), Some("value".to_string()));
//!
//! // Swapping the lock is a change of type
//! let spinning: LruCache<u64, u64, SpinThenBlock<100>> = LruCache::new(16);
//! spinning.set(42, 1);
//! assert!(spinning.erase(&42));
//!
//! // Single-threaded use can skip locking altogether
//! let local: LruCache<u64, u64, NoLock> = LruCache::new(16);
//! local.set(1, 2);
//! assert_eq!(local.get(&1), Some(2));
//! ```

pub mod error;
pub mod hashing;
pub mod lock;
pub mod lru_cache;
mod recency;
pub mod shootout;


pub use error::{CacheError, ShootoutError};
pub use lock::{LockKind, LockStrategy, NoLock, SpinThenBlock};
pub use lru_cache::LruCache;
pub use shootout::ShootoutConfig;
