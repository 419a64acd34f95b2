//! Locking strategies for [`LruCache`](crate::LruCache).
//!
//! A strategy is anything that hands out an exclusive guard. The cache is
//! generic over the strategy, so swapping locks is a change of type
//! parameter and costs nothing at runtime.
//!
//! | Strategy                  | Behaviour                                   |
//! |---------------------------|---------------------------------------------|
//! | [`NoLock`]                | No exclusion; `!Sync`, single thread only   |
//! | `std::sync::Mutex<()>`    | Blocking OS mutex                           |
//! | `parking_lot::Mutex<()>`  | Blocking parking mutex (crate default)      |
//! | [`SpinThenBlock<N>`]      | Spins `N` attempts, then blocks             |
//! | `std::sync::RwLock<()>`   | Reader/writer lock, always taken for write  |
//! | `parking_lot::RwLock<()>` | Reader/writer lock, always taken for write  |

use std::cell::Cell;
use std::fmt;
use std::hint;
use std::str::FromStr;
use std::sync::PoisonError;

use crate::error::ShootoutError;

/// Spin attempts used by [`LockKind::Spin4k`].
pub const DEFAULT_SPINS: u32 = 4000;

/// Exclusive acquire/release capability.
///
/// The lock is held for as long as the returned guard lives and is released
/// when the guard is dropped.
///
/// # Safety
///
/// While a guard is alive, no other guard of the same instance may be
/// obtainable from any thread that can reach the instance. The cache relies
/// on this to hand out `&mut` access to its storage.
pub unsafe trait LockStrategy: Default {
    /// Scoped proof that the lock is held.
    type Guard<'a>
    where
        Self: 'a;

    /// Blocks until the lock is acquired. Not re-entrant.
    fn acquire(&self) -> Self::Guard<'_>;
}

/// A lock that does nothing.
///
/// `NoLock` is `!Sync`, so a cache built on it can never be shared between
/// threads. Acquiring it again while a guard is alive on the same thread
/// panics instead of aliasing the cache state.
#[derive(Debug, Default)]
pub struct NoLock {
    held: Cell<bool>,
}

/// Guard returned by [`NoLock::acquire`].
#[derive(Debug)]
pub struct NoLockGuard<'a> {
    held: &'a Cell<bool>,
}

impl Drop for NoLockGuard<'_> {
    fn drop(&mut self) {
        self.held.set(false);
    }
}

// SAFETY: `NoLock` is `!Sync`, so only the owning thread reaches it, and the
// `held` flag rejects a second guard on that thread.
unsafe impl LockStrategy for NoLock {
    type Guard<'a> = NoLockGuard<'a>;

    fn acquire(&self) -> NoLockGuard<'_> {
        assert!(!self.held.replace(true), "NoLock acquired re-entrantly");
        NoLockGuard { held: &self.held }
    }
}

// Poisoning is ignored so that std locks behave like the parking_lot ones.
// SAFETY: a std mutex guard is exclusive.
unsafe impl LockStrategy for std::sync::Mutex<()> {
    type Guard<'a> = std::sync::MutexGuard<'a, ()>;

    fn acquire(&self) -> Self::Guard<'_> {
        self.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// SAFETY: a parking_lot mutex guard is exclusive.
unsafe impl LockStrategy for parking_lot::Mutex<()> {
    type Guard<'a> = parking_lot::MutexGuard<'a, ()>;

    fn acquire(&self) -> Self::Guard<'_> {
        self.lock()
    }
}

// SAFETY: only the write side is ever taken, and write guards are exclusive.
unsafe impl LockStrategy for std::sync::RwLock<()> {
    type Guard<'a> = std::sync::RwLockWriteGuard<'a, ()>;

    fn acquire(&self) -> Self::Guard<'_> {
        self.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// SAFETY: only the write side is ever taken, and write guards are exclusive.
unsafe impl LockStrategy for parking_lot::RwLock<()> {
    type Guard<'a> = parking_lot::RwLockWriteGuard<'a, ()>;

    fn acquire(&self) -> Self::Guard<'_> {
        self.write()
    }
}

/// Mutex that busy-waits for up to `SPINS` attempts before blocking.
///
/// `SpinThenBlock<0>` blocks straight away.
#[derive(Debug, Default)]
pub struct SpinThenBlock<const SPINS: u32 = DEFAULT_SPINS> {
    inner: parking_lot::Mutex<()>,
}

impl<const SPINS: u32> SpinThenBlock<SPINS> {
    /// Number of attempts made before falling back to blocking.
    pub const fn spins(&self) -> u32 {
        SPINS
    }
}

// SAFETY: every guard comes from the inner parking_lot mutex.
unsafe impl<const SPINS: u32> LockStrategy for SpinThenBlock<SPINS> {
    type Guard<'a> = parking_lot::MutexGuard<'a, ()>;

    fn acquire(&self) -> Self::Guard<'_> {
        for _ in 0..SPINS {
            if let Some(guard) = self.inner.try_lock() {
                return guard;
            }
            hint::spin_loop();
        }
        self.inner.lock()
    }
}

/// Runtime name of a locking strategy, used to pick which cache type the
/// shootout runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockKind {
    NoLock,
    StdMutex,
    ParkingMutex,
    Spin0,
    Spin4k,
    StdRwLock,
    ParkingRwLock,
}

impl LockKind {
    pub const ALL: [LockKind; 7] = [
        LockKind::NoLock,
        LockKind::StdMutex,
        LockKind::ParkingMutex,
        LockKind::Spin0,
        LockKind::Spin4k,
        LockKind::StdRwLock,
        LockKind::ParkingRwLock,
    ];

    /// Command-line name.
    pub fn name(self) -> &'static str {
        match self {
            LockKind::NoLock => "nolocks",
            LockKind::StdMutex => "std",
            LockKind::ParkingMutex => "parking",
            LockKind::Spin0 => "spin0",
            LockKind::Spin4k => "spin4k",
            LockKind::StdRwLock => "stdrw",
            LockKind::ParkingRwLock => "rwlock",
        }
    }

    /// Label printed next to the timing result.
    pub fn label(self) -> &'static str {
        match self {
            LockKind::NoLock => "No locking",
            LockKind::StdMutex => "std::sync::Mutex",
            LockKind::ParkingMutex => "parking_lot::Mutex",
            LockKind::Spin0 => "SpinThenBlock<0>",
            LockKind::Spin4k => "SpinThenBlock<4000>",
            LockKind::StdRwLock => "std::sync::RwLock",
            LockKind::ParkingRwLock => "parking_lot::RwLock",
        }
    }

    /// Whether a cache using this strategy can be shared between threads.
    pub fn is_thread_safe(self) -> bool {
        self != LockKind::NoLock
    }
}

impl fmt::Display for LockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LockKind {
    type Err = ShootoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        LockKind::ALL
            .into_iter()
            .find(|kind| kind.name() == lowered)
            .ok_or_else(|| ShootoutError::UnknownLock(s.to_string()))
    }
}
