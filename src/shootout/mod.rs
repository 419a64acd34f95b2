//! The mutex shootout: fills an [`LruCache`] with random keys and times
//! concurrent `get` traffic against it under a chosen [`LockStrategy`].
//!
//! The cache is sized to hold every key, so every `get` is a hit and the
//! run measures the lock plus one recency promotion per operation.

mod config;
mod guid;

pub use config::ShootoutConfig;
pub use guid::Guid;

use std::panic;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::error::{Result, ShootoutError};
use crate::hashing::Murmur3State;
use crate::lock::{LockKind, LockStrategy, NoLock, SpinThenBlock, DEFAULT_SPINS};
use crate::LruCache;

/// Size in bytes of each cached payload.
pub const PAYLOAD_SIZE: usize = 2048;

/// Upper bound on worker threads.
pub const MAX_THREADS: usize = 1000;

pub type Payload = [u8; PAYLOAD_SIZE];

/// The cache type every strategy is measured with.
pub type ShootoutCache<L> = LruCache<Guid, Arc<Payload>, L, Murmur3State>;

/// Generates `count` random keys, reproducibly when `seed` is given.
pub fn create_keys(count: usize, seed: Option<u64>) -> Vec<Guid> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    (0..count).map(|_| Guid::new_v4(&mut rng)).collect()
}

/// Stores a fresh `b'x'`-filled payload under every key.
pub fn populate_cache<L: LockStrategy>(cache: &ShootoutCache<L>, keys: &[Guid]) {
    for key in keys {
        cache.set(*key, Arc::new([b'x'; PAYLOAD_SIZE]));
    }
    debug!(keys = keys.len(), "cache populated");
}

/// Issues `op_count` gets, cycling through `keys`. Every key is expected to
/// be resident.
pub fn do_gets<L: LockStrategy>(
    keys: &[Guid],
    cache: &ShootoutCache<L>,
    op_count: usize,
) -> Result<()> {
    for key in keys.iter().cycle().take(op_count) {
        if cache.get(key).is_none() {
            return Err(ShootoutError::UnexpectedMiss(key.to_string()));
        }
    }
    Ok(())
}

/// Populates a fresh cache, then runs `total_op_count` gets spread across
/// `thread_count` threads. Only the get phase is timed.
pub fn run_benchmark<L: LockStrategy + Sync>(
    keys: &[Guid],
    thread_count: usize,
    total_op_count: usize,
    capacity: usize,
) -> Result<Duration> {
    let cache = ShootoutCache::<L>::try_with_hasher(capacity, Murmur3State)?;
    populate_cache(&cache, keys);

    let per_thread = total_op_count / thread_count.max(1);
    let start = Instant::now();

    thread::scope(|s| {
        let handles: Vec<_> = (0..thread_count)
            .map(|_| s.spawn(|| do_gets(keys, &cache, per_thread)))
            .collect();

        // Wait for all threads to complete
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|e| panic::resume_unwind(e)))
            .collect::<Result<()>>()
    })?;

    Ok(start.elapsed())
}

/// Single-threaded variant of [`run_benchmark`] for locks that are not
/// `Sync`. The gets run on the calling thread.
pub fn run_local<L: LockStrategy>(
    keys: &[Guid],
    total_op_count: usize,
    capacity: usize,
) -> Result<Duration> {
    let cache = ShootoutCache::<L>::try_with_hasher(capacity, Murmur3State)?;
    populate_cache(&cache, keys);

    let start = Instant::now();
    do_gets(keys, &cache, total_op_count)?;
    Ok(start.elapsed())
}

/// Runs the shootout for `kind` with `thread_count` threads.
pub fn run(kind: LockKind, thread_count: usize, config: &ShootoutConfig) -> Result<Duration> {
    if thread_count == 0 || thread_count > MAX_THREADS {
        return Err(ShootoutError::InvalidThreadCount(thread_count));
    }
    if !kind.is_thread_safe() && thread_count != 1 {
        return Err(ShootoutError::NoLockNeedsSingleThread(thread_count));
    }
    config.validate()?;

    let keys = create_keys(config.object_count, config.key_seed);
    info!(
        lock = %kind,
        threads = thread_count,
        ops = config.op_count,
        keys = keys.len(),
        capacity = config.cache_capacity,
        "starting shootout"
    );

    let (ops, cap) = (config.op_count, config.cache_capacity);
    let elapsed = match kind {
        LockKind::NoLock => run_local::<NoLock>(&keys, ops, cap),
        LockKind::StdMutex => run_benchmark::<std::sync::Mutex<()>>(&keys, thread_count, ops, cap),
        LockKind::ParkingMutex => {
            run_benchmark::<parking_lot::Mutex<()>>(&keys, thread_count, ops, cap)
        }
        LockKind::Spin0 => run_benchmark::<SpinThenBlock<0>>(&keys, thread_count, ops, cap),
        LockKind::Spin4k => {
            run_benchmark::<SpinThenBlock<DEFAULT_SPINS>>(&keys, thread_count, ops, cap)
        }
        LockKind::StdRwLock => {
            run_benchmark::<std::sync::RwLock<()>>(&keys, thread_count, ops, cap)
        }
        LockKind::ParkingRwLock => {
            run_benchmark::<parking_lot::RwLock<()>>(&keys, thread_count, ops, cap)
        }
    }?;

    info!(lock = %kind, secs = elapsed.as_secs_f64(), "shootout finished");
    Ok(elapsed)
}
