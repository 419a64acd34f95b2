use criterion::measurement::WallTime;
use criterion::{
    criterion_group, criterion_main, BenchmarkGroup, BenchmarkId, Criterion, PlotConfiguration,
};
use lru_shootout::hashing::Murmur3State;
use lru_shootout::shootout::{self, Guid, Payload, ShootoutCache, PAYLOAD_SIZE};
use lru_shootout::{LockStrategy, NoLock, SpinThenBlock};
use moka::sync::Cache as MokaCache;
use rand::Rng;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const OPERATIONS_PER_THREAD: usize = 100_000;
const KEY_SEED: u64 = 0x5eed;

#[derive(Clone)]
struct BenchConfig {
    name: String,
    cache_size: usize,
    key_space: usize,
    threads: usize,
    write_ratio: usize, // Number of write operations per 10 operations
}

impl BenchConfig {
    fn new(
        name: &str,
        cache_size: usize,
        key_space: usize,
        threads: usize,
        write_ratio: usize,
    ) -> Self {
        Self {
            name: name.to_string(),
            cache_size,
            key_space,
            threads,
            write_ratio,
        }
    }
}

// Read-only traffic on a cache that holds every key, as in the shootout binary
fn get_thread_count_configs() -> Vec<BenchConfig> {
    vec![
        BenchConfig::new("1 thread", 20_000, 10_000, 1, 0),
        BenchConfig::new("2 threads", 20_000, 10_000, 2, 0),
        BenchConfig::new("4 threads", 20_000, 10_000, 4, 0),
        BenchConfig::new("8 threads", 20_000, 10_000, 8, 0),
    ]
}

// Mixed traffic with eviction pressure
fn get_write_ratio_configs() -> Vec<BenchConfig> {
    vec![
        BenchConfig::new("10% writes", 10_000, 20_000, 4, 1),
        BenchConfig::new("50% writes", 10_000, 20_000, 4, 5),
        BenchConfig::new("80% writes", 10_000, 20_000, 4, 8),
    ]
}

fn payload() -> Arc<Payload> {
    Arc::new([b'x'; PAYLOAD_SIZE])
}

fn run_ops<F, G>(keys: &[Guid], config: &BenchConfig, set: F, get: G)
where
    F: Fn(Guid, Arc<Payload>),
    G: Fn(&Guid),
{
    let mut rng = rand::thread_rng();
    for i in 0..OPERATIONS_PER_THREAD {
        let key = if config.write_ratio == 0 {
            keys[i % keys.len()]
        } else {
            keys[rng.gen_range(0..keys.len())]
        };
        if i % 10 < config.write_ratio {
            set(key, payload());
        } else {
            get(&key);
        }
    }
}

fn bench_lru<L: LockStrategy + Sync>(keys: &[Guid], config: &BenchConfig) -> Duration {
    let cache = ShootoutCache::<L>::with_hasher(config.cache_size, Murmur3State);
    let resident = keys.len().min(config.cache_size);
    shootout::populate_cache(&cache, &keys[..resident]);

    let start = Instant::now();
    thread::scope(|s| {
        for _ in 0..config.threads {
            s.spawn(|| {
                run_ops(
                    keys,
                    config,
                    |key, value| cache.set(key, value),
                    |key| {
                        let _ = cache.get(key);
                    },
                )
            });
        }
    });
    start.elapsed()
}

fn bench_no_lock(keys: &[Guid], config: &BenchConfig) -> Duration {
    let cache = ShootoutCache::<NoLock>::with_hasher(config.cache_size, Murmur3State);
    let resident = keys.len().min(config.cache_size);
    shootout::populate_cache(&cache, &keys[..resident]);

    let start = Instant::now();
    run_ops(
        keys,
        config,
        |key, value| cache.set(key, value),
        |key| {
            let _ = cache.get(key);
        },
    );
    start.elapsed()
}

fn bench_moka(keys: &[Guid], config: &BenchConfig) -> Duration {
    let cache: MokaCache<Guid, Arc<Payload>> = MokaCache::new(config.cache_size as u64);
    for key in keys.iter().take(config.cache_size) {
        cache.insert(*key, payload());
    }

    let start = Instant::now();
    thread::scope(|s| {
        for _ in 0..config.threads {
            s.spawn(|| {
                run_ops(
                    keys,
                    config,
                    |key, value| cache.insert(key, value),
                    |key| {
                        let _ = cache.get(key);
                    },
                )
            });
        }
    });
    start.elapsed()
}

fn bench_strategy<L: LockStrategy + Sync>(
    group: &mut BenchmarkGroup<'_, WallTime>,
    label: &str,
    keys: &[Guid],
    config: &BenchConfig,
) {
    group.bench_with_input(BenchmarkId::new(label, &config.name), config, |b, config| {
        b.iter(|| bench_lru::<L>(keys, config));
    });
}

fn run_benchmark_group(c: &mut Criterion, name: &str, configs: Vec<BenchConfig>) {
    let plot_config = PlotConfiguration::default().summary_scale(criterion::AxisScale::Linear);

    let mut group = c.benchmark_group(name);
    group.plot_config(plot_config);
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(10);

    for config in configs.iter() {
        let keys = shootout::create_keys(config.key_space, Some(KEY_SEED));

        if config.threads == 1 {
            group.bench_with_input(BenchmarkId::new("NoLock", &config.name), config, |b, config| {
                b.iter(|| bench_no_lock(&keys, config));
            });
        }

        bench_strategy::<std::sync::Mutex<()>>(&mut group, "std::sync::Mutex", &keys, config);
        bench_strategy::<parking_lot::Mutex<()>>(&mut group, "parking_lot::Mutex", &keys, config);
        bench_strategy::<SpinThenBlock<0>>(&mut group, "SpinThenBlock<0>", &keys, config);
        bench_strategy::<SpinThenBlock<4000>>(&mut group, "SpinThenBlock<4000>", &keys, config);
        bench_strategy::<std::sync::RwLock<()>>(&mut group, "std::sync::RwLock", &keys, config);
        bench_strategy::<parking_lot::RwLock<()>>(&mut group, "parking_lot::RwLock", &keys, config);

        group.bench_with_input(BenchmarkId::new("Moka Cache", &config.name), config, |b, config| {
            b.iter(|| bench_moka(&keys, config));
        });
    }
    group.finish();
}

fn lock_benchmark(c: &mut Criterion) {
    // Test impact of thread count on a read-only workload
    run_benchmark_group(c, "Thread Count Impact", get_thread_count_configs());

    // Test impact of different write ratios
    run_benchmark_group(c, "Write Ratio Impact", get_write_ratio_configs());
}

criterion_group!(benches, lock_benchmark);
criterion_main!(benches);
