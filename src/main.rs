//! Mutex shootout - times an LRU cache under different locking strategies.
//!
//! Usage: `lru_shootout <threadCount> <lock>`, where `<lock>` is one of the
//! names accepted by [`LockKind`]. Run sizes come from `SHOOTOUT_*`
//! environment variables.

use std::env;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lru_shootout::shootout;
use lru_shootout::{LockKind, ShootoutConfig};

fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "lru_shootout=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().collect();
    let [_, threads, lock] = args.as_slice() else {
        let names: Vec<_> = LockKind::ALL.iter().map(|kind| kind.name()).collect();
        let program = args.first().map_or("lru_shootout", String::as_str);
        bail!("Usage: {} threadCount {}", program, names.join("|"));
    };

    let thread_count: usize = threads
        .parse()
        .with_context(|| format!("Invalid thread count: {threads}"))?;
    let kind: LockKind = lock.parse()?;

    let config = ShootoutConfig::from_env();
    info!(?config, "configuration loaded");

    let elapsed = shootout::run(kind, thread_count, &config)?;
    println!("{:<22}{:.6}", format!("{}:", kind.label()), elapsed.as_secs_f64());

    Ok(())
}
