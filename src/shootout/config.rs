//! Shootout configuration, loaded from environment variables.

use std::env;
use std::str::FromStr;

use crate::error::{Result, ShootoutError};

/// Parameters of a shootout run.
///
/// All values can be configured via environment variables with the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShootoutConfig {
    /// Number of distinct keys put in the cache
    pub object_count: usize,
    /// Capacity of the cache under test
    pub cache_capacity: usize,
    /// Total number of gets, split evenly between threads
    pub op_count: usize,
    /// Seed for key generation; `None` draws keys from OS entropy
    pub key_seed: Option<u64>,
}

impl ShootoutConfig {
    /// Creates a config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SHOOTOUT_OBJECT_COUNT` - Distinct keys (default: 10000)
    /// - `SHOOTOUT_CACHE_CAPACITY` - Cache capacity (default: 20000)
    /// - `SHOOTOUT_OP_COUNT` - Total gets (default: 50000000)
    /// - `SHOOTOUT_KEY_SEED` - Key generation seed (default: random)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            object_count: env_or("SHOOTOUT_OBJECT_COUNT", defaults.object_count),
            cache_capacity: env_or("SHOOTOUT_CACHE_CAPACITY", defaults.cache_capacity),
            op_count: env_or("SHOOTOUT_OP_COUNT", defaults.op_count),
            key_seed: env::var("SHOOTOUT_KEY_SEED")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }

    /// Every key must fit, otherwise the get workload would miss.
    pub fn validate(&self) -> Result<()> {
        if self.object_count == 0 {
            return Err(ShootoutError::InvalidConfig("object count must be positive"));
        }
        if self.cache_capacity < self.object_count {
            return Err(ShootoutError::InvalidConfig(
                "cache capacity must hold every object",
            ));
        }
        Ok(())
    }
}

impl Default for ShootoutConfig {
    fn default() -> Self {
        Self {
            object_count: 10_000,
            cache_capacity: 20_000,
            op_count: 50_000_000,
            key_seed: None,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
