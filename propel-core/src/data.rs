//! Core data types for propel property-based testing.

use crate::error::{PropelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Seed for deterministic test generation.
///
/// A seed fully determines the draw sequence of the [`Rng`](crate::Rng)
/// built from it, so a failing run can be replayed by reusing its seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seed(pub u64);

impl Seed {
    /// Create a seed from a raw value.
    pub fn from_u64(value: u64) -> Self {
        Seed(value)
    }

    /// Get the raw seed value.
    pub fn get(&self) -> u64 {
        self.0
    }

    /// Derive a seed from the current wall clock.
    pub fn from_time() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Seed(splitmix64_mix(nanos))
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        Seed(value)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed({})", self.0)
    }
}

/// Environment variable overriding [`PropertyParams::seed`].
pub const ENV_SEED: &str = "PROPEL_SEED";
/// Environment variable overriding [`PropertyParams::num_samples`].
pub const ENV_SAMPLES: &str = "PROPEL_SAMPLES";
/// Environment variable overriding [`PropertyParams::max_shrink_rounds`].
pub const ENV_SHRINK_ROUNDS: &str = "PROPEL_SHRINK_ROUNDS";
/// Environment variable overriding [`PropertyParams::timeout_ns`].
pub const ENV_TIMEOUT_NS: &str = "PROPEL_TIMEOUT_NS";

const DEFAULT_SAMPLES: usize = 100;
const DEFAULT_SHRINK_ROUNDS: usize = 10;
const DEFAULT_TIMEOUT_NS: u64 = 60_000_000_000;

/// Configuration for a single property run.
///
/// Parameters are fixed for the lifetime of one run. Missing fields in a
/// deserialized document fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyParams {
    /// Seed for the run's random source.
    pub seed: u64,

    /// Number of samples to draw before declaring success.
    pub num_samples: usize,

    /// Maximum number of shrink candidates to evaluate after a failure.
    pub max_shrink_rounds: usize,

    /// Wall clock budget for the whole run, enforced by the harness.
    pub timeout_ns: u64,
}

impl Default for PropertyParams {
    fn default() -> Self {
        PropertyParams {
            seed: Seed::from_time().get(),
            num_samples: DEFAULT_SAMPLES,
            max_shrink_rounds: DEFAULT_SHRINK_ROUNDS,
            timeout_ns: DEFAULT_TIMEOUT_NS,
        }
    }
}

impl PropertyParams {
    /// Use a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of samples.
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.num_samples = samples;
        self
    }

    /// Set the shrink round cap.
    pub fn with_shrink_rounds(mut self, rounds: usize) -> Self {
        self.max_shrink_rounds = rounds;
        self
    }

    /// Set the run timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ns = u64::try_from(timeout.as_nanos()).unwrap_or(u64::MAX);
        self
    }

    /// The run timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_nanos(self.timeout_ns)
    }

    /// Reject parameter combinations no run can honour.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_ns == 0 {
            return Err(PropelError::InvalidConfig {
                message: "timeout must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Defaults overridden by the `PROPEL_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each
    /// `PROPEL_*` key.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut params = PropertyParams::default();
        if let Some(seed) = parse_var(&lookup, ENV_SEED)? {
            params.seed = seed;
        }
        if let Some(samples) = parse_var(&lookup, ENV_SAMPLES)? {
            params.num_samples = samples;
        }
        if let Some(rounds) = parse_var(&lookup, ENV_SHRINK_ROUNDS)? {
            params.max_shrink_rounds = rounds;
        }
        if let Some(timeout) = parse_var(&lookup, ENV_TIMEOUT_NS)? {
            params.timeout_ns = timeout;
        }
        params.validate()?;
        Ok(params)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| PropelError::InvalidConfig {
                message: format!("{key}={raw:?}: {e}"),
            }),
    }
}

/// SplitMix64 mixing function for high-quality output.
pub(crate) fn splitmix64_mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}
