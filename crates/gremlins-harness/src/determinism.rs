#![forbid(unsafe_code)]

//! Reproducibility fixtures for harness runs.
//!
//! Centralizes seed selection, stable run ids, and deterministic timestamps so
//! two runs with the same seed produce byte-identical JSONL.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

/// Seed used when neither `--seed` nor `GREMLINS_SEED` is given.
pub const DEFAULT_SEED: u64 = 0x6772_656d_6c69_6e73;

/// Seed and clock configuration for one run.
#[derive(Debug)]
pub struct DeterminismFixture {
    seed: u64,
    deterministic: bool,
    run_id: String,
    ts_counter: AtomicU64,
}

impl DeterminismFixture {
    /// Read seed and mode from the environment; an explicit seed wins.
    pub fn new(prefix: &str, explicit_seed: Option<u64>) -> Self {
        let seed = explicit_seed.unwrap_or_else(|| fixture_seed(DEFAULT_SEED));
        Self::new_with(prefix, seed, deterministic_mode())
    }

    pub fn new_with(prefix: &str, seed: u64, deterministic: bool) -> Self {
        let run_id = if deterministic {
            format!("{prefix}_seed{seed}")
        } else {
            format!("{prefix}_{}_{}", std::process::id(), unix_secs())
        };
        Self {
            seed,
            deterministic,
            run_id,
            ts_counter: AtomicU64::new(0),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn deterministic(&self) -> bool {
        self.deterministic
    }

    /// Stable run identifier for JSONL output.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// `T000000`, `T000001`, ... in deterministic mode, wall time otherwise.
    pub fn timestamp(&self) -> String {
        if self.deterministic {
            let n = self.ts_counter.fetch_add(1, Ordering::Relaxed);
            format!("T{n:06}")
        } else {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default();
            format!("{}.{:03}", now.as_secs(), now.subsec_millis())
        }
    }

    pub fn env_snapshot(&self) -> EnvSnapshot {
        EnvSnapshot::capture(self)
    }
}

/// Reproducibility fields printed by `gremlins-harness env`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvSnapshot {
    pub seed: u64,
    pub deterministic: bool,
    pub run_id: String,
    pub seed_from_env: bool,
    pub rust_log: Option<String>,
}

impl EnvSnapshot {
    pub fn capture(fixture: &DeterminismFixture) -> Self {
        Self {
            seed: fixture.seed(),
            deterministic: fixture.deterministic(),
            run_id: fixture.run_id().to_string(),
            seed_from_env: env_u64(SEED_VAR).is_some(),
            rust_log: std::env::var("RUST_LOG").ok(),
        }
    }
}

const SEED_VAR: &str = "GREMLINS_SEED";
const DETERMINISTIC_VAR: &str = "GREMLINS_DETERMINISTIC";

/// True when `GREMLINS_DETERMINISTIC` is `1` or `true`.
pub fn deterministic_mode() -> bool {
    env_flag(DETERMINISTIC_VAR)
}

/// `GREMLINS_SEED` if it parses as a `u64`, else `default_seed`.
pub fn fixture_seed(default_seed: u64) -> u64 {
    env_u64(SEED_VAR).unwrap_or(default_seed)
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn env_flag(key: &str) -> bool {
    matches!(
        std::env::var(key).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE")
    )
}

fn unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
