//! Application settings loaded from environment variables.
//!
//! Values normally come from a `.env` file loaded by the binary with `dotenvy`.
//! Every setting has a default so a bare checkout runs without configuration.

use crate::config::database;
use crate::errors::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Default location of the seed file served by the mock data source.
pub const DEFAULT_SEED_PATH: &str = "seed.toml";

/// Default simulated latency of the initial pet fetch.
pub const DEFAULT_FETCH_LATENCY_MS: u64 = 500;

/// Runtime settings for the pet pantry binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    /// `SeaORM` connection string for the key-value storage
    pub database_url: String,
    /// Path of the TOML seed file
    pub seed_path: PathBuf,
    /// How long the mock data source waits before answering
    pub fetch_latency: Duration,
}

impl AppSettings {
    /// Reads `DATABASE_URL`, `PET_SEED_PATH` and `PET_FETCH_LATENCY_MS`.
    pub fn from_env() -> Result<Self> {
        let seed_path = std::env::var("PET_SEED_PATH")
            .map_or_else(|_| PathBuf::from(DEFAULT_SEED_PATH), PathBuf::from);
        let latency = std::env::var("PET_FETCH_LATENCY_MS").ok();

        Ok(Self {
            database_url: database::get_database_url(),
            seed_path,
            fetch_latency: parse_latency(latency.as_deref())?,
        })
    }
}

/// Parses a latency in milliseconds, falling back to the default when unset.
fn parse_latency(raw: Option<&str>) -> Result<Duration> {
    let Some(raw) = raw else {
        return Ok(Duration::from_millis(DEFAULT_FETCH_LATENCY_MS));
    };

    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| Error::Config {
            message: format!("PET_FETCH_LATENCY_MS must be a whole number of milliseconds: {e}"),
        })
}
