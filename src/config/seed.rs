//! Seed data loading from seed.toml
//!
//! The mock data source serves the pets listed here, and the user record is
//! taken from the `[user]` table. The file stands in for the remote fetch the
//! store performs at startup.

use crate::errors::{Error, Result};
use crate::models::{Pet, User};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire seed.toml file
#[derive(Debug, Deserialize)]
pub struct Seed {
    /// The account holder
    pub user: User,
    /// Initial pets, in display order
    #[serde(default)]
    pub pets: Vec<Pet>,
}

/// Parses seed data from a TOML string.
pub fn parse_seed(contents: &str) -> Result<Seed> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse seed data: {e}"),
    })
}

/// Loads seed data from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_seed<P: AsRef<Path>>(path: P) -> Result<Seed> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load seed data from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read seed file {}: {e}", path_ref.display()),
    })?;

    parse_seed(&contents)
}
