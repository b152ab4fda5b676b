//! Collaborator traits at the edge of the pet store.
//!
//! ```text
//!   PetSource ──▶ PetStore ◀──▶ KeyValueStore
//! ```
//!
//! The store never talks to a database or a remote service directly; it is
//! handed implementations of these traits at construction and initialization
//! time, which keeps it testable with in-memory fakes.

use crate::errors::Result;
use crate::models::Pet;
use std::future::Future;

/// Storage key holding the id of the pet the user last looked at.
pub const LAST_VIEWED_PET_KEY: &str = "last_viewed_dog_id";

/// Supplies the initial pet list when the store starts.
pub trait PetSource: Send + Sync {
    /// Fetch the full pet list. No pagination, no incremental updates.
    fn fetch_initial_pets(&self) -> impl Future<Output = Result<Vec<Pet>>> + Send;
}

/// Persistent string key-value storage.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key was never written.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<()>> + Send;
}
