//! Mock data source that answers the startup fetch from seed data.

use crate::{core::ports::PetSource, errors::Result, models::Pet};
use std::time::Duration;
use tracing::debug;

/// [`PetSource`] serving a fixed pet list after a simulated network delay.
#[derive(Debug, Clone)]
pub struct MockPetSource {
    pets: Vec<Pet>,
    latency: Duration,
}

impl MockPetSource {
    /// Creates a source that returns `pets` after `latency`.
    #[must_use]
    pub const fn new(pets: Vec<Pet>, latency: Duration) -> Self {
        Self { pets, latency }
    }

    /// Creates a source that answers without delay.
    #[must_use]
    pub const fn immediate(pets: Vec<Pet>) -> Self {
        Self::new(pets, Duration::ZERO)
    }
}

impl PetSource for MockPetSource {
    async fn fetch_initial_pets(&self) -> Result<Vec<Pet>> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        debug!("Mock source returning {} pets", self.pets.len());
        Ok(self.pets.clone())
    }
}
