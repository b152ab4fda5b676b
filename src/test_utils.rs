//! Shared test utilities for the pet pantry.
//!
//! This module provides common helpers for setting up test databases, building
//! pets with sensible defaults, and fake collaborators that always fail.

#![allow(clippy::unwrap_used)]

use crate::{
    config::database,
    core::{
        ports::{KeyValueStore, PetSource},
        source::MockPetSource,
        store::PetStore,
        system_state::SystemStateStore,
    },
    errors::{Error, Result},
    models::{Pet, PetStatus, Recipe, User},
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly tracing subscriber once per process.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all storage-backed tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = database::create_connection("sqlite::memory:").await?;
    database::create_tables(&db).await?;
    Ok(db)
}

/// The account holder used across tests.
pub fn sample_user() -> User {
    User {
        id: "u_001".to_string(),
        name: "Pet Lover".to_string(),
        mobile: "13800000000".to_string(),
    }
}

/// Creates a pet with sensible defaults.
///
/// # Defaults
/// * `breed`: "Mixed"
/// * `age`: 3 years, `current_weight`: 10 kg, neutered
/// * no allergens, no recipe
/// * 5 kg delivered, 1 kg left
pub fn sample_pet(id: &str, name: &str, inventory_days: u32) -> Pet {
    Pet {
        id: id.to_string(),
        name: name.to_string(),
        breed: "Mixed".to_string(),
        age: 3.0,
        current_weight: 10.0,
        is_neutered: true,
        allergens: Vec::new(),
        avatar_url: format!("https://picsum.photos/seed/{id}/200/200"),
        total_food_weight: 5.0,
        remaining_food_weight: 1.0,
        inventory_days,
        status: PetStatus::Active,
        recipe: None,
    }
}

/// Shorthand for a pet where only id and inventory matter.
pub fn pet_with_inventory(id: &str, inventory_days: u32) -> Pet {
    sample_pet(id, id, inventory_days)
}

/// A recipe with sensible defaults for `dog_id`.
pub fn sample_recipe(id: &str, dog_id: &str, meat_percentage: u8) -> Recipe {
    Recipe {
        id: id.to_string(),
        dog_id: dog_id.to_string(),
        name: "Adult Complete Formula".to_string(),
        tags: vec!["glossy coat".to_string(), "strong bones".to_string()],
        meat_percentage,
        ingredients: vec![
            "chicken".to_string(),
            "fish oil".to_string(),
            "pumpkin".to_string(),
        ],
        last_updated: NaiveDate::from_ymd_opt(2023, 10, 1).unwrap(),
    }
}

/// Three pets with inventory days `[3, 14, 8]`.
///
/// `d_002` is allergic to chicken and grain; `d_003` is a one year old.
pub fn sample_pets() -> Vec<Pet> {
    let mut biscuit = sample_pet("d_001", "Biscuit", 3);
    biscuit.breed = "Golden Retriever".to_string();
    biscuit.current_weight = 12.5;
    biscuit.remaining_food_weight = 0.6;
    biscuit.recipe = Some(sample_recipe("r_001", "d_001", 78));

    let mut maple = sample_pet("d_002", "Maple", 14);
    maple.breed = "Labrador".to_string();
    maple.age = 5.0;
    maple.current_weight = 24.0;
    maple.allergens = vec!["chicken".to_string(), "grain".to_string()];
    maple.total_food_weight = 10.0;
    maple.remaining_food_weight = 4.5;

    let mut pudding = sample_pet("d_003", "Pudding", 8);
    pudding.breed = "Poodle".to_string();
    pudding.age = 1.0;
    pudding.current_weight = 4.2;
    pudding.is_neutered = false;
    pudding.total_food_weight = 2.0;
    pudding.remaining_food_weight = 0.8;

    vec![biscuit, maple, pudding]
}

/// A store backed by a fresh in-memory database, still loading.
pub async fn setup_store() -> Result<PetStore<SystemStateStore>> {
    let db = setup_test_db().await?;
    Ok(PetStore::new(sample_user(), SystemStateStore::new(db)))
}

/// A store that has finished initializing with `pets`.
pub async fn setup_ready_store(pets: Vec<Pet>) -> Result<PetStore<SystemStateStore>> {
    let store = setup_store().await?;
    store.initialize(&MockPetSource::immediate(pets)).await?;
    Ok(store)
}

/// Key-value storage whose every call fails.
#[derive(Debug, Clone, Copy)]
pub struct FailingKeyValueStore;

impl KeyValueStore for FailingKeyValueStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(Error::Io(std::io::Error::other("storage unavailable")))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(Error::Io(std::io::Error::other("storage unavailable")))
    }
}

/// Pet source whose fetch always fails.
#[derive(Debug, Clone, Copy)]
pub struct FailingPetSource;

impl PetSource for FailingPetSource {
    async fn fetch_initial_pets(&self) -> Result<Vec<Pet>> {
        Err(Error::Fetch {
            message: "network unreachable".to_string(),
        })
    }
}
