//! Domain records shared by the store, the business rules and the seed file.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a pet profile.
///
/// Nothing in the crate produces `Archived`; it exists so seeded data carrying
/// it round-trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    /// Shown in the switcher and eligible for selection
    #[default]
    Active,
    /// Retained for history only
    Archived,
}

/// A named formulation attached to a pet once plan customization completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier (e.g. `"r_1700000000000_A"`)
    pub id: String,
    /// Id of the pet this recipe was generated for. Never validated.
    pub dog_id: String,
    /// Display name of the formula
    pub name: String,
    /// Ordered marketing tags
    pub tags: Vec<String>,
    /// Share of meat in the formula, 0-100
    pub meat_percentage: u8,
    /// Ordered ingredient list
    pub ingredients: Vec<String>,
    /// Date the recipe was generated or last changed
    pub last_updated: NaiveDate,
}

/// A tracked animal profile with feeding and health attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    /// Unique, immutable identifier (e.g. `"d_001"`)
    pub id: String,
    pub name: String,
    pub breed: String,
    /// Age in years; fractional for young animals
    pub age: f64,
    /// Body weight in kg
    pub current_weight: f64,
    pub is_neutered: bool,
    /// Free-form allergen labels, kept exactly as entered
    #[serde(default)]
    pub allergens: Vec<String>,
    pub avatar_url: String,
    /// Size of the last food delivery in kg
    #[serde(default)]
    pub total_food_weight: f64,
    /// Food left from the last delivery in kg
    #[serde(default)]
    pub remaining_food_weight: f64,
    /// Estimated days of food left. Caller-supplied; never derived from the weights.
    #[serde(default)]
    pub inventory_days: u32,
    #[serde(default)]
    pub status: PetStatus,
    /// Present once a plan customization has been adopted
    #[serde(default)]
    pub recipe: Option<Recipe>,
}

/// The account holder. Seeded once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub mobile: String,
}
