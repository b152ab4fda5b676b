//! Recipe business logic - plan customization.
//!
//! Generates the two formula options offered for a pet from its profile, and
//! attaches the chosen one. Generation is rule based: a chicken allergy swaps
//! the recommended formula to fish, and puppies get a higher meat share.

use crate::{
    core::{
        ports::KeyValueStore,
        store::{MutationOutcome, PetStore},
    },
    models::{Pet, Recipe},
};
use chrono::NaiveDate;
use tracing::info;

/// Meat share of the recommended formula for dogs under one year.
pub const PUPPY_MEAT_PERCENTAGE: u8 = 82;

/// Meat share of the recommended formula for adult dogs.
pub const ADULT_MEAT_PERCENTAGE: u8 = 75;

/// Meat share of the alternative beef formula.
pub const BEEF_MEAT_PERCENTAGE: u8 = 78;

/// Target delivery size set when a recipe is adopted, in kg.
pub const DEFAULT_ORDER_WEIGHT_KG: f64 = 5.0;

/// The two formulas offered at the end of plan customization.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeOptions {
    /// Formula tailored to the pet's allergies and age
    pub recommended: Recipe,
    /// Fixed grass-fed beef formula
    pub alternative: Recipe,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// True when any allergen mentions chicken.
#[must_use]
pub fn has_chicken_allergy(pet: &Pet) -> bool {
    pet.allergens
        .iter()
        .any(|a| a.contains('鸡') || a.to_lowercase().contains("chicken"))
}

/// True for dogs younger than one year.
#[must_use]
pub fn is_puppy(pet: &Pet) -> bool {
    pet.age < 1.0
}

/// Builds both recipe options for `pet`.
///
/// `stamp` makes the ids unique (`r_<stamp>_A`, `r_<stamp>_B`); `today` is
/// recorded as the last update date.
#[must_use]
pub fn generate_recipe_options(pet: &Pet, stamp: i64, today: NaiveDate) -> RecipeOptions {
    let meat_percentage = if is_puppy(pet) {
        PUPPY_MEAT_PERCENTAGE
    } else {
        ADULT_MEAT_PERCENTAGE
    };

    let recommended = if has_chicken_allergy(pet) {
        Recipe {
            id: format!("r_{stamp}_A"),
            dog_id: pet.id.clone(),
            name: "Deep Sea Fish Formula".to_string(),
            tags: strings(&["low allergen", "glossy coat", "grain free"]),
            meat_percentage,
            ingredients: strings(&["salmon", "tuna", "sweet potato", "pumpkin", "fish oil"]),
            last_updated: today,
        }
    } else {
        Recipe {
            id: format!("r_{stamp}_A"),
            dog_id: pet.id.clone(),
            name: "Fresh Chicken Vitality Formula".to_string(),
            tags: strings(&["high protein", "easy digestion", "strength"]),
            meat_percentage,
            ingredients: strings(&[
                "chicken breast",
                "chicken liver",
                "oats",
                "carrot",
                "egg yolk",
            ]),
            last_updated: today,
        }
    };

    let alternative = Recipe {
        id: format!("r_{stamp}_B"),
        dog_id: pet.id.clone(),
        name: "Grass-Fed Beef Bone Formula".to_string(),
        tags: strings(&["strong bones", "high energy"]),
        meat_percentage: BEEF_MEAT_PERCENTAGE,
        ingredients: strings(&[
            "beef",
            "beef heart",
            "broccoli",
            "purple sweet potato",
            "bone meal",
        ]),
        last_updated: today,
    };

    RecipeOptions {
        recommended,
        alternative,
    }
}

/// The allergens the recommended formula avoids, if the allergy rule applied.
#[must_use]
pub fn allergen_exclusion_note(pet: &Pet) -> Option<String> {
    has_chicken_allergy(pet).then(|| pet.allergens.join(", "))
}

/// Returns `pet` with `recipe` attached and inventory reset for a first order.
///
/// The pet has no food of the new recipe yet, so inventory days and remaining
/// weight drop to zero and the delivery size is set to
/// [`DEFAULT_ORDER_WEIGHT_KG`].
#[must_use]
pub fn with_recipe(pet: &Pet, recipe: Recipe) -> Pet {
    Pet {
        recipe: Some(recipe),
        inventory_days: 0,
        total_food_weight: DEFAULT_ORDER_WEIGHT_KG,
        remaining_food_weight: 0.0,
        ..pet.clone()
    }
}

/// Attaches `recipe` to the stored pet with `pet_id`.
///
/// The pet is read and replaced under one store lock, so edits made
/// concurrently are not lost. Returns [`MutationOutcome::NotFound`] when the
/// store has no such pet.
pub async fn adopt_recipe<K: KeyValueStore>(
    store: &PetStore<K>,
    pet_id: &str,
    recipe: Recipe,
) -> MutationOutcome {
    let name = recipe.name.clone();
    let outcome = store
        .modify_pet(pet_id, |pet| with_recipe(pet, recipe))
        .await;
    if outcome.is_applied() {
        info!("Adopted recipe '{}' for pet {}", name, pet_id);
    }
    outcome
}
