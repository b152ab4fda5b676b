//! Pet profile forms - adding a pet and editing its profile.
//!
//! Form input arrives as loosely typed text; this module validates it and
//! produces fully formed [`Pet`] records for the store.

use crate::{
    errors::{Error, Result},
    models::{Pet, PetStatus},
};

/// Entries meaning "no allergies" that are dropped from allergen input.
const NO_ALLERGY_MARKERS: [&str; 2] = ["无", "无过敏"];

/// Splits free-form allergen input into labels.
///
/// Commas (ASCII or full-width) and whitespace separate entries. Empty
/// entries and "none" markers are dropped; everything else is kept verbatim.
#[must_use]
pub fn parse_allergens(input: &str) -> Vec<String> {
    input
        .split(|c: char| c == ',' || c == '，' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|s| !NO_ALLERGY_MARKERS.contains(s) && !s.eq_ignore_ascii_case("none"))
        .map(ToString::to_string)
        .collect()
}

/// Joins allergen labels back into a single input string.
#[must_use]
pub fn format_allergens(allergens: &[String]) -> String {
    allergens.join("，")
}

/// Input from the add-pet form.
#[derive(Debug, Clone, Default)]
pub struct NewPetForm {
    pub name: String,
    pub breed: String,
    /// Required
    pub current_weight: Option<f64>,
    /// Defaults to 0 when absent
    pub age: Option<f64>,
    pub is_neutered: bool,
    /// Raw allergen text, see [`parse_allergens`]
    pub allergens: String,
}

/// Input from the edit-profile form.
#[derive(Debug, Clone, Default)]
pub struct ProfileEdit {
    pub name: String,
    /// May be left empty
    pub breed: String,
    /// Required
    pub current_weight: Option<f64>,
    /// Defaults to 0 when absent
    pub age: Option<f64>,
    pub is_neutered: bool,
    /// Raw allergen text, see [`parse_allergens`]
    pub allergens: String,
}

fn require_text(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation {
            message: format!("{field} cannot be empty"),
        });
    }
    Ok(trimmed.to_string())
}

fn require_weight(weight: Option<f64>) -> Result<f64> {
    match weight {
        Some(w) if w.is_finite() && w > 0.0 => Ok(w),
        Some(w) => Err(Error::Validation {
            message: format!("Weight must be a positive number of kg, got {w}"),
        }),
        None => Err(Error::Validation {
            message: "Weight is required".to_string(),
        }),
    }
}

/// Builds a new pet from the add-pet form.
///
/// The pet gets id `d_<stamp>`, a placeholder avatar, no recipe and no food,
/// so it starts at zero inventory until a plan is adopted.
pub fn build_new_pet(form: &NewPetForm, stamp: i64) -> Result<Pet> {
    let name = require_text(&form.name, "Name")?;
    let breed = require_text(&form.breed, "Breed")?;
    let current_weight = require_weight(form.current_weight)?;
    let id = format!("d_{stamp}");

    Ok(Pet {
        avatar_url: format!("https://picsum.photos/seed/{id}/200/200"),
        id,
        name,
        breed,
        age: form.age.unwrap_or(0.0),
        current_weight,
        is_neutered: form.is_neutered,
        allergens: parse_allergens(&form.allergens),
        total_food_weight: 0.0,
        remaining_food_weight: 0.0,
        inventory_days: 0,
        status: PetStatus::Active,
        recipe: None,
    })
}

/// Pre-fills the edit form from a stored pet.
#[must_use]
pub fn edit_form_for(pet: &Pet) -> ProfileEdit {
    ProfileEdit {
        name: pet.name.clone(),
        breed: pet.breed.clone(),
        current_weight: Some(pet.current_weight),
        age: Some(pet.age),
        is_neutered: pet.is_neutered,
        allergens: format_allergens(&pet.allergens),
    }
}

/// Applies an edit to `existing`, keeping id, avatar, recipe, inventory and
/// status.
pub fn apply_profile_edit(existing: &Pet, edit: &ProfileEdit) -> Result<Pet> {
    let name = require_text(&edit.name, "Name")?;
    let current_weight = require_weight(edit.current_weight)?;

    Ok(Pet {
        name,
        breed: edit.breed.trim().to_string(),
        current_weight,
        age: edit.age.unwrap_or(0.0),
        is_neutered: edit.is_neutered,
        allergens: parse_allergens(&edit.allergens),
        ..existing.clone()
    })
}
