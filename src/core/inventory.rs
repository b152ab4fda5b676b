//! Inventory business logic
//!
//! Turns the inventory fields of a pet into what the home screen shows: a
//! feeding status driving the low-food alert, and the remaining/consumed
//! split of the last delivery. `inventory_days` is taken as given; nothing
//! here reconciles it with the weight fields.

use crate::models::Pet;

/// Below this many days of food the pet is flagged as running low.
pub const LOW_INVENTORY_DAYS: u32 = 5;

/// Feeding status derived from a pet's inventory days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedingStatus {
    /// At least [`LOW_INVENTORY_DAYS`] days of food left
    Normal,
    /// Fewer than [`LOW_INVENTORY_DAYS`] days left
    Low,
    /// No food left
    Empty,
}

impl FeedingStatus {
    /// Classifies a pet by its inventory days.
    #[must_use]
    pub const fn for_pet(pet: &Pet) -> Self {
        match pet.inventory_days {
            0 => Self::Empty,
            d if d < LOW_INVENTORY_DAYS => Self::Low,
            _ => Self::Normal,
        }
    }

    /// True for the states that should prompt a reorder.
    #[must_use]
    pub const fn needs_reorder(self) -> bool {
        matches!(self, Self::Low | Self::Empty)
    }
}

/// True when the pet has fewer than [`LOW_INVENTORY_DAYS`] days of food.
#[must_use]
pub const fn is_low_inventory(pet: &Pet) -> bool {
    pet.inventory_days < LOW_INVENTORY_DAYS
}

/// Remaining and consumed food from the last delivery, in kg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodBreakdown {
    pub remaining_kg: f64,
    pub consumed_kg: f64,
}

/// Splits the last delivery into remaining and consumed food.
///
/// Consumed is clamped at zero because `remaining <= total` is not enforced.
#[must_use]
pub fn food_breakdown(pet: &Pet) -> FoodBreakdown {
    FoodBreakdown {
        remaining_kg: pet.remaining_food_weight,
        consumed_kg: (pet.total_food_weight - pet.remaining_food_weight).max(0.0),
    }
}
