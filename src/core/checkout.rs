//! Checkout business logic
//!
//! Prices subscription packages for a pet. A package scales the pet's
//! delivery size by a weight multiplier and the base price by a (discounted)
//! price multiplier. All data is static.

use crate::models::Pet;

/// Base price per kg of food, in yuan.
pub const UNIT_PRICE_PER_KG: f64 = 60.0;

/// Package used when none (or an unknown one) is requested.
pub const DEFAULT_PACKAGE_ID: &str = "pkg_month";

/// Vegetable share shown in the ingredient breakdown, fixed for all recipes.
pub const VEGETABLE_PERCENTAGE: u8 = 25;

/// Meat share assumed for a pet without a recipe.
pub const FALLBACK_MEAT_PERCENTAGE: u8 = 65;

/// A subscription size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Package {
    pub id: &'static str,
    pub name: &'static str,
    /// How long the package lasts
    pub duration_days: u32,
    /// Delivered weight relative to the pet's monthly delivery
    pub weight_multiplier: f64,
    /// Price relative to the pet's monthly price
    pub price_multiplier: f64,
    /// Optional badge
    pub tag: Option<&'static str>,
}

/// Packages in display order.
pub static PACKAGES: [Package; 3] = [
    Package {
        id: "pkg_2week",
        name: "Two-Week Trial",
        duration_days: 14,
        weight_multiplier: 0.5,
        price_multiplier: 0.55,
        tag: None,
    },
    Package {
        id: "pkg_month",
        name: "Monthly Standard",
        duration_days: 30,
        weight_multiplier: 1.0,
        price_multiplier: 1.0,
        tag: Some("Recommended"),
    },
    Package {
        id: "pkg_quarter",
        name: "Quarterly Stock-Up",
        duration_days: 90,
        weight_multiplier: 3.0,
        price_multiplier: 2.7,
        tag: Some("Save 10%"),
    },
];

/// Finds a package by id, falling back to [`DEFAULT_PACKAGE_ID`].
#[must_use]
pub fn find_package(package_id: &str) -> &'static Package {
    PACKAGES
        .iter()
        .find(|p| p.id == package_id)
        .unwrap_or(&PACKAGES[1])
}

/// Weight and price of one package for one pet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub package: &'static Package,
    /// Delivered food in kg
    pub weight_kg: f64,
    /// Price in whole yuan
    pub price: u32,
}

/// Quotes `package_id` for `pet`.
///
/// Weight is the pet's delivery size times the weight multiplier; price is
/// the delivery size at [`UNIT_PRICE_PER_KG`] times the price multiplier,
/// rounded to whole yuan.
#[must_use]
pub fn quote(pet: &Pet, package_id: &str) -> Quote {
    let package = find_package(package_id);
    let weight_kg = pet.total_food_weight * package.weight_multiplier;
    let raw_price = (pet.total_food_weight * UNIT_PRICE_PER_KG * package.price_multiplier).round();
    // Negative weights are not meaningful; saturate at zero.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let price = raw_price.max(0.0) as u32;

    Quote {
        package,
        weight_kg,
        price,
    }
}

/// Quotes every package for `pet`, in display order.
#[must_use]
pub fn quote_all(pet: &Pet) -> Vec<Quote> {
    PACKAGES.iter().map(|p| quote(pet, p.id)).collect()
}

/// Share of meat, vegetables and micronutrients in the pet's food.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientBreakdown {
    pub meat: u8,
    pub vegetable: u8,
    pub micronutrients: u8,
}

/// Breaks the pet's recipe down for display.
///
/// Meat comes from the recipe ([`FALLBACK_MEAT_PERCENTAGE`] without one, or
/// when the recipe lists no meat share), vegetables are fixed, micronutrients
/// take the remainder (never negative).
#[must_use]
pub fn ingredient_breakdown(pet: &Pet) -> IngredientBreakdown {
    let meat = pet
        .recipe
        .as_ref()
        .map(|r| r.meat_percentage)
        .filter(|&m| m > 0)
        .unwrap_or(FALLBACK_MEAT_PERCENTAGE);

    IngredientBreakdown {
        meat,
        vegetable: VEGETABLE_PERCENTAGE,
        micronutrients: 100u8.saturating_sub(meat).saturating_sub(VEGETABLE_PERCENTAGE),
    }
}

/// Everything the order confirmation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub pet_id: String,
    pub pet_name: String,
    pub quote: Quote,
}

impl OrderSummary {
    /// One-line description, e.g. `"Biscuit: Monthly Standard, 5.0kg, ¥300"`.
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "{}: {}, {:.1}kg, ¥{}",
            self.pet_name, self.quote.package.name, self.quote.weight_kg, self.quote.price
        )
    }
}

/// Builds the order summary for `pet` and `package_id`.
#[must_use]
pub fn summarize_order(pet: &Pet, package_id: &str) -> OrderSummary {
    OrderSummary {
        pet_id: pet.id.clone(),
        pet_name: pet.name.clone(),
        quote: quote(pet, package_id),
    }
}
