//! Selection rules for the pet store.
//!
//! Both functions are pure so the store can recompute the current pet on every
//! read instead of caching a pointer that goes stale when the list changes.

use crate::models::Pet;

/// Picks the pet to focus on when the store finishes loading.
///
/// A persisted id wins if it still names a pet in `pets`. Otherwise the pet
/// with the fewest inventory days is chosen, since it is the one closest to
/// running out of food; ties go to the earliest pet in the list. Returns
/// `None` only for an empty list.
#[must_use]
pub fn resolve_initial_selection(pets: &[Pet], persisted: Option<&str>) -> Option<String> {
    if let Some(saved) = persisted
        && pets.iter().any(|p| p.id == saved)
    {
        return Some(saved.to_string());
    }

    // `min_by_key` keeps the first of several equal minimums.
    pets.iter()
        .min_by_key(|p| p.inventory_days)
        .map(|p| p.id.clone())
}

/// Finds the pet with `selected_id`, first match wins.
#[must_use]
pub fn lookup<'a>(selected_id: Option<&str>, pets: &'a [Pet]) -> Option<&'a Pet> {
    let id = selected_id?;
    pets.iter().find(|p| p.id == id)
}
