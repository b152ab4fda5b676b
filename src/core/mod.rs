//! Core business logic - the pet store and the rules around it.
//!
//! Nothing in here knows about screens or routing; callers drive the store
//! and format the structured results themselves.

/// Subscription packages and price quotes
pub mod checkout;
/// Feeding status and food-weight breakdown
pub mod inventory;
/// Collaborator traits for the store
pub mod ports;
/// Add/edit pet form handling
pub mod profile;
/// Recipe option generation and adoption
pub mod recipe;
/// Initial selection and lookup rules
pub mod selection;
/// Seed-backed mock data source
pub mod source;
/// The pet collection store
pub mod store;
/// Key-value storage over the `system_state` table
pub mod system_state;
