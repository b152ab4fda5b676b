//! Entity module - Contains the SeaORM entity definitions for the database.
//! Only the key-value table is persisted; pets live in memory for the session.

pub mod system_state;

pub use system_state::{
    Column as SystemStateColumn, Entity as SystemState, Model as SystemStateModel,
};
