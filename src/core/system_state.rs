//! Key-value storage backed by the `system_state` table.
//!
//! Rows are keyed by `key`; writing an existing key updates its value and
//! timestamp in place, writing a new key inserts a row.

use crate::{
    core::ports::KeyValueStore,
    entities::{SystemState, system_state},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{Set, prelude::*};
use tracing::trace;

/// [`KeyValueStore`] over a `SeaORM` connection.
#[derive(Debug, Clone)]
pub struct SystemStateStore {
    db: DatabaseConnection,
}

impl SystemStateStore {
    /// Wraps an open connection. The `system_state` table must already exist.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Retrieves the value stored under `key`.
pub async fn get_value<C>(db: &C, key: &str) -> Result<Option<String>>
where
    C: ConnectionTrait,
{
    let state = SystemState::find()
        .filter(system_state::Column::Key.eq(key))
        .one(db)
        .await?;

    Ok(state.map(|s| s.value))
}

/// Stores `value` under `key`, updating the row if the key already exists.
pub async fn set_value<C>(db: &C, key: &str, value: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let now = Utc::now().naive_utc();

    let existing = SystemState::find()
        .filter(system_state::Column::Key.eq(key))
        .one(db)
        .await?;

    if let Some(state) = existing {
        let mut active_model: system_state::ActiveModel = state.into();
        active_model.value = Set(value.to_string());
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        let new_state = system_state::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            updated_at: Set(now),
            ..Default::default()
        };
        new_state.insert(db).await?;
    }

    trace!("system_state[{}] = {}", key, value);
    Ok(())
}

impl KeyValueStore for SystemStateStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        get_value(&self.db, key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        set_value(&self.db, key, value).await
    }
}
