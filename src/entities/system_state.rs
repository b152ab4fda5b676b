//! System state entity - Stores key-value pairs that outlive a session.
//! The pet store keeps the last viewed pet id here so the selection survives
//! restarts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// System state database model - stores key-value pairs
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "system_state")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Storage key (e.g., `"last_viewed_dog_id"`)
    #[sea_orm(unique)]
    pub key: String,
    /// Stored value as string
    pub value: String,
    /// When this entry was last written
    pub updated_at: DateTime,
}

/// `SystemState` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
