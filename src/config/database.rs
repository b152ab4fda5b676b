//! Database configuration module for the pet pantry.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! The only table is `system_state`, which backs the key-value storage the pet
//! store uses to remember the last viewed pet. The schema is generated from the
//! entity definition with `Schema::create_table_from_entity`, so no SQL is
//! written by hand.

use crate::entities::SystemState;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::info;

/// Default database location when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/pet_pantry.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the given database URL.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    info!("Connecting to database at {}", database_url);
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates the `system_state` table if it does not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut system_state_table = schema.create_table_from_entity(SystemState);
    system_state_table.if_not_exists();

    db.execute(builder.build(&system_state_table)).await?;

    Ok(())
}
