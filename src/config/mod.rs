/// Database configuration and connection management
pub mod database;

/// Seed data loading from seed.toml
pub mod seed;

/// Environment-driven application settings
pub mod settings;
