/// Database configuration and connection management
pub mod database;

/// Budget settings loading from config.toml
pub mod settings;
