/// Database configuration and connection management
pub mod database;

/// Room inventory configuration loading from config.toml
pub mod rooms;
