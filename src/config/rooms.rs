//! Room inventory configuration loading from config.toml
//!
//! This module loads the initial room inventory from a TOML configuration
//! file. The rooms defined in config.toml are used to seed the database on
//! first run; rooms that already exist (by room number) are left untouched.

use crate::entities::{Room, room};
use crate::errors::{Error, Result};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// List of room configurations to seed
    pub rooms: Vec<RoomConfig>,
}

/// Configuration for a single room
#[derive(Debug, Deserialize, Clone)]
pub struct RoomConfig {
    /// Human-facing room number (e.g., "101")
    pub room_number: String,
    /// Floor the room is on
    pub floor: i32,
    /// Room type label (e.g., "single", "double")
    pub room_type: String,
    /// Monthly rent price per bed
    pub price: f64,
    /// Number of beds
    pub capacity: i32,
}

/// Loads room configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads room configuration from the default location (./config.toml)
pub fn load_default_config() -> Result<Config> {
    load_config("config.toml")
}

/// Seeds the database with rooms from configuration, skipping room numbers
/// that already exist.
pub async fn seed_rooms(db: &DatabaseConnection, config: &Config) -> Result<usize> {
    let mut created = 0;

    for room_config in &config.rooms {
        let existing = Room::find()
            .filter(room::Column::RoomNumber.eq(room_config.room_number.as_str()))
            .one(db)
            .await?;

        if existing.is_some() {
            continue;
        }

        crate::core::room::create_room(
            db,
            room_config.room_number.clone(),
            room_config.floor,
            room_config.room_type.clone(),
            room_config.price,
            room_config.capacity,
        )
        .await?;
        created += 1;
    }

    if created > 0 {
        info!("Seeded {created} room(s) from configuration");
    }

    Ok(created)
}
