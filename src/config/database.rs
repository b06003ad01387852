//! Database configuration module for `HostelBuddy`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! It provides functions for establishing database connections and creating all necessary
//! tables based on the entity definitions. The module uses `SeaORM`'s
//! `Schema::create_table_from_entity` method to automatically generate SQL statements
//! from the entity models, so the database schema matches the Rust struct definitions
//! without requiring manual SQL.

use crate::entities::{Notification, Payment, Resident, Room};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/hostel_buddy.sqlite".to_string())
}

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL` environment variable.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url())
        .await
        .map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from entity definitions.
///
/// Creates tables for residents, rooms, payments, and notifications.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let resident_table = schema.create_table_from_entity(Resident);
    let room_table = schema.create_table_from_entity(Room);
    let payment_table = schema.create_table_from_entity(Payment);
    let notification_table = schema.create_table_from_entity(Notification);

    db.execute(builder.build(&resident_table)).await?;
    db.execute(builder.build(&room_table)).await?;
    db.execute(builder.build(&payment_table)).await?;
    db.execute(builder.build(&notification_table)).await?;

    Ok(())
}
