//! Shared test utilities for `HostelBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    entities::{payment::PaymentStatus, resident, room},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test room with sensible defaults.
///
/// # Defaults
/// * `floor`: 1
/// * `room_type`: "double"
/// * `price`: 8000.0
/// * `capacity`: 2
pub async fn create_test_room(db: &DatabaseConnection, room_number: &str) -> Result<room::Model> {
    crate::core::room::create_room(
        db,
        room_number.to_string(),
        1,
        "double".to_string(),
        8000.0,
        2,
    )
    .await
}

/// Creates a test room with custom parameters.
/// Use this when you need a specific floor, price, or capacity.
pub async fn create_custom_room(
    db: &DatabaseConnection,
    room_number: &str,
    floor: i32,
    room_type: &str,
    price: f64,
    capacity: i32,
) -> Result<room::Model> {
    crate::core::room::create_room(
        db,
        room_number.to_string(),
        floor,
        room_type.to_string(),
        price,
        capacity,
    )
    .await
}

/// Creates a test resident in the `Pending` registration state.
///
/// Inserts the row directly so tests that count notifications are not
/// polluted by the acknowledgement a real submission records.
pub async fn create_test_resident(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
) -> Result<resident::Model> {
    let new_resident = resident::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        phone: Set("9000000000".to_string()),
        role: Set(resident::Role::User),
        registration_status: Set(resident::RegistrationStatus::Pending),
        is_active: Set(true),
        is_deleted: Set(false),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    new_resident.insert(db).await.map_err(Into::into)
}

/// Sets up a database with one default room.
/// Returns (db, room) for common allocation scenarios.
pub async fn setup_with_room() -> Result<(DatabaseConnection, room::Model)> {
    let db = setup_test_db().await?;
    let room = create_test_room(&db, "101").await?;
    Ok((db, room))
}

/// Sets up a resident already assigned to a room at the given price.
/// Returns (db, resident, room) for payment-derivation scenarios.
pub async fn setup_housed_resident(
    price: f64,
) -> Result<(DatabaseConnection, resident::Model, room::Model)> {
    let db = setup_test_db().await?;
    let room = create_custom_room(&db, "101", 1, "double", price, 2).await?;
    let pending = create_test_resident(&db, "Test Resident", "resident@example.com").await?;
    let housed = crate::core::allocation::assign_resident(&db, pending.id, room.id, None).await?;
    Ok((db, housed, room))
}

/// Records a settled, non-deposit cash payment covering one month.
pub async fn record_test_payment(
    db: &DatabaseConnection,
    resident_id: i64,
    amount: f64,
    month: &str,
) -> Result<crate::entities::payment::Model> {
    crate::core::payment::record_payment(
        db,
        resident_id,
        amount,
        vec![month.to_string()],
        PaymentStatus::Paid,
        false,
        "Cash".to_string(),
    )
    .await
}

/// A `Paid` cash initial payment for April 2025, used by confirmation tests.
#[must_use]
pub fn test_initial_payment() -> crate::core::registration::InitialPayment {
    crate::core::registration::InitialPayment {
        amount: 5000.0,
        month: "April 2025".to_string(),
        payment_method: "Cash".to_string(),
        payment_status: PaymentStatus::Paid,
    }
}
