//! Room business logic - creation, lookups, edits, and maintenance flagging.
//!
//! Occupancy changes never happen here; assignment and deletion go through
//! the allocation module so the occupancy bookkeeping stays in one place.

use crate::{
    entities::{Room, room},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, QueryOrder, Set, prelude::*};

/// Retrieves all active (non-deleted) rooms, ordered by room number.
pub async fn get_all_active_rooms(db: &DatabaseConnection) -> Result<Vec<room::Model>> {
    Room::find()
        .filter(room::Column::IsActive.eq(true))
        .order_by_asc(room::Column::RoomNumber)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a room by internal id, returning None if not found or inactive.
pub async fn get_room_by_id<C>(db: &C, room_id: i64) -> Result<Option<room::Model>>
where
    C: ConnectionTrait,
{
    Room::find_by_id(room_id)
        .filter(room::Column::IsActive.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a room by internal id or fails with `RoomNotFound`.
pub async fn require_room<C>(db: &C, room_id: i64) -> Result<room::Model>
where
    C: ConnectionTrait,
{
    get_room_by_id(db, room_id)
        .await?
        .ok_or_else(|| Error::RoomNotFound {
            room: room_id.to_string(),
        })
}

/// Finds a room by its human-facing room number.
pub async fn get_room_by_number<C>(db: &C, room_number: &str) -> Result<Option<room::Model>>
where
    C: ConnectionTrait,
{
    Room::find()
        .filter(room::Column::RoomNumber.eq(room_number))
        .filter(room::Column::IsActive.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new room with the specified parameters, performing input validation.
///
/// Validates that the room number is non-empty and unique, and that capacity
/// and price are positive. New rooms start empty and `available`.
pub async fn create_room(
    db: &DatabaseConnection,
    room_number: String,
    floor: i32,
    room_type: String,
    price: f64,
    capacity: i32,
) -> Result<room::Model> {
    // Validate inputs
    if room_number.trim().is_empty() {
        return Err(Error::Validation {
            message: "Room number cannot be empty".to_string(),
        });
    }

    if capacity < 1 {
        return Err(Error::Validation {
            message: format!("Room capacity must be at least 1, got {capacity}"),
        });
    }

    if !price.is_finite() || price < 0.0 {
        return Err(Error::Validation {
            message: format!("Room price must be a non-negative number, got {price}"),
        });
    }

    if get_room_by_number(db, room_number.trim()).await?.is_some() {
        return Err(Error::Conflict {
            message: format!("Room {} already exists", room_number.trim()),
        });
    }

    let new_room = room::ActiveModel {
        room_number: Set(room_number.trim().to_string()),
        floor: Set(floor),
        room_type: Set(room_type),
        price: Set(price),
        capacity: Set(capacity),
        current_occupancy: Set(0),
        status: Set(room::RoomStatus::Available),
        is_active: Set(true),
        ..Default::default()
    };

    let result = new_room.insert(db).await?;
    Ok(result)
}

/// Updates a room's rent price and/or type label.
///
/// Capacity edits are deliberately not supported here; shrinking a room under
/// its occupants would break the occupancy invariant.
pub async fn update_room(
    db: &DatabaseConnection,
    room_id: i64,
    price: Option<f64>,
    room_type: Option<String>,
) -> Result<room::Model> {
    let existing = require_room(db, room_id).await?;

    if let Some(p) = price {
        if !p.is_finite() || p < 0.0 {
            return Err(Error::Validation {
                message: format!("Room price must be a non-negative number, got {p}"),
            });
        }
    }

    let mut active: room::ActiveModel = existing.into();
    if let Some(p) = price {
        active.price = Set(p);
    }
    if let Some(t) = room_type {
        active.room_type = Set(t);
    }

    active.update(db).await.map_err(Into::into)
}

/// Flags a room as under maintenance.
///
/// Maintenance sticks until explicitly cleared; occupancy changes in the
/// meantime do not overwrite it.
pub async fn set_maintenance(db: &DatabaseConnection, room_id: i64) -> Result<room::Model> {
    let existing = require_room(db, room_id).await?;

    let mut active: room::ActiveModel = existing.into();
    active.status = Set(room::RoomStatus::Maintenance);
    active.update(db).await.map_err(Into::into)
}

/// Clears the maintenance flag, re-deriving status from occupancy.
pub async fn clear_maintenance(db: &DatabaseConnection, room_id: i64) -> Result<room::Model> {
    let existing = require_room(db, room_id).await?;

    let derived = if existing.current_occupancy >= existing.capacity {
        room::RoomStatus::Occupied
    } else {
        room::RoomStatus::Available
    };

    let mut active: room::ActiveModel = existing.into();
    active.status = Set(derived);
    active.update(db).await.map_err(Into::into)
}
