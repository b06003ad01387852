//! Resident lookup logic.
//!
//! Read-side helpers for finding residents. All lookups exclude soft-deleted
//! rows unless stated otherwise; mutation lives in the allocation and
//! registration modules.

use crate::{
    entities::{Resident, resident},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, QueryOrder, prelude::*};

/// Retrieves all active (non-deleted) residents, ordered alphabetically by name.
pub async fn get_all_active_residents(db: &DatabaseConnection) -> Result<Vec<resident::Model>> {
    Resident::find()
        .filter(resident::Column::IsDeleted.eq(false))
        .order_by_asc(resident::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a resident by internal id, returning None if not found or deleted.
pub async fn get_resident_by_id<C>(db: &C, resident_id: i64) -> Result<Option<resident::Model>>
where
    C: ConnectionTrait,
{
    Resident::find_by_id(resident_id)
        .filter(resident::Column::IsDeleted.eq(false))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a resident by internal id or fails with `ResidentNotFound`.
pub async fn require_resident<C>(db: &C, resident_id: i64) -> Result<resident::Model>
where
    C: ConnectionTrait,
{
    get_resident_by_id(db, resident_id)
        .await?
        .ok_or_else(|| Error::ResidentNotFound {
            id: resident_id.to_string(),
        })
}

/// Finds a resident by email address.
pub async fn get_resident_by_email<C>(db: &C, email: &str) -> Result<Option<resident::Model>>
where
    C: ConnectionTrait,
{
    Resident::find()
        .filter(resident::Column::Email.eq(email))
        .filter(resident::Column::IsDeleted.eq(false))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a resident by their human-facing PG ID.
pub async fn get_resident_by_pg_id(
    db: &DatabaseConnection,
    pg_id: &str,
) -> Result<Option<resident::Model>> {
    Resident::find()
        .filter(resident::Column::PgId.eq(pg_id))
        .filter(resident::Column::IsDeleted.eq(false))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the active residents assigned to a room, ordered by bed number.
pub async fn get_residents_in_room<C>(db: &C, room_id: i64) -> Result<Vec<resident::Model>>
where
    C: ConnectionTrait,
{
    Resident::find()
        .filter(resident::Column::RoomId.eq(room_id))
        .filter(resident::Column::IsActive.eq(true))
        .filter(resident::Column::IsDeleted.eq(false))
        .order_by_asc(resident::Column::BedNumber)
        .all(db)
        .await
        .map_err(Into::into)
}
