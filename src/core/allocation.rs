//! Room/bed allocation logic - keeps occupancy bookkeeping consistent.
//!
//! Every mutation that touches a resident's room reference also adjusts the
//! room's `current_occupancy` and re-derives its status, inside a single
//! database transaction. Capacity is enforced by a conditional atomic
//! increment (`current_occupancy < capacity` in the UPDATE filter), so two
//! concurrent assignments racing for the last bed cannot both succeed - the
//! loser observes `RoomFull`.

use crate::{
    entities::{Resident, Room, resident, room, room::RoomStatus},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};

/// A derived per-room bed slot. Beds are not persisted; this is a projection
/// of active residents grouped by `bed_number`.
#[derive(Debug, Clone)]
pub struct BedSlot {
    /// Bed index within the room (1..=capacity)
    pub bed_number: i32,
    /// Whether an active resident holds this bed
    pub is_occupied: bool,
    /// The occupant, if any
    pub resident: Option<resident::Model>,
}

/// Derives a room's status from its occupancy.
///
/// An explicit `Maintenance` flag is sticky: it survives occupancy changes
/// until an admin clears it.
#[must_use]
pub const fn derive_status(occupancy: i32, capacity: i32, current: RoomStatus) -> RoomStatus {
    if matches!(current, RoomStatus::Maintenance) {
        RoomStatus::Maintenance
    } else if occupancy >= capacity {
        RoomStatus::Occupied
    } else {
        RoomStatus::Available
    }
}

/// Re-reads a room and persists its derived status if it changed.
async fn refresh_room_status<C>(db: &C, room_id: i64) -> Result<room::Model>
where
    C: ConnectionTrait,
{
    let current = crate::core::room::require_room(db, room_id).await?;
    let derived = derive_status(current.current_occupancy, current.capacity, current.status);

    if derived == current.status {
        return Ok(current);
    }

    let mut active: room::ActiveModel = current.into();
    active.status = Set(derived);
    active.update(db).await.map_err(Into::into)
}

/// Atomically claims one bed in the room: increments `current_occupancy`
/// only while it is below capacity. Zero rows affected means the room filled
/// up concurrently.
async fn try_reserve_slot<C>(db: &C, target: &room::Model) -> Result<()>
where
    C: ConnectionTrait,
{
    let update = Room::update_many()
        .col_expr(
            room::Column::CurrentOccupancy,
            Expr::col(room::Column::CurrentOccupancy).add(1),
        )
        .filter(room::Column::Id.eq(target.id))
        .filter(Expr::col(room::Column::CurrentOccupancy).lt(Expr::col(room::Column::Capacity)))
        .exec(db)
        .await?;

    if update.rows_affected == 0 {
        return Err(Error::RoomFull {
            room_number: target.room_number.clone(),
            capacity: target.capacity,
        });
    }

    Ok(())
}

/// Atomically releases one bed, floored at zero occupancy.
async fn release_slot<C>(db: &C, room_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    Room::update_many()
        .col_expr(
            room::Column::CurrentOccupancy,
            Expr::col(room::Column::CurrentOccupancy).sub(1),
        )
        .filter(room::Column::Id.eq(room_id))
        .filter(room::Column::CurrentOccupancy.gt(0))
        .exec(db)
        .await?;

    Ok(())
}

/// Picks the requested bed after checking it is free, or the lowest free bed
/// when none was requested.
async fn resolve_bed<C>(db: &C, target: &room::Model, requested: Option<i32>) -> Result<i32>
where
    C: ConnectionTrait,
{
    let occupants = crate::core::resident::get_residents_in_room(db, target.id).await?;
    let taken: Vec<i32> = occupants.iter().filter_map(|r| r.bed_number).collect();

    match requested {
        Some(bed) => {
            if bed < 1 || bed > target.capacity {
                return Err(Error::Validation {
                    message: format!(
                        "Bed {bed} is out of range for room {} (capacity {})",
                        target.room_number, target.capacity
                    ),
                });
            }
            if taken.contains(&bed) {
                return Err(Error::BedTaken {
                    room_number: target.room_number.clone(),
                    bed_number: bed,
                });
            }
            Ok(bed)
        }
        None => (1..=target.capacity)
            .find(|b| !taken.contains(b))
            .ok_or_else(|| Error::RoomFull {
                room_number: target.room_number.clone(),
                capacity: target.capacity,
            }),
    }
}

/// Places a resident into a room within an existing transaction.
///
/// `explicit_move_in` overrides the stored move-in date; otherwise an unset
/// date defaults to today. Used by [`assign_resident`], [`change_room`], and
/// the registration confirmation flow.
pub(crate) async fn assign_in<C>(
    db: &C,
    current: resident::Model,
    room_id: i64,
    bed_number: Option<i32>,
    explicit_move_in: Option<NaiveDate>,
) -> Result<resident::Model>
where
    C: ConnectionTrait,
{
    let target = crate::core::room::require_room(db, room_id).await?;

    try_reserve_slot(db, &target).await?;
    let bed = resolve_bed(db, &target, bed_number).await?;

    let move_in = explicit_move_in
        .or(current.move_in_date)
        .unwrap_or_else(|| Utc::now().date_naive());

    let mut active: resident::ActiveModel = current.into();
    active.room_id = Set(Some(room_id));
    active.bed_number = Set(Some(bed));
    active.move_in_date = Set(Some(move_in));
    let updated = active.update(db).await?;

    refresh_room_status(db, room_id).await?;

    Ok(updated)
}

/// Clears a resident's room reference within an existing transaction.
///
/// No-op (not an error) when the resident has no room.
pub(crate) async fn unassign_in<C>(db: &C, current: resident::Model) -> Result<resident::Model>
where
    C: ConnectionTrait,
{
    let Some(prior_room_id) = current.room_id else {
        return Ok(current);
    };

    let mut active: resident::ActiveModel = current.into();
    active.room_id = Set(None);
    active.bed_number = Set(None);
    let updated = active.update(db).await?;

    release_slot(db, prior_room_id).await?;
    refresh_room_status(db, prior_room_id).await?;

    Ok(updated)
}

/// Assigns a resident to a room, optionally to a specific bed.
///
/// Fails with `RoomFull` when the room is at capacity, `BedTaken` when the
/// requested bed is held by another active resident, and `Validation` when
/// the resident already has a room (moves go through [`change_room`]).
/// Either every effect persists or none does.
pub async fn assign_resident(
    db: &DatabaseConnection,
    resident_id: i64,
    room_id: i64,
    bed_number: Option<i32>,
) -> Result<resident::Model> {
    let txn = db.begin().await?;

    let current = crate::core::resident::require_resident(&txn, resident_id).await?;
    if current.room_id.is_some() {
        return Err(Error::Validation {
            message: format!("Resident {resident_id} already has a room; use a room change"),
        });
    }

    let updated = assign_in(&txn, current, room_id, bed_number, None).await?;

    txn.commit().await?;
    Ok(updated)
}

/// Moves a resident to a different room.
///
/// The new room must accept the resident before the old room is decremented,
/// so a failure partway leaves the resident exactly where they were. Fails
/// with `SameRoom` when the target is the resident's current room.
pub async fn change_room(
    db: &DatabaseConnection,
    resident_id: i64,
    new_room_id: i64,
    new_bed_number: Option<i32>,
) -> Result<resident::Model> {
    let txn = db.begin().await?;

    let current = crate::core::resident::require_resident(&txn, resident_id).await?;

    let Some(old_room_id) = current.room_id else {
        // Not currently housed; a move degenerates to a plain assignment
        let updated = assign_in(&txn, current, new_room_id, new_bed_number, None).await?;
        txn.commit().await?;
        return Ok(updated);
    };

    if old_room_id == new_room_id {
        let same = crate::core::room::require_room(&txn, old_room_id).await?;
        return Err(Error::SameRoom {
            room_number: same.room_number,
        });
    }

    // Accept into the new room first; only then release the old bed
    let updated = assign_in(&txn, current, new_room_id, new_bed_number, None).await?;
    release_slot(&txn, old_room_id).await?;
    refresh_room_status(&txn, old_room_id).await?;

    txn.commit().await?;
    Ok(updated)
}

/// Removes a resident from their room.
///
/// Idempotent: calling this on an unassigned resident is a no-op, never an
/// error and never a double-decrement.
pub async fn unassign_resident(
    db: &DatabaseConnection,
    resident_id: i64,
) -> Result<resident::Model> {
    let txn = db.begin().await?;

    let current = crate::core::resident::require_resident(&txn, resident_id).await?;
    let updated = unassign_in(&txn, current).await?;

    txn.commit().await?;
    Ok(updated)
}

/// Deactivates a resident: releases their bed and soft-deletes the record,
/// stamping today's date as the move-out date. The room decrement and the
/// deactivation commit together or not at all.
pub async fn deactivate_resident(
    db: &DatabaseConnection,
    resident_id: i64,
) -> Result<resident::Model> {
    let txn = db.begin().await?;

    let current = crate::core::resident::require_resident(&txn, resident_id).await?;
    let unassigned = unassign_in(&txn, current).await?;

    let mut active: resident::ActiveModel = unassigned.into();
    active.is_active = Set(false);
    active.is_deleted = Set(true);
    active.move_out_date = Set(Some(Utc::now().date_naive()));
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}

/// Soft-deletes a room. Fails with `RoomOccupied` while any resident is
/// still assigned.
pub async fn delete_room(db: &DatabaseConnection, room_id: i64) -> Result<()> {
    let target = crate::core::room::require_room(db, room_id).await?;

    if target.current_occupancy > 0 {
        return Err(Error::RoomOccupied {
            room_number: target.room_number,
            occupancy: target.current_occupancy,
        });
    }

    let mut active: room::ActiveModel = target.into();
    active.is_active = Set(false);
    active.update(db).await?;

    Ok(())
}

/// Builds the derived per-bed view of a room: one slot per bed index with
/// the occupying resident, if any. Pure projection, no stored state.
pub async fn bed_overview(db: &DatabaseConnection, room_id: i64) -> Result<Vec<BedSlot>> {
    let target = crate::core::room::require_room(db, room_id).await?;

    let occupants = Resident::find()
        .filter(resident::Column::RoomId.eq(room_id))
        .filter(resident::Column::IsActive.eq(true))
        .filter(resident::Column::IsDeleted.eq(false))
        .order_by_asc(resident::Column::BedNumber)
        .all(db)
        .await?;

    let slots = (1..=target.capacity)
        .map(|bed| {
            let occupant = occupants
                .iter()
                .find(|r| r.bed_number == Some(bed))
                .cloned();
            BedSlot {
                bed_number: bed,
                is_occupied: occupant.is_some(),
                resident: occupant,
            }
        })
        .collect();

    Ok(slots)
}
