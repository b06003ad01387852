//! Room entity - Represents a physical room with a fixed bed capacity.
//!
//! `current_occupancy` is bookkept by the allocation logic and must always
//! equal the count of active residents whose `room_id` references this room.
//! Beds are not persisted separately; a "bed" is a derived slot 1..=capacity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Availability state of a room.
///
/// `Maintenance` is only ever set explicitly by an admin and is preserved
/// across occupancy changes until an admin clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[derive(Default)]
pub enum RoomStatus {
    /// At least one bed is free
    #[sea_orm(string_value = "available")]
    #[default]
    Available,
    /// Every bed is occupied
    #[sea_orm(string_value = "occupied")]
    Occupied,
    /// Taken out of service by an admin
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
}

/// Room database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    /// Unique internal identifier for the room
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-facing room number (e.g., "101"), unique across the hostel
    #[sea_orm(unique)]
    pub room_number: String,
    /// Floor the room is on
    pub floor: i32,
    /// Room type label (e.g., "single", "double", "triple")
    pub room_type: String,
    /// Monthly rent price per bed
    pub price: f64,
    /// Number of beds in the room
    pub capacity: i32,
    /// Count of active residents currently assigned to this room
    pub current_occupancy: i32,
    /// Derived availability, with `maintenance` preserved when set manually
    pub status: RoomStatus,
    /// Soft delete flag - a room is only deletable when empty
    pub is_active: bool,
}

/// Defines relationships between Room and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One room houses many residents
    #[sea_orm(has_many = "super::resident::Entity")]
    Residents,
}

impl Related<super::resident::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Residents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
