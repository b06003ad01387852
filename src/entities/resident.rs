//! Resident entity - Represents a person registered to live in the PG.
//!
//! A resident starts out as a pending registration request with no room and
//! no credentials. On approval they receive a unique PG ID, a hashed initial
//! password, and a room/bed assignment. Residents are soft-deleted on
//! move-out; rows are never removed.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role of an account in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[derive(Default)]
pub enum Role {
    /// Hostel staff with management privileges
    #[sea_orm(string_value = "admin")]
    Admin,
    /// A regular paying-guest resident
    #[sea_orm(string_value = "user")]
    #[default]
    User,
}

/// Registration workflow state. `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[derive(Default)]
pub enum RegistrationStatus {
    /// Submitted, awaiting an admin decision
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    /// Confirmed by an admin; resident has a room and credentials
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Turned down by an admin (terminal)
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl RegistrationStatus {
    /// Stable string form, used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// Resident database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "residents")]
pub struct Model {
    /// Unique internal identifier for the resident
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name of the resident
    pub name: String,
    /// Contact email, unique across all residents
    #[sea_orm(unique)]
    pub email: String,
    /// Contact phone number
    pub phone: String,
    /// Account role (`admin` or `user`)
    pub role: Role,
    /// Current position in the registration workflow
    pub registration_status: RegistrationStatus,
    /// Human-facing PG identifier, assigned only on approval
    #[sea_orm(unique, nullable)]
    pub pg_id: Option<String>,
    /// Argon2 hash of the login password, set on approval
    #[sea_orm(nullable)]
    pub password_hash: Option<String>,
    /// Room the resident is assigned to, if any
    #[sea_orm(nullable)]
    pub room_id: Option<i64>,
    /// Bed index within the room (1..=capacity); only meaningful with `room_id`
    #[sea_orm(nullable)]
    pub bed_number: Option<i32>,
    /// Whether the resident currently lives in the hostel
    pub is_active: bool,
    /// Soft delete flag - if true, resident is hidden but data is preserved
    pub is_deleted: bool,
    /// Date the resident moved in
    #[sea_orm(nullable)]
    pub move_in_date: Option<Date>,
    /// Date the resident moved out
    #[sea_orm(nullable)]
    pub move_out_date: Option<Date>,
    /// When the registration was approved
    #[sea_orm(nullable)]
    pub approval_date: Option<DateTimeUtc>,
    /// Reason given when the registration was rejected
    #[sea_orm(nullable)]
    pub rejection_reason: Option<String>,
    /// When the registration was rejected
    #[sea_orm(nullable)]
    pub rejection_date: Option<DateTimeUtc>,
    /// When the registration request was submitted
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Resident and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each resident may be assigned to one room
    #[sea_orm(
        belongs_to = "super::room::Entity",
        from = "Column::RoomId",
        to = "super::room::Column::Id"
    )]
    Room,
    /// One resident has many payments
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
    /// One resident has many notifications
    #[sea_orm(has_many = "super::notification::Entity")]
    Notifications,
}

impl Related<super::room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
