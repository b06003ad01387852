//! Notification entity - Persisted record of workflow events for a resident.
//!
//! Every workflow transition (acknowledgement, approval, rejection, payment)
//! produces a row here. Email delivery is best-effort and tracked via
//! `is_email_sent`; the only other mutation is flipping `is_read`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Notification database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    /// Unique identifier for the notification
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Resident this notification is addressed to
    pub resident_id: i64,
    /// Short headline
    pub title: String,
    /// Full message body
    pub message: String,
    /// Event kind: `"registration"`, `"approval"`, `"rejection"`, `"payment"`, `"reminder"`
    pub kind: String,
    /// Whether the resident has read the notification
    pub is_read: bool,
    /// Whether the accompanying email went out successfully
    pub is_email_sent: bool,
    /// Optional id of the record this notification refers to
    #[sea_orm(nullable)]
    pub related_id: Option<i64>,
    /// Table the `related_id` points into (e.g., `"payments"`)
    #[sea_orm(nullable)]
    pub related_model: Option<String>,
    /// When the notification was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Notification and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each notification belongs to one resident
    #[sea_orm(
        belongs_to = "super::resident::Entity",
        from = "Column::ResidentId",
        to = "super::resident::Column::Id"
    )]
    Resident,
}

impl Related<super::resident::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Resident.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
