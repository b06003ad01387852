//! Payment entity - Append-only record of rent and deposit payments.
//!
//! A payment may cover several months at once; `months` holds the set of
//! `"<MonthName> <Year>"` labels it applies to. Historical rows are never
//! edited - the only permitted mutation is the soft-delete flag.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Settlement state of a payment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[derive(Default)]
pub enum PaymentStatus {
    /// Fully settled; counts toward rent derivation
    #[sea_orm(string_value = "paid")]
    #[default]
    Paid,
    /// Owed but not yet received
    #[sea_orm(string_value = "due")]
    Due,
    /// Partially settled
    #[sea_orm(string_value = "partial")]
    Partial,
}

/// Set of month labels a payment covers, stored as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct MonthSet(pub Vec<String>);

impl MonthSet {
    /// Whether this payment covers the given `"<MonthName> <Year>"` label.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|m| m == label)
    }

    /// Number of months covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no months are covered (invalid for a stored payment).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for MonthSet {
    fn from(months: Vec<String>) -> Self {
        Self(months)
    }
}

/// Payment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Resident this payment belongs to
    pub resident_id: i64,
    /// Amount paid
    pub amount: f64,
    /// Month labels this payment covers (e.g., `["March 2025"]`)
    #[sea_orm(column_type = "Json")]
    pub months: MonthSet,
    /// Settlement state
    pub payment_status: PaymentStatus,
    /// Security-deposit flag - deposits are excluded from rent derivation
    pub is_deposit: bool,
    /// How the payment was made (e.g., "Cash", "UPI")
    pub payment_method: String,
    /// When the payment was recorded
    pub payment_date: DateTimeUtc,
    /// Soft delete flag - the only mutation permitted after insert
    pub is_deleted: bool,
}

/// Defines relationships between Payment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payment belongs to one resident
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
