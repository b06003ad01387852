//! Payment business logic - rent recording and paid/unpaid derivation.
//!
//! Payments are append-only: rows are inserted, optionally soft-deleted, and
//! never edited. A resident's rent status for a month is never stored; it is
//! derived on demand by summing the settled, non-deposit payments covering
//! that month's label and comparing against the room price.

use crate::{
    entities::{Payment, payment, payment::PaymentStatus},
    errors::{Error, Result},
};
use chrono::{Datelike, NaiveDate};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::warn;

/// Rent standing of a resident for a particular month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentStatus {
    /// Settled payments cover the room price
    Paid,
    /// Settled payments fall short of the room price
    Unpaid,
    /// Resident has no room, so there is no price to compare against
    NotApplicable,
}

/// Formats a date's month as the canonical `"<MonthName> <Year>"` label
/// (e.g., `"March 2025"`).
#[must_use]
pub fn month_label(date: NaiveDate) -> String {
    format!("{} {}", month_name(date.month()), date.year())
}

const fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        // chrono guarantees 1..=12
        _ => "December",
    }
}

/// Records a payment for a resident.
///
/// Validates the amount and month labels, confirms the resident exists, and
/// appends the row. A `payment` notification is recorded best-effort.
pub async fn record_payment(
    db: &DatabaseConnection,
    resident_id: i64,
    amount: f64,
    months: Vec<String>,
    payment_status: PaymentStatus,
    is_deposit: bool,
    payment_method: String,
) -> Result<payment::Model> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::Validation {
            message: format!("Payment amount must be positive, got {amount}"),
        });
    }

    if months.is_empty() || months.iter().any(|m| m.trim().is_empty()) {
        return Err(Error::Validation {
            message: "Payment must cover at least one non-empty month label".to_string(),
        });
    }

    let resident = crate::core::resident::require_resident(db, resident_id).await?;

    let row = payment::ActiveModel {
        resident_id: Set(resident.id),
        amount: Set(amount),
        months: Set(months.into()),
        payment_status: Set(payment_status),
        is_deposit: Set(is_deposit),
        payment_method: Set(payment_method),
        payment_date: Set(chrono::Utc::now()),
        is_deleted: Set(false),
        ..Default::default()
    };
    let recorded = row.insert(db).await?;

    let note = crate::core::notification::create_notification(
        db,
        resident.id,
        "Payment recorded".to_string(),
        format!("A payment of {amount:.2} was recorded."),
        "payment",
        Some(recorded.id),
        Some("payments".to_string()),
    )
    .await;
    if let Err(e) = note {
        warn!("Failed to record payment notification: {e}");
    }

    Ok(recorded)
}

/// Retrieves a resident's payments, newest first, excluding soft-deleted rows.
pub async fn payments_for_resident(
    db: &DatabaseConnection,
    resident_id: i64,
) -> Result<Vec<payment::Model>> {
    Payment::find()
        .filter(payment::Column::ResidentId.eq(resident_id))
        .filter(payment::Column::IsDeleted.eq(false))
        .order_by_desc(payment::Column::PaymentDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Soft-deletes a payment row - the only mutation the ledger permits.
pub async fn void_payment(db: &DatabaseConnection, payment_id: i64) -> Result<payment::Model> {
    let row = Payment::find_by_id(payment_id)
        .filter(payment::Column::IsDeleted.eq(false))
        .one(db)
        .await?
        .ok_or_else(|| Error::Validation {
            message: format!("Payment {payment_id} not found"),
        })?;

    let mut active: payment::ActiveModel = row.into();
    active.is_deleted = Set(true);
    active.update(db).await.map_err(Into::into)
}

/// Derives a resident's rent status for the month of `as_of`.
///
/// Sums the amounts of all settled (`Paid`), non-deposit, non-deleted
/// payments whose month set contains the label, so several partial payments
/// for the same month accumulate. The sum is compared against the resident's
/// current room price; a resident without a room has no price to compare
/// against and gets `NotApplicable`.
pub async fn current_month_status(
    db: &DatabaseConnection,
    resident_id: i64,
    as_of: NaiveDate,
) -> Result<RentStatus> {
    let resident = crate::core::resident::require_resident(db, resident_id).await?;

    let Some(room_id) = resident.room_id else {
        return Ok(RentStatus::NotApplicable);
    };
    let room = crate::core::room::require_room(db, room_id).await?;

    let label = month_label(as_of);

    let rows = Payment::find()
        .filter(payment::Column::ResidentId.eq(resident_id))
        .filter(payment::Column::IsDeleted.eq(false))
        .filter(payment::Column::IsDeposit.eq(false))
        .filter(payment::Column::PaymentStatus.eq(PaymentStatus::Paid))
        .all(db)
        .await?;

    let total: f64 = rows
        .iter()
        .filter(|p| p.months.contains(&label))
        .map(|p| p.amount)
        .sum();

    if total >= room.price {
        Ok(RentStatus::Paid)
    } else {
        Ok(RentStatus::Unpaid)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::entities::Notification;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_month_label_formatting() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        assert_eq!(month_label(date), "March 2025");

        let date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        assert_eq!(month_label(date), "December 2024");
    }

    #[tokio::test]
    async fn test_record_payment_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let resident = create_test_resident(&db, "Asha", "asha@example.com").await?;

        let result = record_payment(
            &db,
            resident.id,
            0.0,
            vec!["March 2025".to_string()],
            PaymentStatus::Paid,
            false,
            "Cash".to_string(),
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { message: _ }
        ));

        let result = record_payment(
            &db,
            resident.id,
            5000.0,
            vec![],
            PaymentStatus::Paid,
            false,
            "Cash".to_string(),
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { message: _ }
        ));

        let result = record_payment(
            &db,
            999,
            5000.0,
            vec!["March 2025".to_string()],
            PaymentStatus::Paid,
            false,
            "Cash".to_string(),
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ResidentNotFound { id: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_record_payment_creates_notification() -> Result<()> {
        let db = setup_test_db().await?;
        let resident = create_test_resident(&db, "Asha", "asha@example.com").await?;

        let recorded = record_payment(
            &db,
            resident.id,
            5000.0,
            vec!["March 2025".to_string()],
            PaymentStatus::Paid,
            false,
            "Cash".to_string(),
        )
        .await?;

        let notes = Notification::find().all(&db).await?;
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, "payment");
        assert_eq!(notes[0].related_id, Some(recorded.id));
        assert_eq!(notes[0].related_model.as_deref(), Some("payments"));

        Ok(())
    }

    #[tokio::test]
    async fn test_partial_payments_sum_to_paid() -> Result<()> {
        // Room price 8000; 5000 + 3000 across two partial payments covers it
        let (db, resident, _room) = setup_housed_resident(8000.0).await?;
        let march = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

        record_test_payment(&db, resident.id, 5000.0, "March 2025").await?;
        record_test_payment(&db, resident.id, 3000.0, "March 2025").await?;

        let status = current_month_status(&db, resident.id, march).await?;
        assert_eq!(status, RentStatus::Paid);

        Ok(())
    }

    #[tokio::test]
    async fn test_partial_payments_short_of_price_are_unpaid() -> Result<()> {
        // Same payments against a 9000 price fall short
        let (db, resident, _room) = setup_housed_resident(9000.0).await?;
        let march = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

        record_test_payment(&db, resident.id, 5000.0, "March 2025").await?;
        record_test_payment(&db, resident.id, 3000.0, "March 2025").await?;

        let status = current_month_status(&db, resident.id, march).await?;
        assert_eq!(status, RentStatus::Unpaid);

        Ok(())
    }

    #[tokio::test]
    async fn test_deposits_and_unsettled_rows_excluded() -> Result<()> {
        let (db, resident, _room) = setup_housed_resident(8000.0).await?;
        let march = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

        // A deposit and a due payment together would cover the price, but
        // neither counts toward rent
        record_payment(
            &db,
            resident.id,
            8000.0,
            vec!["March 2025".to_string()],
            PaymentStatus::Paid,
            true, // deposit
            "Cash".to_string(),
        )
        .await?;
        record_payment(
            &db,
            resident.id,
            8000.0,
            vec!["March 2025".to_string()],
            PaymentStatus::Due,
            false,
            "Cash".to_string(),
        )
        .await?;

        let status = current_month_status(&db, resident.id, march).await?;
        assert_eq!(status, RentStatus::Unpaid);

        Ok(())
    }

    #[tokio::test]
    async fn test_multi_month_payment_counts_for_each_month() -> Result<()> {
        let (db, resident, _room) = setup_housed_resident(8000.0).await?;

        record_payment(
            &db,
            resident.id,
            16000.0,
            vec!["March 2025".to_string(), "April 2025".to_string()],
            PaymentStatus::Paid,
            false,
            "UPI".to_string(),
        )
        .await?;

        let march = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let april = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let may = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();

        assert_eq!(
            current_month_status(&db, resident.id, march).await?,
            RentStatus::Paid
        );
        assert_eq!(
            current_month_status(&db, resident.id, april).await?,
            RentStatus::Paid
        );
        assert_eq!(
            current_month_status(&db, resident.id, may).await?,
            RentStatus::Unpaid
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_status_without_room_is_not_applicable() -> Result<()> {
        let db = setup_test_db().await?;
        let resident = create_test_resident(&db, "Asha", "asha@example.com").await?;

        record_test_payment(&db, resident.id, 5000.0, "March 2025").await?;

        let march = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let status = current_month_status(&db, resident.id, march).await?;
        assert_eq!(status, RentStatus::NotApplicable);

        Ok(())
    }

    #[tokio::test]
    async fn test_void_payment_excluded_from_derivation() -> Result<()> {
        let (db, resident, _room) = setup_housed_resident(8000.0).await?;
        let march = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

        let row = record_test_payment(&db, resident.id, 8000.0, "March 2025").await?;
        assert_eq!(
            current_month_status(&db, resident.id, march).await?,
            RentStatus::Paid
        );

        let voided = void_payment(&db, row.id).await?;
        assert!(voided.is_deleted);

        assert_eq!(
            current_month_status(&db, resident.id, march).await?,
            RentStatus::Unpaid
        );

        // Voiding twice fails: the row is no longer visible
        let result = void_payment(&db, row.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { message: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_payments_for_resident_newest_first() -> Result<()> {
        let db = setup_test_db().await?;
        let resident = create_test_resident(&db, "Asha", "asha@example.com").await?;
        let other = create_test_resident(&db, "Binod", "binod@example.com").await?;

        record_test_payment(&db, resident.id, 5000.0, "March 2025").await?;
        record_test_payment(&db, resident.id, 3000.0, "April 2025").await?;
        record_test_payment(&db, other.id, 7000.0, "March 2025").await?;

        let rows = payments_for_resident(&db, resident.id).await?;
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|p| p.resident_id == resident.id));
        assert!(rows[0].payment_date >= rows[1].payment_date);

        Ok(())
    }
}
