//! Registration workflow - submission, confirmation, and rejection.
//!
//! A registration request starts `Pending` and moves exactly once to
//! `Approved` or `Rejected`. Confirmation provisions credentials (PG ID and
//! a random initial password), allocates a room through the allocation
//! module, and records the first payment - all inside one transaction.
//! Notification and email follow-ups are best-effort and never roll back a
//! committed decision.

use crate::{
    core::notification::Mailer,
    entities::{
        Resident, payment,
        payment::PaymentStatus,
        resident,
        resident::{RegistrationStatus, Role},
    },
    errors::{Error, Result},
};
use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use chrono::{Datelike, NaiveDate, Utc};
use rand::Rng;
use sea_orm::{ConnectionTrait, Set, TransactionTrait, prelude::*};
use tracing::warn;

const INITIAL_PASSWORD_LEN: usize = 10;
const PG_ID_ATTEMPTS: usize = 20;

/// A prospective resident's registration request.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    /// Full name
    pub name: String,
    /// Contact email, must be unique
    pub email: String,
    /// Contact phone number
    pub phone: String,
}

/// The first payment recorded alongside a confirmation.
#[derive(Debug, Clone)]
pub struct InitialPayment {
    /// Amount paid at check-in
    pub amount: f64,
    /// Month label the payment covers (e.g., `"April 2025"`)
    pub month: String,
    /// How the payment was made
    pub payment_method: String,
    /// Settlement state of the payment
    pub payment_status: PaymentStatus,
}

/// Everything produced by a successful confirmation.
///
/// `initial_password` is the plaintext credential for the welcome email; it
/// is never stored - only its argon2 hash is persisted.
#[derive(Debug, Clone)]
pub struct ConfirmationOutcome {
    /// The approved resident, now housed and credentialed
    pub resident: resident::Model,
    /// The initial payment row
    pub payment: payment::Model,
    /// Plaintext initial password for one-time delivery
    pub initial_password: String,
}

/// Submits a new registration request, creating a `Pending` resident.
///
/// Fails with `Conflict` when the email is already registered. Records an
/// acknowledgement notification (email best-effort).
pub async fn submit_registration<M>(
    db: &DatabaseConnection,
    mailer: &M,
    request: RegistrationRequest,
) -> Result<resident::Model>
where
    M: Mailer,
{
    let email = request.email.trim().to_lowercase();

    if request.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Name cannot be empty".to_string(),
        });
    }

    if email.is_empty() || !email.contains('@') {
        return Err(Error::Validation {
            message: format!("Invalid email address: {email:?}"),
        });
    }

    if crate::core::resident::get_resident_by_email(db, &email)
        .await?
        .is_some()
    {
        return Err(Error::Conflict {
            message: format!("Email {email} is already registered"),
        });
    }

    let new_resident = resident::ActiveModel {
        name: Set(request.name.trim().to_string()),
        email: Set(email),
        phone: Set(request.phone.trim().to_string()),
        role: Set(Role::User),
        registration_status: Set(RegistrationStatus::Pending),
        is_active: Set(true),
        is_deleted: Set(false),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let created = new_resident.insert(db).await?;

    let ack = crate::core::notification::notify(
        db,
        mailer,
        created.id,
        &created.email,
        "Registration received".to_string(),
        format!(
            "Hi {}, your registration request has been received and is awaiting review.",
            created.name
        ),
        "registration",
    )
    .await;
    if let Err(e) = ack {
        warn!("Failed to record acknowledgement notification: {e}");
    }

    Ok(created)
}

/// Confirms a pending registration.
///
/// One transaction covers credential provisioning, room/bed allocation, the
/// status flip to `Approved`, and the initial payment row. Fails with
/// `AlreadyDecided` when the resident is not `Pending`, and propagates
/// `RoomNotFound`/`RoomFull` from the allocation step. The welcome
/// notification happens after commit and cannot undo the confirmation.
pub async fn confirm_registration<M>(
    db: &DatabaseConnection,
    mailer: &M,
    resident_id: i64,
    room_number: &str,
    check_in: NaiveDate,
    initial: InitialPayment,
) -> Result<ConfirmationOutcome>
where
    M: Mailer,
{
    if !initial.amount.is_finite() || initial.amount <= 0.0 {
        return Err(Error::Validation {
            message: format!("Initial payment amount must be positive, got {}", initial.amount),
        });
    }
    if initial.month.trim().is_empty() {
        return Err(Error::Validation {
            message: "Initial payment month cannot be empty".to_string(),
        });
    }

    let txn = db.begin().await?;

    let current = crate::core::resident::require_resident(&txn, resident_id).await?;
    ensure_pending(&current)?;

    let target = crate::core::room::get_room_by_number(&txn, room_number)
        .await?
        .ok_or_else(|| Error::RoomNotFound {
            room: room_number.to_string(),
        })?;

    let pg_id = generate_unique_pg_id(&txn).await?;
    let initial_password = generate_initial_password();
    let password_hash = hash_password(&initial_password)?;

    let housed = crate::core::allocation::assign_in(
        &txn,
        current,
        target.id,
        None,
        Some(check_in),
    )
    .await?;

    let mut active: resident::ActiveModel = housed.into();
    active.registration_status = Set(RegistrationStatus::Approved);
    active.pg_id = Set(Some(pg_id));
    active.password_hash = Set(Some(password_hash));
    active.approval_date = Set(Some(Utc::now()));
    let approved = active.update(&txn).await?;

    let payment_row = payment::ActiveModel {
        resident_id: Set(approved.id),
        amount: Set(initial.amount),
        months: Set(vec![initial.month.trim().to_string()].into()),
        payment_status: Set(initial.payment_status),
        is_deposit: Set(false),
        payment_method: Set(initial.payment_method),
        payment_date: Set(Utc::now()),
        is_deleted: Set(false),
        ..Default::default()
    };
    let recorded = payment_row.insert(&txn).await?;

    txn.commit().await?;

    // Best-effort welcome; the confirmation is already committed
    let welcome = crate::core::notification::notify(
        db,
        mailer,
        approved.id,
        &approved.email,
        "Registration confirmed".to_string(),
        format!(
            "Welcome {}! Your PG ID is {}. Log in with your email and the password we sent you.",
            approved.name,
            approved.pg_id.as_deref().unwrap_or_default()
        ),
        "approval",
    )
    .await;
    if let Err(e) = welcome {
        warn!("Failed to record welcome notification: {e}");
    }

    Ok(ConfirmationOutcome {
        resident: approved,
        payment: recorded,
        initial_password,
    })
}

/// Rejects a pending registration, storing the reason.
///
/// Fails with `AlreadyDecided` when the resident is not `Pending`. The
/// rejection notification is best-effort.
pub async fn reject_registration<M>(
    db: &DatabaseConnection,
    mailer: &M,
    resident_id: i64,
    reason: Option<String>,
) -> Result<resident::Model>
where
    M: Mailer,
{
    let current = crate::core::resident::require_resident(db, resident_id).await?;
    ensure_pending(&current)?;

    let mut active: resident::ActiveModel = current.into();
    active.registration_status = Set(RegistrationStatus::Rejected);
    active.rejection_reason = Set(reason.clone());
    active.rejection_date = Set(Some(Utc::now()));
    let rejected = active.update(db).await?;

    let note = crate::core::notification::notify(
        db,
        mailer,
        rejected.id,
        &rejected.email,
        "Registration declined".to_string(),
        reason.unwrap_or_else(|| "Your registration request was declined.".to_string()),
        "rejection",
    )
    .await;
    if let Err(e) = note {
        warn!("Failed to record rejection notification: {e}");
    }

    Ok(rejected)
}

/// Fails with `AlreadyDecided` unless the resident is still `Pending`.
fn ensure_pending(current: &resident::Model) -> Result<()> {
    if current.registration_status == RegistrationStatus::Pending {
        Ok(())
    } else {
        Err(Error::AlreadyDecided {
            status: current.registration_status.as_str().to_string(),
        })
    }
}

/// Generates a PG ID of the form `PG<YY><4 digits>`, retrying on the rare
/// collision with an existing resident.
async fn generate_unique_pg_id<C>(db: &C) -> Result<String>
where
    C: ConnectionTrait,
{
    let year = Utc::now().year() % 100;

    for _ in 0..PG_ID_ATTEMPTS {
        let digits: String = (0..4)
            .map(|_| rand::thread_rng().gen_range(0..10).to_string())
            .collect();
        let candidate = format!("PG{year:02}{digits}");

        let clash = Resident::find()
            .filter(resident::Column::PgId.eq(candidate.as_str()))
            .one(db)
            .await?;
        if clash.is_none() {
            return Ok(candidate);
        }
    }

    Err(Error::Credential {
        message: "Could not generate a unique PG ID".to_string(),
    })
}

/// Generates a random alphanumeric initial password.
fn generate_initial_password() -> String {
    rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(INITIAL_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

/// Hashes a password with argon2 and a fresh random salt.
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Credential {
            message: format!("Failed to hash password: {e}"),
        })
}
