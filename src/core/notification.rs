//! Notification business logic - persisted workflow events and email fan-out.
//!
//! Every workflow transition records a notification row. Email delivery is
//! strictly best-effort: a failing mailer is logged and reflected in
//! `is_email_sent`, but never fails the workflow that triggered it.

use crate::{
    entities::{Notification, notification},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{ConnectionTrait, QueryOrder, Set, prelude::*};
use tracing::{info, warn};

/// Outbound email delivery boundary.
///
/// Real providers live outside this crate; [`LogMailer`] stands in for them
/// and simply logs the send.
pub trait Mailer {
    /// Sends an email. Implementations report failure through the `Result`;
    /// callers in this module treat failure as non-fatal.
    fn send(
        &self,
        to: &str,
        subject: &str,
        html: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Mailer stand-in that logs instead of delivering.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, _html: &str) -> Result<()> {
        info!("Email to {to}: {subject}");
        Ok(())
    }
}

/// Creates a notification row for a resident.
pub async fn create_notification<C>(
    db: &C,
    resident_id: i64,
    title: String,
    message: String,
    kind: &str,
    related_id: Option<i64>,
    related_model: Option<String>,
) -> Result<notification::Model>
where
    C: ConnectionTrait,
{
    let row = notification::ActiveModel {
        resident_id: Set(resident_id),
        title: Set(title),
        message: Set(message),
        kind: Set(kind.to_string()),
        is_read: Set(false),
        is_email_sent: Set(false),
        related_id: Set(related_id),
        related_model: Set(related_model),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    row.insert(db).await.map_err(Into::into)
}

/// Records a workflow event and attempts email delivery, best-effort.
///
/// The notification row always persists; a mailer failure is logged and
/// leaves `is_email_sent` false. This function never returns a delivery
/// error to the caller.
pub async fn notify<M>(
    db: &DatabaseConnection,
    mailer: &M,
    resident_id: i64,
    email: &str,
    title: String,
    message: String,
    kind: &str,
) -> Result<notification::Model>
where
    M: Mailer,
{
    let row = create_notification(
        db,
        resident_id,
        title.clone(),
        message.clone(),
        kind,
        None,
        None,
    )
    .await?;

    match mailer.send(email, &title, &message).await {
        Ok(()) => {
            let mut active: notification::ActiveModel = row.into();
            active.is_email_sent = Set(true);
            active.update(db).await.map_err(Into::into)
        }
        Err(e) => {
            warn!("Email delivery failed for notification {}: {e}", row.id);
            Ok(row)
        }
    }
}

/// Marks a notification as read.
pub async fn mark_read(
    db: &DatabaseConnection,
    notification_id: i64,
) -> Result<notification::Model> {
    let row = Notification::find_by_id(notification_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::Validation {
            message: format!("Notification {notification_id} not found"),
        })?;

    let mut active: notification::ActiveModel = row.into();
    active.is_read = Set(true);
    active.update(db).await.map_err(Into::into)
}

/// Retrieves a resident's unread notifications, newest first.
pub async fn unread_for_resident(
    db: &DatabaseConnection,
    resident_id: i64,
) -> Result<Vec<notification::Model>> {
    Notification::find()
        .filter(notification::Column::ResidentId.eq(resident_id))
        .filter(notification::Column::IsRead.eq(false))
        .order_by_desc(notification::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    /// Mailer that always fails, for exercising the best-effort path.
    struct BrokenMailer;

    impl Mailer for BrokenMailer {
        async fn send(&self, _to: &str, _subject: &str, _html: &str) -> Result<()> {
            Err(Error::Config {
                message: "smtp relay down".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_notify_marks_email_sent_on_success() -> Result<()> {
        let db = setup_test_db().await?;
        let resident = create_test_resident(&db, "Asha", "asha@example.com").await?;

        let row = notify(
            &db,
            &LogMailer,
            resident.id,
            &resident.email,
            "Welcome".to_string(),
            "Hello".to_string(),
            "registration",
        )
        .await?;

        assert!(row.is_email_sent);
        assert!(!row.is_read);

        Ok(())
    }

    #[tokio::test]
    async fn test_notify_survives_mailer_failure() -> Result<()> {
        let db = setup_test_db().await?;
        let resident = create_test_resident(&db, "Asha", "asha@example.com").await?;

        // Delivery failure must not propagate; the row still persists
        let row = notify(
            &db,
            &BrokenMailer,
            resident.id,
            &resident.email,
            "Welcome".to_string(),
            "Hello".to_string(),
            "registration",
        )
        .await?;

        assert!(!row.is_email_sent);

        let stored = Notification::find_by_id(row.id).one(&db).await?;
        assert!(stored.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_mark_read_and_unread_listing() -> Result<()> {
        let db = setup_test_db().await?;
        let resident = create_test_resident(&db, "Asha", "asha@example.com").await?;

        let first = create_notification(
            &db,
            resident.id,
            "One".to_string(),
            "First".to_string(),
            "reminder",
            None,
            None,
        )
        .await?;
        create_notification(
            &db,
            resident.id,
            "Two".to_string(),
            "Second".to_string(),
            "reminder",
            None,
            None,
        )
        .await?;

        let unread = unread_for_resident(&db, resident.id).await?;
        assert_eq!(unread.len(), 2);

        let read = mark_read(&db, first.id).await?;
        assert!(read.is_read);

        let unread_after = unread_for_resident(&db, resident.id).await?;
        assert_eq!(unread_after.len(), 1);
        assert_eq!(unread_after[0].title, "Two");

        Ok(())
    }
}
