//! Audit logger
//!
//! Stamps events with the injected clock and appends them to the `logs`
//! table. Events are never updated or deleted.

use crate::adapters::database::traits::AuditStore;
use crate::domain::context::ResultExt;
use crate::domain::{AuditEntry, AuditFilter, AuditInsert, Clock, NewAuditEvent, Result};
use std::sync::Arc;

/// Append-only audit trail
#[derive(Clone)]
pub struct AuditLogger {
    store: Arc<dyn AuditStore>,
    clock: Arc<dyn Clock>,
}

impl AuditLogger {
    pub fn new(store: Arc<dyn AuditStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Append one event
    ///
    /// The details text may name patient ids but never patient identity,
    /// and it is not copied to the tracing output.
    pub async fn record(&self, event: NewAuditEvent) -> Result<()> {
        let action = event.action;
        let insert = AuditInsert {
            user_id: event.user_id,
            role: event.role,
            action: action.label().to_string(),
            timestamp: self.clock.now(),
            details: event.details,
        };

        self.store
            .append(insert)
            .await
            .with_context(|| format!("Failed to record '{action}' audit event"))?;

        tracing::debug!(
            action = %action,
            user_id = ?event.user_id.map(|id| id.value()),
            "Audit event recorded"
        );
        Ok(())
    }

    /// Append events in order, stopping at the first failure
    pub async fn record_all(&self, events: Vec<NewAuditEvent>) -> Result<()> {
        for event in events {
            self.record(event).await?;
        }
        Ok(())
    }

    /// Stored events, most recent first
    pub async fn view(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>> {
        self.store.entries(filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::database::traits::UserStore;
    use crate::adapters::memory::MemoryStore;
    use crate::domain::{AuditAction, CarevaultError, FixedClock, NewUser, Role, UserId};
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn logger(store: Arc<MemoryStore>) -> (AuditLogger, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2025, 5, 10, 12, 0, 0).unwrap(),
        ));
        (AuditLogger::new(store, clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_entries_newest_first_with_usernames() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_users(&[NewUser {
                username: "admin".to_string(),
                password_digest: "d".to_string(),
                role: Role::Admin,
            }])
            .await
            .unwrap();
        let (logger, clock) = logger(store);

        logger
            .record(NewAuditEvent::new(
                Some(UserId::new(1)),
                Some(Role::Admin),
                AuditAction::Login,
                "User admin logged in",
            ))
            .await
            .unwrap();
        clock.advance(Duration::minutes(1));
        logger
            .record(NewAuditEvent::anonymous(
                AuditAction::FailedLogin,
                "Failed login attempt for mallory",
            ))
            .await
            .unwrap();

        let entries = logger.view(&AuditFilter::default()).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "Failed Login");
        assert_eq!(entries[0].username, None);
        assert_eq!(entries[1].username.as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn test_filters() {
        let store = Arc::new(MemoryStore::new());
        let (logger, clock) = logger(store);

        for _ in 0..3 {
            logger
                .record(NewAuditEvent::anonymous(AuditAction::FailedLogin, "x"))
                .await
                .unwrap();
            clock.advance(Duration::days(1));
        }
        logger
            .record(NewAuditEvent::anonymous(AuditAction::Export, "y"))
            .await
            .unwrap();

        let by_action = AuditFilter {
            action: Some(AuditAction::FailedLogin),
            ..AuditFilter::default()
        };
        assert_eq!(logger.view(&by_action).await.unwrap().len(), 3);

        let by_date = AuditFilter {
            date: NaiveDate::from_ymd_opt(2025, 5, 11),
            ..AuditFilter::default()
        };
        assert_eq!(logger.view(&by_date).await.unwrap().len(), 1);

        assert_eq!(logger.view(&AuditFilter::latest(2)).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_append_failure_surfaces() {
        let store = Arc::new(MemoryStore::new());
        store.set_audit_failure(true);
        let (logger, _) = logger(store);

        let err = logger
            .record(NewAuditEvent::anonymous(AuditAction::Logout, "bye"))
            .await
            .unwrap_err();
        assert!(matches!(err, CarevaultError::Database(_)));
        assert!(err.to_string().contains("Logout"));
    }
}
