//! Expired record listing and purge

use crate::adapters::database::traits::PatientStore;
use crate::domain::{AuditAction, ExpiredPatient, Outcome, Result, SessionContext};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Finds and deletes records past their retention deadline
#[derive(Clone)]
pub struct RetentionEvaluator {
    patients: Arc<dyn PatientStore>,
}

impl RetentionEvaluator {
    pub fn new(patients: Arc<dyn PatientStore>) -> Self {
        Self { patients }
    }

    /// Records whose deadline is strictly before `now`'s UTC date
    pub async fn list_expired(&self, now: DateTime<Utc>) -> Result<Vec<ExpiredPatient>> {
        self.patients.list_expired(now.date_naive()).await
    }

    /// Delete every expired record in one transaction
    ///
    /// Produces a single audit event carrying the count, whatever the
    /// count is. On failure nothing is deleted and no event is produced.
    ///
    /// The event is appended by the caller after the delete commits, so an
    /// audit store failure leaves the rows deleted with no retention event.
    // TODO: append the retention event inside the purge transaction.
    pub async fn purge_expired(
        &self,
        session: &SessionContext,
        now: DateTime<Utc>,
    ) -> Result<Outcome<u64>> {
        let today = now.date_naive();
        let deleted = self.patients.purge_expired(today).await?;

        tracing::info!(deleted, cutoff = %today, "Expired records purged");

        Ok(Outcome::new(
            deleted,
            session.event(
                AuditAction::DataRetention,
                format!("Deleted {deleted} expired records"),
            ),
        ))
    }
}
