//! Anonymization engine
//!
//! Applies the masking functions to stored rows. Both operations go through
//! [`PatientStore::apply_anonymizations`], which writes every targeted row in
//! one transaction.
//!
//! # Examples
//!
//! ```no_run
//! use carevault::adapters::database::Stores;
//! use carevault::anonymization::AnonymizationEngine;
//! use carevault::domain::SessionContext;
//!
//! # async fn example(session: &SessionContext) -> carevault::domain::Result<()> {
//! let stores = Stores::in_memory();
//! let engine = AnonymizationEngine::new(stores.patients.clone());
//!
//! let outcome = engine.anonymize_pending(session).await?;
//! println!("Anonymized {} records", outcome.value);
//! # Ok(())
//! # }
//! ```

use crate::adapters::database::traits::PatientStore;
use crate::anonymization::anonymizer::masked_update;
use crate::domain::{
    AnonymizationUpdate, AuditAction, Outcome, PatientId, Result, SessionContext,
};
use std::sync::Arc;
use std::time::Instant;

/// Single-record and bulk anonymization
#[derive(Clone)]
pub struct AnonymizationEngine {
    patients: Arc<dyn PatientStore>,
}

impl AnonymizationEngine {
    pub fn new(patients: Arc<dyn PatientStore>) -> Self {
        Self { patients }
    }

    /// Anonymize one record
    ///
    /// Returns `None` without an audit event when no record has this id.
    /// Re-anonymizing a record writes the same values again.
    ///
    /// # Errors
    ///
    /// Returns a store error if the lookup or update fails.
    pub async fn anonymize_patient(
        &self,
        session: &SessionContext,
        patient_id: PatientId,
    ) -> Result<Outcome<Option<AnonymizationUpdate>>> {
        let Some(candidate) = self.patients.find_candidate(patient_id).await? else {
            tracing::info!(patient_id = %patient_id, "No patient to anonymize");
            return Ok(Outcome::silent(None));
        };

        let update = masked_update(&candidate);
        self.patients
            .apply_anonymizations(std::slice::from_ref(&update))
            .await?;

        tracing::info!(patient_id = %patient_id, "Patient anonymized");

        Ok(Outcome::new(
            Some(update),
            session.event(
                AuditAction::AnonymizeData,
                format!("Anonymized patient ID: {patient_id}"),
            ),
        ))
    }

    /// Anonymize every record whose `is_anonymized` flag is unset
    ///
    /// All targeted rows are written in one transaction. One audit event
    /// records the count, including a count of zero.
    ///
    /// # Errors
    ///
    /// Returns a store error if the batch fails; no row is modified then.
    /// The event is appended after the batch commits.
    pub async fn anonymize_pending(&self, session: &SessionContext) -> Result<Outcome<u64>> {
        let start = Instant::now();
        let candidates = self.patients.pending_candidates().await?;
        let updates: Vec<AnonymizationUpdate> = candidates.iter().map(masked_update).collect();

        let changed = if updates.is_empty() {
            0
        } else {
            self.patients.apply_anonymizations(&updates).await?
        };

        tracing::info!(
            records = changed,
            duration_ms = start.elapsed().as_millis() as u64,
            "Bulk anonymization complete"
        );

        Ok(Outcome::new(
            changed,
            session.event(
                AuditAction::BulkAnonymization,
                format!("Anonymized {changed} patient records"),
            ),
        ))
    }
}
