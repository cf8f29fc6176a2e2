//! Access control projector

use crate::adapters::database::traits::PatientStore;
use crate::anonymization::{anonymize_contact, anonymize_name};
use crate::domain::{
    AnonymizedPatientRow, AuditAction, Outcome, PatientId, PatientRecord, Result, Role,
    SessionContext,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Placeholder shown in place of every restricted column
pub const HIDDEN: &str = "HIDDEN";

/// How an admin wants identity rendered
///
/// Ignored for other roles, whose shape is fixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Raw,
    /// Mask identity at read time without touching stored rows
    Anonymized,
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "raw" => Ok(ViewMode::Raw),
            "anonymized" => Ok(ViewMode::Anonymized),
            other => Err(format!("Unknown view mode: '{other}'")),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Raw => f.write_str("raw"),
            ViewMode::Anonymized => f.write_str("anonymized"),
        }
    }
}

/// Receptionist row: everything but the id and creation time is hidden
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestrictedPatientView {
    pub patient_id: PatientId,
    pub name: &'static str,
    pub contact: &'static str,
    pub diagnosis: &'static str,
    pub date_added: DateTime<Utc>,
}

/// Rows visible to one role
#[derive(Debug, Clone, PartialEq)]
pub enum PatientView {
    /// Admin, raw mode: every stored column
    Full(Vec<PatientRecord>),

    /// Masked identity with diagnosis; doctor view and admin anonymized mode
    Masked(Vec<AnonymizedPatientRow>),

    /// Receptionist view
    Restricted(Vec<RestrictedPatientView>),
}

impl PatientView {
    pub fn len(&self) -> usize {
        match self {
            PatientView::Full(rows) => rows.len(),
            PatientView::Masked(rows) => rows.len(),
            PatientView::Restricted(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Queries the store with the shape permitted for the session's role
#[derive(Clone)]
pub struct AccessProjector {
    patients: Arc<dyn PatientStore>,
}

impl AccessProjector {
    pub fn new(patients: Arc<dyn PatientStore>) -> Self {
        Self { patients }
    }

    /// Patient rows as the session's role may see them
    ///
    /// - admin: raw rows, or identity masked at read time in
    ///   [`ViewMode::Anonymized`]
    /// - doctor: anonymized rows only, masked values plus diagnosis
    /// - receptionist: id and creation time, every other column [`HIDDEN`]
    ///
    /// Exactly one audit event is produced per call, including when no row
    /// is returned.
    pub async fn view_patients(
        &self,
        session: &SessionContext,
        mode: ViewMode,
    ) -> Result<Outcome<PatientView>> {
        let view = match session.role() {
            Role::Admin => match mode {
                ViewMode::Raw => PatientView::Full(self.patients.list_full().await?),
                ViewMode::Anonymized => PatientView::Masked(
                    self.patients
                        .list_full()
                        .await?
                        .into_iter()
                        .map(mask_at_read_time)
                        .collect(),
                ),
            },
            Role::Doctor => PatientView::Masked(self.patients.list_anonymized().await?),
            Role::Receptionist => PatientView::Restricted(
                self.patients
                    .list_summaries(None)
                    .await?
                    .into_iter()
                    .map(|row| RestrictedPatientView {
                        patient_id: row.patient_id,
                        name: HIDDEN,
                        contact: HIDDEN,
                        diagnosis: HIDDEN,
                        date_added: row.date_added,
                    })
                    .collect(),
            ),
        };

        tracing::info!(role = %session.role(), rows = view.len(), "Patient records viewed");

        Ok(Outcome::new(
            view,
            session.event(AuditAction::ViewPatients, "Accessed patient records"),
        ))
    }
}

fn mask_at_read_time(record: PatientRecord) -> AnonymizedPatientRow {
    AnonymizedPatientRow {
        patient_id: record.patient_id,
        anonymized_name: anonymize_name(&record.name, record.patient_id),
        anonymized_contact: anonymize_contact(&record.contact),
        diagnosis: record.diagnosis,
        date_added: record.date_added,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::domain::{Identity, PatientInsert, UserId};
    use chrono::{Duration, TimeZone};

    fn session(role: Role) -> SessionContext {
        SessionContext::new(
            Identity {
                user_id: UserId::new(1),
                username: "user".to_string(),
                role,
            },
            Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap(),
        )
    }

    async fn store_with_one() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        let date_added = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        store
            .insert_patient(PatientInsert {
                name: "Jane Roe".to_string(),
                contact: "555-123-4567".to_string(),
                diagnosis: "Migraine".to_string(),
                encrypted: None,
                date_added,
                data_retention_date: (date_added + Duration::days(90)).date_naive(),
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_admin_anonymized_mode_leaves_store_untouched() {
        let store = store_with_one().await;
        let projector = AccessProjector::new(store.clone());

        let outcome = projector
            .view_patients(&session(Role::Admin), ViewMode::Anonymized)
            .await
            .unwrap();
        let PatientView::Masked(rows) = outcome.value else {
            panic!("expected masked view");
        };
        assert_eq!(rows[0].anonymized_name, "ANON_0001");
        assert_eq!(rows[0].anonymized_contact, "XXX-XXX-4567");
        assert!(!store.patient(PatientId::new(1)).unwrap().is_anonymized);
    }

    #[tokio::test]
    async fn test_empty_view_still_audited() {
        let projector = AccessProjector::new(Arc::new(MemoryStore::new()));
        let outcome = projector
            .view_patients(&session(Role::Doctor), ViewMode::Raw)
            .await
            .unwrap();
        assert!(outcome.value.is_empty());
        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.events[0].action, AuditAction::ViewPatients);
    }

    #[test]
    fn test_view_mode_parse() {
        assert_eq!("Anonymized".parse::<ViewMode>().unwrap(), ViewMode::Anonymized);
        assert_eq!("raw".parse::<ViewMode>().unwrap(), ViewMode::Raw);
        assert!("masked".parse::<ViewMode>().is_err());
    }
}
