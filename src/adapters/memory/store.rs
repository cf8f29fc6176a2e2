//! In-memory store
//!
//! Multi-row operations stage their changes on a copy of the tables and
//! swap it in only when every row succeeded, matching the all-or-nothing
//! behaviour of the PostgreSQL transactions. Faults can be injected to
//! exercise that path.

use crate::adapters::database::traits::{AuditStore, DatabaseClient, PatientStore, UserStore};
use crate::core::retention::RetentionPolicy;
use crate::domain::{
    ActionCount, AnonymizationCandidate, AnonymizationUpdate, AnonymizedPatientRow, AuditEntry,
    AuditFilter, AuditInsert, CarevaultError, EncryptedIdentity, ExpiredPatient, NewUser,
    PatientCounts, PatientId, PatientInsert, PatientRecord, PatientSummaryRow, Result, Role,
    UserId, UserRecord,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone)]
struct LogRow {
    log_id: i64,
    user_id: Option<UserId>,
    role: Option<Role>,
    action: String,
    timestamp: DateTime<Utc>,
    details: String,
}

#[derive(Debug, Clone, Default)]
struct Tables {
    users: Vec<UserRecord>,
    patients: BTreeMap<PatientId, PatientRecord>,
    logs: Vec<LogRow>,
    next_user_id: i64,
    next_patient_id: i64,
    next_log_id: i64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

#[derive(Debug, Default)]
struct Faults {
    unavailable: bool,
    fail_anonymization_after: Option<usize>,
    fail_purge: bool,
    fail_audit: bool,
}

/// Process-local implementation of every store trait
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    faults: Mutex<Faults>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>> {
        if self.faults().unavailable {
            return Err(CarevaultError::Connection(
                "in-memory store marked unavailable".to_string(),
            ));
        }
        Ok(self.tables.lock().unwrap_or_else(|e| e.into_inner()))
    }

    fn faults(&self) -> MutexGuard<'_, Faults> {
        self.faults.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make every subsequent call fail with a connection error
    pub fn set_unavailable(&self, unavailable: bool) {
        self.faults().unavailable = unavailable;
    }

    /// Fail the next multi-row anonymization after `rows` rows were staged
    pub fn fail_anonymization_after(&self, rows: usize) {
        self.faults().fail_anonymization_after = Some(rows);
    }

    /// Fail the next retention purge after staging the deletes
    pub fn fail_next_purge(&self) {
        self.faults().fail_purge = true;
    }

    /// Fail every audit append until cleared
    pub fn set_audit_failure(&self, fail: bool) {
        self.faults().fail_audit = fail;
    }

    /// Number of stored audit events
    pub fn audit_len(&self) -> usize {
        self.tables.lock().unwrap_or_else(|e| e.into_inner()).logs.len()
    }

    /// Stored row for direct inspection
    pub fn patient(&self, id: PatientId) -> Option<PatientRecord> {
        self.tables
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .patients
            .get(&id)
            .cloned()
    }
}

#[async_trait]
impl DatabaseClient for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn test_connection(&self) -> Result<()> {
        self.tables().map(|_| ())
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.tables().map(|_| ())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn count_users(&self) -> Result<i64> {
        Ok(self.tables()?.users.len() as i64)
    }

    async fn insert_users(&self, users: &[NewUser]) -> Result<()> {
        let mut tables = self.tables()?;
        let mut staged = tables.clone();

        for user in users {
            if staged.users.iter().any(|u| u.username == user.username) {
                return Err(CarevaultError::Integrity(format!(
                    "duplicate username '{}'",
                    user.username
                )));
            }
            let user_id = UserId::new(Tables::next_id(&mut staged.next_user_id));
            staged.users.push(UserRecord {
                user_id,
                username: user.username.clone(),
                password_digest: user.password_digest.clone(),
                role: user.role,
                created_at: Utc::now(),
            });
        }

        *tables = staged;
        Ok(())
    }

    async fn find_by_credentials(
        &self,
        username: &str,
        password_digest: &str,
    ) -> Result<Option<UserRecord>> {
        Ok(self
            .tables()?
            .users
            .iter()
            .find(|u| u.username == username && u.password_digest == password_digest)
            .cloned())
    }
}

#[async_trait]
impl PatientStore for MemoryStore {
    async fn insert_patient(&self, patient: PatientInsert) -> Result<PatientId> {
        let mut tables = self.tables()?;
        let patient_id = PatientId::new(Tables::next_id(&mut tables.next_patient_id));
        let (encrypted_name, encrypted_contact) = match patient.encrypted {
            Some(enc) => (Some(enc.name), Some(enc.contact)),
            None => (None, None),
        };

        tables.patients.insert(
            patient_id,
            PatientRecord {
                patient_id,
                name: patient.name,
                contact: patient.contact,
                diagnosis: patient.diagnosis,
                anonymized_name: None,
                anonymized_contact: None,
                encrypted_name,
                encrypted_contact,
                date_added: patient.date_added,
                data_retention_date: patient.data_retention_date,
                is_anonymized: false,
            },
        );
        Ok(patient_id)
    }

    async fn list_full(&self) -> Result<Vec<PatientRecord>> {
        Ok(self.tables()?.patients.values().rev().cloned().collect())
    }

    async fn list_anonymized(&self) -> Result<Vec<AnonymizedPatientRow>> {
        Ok(self
            .tables()?
            .patients
            .values()
            .rev()
            .filter(|p| p.is_anonymized)
            .filter_map(|p| {
                Some(AnonymizedPatientRow {
                    patient_id: p.patient_id,
                    anonymized_name: p.anonymized_name.clone()?,
                    anonymized_contact: p.anonymized_contact.clone()?,
                    diagnosis: p.diagnosis.clone(),
                    date_added: p.date_added,
                })
            })
            .collect())
    }

    async fn list_summaries(&self, limit: Option<usize>) -> Result<Vec<PatientSummaryRow>> {
        Ok(self
            .tables()?
            .patients
            .values()
            .rev()
            .take(limit.unwrap_or(usize::MAX))
            .map(|p| PatientSummaryRow {
                patient_id: p.patient_id,
                date_added: p.date_added,
            })
            .collect())
    }

    async fn find_candidate(&self, id: PatientId) -> Result<Option<AnonymizationCandidate>> {
        Ok(self
            .tables()?
            .patients
            .get(&id)
            .map(|p| AnonymizationCandidate {
                patient_id: p.patient_id,
                contact: p.contact.clone(),
            }))
    }

    async fn pending_candidates(&self) -> Result<Vec<AnonymizationCandidate>> {
        Ok(self
            .tables()?
            .patients
            .values()
            .filter(|p| !p.is_anonymized)
            .map(|p| AnonymizationCandidate {
                patient_id: p.patient_id,
                contact: p.contact.clone(),
            })
            .collect())
    }

    async fn apply_anonymizations(&self, updates: &[AnonymizationUpdate]) -> Result<u64> {
        let mut tables = self.tables()?;
        let fail_after = self.faults().fail_anonymization_after.take();
        let mut staged = tables.clone();
        let mut changed = 0u64;

        for (index, update) in updates.iter().enumerate() {
            if fail_after == Some(index) {
                return Err(CarevaultError::Database(format!(
                    "injected fault while anonymizing patient {}",
                    update.patient_id
                )));
            }
            if let Some(row) = staged.patients.get_mut(&update.patient_id) {
                row.anonymized_name = Some(update.anonymized_name.clone());
                row.anonymized_contact = Some(update.anonymized_contact.clone());
                row.is_anonymized = true;
                changed += 1;
            }
        }

        *tables = staged;
        Ok(changed)
    }

    async fn find_encrypted(&self, id: PatientId) -> Result<Option<EncryptedIdentity>> {
        Ok(self.tables()?.patients.get(&id).and_then(|p| {
            Some(EncryptedIdentity {
                name: p.encrypted_name.clone()?,
                contact: p.encrypted_contact.clone()?,
            })
        }))
    }

    async fn list_expired(&self, today: NaiveDate) -> Result<Vec<ExpiredPatient>> {
        Ok(self
            .tables()?
            .patients
            .values()
            .filter(|p| RetentionPolicy::is_expired(p.data_retention_date, today))
            .map(|p| ExpiredPatient {
                patient_id: p.patient_id,
                date_added: p.date_added,
                data_retention_date: p.data_retention_date,
            })
            .collect())
    }

    async fn purge_expired(&self, today: NaiveDate) -> Result<u64> {
        let mut tables = self.tables()?;
        let mut staged = tables.clone();
        let before = staged.patients.len();
        staged
            .patients
            .retain(|_, p| !RetentionPolicy::is_expired(p.data_retention_date, today));
        let deleted = (before - staged.patients.len()) as u64;

        if std::mem::take(&mut self.faults().fail_purge) {
            return Err(CarevaultError::Database(
                "injected fault while deleting expired patients".to_string(),
            ));
        }

        *tables = staged;
        Ok(deleted)
    }

    async fn counts(&self, today: NaiveDate) -> Result<PatientCounts> {
        let tables = self.tables()?;
        let mut counts = PatientCounts::default();
        for p in tables.patients.values() {
            counts.total += 1;
            counts.anonymized += i64::from(p.is_anonymized);
            counts.expired += i64::from(RetentionPolicy::is_expired(p.data_retention_date, today));
            counts.encrypted += i64::from(p.encrypted_name.is_some());
        }
        Ok(counts)
    }
}

#[async_trait]
impl AuditStore for MemoryStore {
    async fn append(&self, event: AuditInsert) -> Result<()> {
        if self.faults().fail_audit {
            return Err(CarevaultError::Database(
                "injected fault while appending audit event".to_string(),
            ));
        }
        let mut tables = self.tables()?;
        let log_id = Tables::next_id(&mut tables.next_log_id);
        tables.logs.push(LogRow {
            log_id,
            user_id: event.user_id,
            role: event.role,
            action: event.action,
            timestamp: event.timestamp,
            details: event.details,
        });
        Ok(())
    }

    async fn entries(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>> {
        let tables = self.tables()?;
        let usernames: HashMap<UserId, &str> = tables
            .users
            .iter()
            .map(|u| (u.user_id, u.username.as_str()))
            .collect();

        let mut rows: Vec<&LogRow> = tables
            .logs
            .iter()
            .filter(|l| filter.matches(&l.action, l.timestamp))
            .collect();
        rows.sort_by(|a, b| (b.timestamp, b.log_id).cmp(&(a.timestamp, a.log_id)));

        Ok(rows
            .into_iter()
            .take(filter.limit.unwrap_or(usize::MAX))
            .map(|l| AuditEntry {
                log_id: l.log_id,
                user_id: l.user_id,
                username: l
                    .user_id
                    .and_then(|id| usernames.get(&id))
                    .map(|name| name.to_string()),
                role: l.role,
                action: l.action.clone(),
                timestamp: l.timestamp,
                details: l.details.clone(),
            })
            .collect())
    }

    async fn timestamps_since(&self, since: DateTime<Utc>) -> Result<Vec<DateTime<Utc>>> {
        let mut stamps: Vec<DateTime<Utc>> = self
            .tables()?
            .logs
            .iter()
            .map(|l| l.timestamp)
            .filter(|ts| *ts >= since)
            .collect();
        stamps.sort();
        Ok(stamps)
    }

    async fn action_counts(&self) -> Result<Vec<ActionCount>> {
        let tables = self.tables()?;
        let mut counts: HashMap<&str, i64> = HashMap::new();
        for log in &tables.logs {
            *counts.entry(log.action.as_str()).or_default() += 1;
        }

        let mut result: Vec<ActionCount> = counts
            .into_iter()
            .map(|(action, count)| ActionCount {
                action: action.to_string(),
                count,
            })
            .collect();
        result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.action.cmp(&b.action)));
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn insert(day: u32) -> PatientInsert {
        let date_added = Utc.with_ymd_and_hms(2025, 1, day, 9, 0, 0).unwrap();
        PatientInsert {
            name: format!("Patient {day}"),
            contact: format!("555-010{day}"),
            diagnosis: "Observation".to_string(),
            encrypted: None,
            date_added,
            data_retention_date: (date_added + Duration::days(90)).date_naive(),
        }
    }

    fn update(id: i64) -> AnonymizationUpdate {
        AnonymizationUpdate {
            patient_id: PatientId::new(id),
            anonymized_name: format!("ANON_{id:04}"),
            anonymized_contact: "XXX-XXX-0000".to_string(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_monotonic() {
        let store = MemoryStore::new();
        let a = store.insert_patient(insert(1)).await.unwrap();
        let b = store.insert_patient(insert(2)).await.unwrap();
        assert!(b > a);

        let summaries = store.list_summaries(None).await.unwrap();
        assert_eq!(summaries[0].patient_id, b);
    }

    #[tokio::test]
    async fn test_failed_batch_leaves_rows_untouched() {
        let store = MemoryStore::new();
        for day in 1..=3 {
            store.insert_patient(insert(day)).await.unwrap();
        }

        store.fail_anonymization_after(2);
        let result = store
            .apply_anonymizations(&[update(1), update(2), update(3)])
            .await;
        assert!(result.is_err());
        assert!(store.list_anonymized().await.unwrap().is_empty());

        // Fault is one-shot
        assert_eq!(store.apply_anonymizations(&[update(1)]).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_counts_and_listing_share_the_expiry_boundary() {
        let store = MemoryStore::new();
        store.insert_patient(insert(1)).await.unwrap();
        let deadline = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();

        assert_eq!(store.counts(deadline).await.unwrap().expired, 0);
        assert!(store.list_expired(deadline).await.unwrap().is_empty());

        let next = deadline + Duration::days(1);
        assert_eq!(store.counts(next).await.unwrap().expired, 1);
        assert_eq!(store.list_expired(next).await.unwrap().len(), 1);
        assert_eq!(store.purge_expired(deadline).await.unwrap(), 0);
        assert_eq!(store.purge_expired(next).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_inserts_nothing() {
        let store = MemoryStore::new();
        let user = NewUser {
            username: "admin".to_string(),
            password_digest: "x".to_string(),
            role: Role::Admin,
        };
        let err = store
            .insert_users(&[user.clone(), user])
            .await
            .unwrap_err();
        assert!(matches!(err, CarevaultError::Integrity(_)));
        assert_eq!(store.count_users().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unavailable_store() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        assert!(matches!(
            store.test_connection().await,
            Err(CarevaultError::Connection(_))
        ));
        store.set_unavailable(false);
        assert!(store.test_connection().await.is_ok());
    }
}
