//! Store abstraction traits
//!
//! Every backend implements these traits over the `users`, `patients` and
//! `logs` tables. Operations that touch more than one row
//! ([`PatientStore::apply_anonymizations`], [`PatientStore::purge_expired`],
//! [`UserStore::insert_users`]) run in a single transaction: either every
//! row changes or none does.

use crate::domain::{
    ActionCount, AnonymizationCandidate, AnonymizationUpdate, AnonymizedPatientRow, AuditEntry,
    AuditFilter, AuditInsert, EncryptedIdentity, ExpiredPatient, NewUser, PatientCounts,
    PatientId, PatientInsert, PatientRecord, PatientSummaryRow, Result, UserRecord,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

/// Connection-level operations
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Short backend name for logs and status output
    fn backend_name(&self) -> &'static str;

    /// Test the store connection
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::CarevaultError::Connection`] if the store is unreachable.
    async fn test_connection(&self) -> Result<()>;

    /// Create the three tables and their indexes if missing
    async fn ensure_schema(&self) -> Result<()>;
}

/// Credential storage
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn count_users(&self) -> Result<i64>;

    /// Insert all accounts in one transaction
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::CarevaultError::Integrity`] on a duplicate username;
    /// no account is inserted in that case.
    async fn insert_users(&self, users: &[NewUser]) -> Result<()>;

    /// Exact, case-sensitive match on username and password digest
    async fn find_by_credentials(
        &self,
        username: &str,
        password_digest: &str,
    ) -> Result<Option<UserRecord>>;
}

/// Patient record storage
///
/// The three `list_*` methods return the row shape of one role's view;
/// the doctor and receptionist shapes never carry raw identity columns.
#[async_trait]
pub trait PatientStore: Send + Sync {
    async fn insert_patient(&self, patient: PatientInsert) -> Result<PatientId>;

    /// Every column of every row, newest id first
    async fn list_full(&self) -> Result<Vec<PatientRecord>>;

    /// Anonymized rows only, newest id first
    async fn list_anonymized(&self) -> Result<Vec<AnonymizedPatientRow>>;

    /// Identifier and creation time only, newest id first
    async fn list_summaries(&self, limit: Option<usize>) -> Result<Vec<PatientSummaryRow>>;

    async fn find_candidate(&self, id: PatientId) -> Result<Option<AnonymizationCandidate>>;

    /// Rows with `is_anonymized = false`, ascending id
    async fn pending_candidates(&self) -> Result<Vec<AnonymizationCandidate>>;

    /// Write masked values and set the flag for every update in one transaction
    ///
    /// Returns the number of rows changed.
    async fn apply_anonymizations(&self, updates: &[AnonymizationUpdate]) -> Result<u64>;

    async fn find_encrypted(&self, id: PatientId) -> Result<Option<EncryptedIdentity>>;

    /// Rows whose retention date is strictly before `today`
    async fn list_expired(&self, today: NaiveDate) -> Result<Vec<ExpiredPatient>>;

    /// Delete every row listed by [`PatientStore::list_expired`] in one transaction
    async fn purge_expired(&self, today: NaiveDate) -> Result<u64>;

    async fn counts(&self, today: NaiveDate) -> Result<PatientCounts>;
}

/// Append-only audit storage
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn append(&self, event: AuditInsert) -> Result<()>;

    /// Events joined with the actor's username, most recent first
    ///
    /// Events without an actor (failed logins) are included.
    async fn entries(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>>;

    /// Timestamps of events at or after `since`
    async fn timestamps_since(&self, since: DateTime<Utc>) -> Result<Vec<DateTime<Utc>>>;

    /// Event count per action label, most frequent first
    async fn action_counts(&self) -> Result<Vec<ActionCount>>;
}

/// One backend implementing every store trait
pub trait Backend: DatabaseClient + UserStore + PatientStore + AuditStore {}

impl<T> Backend for T where T: DatabaseClient + UserStore + PatientStore + AuditStore {}
