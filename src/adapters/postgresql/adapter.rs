//! PostgreSQL adapter implementing the store traits

use crate::adapters::database::traits::{AuditStore, DatabaseClient, PatientStore, UserStore};
use crate::adapters::postgresql::client::{map_db_error, PostgreSQLClient};
use crate::adapters::postgresql::models::{
    anonymized_from_row, audit_entry_from_row, candidate_from_row, expired_from_row,
    patient_from_row, summary_from_row, user_from_row, PATIENT_COLUMNS,
};
use crate::domain::{
    ActionCount, AnonymizationCandidate, AnonymizationUpdate, AnonymizedPatientRow, AuditEntry,
    AuditFilter, AuditInsert, EncryptedIdentity, ExpiredPatient, NewUser, PatientCounts,
    PatientId, PatientInsert, PatientRecord, PatientSummaryRow, Result, UserRecord,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

/// PostgreSQL implementation of the store traits
pub struct PostgreSQLAdapter {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLAdapter {
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

fn limit_param(limit: Option<usize>) -> Option<i64> {
    limit.map(|l| i64::try_from(l).unwrap_or(i64::MAX))
}

#[async_trait]
impl DatabaseClient for PostgreSQLAdapter {
    fn backend_name(&self) -> &'static str {
        "postgresql"
    }

    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.client.ensure_schema().await
    }
}

#[async_trait]
impl UserStore for PostgreSQLAdapter {
    async fn count_users(&self) -> Result<i64> {
        let conn = self.client.get_connection().await?;
        let row = conn
            .query_one("SELECT COUNT(*) FROM users", &[])
            .await
            .map_err(|e| map_db_error("Failed to count users", e))?;
        Ok(row.get(0))
    }

    async fn insert_users(&self, users: &[NewUser]) -> Result<()> {
        let mut conn = self.client.get_connection().await?;
        let tx = conn
            .transaction()
            .await
            .map_err(|e| map_db_error("Failed to begin transaction", e))?;

        for user in users {
            tx.execute(
                "INSERT INTO users (username, password, role) VALUES ($1, $2, $3)",
                &[&user.username, &user.password_digest, &user.role.as_str()],
            )
            .await
            .map_err(|e| map_db_error("Failed to insert user", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_db_error("Failed to commit users", e))
    }

    async fn find_by_credentials(
        &self,
        username: &str,
        password_digest: &str,
    ) -> Result<Option<UserRecord>> {
        let conn = self.client.get_connection().await?;
        let row = conn
            .query_opt(
                "SELECT user_id, username, password, role, created_at FROM users \
                 WHERE username = $1 AND password = $2",
                &[&username, &password_digest],
            )
            .await
            .map_err(|e| map_db_error("Failed to look up credentials", e))?;
        row.as_ref().map(user_from_row).transpose()
    }
}

#[async_trait]
impl PatientStore for PostgreSQLAdapter {
    async fn insert_patient(&self, patient: PatientInsert) -> Result<PatientId> {
        let conn = self.client.get_connection().await?;
        let (encrypted_name, encrypted_contact) = match &patient.encrypted {
            Some(enc) => (Some(enc.name.as_str()), Some(enc.contact.as_str())),
            None => (None, None),
        };

        let row = conn
            .query_one(
                "INSERT INTO patients (name, contact, diagnosis, encrypted_name, \
                 encrypted_contact, date_added, data_retention_date, is_anonymized) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE) RETURNING patient_id",
                &[
                    &patient.name,
                    &patient.contact,
                    &patient.diagnosis,
                    &encrypted_name,
                    &encrypted_contact,
                    &patient.date_added,
                    &patient.data_retention_date,
                ],
            )
            .await
            .map_err(|e| map_db_error("Failed to insert patient", e))?;

        Ok(PatientId::new(row.get(0)))
    }

    async fn list_full(&self) -> Result<Vec<PatientRecord>> {
        let conn = self.client.get_connection().await?;
        let query = format!("SELECT {PATIENT_COLUMNS} FROM patients ORDER BY patient_id DESC");
        let rows = conn
            .query(&query, &[])
            .await
            .map_err(|e| map_db_error("Failed to list patients", e))?;
        rows.iter().map(patient_from_row).collect()
    }

    async fn list_anonymized(&self) -> Result<Vec<AnonymizedPatientRow>> {
        let conn = self.client.get_connection().await?;
        let rows = conn
            .query(
                "SELECT patient_id, anonymized_name, anonymized_contact, diagnosis, date_added \
                 FROM patients WHERE is_anonymized = TRUE ORDER BY patient_id DESC",
                &[],
            )
            .await
            .map_err(|e| map_db_error("Failed to list anonymized patients", e))?;
        rows.iter().map(anonymized_from_row).collect()
    }

    async fn list_summaries(&self, limit: Option<usize>) -> Result<Vec<PatientSummaryRow>> {
        let conn = self.client.get_connection().await?;
        let rows = conn
            .query(
                "SELECT patient_id, date_added FROM patients \
                 ORDER BY patient_id DESC LIMIT $1",
                &[&limit_param(limit)],
            )
            .await
            .map_err(|e| map_db_error("Failed to list patient summaries", e))?;
        rows.iter().map(summary_from_row).collect()
    }

    async fn find_candidate(&self, id: PatientId) -> Result<Option<AnonymizationCandidate>> {
        let conn = self.client.get_connection().await?;
        let row = conn
            .query_opt(
                "SELECT patient_id, contact FROM patients WHERE patient_id = $1",
                &[&id.value()],
            )
            .await
            .map_err(|e| map_db_error("Failed to load patient", e))?;
        row.as_ref().map(candidate_from_row).transpose()
    }

    async fn pending_candidates(&self) -> Result<Vec<AnonymizationCandidate>> {
        let conn = self.client.get_connection().await?;
        let rows = conn
            .query(
                "SELECT patient_id, contact FROM patients \
                 WHERE is_anonymized = FALSE ORDER BY patient_id",
                &[],
            )
            .await
            .map_err(|e| map_db_error("Failed to list pending patients", e))?;
        rows.iter().map(candidate_from_row).collect()
    }

    async fn apply_anonymizations(&self, updates: &[AnonymizationUpdate]) -> Result<u64> {
        let mut conn = self.client.get_connection().await?;
        let tx = conn
            .transaction()
            .await
            .map_err(|e| map_db_error("Failed to begin transaction", e))?;

        let mut changed = 0;
        for update in updates {
            // Dropping `tx` on error rolls back every earlier update
            changed += tx
                .execute(
                    "UPDATE patients SET anonymized_name = $1, anonymized_contact = $2, \
                     is_anonymized = TRUE WHERE patient_id = $3",
                    &[
                        &update.anonymized_name,
                        &update.anonymized_contact,
                        &update.patient_id.value(),
                    ],
                )
                .await
                .map_err(|e| {
                    map_db_error(
                        &format!("Failed to anonymize patient {}", update.patient_id),
                        e,
                    )
                })?;
        }

        tx.commit()
            .await
            .map_err(|e| map_db_error("Failed to commit anonymization", e))?;
        Ok(changed)
    }

    async fn find_encrypted(&self, id: PatientId) -> Result<Option<EncryptedIdentity>> {
        let conn = self.client.get_connection().await?;
        let row = conn
            .query_opt(
                "SELECT encrypted_name, encrypted_contact FROM patients WHERE patient_id = $1",
                &[&id.value()],
            )
            .await
            .map_err(|e| map_db_error("Failed to load ciphertext", e))?;

        Ok(row.and_then(|row| {
            let name: Option<String> = row.get("encrypted_name");
            let contact: Option<String> = row.get("encrypted_contact");
            Some(EncryptedIdentity {
                name: name?,
                contact: contact?,
            })
        }))
    }

    async fn list_expired(&self, today: NaiveDate) -> Result<Vec<ExpiredPatient>> {
        let conn = self.client.get_connection().await?;
        let rows = conn
            .query(
                "SELECT patient_id, date_added, data_retention_date FROM patients \
                 WHERE data_retention_date < $1 ORDER BY patient_id",
                &[&today],
            )
            .await
            .map_err(|e| map_db_error("Failed to list expired patients", e))?;
        rows.iter().map(expired_from_row).collect()
    }

    async fn purge_expired(&self, today: NaiveDate) -> Result<u64> {
        let mut conn = self.client.get_connection().await?;
        let tx = conn
            .transaction()
            .await
            .map_err(|e| map_db_error("Failed to begin transaction", e))?;

        let deleted = tx
            .execute(
                "DELETE FROM patients WHERE data_retention_date < $1",
                &[&today],
            )
            .await
            .map_err(|e| map_db_error("Failed to delete expired patients", e))?;

        tx.commit()
            .await
            .map_err(|e| map_db_error("Failed to commit purge", e))?;
        Ok(deleted)
    }

    async fn counts(&self, today: NaiveDate) -> Result<PatientCounts> {
        let conn = self.client.get_connection().await?;
        let row = conn
            .query_one(
                "SELECT COUNT(*), \
                 COUNT(*) FILTER (WHERE is_anonymized), \
                 COUNT(*) FILTER (WHERE data_retention_date < $1), \
                 COUNT(*) FILTER (WHERE encrypted_name IS NOT NULL) \
                 FROM patients",
                &[&today],
            )
            .await
            .map_err(|e| map_db_error("Failed to count patients", e))?;

        Ok(PatientCounts {
            total: row.get(0),
            anonymized: row.get(1),
            expired: row.get(2),
            encrypted: row.get(3),
        })
    }
}

#[async_trait]
impl AuditStore for PostgreSQLAdapter {
    async fn append(&self, event: AuditInsert) -> Result<()> {
        let conn = self.client.get_connection().await?;
        let user_id = event.user_id.map(|id| id.value());
        let role = event.role.map(|r| r.as_str());
        conn.execute(
            "INSERT INTO logs (user_id, role, action, timestamp, details) \
             VALUES ($1, $2, $3, $4, $5)",
            &[
                &user_id,
                &role,
                &event.action,
                &event.timestamp,
                &event.details,
            ],
        )
        .await
        .map_err(|e| map_db_error("Failed to append audit event", e))?;
        Ok(())
    }

    async fn entries(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>> {
        let conn = self.client.get_connection().await?;
        let action = filter.action.map(|a| a.label());
        let rows = conn
            .query(
                "SELECT l.log_id, l.user_id, u.username, l.role, l.action, l.timestamp, l.details \
                 FROM logs l LEFT JOIN users u ON l.user_id = u.user_id \
                 WHERE ($1::TEXT IS NULL OR l.action = $1) \
                 AND ($2::DATE IS NULL OR (l.timestamp AT TIME ZONE 'UTC')::DATE = $2) \
                 ORDER BY l.timestamp DESC, l.log_id DESC \
                 LIMIT $3",
                &[&action, &filter.date, &limit_param(filter.limit)],
            )
            .await
            .map_err(|e| map_db_error("Failed to read audit log", e))?;
        rows.iter().map(audit_entry_from_row).collect()
    }

    async fn timestamps_since(&self, since: DateTime<Utc>) -> Result<Vec<DateTime<Utc>>> {
        let conn = self.client.get_connection().await?;
        let rows = conn
            .query(
                "SELECT timestamp FROM logs WHERE timestamp >= $1 ORDER BY timestamp",
                &[&since],
            )
            .await
            .map_err(|e| map_db_error("Failed to read audit timestamps", e))?;
        Ok(rows.iter().map(|row| row.get(0)).collect())
    }

    async fn action_counts(&self) -> Result<Vec<ActionCount>> {
        let conn = self.client.get_connection().await?;
        let rows = conn
            .query(
                "SELECT action, COUNT(*) FROM logs GROUP BY action \
                 ORDER BY COUNT(*) DESC, action",
                &[],
            )
            .await
            .map_err(|e| map_db_error("Failed to count audit actions", e))?;
        Ok(rows
            .iter()
            .map(|row| ActionCount {
                action: row.get(0),
                count: row.get(1),
            })
            .collect())
    }
}
