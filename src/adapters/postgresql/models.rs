//! Row mapping between PostgreSQL and domain types

use crate::domain::{
    AnonymizationCandidate, AnonymizedPatientRow, AuditEntry, CarevaultError, ExpiredPatient,
    PatientId, PatientRecord, PatientSummaryRow, Result, Role, UserId, UserRecord,
};
use std::str::FromStr;
use tokio_postgres::Row;

pub(crate) const PATIENT_COLUMNS: &str = "patient_id, name, contact, diagnosis, \
     anonymized_name, anonymized_contact, encrypted_name, encrypted_contact, \
     date_added, data_retention_date, is_anonymized";

fn column<'a, T>(row: &'a Row, name: &str) -> Result<T>
where
    T: tokio_postgres::types::FromSql<'a>,
{
    row.try_get(name)
        .map_err(|e| CarevaultError::Database(format!("Failed to read column '{name}': {e}")))
}

fn role_column(row: &Row, name: &str) -> Result<Option<Role>> {
    let raw: Option<String> = column(row, name)?;
    raw.map(|r| Role::from_str(&r).map_err(CarevaultError::Database))
        .transpose()
}

pub(crate) fn patient_from_row(row: &Row) -> Result<PatientRecord> {
    Ok(PatientRecord {
        patient_id: PatientId::new(column(row, "patient_id")?),
        name: column(row, "name")?,
        contact: column(row, "contact")?,
        diagnosis: column(row, "diagnosis")?,
        anonymized_name: column(row, "anonymized_name")?,
        anonymized_contact: column(row, "anonymized_contact")?,
        encrypted_name: column(row, "encrypted_name")?,
        encrypted_contact: column(row, "encrypted_contact")?,
        date_added: column(row, "date_added")?,
        data_retention_date: column(row, "data_retention_date")?,
        is_anonymized: column(row, "is_anonymized")?,
    })
}

pub(crate) fn anonymized_from_row(row: &Row) -> Result<AnonymizedPatientRow> {
    Ok(AnonymizedPatientRow {
        patient_id: PatientId::new(column(row, "patient_id")?),
        anonymized_name: column(row, "anonymized_name")?,
        anonymized_contact: column(row, "anonymized_contact")?,
        diagnosis: column(row, "diagnosis")?,
        date_added: column(row, "date_added")?,
    })
}

pub(crate) fn summary_from_row(row: &Row) -> Result<PatientSummaryRow> {
    Ok(PatientSummaryRow {
        patient_id: PatientId::new(column(row, "patient_id")?),
        date_added: column(row, "date_added")?,
    })
}

pub(crate) fn candidate_from_row(row: &Row) -> Result<AnonymizationCandidate> {
    Ok(AnonymizationCandidate {
        patient_id: PatientId::new(column(row, "patient_id")?),
        contact: column(row, "contact")?,
    })
}

pub(crate) fn expired_from_row(row: &Row) -> Result<ExpiredPatient> {
    Ok(ExpiredPatient {
        patient_id: PatientId::new(column(row, "patient_id")?),
        date_added: column(row, "date_added")?,
        data_retention_date: column(row, "data_retention_date")?,
    })
}

pub(crate) fn user_from_row(row: &Row) -> Result<UserRecord> {
    let role = role_column(row, "role")?
        .ok_or_else(|| CarevaultError::Database("users.role is NULL".to_string()))?;
    Ok(UserRecord {
        user_id: UserId::new(column(row, "user_id")?),
        username: column(row, "username")?,
        password_digest: column(row, "password")?,
        role,
        created_at: column(row, "created_at")?,
    })
}

pub(crate) fn audit_entry_from_row(row: &Row) -> Result<AuditEntry> {
    let user_id: Option<i64> = column(row, "user_id")?;
    Ok(AuditEntry {
        log_id: column(row, "log_id")?,
        user_id: user_id.map(UserId::new),
        username: column(row, "username")?,
        role: role_column(row, "role")?,
        action: column(row, "action")?,
        timestamp: column(row, "timestamp")?,
        details: column(row, "details")?,
    })
}
