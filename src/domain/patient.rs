//! Patient record types
//!
//! A patient row carries the raw identity, the free-text diagnosis, the
//! optional masked projection written by anonymization and the optional
//! ciphertext written at creation. The store hands out narrower row shapes
//! for the doctor and receptionist views so raw values never leave the
//! store on those paths.

use crate::domain::errors::CarevaultError;
use crate::domain::ids::PatientId;
use crate::domain::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Input for the add-patient operation
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub name: String,
    pub contact: String,
    pub diagnosis: String,

    /// Also store AES-GCM ciphertext of name and contact
    pub encrypt: bool,
}

impl NewPatient {
    /// Reject blank fields before any store call
    ///
    /// # Errors
    ///
    /// Returns [`CarevaultError::Validation`] naming the first blank field.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("name", &self.name),
            ("contact", &self.contact),
            ("diagnosis", &self.diagnosis),
        ] {
            if value.trim().is_empty() {
                return Err(CarevaultError::Validation(format!(
                    "Patient {field} is required"
                )));
            }
        }
        Ok(())
    }
}

/// Ciphertext pair stored alongside the raw identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedIdentity {
    pub name: String,
    pub contact: String,
}

/// Fully prepared row handed to the store on insert
#[derive(Debug, Clone)]
pub struct PatientInsert {
    pub name: String,
    pub contact: String,
    pub diagnosis: String,
    pub encrypted: Option<EncryptedIdentity>,
    pub date_added: DateTime<Utc>,
    pub data_retention_date: NaiveDate,
}

/// Complete stored patient row (admin view and backup)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientRecord {
    pub patient_id: PatientId,
    pub name: String,
    pub contact: String,
    pub diagnosis: String,
    pub anonymized_name: Option<String>,
    pub anonymized_contact: Option<String>,
    pub encrypted_name: Option<String>,
    pub encrypted_contact: Option<String>,
    pub date_added: DateTime<Utc>,
    pub data_retention_date: NaiveDate,
    pub is_anonymized: bool,
}

/// Row shape returned for the doctor view
///
/// Only rows with `is_anonymized = true` are produced, so both masked
/// fields are always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnonymizedPatientRow {
    pub patient_id: PatientId,
    pub anonymized_name: String,
    pub anonymized_contact: String,
    pub diagnosis: String,
    pub date_added: DateTime<Utc>,
}

/// Identifier and creation time only (receptionist view, recent additions)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PatientSummaryRow {
    pub patient_id: PatientId,
    pub date_added: DateTime<Utc>,
}

/// Fields the anonymizer needs from a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnonymizationCandidate {
    pub patient_id: PatientId,
    pub contact: String,
}

/// Masked values to write for one patient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnonymizationUpdate {
    pub patient_id: PatientId,
    pub anonymized_name: String,
    pub anonymized_contact: String,
}

/// Row past its retention deadline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpiredPatient {
    pub patient_id: PatientId,
    pub date_added: DateTime<Utc>,
    pub data_retention_date: NaiveDate,
}

/// Aggregate patient counts for the overview
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PatientCounts {
    pub total: i64,
    pub anonymized: i64,
    pub expired: i64,
    pub encrypted: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, contact: &str, diagnosis: &str) -> NewPatient {
        NewPatient {
            name: name.to_string(),
            contact: contact.to_string(),
            diagnosis: diagnosis.to_string(),
            encrypt: false,
        }
    }

    #[test]
    fn test_validate_accepts_complete_input() {
        assert!(input("Jane Roe", "555-0100", "Flu").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        let err = input("Jane Roe", "   ", "Flu").validate().unwrap_err();
        assert!(matches!(err, CarevaultError::Validation(_)));
        assert!(err.to_string().contains("contact"));

        let err = input("", "555-0100", "Flu").validate().unwrap_err();
        assert!(err.to_string().contains("name"));

        let err = input("Jane Roe", "555-0100", "\n").validate().unwrap_err();
        assert!(err.to_string().contains("diagnosis"));
    }
}
