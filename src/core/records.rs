//! Patient record creation and decryption

use crate::adapters::database::traits::PatientStore;
use crate::core::encryption::FieldCipher;
use crate::core::retention::RetentionPolicy;
use crate::domain::{
    AuditAction, Clock, CarevaultError, EncryptedIdentity, NewPatient, Outcome, PatientId,
    PatientInsert, Result, SessionContext,
};
use std::sync::Arc;

/// Decrypted identity of one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealedIdentity {
    pub patient_id: PatientId,
    pub name: String,
    pub contact: String,
}

/// Writes new records and reveals encrypted identity
#[derive(Clone)]
pub struct PatientRecords {
    patients: Arc<dyn PatientStore>,
    cipher: FieldCipher,
    policy: RetentionPolicy,
    clock: Arc<dyn Clock>,
}

impl PatientRecords {
    pub fn new(
        patients: Arc<dyn PatientStore>,
        cipher: FieldCipher,
        policy: RetentionPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            patients,
            cipher,
            policy,
            clock,
        }
    }

    /// Insert a new record
    ///
    /// The retention date is fixed here from the creation time. When
    /// `encrypt` is set the name and contact are also stored as ciphertext.
    ///
    /// # Errors
    ///
    /// Returns [`CarevaultError::Validation`] for a blank field, before the
    /// store is touched.
    pub async fn add_patient(
        &self,
        session: &SessionContext,
        input: NewPatient,
    ) -> Result<Outcome<PatientId>> {
        input.validate()?;

        let encrypted = if input.encrypt {
            Some(EncryptedIdentity {
                name: self.cipher.encrypt(&input.name)?,
                contact: self.cipher.encrypt(&input.contact)?,
            })
        } else {
            None
        };

        let date_added = self.clock.now();
        let insert = PatientInsert {
            name: input.name,
            contact: input.contact,
            diagnosis: input.diagnosis,
            encrypted,
            date_added,
            data_retention_date: self.policy.compute_deadline(date_added),
        };

        let patient_id = self.patients.insert_patient(insert).await?;
        tracing::info!(patient_id = %patient_id, encrypted = input.encrypt, "Patient added");

        Ok(Outcome::new(
            patient_id,
            session.event(
                AuditAction::AddPatient,
                format!("Added patient ID: {patient_id}"),
            ),
        ))
    }

    /// Decrypt the stored ciphertext of one record
    ///
    /// # Errors
    ///
    /// Returns [`CarevaultError::NotFound`] if the record does not exist or
    /// was stored without encryption, and [`CarevaultError::Decode`] if the
    /// ciphertext fails authentication.
    pub async fn reveal(
        &self,
        session: &SessionContext,
        patient_id: PatientId,
    ) -> Result<Outcome<RevealedIdentity>> {
        let encrypted = self
            .patients
            .find_encrypted(patient_id)
            .await?
            .ok_or_else(|| {
                CarevaultError::NotFound(format!("No encrypted data for patient {patient_id}"))
            })?;

        let revealed = RevealedIdentity {
            patient_id,
            name: self.cipher.decrypt(&encrypted.name)?,
            contact: self.cipher.decrypt(&encrypted.contact)?,
        };

        tracing::info!(patient_id = %patient_id, "Encrypted identity revealed");

        Ok(Outcome::new(
            revealed,
            session.event(
                AuditAction::DecryptData,
                format!("Decrypted patient ID: {patient_id}"),
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::core::encryption::DEVELOPMENT_KEY;
    use crate::domain::{FixedClock, Identity, Role, UserId};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn records(store: Arc<MemoryStore>) -> PatientRecords {
        PatientRecords::new(
            store,
            FieldCipher::from_base64_key(DEVELOPMENT_KEY).unwrap(),
            RetentionPolicy::default(),
            Arc::new(FixedClock::new(
                Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap(),
            )),
        )
    }

    fn receptionist() -> SessionContext {
        SessionContext::new(
            Identity {
                user_id: UserId::new(3),
                username: "alice_recep".to_string(),
                role: Role::Receptionist,
            },
            Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap(),
        )
    }

    fn input(encrypt: bool) -> NewPatient {
        NewPatient {
            name: "Jane Roe".to_string(),
            contact: "555-123-4567".to_string(),
            diagnosis: "Fracture".to_string(),
            encrypt,
        }
    }

    #[tokio::test]
    async fn test_add_sets_retention_date() {
        let store = Arc::new(MemoryStore::new());
        let outcome = records(store.clone())
            .add_patient(&receptionist(), input(false))
            .await
            .unwrap();

        let row = store.patient(outcome.value).unwrap();
        assert_eq!(
            row.data_retention_date,
            NaiveDate::from_ymd_opt(2025, 4, 15).unwrap()
        );
        assert!(row.encrypted_name.is_none());
        assert!(!row.is_anonymized);
        assert_eq!(outcome.events[0].details, "Added patient ID: 1");
    }

    #[tokio::test]
    async fn test_validation_precedes_store() {
        let store = Arc::new(MemoryStore::new());
        store.set_unavailable(true);
        let mut bad = input(false);
        bad.diagnosis = "  ".to_string();

        let err = records(store)
            .add_patient(&receptionist(), bad)
            .await
            .unwrap_err();
        assert!(matches!(err, CarevaultError::Validation(_)));
    }

    #[tokio::test]
    async fn test_reveal() {
        let store = Arc::new(MemoryStore::new());
        let records = records(store.clone());
        let session = receptionist();

        let plain = records.add_patient(&session, input(false)).await.unwrap().value;
        let sealed = records.add_patient(&session, input(true)).await.unwrap().value;

        let row = store.patient(sealed).unwrap();
        assert_ne!(row.encrypted_name.as_deref(), Some("Jane Roe"));

        let revealed = records.reveal(&session, sealed).await.unwrap();
        assert_eq!(revealed.value.name, "Jane Roe");
        assert_eq!(revealed.value.contact, "555-123-4567");
        assert_eq!(revealed.events[0].action, AuditAction::DecryptData);

        assert!(matches!(
            records.reveal(&session, plain).await,
            Err(CarevaultError::NotFound(_))
        ));
    }
}
