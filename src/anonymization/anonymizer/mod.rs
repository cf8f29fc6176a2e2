//! Masking functions
//!
//! Both functions are total: they never fail and never look up anything.

pub mod contact_mask;
pub mod pseudonym;

pub use contact_mask::anonymize_contact;
pub use pseudonym::anonymize_name;

use crate::domain::{AnonymizationCandidate, AnonymizationUpdate};

/// Masked values for one candidate row
pub fn masked_update(candidate: &AnonymizationCandidate) -> AnonymizationUpdate {
    AnonymizationUpdate {
        patient_id: candidate.patient_id,
        anonymized_name: anonymize_name("", candidate.patient_id),
        anonymized_contact: anonymize_contact(&candidate.contact),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PatientId;

    #[test]
    fn test_masked_update() {
        let candidate = AnonymizationCandidate {
            patient_id: PatientId::new(42),
            contact: "+44 20 7946 0958".to_string(),
        };

        let update = masked_update(&candidate);
        assert_eq!(update.patient_id, PatientId::new(42));
        assert_eq!(update.anonymized_name, "ANON_0042");
        assert_eq!(update.anonymized_contact, "XXX-XXX-0958");
    }
}
