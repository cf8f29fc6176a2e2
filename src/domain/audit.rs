//! Audit event types

use crate::domain::ids::UserId;
use crate::domain::role::Role;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;

/// Known audit action labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AuditAction {
    Login,
    FailedLogin,
    Logout,
    GdprConsent,
    AddPatient,
    ViewPatients,
    AnonymizeData,
    BulkAnonymization,
    DataRetention,
    DecryptData,
    Export,
    SystemBackup,
}

impl AuditAction {
    pub const ALL: [AuditAction; 12] = [
        AuditAction::Login,
        AuditAction::FailedLogin,
        AuditAction::Logout,
        AuditAction::GdprConsent,
        AuditAction::AddPatient,
        AuditAction::ViewPatients,
        AuditAction::AnonymizeData,
        AuditAction::BulkAnonymization,
        AuditAction::DataRetention,
        AuditAction::DecryptData,
        AuditAction::Export,
        AuditAction::SystemBackup,
    ];

    /// Label stored in the `action` column
    pub fn label(self) -> &'static str {
        match self {
            AuditAction::Login => "Login",
            AuditAction::FailedLogin => "Failed Login",
            AuditAction::Logout => "Logout",
            AuditAction::GdprConsent => "GDPR Consent",
            AuditAction::AddPatient => "Add Patient",
            AuditAction::ViewPatients => "View Patients",
            AuditAction::AnonymizeData => "Anonymize Data",
            AuditAction::BulkAnonymization => "Bulk Anonymization",
            AuditAction::DataRetention => "Data Retention",
            AuditAction::DecryptData => "Decrypt Data",
            AuditAction::Export => "Export",
            AuditAction::SystemBackup => "System Backup",
        }
    }

    /// Parse a stored label back into an action
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.label() == label)
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Event produced by an operation, not yet stamped or persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditEvent {
    pub user_id: Option<UserId>,
    pub role: Option<Role>,
    pub action: AuditAction,
    pub details: String,
}

impl NewAuditEvent {
    pub fn new(
        user_id: Option<UserId>,
        role: Option<Role>,
        action: AuditAction,
        details: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            role,
            action,
            details: details.into(),
        }
    }

    /// Event with no actor (failed login)
    pub fn anonymous(action: AuditAction, details: impl Into<String>) -> Self {
        Self::new(None, None, action, details)
    }
}

/// Value produced by an operation plus the audit events it owes
///
/// Operations never write audit rows themselves; the dispatcher records
/// `events` after the operation succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub value: T,
    pub events: Vec<NewAuditEvent>,
}

impl<T> Outcome<T> {
    pub fn new(value: T, event: NewAuditEvent) -> Self {
        Self {
            value,
            events: vec![event],
        }
    }

    /// Outcome with nothing to audit
    pub fn silent(value: T) -> Self {
        Self {
            value,
            events: Vec::new(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            events: self.events,
        }
    }
}

/// Event ready for insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditInsert {
    pub user_id: Option<UserId>,
    pub role: Option<Role>,
    pub action: String,
    pub timestamp: DateTime<Utc>,
    pub details: String,
}

/// Stored audit row joined with the actor's username
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    pub log_id: i64,
    pub user_id: Option<UserId>,
    pub username: Option<String>,
    pub role: Option<Role>,
    pub action: String,
    pub timestamp: DateTime<Utc>,
    pub details: String,
}

/// Filter for the audit log view
///
/// Entries are always returned most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditFilter {
    pub action: Option<AuditAction>,

    /// Calendar date in UTC
    pub date: Option<NaiveDate>,

    /// Maximum rows; `None` returns everything
    pub limit: Option<usize>,
}

impl AuditFilter {
    pub fn latest(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn matches(&self, action: &str, timestamp: DateTime<Utc>) -> bool {
        self.action.map_or(true, |a| a.label() == action)
            && self.date.map_or(true, |d| timestamp.date_naive() == d)
    }
}

/// Number of events per action label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionCount {
    pub action: String,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_labels_round_trip() {
        for action in AuditAction::ALL {
            assert_eq!(AuditAction::from_label(action.label()), Some(action));
        }
        assert_eq!(AuditAction::from_label("Shutdown"), None);
    }

    #[test]
    fn test_filter_matches_action_and_date() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 14, 23, 59, 0).unwrap();
        let filter = AuditFilter {
            action: Some(AuditAction::Login),
            date: NaiveDate::from_ymd_opt(2025, 3, 14),
            limit: None,
        };

        assert!(filter.matches("Login", ts));
        assert!(!filter.matches("Logout", ts));
        assert!(!filter.matches("Login", ts + chrono::Duration::minutes(2)));
        assert!(AuditFilter::default().matches("anything", ts));
    }
}
