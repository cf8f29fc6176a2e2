//! Dashboard command table
//!
//! Every user action is one [`Command`]. The table below fixes, per
//! command, the roles allowed to run it and whether data-processing consent
//! must have been given first.

use crate::core::access::{PatientView, ViewMode};
use crate::core::analytics::{ActivityReport, Overview};
use crate::core::export::BackupFiles;
use crate::core::records::RevealedIdentity;
use crate::domain::{
    AnonymizationUpdate, AuditEntry, AuditFilter, ExpiredPatient, NewPatient, PatientId, Role,
};
use std::path::PathBuf;

const ALL_ROLES: &[Role] = &[Role::Admin, Role::Doctor, Role::Receptionist];
const ADMIN_ONLY: &[Role] = &[Role::Admin];
const CLINICAL: &[Role] = &[Role::Admin, Role::Doctor];
const INTAKE: &[Role] = &[Role::Admin, Role::Receptionist];

/// A user action with its typed input
#[derive(Debug, Clone)]
pub enum Command {
    GiveConsent,
    Logout,
    AddPatient(NewPatient),
    ViewPatients { mode: ViewMode },
    ExportPatients { mode: ViewMode },
    AnonymizePatient(PatientId),
    AnonymizeAll,
    RevealPatient(PatientId),
    ListExpired,
    PurgeExpired,
    ViewAudit(AuditFilter),
    ExportAudit(AuditFilter),
    Analytics,
    Overview,
    Backup,
}

impl Command {
    /// Operation name used in denials and logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::GiveConsent => "give consent",
            Command::Logout => "logout",
            Command::AddPatient(_) => "add patient",
            Command::ViewPatients { .. } => "view patients",
            Command::ExportPatients { .. } => "export patients",
            Command::AnonymizePatient(_) => "anonymize patient",
            Command::AnonymizeAll => "anonymize all patients",
            Command::RevealPatient(_) => "decrypt patient",
            Command::ListExpired => "list expired records",
            Command::PurgeExpired => "purge expired records",
            Command::ViewAudit(_) => "view audit log",
            Command::ExportAudit(_) => "export audit log",
            Command::Analytics => "analytics",
            Command::Overview => "overview",
            Command::Backup => "system backup",
        }
    }

    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Command::GiveConsent
            | Command::Logout
            | Command::ViewPatients { .. }
            | Command::Overview => ALL_ROLES,
            Command::AddPatient(_) => INTAKE,
            Command::ExportPatients { .. } => CLINICAL,
            Command::AnonymizePatient(_)
            | Command::AnonymizeAll
            | Command::RevealPatient(_)
            | Command::ListExpired
            | Command::PurgeExpired
            | Command::ViewAudit(_)
            | Command::ExportAudit(_)
            | Command::Analytics
            | Command::Backup => ADMIN_ONLY,
        }
    }

    pub fn requires_consent(&self) -> bool {
        !matches!(self, Command::GiveConsent | Command::Logout)
    }
}

/// Result of a dispatched command
#[derive(Debug, Clone)]
pub enum CommandOutput {
    ConsentRecorded,
    LoggedOut,
    PatientAdded(PatientId),
    Patients(PatientView),
    Exported { path: PathBuf, rows: usize },
    Anonymized(Option<AnonymizationUpdate>),
    BulkAnonymized(u64),
    Revealed(RevealedIdentity),
    Expired(Vec<ExpiredPatient>),
    Purged(u64),
    AuditLog(Vec<AuditEntry>),
    Activity(ActivityReport),
    Overview(Overview),
    Backup(BackupFiles),
}
