//! Shared fixtures for the dashboard integration tests

#![allow(dead_code)]

use carevault::adapters::database::Stores;
use carevault::adapters::memory::MemoryStore;
use carevault::core::dashboard::{Command, CommandOutput, Dashboard, DashboardSettings};
use carevault::core::encryption::{FieldCipher, DEVELOPMENT_KEY};
use carevault::core::export::CsvExporter;
use carevault::core::retention::RetentionPolicy;
use carevault::domain::{AuditEntry, AuditFilter, FixedClock, NewPatient, PatientId, SessionContext};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use tempfile::TempDir;

pub const ADMIN: (&str, &str) = ("admin", "admin123");
pub const DOCTOR: (&str, &str) = ("dr_bob", "doc123");
pub const RECEPTIONIST: (&str, &str) = ("alice_recep", "rec123");

pub struct Harness {
    pub dashboard: Dashboard,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
    pub exports: TempDir,
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap()
}

/// Bootstrapped in-memory dashboard on a fixed clock
pub async fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(start_time()));
    let exports = TempDir::new().unwrap();

    let settings = DashboardSettings {
        policy: RetentionPolicy::default(),
        exporter: CsvExporter::new(exports.path()),
        audit_limit: 100,
    };
    let dashboard = Dashboard::new(
        Stores::from_backend(store.clone()),
        FieldCipher::from_base64_key(DEVELOPMENT_KEY).unwrap(),
        settings,
        clock.clone(),
    );
    dashboard.bootstrap().await.unwrap();

    Harness {
        dashboard,
        store,
        clock,
        exports,
    }
}

impl Harness {
    /// Log in and give consent
    pub async fn session(&self, (username, password): (&str, &str)) -> SessionContext {
        let mut session = self
            .dashboard
            .login(username, password)
            .await
            .unwrap()
            .expect("default account should authenticate");
        self.dashboard
            .execute(&mut session, Command::GiveConsent)
            .await
            .unwrap();
        session
    }

    pub async fn add(&self, session: &mut SessionContext, patient: NewPatient) -> PatientId {
        match self
            .dashboard
            .execute(session, Command::AddPatient(patient))
            .await
            .unwrap()
        {
            CommandOutput::PatientAdded(id) => id,
            other => panic!("unexpected output: {other:?}"),
        }
    }

    /// Full audit log, newest first
    pub async fn audit_log(&self) -> Vec<AuditEntry> {
        let mut admin = self.session(ADMIN).await;
        match self
            .dashboard
            .execute(&mut admin, Command::ViewAudit(AuditFilter::default()))
            .await
            .unwrap()
        {
            CommandOutput::AuditLog(entries) => entries,
            other => panic!("unexpected output: {other:?}"),
        }
    }
}

pub fn patient(name: &str, contact: &str, diagnosis: &str) -> NewPatient {
    NewPatient {
        name: name.to_string(),
        contact: contact.to_string(),
        diagnosis: diagnosis.to_string(),
        encrypt: false,
    }
}
