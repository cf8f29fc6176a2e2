//! Command dispatcher
//!
//! [`Dashboard`] owns every service and runs one [`Command`] at a time for
//! a session: consent gate, role gate, the operation itself, then the audit
//! events the operation produced.

use crate::adapters::database::{create_stores, Stores};
use crate::anonymization::AnonymizationEngine;
use crate::config::schema::CarevaultConfig;
use crate::core::access::AccessProjector;
use crate::core::analytics::Analytics;
use crate::core::audit::AuditLogger;
use crate::core::auth::{seed_default_accounts, Authenticator};
use crate::core::dashboard::command::{Command, CommandOutput};
use crate::core::encryption::FieldCipher;
use crate::core::export::CsvExporter;
use crate::core::records::PatientRecords;
use crate::core::retention::{RetentionEvaluator, RetentionPolicy};
use crate::domain::{
    AuditAction, AuditFilter, CarevaultError, Clock, NewAuditEvent, Outcome, Result,
    SessionContext, SystemClock,
};
use crate::log_operation_denied;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Runtime settings not owned by any single service
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub policy: RetentionPolicy,
    pub exporter: CsvExporter,

    /// Audit rows returned when a filter sets no limit
    pub audit_limit: usize,
}

/// Entry point for every user action
pub struct Dashboard {
    stores: Stores,
    clock: Arc<dyn Clock>,
    authenticator: Authenticator,
    audit: AuditLogger,
    projector: AccessProjector,
    records: PatientRecords,
    anonymizer: AnonymizationEngine,
    retention: RetentionEvaluator,
    analytics: Analytics,
    exporter: CsvExporter,
    audit_limit: usize,
}

impl Dashboard {
    pub fn new(
        stores: Stores,
        cipher: FieldCipher,
        settings: DashboardSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            authenticator: Authenticator::new(stores.users.clone()),
            audit: AuditLogger::new(stores.audit.clone(), clock.clone()),
            projector: AccessProjector::new(stores.patients.clone()),
            records: PatientRecords::new(
                stores.patients.clone(),
                cipher,
                settings.policy,
                clock.clone(),
            ),
            anonymizer: AnonymizationEngine::new(stores.patients.clone()),
            retention: RetentionEvaluator::new(stores.patients.clone()),
            analytics: Analytics::new(stores.patients.clone(), stores.audit.clone()),
            exporter: settings.exporter,
            audit_limit: settings.audit_limit,
            stores,
            clock,
        }
    }

    /// Build the dashboard for a validated configuration on the wall clock
    pub fn from_config(config: &CarevaultConfig) -> Result<Self> {
        let stores = create_stores(config)?;
        let cipher = FieldCipher::from_config(&config.security)?;
        let settings = DashboardSettings {
            policy: RetentionPolicy::from_config(&config.retention),
            exporter: CsvExporter::new(&config.export.output_dir),
            audit_limit: config.export.audit_limit,
        };
        Ok(Self::new(stores, cipher, settings, Arc::new(SystemClock)))
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    /// Current time on the dashboard's clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Create the schema and seed the default accounts when none exist
    ///
    /// Returns the number of accounts created.
    pub async fn bootstrap(&self) -> Result<usize> {
        self.stores.client.ensure_schema().await?;
        seed_default_accounts(self.stores.users.as_ref()).await
    }

    /// Authenticate and open a session
    ///
    /// Both outcomes are audited. `Ok(None)` means the credentials did not
    /// match (or the store could not be reached).
    ///
    /// # Errors
    ///
    /// Returns [`CarevaultError::Validation`] for a blank username or
    /// password, before any lookup.
    pub async fn login(&self, username: &str, password: &str) -> Result<Option<SessionContext>> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(CarevaultError::Validation(
                "Username and password are required".to_string(),
            ));
        }

        match self.authenticator.authenticate(username, password).await {
            Some(identity) => {
                let session = SessionContext::new(identity, self.clock.now());
                self.audit
                    .record(session.event(
                        AuditAction::Login,
                        format!("User {} logged in", session.username()),
                    ))
                    .await?;
                Ok(Some(session))
            }
            None => {
                self.audit
                    .record(NewAuditEvent::anonymous(
                        AuditAction::FailedLogin,
                        format!("Failed login attempt for {username}"),
                    ))
                    .await?;
                Ok(None)
            }
        }
    }

    /// Run one command for the session
    ///
    /// # Errors
    ///
    /// Returns [`CarevaultError::ConsentRequired`] or
    /// [`CarevaultError::Authorization`] before the operation runs, and the
    /// operation's own error otherwise. Audit events are recorded only
    /// after the operation succeeded.
    pub async fn execute(
        &self,
        session: &mut SessionContext,
        command: Command,
    ) -> Result<CommandOutput> {
        let operation = command.name();

        if command.requires_consent() && !session.consent_given() {
            log_operation_denied!(session.role(), operation, "consent");
            return Err(CarevaultError::ConsentRequired);
        }
        if let Err(e) = session.require_role(command.allowed_roles(), operation) {
            log_operation_denied!(session.role(), operation, "role");
            return Err(e);
        }

        tracing::debug!(role = %session.role(), operation, "Dispatching command");
        let outcome = self.run(session, command).await?;
        self.audit.record_all(outcome.events).await?;
        Ok(outcome.value)
    }

    async fn run(
        &self,
        session: &mut SessionContext,
        command: Command,
    ) -> Result<Outcome<CommandOutput>> {
        let now = self.clock.now();

        let outcome = match command {
            Command::GiveConsent => {
                session.record_consent();
                Outcome::new(
                    CommandOutput::ConsentRecorded,
                    session.event(AuditAction::GdprConsent, "User provided GDPR consent"),
                )
            }
            Command::Logout => Outcome::new(
                CommandOutput::LoggedOut,
                session.event(
                    AuditAction::Logout,
                    format!("User {} logged out", session.username()),
                ),
            ),
            Command::AddPatient(input) => self
                .records
                .add_patient(session, input)
                .await?
                .map(CommandOutput::PatientAdded),
            Command::ViewPatients { mode } => self
                .projector
                .view_patients(session, mode)
                .await?
                .map(CommandOutput::Patients),
            Command::ExportPatients { mode } => {
                let mut outcome = self.projector.view_patients(session, mode).await?;
                let path = self.exporter.export_patients(&outcome.value, now)?;
                outcome.events.push(session.event(
                    AuditAction::Export,
                    format!("Exported patient records to {}", file_name(&path)),
                ));
                let rows = outcome.value.len();
                outcome.map(|_| CommandOutput::Exported { path, rows })
            }
            Command::AnonymizePatient(id) => self
                .anonymizer
                .anonymize_patient(session, id)
                .await?
                .map(CommandOutput::Anonymized),
            Command::AnonymizeAll => self
                .anonymizer
                .anonymize_pending(session)
                .await?
                .map(CommandOutput::BulkAnonymized),
            Command::RevealPatient(id) => self
                .records
                .reveal(session, id)
                .await?
                .map(CommandOutput::Revealed),
            Command::ListExpired => {
                Outcome::silent(CommandOutput::Expired(self.retention.list_expired(now).await?))
            }
            Command::PurgeExpired => self
                .retention
                .purge_expired(session, now)
                .await?
                .map(CommandOutput::Purged),
            Command::ViewAudit(filter) => Outcome::silent(CommandOutput::AuditLog(
                self.audit.view(&self.limited(filter)).await?,
            )),
            Command::ExportAudit(filter) => {
                let entries = self.audit.view(&self.limited(filter)).await?;
                let path = self.exporter.export_audit(&entries, now)?;
                let event = session.event(
                    AuditAction::Export,
                    format!("Exported audit logs to {}", file_name(&path)),
                );
                Outcome::new(
                    CommandOutput::Exported {
                        path,
                        rows: entries.len(),
                    },
                    event,
                )
            }
            Command::Analytics => {
                Outcome::silent(CommandOutput::Activity(self.analytics.activity(now).await?))
            }
            Command::Overview => {
                Outcome::silent(CommandOutput::Overview(self.analytics.overview(now).await?))
            }
            Command::Backup => {
                let patients = self.stores.patients.list_full().await?;
                let logs = self.stores.audit.entries(&AuditFilter::default()).await?;
                let files = self.exporter.backup(&patients, &logs, now)?;
                Outcome::new(
                    CommandOutput::Backup(files),
                    session.event(AuditAction::SystemBackup, "Full system backup created"),
                )
            }
        };

        Ok(outcome)
    }

    fn limited(&self, filter: AuditFilter) -> AuditFilter {
        AuditFilter {
            limit: filter.limit.or(Some(self.audit_limit)),
            ..filter
        }
    }
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
