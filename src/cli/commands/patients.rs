//! Patient record commands
//!
//! `patients add|list|export|anonymize|reveal`, each run inside an
//! authenticated session.

use crate::cli::commands::session::{DashboardSession, SessionArgs};
use crate::core::access::{PatientView, ViewMode};
use crate::core::dashboard::{Command, CommandOutput};
use crate::domain::{NewPatient, PatientId};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};

/// Arguments for the patients command group
#[derive(Args, Debug)]
pub struct PatientsArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    #[command(subcommand)]
    pub action: PatientsAction,
}

/// Patient record operations
#[derive(Subcommand, Debug)]
pub enum PatientsAction {
    /// Add a patient record (receptionist, admin)
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        contact: String,

        #[arg(long)]
        diagnosis: String,

        /// Also store the name and contact encrypted
        #[arg(long)]
        encrypt: bool,
    },

    /// List patient records as your role may see them
    List {
        /// Admin only: raw or anonymized identity
        #[arg(long, default_value = "raw")]
        mode: ViewMode,
    },

    /// Export the visible patient records to CSV (admin, doctor)
    Export {
        #[arg(long, default_value = "raw")]
        mode: ViewMode,
    },

    /// Anonymize one record or every pending record (admin)
    Anonymize {
        #[arg(long, conflicts_with = "all", required_unless_present = "all")]
        id: Option<PatientId>,

        #[arg(long)]
        all: bool,
    },

    /// Decrypt a record's encrypted name and contact (admin)
    Reveal {
        #[arg(long)]
        id: PatientId,
    },
}

impl PatientsArgs {
    /// Execute the patients command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let mut session = match DashboardSession::open(config_path, &self.session).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let result = self.run(&mut session).await;
        Ok(session.close(result).await)
    }

    async fn run(&self, session: &mut DashboardSession) -> Result<(), i32> {
        match &self.action {
            PatientsAction::Add {
                name,
                contact,
                diagnosis,
                encrypt,
            } => {
                let output = session
                    .run(Command::AddPatient(NewPatient {
                        name: name.clone(),
                        contact: contact.clone(),
                        diagnosis: diagnosis.clone(),
                        encrypt: *encrypt,
                    }))
                    .await?;
                if let CommandOutput::PatientAdded(id) = output {
                    println!("✅ Patient added with ID {id}");
                    if *encrypt {
                        println!("🔒 Name and contact also stored encrypted");
                    }
                }
            }
            PatientsAction::List { mode } => {
                if let CommandOutput::Patients(view) =
                    session.run(Command::ViewPatients { mode: *mode }).await?
                {
                    print_view(&view);
                }
            }
            PatientsAction::Export { mode } => {
                if let CommandOutput::Exported { path, rows } =
                    session.run(Command::ExportPatients { mode: *mode }).await?
                {
                    println!("✅ Exported {rows} record(s) to {}", path.display());
                }
            }
            PatientsAction::Anonymize { id: Some(id), .. } => {
                match session.run(Command::AnonymizePatient(*id)).await? {
                    CommandOutput::Anonymized(Some(update)) => {
                        println!(
                            "✅ Patient {} anonymized as {} / {}",
                            update.patient_id, update.anonymized_name, update.anonymized_contact
                        );
                    }
                    _ => println!("ℹ️  No patient with ID {id}"),
                }
            }
            PatientsAction::Anonymize { id: None, .. } => {
                if let CommandOutput::BulkAnonymized(count) =
                    session.run(Command::AnonymizeAll).await?
                {
                    println!("✅ Anonymized {count} patient record(s)");
                }
            }
            PatientsAction::Reveal { id } => {
                if let CommandOutput::Revealed(identity) =
                    session.run(Command::RevealPatient(*id)).await?
                {
                    println!("🔓 Patient {}", identity.patient_id);
                    println!("   Name:    {}", identity.name);
                    println!("   Contact: {}", identity.contact);
                }
            }
        }
        Ok(())
    }
}

fn stamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

fn print_view(view: &PatientView) {
    if view.is_empty() {
        println!("No patient records visible.");
        return;
    }

    println!("Found {} record(s):", view.len());
    println!();

    match view {
        PatientView::Full(rows) => {
            println!(
                "{:<6} {:<20} {:<16} {:<24} {:<10} {:<14} {:<17} {:<12}",
                "ID",
                "Name",
                "Contact",
                "Diagnosis",
                "Anon Name",
                "Anon Contact",
                "Added",
                "Retain Until"
            );
            println!("{}", "-".repeat(126));
            for r in rows {
                println!(
                    "{:<6} {:<20} {:<16} {:<24} {:<10} {:<14} {:<17} {:<12}",
                    r.patient_id.to_string(),
                    r.name,
                    r.contact,
                    r.diagnosis,
                    r.anonymized_name.as_deref().unwrap_or("-"),
                    r.anonymized_contact.as_deref().unwrap_or("-"),
                    stamp(r.date_added),
                    r.data_retention_date.to_string()
                );
            }
        }
        PatientView::Masked(rows) => {
            println!(
                "{:<6} {:<12} {:<14} {:<30} {:<17}",
                "ID", "Name", "Contact", "Diagnosis", "Added"
            );
            println!("{}", "-".repeat(83));
            for r in rows {
                println!(
                    "{:<6} {:<12} {:<14} {:<30} {:<17}",
                    r.patient_id.to_string(),
                    r.anonymized_name,
                    r.anonymized_contact,
                    r.diagnosis,
                    stamp(r.date_added)
                );
            }
        }
        PatientView::Restricted(rows) => {
            println!(
                "{:<6} {:<8} {:<8} {:<10} {:<17}",
                "ID", "Name", "Contact", "Diagnosis", "Added"
            );
            println!("{}", "-".repeat(53));
            for r in rows {
                println!(
                    "{:<6} {:<8} {:<8} {:<10} {:<17}",
                    r.patient_id.to_string(),
                    r.name,
                    r.contact,
                    r.diagnosis,
                    stamp(r.date_added)
                );
            }
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_parse_anonymize_all() {
        let cli = Cli::parse_from([
            "carevault", "patients", "-u", "admin", "-p", "pw", "anonymize", "--all",
        ]);
        let Commands::Patients(args) = cli.command else {
            panic!("expected patients command");
        };
        assert!(matches!(
            args.action,
            PatientsAction::Anonymize { id: None, all: true }
        ));
    }

    #[test]
    fn test_anonymize_requires_target() {
        let result = Cli::try_parse_from([
            "carevault", "patients", "-u", "admin", "-p", "pw", "anonymize",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_list_mode() {
        let cli = Cli::parse_from([
            "carevault", "patients", "-u", "admin", "-p", "pw", "--consent", "list", "--mode",
            "anonymized",
        ]);
        let Commands::Patients(args) = cli.command else {
            panic!("expected patients command");
        };
        assert!(args.session.consent);
        assert!(matches!(
            args.action,
            PatientsAction::List {
                mode: ViewMode::Anonymized
            }
        ));
    }
}
