//! Backup command implementation
//!
//! Dumps the full `patients` and `logs` tables to CSV (admin only).

use crate::cli::commands::session::{DashboardSession, SessionArgs};
use crate::core::dashboard::{Command, CommandOutput};
use clap::Args;

/// Arguments for the backup command
#[derive(Args, Debug)]
pub struct BackupArgs {
    #[command(flatten)]
    pub session: SessionArgs,
}

impl BackupArgs {
    /// Execute the backup command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let mut session = match DashboardSession::open(config_path, &self.session).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let result = match session.run(Command::Backup).await {
            Ok(CommandOutput::Backup(files)) => {
                println!("💾 System backup created");
                println!("   Patients: {}", files.patients.display());
                println!("   Logs:     {}", files.logs.display());
                println!();
                println!("⚠️  The patients file contains raw identity; store it securely");
                Ok(())
            }
            Ok(_) => Ok(()),
            Err(code) => Err(code),
        };
        Ok(session.close(result).await)
    }
}
