//! Retention commands
//!
//! `retention check` lists records past their deadline; `retention purge`
//! deletes them. Both are admin only.

use crate::cli::commands::session::{DashboardSession, SessionArgs};
use crate::core::dashboard::{Command, CommandOutput};
use clap::{Args, Subcommand};

/// Arguments for the retention command group
#[derive(Args, Debug)]
pub struct RetentionArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    #[command(subcommand)]
    pub action: RetentionAction,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionAction {
    /// List records past their retention date
    Check,

    /// Delete every record past its retention date
    Purge,
}

impl RetentionArgs {
    /// Execute the retention command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let mut session = match DashboardSession::open(config_path, &self.session).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let result = match self.action {
            RetentionAction::Check => check(&mut session).await,
            RetentionAction::Purge => purge(&mut session).await,
        };
        Ok(session.close(result).await)
    }
}

async fn check(session: &mut DashboardSession) -> Result<(), i32> {
    let CommandOutput::Expired(expired) = session.run(Command::ListExpired).await? else {
        return Ok(());
    };

    if expired.is_empty() {
        println!("✅ No records past their retention date");
        return Ok(());
    }

    println!("⚠️  {} record(s) past their retention date:", expired.len());
    println!();
    println!("{:<8} {:<20} {:<12}", "ID", "Added", "Retain Until");
    println!("{}", "-".repeat(42));
    for record in &expired {
        println!(
            "{:<8} {:<20} {:<12}",
            record.patient_id.to_string(),
            record.date_added.format("%Y-%m-%d %H:%M:%S").to_string(),
            record.data_retention_date.to_string()
        );
    }
    println!();
    println!("Run 'carevault retention purge' to delete them.");
    Ok(())
}

async fn purge(session: &mut DashboardSession) -> Result<(), i32> {
    if let CommandOutput::Purged(count) = session.run(Command::PurgeExpired).await? {
        println!("🗑️  Deleted {count} expired record(s)");
    }
    Ok(())
}
