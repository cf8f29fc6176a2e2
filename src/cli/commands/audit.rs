//! Audit log command
//!
//! Shows or exports the audit trail, most recent first (admin only).

use crate::cli::commands::session::{DashboardSession, SessionArgs};
use crate::core::dashboard::{Command, CommandOutput};
use crate::domain::{AuditAction, AuditEntry, AuditFilter};
use chrono::NaiveDate;
use clap::Args;

/// Arguments for the audit command
#[derive(Args, Debug)]
pub struct AuditArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Only events with this action label, e.g. "Failed Login"
    #[arg(long, value_parser = parse_action)]
    pub action: Option<AuditAction>,

    /// Only events on this UTC date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Maximum rows (defaults to export.audit_limit)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Write the filtered rows to CSV instead of printing them
    #[arg(long)]
    pub export: bool,
}

fn parse_action(label: &str) -> Result<AuditAction, String> {
    AuditAction::from_label(label).ok_or_else(|| {
        let known: Vec<&str> = AuditAction::ALL.iter().map(|a| a.label()).collect();
        format!("unknown action '{label}', expected one of: {}", known.join(", "))
    })
}

impl AuditArgs {
    fn filter(&self) -> AuditFilter {
        AuditFilter {
            action: self.action,
            date: self.date,
            limit: self.limit,
        }
    }

    /// Execute the audit command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let mut session = match DashboardSession::open(config_path, &self.session).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let result = self.run(&mut session).await;
        Ok(session.close(result).await)
    }

    async fn run(&self, session: &mut DashboardSession) -> Result<(), i32> {
        if self.export {
            if let CommandOutput::Exported { path, rows } =
                session.run(Command::ExportAudit(self.filter())).await?
            {
                println!("✅ Exported {rows} audit event(s) to {}", path.display());
            }
            return Ok(());
        }

        if let CommandOutput::AuditLog(entries) =
            session.run(Command::ViewAudit(self.filter())).await?
        {
            print_entries(&entries);
        }
        Ok(())
    }
}

fn print_entries(entries: &[AuditEntry]) {
    if entries.is_empty() {
        println!("No audit events match the specified filters.");
        return;
    }

    println!("📜 {} audit event(s):", entries.len());
    println!();
    println!(
        "{:<6} {:<20} {:<14} {:<13} {:<19} {}",
        "ID", "Time (UTC)", "User", "Role", "Action", "Details"
    );
    println!("{}", "-".repeat(110));
    for entry in entries {
        println!(
            "{:<6} {:<20} {:<14} {:<13} {:<19} {}",
            entry.log_id,
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            entry.username.as_deref().unwrap_or("-"),
            entry.role.map(|r| r.as_str()).unwrap_or("-"),
            entry.action,
            entry.details
        );
    }
    println!();
}
