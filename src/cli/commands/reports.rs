//! Analytics and overview commands

use crate::cli::commands::session::{DashboardSession, SessionArgs};
use crate::core::analytics::{ActivityReport, Overview};
use crate::core::dashboard::{Command, CommandOutput};
use clap::Args;

/// Arguments for the analytics command (admin)
#[derive(Args, Debug)]
pub struct AnalyticsArgs {
    #[command(flatten)]
    pub session: SessionArgs,
}

/// Arguments for the overview command
#[derive(Args, Debug)]
pub struct OverviewArgs {
    #[command(flatten)]
    pub session: SessionArgs,
}

impl AnalyticsArgs {
    /// Execute the analytics command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let mut session = match DashboardSession::open(config_path, &self.session).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let result = match session.run(Command::Analytics).await {
            Ok(CommandOutput::Activity(report)) => {
                print_activity(&report);
                Ok(())
            }
            Ok(_) => Ok(()),
            Err(code) => Err(code),
        };
        Ok(session.close(result).await)
    }
}

impl OverviewArgs {
    /// Execute the overview command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let mut session = match DashboardSession::open(config_path, &self.session).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let result = match session.run(Command::Overview).await {
            Ok(CommandOutput::Overview(overview)) => {
                print_overview(&overview);
                Ok(())
            }
            Ok(_) => Ok(()),
            Err(code) => Err(code),
        };
        Ok(session.close(result).await)
    }
}

fn print_activity(report: &ActivityReport) {
    println!("📈 Daily activity (last 7 days)");
    if report.daily.is_empty() {
        println!("   No activity");
    }
    for day in &report.daily {
        println!("   {}  {:>5}", day.date, day.count);
    }
    println!();

    println!("📊 Action distribution");
    for action in &report.actions {
        println!("   {:<20} {:>6}", action.action, action.count);
    }
    println!();

    println!("🗓️  Hourly activity (last 7 days)");
    for cell in &report.heatmap {
        println!("   {} {:02}:00  {:>5}", cell.date, cell.hour, cell.count);
    }
    println!();
}

fn print_overview(overview: &Overview) {
    let counts = &overview.counts;
    println!("🏥 Overview");
    println!();
    println!("  Total Patients:     {}", counts.total);
    println!(
        "  Anonymized:         {} ({:.1}%)",
        counts.anonymized, overview.anonymized_percentage
    );
    println!("  Encrypted:          {}", counts.encrypted);
    println!("  Expired:            {}", counts.expired);
    println!("  Activity Today:     {}", overview.today_activity);
    println!();

    println!("Recent activity:");
    for entry in &overview.recent_activity {
        println!(
            "  {}  {:<14} {}",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.username.as_deref().unwrap_or("-"),
            entry.action
        );
    }
    println!();

    println!("Recent additions:");
    for row in &overview.recent_additions {
        println!(
            "  #{:<6} {}",
            row.patient_id.to_string(),
            row.date_added.format("%Y-%m-%d %H:%M")
        );
    }
    println!();
}
