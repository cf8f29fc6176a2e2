//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for CareVault using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// CareVault - role-gated hospital records
#[derive(Parser, Debug)]
#[command(name = "carevault")]
#[command(version, about, long_about = None)]
#[command(author = "CareVault Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "carevault.toml", env = "CAREVAULT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CAREVAULT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new configuration file
    Init(commands::init::InitArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Create the schema and seed the default accounts
    Setup(commands::setup::SetupArgs),

    /// Add, list, export, anonymize or decrypt patient records
    Patients(commands::patients::PatientsArgs),

    /// List or purge records past their retention date
    Retention(commands::retention::RetentionArgs),

    /// Show or export the audit log
    Audit(commands::audit::AuditArgs),

    /// Activity charts over the audit log
    Analytics(commands::reports::AnalyticsArgs),

    /// Patient and activity summary
    Overview(commands::reports::OverviewArgs),

    /// Dump the patients and logs tables to CSV
    Backup(commands::backup::BackupArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::retention::RetentionAction;

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["carevault", "init"]);
        assert_eq!(cli.config, "carevault.toml");
        assert!(matches!(cli.command, Commands::Init(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["carevault", "--config", "custom.toml", "validate-config"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["carevault", "--log-level", "debug", "setup"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_retention_purge() {
        let cli = Cli::parse_from([
            "carevault", "retention", "--username", "admin", "--password", "pw", "purge",
        ]);
        let Commands::Retention(args) = cli.command else {
            panic!("expected retention command");
        };
        assert_eq!(args.session.username, "admin");
        assert_eq!(args.action, RetentionAction::Purge);
    }

    #[test]
    fn test_cli_parse_audit_filters() {
        let cli = Cli::parse_from([
            "carevault",
            "audit",
            "-u",
            "admin",
            "-p",
            "pw",
            "--action",
            "Failed Login",
            "--date",
            "2025-03-14",
            "--limit",
            "5",
        ]);
        let Commands::Audit(args) = cli.command else {
            panic!("expected audit command");
        };
        assert_eq!(args.limit, Some(5));
        assert!(args.date.is_some());
        assert!(args.action.is_some());
    }
}
