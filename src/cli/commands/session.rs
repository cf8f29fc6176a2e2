//! Shared login handling for dashboard commands
//!
//! Every dashboard command authenticates, optionally records consent, runs
//! one or more commands and logs out. Failures are printed and turned into
//! the process exit code.

use crate::config::load_config;
use crate::config::schema::DatabaseTarget;
use crate::core::dashboard::{Command, CommandOutput, Dashboard};
use crate::domain::{CarevaultError, SessionContext};
use clap::Args;

/// Credentials and consent flag accepted by every dashboard command
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Account username
    #[arg(short, long, env = "CAREVAULT_USERNAME")]
    pub username: String,

    /// Account password
    #[arg(short, long, env = "CAREVAULT_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Give data-processing (GDPR) consent for this session
    #[arg(long)]
    pub consent: bool,
}

/// Authenticated dashboard session
pub struct DashboardSession {
    pub dashboard: Dashboard,
    pub session: SessionContext,
}

impl DashboardSession {
    /// Load configuration, log in and record consent if requested
    ///
    /// On failure the problem is printed and the exit code returned.
    pub async fn open(config_path: &str, args: &SessionArgs) -> Result<Self, i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Err(2);
            }
        };

        let dashboard = match Dashboard::from_config(&config) {
            Ok(d) => d,
            Err(e) => return Err(report("Failed to initialize", &e)),
        };

        // A fresh in-memory store has no tables or accounts yet
        if config.database_target == DatabaseTarget::Memory {
            if let Err(e) = dashboard.bootstrap().await {
                return Err(report("Failed to initialize store", &e));
            }
        }

        let mut session = match dashboard.login(&args.username, &args.password).await {
            Ok(Some(s)) => s,
            Ok(None) => {
                println!("❌ Invalid username or password");
                return Err(3);
            }
            Err(e) => return Err(report("Login failed", &e)),
        };

        println!("🔐 Logged in as {} ({})", session.username(), session.role());

        if args.consent {
            if let Err(e) = dashboard.execute(&mut session, Command::GiveConsent).await {
                return Err(report("Failed to record consent", &e));
            }
            println!("✅ Data-processing consent recorded");
        }
        println!();

        Ok(Self { dashboard, session })
    }

    /// Run one command, printing any failure
    pub async fn run(&mut self, command: Command) -> Result<CommandOutput, i32> {
        let operation = command.name();
        self.dashboard
            .execute(&mut self.session, command)
            .await
            .map_err(|e| report(&format!("Failed to {operation}"), &e))
    }

    /// Log out and turn the command's result into the exit code
    pub async fn close(mut self, result: Result<(), i32>) -> i32 {
        let code = result.err().unwrap_or(0);
        if let Err(e) = self
            .dashboard
            .execute(&mut self.session, Command::Logout)
            .await
        {
            tracing::warn!(error = %e, "Logout could not be recorded");
        }
        let (hours, minutes) = self.session.uptime(self.dashboard.now());
        tracing::info!(hours, minutes, "Session closed");
        code
    }
}

/// Print an error with a hint and return its exit code
pub fn report(context: &str, error: &CarevaultError) -> i32 {
    println!("❌ {context}");
    println!("   Error: {error}");
    match error {
        CarevaultError::ConsentRequired => {
            println!("   Re-run with --consent to give data-processing consent");
        }
        CarevaultError::Connection(_) => {
            println!("   Check [postgresql] connection_string and that the server is running");
        }
        _ => {}
    }
    error.exit_code()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_exit_codes() {
        assert_eq!(report("x", &CarevaultError::ConsentRequired), 3);
        assert_eq!(report("x", &CarevaultError::Connection("down".into())), 4);
        assert_eq!(report("x", &CarevaultError::Validation("blank".into())), 2);
        assert_eq!(report("x", &CarevaultError::Decode("bad".into())), 5);
    }
}
