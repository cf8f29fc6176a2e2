//! Setup command implementation
//!
//! Creates the `users`, `patients` and `logs` tables and seeds the default
//! accounts when the users table is empty.

use crate::cli::commands::session::report;
use crate::config::load_config;
use crate::core::auth::DEFAULT_ACCOUNTS;
use crate::core::dashboard::Dashboard;
use clap::Args;

/// Arguments for the setup command
#[derive(Args, Debug)]
pub struct SetupArgs {}

impl SetupArgs {
    /// Execute the setup command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Setting up store");

        println!("🛠️  Setting up CareVault store");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let dashboard = match Dashboard::from_config(&config) {
            Ok(d) => d,
            Err(e) => return Ok(report("Failed to initialize", &e)),
        };

        if let Err(e) = dashboard.stores().client.test_connection().await {
            return Ok(report("Failed to connect to database", &e));
        }
        println!(
            "✅ Connected to {} store",
            dashboard.stores().client.backend_name()
        );

        match dashboard.bootstrap().await {
            Ok(0) => {
                println!("✅ Schema ready");
                println!("ℹ️  Accounts already exist, nothing seeded");
            }
            Ok(seeded) => {
                println!("✅ Schema ready");
                println!("✅ Seeded {seeded} default accounts:");
                for account in DEFAULT_ACCOUNTS {
                    println!("   - {:<12} ({})", account.username, account.role);
                }
                println!();
                println!("⚠️  Default passwords are public; change them before real use");
            }
            Err(e) => return Ok(report("Setup failed", &e)),
        }

        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_setup_memory_store() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "database_target = \"memory\"").unwrap();

        let code = SetupArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }
}
