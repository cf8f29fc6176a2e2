//! Validate config command implementation
//!
//! Loads and validates `carevault.toml` and checks that the encryption key
//! is usable, without touching the store.

use crate::adapters::postgresql::client::redact_connection_string;
use crate::config::load_config;
use crate::config::schema::DatabaseTarget;
use crate::core::encryption::FieldCipher;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading also validates
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        if let Err(e) = FieldCipher::from_config(&config.security) {
            println!("❌ Encryption key is unusable");
            println!("   Error: {e}");
            return Ok(2);
        }
        println!("✅ Encryption key accepted");

        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.environment);
        println!("  Log Level: {}", config.application.log_level);

        match config.database_target {
            DatabaseTarget::PostgreSQL => {
                if let Some(ref pg_config) = config.postgresql {
                    use secrecy::ExposeSecret;
                    println!("  Database Target: PostgreSQL");
                    println!(
                        "  PostgreSQL Connection: {}",
                        redact_connection_string(
                            pg_config.connection_string.expose_secret().as_ref()
                        )
                    );
                    println!("  Max Connections: {}", pg_config.max_connections);
                }
            }
            DatabaseTarget::Memory => {
                println!("  Database Target: memory (data is lost on exit)");
            }
        }

        println!(
            "  Encryption Key: {}",
            if config.security.encryption_key.is_some() {
                "configured"
            } else {
                "development default"
            }
        );
        println!("  Retention Window: {} days", config.retention.window_days);
        println!("  Export Directory: {}", config.export.output_dir);
        println!();
        Ok(0)
    }
}
