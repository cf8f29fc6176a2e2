//! Init command implementation
//!
//! Writes a sample `carevault.toml`.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "carevault.toml")]
    pub output: String,

    /// Include explanatory comments for every setting
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing CareVault configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Create a .env file defining:");
                println!("     - CAREVAULT_PG_URL (PostgreSQL connection string)");
                println!("     - CAREVAULT_ENCRYPTION_KEY (base64, 32 bytes)");
                println!("  3. Validate configuration: carevault validate-config");
                println!("  4. Create tables and default accounts: carevault setup");
                println!("  5. Change the default account passwords");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    fn generate_minimal_config() -> String {
        r#"# CareVault Configuration File

environment = "development"
database_target = "postgresql"  # postgresql | memory

[application]
log_level = "info"

[postgresql]
connection_string = "${CAREVAULT_PG_URL}"
max_connections = 10

[security]
encryption_key = "${CAREVAULT_ENCRYPTION_KEY}"

[retention]
window_days = 90

[export]
output_dir = "./exports"
audit_limit = 100

[logging]
local_enabled = true
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    fn generate_config_with_examples() -> String {
        r#"# CareVault Configuration File
#
# Values may reference environment variables as ${VAR_NAME}. Any setting can
# also be overridden with CAREVAULT_<SECTION>_<KEY>, for example
# CAREVAULT_RETENTION_WINDOW_DAYS=30.

# ============================================================================
# Environment
# ============================================================================
# development | staging | production
# Production requires security.encryption_key and refuses the memory store.
environment = "development"

# ============================================================================
# Store Selection
# ============================================================================
# postgresql: persistent store (run `carevault setup` once)
# memory:     process-local store, seeded on every start, lost on exit
database_target = "postgresql"

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# PostgreSQL
# ============================================================================
[postgresql]
# postgresql://[user[:password]@][host][:port][/dbname][?params]
connection_string = "${CAREVAULT_PG_URL}"

# Maximum connections in pool (1-100)
max_connections = 10

# Timeout for acquiring a connection
connection_timeout_seconds = 30

# Timeout for a single SQL statement
statement_timeout_seconds = 60

# ============================================================================
# Field Encryption
# ============================================================================
[security]
# Base64 encoded 32-byte AES-256-GCM key. Generate one with:
#   openssl rand -base64 32
# When omitted a development key is used (not allowed in production).
encryption_key = "${CAREVAULT_ENCRYPTION_KEY}"

# ============================================================================
# Retention Policy
# ============================================================================
[retention]
# Days a patient record is kept after creation (1-3650).
# The deadline is fixed when the record is added.
window_days = 90

# ============================================================================
# Exports
# ============================================================================
[export]
# Directory for patients_*.csv, audit_logs_*.csv and backup files
output_dir = "./exports"

# Audit rows shown or exported when --limit is not given
audit_limit = 100

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable JSON file logging in addition to the console
local_enabled = true

# Log file directory
local_path = "./logs"

# Log rotation (daily, hourly, never)
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "carevault.toml".to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.output, "carevault.toml");
        assert!(!args.with_examples);
    }

    #[test]
    fn test_generated_configs_parse() {
        std::env::set_var("CAREVAULT_PG_URL", "postgresql://u:p@localhost/carevault");
        std::env::set_var(
            "CAREVAULT_ENCRYPTION_KEY",
            "8cozhW9kSi6zJQw3xLvMp_6T3Nq3qjWPHvXFnwi4IxE=",
        );

        for content in [
            InitArgs::generate_minimal_config(),
            InitArgs::generate_config_with_examples(),
        ] {
            let config = parse_config(&content).unwrap();
            assert_eq!(config.retention.window_days, 90);
            assert_eq!(config.export.output_dir, "./exports");
        }
    }
}
