//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::CarevaultConfig;
use super::secret::secret_string;
use crate::domain::errors::CarevaultError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into CarevaultConfig
/// 4. Applies environment variable overrides (CAREVAULT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`CarevaultError::Configuration`] if the file is missing or
/// unreadable, a referenced variable is unset, parsing fails or
/// validation fails.
///
/// # Examples
///
/// ```no_run
/// use carevault::config::loader::load_config;
///
/// let config = load_config("carevault.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CarevaultConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CarevaultError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CarevaultError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses, overrides and validates configuration text
///
/// # Errors
///
/// Same as [`load_config`] minus the file access failures.
pub fn parse_config(contents: &str) -> Result<CarevaultConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: CarevaultConfig = toml::from_str(&contents)
        .map_err(|e| CarevaultError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        CarevaultError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap_or_else(|e| panic!("invalid pattern: {e}"))
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_pattern();
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(CarevaultError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides using CAREVAULT_* prefix
///
/// Environment variables follow the pattern: CAREVAULT_<SECTION>_<KEY>,
/// for example CAREVAULT_RETENTION_WINDOW_DAYS.
fn apply_env_overrides(config: &mut CarevaultConfig) -> Result<()> {
    if let Ok(val) = std::env::var("CAREVAULT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("CAREVAULT_ENVIRONMENT") {
        config.environment = toml::Value::String(val.clone())
            .try_into()
            .map_err(|_| {
                CarevaultError::Configuration(format!("Invalid CAREVAULT_ENVIRONMENT '{val}'"))
            })?;
    }

    if let Ok(val) = std::env::var("CAREVAULT_DATABASE_TARGET") {
        config.database_target = toml::Value::String(val.clone())
            .try_into()
            .map_err(|_| {
                CarevaultError::Configuration(format!(
                    "Invalid CAREVAULT_DATABASE_TARGET '{val}'"
                ))
            })?;
    }

    // PostgreSQL overrides (only if PostgreSQL is configured)
    if let Some(ref mut pg_config) = config.postgresql {
        if let Ok(val) = std::env::var("CAREVAULT_POSTGRESQL_CONNECTION_STRING") {
            pg_config.connection_string = secret_string(val);
        }
        if let Ok(val) = std::env::var("CAREVAULT_POSTGRESQL_MAX_CONNECTIONS") {
            if let Ok(max) = val.parse() {
                pg_config.max_connections = max;
            }
        }
    }

    if let Ok(val) = std::env::var("CAREVAULT_SECURITY_ENCRYPTION_KEY") {
        config.security.encryption_key = Some(secret_string(val));
    }

    if let Ok(val) = std::env::var("CAREVAULT_RETENTION_WINDOW_DAYS") {
        config.retention.window_days = val.parse().map_err(|_| {
            CarevaultError::Configuration(format!(
                "Invalid CAREVAULT_RETENTION_WINDOW_DAYS '{val}'"
            ))
        })?;
    }

    if let Ok(val) = std::env::var("CAREVAULT_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }

    if let Ok(val) = std::env::var("CAREVAULT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("CAREVAULT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
