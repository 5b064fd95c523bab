mod init;
mod schema;

pub use init::{run_init, write_config};
pub use schema::{ColorMode, Config, OutputConfig, OutputFormat, DEFAULT_PRECISION, MAX_PRECISION};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/radar-score/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("radar-score"))
}

/// Get the default config file path (~/.config/radar-score/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Parse configuration YAML.
pub fn parse_config(content: &str) -> Result<Config> {
    serde_saphyr::from_str(content).map_err(|e| anyhow::anyhow!("invalid YAML: {}", e))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/radar-score/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
///
/// A missing file at the default path is not an error: defaults apply.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        log::debug!("no config at {}, using defaults", config_path.display());
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    parse_config(&config_content)
        .with_context(|| format!("Failed to parse config {}", config_path.display()))
}

/// Validate the whole configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Err(scoring_errors) = crate::scoring::validate_scoring(&config.effective_scoring()) {
        errors.extend(scoring_errors);
    }

    if let Some(precision) = config.output.as_ref().and_then(|o| o.precision) {
        if precision > MAX_PRECISION {
            errors.push(format!(
                "output.precision: must be at most {}, got {}",
                MAX_PRECISION, precision
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
