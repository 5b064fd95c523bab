use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{get_config_path, Config, OutputConfig, OutputFormat, MAX_PRECISION};
use crate::scoring::{validate_scoring, ScoringConfig};

const CONFIG_HEADER: &str = "\
# radar-score configuration
#
# scoring.tie_epsilon  totals closer than this share a rank
# scoring.min_score    raw scores below this are clamped up
# scoring.max_score    raw scores above this are clamped down
# scoring.max_weight   weights above this are clamped down
# output.precision     decimal places shown for scores
# output.format        table | tsv | json
# output.color         auto | always | never
";

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Prompt until the input parses as a number.
fn prompt_number(message: &str, default: f64) -> Result<f64> {
    loop {
        let input = prompt_with_default(message, &default.to_string())?;
        match input.parse::<f64>() {
            Ok(v) if v.is_finite() => return Ok(v),
            _ => println!("  Invalid: must be a number. Try again."),
        }
    }
}

fn prompt_scoring() -> Result<ScoringConfig> {
    let defaults = ScoringConfig::default().params();
    loop {
        println!();
        println!("Raw scores are clamped into a fixed range before weighting.");
        let min_score = prompt_number("Lowest raw score", defaults.min_score)?;
        let max_score = prompt_number("Highest raw score", defaults.max_score)?;
        println!("Vendors whose totals differ by less than the tie epsilon share a rank.");
        let tie_epsilon = prompt_number("Tie epsilon", defaults.tie_epsilon)?;

        let candidate = ScoringConfig {
            tie_epsilon: Some(tie_epsilon),
            min_score: Some(min_score),
            max_score: Some(max_score),
            max_weight: Some(defaults.max_weight),
        };
        match validate_scoring(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(errors) => {
                for error in errors {
                    println!("  Invalid: {}", error);
                }
                println!("  Try again.");
            }
        }
    }
}

fn prompt_output() -> Result<OutputConfig> {
    let defaults = OutputConfig::default();
    let precision = loop {
        let input = prompt_with_default("Decimal places", &defaults.precision().to_string())?;
        match input.parse::<usize>() {
            Ok(v) if v <= MAX_PRECISION => break v,
            _ => println!("  Invalid: must be a whole number up to {}. Try again.", MAX_PRECISION),
        }
    };
    let format = loop {
        let input = prompt_with_default("Default format (table, tsv, json)", "table")?;
        match input.to_lowercase().as_str() {
            "table" => break OutputFormat::Table,
            "tsv" => break OutputFormat::Tsv,
            "json" => break OutputFormat::Json,
            _ => println!("  Invalid: choose table, tsv or json. Try again."),
        }
    };
    Ok(OutputConfig {
        precision: Some(precision),
        format: Some(format),
        color: defaults.color,
    })
}

/// Write `config` as commented YAML, atomically.
///
/// Creates the parent directory if it doesn't exist.
pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(CONFIG_HEADER.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    Ok(())
}

/// Create a config file.
///
/// With `interactive`, walks the user through each setting; otherwise writes
/// the defaults. An existing file is only replaced with `force` or after the
/// user confirms.
pub fn run_init(path: Option<PathBuf>, force: bool, interactive: bool) -> Result<PathBuf> {
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    let config = if interactive {
        println!();
        println!("radar-score configuration");
        println!("=========================");

        let scoring = if prompt_yes_no("Configure scoring? (n accepts defaults)", false)? {
            prompt_scoring()?
        } else {
            ScoringConfig::default()
        };
        println!();
        let output = if prompt_yes_no("Configure output? (n accepts defaults)", false)? {
            prompt_output()?
        } else {
            OutputConfig::default()
        };
        Config {
            scoring: Some(scoring),
            output: Some(output),
        }
    } else {
        Config::with_defaults()
    };

    if config_path.exists() && !force {
        let overwrite = interactive
            && prompt_yes_no(
                &format!(
                    "Config already exists at {}. Overwrite?",
                    config_path.display()
                ),
                false,
            )?;
        if !overwrite {
            anyhow::bail!(
                "Config already exists at {} (use --force to replace it)",
                config_path.display()
            );
        }
    }

    write_config(&config_path, &config)?;
    Ok(config_path)
}
