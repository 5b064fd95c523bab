use crate::scoring::ScoringConfig;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PRECISION: usize = 2;
pub const MAX_PRECISION: usize = 10;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,
}

impl Config {
    /// A config with every section filled in with defaults, as written by `init`.
    pub fn with_defaults() -> Self {
        Self {
            scoring: Some(ScoringConfig::default()),
            output: Some(OutputConfig::default()),
        }
    }

    pub fn effective_scoring(&self) -> ScoringConfig {
        self.scoring.clone().unwrap_or_default()
    }

    pub fn effective_output(&self) -> OutputConfig {
        self.output.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Colors when stdout is a terminal
    Auto,
    Always,
    Never,
}

/// Output configuration.
///
/// Example YAML:
/// ```yaml
/// output:
///   precision: 2
///   format: table
///   color: auto
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Decimal places for scores (default: 2)
    #[serde(default)]
    pub precision: Option<usize>,

    /// Default output format (default: table)
    #[serde(default)]
    pub format: Option<OutputFormat>,

    /// Color mode for table output (default: auto)
    #[serde(default)]
    pub color: Option<ColorMode>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            precision: Some(DEFAULT_PRECISION),
            format: Some(OutputFormat::Table),
            color: Some(ColorMode::Auto),
        }
    }
}

impl OutputConfig {
    pub fn precision(&self) -> usize {
        self.precision.unwrap_or(DEFAULT_PRECISION)
    }

    pub fn format(&self) -> OutputFormat {
        self.format.unwrap_or(OutputFormat::Table)
    }

    pub fn color(&self) -> ColorMode {
        self.color.unwrap_or(ColorMode::Auto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
scoring:
  tie_epsilon: 0.0001
  max_score: 5
output:
  precision: 1
  format: tsv
  color: never
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let scoring = config.effective_scoring();
        assert_eq!(scoring.tie_epsilon, Some(0.0001));
        assert_eq!(scoring.max_score, Some(5.0));

        let output = config.effective_output();
        assert_eq!(output.precision(), 1);
        assert_eq!(output.format(), OutputFormat::Tsv);
        assert_eq!(output.color(), ColorMode::Never);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert!(config.scoring.is_none());
        assert_eq!(config.effective_scoring(), ScoringConfig::default());
        assert_eq!(config.effective_output().precision(), DEFAULT_PRECISION);
    }

    #[test]
    fn test_partial_output_section() {
        let yaml = r#"
output:
  format: json
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let output = config.effective_output();
        assert_eq!(output.format(), OutputFormat::Json);
        assert_eq!(output.precision(), DEFAULT_PRECISION);
        assert_eq!(output.color(), ColorMode::Auto);
    }

    #[test]
    fn test_unknown_section_rejected() {
        let yaml = r#"
queries:
  - query: "is:pr"
"#;
        let result: Result<Config, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults_roundtrip() {
        let config = Config::with_defaults();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }
}
