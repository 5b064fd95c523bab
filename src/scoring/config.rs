use super::numeric::{
    ScoringParams, DEFAULT_MAX_SCORE, DEFAULT_MAX_WEIGHT, DEFAULT_MIN_SCORE, DEFAULT_TIE_EPSILON,
};
use serde::{Deserialize, Serialize};

/// Scoring configuration.
///
/// Every field is optional; unset fields fall back to the engine defaults.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   tie_epsilon: 0.000000001
///   min_score: 0
///   max_score: 10
///   max_weight: 100
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Totals closer than this are ranked as a tie (default: 1e-9)
    #[serde(default)]
    pub tie_epsilon: Option<f64>,

    /// Lower bound raw scores are clamped to (default: 0)
    #[serde(default)]
    pub min_score: Option<f64>,

    /// Upper bound raw scores are clamped to (default: 10)
    #[serde(default)]
    pub max_score: Option<f64>,

    /// Upper bound weights are clamped to (default: 100)
    #[serde(default)]
    pub max_weight: Option<f64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            tie_epsilon: Some(DEFAULT_TIE_EPSILON),
            min_score: Some(DEFAULT_MIN_SCORE),
            max_score: Some(DEFAULT_MAX_SCORE),
            max_weight: Some(DEFAULT_MAX_WEIGHT),
        }
    }
}

impl ScoringConfig {
    /// Resolve into the parameters the engine runs with.
    pub fn params(&self) -> ScoringParams {
        ScoringParams {
            tie_epsilon: self.tie_epsilon.unwrap_or(DEFAULT_TIE_EPSILON),
            min_score: self.min_score.unwrap_or(DEFAULT_MIN_SCORE),
            max_score: self.max_score.unwrap_or(DEFAULT_MAX_SCORE),
            max_weight: self.max_weight.unwrap_or(DEFAULT_MAX_WEIGHT),
        }
    }
}
