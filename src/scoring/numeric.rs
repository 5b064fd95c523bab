use crate::chart::ScoreMap;

pub const DEFAULT_TIE_EPSILON: f64 = 1e-9;
pub const DEFAULT_MIN_SCORE: f64 = 0.0;
pub const DEFAULT_MAX_SCORE: f64 = 10.0;
pub const DEFAULT_MAX_WEIGHT: f64 = 100.0;

/// Weights are percentages: a dimension of weight 100 contributes its full
/// raw score.
pub const WEIGHT_SCALE: f64 = 100.0;

/// Resolved numeric settings the engine runs with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringParams {
    pub tie_epsilon: f64,
    pub min_score: f64,
    pub max_score: f64,
    pub max_weight: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            tie_epsilon: DEFAULT_TIE_EPSILON,
            min_score: DEFAULT_MIN_SCORE,
            max_score: DEFAULT_MAX_SCORE,
            max_weight: DEFAULT_MAX_WEIGHT,
        }
    }
}

impl ScoringParams {
    /// Clamp a stored score into `[min_score, max_score]`.
    /// Non-finite values are treated like a missing entry.
    pub fn clamp_score(&self, value: f64) -> f64 {
        if value.is_finite() {
            value.clamp(self.min_score, self.max_score)
        } else {
            self.missing_score()
        }
    }

    /// Score used when a vendor has no entry: 0, pulled into range.
    pub fn missing_score(&self) -> f64 {
        0.0_f64.clamp(self.min_score, self.max_score)
    }

    /// Clamp a stored weight into `[0, max_weight]`; non-finite is 0.
    pub fn clamp_weight(&self, value: f64) -> f64 {
        if value.is_finite() {
            value.clamp(0.0, self.max_weight)
        } else {
            0.0
        }
    }

    /// Score of `vendor_id` in `scores`, clamped, with missing entries as 0.
    pub fn score_for(&self, scores: &ScoreMap, vendor_id: &str) -> f64 {
        match stored_score(scores, vendor_id) {
            Some(value) => self.clamp_score(value),
            None => self.missing_score(),
        }
    }

    pub fn approx_eq(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.tie_epsilon
    }
}

/// Raw stored entry, if any.
pub fn stored_score(scores: &ScoreMap, vendor_id: &str) -> Option<f64> {
    scores.get(vendor_id).copied()
}

/// Fraction of a parent score a weight stands for.
pub fn weight_fraction(weight: f64) -> f64 {
    weight / WEIGHT_SCALE
}

/// Weighted mean of `(score, weight)` pairs.
///
/// Weights are renormalized over the entries with non-zero weight. When every
/// weight is zero the plain arithmetic mean is used, and an empty slice is 0.
pub fn weighted_mean(entries: &[(f64, f64)]) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }

    let total_weight: f64 = entries.iter().map(|(_, w)| w).filter(|w| **w > 0.0).sum();
    if total_weight > 0.0 {
        entries
            .iter()
            .filter(|(_, w)| *w > 0.0)
            .map(|(s, w)| s * (w / total_weight))
            .sum()
    } else {
        entries.iter().map(|(s, _)| s).sum::<f64>() / entries.len() as f64
    }
}

/// Replace any non-finite value with 0 before it reaches output.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
