use super::numeric::{ScoringParams, WEIGHT_SCALE};
use crate::chart::{Chart, ScoreMap};
use serde::Serialize;
use std::fmt;

/// Slack allowed when checking that top-level weights add up to 100.
const WEIGHT_TOTAL_TOLERANCE: f64 = 1e-6;

/// A data-quality problem the engine repairs silently.
///
/// `location` is a dimension id, or `dimension/sub-dimension` for
/// sub-dimensions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Anomaly {
    ScoreClamped {
        location: String,
        vendor_id: String,
        stored: f64,
        used: f64,
    },
    NonFiniteScore {
        location: String,
        vendor_id: String,
    },
    WeightClamped {
        location: String,
        stored: f64,
        used: f64,
    },
    NonFiniteWeight {
        location: String,
    },
    ZeroSubDimensionWeights {
        dimension_id: String,
    },
    WeightTotalMismatch {
        total: f64,
        expected: f64,
    },
    IgnoredDirectScores {
        dimension_id: String,
        entries: usize,
    },
    OrphanScore {
        location: String,
        vendor_id: String,
    },
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::ScoreClamped {
                location,
                vendor_id,
                stored,
                used,
            } => write!(
                f,
                "{}: score {} for vendor '{}' clamped to {}",
                location, stored, vendor_id, used
            ),
            Anomaly::NonFiniteScore {
                location,
                vendor_id,
            } => write!(
                f,
                "{}: score for vendor '{}' is not a number, treated as missing",
                location, vendor_id
            ),
            Anomaly::WeightClamped {
                location,
                stored,
                used,
            } => write!(f, "{}: weight {} clamped to {}", location, stored, used),
            Anomaly::NonFiniteWeight { location } => {
                write!(f, "{}: weight is not a number, treated as 0", location)
            }
            Anomaly::ZeroSubDimensionWeights { dimension_id } => write!(
                f,
                "{}: all sub-dimension weights are 0, sub-dimensions averaged equally",
                dimension_id
            ),
            Anomaly::WeightTotalMismatch { total, expected } => write!(
                f,
                "dimension weights add up to {} instead of {}",
                total, expected
            ),
            Anomaly::IgnoredDirectScores {
                dimension_id,
                entries,
            } => write!(
                f,
                "{}: {} direct score(s) ignored because the dimension has sub-dimensions",
                dimension_id, entries
            ),
            Anomaly::OrphanScore {
                location,
                vendor_id,
            } => write!(f, "{}: score for unknown vendor '{}'", location, vendor_id),
        }
    }
}

fn audit_weight(weight: f64, location: &str, params: &ScoringParams, found: &mut Vec<Anomaly>) {
    if !weight.is_finite() {
        found.push(Anomaly::NonFiniteWeight {
            location: location.to_string(),
        });
        return;
    }
    let used = params.clamp_weight(weight);
    if used != weight {
        found.push(Anomaly::WeightClamped {
            location: location.to_string(),
            stored: weight,
            used,
        });
    }
}

fn audit_scores(
    chart: &Chart,
    scores: &ScoreMap,
    location: &str,
    params: &ScoringParams,
    found: &mut Vec<Anomaly>,
) {
    for (vendor_id, &stored) in scores {
        if !chart.is_known_vendor(vendor_id) {
            found.push(Anomaly::OrphanScore {
                location: location.to_string(),
                vendor_id: vendor_id.clone(),
            });
        } else if !stored.is_finite() {
            found.push(Anomaly::NonFiniteScore {
                location: location.to_string(),
                vendor_id: vendor_id.clone(),
            });
        } else {
            let used = params.clamp_score(stored);
            if used != stored {
                found.push(Anomaly::ScoreClamped {
                    location: location.to_string(),
                    vendor_id: vendor_id.clone(),
                    stored,
                    used,
                });
            }
        }
    }
}

/// List every data-quality problem in `chart`, in dimension order.
///
/// Never fails; the engine resolves all of these by clamping or fallback.
/// Scores of hidden vendors are audited too.
pub fn audit_chart(chart: &Chart, params: &ScoringParams) -> Vec<Anomaly> {
    let mut found = Vec::new();
    let dimensions = chart.ordered_dimensions();

    for dimension in &dimensions {
        audit_weight(dimension.weight, &dimension.id, params, &mut found);

        if dimension.has_sub_dimensions() {
            if !dimension.scores.is_empty() {
                found.push(Anomaly::IgnoredDirectScores {
                    dimension_id: dimension.id.clone(),
                    entries: dimension.scores.len(),
                });
            }
            for sub in dimension.ordered_sub_dimensions() {
                let location = format!("{}/{}", dimension.id, sub.id);
                audit_weight(sub.weight, &location, params, &mut found);
                audit_scores(chart, &sub.scores, &location, params, &mut found);
            }
            if dimension
                .sub_dimensions
                .iter()
                .all(|s| params.clamp_weight(s.weight) == 0.0)
            {
                found.push(Anomaly::ZeroSubDimensionWeights {
                    dimension_id: dimension.id.clone(),
                });
            }
        } else {
            audit_scores(chart, &dimension.scores, &dimension.id, params, &mut found);
        }
    }

    if !dimensions.is_empty() {
        let total: f64 = dimensions.iter().map(|d| params.clamp_weight(d.weight)).sum();
        if (total - WEIGHT_SCALE).abs() > WEIGHT_TOTAL_TOLERANCE {
            found.push(Anomaly::WeightTotalMismatch {
                total,
                expected: WEIGHT_SCALE,
            });
        }
    }

    found
}
