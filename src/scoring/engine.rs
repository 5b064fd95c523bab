use super::error::ChartResult;
use super::numeric::{finite_or_zero, stored_score, weight_fraction, weighted_mean, ScoringParams};
use super::ranking::rank_order;
use super::validation::validate_chart;
use crate::chart::{Chart, Dimension, ScoreMap, Vendor};
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashMap;

/// How a dimension's raw score was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Aggregation {
    /// No sub-dimensions: the dimension's own score map
    Direct,
    /// Sub-dimension scores averaged by renormalized non-zero weights
    Weighted,
    /// Every sub-dimension weight is zero: plain arithmetic mean
    UnweightedMean,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubDimensionScore {
    pub sub_dimension_id: String,
    pub sub_dimension_name: String,
    pub weight: f64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorDimensionScore {
    pub vendor_id: String,
    pub vendor_name: String,
    pub raw_score: f64,
    pub weighted_score: f64,
    /// Clamped per-sub-dimension scores, in sub-dimension order
    pub sub_scores: Vec<SubDimensionScore>,
}

/// One top-level dimension scored for every visible vendor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedDimensionScore {
    pub dimension_id: String,
    pub dimension_name: String,
    pub weight: f64,
    pub order: i64,
    pub aggregation: Aggregation,
    /// Entries follow `Vendor.order`
    pub vendor_scores: Vec<VendorDimensionScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionContribution {
    pub dimension_id: String,
    pub dimension_name: String,
    pub raw_score: f64,
    pub weight: f64,
    /// raw_score * weight / 100
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorTotalScore {
    pub vendor_id: String,
    pub vendor_name: String,
    pub color: String,
    pub marker: String,
    pub total_score: f64,
    /// Total a vendor scoring the maximum everywhere would get
    pub max_possible: f64,
    /// total_score as a percentage of max_possible, 0 when nothing is weighted
    pub percent: f64,
    /// Competition rank, 1 = best
    pub rank: u32,
    /// Another vendor has the same rank number. Ties are not chained: a
    /// vendor within epsilon of a higher-ranked one can still rank lower.
    pub tied: bool,
    pub dimension_breakdown: Vec<DimensionContribution>,
}

/// Scoring outcome for one chart of a workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartScoreOutcome {
    pub chart_id: String,
    pub chart_name: String,
    pub result: ChartResult<Vec<VendorTotalScore>>,
}

/// Clamped score for `vendor_id`, 0 when the entry is missing.
fn resolve_score(scores: &ScoreMap, vendor_id: &str, location: &str, params: &ScoringParams) -> f64 {
    match stored_score(scores, vendor_id) {
        Some(stored) => {
            let used = params.clamp_score(stored);
            if used != stored {
                warn!(
                    "score {} for vendor '{}' in '{}' treated as {}",
                    stored, vendor_id, location, used
                );
            }
            used
        }
        None => params.missing_score(),
    }
}

fn score_dimension(
    dimension: &Dimension,
    vendors: &[&Vendor],
    params: &ScoringParams,
) -> CalculatedDimensionScore {
    let weight = params.clamp_weight(dimension.weight);
    let subs = dimension.ordered_sub_dimensions();
    let sub_weights: Vec<f64> = subs.iter().map(|s| params.clamp_weight(s.weight)).collect();

    let aggregation = if subs.is_empty() {
        Aggregation::Direct
    } else if sub_weights.iter().any(|w| *w > 0.0) {
        Aggregation::Weighted
    } else {
        debug!(
            "dimension '{}': all sub-dimension weights are zero, using unweighted mean",
            dimension.id
        );
        Aggregation::UnweightedMean
    };

    let vendor_scores = vendors
        .iter()
        .map(|vendor| {
            let (raw_score, sub_scores) = if subs.is_empty() {
                let raw = resolve_score(&dimension.scores, &vendor.id, &dimension.id, params);
                (raw, Vec::new())
            } else {
                let sub_scores: Vec<SubDimensionScore> = subs
                    .iter()
                    .zip(&sub_weights)
                    .map(|(sub, sub_weight)| {
                        let location = format!("{}/{}", dimension.id, sub.id);
                        SubDimensionScore {
                            sub_dimension_id: sub.id.clone(),
                            sub_dimension_name: sub.name.clone(),
                            weight: *sub_weight,
                            score: resolve_score(&sub.scores, &vendor.id, &location, params),
                        }
                    })
                    .collect();
                let entries: Vec<(f64, f64)> =
                    sub_scores.iter().map(|s| (s.score, s.weight)).collect();
                (weighted_mean(&entries), sub_scores)
            };

            let raw_score = finite_or_zero(raw_score);
            VendorDimensionScore {
                vendor_id: vendor.id.clone(),
                vendor_name: vendor.name.clone(),
                raw_score,
                weighted_score: finite_or_zero(raw_score * weight_fraction(weight)),
                sub_scores,
            }
        })
        .collect();

    CalculatedDimensionScore {
        dimension_id: dimension.id.clone(),
        dimension_name: dimension.name.clone(),
        weight,
        order: dimension.order,
        aggregation,
        vendor_scores,
    }
}

fn dimension_scores(
    chart: &Chart,
    vendors: &[&Vendor],
    params: &ScoringParams,
) -> Vec<CalculatedDimensionScore> {
    chart
        .ordered_dimensions()
        .into_iter()
        .map(|dimension| score_dimension(dimension, vendors, params))
        .collect()
}

/// Score every top-level dimension for every visible vendor, with default
/// parameters.
pub fn compute_dimension_scores(chart: &Chart) -> ChartResult<Vec<CalculatedDimensionScore>> {
    compute_dimension_scores_with(chart, &ScoringParams::default())
}

/// Score every top-level dimension for every visible vendor.
///
/// Output follows `Dimension.order`; vendor entries inside each dimension
/// follow `Vendor.order`. Hidden vendors are left out entirely.
pub fn compute_dimension_scores_with(
    chart: &Chart,
    params: &ScoringParams,
) -> ChartResult<Vec<CalculatedDimensionScore>> {
    validate_chart(chart)?;
    let vendors = chart.visible_vendors();
    Ok(dimension_scores(chart, &vendors, params))
}

/// Ranked vendor totals with default parameters.
pub fn compute_vendor_total_scores(chart: &Chart) -> ChartResult<Vec<VendorTotalScore>> {
    compute_vendor_total_scores_with(chart, &ScoringParams::default())
}

/// Ranked vendor totals with a per-dimension breakdown.
///
/// Results are ordered by rank; vendors sharing a rank keep `Vendor.order`.
pub fn compute_vendor_total_scores_with(
    chart: &Chart,
    params: &ScoringParams,
) -> ChartResult<Vec<VendorTotalScore>> {
    validate_chart(chart)?;
    let vendors = chart.visible_vendors();
    let dimensions = dimension_scores(chart, &vendors, params);

    let max_possible = finite_or_zero(
        dimensions
            .iter()
            .map(|d| params.max_score * weight_fraction(d.weight))
            .sum(),
    );

    let totals: Vec<f64> = (0..vendors.len())
        .map(|i| {
            finite_or_zero(
                dimensions
                    .iter()
                    .map(|d| d.vendor_scores[i].weighted_score)
                    .sum(),
            )
        })
        .collect();

    let ranked = rank_order(&totals, params.tie_epsilon);
    let mut rank_sizes: HashMap<u32, usize> = HashMap::new();
    for r in &ranked {
        *rank_sizes.entry(r.rank).or_insert(0) += 1;
    }

    let results: Vec<VendorTotalScore> = ranked
        .iter()
        .map(|r| {
            let vendor = vendors[r.index];
            let total_score = totals[r.index];
            let percent = if max_possible > 0.0 {
                finite_or_zero(total_score / max_possible * 100.0)
            } else {
                0.0
            };

            let dimension_breakdown = dimensions
                .iter()
                .map(|d| {
                    let entry = &d.vendor_scores[r.index];
                    DimensionContribution {
                        dimension_id: d.dimension_id.clone(),
                        dimension_name: d.dimension_name.clone(),
                        raw_score: entry.raw_score,
                        weight: d.weight,
                        contribution: entry.weighted_score,
                    }
                })
                .collect();

            VendorTotalScore {
                vendor_id: vendor.id.clone(),
                vendor_name: vendor.name.clone(),
                color: vendor.color.clone(),
                marker: vendor.marker.clone(),
                total_score,
                max_possible,
                percent,
                rank: r.rank,
                tied: rank_sizes.get(&r.rank).copied().unwrap_or(0) > 1,
                dimension_breakdown,
            }
        })
        .collect();

    debug!(
        "chart '{}': ranked {} vendor(s) over {} dimension(s)",
        chart.id,
        results.len(),
        dimensions.len()
    );

    Ok(results)
}

/// Score each chart independently. A structurally broken chart reports its
/// own error and does not affect the others.
pub fn score_workspace(charts: &[Chart], params: &ScoringParams) -> Vec<ChartScoreOutcome> {
    charts
        .iter()
        .map(|chart| ChartScoreOutcome {
            chart_id: chart.id.clone(),
            chart_name: chart.name.clone(),
            result: compute_vendor_total_scores_with(chart, params),
        })
        .collect()
}
