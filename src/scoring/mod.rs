pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod numeric;
pub mod ranking;
pub mod series;
pub mod validation;

pub use audit::{audit_chart, Anomaly};
pub use config::*;
pub use engine::{
    compute_dimension_scores, compute_dimension_scores_with, compute_vendor_total_scores,
    compute_vendor_total_scores_with, score_workspace, Aggregation, CalculatedDimensionScore,
    ChartScoreOutcome, DimensionContribution, SubDimensionScore, VendorDimensionScore,
    VendorTotalScore,
};
pub use error::{ChartError, ChartResult};
pub use numeric::ScoringParams;
pub use ranking::{competition_ranks, rank_order, RankedIndex};
pub use series::{radar_series, RadarAxis, RadarSeries, VendorSeries};
pub use validation::{validate_chart, validate_scoring};
