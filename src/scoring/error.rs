use thiserror::Error;

/// Structural contract violations in a chart document.
///
/// These abort scoring for the affected chart; data-quality problems
/// (out-of-range scores, zero weights, missing entries) never do.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    #[error("chart '{chart_id}': vendor id '{vendor_id}' is used by more than one vendor")]
    DuplicateVendor { chart_id: String, vendor_id: String },

    #[error("chart '{chart_id}': dimension id '{dimension_id}' is used by more than one dimension")]
    DuplicateDimension {
        chart_id: String,
        dimension_id: String,
    },

    #[error(
        "chart '{chart_id}': sub-dimension id '{sub_dimension_id}' appears more than once in dimension '{dimension_id}'"
    )]
    DuplicateSubDimension {
        chart_id: String,
        dimension_id: String,
        sub_dimension_id: String,
    },
}

impl ChartError {
    pub fn chart_id(&self) -> &str {
        match self {
            ChartError::DuplicateVendor { chart_id, .. }
            | ChartError::DuplicateDimension { chart_id, .. }
            | ChartError::DuplicateSubDimension { chart_id, .. } => chart_id,
        }
    }
}

pub type ChartResult<T> = Result<T, ChartError>;
