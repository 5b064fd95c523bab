use super::engine::compute_dimension_scores_with;
use super::error::ChartResult;
use super::numeric::ScoringParams;
use crate::chart::Chart;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarAxis {
    pub dimension_id: String,
    pub name: String,
    pub weight: f64,
}

/// One polygon on the radar: a vendor's raw score per axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorSeries {
    pub vendor_id: String,
    pub name: String,
    pub color: String,
    pub marker: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarSeries {
    pub chart_id: String,
    pub chart_name: String,
    pub min_value: f64,
    pub max_value: f64,
    pub axes: Vec<RadarAxis>,
    pub series: Vec<VendorSeries>,
}

/// Build the radar-chart view of a chart: one axis per dimension and one
/// series per visible vendor, both in display order.
pub fn radar_series(chart: &Chart, params: &ScoringParams) -> ChartResult<RadarSeries> {
    let dimensions = compute_dimension_scores_with(chart, params)?;

    let axes = dimensions
        .iter()
        .map(|d| RadarAxis {
            dimension_id: d.dimension_id.clone(),
            name: d.dimension_name.clone(),
            weight: d.weight,
        })
        .collect();

    let series = chart
        .visible_vendors()
        .into_iter()
        .enumerate()
        .map(|(i, vendor)| VendorSeries {
            vendor_id: vendor.id.clone(),
            name: vendor.name.clone(),
            color: vendor.color.clone(),
            marker: vendor.marker.clone(),
            values: dimensions.iter().map(|d| d.vendor_scores[i].raw_score).collect(),
        })
        .collect();

    Ok(RadarSeries {
        chart_id: chart.id.clone(),
        chart_name: chart.name.clone(),
        min_value: params.min_score,
        max_value: params.max_score,
        axes,
        series,
    })
}
