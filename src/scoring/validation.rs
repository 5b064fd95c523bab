use super::config::ScoringConfig;
use super::error::{ChartError, ChartResult};
use crate::chart::Chart;
use std::collections::HashSet;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(eps) = config.tie_epsilon {
        if !eps.is_finite() || eps < 0.0 {
            errors.push(format!(
                "scoring.tie_epsilon: must be a non-negative number, got {}",
                eps
            ));
        }
    }

    let mut bounds_finite = true;
    for (field, value) in [("min_score", config.min_score), ("max_score", config.max_score)] {
        if let Some(v) = value {
            if !v.is_finite() {
                errors.push(format!("scoring.{}: must be a finite number", field));
                bounds_finite = false;
            }
        }
    }

    if bounds_finite {
        let params = config.params();
        if params.min_score >= params.max_score {
            errors.push(format!(
                "scoring.min_score: must be below max_score ({} >= {})",
                params.min_score, params.max_score
            ));
        }
    }

    if let Some(max_weight) = config.max_weight {
        if !max_weight.is_finite() || max_weight <= 0.0 {
            errors.push(format!(
                "scoring.max_weight: must be a positive number, got {}",
                max_weight
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check the structural contract of a chart before it is scored.
///
/// Fails on the first violation: a vendor or dimension id used twice, or a
/// sub-dimension id repeated inside one dimension. Each dimension owns its
/// `Vec<SubDimension>`, so two dimensions can never share one collection.
pub fn validate_chart(chart: &Chart) -> ChartResult<()> {
    let mut vendor_ids = HashSet::new();
    for vendor in &chart.vendors {
        if !vendor_ids.insert(vendor.id.as_str()) {
            return Err(ChartError::DuplicateVendor {
                chart_id: chart.id.clone(),
                vendor_id: vendor.id.clone(),
            });
        }
    }

    let mut dimension_ids = HashSet::new();
    for dimension in &chart.dimensions {
        if !dimension_ids.insert(dimension.id.as_str()) {
            return Err(ChartError::DuplicateDimension {
                chart_id: chart.id.clone(),
                dimension_id: dimension.id.clone(),
            });
        }

        let mut sub_ids = HashSet::new();
        for sub in &dimension.sub_dimensions {
            if !sub_ids.insert(sub.id.as_str()) {
                return Err(ChartError::DuplicateSubDimension {
                    chart_id: chart.id.clone(),
                    dimension_id: dimension.id.clone(),
                    sub_dimension_id: sub.id.clone(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Dimension, SubDimension, Vendor};

    #[test]
    fn test_valid_config() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_config() {
        let config = ScoringConfig {
            tie_epsilon: None,
            min_score: None,
            max_score: None,
            max_weight: None,
        };
        assert!(validate_scoring(&config).is_ok());
    }

    #[test]
    fn test_negative_epsilon() {
        let config = ScoringConfig {
            tie_epsilon: Some(-1.0),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.tie_epsilon"));
    }

    #[test]
    fn test_inverted_score_range() {
        let config = ScoringConfig {
            min_score: Some(10.0),
            max_score: Some(5.0),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.min_score"));
    }

    #[test]
    fn test_range_against_default_bound() {
        // max_score unset falls back to 10
        let config = ScoringConfig {
            tie_epsilon: None,
            min_score: Some(12.0),
            max_score: None,
            max_weight: None,
        };
        assert!(validate_scoring(&config).is_err());
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ScoringConfig {
            tie_epsilon: Some(f64::NAN),
            min_score: Some(f64::INFINITY),
            max_score: None,
            max_weight: Some(0.0),
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    fn sample_chart() -> Chart {
        Chart::new("c", "Chart")
            .with_vendor(Vendor::new("a", "A"))
            .with_vendor(Vendor::new("b", "B"))
            .with_dimension(
                Dimension::new("d1", "D1", 50.0)
                    .with_sub_dimension(SubDimension::new("s1", "S1", 50.0))
                    .with_sub_dimension(SubDimension::new("s2", "S2", 50.0)),
            )
            .with_dimension(Dimension::new("d2", "D2", 50.0))
    }

    #[test]
    fn test_valid_chart() {
        assert!(validate_chart(&sample_chart()).is_ok());
    }

    #[test]
    fn test_empty_chart_is_valid() {
        assert!(validate_chart(&Chart::new("c", "Empty")).is_ok());
    }

    #[test]
    fn test_duplicate_vendor() {
        let chart = sample_chart().with_vendor(Vendor::new("a", "Another A"));
        assert_eq!(
            validate_chart(&chart),
            Err(ChartError::DuplicateVendor {
                chart_id: "c".to_string(),
                vendor_id: "a".to_string(),
            })
        );
    }

    #[test]
    fn test_duplicate_dimension() {
        let chart = sample_chart().with_dimension(Dimension::new("d2", "Again", 0.0));
        assert!(matches!(
            validate_chart(&chart),
            Err(ChartError::DuplicateDimension { .. })
        ));
    }

    #[test]
    fn test_duplicate_sub_dimension_in_parent() {
        let chart = Chart::new("c", "Chart").with_dimension(
            Dimension::new("d", "D", 100.0)
                .with_sub_dimension(SubDimension::new("s", "S", 50.0))
                .with_sub_dimension(SubDimension::new("s", "S again", 50.0)),
        );
        assert!(matches!(
            validate_chart(&chart),
            Err(ChartError::DuplicateSubDimension { .. })
        ));
    }

    #[test]
    fn test_same_sub_id_under_different_parents_is_allowed() {
        let chart = Chart::new("c", "Chart")
            .with_dimension(
                Dimension::new("d1", "D1", 50.0)
                    .with_sub_dimension(SubDimension::new("s", "Cost", 100.0)),
            )
            .with_dimension(
                Dimension::new("d2", "D2", 50.0)
                    .with_sub_dimension(SubDimension::new("s", "Speed", 100.0)),
            );
        assert!(validate_chart(&chart).is_ok());
    }

    #[test]
    fn test_template_identical_dimensions_are_valid() {
        let template = vec![
            SubDimension::new("quality", "Quality", 50.0),
            SubDimension::new("speed", "Speed", 50.0),
        ];
        let mut frontend = Dimension::new("frontend", "Frontend", 50.0);
        frontend.sub_dimensions = template.clone();
        let mut backend = Dimension::new("backend", "Backend", 50.0);
        backend.sub_dimensions = template;

        let chart = Chart::new("c", "Chart")
            .with_vendor(Vendor::new("a", "A"))
            .with_dimension(frontend)
            .with_dimension(backend);
        assert!(validate_chart(&chart).is_ok());
    }
}
