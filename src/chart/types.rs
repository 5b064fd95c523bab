use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Vendor id -> stored raw score. Entries may be missing or out of range;
/// the scoring engine resolves both.
pub type ScoreMap = BTreeMap<String, f64>;

fn default_visible() -> bool {
    true
}

fn default_marker() -> String {
    "circle".to_string()
}

/// A comparison chart: a tree of weighted dimensions scored per vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
    #[serde(default)]
    pub vendors: Vec<Vendor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A top-level axis of the chart.
///
/// When `sub_dimensions` is non-empty the dimension's own `scores` are
/// ignored and the sub-dimension scores are aggregated instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimension {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Relative weight among sibling dimensions, 0-100
    pub weight: f64,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub scores: ScoreMap,
    #[serde(default)]
    pub sub_dimensions: Vec<SubDimension>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubDimension {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Relative weight among siblings of the same parent, 0-100
    pub weight: f64,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub scores: ScoreMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default = "default_marker")]
    pub marker: String,
    #[serde(default)]
    pub order: i64,
    /// Hidden vendors stay in the document but are never scored
    #[serde(default = "default_visible")]
    pub visible: bool,
}

/// A document holding several charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub charts: Vec<Chart>,
}

impl Chart {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            order: 0,
            dimensions: Vec::new(),
            vendors: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimensions.push(dimension);
        self
    }

    pub fn with_vendor(mut self, vendor: Vendor) -> Self {
        self.vendors.push(vendor);
        self
    }

    /// Dimensions sorted by `order`; equal orders keep document order.
    pub fn ordered_dimensions(&self) -> Vec<&Dimension> {
        let mut dimensions: Vec<&Dimension> = self.dimensions.iter().collect();
        dimensions.sort_by_key(|d| d.order);
        dimensions
    }

    /// Visible vendors sorted by `order`; equal orders keep document order.
    pub fn visible_vendors(&self) -> Vec<&Vendor> {
        let mut vendors: Vec<&Vendor> = self.vendors.iter().filter(|v| v.visible).collect();
        vendors.sort_by_key(|v| v.order);
        vendors
    }

    pub fn is_known_vendor(&self, vendor_id: &str) -> bool {
        self.vendors.iter().any(|v| v.id == vendor_id)
    }

    /// Find a vendor by id, falling back to a case-insensitive name match
    pub fn find_vendor(&self, key: &str) -> Option<&Vendor> {
        self.vendors
            .iter()
            .find(|v| v.id == key)
            .or_else(|| self.vendors.iter().find(|v| v.name.eq_ignore_ascii_case(key)))
    }
}

impl Dimension {
    pub fn new(id: impl Into<String>, name: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            weight,
            order: 0,
            scores: ScoreMap::new(),
            sub_dimensions: Vec::new(),
        }
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub fn with_score(mut self, vendor_id: impl Into<String>, score: f64) -> Self {
        self.scores.insert(vendor_id.into(), score);
        self
    }

    pub fn with_sub_dimension(mut self, sub_dimension: SubDimension) -> Self {
        self.sub_dimensions.push(sub_dimension);
        self
    }

    pub fn has_sub_dimensions(&self) -> bool {
        !self.sub_dimensions.is_empty()
    }

    pub fn ordered_sub_dimensions(&self) -> Vec<&SubDimension> {
        let mut subs: Vec<&SubDimension> = self.sub_dimensions.iter().collect();
        subs.sort_by_key(|s| s.order);
        subs
    }
}

impl SubDimension {
    pub fn new(id: impl Into<String>, name: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            weight,
            order: 0,
            scores: ScoreMap::new(),
        }
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub fn with_score(mut self, vendor_id: impl Into<String>, score: f64) -> Self {
        self.scores.insert(vendor_id.into(), score);
        self
    }
}

impl Vendor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: String::new(),
            marker: default_marker(),
            order: 0,
            visible: true,
        }
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_vendors_sorted_and_filtered() {
        let chart = Chart::new("c", "Chart")
            .with_vendor(Vendor::new("b", "Beta").with_order(2))
            .with_vendor(Vendor::new("h", "Hidden").with_order(0).hidden())
            .with_vendor(Vendor::new("a", "Alpha").with_order(1));

        let ids: Vec<&str> = chart.visible_vendors().iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_equal_order_keeps_document_order() {
        let chart = Chart::new("c", "Chart")
            .with_dimension(Dimension::new("y", "Y", 50.0))
            .with_dimension(Dimension::new("x", "X", 50.0));

        let ids: Vec<&str> = chart.ordered_dimensions().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["y", "x"]);
    }

    #[test]
    fn test_find_vendor_by_id_then_name() {
        let chart = Chart::new("c", "Chart")
            .with_vendor(Vendor::new("v1", "Acme"))
            .with_vendor(Vendor::new("v2", "Globex"));

        assert_eq!(chart.find_vendor("v2").map(|v| v.name.as_str()), Some("Globex"));
        assert_eq!(chart.find_vendor("acme").map(|v| v.id.as_str()), Some("v1"));
        assert!(chart.find_vendor("initech").is_none());
    }

    #[test]
    fn test_parse_chart_json_defaults() {
        let json = r##"{
            "id": "c1",
            "name": "Databases",
            "dimensions": [
                { "id": "perf", "name": "Performance", "weight": 60,
                  "scores": { "a": 8 } },
                { "id": "ops", "name": "Operations", "weight": 40,
                  "subDimensions": [
                    { "id": "backup", "name": "Backup", "weight": 50, "scores": { "a": 10 } }
                  ] }
            ],
            "vendors": [ { "id": "a", "name": "Acme", "color": "#ff0000" } ],
            "createdAt": "2024-03-01T10:00:00Z"
        }"##;

        let chart: Chart = serde_json::from_str(json).unwrap();
        assert_eq!(chart.dimensions.len(), 2);
        assert_eq!(chart.dimensions[0].scores.get("a"), Some(&8.0));
        assert_eq!(chart.dimensions[1].sub_dimensions.len(), 1);
        assert!(chart.vendors[0].visible);
        assert_eq!(chart.vendors[0].marker, "circle");
        assert!(chart.created_at.is_some());
        assert!(chart.updated_at.is_none());
    }

    #[test]
    fn test_parse_chart_yaml() {
        let yaml = r#"
id: c1
name: Databases
dimensions:
  - id: perf
    name: Performance
    weight: 100
    scores:
      a: 7.5
vendors:
  - id: a
    name: Acme
    visible: false
"#;
        let chart: Chart = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(chart.dimensions[0].weight, 100.0);
        assert_eq!(chart.dimensions[0].scores.get("a"), Some(&7.5));
        assert!(!chart.vendors[0].visible);
    }
}
