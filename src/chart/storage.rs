use super::types::{Chart, Workspace};
use anyhow::{bail, Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(DocumentFormat::Json),
            Some("yaml") | Some("yml") => Ok(DocumentFormat::Yaml),
            _ => bail!(
                "Unsupported chart document {}: expected a .json, .yaml or .yml file",
                path.display()
            ),
        }
    }
}

/// Parse a document that holds either a workspace (`charts: [...]`) or a
/// single chart.
fn parse_document(content: &str, format: DocumentFormat) -> Result<Vec<Chart>> {
    match format {
        DocumentFormat::Json => {
            if let Ok(workspace) = serde_json::from_str::<Workspace>(content) {
                return Ok(workspace.charts);
            }
            let chart: Chart = serde_json::from_str(content).context("invalid JSON chart")?;
            Ok(vec![chart])
        }
        DocumentFormat::Yaml => {
            if let Ok(workspace) = serde_saphyr::from_str::<Workspace>(content) {
                return Ok(workspace.charts);
            }
            let chart: Chart = serde_saphyr::from_str(content)
                .map_err(|e| anyhow::anyhow!("invalid YAML chart: {}", e))?;
            Ok(vec![chart])
        }
    }
}

/// Load every chart from a single document file.
pub fn load_document(path: &Path) -> Result<Vec<Chart>> {
    let format = DocumentFormat::from_path(path)?;
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read chart document at {}", path.display()))?;
    let charts = parse_document(&content, format)
        .with_context(|| format!("Failed to parse chart document {}", path.display()))?;
    debug!("loaded {} chart(s) from {}", charts.len(), path.display());
    Ok(charts)
}

/// Expand glob patterns into document paths, in pattern order.
/// Each pattern must match at least one file.
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let mut matched = 0;
        for entry in glob::glob(pattern)
            .with_context(|| format!("Invalid document pattern '{}'", pattern))?
        {
            let path = entry.with_context(|| format!("Failed to read a match of '{}'", pattern))?;
            if path.is_file() {
                paths.push(path);
                matched += 1;
            }
        }
        if matched == 0 {
            bail!("No chart documents match '{}'", pattern);
        }
    }
    Ok(paths)
}

/// Load all charts from the documents matching `patterns`, sorted by
/// `Chart.order` (stable, so document order breaks ties).
pub fn load_documents(patterns: &[String]) -> Result<Vec<Chart>> {
    let mut charts = Vec::new();
    for path in expand_patterns(patterns)? {
        charts.extend(load_document(&path)?);
    }
    charts.sort_by_key(|c| c.order);
    Ok(charts)
}

/// Find a chart by id, falling back to a case-insensitive name match
pub fn find_chart<'a>(charts: &'a [Chart], key: &str) -> Option<&'a Chart> {
    charts
        .iter()
        .find(|c| c.id == key)
        .or_else(|| charts.iter().find(|c| c.name.eq_ignore_ascii_case(key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let path = env::temp_dir().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_single_chart_json() {
        let path = write_temp(
            "radar_score_test_single.json",
            r#"{ "id": "c1", "name": "One", "vendors": [ { "id": "a", "name": "A" } ] }"#,
        );

        let charts = load_document(&path).unwrap();
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].id, "c1");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_workspace_yaml_sorted_by_order() {
        let path = write_temp(
            "radar_score_test_workspace.yaml",
            r#"
charts:
  - id: second
    name: Second
    order: 2
  - id: first
    name: First
    order: 1
"#,
        );

        let pattern = path.display().to_string();
        let charts = load_documents(&[pattern]).unwrap();
        let ids: Vec<&str> = charts.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_unsupported_extension() {
        let path = write_temp("radar_score_test_chart.txt", "{}");
        let result = load_document(&path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Unsupported"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_document_reports_path() {
        let path = write_temp("radar_score_test_broken.json", r#"{ "name": "no id" }"#);
        let err = load_document(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("radar_score_test_broken.json"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_pattern_without_match_is_error() {
        let pattern = env::temp_dir()
            .join("radar_score_no_such_dir_*/*.json")
            .display()
            .to_string();
        assert!(load_documents(&[pattern]).is_err());
    }

    #[test]
    fn test_find_chart_by_id_or_name() {
        let charts = vec![Chart::new("db", "Databases"), Chart::new("q", "Queues")];
        assert_eq!(find_chart(&charts, "q").map(|c| c.name.as_str()), Some("Queues"));
        assert_eq!(find_chart(&charts, "databases").map(|c| c.id.as_str()), Some("db"));
        assert!(find_chart(&charts, "caches").is_none());
    }
}
