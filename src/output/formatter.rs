use std::io::IsTerminal;
use owo_colors::OwoColorize;
use serde::Serialize;
use terminal_size::{Width, terminal_size};

use crate::config::ColorMode;
use crate::scoring::{Aggregation, Anomaly, CalculatedDimensionScore, VendorTotalScore};

/// Resolve a color mode against stdout (auto-detects TTY)
pub fn should_use_colors(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::io::stdout().is_terminal(),
    }
}

/// Format a score with a fixed number of decimals. Never prints "-0".
pub fn format_score(score: f64, precision: usize) -> String {
    let score = if score == 0.0 { 0.0 } else { score };
    format!("{:.*}", precision, score)
}

/// Rank with a trailing "=" when shared with another vendor
pub fn format_rank(rank: u32, tied: bool) -> String {
    if tied {
        format!("{}=", rank)
    } else {
        rank.to_string()
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format ranked vendors as a leaderboard: rank, total, percent, name.
/// Rank column right-aligned with a trailing "=" on ties.
pub fn format_leaderboard(totals: &[VendorTotalScore], precision: usize, use_colors: bool) -> String {
    if totals.is_empty() {
        return "No visible vendors.".to_string();
    }

    let rank_width = 4;
    let score_width = totals
        .iter()
        .map(|t| format_score(t.total_score, precision).len())
        .max()
        .unwrap_or(1);
    let percent_width = 6;
    let separator = "  ";

    let term_width = get_terminal_width();
    let fixed_width = rank_width + score_width + percent_width + 1 + separator.len() * 3;

    totals
        .iter()
        .map(|t| {
            let rank_str = format!("{:>width$}", format_rank(t.rank, t.tied), width = rank_width);
            let score_str = format!(
                "{:>width$}",
                format_score(t.total_score, precision),
                width = score_width
            );
            let percent_str = format!("{:>width$.1}%", t.percent, width = percent_width);

            let name = match term_width {
                Some(width) if width > fixed_width + 10 => truncate_name(&t.vendor_name, width - fixed_width),
                Some(_) => truncate_name(&t.vendor_name, 20),
                None => t.vendor_name.clone(),
            };

            if use_colors {
                format!(
                    "{}{}{}{}{}{}{}",
                    rank_str.dimmed(),
                    separator,
                    score_str.bold(),
                    separator,
                    percent_str.cyan(),
                    separator,
                    name
                )
            } else {
                format!(
                    "{}{}{}{}{}{}{}",
                    rank_str, separator, score_str, separator, percent_str, separator, name
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format ranked vendors as tab-separated values for scripting
/// Columns: rank, vendor_id, vendor_name, total, percent (no headers, no colors)
pub fn format_tsv(totals: &[VendorTotalScore], precision: usize) -> String {
    totals
        .iter()
        .map(|t| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                t.rank,
                t.vendor_id,
                t.vendor_name,
                format_score(t.total_score, precision),
                format_score(t.percent, precision)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format per-dimension scores as tab-separated values
/// Columns: dimension_id, vendor_id, raw_score, weighted_score
pub fn format_dimension_tsv(dimensions: &[CalculatedDimensionScore], precision: usize) -> String {
    dimensions
        .iter()
        .flat_map(|d| {
            d.vendor_scores.iter().map(move |v| {
                format!(
                    "{}\t{}\t{}\t{}",
                    d.dimension_id,
                    v.vendor_id,
                    format_score(v.raw_score, precision),
                    format_score(v.weighted_score, precision)
                )
            })
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn aggregation_label(aggregation: Aggregation) -> &'static str {
    match aggregation {
        Aggregation::Direct => "direct",
        Aggregation::Weighted => "weighted sub-dimensions",
        Aggregation::UnweightedMean => "sub-dimension mean",
    }
}

/// Format per-dimension scores: one block per dimension, one line per vendor
pub fn format_dimension_scores(
    dimensions: &[CalculatedDimensionScore],
    precision: usize,
    use_colors: bool,
) -> String {
    if dimensions.is_empty() {
        return "No dimensions.".to_string();
    }

    dimensions
        .iter()
        .map(|d| {
            let heading = format!(
                "{} (weight {}, {})",
                d.dimension_name,
                format_score(d.weight, precision),
                aggregation_label(d.aggregation)
            );
            let mut lines = vec![if use_colors {
                heading.bold().to_string()
            } else {
                heading
            }];
            for v in &d.vendor_scores {
                lines.push(format!(
                    "  {}: {} -> {}",
                    v.vendor_name,
                    format_score(v.raw_score, precision),
                    format_score(v.weighted_score, precision)
                ));
            }
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Format why a vendor got its total: one line per dimension with
/// raw score, weight and contribution.
pub fn format_breakdown(total: &VendorTotalScore, precision: usize, use_colors: bool) -> String {
    let heading = format!(
        "{} - rank {}, total {} ({}% of {})",
        total.vendor_name,
        format_rank(total.rank, total.tied),
        format_score(total.total_score, precision),
        format_score(total.percent, 1),
        format_score(total.max_possible, precision)
    );
    let mut lines = vec![if use_colors {
        heading.bold().to_string()
    } else {
        heading
    }];

    for c in &total.dimension_breakdown {
        let contribution = format_score(c.contribution, precision);
        lines.push(format!(
            "  {}: {} x {}% = {}",
            c.dimension_name,
            format_score(c.raw_score, precision),
            format_score(c.weight, precision),
            if use_colors {
                contribution.green().to_string()
            } else {
                contribution
            }
        ));
    }
    lines.join("\n")
}

/// Format audit findings as a bullet list
pub fn format_anomalies(anomalies: &[Anomaly], use_colors: bool) -> String {
    if anomalies.is_empty() {
        return "No data-quality issues found.".to_string();
    }

    anomalies
        .iter()
        .map(|a| {
            if use_colors {
                format!("  {} {}", "-".yellow(), a)
            } else {
                format!("  - {}", a)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pretty JSON for any engine output
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}
