pub mod formatter;

pub use formatter::{
    format_anomalies, format_breakdown, format_dimension_scores, format_dimension_tsv, format_json, format_leaderboard,
    format_rank, format_score, format_tsv, should_use_colors,
};
