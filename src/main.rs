use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::time::Instant;

use radar_score::chart::{find_chart, load_documents, Chart};
use radar_score::config::{ColorMode, OutputFormat, MAX_PRECISION};
use radar_score::output;
use radar_score::scoring::{self, ScoringParams};

const EXIT_SUCCESS: i32 = 0;
const EXIT_NOT_FOUND: i32 = 1;
const EXIT_DOCUMENT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Args, Debug)]
struct DocumentArgs {
    /// Chart documents (.json, .yaml, .yml); glob patterns are expanded
    #[arg(required = true)]
    files: Vec<String>,

    /// Only process the chart with this id or name
    #[arg(long)]
    chart: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank visible vendors by weighted total score
    Rank(DocumentArgs),
    /// Show each dimension's raw and weighted score per vendor
    Dimensions(DocumentArgs),
    /// Explain how one vendor's total and rank came about
    Explain {
        #[command(flatten)]
        documents: DocumentArgs,

        /// Vendor id or name
        #[arg(long)]
        vendor: String,
    },
    /// Check charts for structural errors and data-quality issues
    Check(DocumentArgs),
    /// Print radar-chart series as JSON
    Series(DocumentArgs),
    /// Create a config file
    Init {
        /// Replace an existing config file
        #[arg(long)]
        force: bool,

        /// Write the defaults without asking any questions
        #[arg(long)]
        defaults: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "radar-score")]
#[command(about = "Weighted vendor scoring for comparison charts", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/radar-score/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Decimal places for scores
    #[arg(long, global = true)]
    precision: Option<usize>,

    /// Output format
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// When to color table output
    #[arg(long, global = true, value_enum)]
    color: Option<ColorMode>,

    #[command(subcommand)]
    command: Commands,
}

/// Effective settings after merging config file and flags.
struct Settings {
    params: ScoringParams,
    precision: usize,
    format: OutputFormat,
    use_colors: bool,
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let start_time = Instant::now();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Commands::Init { force, defaults } = cli.command {
        let path = cli.config.map(PathBuf::from);
        match radar_score::config::run_init(path, force, !defaults) {
            Ok(written) => {
                println!("Config written to {}", written.display());
                std::process::exit(EXIT_SUCCESS);
            }
            Err(e) => {
                eprintln!("Init failed: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
    }

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match radar_score::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = radar_score::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let output_config = config.effective_output();
    let precision = cli.precision.unwrap_or_else(|| output_config.precision());
    if precision > MAX_PRECISION {
        eprintln!("--precision must be at most {}", MAX_PRECISION);
        std::process::exit(EXIT_CONFIG);
    }

    let settings = Settings {
        params: config.effective_scoring().params(),
        precision,
        format: cli.format.unwrap_or_else(|| output_config.format()),
        use_colors: output::should_use_colors(cli.color.unwrap_or_else(|| output_config.color())),
        verbose: cli.verbose,
    };

    let code = match cli.command {
        Commands::Rank(documents) => with_charts(&documents, &settings, run_rank),
        Commands::Dimensions(documents) => with_charts(&documents, &settings, run_dimensions),
        Commands::Explain { documents, vendor } => {
            with_charts(&documents, &settings, |charts, s| run_explain(charts, s, &vendor))
        }
        Commands::Check(documents) => with_charts(&documents, &settings, run_check),
        Commands::Series(documents) => with_charts(&documents, &settings, run_series),
        Commands::Init { .. } => EXIT_SUCCESS,
    };

    if cli.verbose {
        eprintln!("Done in {:?}", start_time.elapsed());
    }

    std::process::exit(code);
}

/// Load the documents, narrow to `--chart` if given, then run `command`.
fn with_charts<F>(documents: &DocumentArgs, settings: &Settings, command: F) -> i32
where
    F: FnOnce(&[Chart], &Settings) -> i32,
{
    let charts = match load_documents(&documents.files) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Document error: {:#}", e);
            return EXIT_DOCUMENT;
        }
    };

    if settings.verbose {
        eprintln!("Loaded {} chart(s)", charts.len());
        for chart in &charts {
            eprintln!(
                "  {} ({}): {} dimension(s), {} vendor(s)",
                chart.name,
                chart.id,
                chart.dimensions.len(),
                chart.vendors.len()
            );
        }
    }

    match &documents.chart {
        Some(key) => match find_chart(&charts, key) {
            Some(chart) => command(std::slice::from_ref(chart), settings),
            None => {
                eprintln!("No chart with id or name '{}'", key);
                EXIT_NOT_FOUND
            }
        },
        None => command(&charts, settings),
    }
}

fn print_heading(chart: &Chart, settings: &Settings, count: usize) {
    if count > 1 && settings.format == OutputFormat::Table {
        println!("== {} ==", chart.name);
    }
}

fn print_json(value: &serde_json::Value) -> i32 {
    match output::format_json(value) {
        Ok(s) => {
            println!("{}", s);
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize output: {}", e);
            EXIT_DOCUMENT
        }
    }
}

fn run_rank(charts: &[Chart], settings: &Settings) -> i32 {
    let outcomes = scoring::score_workspace(charts, &settings.params);
    let failed = outcomes.iter().any(|o| o.result.is_err());

    if settings.format == OutputFormat::Json {
        let docs: Vec<_> = outcomes
            .iter()
            .map(|o| match &o.result {
                Ok(totals) => json!({ "chartId": o.chart_id, "chartName": o.chart_name, "vendors": totals }),
                Err(e) => json!({ "chartId": o.chart_id, "chartName": o.chart_name, "error": e.to_string() }),
            })
            .collect();
        let code = print_json(&json!(docs));
        return if failed { EXIT_DOCUMENT } else { code };
    }

    for (chart, outcome) in charts.iter().zip(&outcomes) {
        print_heading(chart, settings, charts.len());
        match &outcome.result {
            Ok(totals) => {
                let text = match settings.format {
                    OutputFormat::Tsv => output::format_tsv(totals, settings.precision),
                    _ => output::format_leaderboard(totals, settings.precision, settings.use_colors),
                };
                if !text.is_empty() {
                    println!("{}", text);
                }
            }
            Err(e) => eprintln!("Chart data corrupted: {}", e),
        }
    }

    if failed {
        EXIT_DOCUMENT
    } else {
        EXIT_SUCCESS
    }
}

fn run_dimensions(charts: &[Chart], settings: &Settings) -> i32 {
    let mut code = EXIT_SUCCESS;
    let mut docs = Vec::new();

    for chart in charts {
        let dimensions = match scoring::compute_dimension_scores_with(chart, &settings.params) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("Chart data corrupted: {}", e);
                code = EXIT_DOCUMENT;
                continue;
            }
        };

        match settings.format {
            OutputFormat::Json => {
                docs.push(json!({ "chartId": chart.id, "chartName": chart.name, "dimensions": dimensions }));
            }
            OutputFormat::Tsv => println!("{}", output::format_dimension_tsv(&dimensions, settings.precision)),
            OutputFormat::Table => {
                print_heading(chart, settings, charts.len());
                println!(
                    "{}",
                    output::format_dimension_scores(&dimensions, settings.precision, settings.use_colors)
                );
            }
        }
    }

    if settings.format == OutputFormat::Json {
        let printed = print_json(&json!(docs));
        if code == EXIT_SUCCESS {
            code = printed;
        }
    }
    code
}

fn run_explain(charts: &[Chart], settings: &Settings, vendor_key: &str) -> i32 {
    let mut found = false;
    let mut code = EXIT_SUCCESS;

    for chart in charts {
        let Some(vendor) = chart.find_vendor(vendor_key) else {
            continue;
        };
        found = true;

        if !vendor.visible {
            eprintln!("Vendor '{}' is hidden in chart '{}' and is not scored", vendor.name, chart.name);
            continue;
        }

        let totals = match scoring::compute_vendor_total_scores_with(chart, &settings.params) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Chart data corrupted: {}", e);
                code = EXIT_DOCUMENT;
                continue;
            }
        };

        if let Some(total) = totals.iter().find(|t| t.vendor_id == vendor.id) {
            match settings.format {
                OutputFormat::Json => {
                    let printed = print_json(&json!({ "chartId": chart.id, "chartName": chart.name, "vendor": total }));
                    if code == EXIT_SUCCESS {
                        code = printed;
                    }
                }
                _ => {
                    print_heading(chart, settings, charts.len());
                    println!(
                        "{}",
                        output::format_breakdown(total, settings.precision, settings.use_colors)
                    );
                }
            }
        }
    }

    if !found {
        eprintln!("No vendor with id or name '{}'", vendor_key);
        return EXIT_NOT_FOUND;
    }
    code
}

fn run_check(charts: &[Chart], settings: &Settings) -> i32 {
    let mut code = EXIT_SUCCESS;
    let mut docs = Vec::new();

    for chart in charts {
        let structural = scoring::validate_chart(chart);
        let anomalies = scoring::audit_chart(chart, &settings.params);
        if structural.is_err() {
            code = EXIT_DOCUMENT;
        }

        match settings.format {
            OutputFormat::Json => docs.push(json!({
                "chartId": chart.id,
                "chartName": chart.name,
                "error": structural.as_ref().err().map(|e| e.to_string()),
                "anomalies": anomalies,
            })),
            OutputFormat::Tsv => {
                if let Err(e) = &structural {
                    println!("{}\terror\t{}", chart.id, e);
                }
                for anomaly in &anomalies {
                    println!("{}\twarning\t{}", chart.id, anomaly);
                }
            }
            OutputFormat::Table => {
                println!("== {} ==", chart.name);
                match &structural {
                    Ok(()) => println!("Structure: ok"),
                    Err(e) => println!("Structure: {}", e),
                }
                println!("{}", output::format_anomalies(&anomalies, settings.use_colors));
            }
        }
    }

    if settings.format == OutputFormat::Json {
        let printed = print_json(&json!(docs));
        if code == EXIT_SUCCESS {
            code = printed;
        }
    }
    code
}

fn run_series(charts: &[Chart], settings: &Settings) -> i32 {
    let mut code = EXIT_SUCCESS;
    let mut series = Vec::new();

    for chart in charts {
        match scoring::radar_series(chart, &settings.params) {
            Ok(s) => series.push(s),
            Err(e) => {
                eprintln!("Chart data corrupted: {}", e);
                code = EXIT_DOCUMENT;
            }
        }
    }

    let printed = match series.as_slice() {
        [single] => print_json(&json!(single)),
        many => print_json(&json!(many)),
    };
    if code == EXIT_SUCCESS {
        printed
    } else {
        code
    }
}
