//! CLI entry point for the traffic count aggregator.
//!
//! Provides subcommands for averaging a traffic-count table, matching it
//! against roads discovered from map geometry, exporting the averaged table,
//! and previewing the congestion colour for a count.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use traffic_count_aggregator::{
    Aggregation, AggregatorError, RoadTarget, TrafficCountAggregator,
    config::AggregatorConfig,
    output::{print_json, print_pretty, write_profiles, write_rows},
    roads::{targets_from_geojson, targets_from_list},
    stats::{RoadHourStats, RunSummary},
};

#[derive(Parser)]
#[command(name = "traffic_count_aggregator")]
#[command(about = "Average hourly traffic counts and match them to map roads", long_about = None)]
struct Cli {
    /// JSON config file; flags override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct TableArgs {
    /// Traffic-count CSV (defaults to the config's csv_path)
    #[arg(value_name = "CSV")]
    csv: Option<PathBuf>,

    /// Match on raw trimmed names instead of normalized keys
    #[arg(long, default_value_t = false)]
    no_normalize: bool,

    /// Reject tables whose header has fewer than 31 columns
    #[arg(long, default_value_t = false)]
    strict_header: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Average a table and match it against a set of roads
    Aggregate {
        #[command(flatten)]
        table: TableArgs,

        /// Roads to match: GeoJSON (.geojson/.json) or one name per line
        #[arg(short, long)]
        roads: Option<PathBuf>,

        /// Clock hour (0-23) to report counts and colours for
        #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u8).range(0..24))]
        hour: u8,

        /// CSV file to write per-road rows to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Log the run summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write the averaged per-road table to CSV
    Profiles {
        #[command(flatten)]
        table: TableArgs,

        /// CSV file to write
        #[arg(short, long, default_value = "profiles.csv")]
        output: PathBuf,
    },
    /// Show the congestion colour for a traffic count
    Color {
        /// Traffic count
        value: f64,

        #[arg(long)]
        scale_min: Option<f64>,

        #[arg(long)]
        scale_max: Option<f64>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/traffic_count_aggregator.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("traffic_count_aggregator.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AggregatorConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AggregatorConfig::default(),
    };

    match cli.command {
        Commands::Aggregate {
            table,
            roads,
            hour,
            output,
            json,
        } => {
            let aggregator = TrafficCountAggregator::new(apply_table_args(config, table));
            let aggregation = load_or_empty(&aggregator)?;

            let targets = match roads {
                Some(path) => load_targets(&path)?,
                None => {
                    info!("No roads given, matching the table against its own road names");
                    aggregation
                        .profiles
                        .keys()
                        .map(|key| RoadTarget::new(key.as_str()))
                        .collect()
                }
            };

            let report = aggregation.match_against(&targets);
            let summary = RunSummary::new(&aggregation, &report);

            if json {
                print_json(&summary)?;
            } else {
                print_pretty(&summary);
            }

            info!(
                matched = summary.matched,
                exact = summary.exact,
                fuzzy = summary.fuzzy,
                unmatched = summary.unmatched,
                matched_pct = summary.matched_pct,
                "Traffic data applied"
            );

            if let Some(path) = output {
                let rows = RoadHourStats::for_hour(
                    &report,
                    usize::from(hour),
                    &aggregator.config().scale,
                );
                write_rows(&path, &rows)
                    .with_context(|| format!("writing {}", path.display()))?;
                info!(path = %path.display(), rows = rows.len(), hour, "Hourly rows written");
            }
        }
        Commands::Profiles { table, output } => {
            let aggregator = TrafficCountAggregator::new(apply_table_args(config, table));
            let aggregation = load_or_empty(&aggregator)?;

            write_profiles(&output, &aggregation.profiles)
                .with_context(|| format!("writing {}", output.display()))?;
            info!(
                path = %output.display(),
                roads = aggregation.profiles.len(),
                "Profiles written"
            );
        }
        Commands::Color {
            value,
            scale_min,
            scale_max,
        } => {
            let scale = config.scale.with_bounds(
                scale_min.unwrap_or(config.scale.scale_min),
                scale_max.unwrap_or(config.scale.scale_max),
            );
            let color = scale.color_for(value);
            info!(
                value,
                congestion = scale.congestion(value),
                color = %color,
                "Congestion colour"
            );
        }
    }

    Ok(())
}

fn apply_table_args(mut config: AggregatorConfig, args: TableArgs) -> AggregatorConfig {
    if let Some(csv) = args.csv {
        config.csv_path = csv;
    }
    if args.no_normalize {
        config.normalize_names = false;
    }
    if args.strict_header {
        config.strict_header = true;
    }
    config
}

/// Aggregates the configured table; a missing file is treated as an empty one.
#[tracing::instrument(skip(aggregator), fields(csv = %aggregator.config().csv_path.display()))]
fn load_or_empty(aggregator: &TrafficCountAggregator) -> Result<Aggregation> {
    match aggregator.aggregate_file() {
        Ok(aggregation) => Ok(aggregation),
        Err(AggregatorError::NotFound(path)) => {
            warn!(path = %path.display(), "CSV file not found, continuing with no traffic data");
            Ok(aggregator.aggregate_text("")?)
        }
        Err(e) => Err(e.into()),
    }
}

/// Reads road targets from GeoJSON or a plain name list, chosen by extension.
fn load_targets(path: &Path) -> Result<Vec<RoadTarget>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading roads from {}", path.display()))?;

    let is_geojson = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("geojson") | Some("json")
    );

    let targets = if is_geojson {
        targets_from_geojson(&text)?
    } else {
        targets_from_list(&text)
    };

    if targets.is_empty() {
        warn!(path = %path.display(), "No roads found to match against");
    }

    Ok(targets)
}
