//! CLI entry point for the storm impact analysis.
//!
//! Provides subcommands for caching the dataset, inspecting event-type
//! frequencies and ranking event types by health and economic impact.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use storm_impact::analyzers::analyzer::analyze_file;
use storm_impact::analyzers::frequency::FrequencyTable;
use storm_impact::{
    config::AnalysisConfig,
    fetch::ensure_dataset,
    output::{log_rankings, write_ranking_csv, write_report_json},
    parser::load_records,
};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "storm_impact")]
#[command(about = "Rank storm event types by health and economic impact", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank event types by health and economic impact
    Analyze {
        /// Storm data CSV (optionally .bz2 or .gz compressed)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// JSON file with analysis settings
        #[arg(short, long)]
        config: Option<String>,

        /// Event types must occur more than this many times
        #[arg(short, long)]
        threshold: Option<u64>,

        /// Multiplier on mean fatalities in the health score
        #[arg(short = 'w', long)]
        fatality_weight: Option<f64>,

        /// Number of ranked event types to show
        #[arg(short = 'n', long)]
        top_n: Option<usize>,

        /// Write a JSON report to this path
        #[arg(long)]
        report_json: Option<PathBuf>,

        /// Write full health.csv and economic.csv rankings into this directory
        #[arg(long)]
        rankings_dir: Option<PathBuf>,
    },
    /// Download the dataset unless it is already cached
    Fetch {
        /// Dataset URL
        #[arg(long)]
        url: String,

        /// Local cache path
        #[arg(short, long, default_value = "data/StormData.csv.bz2")]
        dest: PathBuf,
    },
    /// Show the most frequent raw event types
    Frequencies {
        /// Storm data CSV (optionally .bz2 or .gz compressed)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Number of event types to list
        #[arg(short, long, default_value_t = 25)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/storm_impact.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("storm_impact.log"));

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

    match cli.command {
        Commands::Analyze {
            input,
            config,
            threshold,
            fatality_weight,
            top_n,
            report_json,
            rankings_dir,
        } => {
            let mut settings = match config {
                Some(path) => AnalysisConfig::load(&path)?,
                None => AnalysisConfig::default(),
            };
            if let Some(threshold) = threshold {
                settings.frequency_threshold = threshold;
            }
            if let Some(weight) = fatality_weight {
                settings.fatality_weight = weight;
            }
            if let Some(top_n) = top_n {
                settings.top_n = top_n;
            }
            info!(
                threshold = settings.frequency_threshold,
                fatality_weight = settings.fatality_weight,
                top_n = settings.top_n,
                "Analysis settings"
            );

            let analysis = analyze_file(&input, &settings)?;
            log_rankings(&analysis);

            if let Some(path) = report_json {
                write_report_json(&path, &analysis.report())?;
                info!(path = %path.display(), "JSON report written");
            }

            if let Some(dir) = rankings_dir {
                std::fs::create_dir_all(&dir)?;
                write_ranking_csv(&dir.join("health.csv"), &analysis.health)?;
                write_ranking_csv(&dir.join("economic.csv"), &analysis.economic)?;
                info!(dir = %dir.display(), "Ranking CSVs written");
            }
        }
        Commands::Fetch { url, dest } => {
            ensure_dataset(&url, &dest)?;
        }
        Commands::Frequencies { input, limit } => {
            let records = load_records(&input)?;
            let table = FrequencyTable::from_records(&records);

            info!(
                total = table.total(),
                distinct = table.len(),
                "Event type frequencies"
            );
            for (event_type, count) in table.most_common(limit) {
                info!(event_type, count, "Event type");
            }
        }
    }

    Ok(())
}
