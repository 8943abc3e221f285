//! CLI entry point for the ride-search analytics tool.
//!
//! Provides subcommands for analyzing a local or remote export of search
//! events, pulling a window straight from the live event store, and
//! summarizing Google Forms response dumps.

mod infra;
mod services;

use crate::infra::supabase::client::{EventStoreConfig, SupabaseEventStore};
use crate::services::event_store::SearchLogStore;
use anyhow::Result;
use clap::{Parser, Subcommand};
use ride_search_analytics::analytics::aggregate::analyze_window;
use ride_search_analytics::events::SearchEvent;
use ride_search_analytics::forms::analytics::question_stats;
use ride_search_analytics::forms::normalize::normalize_all;
use ride_search_analytics::forms::types::{FormResponse, FormStructure};
use ride_search_analytics::{
    fetch::{fetch_bytes, BasicClient},
    output::{append_kpi_record, to_json, write_report},
    parser::parse_events,
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

#[derive(Parser)]
#[command(name = "ride_search_analytics")]
#[command(about = "Search-demand analytics for the Asiento Libre backoffice", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a JSON export of search events from a file or URL
    Analyze {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Lookback window the export covers, in days (7/30/90 are the
        /// usual choices, any value is accepted)
        #[arg(short, long, default_value_t = 30)]
        days: u32,

        /// Maximum routes kept in each ranked table
        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Write the report as JSON to this path instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// CSV file to append a KPI snapshot row to
        #[arg(long)]
        kpi_csv: Option<String>,
    },
    /// Pull a window from the live event store and analyze it
    Pull {
        /// Lookback window, in days
        #[arg(short, long, default_value_t = 30)]
        days: u32,

        /// Maximum routes kept in each ranked table
        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Write the report as JSON to this path instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// CSV file to append a KPI snapshot row to
        #[arg(long)]
        kpi_csv: Option<String>,
    },
    /// Summarize a Google Forms response dump
    Forms {
        /// Path to the form structure JSON
        #[arg(short, long)]
        structure: String,

        /// Path to the responses JSON array
        #[arg(short, long)]
        responses: String,

        /// Write question statistics as JSON to this path instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/ride_search_analytics.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("ride_search_analytics.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            source,
            days,
            limit,
            output,
            kpi_csv,
        } => {
            let bytes = fetcher(&source).await?;
            let events = parse_events(&bytes)?;
            info!(event_count = events.len(), days, "Events loaded");

            report(&events, days, limit, output, kpi_csv)?;
        }
        Commands::Pull {
            days,
            limit,
            output,
            kpi_csv,
        } => {
            let config = EventStoreConfig::from_env()?;
            let store = SupabaseEventStore::new(config);

            let events = store.fetch_window(days).await?;
            info!(event_count = events.len(), days, "Window fetched");

            report(&events, days, limit, output, kpi_csv)?;
        }
        Commands::Forms {
            structure,
            responses,
            output,
        } => {
            let structure: FormStructure =
                serde_json::from_slice(&std::fs::read(&structure)?)?;
            let responses: Vec<FormResponse> =
                serde_json::from_slice(&std::fs::read(&responses)?)?;

            info!(
                form_id = %structure.form_id,
                form_title = %structure.info.title,
                response_count = responses.len(),
                "Form responses loaded"
            );

            let normalized = normalize_all(&responses, &structure);
            let stats = question_stats(&normalized);
            let json = serde_json::to_string_pretty(&stats)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    info!(path, "Question statistics written");
                }
                None => println!("{json}"),
            }
        }
    }

    Ok(())
}

/// Loads event data from a local file path or fetches it over HTTP.
#[tracing::instrument(fields(source = %source))]
async fn fetcher(source: &String) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http") {
        let client = BasicClient::new();
        fetch_bytes(&client, source).await?
    } else {
        std::fs::read(source)?
    };
    Ok(bytes)
}

/// Runs the aggregation pass and emits the report to the requested sinks.
fn report(
    events: &[SearchEvent],
    days: u32,
    limit: usize,
    output: Option<String>,
    kpi_csv: Option<String>,
) -> Result<()> {
    let analytics = analyze_window(events, days, limit);

    if let Some(path) = &kpi_csv {
        append_kpi_record(path, days, &analytics.kpis)?;
        info!(path, "KPI snapshot appended");
    }

    match output {
        Some(path) => write_report(&path, &analytics)?,
        None => println!("{}", to_json(&analytics)?),
    }

    Ok(())
}
