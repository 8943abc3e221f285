//! Output formatting and persistence for analytics reports.
//!
//! Supports pretty-printing, JSON serialization, report files, and a CSV
//! append of KPI snapshots for longitudinal tracking.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::analytics::types::{KpiSummary, SearchAnalytics};
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &SearchAnalytics) {
    debug!("{:#?}", report);
}

/// Renders a report as pretty-printed JSON.
pub fn to_json(report: &SearchAnalytics) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Writes a report as pretty-printed JSON to `path`.
pub fn write_report(path: &str, report: &SearchAnalytics) -> Result<()> {
    let json = to_json(report)?;
    std::fs::write(path, json)?;
    info!(path, "Report written");
    Ok(())
}

/// One KPI snapshot as a flat CSV row.
#[derive(Serialize)]
struct KpiRecord {
    timestamp: DateTime<Utc>,
    window_days: u32,
    total_searches: usize,
    searches_without_results: usize,
    converted_searches: usize,
    unique_users: usize,
    without_results_rate: f64,
    conversion_rate: f64,
}

/// Appends a KPI snapshot as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_kpi_record(path: &str, window_days: u32, kpis: &KpiSummary) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(KpiRecord {
        timestamp: Utc::now(),
        window_days,
        total_searches: kpis.total_searches,
        searches_without_results: kpis.searches_without_results,
        converted_searches: kpis.converted_searches,
        unique_users: kpis.unique_users,
        without_results_rate: kpis.without_results_rate,
        conversion_rate: kpis.conversion_rate,
    })?;
    writer.flush()?;

    Ok(())
}
