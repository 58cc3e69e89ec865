//! Output formatting and persistence for analysis results.
//!
//! Supports logged ranking tables, a JSON report and per-question CSVs.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::analyzer::{Analysis, AnalysisReport};
use crate::analyzers::scoring::{RankedEntry, RankedList};
use csv::WriterBuilder;
use std::fs::File;
use std::path::Path;

#[derive(Serialize)]
struct RankingRow<'a> {
    rank: usize,
    event_type: &'a str,
    score: f64,
}

fn log_table(title: &str, entries: &[RankedEntry]) {
    if entries.is_empty() {
        info!(title, "No event types passed the frequency filter");
        return;
    }
    for (i, entry) in entries.iter().enumerate() {
        info!(
            title,
            rank = i + 1,
            event_type = %entry.event_type,
            score = entry.score,
            "Ranked event type"
        );
    }
}

/// Logs the top-N health and economic rankings.
pub fn log_rankings(analysis: &Analysis) {
    log_table("health", analysis.top_health());
    log_table("economic", analysis.top_economic());
    info!(
        parsed = analysis.dates.parsed,
        missing = analysis.dates.missing,
        "Begin date coverage"
    );
}

/// Writes the report as pretty-printed JSON.
pub fn write_report_json(path: &Path, report: &AnalysisReport) -> Result<()> {
    debug!(path = %path.display(), "Writing JSON report");
    std::fs::write(path, serde_json::to_string_pretty(report)?)?;
    Ok(())
}

/// Writes a full ranked list as CSV with a `rank,event_type,score` header.
pub fn write_ranking_csv(path: &Path, ranking: &RankedList) -> Result<()> {
    debug!(path = %path.display(), rows = ranking.len(), "Writing ranking CSV");

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for (i, entry) in ranking.entries().iter().enumerate() {
        writer.serialize(RankingRow {
            rank: i + 1,
            event_type: &entry.event_type,
            score: entry.score,
        })?;
    }
    writer.flush()?;

    Ok(())
}
