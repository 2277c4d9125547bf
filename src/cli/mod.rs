//! CLI command implementations
//!
//! Each command loads nothing on its own: `main` resolves the engine and the
//! report set, then calls one of the `*_command` functions here, which return
//! the text to print. Tables are markdown so the output pastes into reviews.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cards::{CardConfig, CardView, FrontierView, LatencyBreakdownRow};
use crate::config::EngineConfig;
use crate::engine::ComparisonEngine;
use crate::error::{BenchlensError, Result};
use crate::filter::FilterContext;
use crate::frontier::Axis;
use crate::leaderboard::{to_markdown_table, SortDirection, SortKey};
use crate::normalize::LatencyMs;
use crate::points::{DedupPolicy, ParetoPoint, ThroughputAggregate};
use crate::report::{load_reports, BenchmarkReport};

/// How command output is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown table
    #[default]
    Table,
    /// Pretty JSON
    Json,
}

fn is_report_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "json" | "yaml" | "yml"))
}

/// Load reports from files and directories
///
/// A directory contributes its `.json`, `.yaml` and `.yml` files (not
/// recursive) in file-name order, so results are reproducible.
///
/// # Errors
///
/// Returns error if any path cannot be read or any file fails to parse.
pub fn load_inputs(paths: &[PathBuf]) -> Result<Vec<BenchmarkReport>> {
    let mut reports = Vec::new();

    for path in paths {
        if path.is_dir() {
            let entries = std::fs::read_dir(path).map_err(|source| BenchlensError::Io {
                path: path.clone(),
                source,
            })?;
            let mut files = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|source| BenchlensError::Io {
                    path: path.clone(),
                    source,
                })?;
                let file = entry.path();
                if file.is_file() && is_report_file(&file) {
                    files.push(file);
                }
            }
            files.sort();
            tracing::debug!(dir = %path.display(), files = files.len(), "scanning report directory");
            for file in files {
                reports.extend(load_reports(&file)?);
            }
        } else {
            reports.extend(load_reports(path)?);
        }
    }

    tracing::info!(inputs = paths.len(), reports = reports.len(), "loaded reports");
    Ok(reports)
}

/// Build the engine from an optional JSON config file
///
/// # Errors
///
/// Returns error if the config file cannot be loaded or is invalid.
pub fn load_engine(config: Option<&Path>, dedup: DedupPolicy) -> Result<ComparisonEngine> {
    let config = match config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    Ok(ComparisonEngine::new(config).with_dedup(dedup))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(BenchlensError::inline_parse)
}

fn points_table(points: &[ParetoPoint], marks: Option<&[bool]>) -> String {
    let mut table = String::new();
    table.push_str("| Hardware | Model | Framework | Config | Seq | GPUs | Tok/s/GPU | TTFT p50 | TPOT p50 | p99 Latency | kW/GPU | $/GPU-h | Frontier |\n");
    table.push_str("|----------|-------|-----------|--------|-----|------|-----------|----------|----------|-------------|--------|---------|----------|\n");

    for (i, p) in points.iter().enumerate() {
        let on = marks.and_then(|m| m.get(i)).copied().unwrap_or(false);
        let _ = writeln!(
            table,
            "| {} | {} | {} | {} | {} | {} | {:.1} | {:.1}ms | {:.2}ms | {:.0}ms | {:.2} | {:.2} | {} |",
            p.hardware,
            p.model,
            p.framework,
            p.config,
            p.seq_len,
            p.gpu_count,
            p.throughput_per_gpu,
            p.ttft_p50_ms,
            p.tpot_p50_ms,
            p.p99_latency_ms,
            p.power_per_gpu_kw,
            p.tco_per_gpu_hr,
            if on { "*" } else { "" },
        );
    }
    table
}

fn frontier_table(view: &FrontierView) -> String {
    let points: Vec<ParetoPoint> = view.points.iter().map(|s| s.point.clone()).collect();
    let marks: Vec<bool> = view.points.iter().map(|s| s.on_frontier).collect();

    let mut out = String::new();
    let direction = |a: &Axis| if a.higher_is_better { "higher is better" } else { "lower is better" };
    let _ = writeln!(out, "X: {} ({})", view.x_axis.key.label(), direction(&view.x_axis));
    let _ = writeln!(out, "Y: {} ({})", view.y_axis.key.label(), direction(&view.y_axis));
    let _ = writeln!(out, "Frontier: {} of {} points", view.frontier.len(), points.len());
    out.push('\n');
    out.push_str(&points_table(&points, Some(&marks)));
    out
}

fn throughput_table(groups: &[ThroughputAggregate]) -> String {
    let mut table = String::new();
    table.push_str("| Hardware | Config | Reports | Tok/s/GPU | Output tok/s | Total tok/s | Req/s |\n");
    table.push_str("|----------|--------|---------|-----------|--------------|-------------|-------|\n");
    for g in groups {
        let _ = writeln!(
            table,
            "| {} | {} | {} | {:.1} | {:.1} | {:.1} | {:.2} |",
            g.hardware,
            g.config,
            g.reports,
            g.throughput_per_gpu,
            g.output_token_rate,
            g.total_token_rate,
            g.request_rate,
        );
    }
    table
}

fn latency_table(rows: &[LatencyBreakdownRow]) -> String {
    let ladder = |l: &LatencyMs| format!("{:.1} / {:.1} / {:.1} / {:.1}", l.p50, l.p90, l.p95, l.p99);

    let mut table = String::new();
    table.push_str("| Hardware | Model | Framework | Config | Seq | TTFT p50/90/95/99 | TPOT p50/90/95/99 | ITL p50/90/95/99 | Request p50/90/95/99 |\n");
    table.push_str("|----------|-------|-----------|--------|-----|-------------------|-------------------|------------------|----------------------|\n");
    for r in rows {
        let _ = writeln!(
            table,
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} |",
            r.hardware,
            r.model,
            r.framework,
            r.config,
            r.seq_len,
            ladder(&r.ttft),
            ladder(&r.tpot),
            ladder(&r.itl),
            ladder(&r.request_latency),
        );
    }
    table
}

/// `points`: every deduplicated point that passes the filter
///
/// # Errors
///
/// Returns error if JSON serialization fails.
pub fn points_command(
    engine: &ComparisonEngine,
    reports: &[BenchmarkReport],
    filter: &FilterContext,
    format: OutputFormat,
) -> Result<String> {
    let points = engine.points(reports, filter);
    match format {
        OutputFormat::Table => Ok(points_table(&points, None)),
        OutputFormat::Json => to_json(&points),
    }
}

/// `frontier`: points with the frontier marked under two axes
///
/// # Errors
///
/// Returns error if JSON serialization fails.
pub fn frontier_command(
    engine: &ComparisonEngine,
    reports: &[BenchmarkReport],
    filter: &FilterContext,
    x: Axis,
    y: Axis,
    format: OutputFormat,
) -> Result<String> {
    let points = engine.points(reports, filter);
    let view = engine.frontier(&points, x, y);
    match format {
        OutputFormat::Table => Ok(frontier_table(&view)),
        OutputFormat::Json => to_json(&view),
    }
}

/// `leaderboard`: scored and ranked points, optionally truncated
///
/// # Errors
///
/// Returns error if JSON serialization fails.
pub fn leaderboard_command(
    engine: &ComparisonEngine,
    reports: &[BenchmarkReport],
    filter: &FilterContext,
    sort_key: SortKey,
    sort_dir: SortDirection,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<String> {
    let points = engine.points(reports, filter);
    let mut rows = engine.leaderboard(&points, sort_key, sort_dir);
    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    match format {
        OutputFormat::Table => Ok(to_markdown_table(&rows)),
        OutputFormat::Json => to_json(&rows),
    }
}

/// `throughput`: max throughput per (hardware, config)
///
/// # Errors
///
/// Returns error if JSON serialization fails.
pub fn throughput_command(
    engine: &ComparisonEngine,
    reports: &[BenchmarkReport],
    filter: &FilterContext,
    format: OutputFormat,
) -> Result<String> {
    let groups = engine.throughput_comparison(reports, filter);
    match format {
        OutputFormat::Table => Ok(throughput_table(&groups)),
        OutputFormat::Json => to_json(&groups),
    }
}

/// `latency`: percentile ladders per configuration
///
/// # Errors
///
/// Returns error if JSON serialization fails.
pub fn latency_command(
    engine: &ComparisonEngine,
    reports: &[BenchmarkReport],
    filter: &FilterContext,
    format: OutputFormat,
) -> Result<String> {
    let rows = engine.latency_breakdown(reports, filter);
    match format {
        OutputFormat::Table => Ok(latency_table(&rows)),
        OutputFormat::Json => to_json(&rows),
    }
}

/// `card`: render a card definition file
///
/// # Errors
///
/// Returns error if the card file cannot be read or parsed, or if JSON
/// serialization fails.
pub fn card_command(
    engine: &ComparisonEngine,
    card_path: &Path,
    reports: &[BenchmarkReport],
    format: OutputFormat,
) -> Result<String> {
    let json = std::fs::read_to_string(card_path).map_err(|source| BenchlensError::Io {
        path: card_path.to_path_buf(),
        source,
    })?;
    let card = CardConfig::from_json(&json).map_err(|e| match e {
        BenchlensError::Parse { reason, .. } => BenchlensError::Parse {
            path: card_path.display().to_string(),
            reason,
        },
        other => other,
    })?;

    let view = engine.render(&card, reports);
    match format {
        OutputFormat::Json => to_json(&view),
        OutputFormat::Table => Ok(match &view {
            CardView::ParetoFrontier(v) => frontier_table(v),
            CardView::HardwareLeaderboard { rows } => to_markdown_table(rows),
            CardView::ThroughputComparison { groups } => throughput_table(groups),
            CardView::LatencyBreakdown { rows } => latency_table(rows),
        }),
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod cli_tests;
