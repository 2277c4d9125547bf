//! Ranked leaderboard rows
//!
//! Joins points with their scores, sorts by any numeric column and
//! reassigns contiguous 1-based ranks after every sort. Missing values
//! (only the advantage column can be missing) sort last in either direction.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::{self, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BenchlensError;
use crate::points::ParetoPoint;
use crate::scoring::PointScore;

/// Sortable leaderboard column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Composite score
    Score,
    /// Output tokens/s per GPU
    ThroughputPerGpu,
    /// TTFT p50
    TtftP50Ms,
    /// TPOT p50
    TpotP50Ms,
    /// Request latency p99
    P99LatencyMs,
    /// Advantage over the standalone baseline
    LlmdAdvantage,
}

impl SortKey {
    /// Get string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::ThroughputPerGpu => "throughputPerGpu",
            Self::TtftP50Ms => "ttftP50Ms",
            Self::TpotP50Ms => "tpotP50Ms",
            Self::P99LatencyMs => "p99LatencyMs",
            Self::LlmdAdvantage => "llmdAdvantage",
        }
    }

    /// All sort keys
    #[must_use]
    pub fn all() -> [Self; 6] {
        [
            Self::Score,
            Self::ThroughputPerGpu,
            Self::TtftP50Ms,
            Self::TpotP50Ms,
            Self::P99LatencyMs,
            Self::LlmdAdvantage,
        ]
    }

    /// Column value of a row; `None` for missing or non-finite values
    #[must_use]
    pub fn value(&self, row: &LeaderboardRow) -> Option<f64> {
        let v = match self {
            Self::Score => row.score,
            Self::ThroughputPerGpu => row.point.throughput_per_gpu,
            Self::TtftP50Ms => row.point.ttft_p50_ms,
            Self::TpotP50Ms => row.point.tpot_p50_ms,
            Self::P99LatencyMs => row.point.p99_latency_ms,
            Self::LlmdAdvantage => return row.llmd_advantage.map(|a| a as f64),
        };
        v.is_finite().then_some(v)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = BenchlensError;

    /// Accepts camelCase and snake_case spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s.chars().filter(|c| *c != '_').collect::<String>().to_lowercase();
        Self::all()
            .into_iter()
            .find(|k| k.as_str().to_lowercase() == folded)
            .ok_or_else(|| BenchlensError::UnknownSortKey(s.to_string()))
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first
    Asc,
    /// Largest first
    #[default]
    Desc,
}

impl FromStr for SortDirection {
    type Err = BenchlensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            _ => Err(BenchlensError::UnknownSortDirection(s.to_string())),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

/// One ranked leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    /// The ranked configuration
    #[serde(flatten)]
    pub point: ParetoPoint,
    /// Composite score in `[0, 100]`
    pub score: f64,
    /// Percent gain over the standalone baseline
    pub llmd_advantage: Option<i64>,
    /// 1-based position after the last sort
    pub rank: usize,
}

/// Join points with scores, sort, and rank
///
/// A point missing from `scores` gets score 0 and no advantage.
#[must_use]
pub fn build_leaderboard(
    points: &[ParetoPoint],
    scores: &HashMap<String, PointScore>,
    sort_key: SortKey,
    sort_dir: SortDirection,
) -> Vec<LeaderboardRow> {
    let mut rows: Vec<LeaderboardRow> = points
        .iter()
        .map(|p| {
            let s = scores.get(&p.uid);
            LeaderboardRow {
                point: p.clone(),
                score: s.map_or(0.0, |s| s.score),
                llmd_advantage: s.and_then(|s| s.advantage),
                rank: 0,
            }
        })
        .collect();

    sort_rows(&mut rows, sort_key, sort_dir);
    rows
}

/// Stable-sort rows by `key` and reassign `rank = index + 1`
pub fn sort_rows(rows: &mut [LeaderboardRow], key: SortKey, dir: SortDirection) {
    rows.sort_by(|a, b| match (key.value(a), key.value(b)) {
        (Some(x), Some(y)) => match dir {
            SortDirection::Asc => x.total_cmp(&y),
            SortDirection::Desc => y.total_cmp(&x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i + 1;
    }
}

/// Render rows as a markdown table
#[must_use]
pub fn to_markdown_table(rows: &[LeaderboardRow]) -> String {
    let mut table = String::new();

    table.push_str("| Rank | Hardware | Model | Framework | Config | Seq | GPUs | Tok/s/GPU | TTFT p50 | TPOT p50 | p99 Latency | Score | Advantage |\n");
    table.push_str("|------|----------|-------|-----------|--------|-----|------|-----------|----------|----------|-------------|-------|-----------|\n");

    for row in rows {
        let p = &row.point;
        let advantage = row
            .llmd_advantage
            .map_or_else(|| "-".to_string(), |a| format!("{a:+}%"));
        let _ = writeln!(
            table,
            "| {} | {} | {} | {} | {} | {} | {} | {:.1} | {:.1}ms | {:.2}ms | {:.0}ms | {:.1} | {} |",
            row.rank,
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
            row.score,
            advantage,
        );
    }

    table
}

// Tests live in a sibling file to keep this module readable
#[cfg(test)]
#[path = "tests.rs"]
mod leaderboard_tests;
