//! Comparison engine facade
//!
//! Wires the pipeline stages together for one [`EngineConfig`]:
//! reports are normalized, filtered, turned into points, then handed to the
//! frontier, scoring or aggregation stage a card needs.

use std::collections::HashSet;

use tracing::info;

use crate::cards::{CardConfig, CardView, FrontierView, LatencyBreakdownRow, ScatterPoint};
use crate::config::EngineConfig;
use crate::filter::FilterContext;
use crate::frontier::{mark_frontier, sort_for_drawing, Axis};
use crate::leaderboard::{build_leaderboard, LeaderboardRow, SortDirection, SortKey};
use crate::normalize::NormalizedReport;
use crate::points::{
    aggregate_max_throughput, normalize_all, point_uid, points_from_normalized, DedupPolicy,
    ParetoPoint, ThroughputAggregate,
};
use crate::report::BenchmarkReport;
use crate::scoring::score;

/// Stateless comparison pipeline over a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct ComparisonEngine {
    config: EngineConfig,
    dedup: DedupPolicy,
}

impl ComparisonEngine {
    /// Create an engine with first-wins deduplication
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            dedup: DedupPolicy::default(),
        }
    }

    /// Set the duplicate-uid policy
    #[must_use]
    pub fn with_dedup(mut self, dedup: DedupPolicy) -> Self {
        self.dedup = dedup;
        self
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Active duplicate-uid policy
    #[must_use]
    pub fn dedup(&self) -> DedupPolicy {
        self.dedup
    }

    fn normalized(&self, reports: &[BenchmarkReport], filter: &FilterContext) -> Vec<NormalizedReport> {
        let normalized = normalize_all(reports, &self.config);
        let kept = filter.apply_reports(&normalized);
        info!(
            reports = reports.len(),
            normalized = normalized.len(),
            kept = kept.len(),
            "normalized reports"
        );
        kept
    }

    /// Deduplicated points that pass `filter`, in report order
    #[must_use]
    pub fn points(&self, reports: &[BenchmarkReport], filter: &FilterContext) -> Vec<ParetoPoint> {
        let normalized = self.normalized(reports, filter);
        let points = points_from_normalized(&normalized, &self.config, self.dedup);
        info!(points = points.len(), "built pareto points");
        points
    }

    /// Scatter view of `points` with the frontier marked and ordered for drawing
    #[must_use]
    pub fn frontier(&self, points: &[ParetoPoint], x: Axis, y: Axis) -> FrontierView {
        let marks = mark_frontier(points, &x, &y);
        let mut frontier: Vec<ParetoPoint> = points
            .iter()
            .zip(&marks)
            .filter(|(_, on)| **on)
            .map(|(p, _)| p.clone())
            .collect();
        sort_for_drawing(&mut frontier, &x);
        info!(x = %x.key, y = %y.key, points = points.len(), frontier = frontier.len(), "computed frontier");

        FrontierView {
            x_axis: x,
            y_axis: y,
            points: points
                .iter()
                .zip(marks)
                .map(|(p, on_frontier)| ScatterPoint {
                    point: p.clone(),
                    on_frontier,
                })
                .collect(),
            frontier,
        }
    }

    /// Score `points` against each other and rank them
    #[must_use]
    pub fn leaderboard(
        &self,
        points: &[ParetoPoint],
        sort_key: SortKey,
        sort_dir: SortDirection,
    ) -> Vec<LeaderboardRow> {
        let scores = score(points, &self.config.weights);
        let rows = build_leaderboard(points, &scores, sort_key, sort_dir);
        info!(rows = rows.len(), sort_key = %sort_key, sort_dir = %sort_dir, "built leaderboard");
        rows
    }

    /// Max throughput per (hardware, config) over filtered reports
    #[must_use]
    pub fn throughput_comparison(
        &self,
        reports: &[BenchmarkReport],
        filter: &FilterContext,
    ) -> Vec<ThroughputAggregate> {
        let groups = aggregate_max_throughput(&self.normalized(reports, filter));
        info!(groups = groups.len(), "aggregated throughput");
        groups
    }

    /// Latency percentiles per configuration, first report per uid
    #[must_use]
    pub fn latency_breakdown(
        &self,
        reports: &[BenchmarkReport],
        filter: &FilterContext,
    ) -> Vec<LatencyBreakdownRow> {
        let mut seen = HashSet::new();
        let rows: Vec<LatencyBreakdownRow> = self
            .normalized(reports, filter)
            .iter()
            .filter_map(|r| {
                let uid = point_uid(&r.hardware, &r.model, r.config, &r.framework, &r.seq_len);
                seen.insert(uid.clone())
                    .then(|| LatencyBreakdownRow::from_normalized(uid, r))
            })
            .collect();
        info!(rows = rows.len(), "built latency breakdown");
        rows
    }

    /// Render any card against a report set
    #[must_use]
    pub fn render(&self, card: &CardConfig, reports: &[BenchmarkReport]) -> CardView {
        info!(card = card.kind(), reports = reports.len(), "rendering card");
        match card {
            CardConfig::ParetoFrontier(c) => {
                let points = self.points(reports, &c.filter);
                CardView::ParetoFrontier(self.frontier(&points, c.x_axis, c.y_axis))
            },
            CardConfig::HardwareLeaderboard(c) => {
                let points = self.points(reports, &c.filter);
                let mut rows =
                    self.leaderboard(&points, c.sort_key.unwrap_or(SortKey::Score), c.sort_dir);
                if let Some(limit) = c.limit {
                    rows.truncate(limit);
                }
                CardView::HardwareLeaderboard { rows }
            },
            CardConfig::ThroughputComparison(c) => CardView::ThroughputComparison {
                groups: self.throughput_comparison(reports, &c.filter),
            },
            CardConfig::LatencyBreakdown(c) => CardView::LatencyBreakdown {
                rows: self.latency_breakdown(reports, &c.filter),
            },
        }
    }
}
