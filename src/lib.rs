//! # Benchlens
//!
//! Comparison engine for llm-d inference benchmark reports.
//!
//! Benchlens turns raw benchmark reports (one per engine deployment, load
//! profile and accelerator) into comparable data: normalized metrics,
//! Pareto frontiers over any two objectives, composite scores and ranked
//! leaderboards with the gain over a standalone baseline.
//!
//! ## Pipeline
//!
//! ```text
//! BenchmarkReport ──normalize──▶ NormalizedReport ──build_points──▶ ParetoPoint
//!                                                                      │
//!                       ┌──────────────────────┬───────────────────────┤
//!                       ▼                      ▼                       ▼
//!               compute_frontier            score            aggregate_max_throughput
//!                                              │
//!                                              ▼
//!                                      build_leaderboard
//! ```
//!
//! Every stage is a pure function of its inputs. Missing or malformed report
//! data never raises: it is substituted with documented defaults or the
//! report is skipped.
//!
//! ## Example
//!
//! ```rust
//! use benchlens::{
//!     build_points, compute_frontier, Axis, AxisKey, BenchmarkReport, EngineConfig,
//! };
//!
//! let reports = BenchmarkReport::many_from_json(r#"[{
//!     "scenario": {"stack": [{"standardized": {
//!         "kind": "inference_engine", "tool": "vllm",
//!         "model": {"name": "Llama-3-8B"},
//!         "accelerator": {"model": "H100", "count": 2}}}]},
//!     "results": {"request_performance": {"aggregate": {
//!         "throughput": {"output_token_rate": {"units": "tokens/s", "mean": 3000.0}},
//!         "latency": {"time_to_first_token": {"units": "ms", "mean": 80.0}}}}}
//! }]"#).unwrap();
//!
//! let points = build_points(&reports, &EngineConfig::default());
//! assert_eq!(points[0].throughput_per_gpu, 1500.0);
//!
//! let frontier = compute_frontier(
//!     &points,
//!     &Axis::new(AxisKey::TtftP50Ms),
//!     &Axis::new(AxisKey::ThroughputPerGpu),
//! );
//! assert_eq!(frontier.len(), 1);
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
// Clippy allows (MUST come after deny/warn to override them)
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)] // u64 counts -> f64 ratios
#![allow(clippy::cast_possible_truncation)] // rounded percentages -> i64
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::float_cmp)]

/// Tagged benchmark cards and their rendered views
pub mod cards;
/// CLI command implementations (extracted for testability)
pub mod cli;
/// Engine configuration: score weights, percentile fallbacks, cost model
pub mod config;
/// Pipeline facade over a fixed configuration
pub mod engine;
/// Error types
pub mod error;
/// Explicit filter context
pub mod filter;
/// Pareto frontier computation
///
/// Non-dominated subset of a point set under two objectives, each with its
/// own direction of preference.
pub mod frontier;
pub mod leaderboard;
/// Report normalization into flat, unit-consistent records
pub mod normalize;
/// Pareto point extraction and per-hardware aggregation
pub mod points;
/// Benchmark report input model and file loading
pub mod report;
pub mod scoring;

pub use cards::{CardConfig, CardView};
pub use config::{CostModel, EngineConfig, PercentileFallbacks, ScoreWeights};
pub use engine::ComparisonEngine;
pub use error::{BenchlensError, Result};
pub use filter::{FilterContext, FilterOptions};
pub use frontier::{compute_frontier, dominates, Axis, AxisKey};
pub use leaderboard::{build_leaderboard, LeaderboardRow, SortDirection, SortKey};
pub use normalize::{normalize, ConfigKind, NormalizedReport};
pub use points::{build_points, DedupPolicy, ParetoPoint};
pub use report::{load_reports, BenchmarkReport};
pub use scoring::{score, PointScore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(VERSION.split('.').count(), 3);
    }
}
