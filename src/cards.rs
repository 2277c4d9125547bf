//! Card registry
//!
//! Each benchmark card kind carries its own typed configuration instead of a
//! loose property bag, and renders to its own typed view:
//!
//! | Card                   | Config                     | View                          |
//! |------------------------|----------------------------|-------------------------------|
//! | `paretoFrontier`       | [`ParetoFrontierCard`]     | [`FrontierView`]              |
//! | `hardwareLeaderboard`  | [`HardwareLeaderboardCard`]| [`LeaderboardRow`] list       |
//! | `throughputComparison` | [`ThroughputComparisonCard`]| [`ThroughputAggregate`] list |
//! | `latencyBreakdown`     | [`LatencyBreakdownCard`]   | [`LatencyBreakdownRow`] list  |

use serde::{Deserialize, Serialize};

use crate::error::{BenchlensError, Result};
use crate::filter::FilterContext;
use crate::frontier::{Axis, AxisKey};
use crate::leaderboard::{LeaderboardRow, SortDirection, SortKey};
use crate::normalize::{ConfigKind, LatencyMs, NormalizedReport};
use crate::points::{ParetoPoint, ThroughputAggregate};

/// Scatter plot of two objectives with the frontier highlighted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParetoFrontierCard {
    /// Active selection
    pub filter: FilterContext,
    /// Horizontal objective
    pub x_axis: Axis,
    /// Vertical objective
    pub y_axis: Axis,
}

impl Default for ParetoFrontierCard {
    fn default() -> Self {
        Self {
            filter: FilterContext::default(),
            x_axis: Axis::new(AxisKey::TtftP50Ms),
            y_axis: Axis::new(AxisKey::ThroughputPerGpu),
        }
    }
}

/// Ranked table of configurations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HardwareLeaderboardCard {
    /// Active selection
    pub filter: FilterContext,
    /// Column to sort by
    pub sort_key: Option<SortKey>,
    /// Sort direction
    pub sort_dir: SortDirection,
    /// Keep only the top N rows after ranking
    pub limit: Option<usize>,
}

/// Per-hardware throughput bars
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThroughputComparisonCard {
    /// Active selection
    pub filter: FilterContext,
}

/// Stacked latency percentiles per configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LatencyBreakdownCard {
    /// Active selection
    pub filter: FilterContext,
}

/// Any benchmark card, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CardConfig {
    /// Pareto scatter
    ParetoFrontier(ParetoFrontierCard),
    /// Leaderboard table
    HardwareLeaderboard(HardwareLeaderboardCard),
    /// Throughput bars
    ThroughputComparison(ThroughputComparisonCard),
    /// Latency percentiles
    LatencyBreakdown(LatencyBreakdownCard),
}

impl CardConfig {
    /// Card type name as it appears in JSON
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ParetoFrontier(_) => "paretoFrontier",
            Self::HardwareLeaderboard(_) => "hardwareLeaderboard",
            Self::ThroughputComparison(_) => "throughputComparison",
            Self::LatencyBreakdown(_) => "latencyBreakdown",
        }
    }

    /// Filter the card applies
    #[must_use]
    pub fn filter(&self) -> &FilterContext {
        match self {
            Self::ParetoFrontier(c) => &c.filter,
            Self::HardwareLeaderboard(c) => &c.filter,
            Self::ThroughputComparison(c) => &c.filter,
            Self::LatencyBreakdown(c) => &c.filter,
        }
    }

    /// Parse a card definition
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is invalid or names an unknown card type.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(BenchlensError::inline_parse)
    }
}

/// A point on the scatter plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterPoint {
    /// The configuration
    #[serde(flatten)]
    pub point: ParetoPoint,
    /// Whether it is on the frontier
    pub on_frontier: bool,
}

/// Rendered Pareto card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontierView {
    /// Horizontal objective
    pub x_axis: Axis,
    /// Vertical objective
    pub y_axis: Axis,
    /// Every filtered point, input order
    pub points: Vec<ScatterPoint>,
    /// Frontier sorted by X ascending, ready to draw as a line
    pub frontier: Vec<ParetoPoint>,
}

/// Latency percentiles of one configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencyBreakdownRow {
    /// Point uid
    pub uid: String,
    /// Accelerator model
    pub hardware: String,
    /// Served model
    pub model: String,
    /// Engine tool
    pub framework: String,
    /// Topology
    pub config: ConfigKind,
    /// Sequence-length bucket
    pub seq_len: String,
    /// Time to first token
    pub ttft: LatencyMs,
    /// Time per output token
    pub tpot: LatencyMs,
    /// Inter-token latency
    pub itl: LatencyMs,
    /// End-to-end request latency
    pub request_latency: LatencyMs,
}

impl LatencyBreakdownRow {
    /// Latency ladder of a normalized report under the given uid
    #[must_use]
    pub fn from_normalized(uid: String, report: &NormalizedReport) -> Self {
        Self {
            uid,
            hardware: report.hardware.clone(),
            model: report.model.clone(),
            framework: report.framework.clone(),
            config: report.config,
            seq_len: report.seq_len.clone(),
            ttft: report.ttft,
            tpot: report.tpot,
            itl: report.itl,
            request_latency: report.request_latency,
        }
    }
}

/// Rendered card, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CardView {
    /// Pareto scatter
    ParetoFrontier(FrontierView),
    /// Leaderboard table
    HardwareLeaderboard {
        /// Ranked rows
        rows: Vec<LeaderboardRow>,
    },
    /// Throughput bars
    ThroughputComparison {
        /// One group per (hardware, config)
        groups: Vec<ThroughputAggregate>,
    },
    /// Latency percentiles
    LatencyBreakdown {
        /// One row per configuration
        rows: Vec<LatencyBreakdownRow>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_config_tagged_json() {
        let card = CardConfig::from_json(
            r#"{"type": "paretoFrontier",
                "xAxis": {"key": "throughputPerGpu", "higherIsBetter": true},
                "yAxis": {"key": "p99LatencyMs", "higherIsBetter": false},
                "filter": {"hardware": ["H100"]}}"#,
        )
        .unwrap();
        assert_eq!(card.kind(), "paretoFrontier");
        assert_eq!(card.filter().hardware, vec!["H100"]);
        match card {
            CardConfig::ParetoFrontier(c) => {
                assert_eq!(c.x_axis.key, AxisKey::ThroughputPerGpu);
                assert_eq!(c.y_axis.key, AxisKey::P99LatencyMs);
            },
            other => panic!("unexpected card: {other:?}"),
        }
    }

    #[test]
    fn test_card_config_defaults() {
        let card = CardConfig::from_json(r#"{"type": "hardwareLeaderboard"}"#).unwrap();
        match card {
            CardConfig::HardwareLeaderboard(c) => {
                assert_eq!(c.sort_key, None);
                assert_eq!(c.sort_dir, SortDirection::Desc);
                assert_eq!(c.limit, None);
                assert!(c.filter.is_empty());
            },
            other => panic!("unexpected card: {other:?}"),
        }

        let pareto = CardConfig::from_json(r#"{"type": "paretoFrontier"}"#).unwrap();
        if let CardConfig::ParetoFrontier(c) = pareto {
            assert!(!c.x_axis.higher_is_better);
            assert!(c.y_axis.higher_is_better);
        }
    }

    #[test]
    fn test_card_config_unknown_type() {
        let err = CardConfig::from_json(r#"{"type": "snakeGame"}"#).unwrap_err();
        assert!(matches!(err, BenchlensError::Parse { .. }));
    }

    #[test]
    fn test_card_kinds_roundtrip_through_json() {
        let cards = vec![
            CardConfig::ParetoFrontier(ParetoFrontierCard::default()),
            CardConfig::HardwareLeaderboard(HardwareLeaderboardCard {
                sort_key: Some(SortKey::LlmdAdvantage),
                limit: Some(5),
                ..Default::default()
            }),
            CardConfig::ThroughputComparison(ThroughputComparisonCard::default()),
            CardConfig::LatencyBreakdown(LatencyBreakdownCard::default()),
        ];
        for card in cards {
            let json = serde_json::to_string(&card).unwrap();
            assert!(json.contains(&format!("\"type\":\"{}\"", card.kind())));
            assert_eq!(CardConfig::from_json(&json).unwrap(), card);
        }
    }
}
