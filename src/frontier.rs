//! Pareto frontier over two objectives
//!
//! A point dominates another when it is at least as good on both axes and
//! strictly better on one, where "good" follows each axis's direction. The
//! frontier is every point no other point dominates. Points with identical
//! coordinates never dominate each other, so ties all stay on the frontier.
//!
//! The pairwise check is O(n²); benchmark sets are small enough for that.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BenchlensError;
use crate::points::ParetoPoint;

/// Numeric field of a [`ParetoPoint`] usable as an objective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AxisKey {
    /// Output tokens/s per GPU
    ThroughputPerGpu,
    /// TTFT p50 (ms)
    TtftP50Ms,
    /// TPOT p50 (ms)
    TpotP50Ms,
    /// Request latency p99 (ms)
    P99LatencyMs,
    /// Power per GPU (kW)
    PowerPerGpuKw,
    /// Cost per GPU-hour
    TcoPerGpuHr,
    /// GPU count
    GpuCount,
}

impl AxisKey {
    /// Get string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThroughputPerGpu => "throughputPerGpu",
            Self::TtftP50Ms => "ttftP50Ms",
            Self::TpotP50Ms => "tpotP50Ms",
            Self::P99LatencyMs => "p99LatencyMs",
            Self::PowerPerGpuKw => "powerPerGpuKw",
            Self::TcoPerGpuHr => "tcoPerGpuHr",
            Self::GpuCount => "gpuCount",
        }
    }

    /// Human-readable label with unit
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::ThroughputPerGpu => "Throughput/GPU (tok/s)",
            Self::TtftP50Ms => "TTFT p50 (ms)",
            Self::TpotP50Ms => "TPOT p50 (ms)",
            Self::P99LatencyMs => "p99 Latency (ms)",
            Self::PowerPerGpuKw => "Power/GPU (kW)",
            Self::TcoPerGpuHr => "TCO/GPU-hr ($)",
            Self::GpuCount => "GPUs",
        }
    }

    /// Natural direction: only throughput is better when higher
    #[must_use]
    pub fn higher_is_better(&self) -> bool {
        matches!(self, Self::ThroughputPerGpu)
    }

    /// Read this field from a point
    #[must_use]
    pub fn value(&self, point: &ParetoPoint) -> f64 {
        match self {
            Self::ThroughputPerGpu => point.throughput_per_gpu,
            Self::TtftP50Ms => point.ttft_p50_ms,
            Self::TpotP50Ms => point.tpot_p50_ms,
            Self::P99LatencyMs => point.p99_latency_ms,
            Self::PowerPerGpuKw => point.power_per_gpu_kw,
            Self::TcoPerGpuHr => point.tco_per_gpu_hr,
            Self::GpuCount => f64::from(point.gpu_count),
        }
    }

    /// All axis keys
    #[must_use]
    pub fn all() -> [Self; 7] {
        [
            Self::ThroughputPerGpu,
            Self::TtftP50Ms,
            Self::TpotP50Ms,
            Self::P99LatencyMs,
            Self::PowerPerGpuKw,
            Self::TcoPerGpuHr,
            Self::GpuCount,
        ]
    }
}

impl fmt::Display for AxisKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AxisKey {
    type Err = BenchlensError;

    /// Accepts camelCase and snake_case spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s.chars().filter(|c| *c != '_').collect::<String>().to_lowercase();
        Self::all()
            .into_iter()
            .find(|k| k.as_str().to_lowercase() == folded)
            .ok_or_else(|| BenchlensError::UnknownAxis(s.to_string()))
    }
}

/// An objective: which field, and which way is better
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    /// Field to read
    pub key: AxisKey,
    /// Direction of preference
    pub higher_is_better: bool,
}

impl Axis {
    /// Axis with the key's natural direction
    #[must_use]
    pub fn new(key: AxisKey) -> Self {
        Self {
            key,
            higher_is_better: key.higher_is_better(),
        }
    }

    /// Axis with an explicit direction
    #[must_use]
    pub fn with_direction(key: AxisKey, higher_is_better: bool) -> Self {
        Self {
            key,
            higher_is_better,
        }
    }

    /// Read the axis value from a point
    #[must_use]
    pub fn value(&self, point: &ParetoPoint) -> f64 {
        self.key.value(point)
    }

    fn at_least_as_good(&self, a: f64, b: f64) -> bool {
        if self.higher_is_better {
            a >= b
        } else {
            a <= b
        }
    }

    fn strictly_better(&self, a: f64, b: f64) -> bool {
        if self.higher_is_better {
            a > b
        } else {
            a < b
        }
    }
}

impl From<AxisKey> for Axis {
    fn from(key: AxisKey) -> Self {
        Self::new(key)
    }
}

/// Does `a` dominate `b` under the two axes?
#[must_use]
pub fn dominates(a: &ParetoPoint, b: &ParetoPoint, x: &Axis, y: &Axis) -> bool {
    let (ax, bx) = (x.value(a), x.value(b));
    let (ay, by) = (y.value(a), y.value(b));

    x.at_least_as_good(ax, bx)
        && y.at_least_as_good(ay, by)
        && (x.strictly_better(ax, bx) || y.strictly_better(ay, by))
}

/// Non-dominated subset of `points`, in input order
#[must_use]
pub fn compute_frontier(points: &[ParetoPoint], x: &Axis, y: &Axis) -> Vec<ParetoPoint> {
    points
        .iter()
        .filter(|p| !points.iter().any(|q| dominates(q, p, x, y)))
        .cloned()
        .collect()
}

/// Per-point frontier membership, aligned with `points`
#[must_use]
pub fn mark_frontier(points: &[ParetoPoint], x: &Axis, y: &Axis) -> Vec<bool> {
    points
        .iter()
        .map(|p| !points.iter().any(|q| dominates(q, p, x, y)))
        .collect()
}

/// Order a frontier by X ascending for drawing a connecting line (stable)
pub fn sort_for_drawing(frontier: &mut [ParetoPoint], x: &Axis) {
    frontier.sort_by(|a, b| x.value(a).total_cmp(&x.value(b)));
}
