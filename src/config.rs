//! Engine configuration
//!
//! Holds the tunables the comparison engine depends on:
//! - percentile fallback multipliers used when a report omits a percentile
//! - KPI weights for the composite leaderboard score
//! - the cost model that turns power draw into a per-GPU hourly TCO
//!
//! All values have stable defaults; a JSON file can override any subset.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BenchlensError, Result};

/// Multipliers applied to `mean` when a percentile is missing from a report
///
/// `p50` always falls back to `mean` unscaled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PercentileFallbacks {
    /// p90 = mean * p90
    pub p90: f64,
    /// p95 = mean * p95
    pub p95: f64,
    /// p99 = mean * p99
    pub p99: f64,
}

impl Default for PercentileFallbacks {
    fn default() -> Self {
        Self {
            p90: 1.3,
            p95: 1.6,
            p99: 2.3,
        }
    }
}

/// Weights of the KPIs that make up the composite score
///
/// The score divides by the sum of weights, so they do not have to add up to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Output tokens/s per GPU (higher is better)
    pub throughput: f64,
    /// TTFT p50 (lower is better)
    pub ttft: f64,
    /// TPOT p50 (lower is better)
    pub tpot: f64,
    /// Request latency p99 (lower is better)
    pub p99_latency: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            throughput: 0.25,
            ttft: 0.25,
            tpot: 0.25,
            p99_latency: 0.25,
        }
    }
}

impl ScoreWeights {
    /// Sum of all weights
    #[must_use]
    pub fn total(&self) -> f64 {
        self.throughput + self.ttft + self.tpot + self.p99_latency
    }
}

/// Hourly cost model used for `tco_per_gpu_hr`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModel {
    /// Rental/amortized cost per GPU-hour, keyed by accelerator model
    pub gpu_hourly_usd: BTreeMap<String, f64>,
    /// Electricity price
    pub energy_usd_per_kwh: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        let gpu_hourly_usd = [
            ("H200", 4.50),
            ("H100", 3.50),
            ("A100", 2.00),
            ("L40S", 1.20),
            ("MI300X", 3.20),
            ("TPU-v6e", 2.70),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            gpu_hourly_usd,
            energy_usd_per_kwh: 0.12,
        }
    }
}

impl CostModel {
    /// Hourly cost for one GPU of `hardware` drawing `power_kw`
    ///
    /// Unknown hardware contributes no rental cost, only energy.
    #[must_use]
    pub fn per_gpu_hour(&self, hardware: &str, power_kw: f64) -> f64 {
        let rental = self.gpu_hourly_usd.get(hardware).copied().unwrap_or(0.0);
        let tco = rental + power_kw * self.energy_usd_per_kwh;
        if tco.is_finite() {
            tco
        } else {
            0.0
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Percentile fallback multipliers
    pub fallbacks: PercentileFallbacks,
    /// Composite score weights
    pub weights: ScoreWeights,
    /// Cost model
    pub costs: CostModel,
}

impl EngineConfig {
    /// Create a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the score weights
    #[must_use]
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set the percentile fallback multipliers
    #[must_use]
    pub fn with_fallbacks(mut self, fallbacks: PercentileFallbacks) -> Self {
        self.fallbacks = fallbacks;
        self
    }

    /// Set the cost model
    #[must_use]
    pub fn with_costs(mut self, costs: CostModel) -> Self {
        self.costs = costs;
        self
    }

    /// Check that every tunable is finite and non-negative
    ///
    /// # Errors
    ///
    /// Returns [`BenchlensError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let w = &self.weights;
        let f = &self.fallbacks;
        let fields = [
            ("weights.throughput", w.throughput),
            ("weights.ttft", w.ttft),
            ("weights.tpot", w.tpot),
            ("weights.p99_latency", w.p99_latency),
            ("fallbacks.p90", f.p90),
            ("fallbacks.p95", f.p95),
            ("fallbacks.p99", f.p99),
            ("costs.energy_usd_per_kwh", self.costs.energy_usd_per_kwh),
        ];
        for (name, value) in fields {
            check_non_negative(name, value)?;
        }
        for (hardware, price) in &self.costs.gpu_hourly_usd {
            check_non_negative(&format!("costs.gpu_hourly_usd.{hardware}"), *price)?;
        }
        Ok(())
    }

    /// Serialize to pretty JSON
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(BenchlensError::inline_parse)
    }

    /// Parse and validate from JSON; missing fields keep their defaults
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is malformed or fails [`Self::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(BenchlensError::inline_parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed or validated.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| BenchlensError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|e| BenchlensError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }
}

fn check_non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(BenchlensError::InvalidConfig {
            reason: format!("{name} must be a finite, non-negative number (got {value})"),
        })
    }
}
