//! Pareto point extraction
//!
//! Turns normalized reports into one [`ParetoPoint`] per
//! hardware + model + config + framework + seqLen combination, and provides
//! the per-(hardware, config) max aggregation used by throughput bar charts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::normalize::{normalize, ConfigKind, NormalizedReport};
use crate::report::BenchmarkReport;

/// One comparable configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParetoPoint {
    /// `hardware|model|config|framework|seqLen`
    pub uid: String,
    /// Accelerator model
    pub hardware: String,
    /// Served model
    pub model: String,
    /// Engine tool
    pub framework: String,
    /// Deployment topology
    pub config: ConfigKind,
    /// Sequence-length bucket label
    pub seq_len: String,
    /// Accelerators used by the engine
    pub gpu_count: u32,
    /// Output tokens/s per GPU
    pub throughput_per_gpu: f64,
    /// TTFT p50 (ms)
    pub ttft_p50_ms: f64,
    /// TPOT p50 (ms)
    pub tpot_p50_ms: f64,
    /// Request latency p99 (ms)
    pub p99_latency_ms: f64,
    /// Power draw per GPU (kW)
    pub power_per_gpu_kw: f64,
    /// Cost per GPU-hour (USD)
    pub tco_per_gpu_hr: f64,
}

impl ParetoPoint {
    /// Build a point from a normalized report
    #[must_use]
    pub fn from_normalized(report: &NormalizedReport, config: &EngineConfig) -> Self {
        let power_per_gpu_kw = report.power_per_gpu_kw();
        Self {
            uid: point_uid(
                &report.hardware,
                &report.model,
                report.config,
                &report.framework,
                &report.seq_len,
            ),
            hardware: report.hardware.clone(),
            model: report.model.clone(),
            framework: report.framework.clone(),
            config: report.config,
            seq_len: report.seq_len.clone(),
            gpu_count: report.gpu_count,
            throughput_per_gpu: report.throughput_per_gpu(),
            ttft_p50_ms: report.ttft.p50,
            tpot_p50_ms: report.tpot.p50,
            p99_latency_ms: report.request_latency.p99,
            power_per_gpu_kw,
            tco_per_gpu_hr: config.costs.per_gpu_hour(&report.hardware, power_per_gpu_kw),
        }
    }
}

/// Stable identity of a point
#[must_use]
pub fn point_uid(
    hardware: &str,
    model: &str,
    config: ConfigKind,
    framework: &str,
    seq_len: &str,
) -> String {
    format!("{hardware}|{model}|{config}|{framework}|{seq_len}")
}

/// What to do when two reports map to the same uid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// Keep the first occurrence
    #[default]
    FirstWins,
    /// Keep whichever has the higher throughput per GPU, at the first's position
    MaxThroughput,
}

/// Normalize every report, dropping the ones without an inference engine
#[must_use]
pub fn normalize_all(reports: &[BenchmarkReport], config: &EngineConfig) -> Vec<NormalizedReport> {
    reports
        .iter()
        .filter_map(|r| normalize(r, &config.fallbacks))
        .collect()
}

/// Extract points with first-occurrence-wins deduplication
#[must_use]
pub fn build_points(reports: &[BenchmarkReport], config: &EngineConfig) -> Vec<ParetoPoint> {
    build_points_with(reports, config, DedupPolicy::FirstWins)
}

/// Extract points in insertion order, deduplicating by uid under `policy`
#[must_use]
pub fn build_points_with(
    reports: &[BenchmarkReport],
    config: &EngineConfig,
    policy: DedupPolicy,
) -> Vec<ParetoPoint> {
    let normalized = normalize_all(reports, config);
    points_from_normalized(&normalized, config, policy)
}

/// Deduplicate already-normalized reports into points
#[must_use]
pub fn points_from_normalized(
    normalized: &[NormalizedReport],
    config: &EngineConfig,
    policy: DedupPolicy,
) -> Vec<ParetoPoint> {
    let mut points: Vec<ParetoPoint> = Vec::with_capacity(normalized.len());
    let mut index: HashMap<String, usize> = HashMap::with_capacity(normalized.len());

    for report in normalized {
        let point = ParetoPoint::from_normalized(report, config);
        match index.get(&point.uid) {
            None => {
                index.insert(point.uid.clone(), points.len());
                points.push(point);
            },
            Some(&i) => match policy {
                DedupPolicy::FirstWins => {
                    tracing::debug!(uid = %point.uid, "dropping duplicate point");
                },
                DedupPolicy::MaxThroughput => {
                    if point.throughput_per_gpu > points[i].throughput_per_gpu {
                        tracing::debug!(uid = %point.uid, "replacing duplicate with higher throughput");
                        points[i] = point;
                    }
                },
            },
        }
    }

    points
}

/// Max throughput figures of one (hardware, config) group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThroughputAggregate {
    /// Accelerator model
    pub hardware: String,
    /// Deployment topology
    pub config: ConfigKind,
    /// Number of reports folded into this group
    pub reports: usize,
    /// Max output tokens/s per GPU
    pub throughput_per_gpu: f64,
    /// Max output tokens/s
    pub output_token_rate: f64,
    /// Max total tokens/s
    pub total_token_rate: f64,
    /// Max requests/s
    pub request_rate: f64,
}

/// Group by (hardware, config) in first-seen order, keeping each metric's max
///
/// Metrics are maximized independently, so one group may combine figures
/// from different runs.
#[must_use]
pub fn aggregate_max_throughput(normalized: &[NormalizedReport]) -> Vec<ThroughputAggregate> {
    let mut groups: Vec<ThroughputAggregate> = Vec::new();
    let mut index: HashMap<(String, ConfigKind), usize> = HashMap::new();

    for report in normalized {
        let key = (report.hardware.clone(), report.config);
        let per_gpu = report.throughput_per_gpu();
        let rates = &report.throughput;

        if let Some(&i) = index.get(&key) {
            let group = &mut groups[i];
            group.reports += 1;
            group.throughput_per_gpu = group.throughput_per_gpu.max(per_gpu);
            group.output_token_rate = group.output_token_rate.max(rates.output_token_rate);
            group.total_token_rate = group.total_token_rate.max(rates.total_token_rate);
            group.request_rate = group.request_rate.max(rates.request_rate);
        } else {
            index.insert(key, groups.len());
            groups.push(ThroughputAggregate {
                hardware: report.hardware.clone(),
                config: report.config,
                reports: 1,
                throughput_per_gpu: per_gpu,
                output_token_rate: rates.output_token_rate,
                total_token_rate: rates.total_token_rate,
                request_rate: rates.request_rate,
            });
        }
    }

    groups
}
