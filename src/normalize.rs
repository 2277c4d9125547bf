//! Report normalization
//!
//! Flattens one nested [`BenchmarkReport`] into a [`NormalizedReport`]:
//! - identity: hardware, model, framework, sequence-length bucket
//! - topology: `standalone`, `llm-d` or `disaggregated`
//! - latencies in milliseconds, with missing percentiles derived from the mean
//! - first-sample GPU telemetry
//!
//! Reports without an `inference_engine` stack component cannot be compared
//! and normalize to `None`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::PercentileFallbacks;
use crate::error::BenchlensError;
use crate::report::{BenchmarkReport, SeqLenSpec, Statistics};

/// Serving configuration of a benchmarked deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfigKind {
    /// Plain engine, no llm-d routing
    #[serde(rename = "standalone")]
    Standalone,
    /// Engine behind llm-d
    #[serde(rename = "llm-d")]
    LlmD,
    /// Separate prefill and decode components
    #[serde(rename = "disaggregated")]
    Disaggregated,
}

impl ConfigKind {
    /// Get string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standalone => "standalone",
            Self::LlmD => "llm-d",
            Self::Disaggregated => "disaggregated",
        }
    }

    /// All kinds in display order
    #[must_use]
    pub fn all() -> [Self; 3] {
        [Self::Standalone, Self::LlmD, Self::Disaggregated]
    }
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKind {
    type Err = BenchlensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standalone" => Ok(Self::Standalone),
            "llm-d" | "llmd" => Ok(Self::LlmD),
            "disaggregated" | "pd" | "p/d" => Ok(Self::Disaggregated),
            _ => Err(BenchlensError::UnknownConfigKind(s.to_string())),
        }
    }
}

/// Latency percentile ladder in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencyMs {
    /// Mean
    pub mean: f64,
    /// Median
    pub p50: f64,
    /// 90th percentile
    pub p90: f64,
    /// 95th percentile
    pub p95: f64,
    /// 99th percentile
    pub p99: f64,
}

impl LatencyMs {
    /// Convert a latency [`Statistics`] to milliseconds, filling gaps from the mean
    #[must_use]
    pub fn from_statistics(stats: &Statistics, fallbacks: &PercentileFallbacks) -> Self {
        let scale = unit_scale_to_ms(&stats.units);
        let mean = stats.mean;
        let p50 = stats.p50.unwrap_or(mean);
        let p90 = stats.p90.unwrap_or(mean * fallbacks.p90);
        let p95 = stats.p95.unwrap_or(mean * fallbacks.p95);
        let p99 = stats.p99.unwrap_or(mean * fallbacks.p99);

        Self {
            mean: finite_or_zero(mean * scale),
            p50: finite_or_zero(p50 * scale),
            p90: finite_or_zero(p90 * scale),
            p95: finite_or_zero(p95 * scale),
            p99: finite_or_zero(p99 * scale),
        }
    }
}

/// Factor turning a latency in `units` into milliseconds
///
/// Seconds (`s`, `s/token`) scale by 1000; anything else is taken as ms.
#[must_use]
pub fn unit_scale_to_ms(units: &str) -> f64 {
    match units.trim() {
        "s" | "s/token" => 1000.0,
        _ => 1.0,
    }
}

pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Throughput means, as reported (no unit conversion)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ThroughputRates {
    /// Output tokens/s
    pub output_token_rate: f64,
    /// Input tokens/s
    pub input_token_rate: f64,
    /// Total tokens/s
    pub total_token_rate: f64,
    /// Requests/s
    pub request_rate: f64,
}

/// First-sample GPU telemetry; absent metrics read as 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GpuTelemetry {
    /// Utilization
    pub gpu_util: f64,
    /// Memory in use
    pub gpu_mem: f64,
    /// Power draw in watts
    pub gpu_power: f64,
}

/// One stack component reduced to what the comparison cares about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackRole {
    /// Component kind
    pub kind: String,
    /// Serving role, if any
    pub role: Option<String>,
    /// Tool name
    pub tool: String,
    /// Accelerators used by the component
    pub accelerator_count: u32,
}

/// Flat, comparable view of one report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedReport {
    /// Accelerator model of the engine
    pub hardware: String,
    /// Served model
    pub model: String,
    /// Engine tool
    pub framework: String,
    /// Engine tool version
    pub framework_version: String,
    /// Deployment topology
    pub config: ConfigKind,
    /// Sequence-length bucket label (e.g. `1k/1k`)
    pub seq_len: String,
    /// Accelerators used by the engine
    pub gpu_count: u32,
    /// Role composition of the whole stack
    pub stack: Vec<StackRole>,
    /// Throughput means
    pub throughput: ThroughputRates,
    /// Time to first token
    pub ttft: LatencyMs,
    /// Time per output token
    pub tpot: LatencyMs,
    /// Inter-token latency
    pub itl: LatencyMs,
    /// Normalized time per output token
    pub ntpot: LatencyMs,
    /// End-to-end request latency
    pub request_latency: LatencyMs,
    /// Requests issued
    pub requests_total: u64,
    /// Requests failed
    pub requests_failed: u64,
    /// GPU telemetry
    pub telemetry: GpuTelemetry,
    /// Run start as reported
    pub run_start: String,
}

impl NormalizedReport {
    /// Output tokens/s divided by GPU count (0 when no GPUs are recorded)
    #[must_use]
    pub fn throughput_per_gpu(&self) -> f64 {
        if self.gpu_count == 0 {
            return 0.0;
        }
        finite_or_zero(self.throughput.output_token_rate / f64::from(self.gpu_count))
    }

    /// Power per GPU in kW
    #[must_use]
    pub fn power_per_gpu_kw(&self) -> f64 {
        finite_or_zero(self.telemetry.gpu_power / 1000.0)
    }

    /// Share of requests that succeeded, in `[0, 1]`; 1 when nothing was issued
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.requests_total == 0 {
            return 1.0;
        }
        let ok = self.requests_total.saturating_sub(self.requests_failed);
        ok as f64 / self.requests_total as f64
    }
}

/// Normalize one report, or `None` if it has no inference engine
#[must_use]
pub fn normalize(report: &BenchmarkReport, fallbacks: &PercentileFallbacks) -> Option<NormalizedReport> {
    let stack = &report.scenario.stack;
    let Some(engine) = stack
        .iter()
        .map(|c| &c.standardized)
        .find(|c| c.kind == "inference_engine")
    else {
        tracing::debug!(components = stack.len(), "skipping report without inference_engine");
        return None;
    };

    let has_prefill = stack
        .iter()
        .any(|c| c.standardized.role.as_deref() == Some("prefill"));
    let config = if has_prefill {
        ConfigKind::Disaggregated
    } else if engine.tool == "llm-d" {
        ConfigKind::LlmD
    } else {
        ConfigKind::Standalone
    };

    let agg = report.aggregate();
    let lat = &agg.latency;
    let tp = &agg.throughput;
    let load = &report.scenario.load.standardized;

    Some(NormalizedReport {
        hardware: engine.accelerator.model.clone(),
        model: engine.model.name.clone(),
        framework: engine.tool.clone(),
        framework_version: engine.tool_version.clone(),
        config,
        seq_len: seq_len_label(load.input_seq_len.as_ref(), load.output_seq_len.as_ref()),
        gpu_count: engine.accelerator.count,
        stack: stack
            .iter()
            .map(|c| StackRole {
                kind: c.standardized.kind.clone(),
                role: c.standardized.role.clone(),
                tool: c.standardized.tool.clone(),
                accelerator_count: c.standardized.accelerator.count,
            })
            .collect(),
        throughput: ThroughputRates {
            output_token_rate: finite_or_zero(tp.output_token_rate.mean),
            input_token_rate: finite_or_zero(tp.input_token_rate.mean),
            total_token_rate: finite_or_zero(tp.total_token_rate.mean),
            request_rate: finite_or_zero(tp.request_rate.mean),
        },
        ttft: LatencyMs::from_statistics(&lat.time_to_first_token, fallbacks),
        tpot: LatencyMs::from_statistics(&lat.time_per_output_token, fallbacks),
        itl: LatencyMs::from_statistics(&lat.inter_token_latency, fallbacks),
        ntpot: LatencyMs::from_statistics(&lat.normalized_time_per_output_token, fallbacks),
        request_latency: LatencyMs::from_statistics(&lat.request_latency, fallbacks),
        requests_total: agg.requests.total,
        requests_failed: agg.requests.failures,
        telemetry: GpuTelemetry {
            gpu_util: first_sample(report, "gpu_util"),
            gpu_mem: first_sample(report, "gpu_mem"),
            gpu_power: first_sample(report, "gpu_power"),
        },
        run_start: report.run.time.start.clone(),
    })
}

/// First sample of the first metric whose name contains `needle`, else 0
fn first_sample(report: &BenchmarkReport, needle: &str) -> f64 {
    report
        .results
        .observability
        .metrics
        .iter()
        .find(|m| m.name.contains(needle))
        .and_then(|m| m.samples.first())
        .map_or(0.0, |s| finite_or_zero(s.value))
}

/// Label for an input/output sequence-length pair, e.g. `1k/128`
#[must_use]
pub fn seq_len_label(input: Option<&SeqLenSpec>, output: Option<&SeqLenSpec>) -> String {
    match (input, output) {
        (None, None) => "unknown".to_string(),
        (i, o) => {
            let side = |s: Option<&SeqLenSpec>| s.map_or_else(|| "?".to_string(), |s| compact_tokens(s.value));
            format!("{}/{}", side(i), side(o))
        },
    }
}

fn compact_tokens(n: u64) -> String {
    if n >= 1000 && n % 1024 == 0 {
        format!("{}k", n / 1024)
    } else if n >= 1000 && n % 1000 == 0 {
        format!("{}k", n / 1000)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{MetricSeries, StackComponent};

    fn report_with(stack: Vec<StackComponent>) -> BenchmarkReport {
        let mut report = BenchmarkReport::default();
        report.scenario.stack = stack;
        report
    }

    #[test]
    fn test_normalize_without_engine_is_none() {
        let mut gateway = StackComponent::engine("istio", "", "", 0);
        gateway.standardized.kind = "gateway".to_string();
        let report = report_with(vec![gateway]);
        assert!(normalize(&report, &PercentileFallbacks::default()).is_none());
        assert!(normalize(&BenchmarkReport::default(), &PercentileFallbacks::default()).is_none());
    }

    #[test]
    fn test_config_kind_classification() {
        let fb = PercentileFallbacks::default();

        let standalone = report_with(vec![StackComponent::engine("vllm", "m", "H100", 1)]);
        assert_eq!(normalize(&standalone, &fb).unwrap().config, ConfigKind::Standalone);

        let llmd = report_with(vec![StackComponent::engine("llm-d", "m", "H100", 1)]);
        assert_eq!(normalize(&llmd, &fb).unwrap().config, ConfigKind::LlmD);

        // a prefill role anywhere wins over the tool name
        let disagg = report_with(vec![
            StackComponent::engine("llm-d", "m", "H100", 1).with_role("decode"),
            StackComponent::engine("vllm", "m", "H100", 1).with_role("prefill"),
        ]);
        assert_eq!(normalize(&disagg, &fb).unwrap().config, ConfigKind::Disaggregated);
    }

    #[test]
    fn test_engine_is_first_inference_engine() {
        let mut sidecar = StackComponent::engine("envoy", "", "", 0);
        sidecar.standardized.kind = "router".to_string();
        let report = report_with(vec![
            sidecar,
            StackComponent::engine("sglang", "Qwen3-32B", "A100", 4).with_tool_version("0.4"),
            StackComponent::engine("vllm", "other", "L40S", 1),
        ]);
        let n = normalize(&report, &PercentileFallbacks::default()).unwrap();
        assert_eq!(n.framework, "sglang");
        assert_eq!(n.framework_version, "0.4");
        assert_eq!(n.hardware, "A100");
        assert_eq!(n.model, "Qwen3-32B");
        assert_eq!(n.gpu_count, 4);
        assert_eq!(n.stack.len(), 3);
    }

    #[test]
    fn test_seconds_converted_and_p50_falls_back_to_mean() {
        let stats = Statistics::mean("s", 0.25);
        let ms = LatencyMs::from_statistics(&stats, &PercentileFallbacks::default());
        assert!((ms.p50 - 250.0).abs() < 1e-9);
        assert!((ms.mean - 250.0).abs() < 1e-9);
        assert!((ms.p90 - 325.0).abs() < 1e-9);
        assert!((ms.p95 - 400.0).abs() < 1e-9);
        assert!((ms.p99 - 575.0).abs() < 1e-9);
    }

    #[test]
    fn test_seconds_per_token_converted() {
        let stats = Statistics::mean("s/token", 0.02).with_p50(0.018);
        let ms = LatencyMs::from_statistics(&stats, &PercentileFallbacks::default());
        assert!((ms.p50 - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_milliseconds_and_unknown_units_untouched() {
        let fb = PercentileFallbacks::default();
        let ms = LatencyMs::from_statistics(&Statistics::mean("ms", 40.0).with_p99(120.0), &fb);
        assert_eq!(ms.p50, 40.0);
        assert_eq!(ms.p99, 120.0);

        let unitless = LatencyMs::from_statistics(&Statistics::mean("", 7.0), &fb);
        assert_eq!(unitless.p50, 7.0);
    }

    #[test]
    fn test_custom_fallback_multipliers() {
        let fb = PercentileFallbacks {
            p90: 2.0,
            p95: 3.0,
            p99: 4.0,
        };
        let ms = LatencyMs::from_statistics(&Statistics::mean("ms", 10.0), &fb);
        assert_eq!(ms.p90, 20.0);
        assert_eq!(ms.p95, 30.0);
        assert_eq!(ms.p99, 40.0);
    }

    #[test]
    fn test_non_finite_latency_becomes_zero() {
        let stats = Statistics::mean("ms", f64::NAN);
        let ms = LatencyMs::from_statistics(&stats, &PercentileFallbacks::default());
        assert_eq!(ms, LatencyMs::default());
    }

    #[test]
    fn test_gpu_telemetry_first_sample_and_missing() {
        let mut report = report_with(vec![StackComponent::engine("vllm", "m", "H100", 1)]);
        let mut power = MetricSeries::single("dcgm_gpu_power_watts", "W", 650.0);
        power.samples.push(crate::report::MetricSample {
            timestamp: None,
            value: 999.0,
        });
        report.results.observability.metrics = vec![
            MetricSeries::single("gpu_util", "percent", 91.0),
            power,
        ];

        let n = normalize(&report, &PercentileFallbacks::default()).unwrap();
        assert_eq!(n.telemetry.gpu_util, 91.0);
        assert_eq!(n.telemetry.gpu_power, 650.0);
        assert_eq!(n.telemetry.gpu_mem, 0.0);
        assert!((n.power_per_gpu_kw() - 0.65).abs() < 1e-9);
    }

    #[test]
    fn test_throughput_per_gpu_guards_zero_count() {
        let mut report = report_with(vec![StackComponent::engine("vllm", "m", "H100", 0)]);
        report
            .results
            .request_performance
            .aggregate
            .throughput
            .output_token_rate = Statistics::mean("tokens/s", 500.0);
        let n = normalize(&report, &PercentileFallbacks::default()).unwrap();
        assert_eq!(n.throughput_per_gpu(), 0.0);
    }

    #[test]
    fn test_success_rate() {
        let mut report = report_with(vec![StackComponent::engine("vllm", "m", "H100", 1)]);
        let n = normalize(&report, &PercentileFallbacks::default()).unwrap();
        assert_eq!(n.success_rate(), 1.0);

        report.results.request_performance.aggregate.requests.total = 200;
        report.results.request_performance.aggregate.requests.failures = 50;
        let n = normalize(&report, &PercentileFallbacks::default()).unwrap();
        assert!((n.success_rate() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_seq_len_labels() {
        let s = |v| Some(SeqLenSpec { value: v });
        assert_eq!(seq_len_label(s(1024).as_ref(), s(1024).as_ref()), "1k/1k");
        assert_eq!(seq_len_label(s(8000).as_ref(), s(128).as_ref()), "8k/128");
        assert_eq!(seq_len_label(s(512).as_ref(), None), "512/?");
        assert_eq!(seq_len_label(None, None), "unknown");
    }

    #[test]
    fn test_config_kind_parse_and_display() {
        assert_eq!("LLM-D".parse::<ConfigKind>().unwrap(), ConfigKind::LlmD);
        assert_eq!("standalone".parse::<ConfigKind>().unwrap(), ConfigKind::Standalone);
        assert_eq!("pd".parse::<ConfigKind>().unwrap(), ConfigKind::Disaggregated);
        assert!("hybrid".parse::<ConfigKind>().is_err());
        for kind in ConfigKind::all() {
            assert_eq!(kind.to_string().parse::<ConfigKind>().unwrap(), kind);
        }
        assert_eq!(serde_json::to_string(&ConfigKind::LlmD).unwrap(), "\"llm-d\"");
    }
}
