//! Benchmark report input types
//!
//! Mirrors the nested layout produced by llm-d style benchmark pipelines:
//!
//! ```text
//! BenchmarkReport
//! ├── scenario.stack[]         standardized { kind, role, tool, model, accelerator }
//! ├── scenario.load            standardized { input_seq_len, output_seq_len }
//! ├── results.request_performance.aggregate
//! │     ├── throughput         Statistics per rate
//! │     ├── latency            Statistics per latency
//! │     └── requests           { total, failures }
//! ├── results.observability.metrics[]   named time series
//! └── run.time                 { start, duration }
//! ```
//!
//! Every level is optional on the wire; absent sections deserialize to their
//! defaults so a sparse report still normalizes (or is cleanly skipped).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BenchlensError, Result};

/// Distributional summary of one metric
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    /// Unit string as reported (`s`, `s/token`, `ms`, `tokens/s`, ...)
    pub units: String,
    /// Arithmetic mean
    pub mean: f64,
    /// Median
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p50: Option<f64>,
    /// 90th percentile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p90: Option<f64>,
    /// 95th percentile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p95: Option<f64>,
    /// 99th percentile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p99: Option<f64>,
}

impl Statistics {
    /// Statistics with only a mean
    #[must_use]
    pub fn mean(units: &str, mean: f64) -> Self {
        Self {
            units: units.to_string(),
            mean,
            ..Default::default()
        }
    }

    /// Set p50
    #[must_use]
    pub fn with_p50(mut self, p50: f64) -> Self {
        self.p50 = Some(p50);
        self
    }

    /// Set p90
    #[must_use]
    pub fn with_p90(mut self, p90: f64) -> Self {
        self.p90 = Some(p90);
        self
    }

    /// Set p95
    #[must_use]
    pub fn with_p95(mut self, p95: f64) -> Self {
        self.p95 = Some(p95);
        self
    }

    /// Set p99
    #[must_use]
    pub fn with_p99(mut self, p99: f64) -> Self {
        self.p99 = Some(p99);
        self
    }
}

/// Model identity of a stack component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelRef {
    /// Model name (e.g. `meta-llama/Llama-3-8B`)
    pub name: String,
}

/// Accelerator allocation of a stack component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Accelerator {
    /// Accelerator model (e.g. `H100`)
    pub model: String,
    /// Number of accelerators
    pub count: u32,
}

/// Standardized description of a stack component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardizedComponent {
    /// Component kind; `inference_engine` marks the measured engine
    pub kind: String,
    /// Serving role (`prefill`, `decode`, `replica`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Tool name (`vllm`, `llm-d`, `sglang`, ...)
    pub tool: String,
    /// Tool version
    pub tool_version: String,
    /// Served model
    pub model: ModelRef,
    /// Accelerators allocated to the component
    pub accelerator: Accelerator,
}

/// One entry of `scenario.stack`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackComponent {
    /// Free-form component label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    /// Standardized description
    pub standardized: StandardizedComponent,
}

impl StackComponent {
    /// Inference engine component running `tool` on `count` x `accelerator`
    #[must_use]
    pub fn engine(tool: &str, model: &str, accelerator: &str, count: u32) -> Self {
        Self {
            metadata: None,
            standardized: StandardizedComponent {
                kind: "inference_engine".to_string(),
                role: None,
                tool: tool.to_string(),
                tool_version: String::new(),
                model: ModelRef {
                    name: model.to_string(),
                },
                accelerator: Accelerator {
                    model: accelerator.to_string(),
                    count,
                },
            },
        }
    }

    /// Set the serving role
    #[must_use]
    pub fn with_role(mut self, role: &str) -> Self {
        self.standardized.role = Some(role.to_string());
        self
    }

    /// Set the tool version
    #[must_use]
    pub fn with_tool_version(mut self, version: &str) -> Self {
        self.standardized.tool_version = version.to_string();
        self
    }
}

/// A single sequence-length setting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeqLenSpec {
    /// Token count
    pub value: u64,
}

/// Standardized load description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardizedLoad {
    /// Input (prompt) sequence length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_seq_len: Option<SeqLenSpec>,
    /// Output (generation) sequence length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_seq_len: Option<SeqLenSpec>,
}

/// `scenario.load`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Load {
    /// Standardized load description
    pub standardized: StandardizedLoad,
}

/// `scenario`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Ordered serving stack
    pub stack: Vec<StackComponent>,
    /// Load generator settings
    pub load: Load,
}

/// Throughput statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThroughputStats {
    /// Output tokens per second
    pub output_token_rate: Statistics,
    /// Input tokens per second
    pub input_token_rate: Statistics,
    /// Total tokens per second
    pub total_token_rate: Statistics,
    /// Requests per second
    pub request_rate: Statistics,
}

/// Latency statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyStats {
    /// Time to first token
    pub time_to_first_token: Statistics,
    /// Time per output token
    pub time_per_output_token: Statistics,
    /// Inter-token latency
    pub inter_token_latency: Statistics,
    /// Request latency divided by output tokens
    pub normalized_time_per_output_token: Statistics,
    /// End-to-end request latency
    pub request_latency: Statistics,
}

/// Request counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestCounts {
    /// Requests issued
    pub total: u64,
    /// Requests that failed
    pub failures: u64,
}

/// `results.request_performance.aggregate`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatePerformance {
    /// Throughput statistics
    pub throughput: ThroughputStats,
    /// Latency statistics
    pub latency: LatencyStats,
    /// Request counters
    pub requests: RequestCounts,
}

/// `results.request_performance`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestPerformance {
    /// Aggregate over the whole run
    pub aggregate: AggregatePerformance,
}

/// One sample of a time series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricSample {
    /// Sample timestamp as reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Sample value
    pub value: f64,
}

/// Named time series (e.g. `gpu_util`, `gpu_power`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricSeries {
    /// Metric name
    pub name: String,
    /// Unit string
    pub units: String,
    /// Samples in time order
    pub samples: Vec<MetricSample>,
}

impl MetricSeries {
    /// Series holding a single sample
    #[must_use]
    pub fn single(name: &str, units: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            units: units.to_string(),
            samples: vec![MetricSample {
                timestamp: None,
                value,
            }],
        }
    }
}

/// `results.observability`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Observability {
    /// Collected time series
    pub metrics: Vec<MetricSeries>,
}

/// `results`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Results {
    /// Request-level performance
    pub request_performance: RequestPerformance,
    /// Telemetry
    pub observability: Observability,
}

/// `run.time`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunTime {
    /// Start timestamp as reported
    pub start: String,
    /// Duration as reported (e.g. `PT300S`)
    pub duration: String,
}

/// `run`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunInfo {
    /// Run timing
    pub time: RunTime,
}

/// One benchmark run: a hardware/model/framework/configuration combination
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkReport {
    /// What was deployed and how it was loaded
    pub scenario: Scenario,
    /// What was measured
    pub results: Results,
    /// Run bookkeeping
    pub run: RunInfo,
}

impl BenchmarkReport {
    /// Aggregate performance block
    #[must_use]
    pub fn aggregate(&self) -> &AggregatePerformance {
        &self.results.request_performance.aggregate
    }

    /// Parse a JSON document holding one report or a list of reports
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is invalid or doesn't match the report shape.
    pub fn many_from_json(json: &str) -> Result<Vec<Self>> {
        let doc: ReportDocument =
            serde_json::from_str(json).map_err(BenchlensError::inline_parse)?;
        Ok(doc.into_vec())
    }

    /// Parse a YAML document holding one report or a list of reports
    ///
    /// # Errors
    ///
    /// Returns error if the YAML is invalid or doesn't match the report shape.
    pub fn many_from_yaml(yaml: &str) -> Result<Vec<Self>> {
        let doc: ReportDocument =
            serde_yaml::from_str(yaml).map_err(BenchlensError::inline_parse)?;
        Ok(doc.into_vec())
    }

    /// Serialize to pretty JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(BenchlensError::inline_parse)
    }
}

/// A report file holds either one report or a list of them
#[derive(Deserialize)]
#[serde(untagged)]
enum ReportDocument {
    Many(Vec<BenchmarkReport>),
    One(Box<BenchmarkReport>),
}

impl ReportDocument {
    fn into_vec(self) -> Vec<BenchmarkReport> {
        match self {
            Self::Many(reports) => reports,
            Self::One(report) => vec![*report],
        }
    }
}

/// Load reports from a `.json`, `.yaml` or `.yml` file
///
/// # Errors
///
/// Returns error if the file cannot be read or decoded.
pub fn load_reports(path: &Path) -> Result<Vec<BenchmarkReport>> {
    let text = std::fs::read_to_string(path).map_err(|source| BenchlensError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    let parsed = if is_yaml {
        BenchmarkReport::many_from_yaml(&text)
    } else {
        BenchmarkReport::many_from_json(&text)
    };

    let reports = parsed.map_err(|e| match e {
        BenchlensError::Parse { reason, .. } => BenchlensError::Parse {
            path: path.display().to_string(),
            reason,
        },
        other => other,
    })?;

    if reports.is_empty() {
        tracing::warn!(path = %path.display(), "report file holds no reports");
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "scenario": {
            "stack": [
                {"standardized": {"kind": "gateway", "tool": "istio"}},
                {"standardized": {
                    "kind": "inference_engine",
                    "role": "decode",
                    "tool": "vllm",
                    "tool_version": "0.8.5",
                    "model": {"name": "Llama-3-8B"},
                    "accelerator": {"model": "H100", "count": 2}
                }}
            ],
            "load": {"standardized": {"input_seq_len": {"value": 1024}}}
        },
        "results": {
            "request_performance": {"aggregate": {
                "throughput": {"output_token_rate": {"units": "tokens/s", "mean": 1234.5}},
                "latency": {"time_to_first_token": {"units": "s", "mean": 0.25, "p99": 0.9}},
                "requests": {"total": 100, "failures": 2}
            }},
            "observability": {"metrics": [
                {"name": "gpu_util", "units": "percent", "samples": [{"value": 87.0}]}
            ]}
        },
        "run": {"time": {"start": "2025-06-01T00:00:00Z", "duration": "PT300S"}}
    }"#;

    #[test]
    fn test_parse_single_report() {
        let reports = BenchmarkReport::many_from_json(SAMPLE).unwrap();
        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert_eq!(report.scenario.stack.len(), 2);
        assert_eq!(
            report.scenario.stack[1].standardized.accelerator.count,
            2
        );
        let agg = report.aggregate();
        assert_eq!(agg.throughput.output_token_rate.mean, 1234.5);
        assert_eq!(agg.latency.time_to_first_token.p99, Some(0.9));
        assert_eq!(agg.latency.time_to_first_token.p50, None);
        assert_eq!(agg.requests.failures, 2);
        assert_eq!(report.run.time.duration, "PT300S");
    }

    #[test]
    fn test_parse_list_of_reports() {
        let json = format!("[{SAMPLE}, {SAMPLE}]");
        let reports = BenchmarkReport::many_from_json(&json).unwrap();
        assert_eq!(reports.len(), 2);
    }

    #[test]
    fn test_parse_sparse_report_uses_defaults() {
        let reports = BenchmarkReport::many_from_json("{}").unwrap();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].scenario.stack.is_empty());
        assert_eq!(reports[0].aggregate().requests.total, 0);
    }

    #[test]
    fn test_parse_yaml_report() {
        let yaml = r"
scenario:
  stack:
    - standardized:
        kind: inference_engine
        tool: llm-d
        model: {name: Qwen3-32B}
        accelerator: {model: MI300X, count: 8}
results:
  request_performance:
    aggregate:
      throughput:
        output_token_rate: {units: tokens/s, mean: 4000}
";
        let reports = BenchmarkReport::many_from_yaml(yaml).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].scenario.stack[0].standardized.tool, "llm-d");
        assert_eq!(reports[0].aggregate().throughput.output_token_rate.mean, 4000.0);
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = BenchmarkReport::many_from_json("[1, 2").unwrap_err();
        assert!(matches!(err, BenchlensError::Parse { .. }));
    }

    #[test]
    fn test_load_reports_reports_path_in_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "not json").unwrap();

        let err = load_reports(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_load_reports_yaml_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.YML");
        std::fs::write(&path, "- {}\n- {}\n").unwrap();

        let reports = load_reports(&path).unwrap();
        assert_eq!(reports.len(), 2);
    }

    #[test]
    fn test_builders() {
        let engine = StackComponent::engine("vllm", "Llama-3-8B", "H100", 4)
            .with_role("prefill")
            .with_tool_version("0.9.0");
        assert_eq!(engine.standardized.kind, "inference_engine");
        assert_eq!(engine.standardized.role.as_deref(), Some("prefill"));
        assert_eq!(engine.standardized.tool_version, "0.9.0");

        let stats = Statistics::mean("ms", 10.0).with_p50(9.0).with_p99(30.0);
        assert_eq!(stats.p50, Some(9.0));
        assert_eq!(stats.p90, None);
    }
}
