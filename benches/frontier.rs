//! Comparison Engine Benchmarks
//!
//! The frontier is O(n²) in the number of points; scoring and ranking are
//! O(n log n). These benches track both over realistic corpus sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use benchlens::report::{SeqLenSpec, StackComponent, Statistics};
use benchlens::{
    build_leaderboard, build_points, compute_frontier, score, Axis, AxisKey, BenchmarkReport,
    ConfigKind, EngineConfig, ParetoPoint, ScoreWeights, SortDirection, SortKey,
};

const SIZES: [usize; 4] = [16, 64, 256, 1024];

/// Deterministic spread of points with a mix of trade-offs
fn synthetic_points(n: usize) -> Vec<ParetoPoint> {
    (0..n)
        .map(|i| {
            let f = i as f64;
            ParetoPoint {
                uid: format!("p{i}"),
                hardware: ["H100", "A100", "MI300X", "L40S"][i % 4].to_string(),
                model: "Llama-3-8B".to_string(),
                framework: "vllm".to_string(),
                config: ConfigKind::all()[i % 3],
                seq_len: "1k/1k".to_string(),
                gpu_count: 1,
                throughput_per_gpu: 500.0 + (f * 37.0) % 2000.0,
                ttft_p50_ms: 20.0 + (f * 53.0) % 300.0,
                tpot_p50_ms: 5.0 + (f * 7.0) % 40.0,
                p99_latency_ms: 800.0 + (f * 91.0) % 4000.0,
                power_per_gpu_kw: 0.3 + (f * 0.013) % 0.4,
                tco_per_gpu_hr: 2.0 + (f * 0.17) % 3.0,
            }
        })
        .collect()
}

fn synthetic_reports(n: usize) -> Vec<BenchmarkReport> {
    (0..n)
        .map(|i| {
            let mut r = BenchmarkReport::default();
            let tool = ["vllm", "llm-d", "sglang"][i % 3];
            r.scenario.stack = vec![StackComponent::engine(tool, "Llama-3-8B", "H100", 1 + (i % 8) as u32)];
            r.scenario.load.standardized.input_seq_len = Some(SeqLenSpec { value: 128 * (i as u64 % 64 + 1) });
            r.scenario.load.standardized.output_seq_len = Some(SeqLenSpec { value: 1024 });
            let agg = &mut r.results.request_performance.aggregate;
            agg.throughput.output_token_rate = Statistics::mean("tokens/s", 1000.0 + i as f64);
            agg.latency.time_to_first_token = Statistics::mean("s", 0.05).with_p99(0.2);
            agg.latency.request_latency = Statistics::mean("s", 2.0);
            r
        })
        .collect()
}

// =============================================================================
// Benchmark: Frontier
// =============================================================================

fn bench_frontier(c: &mut Criterion) {
    let mut group = c.benchmark_group("frontier");
    let x = Axis::new(AxisKey::TtftP50Ms);
    let y = Axis::new(AxisKey::ThroughputPerGpu);

    for n in SIZES {
        let points = synthetic_points(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &points, |b, points| {
            b.iter(|| compute_frontier(black_box(points), &x, &y));
        });
    }
    group.finish();
}

// =============================================================================
// Benchmark: Scoring + Leaderboard
// =============================================================================

fn bench_leaderboard(c: &mut Criterion) {
    let mut group = c.benchmark_group("leaderboard");
    let weights = ScoreWeights::default();

    for n in SIZES {
        let points = synthetic_points(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &points, |b, points| {
            b.iter(|| {
                let scores = score(black_box(points), &weights);
                build_leaderboard(points, &scores, SortKey::Score, SortDirection::Desc)
            });
        });
    }
    group.finish();
}

// =============================================================================
// Benchmark: Point Extraction
// =============================================================================

fn bench_build_points(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_points");
    let config = EngineConfig::default();

    for n in SIZES {
        let reports = synthetic_reports(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &reports, |b, reports| {
            b.iter(|| build_points(black_box(reports), &config));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_frontier, bench_leaderboard, bench_build_points);
criterion_main!(benches);
