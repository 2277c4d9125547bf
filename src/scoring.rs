//! Composite scoring and baseline advantage
//!
//! Each KPI is min-max normalized over the comparison set handed in (the
//! filtered points, not the whole corpus), inverted for lower-is-better
//! metrics so 1 always means best in set. The composite score is the
//! weighted mean of those normalized KPIs scaled to 0-100.
//!
//! Advantage compares a non-standalone point with the first standalone point
//! of the same hardware and model, on throughput per GPU.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::ScoreWeights;
use crate::normalize::ConfigKind;
use crate::points::ParetoPoint;

/// Score and advantage of one point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointScore {
    /// Composite score in `[0, 100]`
    pub score: f64,
    /// Percent throughput gain over the matched standalone baseline
    pub advantage: Option<i64>,
}

/// Min and max of one KPI over a set
#[derive(Debug, Clone, Copy)]
struct Bounds {
    min: f64,
    max: f64,
}

impl Bounds {
    fn over(points: &[ParetoPoint], f: impl Fn(&ParetoPoint) -> f64) -> Self {
        points.iter().map(f).fold(
            Self {
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
            },
            |b, v| Self {
                min: b.min.min(v),
                max: b.max.max(v),
            },
        )
    }

    /// Position of `v` in `[0, 1]`; 0 when the set has no spread
    fn normalize(&self, v: f64, higher_is_better: bool) -> f64 {
        let range = self.max - self.min;
        if !(range.is_finite() && range > 0.0) {
            return 0.0;
        }
        let n = if higher_is_better {
            (v - self.min) / range
        } else {
            (self.max - v) / range
        };
        n.clamp(0.0, 1.0)
    }
}

/// Score every point against the others in `points`
#[must_use]
pub fn score(points: &[ParetoPoint], weights: &ScoreWeights) -> HashMap<String, PointScore> {
    let throughput = Bounds::over(points, |p| p.throughput_per_gpu);
    let ttft = Bounds::over(points, |p| p.ttft_p50_ms);
    let tpot = Bounds::over(points, |p| p.tpot_p50_ms);
    let p99 = Bounds::over(points, |p| p.p99_latency_ms);
    let total_weight = weights.total();

    points
        .iter()
        .map(|p| {
            let weighted = weights.throughput * throughput.normalize(p.throughput_per_gpu, true)
                + weights.ttft * ttft.normalize(p.ttft_p50_ms, false)
                + weights.tpot * tpot.normalize(p.tpot_p50_ms, false)
                + weights.p99_latency * p99.normalize(p.p99_latency_ms, false);

            let composite = if total_weight > 0.0 {
                (weighted / total_weight * 100.0).clamp(0.0, 100.0)
            } else {
                0.0
            };

            let score = PointScore {
                score: if composite.is_finite() { composite } else { 0.0 },
                advantage: advantage(p, points),
            };
            (p.uid.clone(), score)
        })
        .collect()
}

/// First standalone point sharing `point`'s hardware and model
#[must_use]
pub fn find_baseline<'a>(point: &ParetoPoint, points: &'a [ParetoPoint]) -> Option<&'a ParetoPoint> {
    points.iter().find(|b| {
        b.config == ConfigKind::Standalone && b.hardware == point.hardware && b.model == point.model
    })
}

/// Rounded percent throughput gain over the baseline, if one applies
///
/// Standalone points and points whose baseline has no usable throughput get
/// `None`.
#[must_use]
pub fn advantage(point: &ParetoPoint, points: &[ParetoPoint]) -> Option<i64> {
    if point.config == ConfigKind::Standalone {
        return None;
    }
    let Some(baseline) = find_baseline(point, points) else {
        tracing::debug!(uid = %point.uid, "no standalone baseline");
        return None;
    };

    let base = baseline.throughput_per_gpu;
    if !(base.is_finite() && base > 0.0) {
        return None;
    }
    let pct = ((point.throughput_per_gpu / base) - 1.0) * 100.0;
    pct.is_finite().then(|| pct.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(uid: &str, hardware: &str, config: ConfigKind, tput: f64, lat: f64) -> ParetoPoint {
        ParetoPoint {
            uid: uid.to_string(),
            hardware: hardware.to_string(),
            model: "Llama-3-8B".to_string(),
            framework: "vllm".to_string(),
            config,
            seq_len: "1k/1k".to_string(),
            gpu_count: 1,
            throughput_per_gpu: tput,
            ttft_p50_ms: lat,
            tpot_p50_ms: lat / 10.0,
            p99_latency_ms: lat * 20.0,
            power_per_gpu_kw: 0.0,
            tco_per_gpu_hr: 0.0,
        }
    }

    #[test]
    fn test_advantage_fifty_percent() {
        let points = vec![
            pt("base", "H100", ConfigKind::Standalone, 1000.0, 100.0),
            pt("llmd", "H100", ConfigKind::LlmD, 1500.0, 100.0),
        ];
        let scores = score(&points, &ScoreWeights::default());
        assert_eq!(scores["llmd"].advantage, Some(50));
        assert_eq!(scores["base"].advantage, None);
    }

    #[test]
    fn test_advantage_negative_and_rounded() {
        let points = vec![
            pt("base", "H100", ConfigKind::Standalone, 3000.0, 1.0),
            pt("pd", "H100", ConfigKind::Disaggregated, 2000.0, 1.0),
        ];
        // (2000/3000 - 1) * 100 = -33.33..
        assert_eq!(advantage(&points[1], &points), Some(-33));
    }

    #[test]
    fn test_advantage_requires_same_hardware_and_model() {
        let mut other_model = pt("base-70b", "H100", ConfigKind::Standalone, 1000.0, 1.0);
        other_model.model = "Llama-3-70B".to_string();
        let points = vec![
            pt("a100-base", "A100", ConfigKind::Standalone, 800.0, 1.0),
            other_model,
            pt("llmd", "H100", ConfigKind::LlmD, 1500.0, 1.0),
        ];
        assert_eq!(advantage(&points[2], &points), None);
    }

    #[test]
    fn test_advantage_ignores_framework_and_seq_len() {
        let mut base = pt("base", "H100", ConfigKind::Standalone, 1000.0, 1.0);
        base.framework = "sglang".to_string();
        base.seq_len = "8k/1k".to_string();
        let points = vec![base, pt("llmd", "H100", ConfigKind::LlmD, 1100.0, 1.0)];
        assert_eq!(advantage(&points[1], &points), Some(10));
    }

    #[test]
    fn test_advantage_zero_baseline_is_none() {
        let points = vec![
            pt("base", "H100", ConfigKind::Standalone, 0.0, 1.0),
            pt("llmd", "H100", ConfigKind::LlmD, 1500.0, 1.0),
        ];
        let scores = score(&points, &ScoreWeights::default());
        assert_eq!(scores["llmd"].advantage, None);
    }

    #[test]
    fn test_best_and_worst_in_set() {
        let points = vec![
            pt("best", "H100", ConfigKind::LlmD, 2000.0, 10.0),
            pt("mid", "H100", ConfigKind::LlmD, 1500.0, 20.0),
            pt("worst", "H100", ConfigKind::LlmD, 1000.0, 30.0),
        ];
        let scores = score(&points, &ScoreWeights::default());
        assert!((scores["best"].score - 100.0).abs() < 1e-9);
        assert!((scores["mid"].score - 50.0).abs() < 1e-9);
        assert!(scores["worst"].score.abs() < 1e-9);
    }

    #[test]
    fn test_weights_change_ranking() {
        // fast point has more throughput, slow point has lower latency
        let points = vec![
            pt("tput", "H100", ConfigKind::LlmD, 2000.0, 30.0),
            pt("lat", "H100", ConfigKind::LlmD, 1000.0, 10.0),
        ];
        let equal = score(&points, &ScoreWeights::default());
        assert!(equal["lat"].score > equal["tput"].score);

        let throughput_only = ScoreWeights {
            throughput: 1.0,
            ttft: 0.0,
            tpot: 0.0,
            p99_latency: 0.0,
        };
        let scores = score(&points, &throughput_only);
        assert!((scores["tput"].score - 100.0).abs() < 1e-9);
        assert!(scores["lat"].score.abs() < 1e-9);
    }

    #[test]
    fn test_no_spread_and_zero_weights_score_zero() {
        let points = vec![pt("only", "H100", ConfigKind::LlmD, 1000.0, 10.0)];
        let scores = score(&points, &ScoreWeights::default());
        assert_eq!(scores["only"].score, 0.0);

        let two = vec![
            pt("a", "H100", ConfigKind::LlmD, 1000.0, 10.0),
            pt("b", "H100", ConfigKind::LlmD, 2000.0, 5.0),
        ];
        let zero = ScoreWeights {
            throughput: 0.0,
            ttft: 0.0,
            tpot: 0.0,
            p99_latency: 0.0,
        };
        assert!(score(&two, &zero).values().all(|s| s.score == 0.0));
    }

    #[test]
    fn test_scores_depend_on_comparison_set() {
        let a = pt("a", "H100", ConfigKind::LlmD, 1000.0, 20.0);
        let b = pt("b", "H100", ConfigKind::LlmD, 1500.0, 15.0);
        let c = pt("c", "H100", ConfigKind::LlmD, 3000.0, 5.0);

        let with_c = score(&[a.clone(), b.clone(), c], &ScoreWeights::default());
        let without_c = score(&[a, b], &ScoreWeights::default());
        assert!(with_c["b"].score < without_c["b"].score);
        assert!((without_c["b"].score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_set() {
        assert!(score(&[], &ScoreWeights::default()).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let points = vec![
            pt("a", "H100", ConfigKind::Standalone, 1234.0, 17.0),
            pt("b", "H100", ConfigKind::LlmD, 1500.0, 12.0),
            pt("c", "A100", ConfigKind::Disaggregated, 900.0, 25.0),
        ];
        let first = score(&points, &ScoreWeights::default());
        let second = score(&points, &ScoreWeights::default());
        assert_eq!(first, second);
    }
}
