use std::fmt::{self, Display};

use hdrhistogram::Histogram;
use serde::Serialize;

use super::ResultSet;

/// Probes whose success is mandatory for a READY verdict.
pub const CRITICAL_TESTS: [&str; 5] = [
    "Health Check",
    "Get Liabilities",
    "Build Merkle Tree",
    "Get Reserves",
    "Get Contract Addresses",
];

const READY_PASS_RATE: f64 = 80.0;
const MINOR_FIXES_PASS_RATE: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum ReadinessVerdict {
    Ready,
    NeedsMinorFixes,
    NeedsWork,
}

impl ReadinessVerdict {
    /// `pass_rate` is a percentage in `0..=100`.
    pub fn classify(pass_rate: f64, all_critical_passed: bool) -> Self {
        if pass_rate >= READY_PASS_RATE && all_critical_passed {
            ReadinessVerdict::Ready
        } else if pass_rate >= MINOR_FIXES_PASS_RATE {
            ReadinessVerdict::NeedsMinorFixes
        } else {
            ReadinessVerdict::NeedsWork
        }
    }

    pub fn exit_code(self) -> i32 {
        match self {
            ReadinessVerdict::Ready => 0,
            ReadinessVerdict::NeedsMinorFixes => 2,
            ReadinessVerdict::NeedsWork => 3,
        }
    }
}

impl Display for ReadinessVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReadinessVerdict::Ready => "READY",
            ReadinessVerdict::NeedsMinorFixes => "NEEDS-MINOR-FIXES",
            ReadinessVerdict::NeedsWork => "NEEDS-WORK",
        };
        write!(f, "{label}")
    }
}

#[derive(Default)]
struct RunningStats {
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    fn add(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        self.sum += value;
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencyStats {
    pub samples: u64,
    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub p50_ms: f64,
    pub p95_ms: f64,
}

impl LatencyStats {
    /// `None` when no outcome recorded a latency.
    pub fn from_latencies(latencies: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut stats = RunningStats::default();
        // Microsecond resolution, capped at ten minutes.
        let mut histogram = Histogram::<u64>::new_with_bounds(1, 600_000_000, 3).ok()?;

        for latency_ms in latencies {
            stats.add(latency_ms);
            let latency_us = ((latency_ms * 1000.0).round().max(1.0) as u64).min(600_000_000);
            // Bounds are clamped above so recording cannot go out of range.
            let _ = histogram.record(latency_us);
        }

        if stats.count == 0 {
            return None;
        }

        Some(Self {
            samples: stats.count,
            avg_ms: round_to_3(stats.mean()),
            min_ms: round_to_3(stats.min),
            max_ms: round_to_3(stats.max),
            p50_ms: round_to_3(histogram.value_at_quantile(0.50) as f64 / 1000.0),
            p95_ms: round_to_3(histogram.value_at_quantile(0.95) as f64 / 1000.0),
        })
    }
}

fn round_to_3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Aggregate figures derived from a finished [`ResultSet`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
    pub pass_rate: f64,
    pub latency: Option<LatencyStats>,
    pub critical_passed: usize,
    pub critical_total: usize,
    pub verdict: ReadinessVerdict,
}

impl Summary {
    pub fn from_results(results: &ResultSet) -> Self {
        let total = results.total();
        let pass_rate = if total > 0 {
            results.passed as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        let latency = LatencyStats::from_latencies(
            results
                .outcomes()
                .iter()
                .filter_map(|outcome| outcome.elapsed_ms)
                .filter(|elapsed| *elapsed > 0.0),
        );

        let critical_passed = CRITICAL_TESTS
            .iter()
            .filter(|name| results.succeeded(name))
            .count();

        Self {
            total,
            passed: results.passed,
            failed: results.failed,
            warnings: results.warnings,
            pass_rate,
            latency,
            critical_passed,
            critical_total: CRITICAL_TESTS.len(),
            verdict: ReadinessVerdict::classify(pass_rate, critical_passed == CRITICAL_TESTS.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::request::TestCase;
    use crate::http::response::ResponseBody;
    use crate::testing::{ErrorKind, Outcome};
    use serde_json::json;

    fn pass(name: &str, elapsed_ms: f64) -> Outcome {
        Outcome::responded(&TestCase::get(name, "/"), 200, elapsed_ms, ResponseBody::Json(json!({})))
    }

    fn fail(name: &str) -> Outcome {
        Outcome::responded(&TestCase::get(name, "/"), 500, 10.0, ResponseBody::Text(String::new()))
    }

    fn all_critical_passing() -> ResultSet {
        let mut results = ResultSet::new();
        for name in CRITICAL_TESTS {
            results.record(pass(name, 10.0));
        }
        results
    }

    #[test]
    fn verdict_thresholds() {
        assert_eq!(ReadinessVerdict::classify(80.0, true), ReadinessVerdict::Ready);
        assert_eq!(ReadinessVerdict::classify(100.0, false), ReadinessVerdict::NeedsMinorFixes);
        assert_eq!(ReadinessVerdict::classify(79.9, true), ReadinessVerdict::NeedsMinorFixes);
        assert_eq!(ReadinessVerdict::classify(60.0, false), ReadinessVerdict::NeedsMinorFixes);
        assert_eq!(ReadinessVerdict::classify(59.9, true), ReadinessVerdict::NeedsWork);
        assert_eq!(ReadinessVerdict::classify(0.0, false), ReadinessVerdict::NeedsWork);
    }

    #[test]
    fn verdict_is_pure() {
        for rate in [0.0, 42.0, 60.0, 75.5, 80.0, 99.0] {
            for critical in [true, false] {
                assert_eq!(
                    ReadinessVerdict::classify(rate, critical),
                    ReadinessVerdict::classify(rate, critical)
                );
            }
        }
    }

    #[test]
    fn empty_run_has_zero_pass_rate() {
        let summary = Summary::from_results(&ResultSet::new());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.pass_rate, 0.0);
        assert!(summary.latency.is_none());
        assert_eq!(summary.verdict, ReadinessVerdict::NeedsWork);
    }

    #[test]
    fn ready_when_critical_pass_and_rate_high() {
        let mut results = all_critical_passing();
        results.record(fail("Get Epoch Count"));

        let summary = Summary::from_results(&results);
        assert!((summary.pass_rate - 83.333).abs() < 0.01);
        assert_eq!(summary.critical_passed, 5);
        assert_eq!(summary.verdict, ReadinessVerdict::Ready);
    }

    #[test]
    fn failed_critical_test_blocks_ready() {
        let mut results = ResultSet::new();
        for name in CRITICAL_TESTS.iter().skip(1) {
            results.record(pass(name, 10.0));
        }
        results.record(fail("Health Check"));
        for idx in 0..10 {
            results.record(pass(&format!("Extra {idx}"), 10.0));
        }

        let summary = Summary::from_results(&results);
        assert!(summary.pass_rate > 90.0);
        assert_eq!(summary.critical_passed, 4);
        assert_eq!(summary.verdict, ReadinessVerdict::NeedsMinorFixes);
    }

    #[test]
    fn latency_stats_skip_outcomes_without_timing() {
        let mut results = ResultSet::new();
        results.record(pass("a", 10.0));
        results.record(pass("b", 30.0));
        results.record(pass("c", 20.0));
        results.record(Outcome::errored(&TestCase::get("d", "/"), ErrorKind::Timeout, "timed out"));

        let latency = Summary::from_results(&results).latency.expect("latency stats");
        assert_eq!(latency.samples, 3);
        assert_eq!(latency.avg_ms, 20.0);
        assert_eq!(latency.min_ms, 10.0);
        assert_eq!(latency.max_ms, 30.0);
        assert!((latency.p50_ms - 20.0).abs() < 0.1);
    }

    #[test]
    fn verdict_serializes_in_report_form() {
        let raw = serde_json::to_string(&ReadinessVerdict::NeedsMinorFixes).unwrap();
        assert_eq!(raw, "\"NEEDS-MINOR-FIXES\"");
    }
}
