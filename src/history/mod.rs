//! # Run History
//!
//! One row per finished run, newest first, so readiness can be compared across
//! deployments.

use chrono::{DateTime, Utc};

use crate::runner::RunReport;

/// Maximum number of runs to retain.
pub const MAX_HISTORY_ENTRIES: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub target: String,
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
    pub pass_rate: f64,
    pub verdict: String,
}

impl HistoryEntry {
    pub fn from_report(report: &RunReport) -> Self {
        Self {
            run_id: run_id(report.started_at),
            started_at: report.started_at,
            finished_at: report.finished_at,
            target: report.target.clone(),
            passed: report.summary.passed,
            failed: report.summary.failed,
            warnings: report.summary.warnings,
            pass_rate: report.summary.pass_rate,
            verdict: report.summary.verdict.to_string(),
        }
    }
}

fn run_id(started_at: DateTime<Utc>) -> String {
    format!("run-{}", started_at.timestamp_micros())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ResultSet;
    use crate::testing::report::Summary;
    use chrono::TimeZone;

    #[test]
    fn entry_copies_summary_counts() {
        let started_at = Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap();
        let results = ResultSet::new();
        let report = RunReport {
            plan: "demo".into(),
            target: "https://api.example.com/".into(),
            started_at,
            finished_at: started_at,
            summary: Summary::from_results(&results),
            results,
        };

        let entry = HistoryEntry::from_report(&report);
        assert_eq!(entry.run_id, format!("run-{}", started_at.timestamp_micros()));
        assert_eq!(entry.verdict, "NEEDS-WORK");
        assert_eq!((entry.passed, entry.failed, entry.warnings), (0, 0, 0));
    }
}
