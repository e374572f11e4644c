//! # Outcomes & Result Aggregation
//!
//! Records what happened for each probed call and accumulates the pass / fail /
//! warning counters for a run. Summary statistics and the readiness verdict are
//! derived in [`report`].

pub mod report;

use std::fmt::{self, Display};

use serde::Serialize;

use crate::http::method::HttpMethod;
use crate::http::request::TestCase;
use crate::http::response::ResponseBody;

/// Why a probe produced no usable response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Timeout,
    TransportError,
    UnsupportedMethod,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Timeout => "TIMEOUT",
            ErrorKind::TransportError => "ERROR",
            ErrorKind::UnsupportedMethod => "UNSUPPORTED METHOD",
        };
        write!(f, "{label}")
    }
}

/// Immutable record of a single probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub name: String,
    pub endpoint: String,
    pub method: HttpMethod,
    pub expected_status: u16,
    pub status_code: Option<u16>,
    pub elapsed_ms: Option<f64>,
    #[serde(rename = "success")]
    pub succeeded: bool,
    pub response: Option<ResponseBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<String>,
}

impl Outcome {
    /// Classify a received response against the case's expectations.
    pub fn responded(case: &TestCase, status: u16, elapsed_ms: f64, body: ResponseBody) -> Self {
        let succeeded = status == case.expected_status;
        let missing_fields = if succeeded {
            body.missing_fields(&case.required_fields)
        } else {
            Vec::new()
        };

        Self {
            name: case.name.clone(),
            endpoint: case.path.clone(),
            method: case.method,
            expected_status: case.expected_status,
            status_code: Some(status),
            elapsed_ms: Some(round_to_2(elapsed_ms)),
            succeeded,
            response: Some(body),
            error_kind: None,
            error: None,
            missing_fields,
        }
    }

    /// A probe that never produced a status code.
    pub fn errored(case: &TestCase, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            name: case.name.clone(),
            endpoint: case.path.clone(),
            method: case.method,
            expected_status: case.expected_status,
            status_code: None,
            elapsed_ms: None,
            succeeded: false,
            response: None,
            error_kind: Some(kind),
            error: Some(message.into()),
            missing_fields: Vec::new(),
        }
    }

    pub fn has_warning(&self) -> bool {
        self.succeeded && !self.missing_fields.is_empty()
    }
}

fn round_to_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Run-scoped accumulation of outcomes. Only ever appended to.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultSet {
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
    #[serde(rename = "tests")]
    outcomes: Vec<Outcome>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: Outcome) -> &Outcome {
        if outcome.succeeded {
            self.passed += 1;
            if outcome.has_warning() {
                self.warnings += 1;
            }
        } else {
            self.failed += 1;
        }

        self.outcomes.push(outcome);
        &self.outcomes[self.outcomes.len() - 1]
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    /// Whether any outcome with this name succeeded.
    pub fn succeeded(&self, name: &str) -> bool {
        self.outcomes
            .iter()
            .any(|outcome| outcome.name == name && outcome.succeeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn health_case() -> TestCase {
        TestCase::get("Health Check", "/health").require_fields(&["status", "timestamp"])
    }

    #[test]
    fn complete_health_body_passes_without_warning() {
        let body = ResponseBody::Json(json!({"status": "ok galaxy", "timestamp": "2026-01-01"}));
        let outcome = Outcome::responded(&health_case(), 200, 12.345, body);

        assert!(outcome.succeeded);
        assert!(!outcome.has_warning());
        assert_eq!(outcome.elapsed_ms, Some(12.35));
    }

    #[test]
    fn missing_timestamp_warns_but_still_passes() {
        let body = ResponseBody::Json(json!({"status": "ok"}));
        let outcome = Outcome::responded(&health_case(), 200, 5.0, body);

        assert!(outcome.succeeded);
        assert_eq!(outcome.missing_fields, vec!["timestamp".to_string()]);

        let mut results = ResultSet::new();
        results.record(outcome);
        assert_eq!((results.passed, results.failed, results.warnings), (1, 0, 1));
    }

    #[test]
    fn expected_404_counts_as_success() {
        let case = TestCase::get("Verify Inclusion (unknown)", "/api/liabilities/verify/unknown_user_xyz")
            .expect_status(404);
        let outcome = Outcome::responded(&case, 404, 3.0, ResponseBody::Json(json!({"error": "not found"})));
        assert!(outcome.succeeded);
    }

    #[test]
    fn status_mismatch_fails_and_skips_field_check() {
        let body = ResponseBody::Json(json!({}));
        let outcome = Outcome::responded(&health_case(), 500, 5.0, body);

        assert!(!outcome.succeeded);
        assert!(outcome.missing_fields.is_empty());
    }

    #[test]
    fn errored_outcomes_count_as_failed() {
        let mut results = ResultSet::new();
        results.record(Outcome::errored(&health_case(), ErrorKind::Timeout, "timed out"));
        results.record(Outcome::errored(&health_case(), ErrorKind::TransportError, "refused"));

        assert_eq!(results.failed, 2);
        assert_eq!(results.total(), results.outcomes().len());
        assert!(results.outcomes().iter().all(|outcome| outcome.elapsed_ms.is_none()));
    }

    #[test]
    fn counters_hold_invariants_for_mixed_outcomes() {
        let mut results = ResultSet::new();
        let statuses = [200, 500, 200, 404, 200];
        for (idx, status) in statuses.into_iter().enumerate() {
            let body = if idx % 2 == 0 {
                ResponseBody::Json(json!({"status": "ok"}))
            } else {
                ResponseBody::Text("oops".into())
            };
            results.record(Outcome::responded(&health_case(), status, 1.0, body));
        }
        results.record(Outcome::errored(&health_case(), ErrorKind::Timeout, "timed out"));

        assert_eq!(results.passed + results.failed, results.outcomes().len());
        assert!(results.warnings <= results.passed);
        assert_eq!((results.passed, results.failed, results.warnings), (3, 3, 3));
    }

    #[test]
    fn serializes_outcomes_under_tests_key() {
        let mut results = ResultSet::new();
        results.record(Outcome::errored(&health_case(), ErrorKind::Timeout, "timed out"));

        let value = serde_json::to_value(&results).unwrap();
        assert_eq!(value["failed"], json!(1));
        assert_eq!(value["tests"][0]["error_kind"], json!("timeout"));
        assert_eq!(value["tests"][0]["success"], json!(false));
    }
}
