//! # Plan Runner
//!
//! Walks a [`Plan`] one step at a time, probing each case, recording every outcome
//! in a single [`ResultSet`] and summarizing the run once the last step finishes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::collections::{Chain, Plan, Step};
use crate::http::client::Prober;
use crate::http::request::TestCase;
use crate::testing::report::Summary;
use crate::testing::{Outcome, ResultSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    NotStarted,
    Running,
    Completed,
}

/// Receives progress as the run advances. Every hook defaults to doing nothing.
pub trait Reporter {
    fn section(&mut self, _title: &str) {}

    fn note(&mut self, _message: &str) {}

    fn outcome(&mut self, _outcome: &Outcome) {}
}

/// Discards all progress, used when stdout is reserved for machine output.
#[derive(Debug, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {}

/// Everything produced by one run: the flat result dump plus its summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub plan: String,
    pub target: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    #[serde(flatten)]
    pub results: ResultSet,
    pub summary: Summary,
}

pub struct Harness<R> {
    prober: Prober,
    reporter: R,
    state: RunState,
}

impl<R: Reporter> Harness<R> {
    pub fn new(prober: Prober, reporter: R) -> Self {
        Self {
            prober,
            reporter,
            state: RunState::NotStarted,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub async fn run(&mut self, plan: &Plan) -> RunReport {
        self.state = RunState::Running;
        let started_at = Utc::now();
        let target = self.prober.base_url().to_string();
        info!(plan = %plan.name, %target, "starting run");

        let mut results = ResultSet::new();
        for section in &plan.sections {
            self.reporter.section(&section.title);
            for step in &section.steps {
                match step {
                    Step::Probe(case) => {
                        self.probe(case, &mut results).await;
                    }
                    Step::Note(message) => self.reporter.note(message),
                    Step::Chain(chain) => self.run_chain(chain, &mut results).await,
                }
            }
        }

        let summary = Summary::from_results(&results);
        self.state = RunState::Completed;
        info!(
            passed = summary.passed,
            failed = summary.failed,
            warnings = summary.warnings,
            verdict = %summary.verdict,
            "run completed"
        );

        RunReport {
            plan: plan.name.clone(),
            target,
            started_at,
            finished_at: Utc::now(),
            results,
            summary,
        }
    }

    async fn probe<'r>(&mut self, case: &TestCase, results: &'r mut ResultSet) -> &'r Outcome {
        let outcome = self.prober.probe(case).await;
        let recorded = results.record(outcome);
        self.reporter.outcome(recorded);
        recorded
    }

    async fn run_chain(&mut self, chain: &Chain, results: &mut ResultSet) {
        let source = self.probe(&chain.source, results).await;
        let Some(id) = (chain.extract)(source) else {
            debug!(source = %chain.source.name, "no {} id in response, skipping dependents", chain.label);
            return;
        };

        self.reporter.note(&format!("Created {}: {id}", chain.label));
        for case in (chain.dependents)(&id) {
            self.probe(&case, results).await;
        }
    }
}
