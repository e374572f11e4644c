//! Console presentation: progress lines while a run is in flight, and the summary
//! and readiness block once it finishes.

pub mod style;

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use colored::Colorize;

use crate::history::HistoryEntry;
use crate::runner::{Reporter, RunReport};
use crate::testing::Outcome;

/// Characters of a mismatched response shown under the failure line.
const RESPONSE_EXCERPT_CHARS: usize = 200;

pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_outcome(&mut self, outcome: &Outcome) -> io::Result<()> {
        if let Some(kind) = outcome.error_kind {
            let message = outcome.error.as_deref().unwrap_or_default();
            return writeln!(
                self.out,
                "{}",
                style::failure(&format!("{} - {kind}: {message}", outcome.name))
            );
        }

        let status = outcome.status_code.unwrap_or_default();
        if outcome.succeeded {
            let elapsed = outcome.elapsed_ms.unwrap_or_default();
            writeln!(
                self.out,
                "{}",
                style::success(&format!("{} - {status} ({elapsed:.0}ms)", outcome.name))
            )?;
            if outcome.has_warning() {
                writeln!(
                    self.out,
                    "  {}",
                    style::warning(&format!(
                        "Missing expected fields: [{}]",
                        outcome.missing_fields.join(", ")
                    ))
                )?;
            }
            return Ok(());
        }

        writeln!(
            self.out,
            "{}",
            style::failure(&format!(
                "{} - Expected {}, got {}",
                outcome.name, outcome.expected_status, status
            ))
        )?;
        if let Some(body) = outcome.response.as_ref().filter(|body| !body.is_empty()) {
            writeln!(self.out, "    Response: {}", body.excerpt(RESPONSE_EXCERPT_CHARS))?;
        }
        Ok(())
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn section(&mut self, title: &str) {
        let _ = write_header(&mut self.out, title);
    }

    fn note(&mut self, message: &str) {
        let _ = writeln!(self.out, "{}", style::info(message));
    }

    fn outcome(&mut self, outcome: &Outcome) {
        let _ = self.write_outcome(outcome);
    }
}

fn write_header<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style::rule())?;
    writeln!(out, "{}", style::heading(title))?;
    writeln!(out, "{}", style::rule())
}

pub fn print_banner<W: Write>(
    out: &mut W,
    plan: &str,
    target: &str,
    started_at: DateTime<Utc>,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", format!("{plan} Test Suite").bold())?;
    writeln!(out, "Target: {target}")?;
    writeln!(out, "Time: {}", started_at.to_rfc3339())
}

pub fn print_summary<W: Write>(out: &mut W, report: &RunReport) -> io::Result<()> {
    let summary = &report.summary;

    write_header(out, "TEST SUMMARY")?;
    writeln!(out)?;
    writeln!(out, "{}", "Results:".bold())?;
    writeln!(out, "  {}", format!("Passed: {}", summary.passed).green())?;
    writeln!(out, "  {}", format!("Failed: {}", summary.failed).red())?;
    writeln!(out, "  {}", format!("Warnings: {}", summary.warnings).yellow())?;
    writeln!(out, "  Pass Rate: {:.1}%", summary.pass_rate)?;

    if let Some(latency) = &summary.latency {
        writeln!(out)?;
        writeln!(out, "{}", "Performance:".bold())?;
        writeln!(out, "  Avg Response Time: {:.0}ms", latency.avg_ms)?;
        writeln!(out, "  Max Response Time: {:.0}ms", latency.max_ms)?;
        writeln!(out, "  Min Response Time: {:.0}ms", latency.min_ms)?;
        writeln!(out, "  p50 / p95: {:.0}ms / {:.0}ms", latency.p50_ms, latency.p95_ms)?;
    }

    write_header(out, "READINESS ASSESSMENT")?;
    writeln!(out)?;
    writeln!(
        out,
        "{} {}/{} working",
        "Critical Endpoints:".bold(),
        summary.critical_passed,
        summary.critical_total
    )?;
    writeln!(out)?;
    writeln!(out, "{}", style::verdict(summary.verdict))?;
    for detail in style::verdict_details(summary.verdict) {
        writeln!(out, "  - {detail}")?;
    }
    Ok(())
}

pub fn print_history<W: Write>(out: &mut W, entries: &[HistoryEntry]) -> io::Result<()> {
    if entries.is_empty() {
        return writeln!(out, "No recorded runs");
    }

    writeln!(out, "{}", "Recent runs:".bold())?;
    for entry in entries {
        writeln!(
            out,
            "  {}  {}  {}/{} passed ({:.1}%), {} warnings  {}  {}",
            entry.started_at.format("%Y-%m-%d %H:%M:%S"),
            entry.verdict,
            entry.passed,
            entry.passed + entry.failed,
            entry.pass_rate,
            entry.warnings,
            entry.target,
            entry.run_id.dimmed(),
        )?;
    }
    Ok(())
}
