use colored::{ColoredString, Colorize};

use crate::testing::report::ReadinessVerdict;

pub const RULE_WIDTH: usize = 60;

pub fn success(message: &str) -> ColoredString {
    format!("✓ {message}").green()
}

pub fn failure(message: &str) -> ColoredString {
    format!("✗ {message}").red()
}

pub fn warning(message: &str) -> ColoredString {
    format!("⚠ {message}").yellow()
}

pub fn info(message: &str) -> ColoredString {
    format!("ℹ {message}").blue()
}

pub fn heading(message: &str) -> ColoredString {
    message.bold().blue()
}

pub fn rule() -> ColoredString {
    "=".repeat(RULE_WIDTH).bold().blue()
}

pub fn verdict(verdict: ReadinessVerdict) -> ColoredString {
    match verdict {
        ReadinessVerdict::Ready => "✓ SYSTEM IS READY".green().bold(),
        ReadinessVerdict::NeedsMinorFixes => "⚠ SYSTEM NEEDS MINOR FIXES".yellow().bold(),
        ReadinessVerdict::NeedsWork => "✗ SYSTEM NEEDS WORK".red().bold(),
    }
}

pub fn verdict_details(verdict: ReadinessVerdict) -> &'static [&'static str] {
    match verdict {
        ReadinessVerdict::Ready => &[
            "All critical endpoints working",
            "API is responsive and deployed",
            "Core solvency proof functionality operational",
        ],
        ReadinessVerdict::NeedsMinorFixes => &[
            "Some endpoints may need attention",
            "Review failed tests above",
        ],
        ReadinessVerdict::NeedsWork => &[
            "Multiple endpoints failing",
            "Review and fix issues before demo",
        ],
    }
}
