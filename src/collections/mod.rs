//! # Test Plans
//!
//! A plan is an ordered list of sections, each holding the steps the harness
//! executes in sequence. Most steps are plain probes; a [`Chain`] feeds data from
//! one probe's response into the requests that follow it.

pub mod solvency;

use std::fmt;

use crate::http::request::TestCase;
use crate::testing::Outcome;

/// Pulls an identifier out of a finished outcome. `None` skips the dependents.
pub type Extractor = fn(&Outcome) -> Option<String>;

/// Builds the dependent cases once an identifier is known.
pub type DependentBuilder = fn(&str) -> Vec<TestCase>;

#[derive(Clone)]
pub struct Chain {
    pub source: TestCase,
    pub extract: Extractor,
    pub dependents: DependentBuilder,
    /// Label used when announcing the extracted identifier, e.g. `session`.
    pub label: &'static str,
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("source", &self.source)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum Step {
    Probe(TestCase),
    /// Informational line shown before slow or noteworthy steps.
    Note(String),
    Chain(Chain),
}

#[derive(Debug, Clone)]
pub struct Section {
    pub title: String,
    pub steps: Vec<Step>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            steps: Vec::new(),
        }
    }

    pub fn probe(mut self, case: TestCase) -> Self {
        self.steps.push(Step::Probe(case));
        self
    }

    pub fn note(mut self, message: impl Into<String>) -> Self {
        self.steps.push(Step::Note(message.into()));
        self
    }

    pub fn chain(mut self, chain: Chain) -> Self {
        self.steps.push(Step::Chain(chain));
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub name: String,
    pub sections: Vec<Section>,
}

impl Plan {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sections: Vec::new(),
        }
    }

    pub fn section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Cases that run unconditionally, in execution order. Chain dependents are
    /// excluded since they only exist once their source has responded.
    pub fn static_cases(&self) -> Vec<&TestCase> {
        self.sections
            .iter()
            .flat_map(|section| section.steps.iter())
            .filter_map(|step| match step {
                Step::Probe(case) => Some(case),
                Step::Chain(chain) => Some(&chain.source),
                Step::Note(_) => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_id(_: &Outcome) -> Option<String> {
        None
    }

    fn no_dependents(_: &str) -> Vec<TestCase> {
        Vec::new()
    }

    #[test]
    fn static_cases_follow_declaration_order() {
        let plan = Plan::new("demo")
            .section(
                Section::new("first")
                    .probe(TestCase::get("a", "/a"))
                    .note("slow step ahead"),
            )
            .section(Section::new("second").chain(Chain {
                source: TestCase::post("b", "/b"),
                extract: no_id,
                dependents: no_dependents,
                label: "thing",
            }));

        let names: Vec<&str> = plan.static_cases().iter().map(|case| case.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
