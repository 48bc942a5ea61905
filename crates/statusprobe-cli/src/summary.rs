use std::fmt;

use serde::Serialize;

use crate::{error::CheckError, observation::Observation};

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: &'static str,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed: Option<Observation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

impl CheckResult {
    pub(crate) fn pass(name: &'static str, observed: Option<Observation>, elapsed_ms: u64) -> Self {
        CheckResult {
            name,
            passed: true,
            observed,
            error: None,
            elapsed_ms,
        }
    }

    pub(crate) fn fail(
        name: &'static str,
        observed: Option<Observation>,
        error: &CheckError,
        elapsed_ms: u64,
    ) -> Self {
        CheckResult {
            name,
            passed: false,
            observed,
            error: Some(error.to_string()),
            elapsed_ms,
        }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.passed { "PASSED" } else { "FAILED" };
        write!(f, "{}: {} ({} ms)", self.name, verdict, self.elapsed_ms)?;
        if let Some(error) = &self.error {
            write!(f, "\n    error: {error}")?;
            if let Some(obs) = &self.observed {
                write!(f, "\n    observed: {} {} -> {}", obs.method, obs.url, obs.status)?;
                if !obs.body.is_empty() {
                    write!(f, "\n    body: {}", obs.body_preview())?;
                }
            }
        }
        Ok(())
    }
}

/// Outcome of one verifier run, checks in execution order.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub checks: Vec<CheckResult>,
    pub passed: bool,
}

impl RunSummary {
    pub fn new(checks: Vec<CheckResult>) -> Self {
        let passed = checks.iter().all(|c| c.passed);
        RunSummary { checks, passed }
    }

    pub fn get(&self, name: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.name == name)
    }

    pub fn failed(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|c| !c.passed)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Check Results Summary ===")?;
        for check in &self.checks {
            writeln!(f, "{check}")?;
        }
        let overall = if self.passed {
            "ALL CHECKS PASSED"
        } else {
            "SOME CHECKS FAILED"
        };
        write!(f, "\nOverall Result: {overall}")
    }
}
