//! The runtime registration table: one test case per discovered fixture,
//! bound to an externally supplied single-fixture runner.

use crate::coverage;
use crate::discovery::{self, Fixture, FixtureFilter};
use crate::schema::{CaseFailure, CaseResult, CaseStatus, SuiteReport, SuiteSummary};
use crate::{Result, SCHEMA_VERSION};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// The externally owned per-fixture check. A returned error means the
/// fixture's content failed; the harness records the rendered error chain
/// verbatim and never retries.
pub type FixtureRunner = Box<dyn Fn(&Path) -> anyhow::Result<()>>;

pub struct TestCase {
    pub id: String,
    pub fixture: Fixture,
}

/// Named, ordered collection of cases bound to one fixture directory.
pub struct Suite {
    name: String,
    directory: PathBuf,
    filter: FixtureFilter,
    runner: FixtureRunner,
    cases: Vec<TestCase>,
}

impl Suite {
    /// Enumerate `directory` and register one case per fixture. Building the
    /// table at test time means the suite can never drift from the
    /// directory it was built from.
    pub fn from_directory(
        name: impl Into<String>,
        directory: impl Into<PathBuf>,
        filter: FixtureFilter,
        runner: FixtureRunner,
    ) -> Result<Self> {
        let directory = directory.into();
        let fixtures = discovery::enumerate(&directory, &filter)?;
        let cases = fixtures
            .into_iter()
            .map(|fixture| TestCase {
                id: fixture.test_ident.clone(),
                fixture,
            })
            .collect();
        Ok(Self {
            name: name.into(),
            directory,
            filter,
            runner,
            cases,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// Execute every case in registration order. A failing case does not
    /// abort its siblings.
    pub fn run(&self) -> SuiteReport {
        let mut cases = Vec::with_capacity(self.cases.len());
        for case in &self.cases {
            cases.push(self.run_case(case));
        }

        let summary = summarize(&cases);
        SuiteReport {
            schema_version: SCHEMA_VERSION,
            suite: self.name.clone(),
            success: summary.failed == 0,
            cases,
            summary,
        }
    }

    /// One request/response: run a single case and report its outcome.
    pub fn run_case(&self, case: &TestCase) -> CaseResult {
        let started = Instant::now();
        let outcome = (self.runner)(&case.fixture.path);
        let duration_ms = Some(started.elapsed().as_millis() as u64);

        match outcome {
            Ok(()) => CaseResult {
                id: case.id.clone(),
                status: CaseStatus::Passed,
                duration_ms,
                failure: None,
            },
            Err(err) => {
                tracing::debug!(
                    target = "goldtest",
                    case = %case.id,
                    fixture = %case.fixture.relative_path,
                    error = %err,
                    "fixture case failed"
                );
                CaseResult {
                    id: case.id.clone(),
                    status: CaseStatus::Failed,
                    duration_ms,
                    failure: Some(CaseFailure {
                        message: format!("{err:#}"),
                    }),
                }
            }
        }
    }

    /// Recompute the fixture set and fail with a drift error when it no
    /// longer matches the registered cases.
    pub fn verify_coverage(&self) -> Result<()> {
        let known: Vec<&str> = self
            .cases
            .iter()
            .map(|case| case.fixture.relative_path.as_str())
            .collect();
        coverage::check_coverage(&self.directory, &self.filter, &known)
    }
}

fn summarize(cases: &[CaseResult]) -> SuiteSummary {
    let mut summary = SuiteSummary {
        total: cases.len() as u32,
        ..SuiteSummary::default()
    };
    for case in cases {
        match case.status {
            CaseStatus::Passed => summary.passed += 1,
            CaseStatus::Failed => summary.failed += 1,
        }
    }
    summary
}
