//! Fixture-driven test harness.
//!
//! This crate maps a directory of fixture files onto executable test cases:
//! - **Discovery** enumerates fixture files matching a name pattern in a
//!   deterministic (sorted) order.
//! - **Suites** bind each discovered fixture to an externally supplied
//!   single-fixture runner and execute the cases one by one, producing a
//!   stable JSON report.
//! - **Coverage** is the aggregate consistency check: it recomputes the
//!   on-disk fixture set and fails when it has drifted from the set of
//!   registered cases, in either direction.
//! - **Codegen** renders a checked-in Rust test source file from a fixture
//!   directory (scan, sort, template-render), for projects that prefer a
//!   generated suite over a runtime registration table.
//!
//! ## Stable JSON schema
//!
//! The payloads produced by [`discovery::discover_fixtures`] and
//! [`suite::Suite::run`] are defined in [`schema`]. All payloads include a
//! `schemaVersion` field to allow additive evolution without breaking
//! consumers.
//!
//! A discovery manifest ([`schema::FixtureDiscoverResponse`]):
//!
//! ```json
//! {
//!   "schemaVersion": 1,
//!   "directory": "fixtures/declarations",
//!   "fixtures": [
//!     {
//!       "relativePath": "basicNames.txt",
//!       "displayName": "basicNames.txt",
//!       "testIdent": "test_basic_names"
//!     }
//!   ]
//! }
//! ```
//!
//! A suite report ([`schema::SuiteReport`]):
//!
//! ```json
//! {
//!   "schemaVersion": 1,
//!   "suite": "declarations",
//!   "success": false,
//!   "cases": [
//!     { "id": "test_basic_names", "status": "passed", "durationMs": 2 },
//!     {
//!       "id": "test_mixed_case",
//!       "status": "failed",
//!       "durationMs": 1,
//!       "failure": { "message": "fixture does not match its expected result" }
//!     }
//!   ],
//!   "summary": { "total": 2, "passed": 1, "failed": 1 }
//! }
//! ```
//!
//! Per-case fixture failures are data in the report, not library errors:
//! nothing is retried and nothing is swallowed. Library errors
//! ([`GoldtestError`]) are reserved for unreadable directories, invalid
//! requests, and fixture-set drift.

pub mod codegen;
pub mod coverage;
pub mod discovery;
pub mod golden;
pub mod schema;
pub mod suite;

mod util;

pub use coverage::{assert_fixtures_covered, check_coverage, Drift};
pub use discovery::{discover_fixtures, enumerate, Fixture, FixtureFilter};
pub use schema::SCHEMA_VERSION;
pub use suite::{FixtureRunner, Suite, TestCase};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GoldtestError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("fixture pattern error: {0}")]
    Pattern(#[from] regex::Error),
    #[error("{0}")]
    Drift(#[from] coverage::Drift),
}

pub type Result<T> = std::result::Result<T, GoldtestError>;
