//! Aggregate consistency check between registered test cases and the
//! fixture files on disk.

use crate::discovery::{self, FixtureFilter};
use crate::Result;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// The two ways a fixture set and its registered cases can diverge.
///
/// `unregistered` files were added without regenerating the suite;
/// `missing` files were deleted while their cases stayed behind. Both are
/// fixed by regenerating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drift {
    pub directory: String,
    /// Registered but no longer on disk.
    pub missing: Vec<String>,
    /// On disk but never registered.
    pub unregistered: Vec<String>,
}

impl fmt::Display for Drift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fixture set in {} has drifted from the registered test cases; regenerate the suite",
            self.directory
        )?;
        for name in &self.unregistered {
            write!(f, "\n  on disk but not registered: {name}")?;
        }
        for name in &self.missing {
            write!(f, "\n  registered but missing on disk: {name}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Drift {}

/// Recompute the fixture set under `directory` and compare it against the
/// relative paths in `known` (the list baked into the generated cases).
pub fn check_coverage(directory: &Path, filter: &FixtureFilter, known: &[&str]) -> Result<()> {
    let fixtures = discovery::enumerate(directory, filter)?;
    let on_disk: BTreeSet<&str> = fixtures
        .iter()
        .map(|fixture| fixture.relative_path.as_str())
        .collect();
    let registered: BTreeSet<&str> = known.iter().copied().collect();

    let unregistered: Vec<String> = on_disk
        .difference(&registered)
        .map(|name| (*name).to_string())
        .collect();
    let missing: Vec<String> = registered
        .difference(&on_disk)
        .map(|name| (*name).to_string())
        .collect();

    if unregistered.is_empty() && missing.is_empty() {
        return Ok(());
    }
    Err(Drift {
        directory: directory.display().to_string(),
        missing,
        unregistered,
    }
    .into())
}

/// Panicking wrapper for use inside a `#[test]`; the generated aggregate
/// case calls this with the pattern, exclude list, and fixture list baked
/// in at generation time.
pub fn assert_fixtures_covered(directory: &Path, pattern: &str, exclude: &[&str], known: &[&str]) {
    let mut filter = FixtureFilter::new(pattern)
        .unwrap_or_else(|err| panic!("invalid fixture pattern `{pattern}`: {err}"));
    for name in exclude {
        filter = filter.exclude(*name);
    }
    if let Err(err) = check_coverage(directory, &filter, known) {
        panic!("{err}");
    }
}
