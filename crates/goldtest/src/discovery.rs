use crate::codegen::test_ident;
use crate::schema::{FixtureDiscoverRequest, FixtureDiscoverResponse, FixtureEntry};
use crate::util::rel_path_string;
use crate::{GoldtestError, Result, SCHEMA_VERSION};
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub(crate) const SKIP_DIRS: &[&str] = &[".git", "target", "build", "out", "node_modules"];

/// One fixture file, as discovered on disk. Immutable value record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    /// Absolute (or caller-relative) path usable for reading the file.
    pub path: PathBuf,
    /// Path relative to the scanned directory, slash-separated.
    pub relative_path: String,
    /// File name as written on disk.
    pub display_name: String,
    /// Deterministic Rust identifier derived from the file name.
    pub test_ident: String,
}

/// Name pattern plus exclude list applied to candidate file names.
///
/// The pattern is matched against the file name only, never the full path,
/// so fixtures can move between subdirectories without changing identity
/// rules.
#[derive(Debug, Clone)]
pub struct FixtureFilter {
    pattern: Regex,
    exclude: Vec<String>,
}

impl FixtureFilter {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            exclude: Vec::new(),
        })
    }

    #[must_use]
    pub fn exclude(mut self, file_name: impl Into<String>) -> Self {
        self.exclude.push(file_name.into());
        self
    }

    pub(crate) fn matches(&self, file_name: &str) -> bool {
        self.pattern.is_match(file_name) && !self.exclude.iter().any(|name| name == file_name)
    }
}

/// Enumerate fixture files under `directory`.
///
/// Walks recursively (skipping well-known build/VCS directories), keeps
/// regular files whose name matches the filter, and returns them sorted by
/// relative path. Two successive scans of an unchanged tree yield identical
/// sequences.
pub fn enumerate(directory: &Path, filter: &FixtureFilter) -> Result<Vec<Fixture>> {
    if !directory.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("fixture directory {} does not exist", directory.display()),
        )
        .into());
    }

    let mut fixtures = Vec::new();
    for entry in WalkDir::new(directory)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            !SKIP_DIRS.iter().any(|skip| skip == &name.as_ref())
        })
    {
        let entry = entry.map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            tracing::debug!(
                target = "goldtest",
                path = %entry.path().display(),
                "skipping fixture with non-utf8 file name"
            );
            continue;
        };
        if !filter.matches(name) {
            continue;
        }

        fixtures.push(Fixture {
            path: entry.path().to_path_buf(),
            relative_path: rel_path_string(directory, entry.path()),
            display_name: name.to_string(),
            test_ident: test_ident(name),
        });
    }

    fixtures.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    ensure_unique_idents(&fixtures)?;
    Ok(fixtures)
}

/// Schema-level wrapper around [`enumerate`] returning the versioned
/// discovery manifest.
pub fn discover_fixtures(req: &FixtureDiscoverRequest) -> Result<FixtureDiscoverResponse> {
    if req.directory.trim().is_empty() {
        return Err(GoldtestError::InvalidRequest(
            "`directory` must not be empty".to_string(),
        ));
    }

    let mut filter = FixtureFilter::new(&req.pattern)?;
    for name in &req.exclude {
        filter = filter.exclude(name.clone());
    }

    let fixtures = enumerate(Path::new(&req.directory), &filter)?;
    Ok(FixtureDiscoverResponse {
        schema_version: SCHEMA_VERSION,
        directory: req.directory.clone(),
        fixtures: fixtures.iter().map(FixtureEntry::from).collect(),
    })
}

impl From<&Fixture> for FixtureEntry {
    fn from(fixture: &Fixture) -> Self {
        Self {
            relative_path: fixture.relative_path.clone(),
            display_name: fixture.display_name.clone(),
            test_ident: fixture.test_ident.clone(),
        }
    }
}

fn ensure_unique_idents(fixtures: &[Fixture]) -> Result<()> {
    let mut by_ident: HashMap<&str, &Fixture> = HashMap::new();
    for fixture in fixtures {
        if let Some(prev) = by_ident.insert(fixture.test_ident.as_str(), fixture) {
            return Err(GoldtestError::InvalidRequest(format!(
                "fixtures `{}` and `{}` both map to test identifier `{}`; rename one of them",
                prev.relative_path, fixture.relative_path, fixture.test_ident
            )));
        }
    }
    Ok(())
}
