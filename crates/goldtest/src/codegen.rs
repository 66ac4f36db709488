//! Renders a generated test source file from a fixture directory.
//!
//! The generation step is scan, sort, template-render: the fixture directory
//! is enumerated through [`crate::discovery::enumerate`] (so the generated
//! file and the runtime registration table can never disagree about what a
//! fixture is), and the rendered table of `#[test]` functions plus the
//! aggregate coverage check is the single source of truth the test runner
//! consumes.

use crate::discovery::{self, FixtureFilter};
use crate::{GoldtestError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Inputs for rendering one generated suite.
#[derive(Debug, Clone)]
pub struct GenRequest {
    /// Directory scanned at generation time.
    pub directory: PathBuf,
    /// Anchored regex matched against fixture file names.
    pub pattern: String,
    /// File names left out of the generated suite.
    pub exclude: Vec<String>,
    /// Callee path of the single-fixture runner, e.g.
    /// `run_declaration_fixture`. The generated tests call it with a
    /// `&Path`; it is expected to panic on failure.
    pub runner: String,
    /// Verbatim lines emitted after the imports, e.g. a `use` for the
    /// runner.
    pub prelude: Vec<String>,
    /// Path prefix the generated file uses at runtime, relative to the
    /// package root (no trailing slash).
    pub fixture_root: String,
}

/// Render the generated suite source for `req`.
///
/// Deterministic: the emitted test functions follow the sorted fixture
/// order, and the aggregate coverage check carries the fixture list baked
/// in, so a later scan can detect drift.
pub fn render_suite(req: &GenRequest) -> Result<String> {
    if req.pattern.contains('"') {
        return Err(GoldtestError::InvalidRequest(
            "fixture pattern must not contain `\"`".to_string(),
        ));
    }

    let mut filter = FixtureFilter::new(&req.pattern)?;
    for name in &req.exclude {
        filter = filter.exclude(name.clone());
    }
    let fixtures = discovery::enumerate(&req.directory, &filter)?;
    for fixture in &fixtures {
        if fixture.relative_path.contains('"') || fixture.relative_path.contains('\\') {
            return Err(GoldtestError::InvalidRequest(format!(
                "fixture name `{}` cannot be embedded in generated source",
                fixture.relative_path
            )));
        }
    }

    let mut out = String::new();
    out.push_str("//! Generated file, do not edit by hand.\n");
    out.push_str("//!\n");
    out.push_str("//! To regenerate, run:\n");
    out.push_str("//!   cargo xtask gen-tests\n\n");
    out.push_str("use std::path::Path;\n\n");
    for line in &req.prelude {
        out.push_str(line);
        out.push('\n');
    }
    if !req.prelude.is_empty() {
        out.push('\n');
    }

    for fixture in &fixtures {
        out.push_str("#[test]\n");
        out.push_str(&format!("fn {}() {{\n", fixture.test_ident));
        out.push_str(&format!(
            "    {}(Path::new(\"{}/{}\"));\n",
            req.runner, req.fixture_root, fixture.relative_path
        ));
        out.push_str("}\n\n");
    }

    let directory_name = req
        .directory
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    out.push_str("#[test]\n");
    out.push_str(&format!("fn {}() {{\n", aggregate_ident(&directory_name)));
    out.push_str("    goldtest::coverage::assert_fixtures_covered(\n");
    out.push_str(&format!("        Path::new(\"{}\"),\n", req.fixture_root));
    out.push_str(&format!("        r\"{}\",\n", req.pattern));
    if req.exclude.is_empty() {
        out.push_str("        &[],\n");
    } else {
        let excludes: Vec<String> = req.exclude.iter().map(|name| format!("\"{name}\"")).collect();
        out.push_str(&format!("        &[{}],\n", excludes.join(", ")));
    }
    if fixtures.is_empty() {
        out.push_str("        &[],\n");
    } else {
        out.push_str("        &[\n");
        for fixture in &fixtures {
            out.push_str(&format!("            \"{}\",\n", fixture.relative_path));
        }
        out.push_str("        ],\n");
    }
    out.push_str("    );\n");
    out.push_str("}\n");

    Ok(out)
}

/// Write `contents` to `path` only when it differs, creating parent
/// directories as needed. Returns whether the file changed.
pub fn write_if_changed(path: &Path, contents: &str) -> Result<bool> {
    let existing = match fs::read_to_string(path) {
        Ok(existing) => Some(existing),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => return Err(err.into()),
    };
    if existing.as_deref() == Some(contents) {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    tracing::info!(
        target = "goldtest",
        path = %path.display(),
        "wrote generated suite"
    );
    Ok(true)
}

/// Test identifier for a fixture file name: the extension is dropped and
/// the stem is converted to snake_case with a `test_` prefix, so the result
/// can never collide with a Rust keyword or start with a digit.
/// `inOtherFile.txt` becomes `test_in_other_file`.
pub fn test_ident(file_name: &str) -> String {
    let stem = match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        _ => file_name,
    };
    let snake = snake(stem);
    if snake.is_empty() {
        "test_fixture".to_string()
    } else {
        format!("test_{snake}")
    }
}

/// Identifier of the aggregate coverage case for a fixture directory.
pub fn aggregate_ident(directory_name: &str) -> String {
    let snake = snake(directory_name);
    if snake.is_empty() {
        "test_all_fixtures_present".to_string()
    } else {
        format!("test_all_fixtures_present_in_{snake}")
    }
}

fn snake(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    for ch in input.chars() {
        if ch.is_ascii_uppercase() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else if ch.is_ascii_alphanumeric() {
            out.push(ch);
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_end_matches('_').to_string()
}
