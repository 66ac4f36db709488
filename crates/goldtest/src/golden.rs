//! Golden-expectation helpers for fixture files.
//!
//! A fixture carries its expected output as a trailing comment block:
//!
//! ```text
//! delta
//! alpha
//!
//! // RESULT
//! // alpha
//! // delta
//! ```
//!
//! [`check`] compares computed output against the block. When the `BLESS`
//! environment variable is set, a mismatching or missing block is rewritten
//! in place instead of failing, so expectations can be refreshed with
//! `BLESS=1 cargo test`.

use anyhow::{bail, Context};
use std::env;
use std::fs;
use std::path::Path;

const RESULT_MARKER: &str = "// RESULT";

/// The expected-output block embedded in `fixture`, if any: the lines after
/// the `// RESULT` marker with their comment prefix stripped.
pub fn expected_block(fixture: &str) -> Option<String> {
    let mut found = false;
    let mut out = String::new();
    for line in fixture.lines() {
        if !found {
            if line.trim_end() == RESULT_MARKER {
                found = true;
            }
            continue;
        }
        let stripped = line
            .strip_prefix("// ")
            .or_else(|| line.strip_prefix("//"))
            .unwrap_or(line);
        out.push_str(stripped);
        out.push('\n');
    }

    if found {
        Some(out.trim_end().to_string())
    } else {
        None
    }
}

/// Compare `actual` against the fixture's embedded expectation.
pub fn check(path: &Path, actual: &str) -> anyhow::Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read fixture {}", path.display()))?;
    let actual = actual.trim_end();

    let expected = expected_block(&text);
    if expected.as_deref() == Some(actual) {
        return Ok(());
    }

    if bless_enabled() {
        fs::write(path, with_result_block(&text, actual))
            .with_context(|| format!("failed to bless fixture {}", path.display()))?;
        tracing::info!(
            target = "goldtest",
            path = %path.display(),
            "blessed fixture expectation"
        );
        return Ok(());
    }

    match expected {
        Some(expected) => bail!(
            "fixture {} does not match its expected result (run with `BLESS=1` to update)\n\
             --- expected\n{expected}\n--- actual\n{actual}",
            path.display()
        ),
        None => bail!(
            "fixture {} has no `{RESULT_MARKER}` block (run with `BLESS=1` to write one)",
            path.display()
        ),
    }
}

/// The fixture text with its trailing expectation block replaced by
/// `actual`.
fn with_result_block(text: &str, actual: &str) -> String {
    let mut body: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim_end() == RESULT_MARKER {
            break;
        }
        body.push(line);
    }
    while body.last().is_some_and(|line| line.trim().is_empty()) {
        body.pop();
    }

    let mut out = body.join("\n");
    if !out.is_empty() {
        out.push('\n');
        out.push('\n');
    }
    out.push_str(RESULT_MARKER);
    out.push('\n');
    for line in actual.lines() {
        if line.is_empty() {
            out.push_str("//\n");
        } else {
            out.push_str("// ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

fn bless_enabled() -> bool {
    match env::var("BLESS") {
        Ok(val) => {
            let val = val.trim();
            !val.is_empty() && val != "0" && !val.eq_ignore_ascii_case("false")
        }
        Err(_) => false,
    }
}
