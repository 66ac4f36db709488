use crate::support::{BlessGuard, ScratchDir};

use goldtest::golden;
use pretty_assertions::assert_eq;

#[test]
fn matching_expectation_passes() {
    let scratch = ScratchDir::new().unwrap();
    let path = scratch
        .write("ok.txt", "delta\nalpha\n\n// RESULT\n// alpha\n// delta\n")
        .unwrap();

    golden::check(&path, "alpha\ndelta").unwrap();
    // Trailing whitespace on the computed side is not significant.
    golden::check(&path, "alpha\ndelta\n").unwrap();
}

#[test]
fn mismatch_reports_expected_and_actual() {
    let scratch = ScratchDir::new().unwrap();
    let path = scratch
        .write("stale.txt", "delta\n\n// RESULT\n// alpha\n")
        .unwrap();

    let _bless = BlessGuard::disable();
    let err = golden::check(&path, "delta").unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("does not match"), "message: {message}");
    assert!(message.contains("--- expected\nalpha"), "message: {message}");
    assert!(message.contains("--- actual\ndelta"), "message: {message}");
}

#[test]
fn missing_block_mentions_bless() {
    let scratch = ScratchDir::new().unwrap();
    let path = scratch.write("bare.txt", "delta\n").unwrap();

    let _bless = BlessGuard::disable();
    let err = golden::check(&path, "delta").unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("no `// RESULT` block"), "message: {message}");
    assert!(message.contains("BLESS=1"), "message: {message}");
}

#[test]
fn bless_writes_the_expectation_in_place() {
    let scratch = ScratchDir::new().unwrap();
    let path = scratch.write("fresh.txt", "delta\nalpha\n").unwrap();

    {
        let _bless = BlessGuard::enable();
        golden::check(&path, "alpha\ndelta").unwrap();
    }

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "delta\nalpha\n\n// RESULT\n// alpha\n// delta\n"
    );
    // After blessing, a plain check passes.
    golden::check(&path, "alpha\ndelta").unwrap();
}

#[test]
fn bless_replaces_a_stale_expectation() {
    let scratch = ScratchDir::new().unwrap();
    let path = scratch
        .write("refresh.txt", "delta\n\n// RESULT\n// stale\n")
        .unwrap();

    {
        let _bless = BlessGuard::enable();
        golden::check(&path, "delta").unwrap();
    }

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "delta\n\n// RESULT\n// delta\n"
    );
}
