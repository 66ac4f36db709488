use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use goldtest::codegen::{render_suite, write_if_changed, GenRequest};

const GEN_TESTS_USAGE: &str = "cargo xtask gen-tests <fixture-dir> <out-file> --runner <fn> \
[--pattern <regex>] [--exclude <file>]... [--prelude <line>]... [--fixture-root <path>] [--check]";

pub fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let Some((cmd, rest)) = args.split_first() else {
        return Err(anyhow!("expected a command (try `gen-tests`)"));
    };

    match cmd.as_str() {
        "gen-tests" => gen_tests(rest),
        _ => Err(anyhow!("unknown command `{cmd}` (supported: `gen-tests`)")),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct GenTestsArgs {
    directory: PathBuf,
    out_file: PathBuf,
    runner: String,
    pattern: String,
    exclude: Vec<String>,
    prelude: Vec<String>,
    fixture_root: Option<String>,
    check: bool,
}

fn gen_tests(args: &[String]) -> Result<()> {
    let parsed = parse_gen_tests_args(args)?;

    let fixture_root = parsed
        .fixture_root
        .clone()
        .unwrap_or_else(|| parsed.directory.display().to_string());
    let req = GenRequest {
        directory: parsed.directory.clone(),
        pattern: parsed.pattern,
        exclude: parsed.exclude,
        runner: parsed.runner,
        prelude: parsed.prelude,
        fixture_root,
    };

    let rendered = render_suite(&req)
        .with_context(|| format!("failed to render suite from {}", parsed.directory.display()))?;

    if parsed.check {
        let existing = fs::read_to_string(&parsed.out_file).unwrap_or_default();
        if existing != rendered {
            bail!(
                "generated suite {} is out of date; rerun `cargo xtask gen-tests` without `--check`",
                parsed.out_file.display()
            );
        }
        return Ok(());
    }

    if write_if_changed(&parsed.out_file, &rendered)? {
        println!("updated {}", parsed.out_file.display());
    } else {
        println!("{} is up to date", parsed.out_file.display());
    }
    Ok(())
}

fn parse_gen_tests_args(args: &[String]) -> Result<GenTestsArgs> {
    let mut positional: Vec<String> = Vec::new();
    let mut runner = None;
    let mut pattern = None;
    let mut fixture_root = None;
    let mut exclude = Vec::new();
    let mut prelude = Vec::new();
    let mut check = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--runner" => runner = Some(flag_value(&mut iter, "--runner")?),
            "--pattern" => pattern = Some(flag_value(&mut iter, "--pattern")?),
            "--exclude" => exclude.push(flag_value(&mut iter, "--exclude")?),
            "--prelude" => prelude.push(flag_value(&mut iter, "--prelude")?),
            "--fixture-root" => fixture_root = Some(flag_value(&mut iter, "--fixture-root")?),
            "--check" => check = true,
            other if other.starts_with("--") => {
                bail!("unknown flag `{other}` (usage: {GEN_TESTS_USAGE})")
            }
            _ => positional.push(arg.clone()),
        }
    }

    let [directory, out_file] = positional.as_slice() else {
        bail!("expected <fixture-dir> and <out-file> (usage: {GEN_TESTS_USAGE})");
    };
    let runner = runner.ok_or_else(|| anyhow!("`--runner` is required (usage: {GEN_TESTS_USAGE})"))?;

    Ok(GenTestsArgs {
        directory: PathBuf::from(directory),
        out_file: PathBuf::from(out_file),
        runner,
        pattern: pattern.unwrap_or_else(|| r"^(.+)\.txt$".to_string()),
        exclude,
        prelude,
        fixture_root,
        check,
    })
}

fn flag_value(iter: &mut std::slice::Iter<'_, String>, flag: &str) -> Result<String> {
    iter.next()
        .cloned()
        .ok_or_else(|| anyhow!("`{flag}` needs a value (usage: {GEN_TESTS_USAGE})"))
}
