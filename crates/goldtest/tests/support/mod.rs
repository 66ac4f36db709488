use std::env;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use goldtest::codegen::GenRequest;
use tempfile::TempDir;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Turns on bless mode for the duration of the guard, serializing access so
/// parallel test threads don't observe each other's `BLESS` value.
pub struct BlessGuard {
    _lock: MutexGuard<'static, ()>,
    original: Option<OsString>,
}

impl BlessGuard {
    pub fn enable() -> Self {
        let guard = Self::hold();
        env::set_var("BLESS", "1");
        guard
    }

    /// Hold the lock with `BLESS` unset, so a test asserting the failure
    /// path cannot race a blessing test on another thread.
    pub fn disable() -> Self {
        let guard = Self::hold();
        env::remove_var("BLESS");
        guard
    }

    fn hold() -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(|err| err.into_inner());
        let original = env::var_os("BLESS");
        Self {
            _lock: lock,
            original,
        }
    }
}

impl Drop for BlessGuard {
    fn drop(&mut self) {
        match self.original.take() {
            Some(val) => env::set_var("BLESS", val),
            None => env::remove_var("BLESS"),
        }
    }
}

/// Throwaway fixture directory for tests that mutate the fixture set.
pub struct ScratchDir {
    _temp_dir: TempDir,
    pub root: PathBuf,
}

impl ScratchDir {
    pub fn new() -> io::Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().join("fixtures");
        fs::create_dir_all(&root)?;
        Ok(Self {
            _temp_dir: temp_dir,
            root,
        })
    }

    pub fn write(&self, relative: &str, contents: &str) -> io::Result<PathBuf> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn remove(&self, relative: &str) -> io::Result<()> {
        fs::remove_file(self.root.join(relative))
    }
}

/// The single-fixture runner for the checked-in `declarations` suite: the
/// declared names are the non-comment lines, sorted and deduplicated, and
/// the fixture's `// RESULT` block is the golden expectation.
pub fn run_declaration_fixture(path: &Path) {
    let text = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {err}", path.display()));

    let mut names: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("//"))
        .collect();
    names.sort_unstable();
    names.dedup();

    if let Err(err) = goldtest::golden::check(path, &names.join("\n")) {
        panic!("{err:#}");
    }
}

/// Generation inputs for the checked-in `declarations` suite; shared by the
/// up-to-date guard so the guard and the generator can never disagree.
pub fn declarations_gen_request() -> GenRequest {
    GenRequest {
        directory: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/declarations"),
        pattern: r"^(.+)\.txt$".to_string(),
        exclude: vec!["notYetSupported.txt".to_string()],
        runner: "run_declaration_fixture".to_string(),
        prelude: vec!["use crate::support::run_declaration_fixture;".to_string()],
        fixture_root: "fixtures/declarations".to_string(),
    }
}
