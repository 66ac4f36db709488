use std::path::Path;

/// Slash-separated path of `path` relative to `root`, independent of the
/// platform separator so identifiers and baked fixture lists are portable.
pub(crate) fn rel_path_string(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let mut out = String::new();
    for component in rel.components() {
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(&component.as_os_str().to_string_lossy());
    }
    out
}
