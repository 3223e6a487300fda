use std::path::{Path, PathBuf};

use plantcare_core::paths::PLANTCARE_DIR;

/// Resolve the workspace root.
///
/// Priority:
/// 1. `--root` flag / `PLANTCARE_ROOT` env var (passed in as `explicit`)
/// 2. The nearest ancestor of `cwd` (inclusive) holding `.plantcare/`
/// 3. `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_marked_ancestor(&cwd).unwrap_or(cwd)
}

fn find_marked_ancestor(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(PLANTCARE_DIR).is_dir())
        .map(Path::to_path_buf)
}
