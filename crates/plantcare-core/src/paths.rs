use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const PLANTCARE_DIR: &str = ".plantcare";
pub const CONFIG_FILE: &str = ".plantcare/config.yaml";
pub const DEFAULT_DB_FILE: &str = ".plantcare/plants.redb";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn plantcare_dir(root: &Path) -> PathBuf {
    root.join(PLANTCARE_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Resolve a configured database path; relative paths are taken from `root`.
pub fn db_path(root: &Path, configured: &Path) -> PathBuf {
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        root.join(configured)
    }
}
