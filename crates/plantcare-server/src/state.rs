use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use plantcare_core::config::Config;
use plantcare_core::notify::{notifier_from_config, Notifier};
use plantcare_core::store::Store;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub notifier: Arc<dyn Notifier>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Open the store under `root` and pick a notifier from `config`.
    pub fn open(root: &Path, config: Config) -> anyhow::Result<Self> {
        let db_path = config.db_path_in(root);
        let store = Store::open(&db_path)
            .with_context(|| format!("opening store at {}", db_path.display()))?;
        let notifier = notifier_from_config(&config);
        Ok(Self::new(Arc::new(store), notifier, config))
    }

    pub fn new(store: Arc<Store>, notifier: Arc<dyn Notifier>, config: Config) -> Self {
        Self {
            store,
            notifier,
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_store_under_root() {
        let dir = tempfile::TempDir::new().unwrap();
        let state = AppState::open(dir.path(), Config::default()).unwrap();
        assert!(dir.path().join(".plantcare/plants.redb").exists());
        assert_eq!(state.config.request_timeout_secs, 30);
    }
}
