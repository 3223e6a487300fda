use anyhow::Context;
use plantcare_core::config::Config;
use std::path::Path;

pub fn run(root: &Path, port: u16) -> anyhow::Result<()> {
    let config = Config::load_effective(root).context("failed to load config")?;
    for w in config.validate() {
        tracing::warn!(level = %w.level, "{}", w.message);
    }
    let rt = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    rt.block_on(plantcare_server::serve(root, config, port))
}
