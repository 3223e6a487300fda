use anyhow::Context;
use plantcare_core::config::Config;
use plantcare_core::store::Store;
use plantcare_core::paths;
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Initializing plantcare in: {}", root.display());

    let dir = paths::plantcare_dir(root);
    std::fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    if paths::config_path(root).exists() {
        println!("  exists:  {}", paths::CONFIG_FILE);
    } else {
        Config::default()
            .save(root)
            .context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
    }

    let config = Config::load_effective(root).context("failed to load config")?;
    let db_path = config.db_path_in(root);
    let existed = db_path.exists();
    Store::open(&db_path).with_context(|| format!("failed to open store at {}", db_path.display()))?;
    let label = db_path.strip_prefix(root).unwrap_or(&db_path).display();
    if existed {
        println!("  exists:  {label}");
    } else {
        println!("  created: {label}");
    }

    for warning in config.validate() {
        println!("  [{}] {}", warning.level, warning.message);
    }
    Ok(())
}
