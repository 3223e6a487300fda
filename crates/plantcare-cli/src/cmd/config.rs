use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use plantcare_core::config::{Config, WarnLevel};
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration (file plus environment), token redacted
    Show,
    /// Check the configuration for problems
    Validate,
}

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    let config = Config::load_effective(root).context("failed to load config")?;
    match subcmd {
        ConfigSubcommand::Show => {
            let shown = config.redacted();
            if json {
                print_json(&shown)?;
            } else {
                print!("{}", serde_yaml::to_string(&shown)?);
            }
            Ok(())
        }
        ConfigSubcommand::Validate => {
            let warnings = config.validate();
            if json {
                print_json(&warnings)?;
            } else if warnings.is_empty() {
                println!("config ok");
            } else {
                for w in &warnings {
                    println!("[{}] {}", w.level, w.message);
                }
            }
            let errors = warnings
                .iter()
                .filter(|w| w.level == WarnLevel::Error)
                .count();
            if errors > 0 {
                anyhow::bail!("config has {errors} error(s)");
            }
            Ok(())
        }
    }
}
