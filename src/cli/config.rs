use std::path::Path;

use clinic::Config;
use tracing::instrument;

use crate::cli::terminal::Colorize;

#[derive(Debug, clap::Parser)]
pub enum ConfigCommand {
    /// Show the current settings
    Show,

    /// Change a setting
    Set {
        /// The setting to change (`data_file` or `sort_lists`)
        key: String,

        /// The new value
        value: String,
    },
}

impl ConfigCommand {
    #[instrument]
    pub fn run(self, config_path: &Path) -> anyhow::Result<()> {
        let mut config = if config_path.exists() {
            Config::load(config_path).map_err(|e| anyhow::anyhow!("{e}"))?
        } else {
            Config::default()
        };

        match self {
            Self::Show => {
                println!("Configuration ({}):", config_path.display().dim());
                println!("  data_file:  {}", config.data_file().display());
                println!("  sort_lists: {}", config.sort_lists);
            }
            Self::Set { key, value } => {
                apply(&mut config, &key, &value)?;
                config
                    .save(config_path)
                    .map_err(|e| anyhow::anyhow!("{e}"))?;
                println!("{}", format!("Set {key} to {value}").success());
            }
        }
        Ok(())
    }
}

fn apply(config: &mut Config, key: &str, value: &str) -> anyhow::Result<()> {
    match key {
        "data_file" => {
            if value.trim().is_empty() {
                anyhow::bail!("data_file must not be empty");
            }
            config.set_data_file(value.into());
        }
        "sort_lists" => {
            config.sort_lists = value
                .parse::<bool>()
                .map_err(|_| anyhow::anyhow!("Value must be 'true' or 'false'"))?;
        }
        _ => anyhow::bail!("Unknown configuration key '{key}'. Expected 'data_file' or 'sort_lists'"),
    }
    Ok(())
}
