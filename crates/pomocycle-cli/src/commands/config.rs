use clap::Subcommand;
use pomocycle_core::ConfigFile;

use super::{load_config_file, ConfigArgs};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the resolved configuration as JSON
    Show {
        #[command(flatten)]
        overrides: ConfigArgs,
    },
    /// Print the config file location
    Path,
    /// Write a config file with every default spelled out
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show { overrides } => {
            let config = overrides.resolve(&load_config_file());
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Path => {
            println!("{}", ConfigFile::path().display());
        }
        ConfigAction::Init { force } => {
            let path = ConfigFile::path();
            if path.exists() && !force {
                return Err(format!("{} already exists (use --force)", path.display()).into());
            }
            ConfigFile::template().save_to(&path)?;
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}
