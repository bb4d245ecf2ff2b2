pub mod config;
pub mod run;

use clap::Args;
use pomocycle_core::{ConfigFile, Configuration};

/// Startup overrides shared by `run` and `config show`.
///
/// Values are taken as raw strings so a bad one falls back the same way a
/// bad query parameter does instead of aborting argument parsing.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// Work session length in minutes
    #[arg(long, allow_hyphen_values = true)]
    pub work: Option<String>,
    /// Short break length in minutes
    #[arg(long, allow_hyphen_values = true)]
    pub short: Option<String>,
    /// Long break length in minutes
    #[arg(long, allow_hyphen_values = true)]
    pub long: Option<String>,
    /// Start the next session automatically
    #[arg(long)]
    pub auto: bool,
    /// Cue at the end of a session: bell, chime or none
    #[arg(long)]
    pub sound: Option<String>,
    /// Query-style parameters, e.g. "work=50&short=10&auto=1"
    #[arg(long)]
    pub query: Option<String>,
}

impl ConfigArgs {
    /// Defaults, then the config file, then `--query`, then single flags.
    pub fn resolve(&self, file: &ConfigFile) -> Configuration {
        let mut cfg = file.configuration();
        if let Some(query) = &self.query {
            cfg.apply_query(query);
        }

        let mut params: Vec<(&str, &str)> = Vec::new();
        for (key, value) in [
            ("work", &self.work),
            ("short", &self.short),
            ("long", &self.long),
            ("sound", &self.sound),
        ] {
            if let Some(value) = value {
                params.push((key, value.as_str()));
            }
        }
        if self.auto {
            params.push(("auto", "true"));
        }
        cfg.apply_params(params);
        cfg
    }
}

/// Config file at the default location; a broken file is reported and
/// ignored.
pub fn load_config_file() -> ConfigFile {
    ConfigFile::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring config file");
        ConfigFile::default()
    })
}
