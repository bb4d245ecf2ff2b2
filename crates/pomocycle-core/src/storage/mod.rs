mod config;

pub use config::{Configuration, ConfigFile, HooksConfig, SoundKind};

use std::path::PathBuf;

/// Returns `~/.config/pomocycle[-dev]/` based on POMOCYCLE_ENV.
///
/// Set POMOCYCLE_ENV=dev to use the development config directory.
/// The directory is not created here; writers create it on demand.
pub fn config_dir() -> PathBuf {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POMOCYCLE_ENV").unwrap_or_else(|_| "production".to_string());

    if env == "dev" {
        base_dir.join("pomocycle-dev")
    } else {
        base_dir.join("pomocycle")
    }
}
