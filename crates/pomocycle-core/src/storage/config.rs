//! Startup configuration.
//!
//! A [`Configuration`] is assembled once per run from layered sources:
//! built-in defaults, the optional TOML file at
//! `~/.config/pomocycle/config.toml`, then query-style `key=value`
//! parameters. Every layer goes through [`Configuration::apply`], so a bad
//! value in any layer is dropped and whatever was there before survives.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::config_dir;
use crate::error::{ConfigError, CoreError};

/// Which cue to play when a session runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundKind {
    #[default]
    Bell,
    Chime,
    None,
}

impl SoundKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundKind::Bell => "bell",
            SoundKind::Chime => "chime",
            SoundKind::None => "none",
        }
    }
}

impl fmt::Display for SoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoundKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "bell" => Ok(SoundKind::Bell),
            "chime" => Ok(SoundKind::Chime),
            "none" => Ok(SoundKind::None),
            _ => Err(ConfigError::Unparseable {
                key: "sound".into(),
                value: s.into(),
            }),
        }
    }
}

/// Session durations (minutes) and options for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default = "default_work")]
    pub work: u32,
    #[serde(default = "default_short")]
    pub short: u32,
    #[serde(default = "default_long")]
    pub long: u32,
    #[serde(default, rename = "auto")]
    pub auto_advance: bool,
    #[serde(default)]
    pub sound: SoundKind,
}

// Default functions
fn default_work() -> u32 {
    25
}
fn default_short() -> u32 {
    5
}
fn default_long() -> u32 {
    15
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            work: default_work(),
            short: default_short(),
            long: default_long(),
            auto_advance: false,
            sound: SoundKind::default(),
        }
    }
}

impl Configuration {
    /// Check that every duration is positive.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonPositiveDuration`] naming the first zero field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [("work", self.work), ("short", self.short), ("long", self.long)] {
            if value == 0 {
                return Err(ConfigError::NonPositiveDuration {
                    key: key.into(),
                    value: 0,
                });
            }
        }
        Ok(())
    }

    /// Apply a single `key=value` parameter.
    ///
    /// On error the field keeps its current value. Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error for unparseable or non-positive durations and
    /// unknown sound kinds.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "work" => self.work = parse_minutes(key, value)?,
            "short" => self.short = parse_minutes(key, value)?,
            "long" => self.long = parse_minutes(key, value)?,
            "auto" => self.auto_advance = parse_flag(value),
            "sound" => self.sound = value.parse()?,
            _ => tracing::debug!(key, "ignoring unknown config key"),
        }
        Ok(())
    }

    /// Apply parameters in order, dropping rejected values silently.
    pub fn apply_params<I, K, V>(&mut self, params: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in params {
            let (key, value) = (key.as_ref(), value.as_ref());
            if let Err(e) = self.apply(key, value) {
                tracing::debug!(key, value, error = %e, "config value rejected, keeping previous");
            }
        }
    }

    /// Build from `key=value` pairs on top of the defaults.
    pub fn from_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut cfg = Self::default();
        cfg.apply_params(params);
        cfg
    }

    /// Build from an urlencoded query string such as `work=50&auto=1`.
    ///
    /// A leading `?` is accepted.
    pub fn from_query(query: &str) -> Self {
        let mut cfg = Self::default();
        cfg.apply_query(query);
        cfg
    }

    /// Layer an urlencoded query string over the current values.
    pub fn apply_query(&mut self, query: &str) {
        let query = query.strip_prefix('?').unwrap_or(query);
        self.apply_params(url::form_urlencoded::parse(query.as_bytes()));
    }

    pub fn work_secs(&self) -> u64 {
        u64::from(self.work).saturating_mul(60)
    }

    pub fn short_secs(&self) -> u64 {
        u64::from(self.short).saturating_mul(60)
    }

    pub fn long_secs(&self) -> u64 {
        u64::from(self.long).saturating_mul(60)
    }
}

fn parse_minutes(key: &str, value: &str) -> Result<u32, ConfigError> {
    let unparseable = || ConfigError::Unparseable {
        key: key.into(),
        value: value.into(),
    };
    let n: i64 = value.trim().parse().map_err(|_| unparseable())?;
    if n <= 0 {
        return Err(ConfigError::NonPositiveDuration {
            key: key.into(),
            value: n,
        });
    }
    u32::try_from(n).map_err(|_| unparseable())
}

/// Exact match after trimming, the same rule sound names follow.
fn parse_flag(value: &str) -> bool {
    matches!(value.trim(), "true" | "1")
}

/// Shell commands run in place of the terminal bell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HooksConfig {
    #[serde(default)]
    pub bell: Option<String>,
    #[serde(default)]
    pub chime: Option<String>,
}

impl HooksConfig {
    pub fn command_for(&self, sound: SoundKind) -> Option<&str> {
        match sound {
            SoundKind::Bell => self.bell.as_deref(),
            SoundKind::Chime => self.chime.as_deref(),
            SoundKind::None => None,
        }
    }
}

/// On-disk configuration file.
///
/// The `[timer]` table is kept loosely typed so that a bad entry falls back
/// the same way a bad query parameter does instead of failing the whole file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub timer: toml::Table,
    #[serde(default)]
    pub hooks: HooksConfig,
}

impl ConfigFile {
    pub fn path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Load from the default path, or an empty file if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, CoreError> {
        Self::load_from(&Self::path())
    }

    /// Load from `path`, or an empty file if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&content).map_err(|e| {
            ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Write to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// A file spelling out every default, for `config init`.
    pub fn template() -> Self {
        let cfg = Configuration::default();
        let mut timer = toml::Table::new();
        timer.insert("work".into(), toml::Value::Integer(cfg.work.into()));
        timer.insert("short".into(), toml::Value::Integer(cfg.short.into()));
        timer.insert("long".into(), toml::Value::Integer(cfg.long.into()));
        timer.insert("auto".into(), toml::Value::Boolean(cfg.auto_advance));
        timer.insert("sound".into(), toml::Value::String(cfg.sound.to_string()));
        Self {
            timer,
            hooks: HooksConfig::default(),
        }
    }

    /// The `[timer]` table flattened to query-style pairs.
    pub fn params(&self) -> Vec<(String, String)> {
        self.timer
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    toml::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), value)
            })
            .collect()
    }

    /// Defaults with this file's `[timer]` table layered on top.
    pub fn configuration(&self) -> Configuration {
        Configuration::from_params(self.params())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_pomodoro() {
        let cfg = Configuration::default();
        assert_eq!(cfg.work, 25);
        assert_eq!(cfg.short, 5);
        assert_eq!(cfg.long, 15);
        assert!(!cfg.auto_advance);
        assert_eq!(cfg.sound, SoundKind::Bell);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn negative_work_falls_back_to_default() {
        let cfg = Configuration::from_query("work=-5");
        assert_eq!(cfg.work, 25);
    }

    #[test]
    fn unparseable_values_fall_back() {
        let cfg = Configuration::from_query("?work=abc&short=0&long=&sound=gong");
        assert_eq!(cfg, Configuration::default());
    }

    #[test]
    fn query_overrides_every_field() {
        let cfg = Configuration::from_query("work=50&short=10&long=30&auto=1&sound=chime");
        assert_eq!(cfg.work, 50);
        assert_eq!(cfg.short, 10);
        assert_eq!(cfg.long, 30);
        assert!(cfg.auto_advance);
        assert_eq!(cfg.sound, SoundKind::Chime);
    }

    #[test]
    fn auto_accepts_only_true_or_one() {
        assert!(Configuration::from_query("auto=true").auto_advance);
        assert!(Configuration::from_query("auto=1").auto_advance);
        assert!(!Configuration::from_query("auto=yes").auto_advance);
        assert!(!Configuration::from_query("auto=0").auto_advance);
        assert!(!Configuration::from_query("auto=TRUE").auto_advance);
    }

    #[test]
    fn sound_names_are_case_sensitive() {
        assert_eq!(" chime ".parse::<SoundKind>().unwrap(), SoundKind::Chime);
        assert!("BELL".parse::<SoundKind>().is_err());
        let cfg = Configuration::from_query("sound=chime&sound=NONE");
        assert_eq!(cfg.sound, SoundKind::Chime);
    }

    #[test]
    fn rejected_value_keeps_previous_layer() {
        let mut cfg = Configuration::from_query("work=40");
        cfg.apply_query("work=-1");
        assert_eq!(cfg.work, 40);
    }

    #[test]
    fn apply_reports_the_rejection() {
        let mut cfg = Configuration::default();
        let err = cfg.apply("long", "-3").unwrap_err();
        assert_eq!(
            err,
            ConfigError::NonPositiveDuration {
                key: "long".into(),
                value: -3
            }
        );
    }

    #[test]
    fn validate_rejects_zero_duration() {
        let cfg = Configuration {
            short: 0,
            ..Configuration::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonPositiveDuration { ref key, .. }) if key == "short"
        ));
    }

    #[test]
    fn file_timer_table_uses_query_rules() {
        let file: ConfigFile = toml::from_str(
            r#"
            [timer]
            work = 45
            short = -2
            auto = true
            sound = "none"

            [hooks]
            bell = "paplay bell.oga"
            "#,
        )
        .unwrap();
        let cfg = file.configuration();
        assert_eq!(cfg.work, 45);
        assert_eq!(cfg.short, 5);
        assert!(cfg.auto_advance);
        assert_eq!(cfg.sound, SoundKind::None);
        assert_eq!(file.hooks.command_for(SoundKind::Bell), Some("paplay bell.oga"));
        assert_eq!(file.hooks.command_for(SoundKind::Chime), None);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = ConfigFile::load_from(&dir.path().join("config.toml")).unwrap();
        assert!(file.timer.is_empty());
        assert_eq!(file.configuration(), Configuration::default());
    }

    #[test]
    fn save_then_load_keeps_hooks_and_timer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut file = ConfigFile::template();
        file.hooks.chime = Some("paplay chime.oga".into());
        file.save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded.hooks, file.hooks);
        assert_eq!(loaded.configuration(), Configuration::default());
    }

    #[test]
    fn unparseable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timer\nwork = ").unwrap();
        let err = ConfigFile::load_from(&path).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidConfiguration(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn template_describes_defaults() {
        let file = ConfigFile::template();
        assert_eq!(file.configuration(), Configuration::default());
    }
}
