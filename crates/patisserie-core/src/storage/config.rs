//! TOML-based application configuration.
//!
//! Stores:
//! - Countdown timing (tick interval, alarm window, alarm repeat)
//! - Whether an automatic restart counts as a new round
//! - Alarm audio settings
//!
//! Configuration is stored at `~/.config/patisserie/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::sound::AudioSettings;

/// Countdown and alarm timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Period of the countdown tick. Each tick takes one second off.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// How long the alarm window stays open before the countdown restarts.
    #[serde(default = "default_alarm_window_ms")]
    pub alarm_window_ms: u64,
    #[serde(default = "default_alarm_repeat_ms")]
    pub alarm_repeat_ms: u64,
    /// Auto-restart bumps the round and adds a history entry.
    #[serde(default = "default_true")]
    pub restart_counts_as_round: bool,
}

/// Alarm audio configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_volume_ratio")]
    pub volume_ratio: f64,
    /// Ring the terminal bell when the alarm plays.
    #[serde(default = "default_true")]
    pub bell: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/patisserie/config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub audio: AudioConfig,
}

// Default functions
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_alarm_window_ms() -> u64 {
    7000
}
fn default_alarm_repeat_ms() -> u64 {
    2000
}
fn default_volume_ratio() -> f64 {
    0.7
}
fn default_true() -> bool {
    true
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            alarm_window_ms: default_alarm_window_ms(),
            alarm_repeat_ms: default_alarm_repeat_ms(),
            restart_counts_as_round: true,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume_ratio: default_volume_ratio(),
            bell: true,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current
                    .get_mut(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                continue;
            }

            let obj = current
                .as_object_mut()
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
            let existing = obj
                .get(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<u64>() {
                        serde_json::Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    } else {
                        return Err(invalid(format!("cannot parse '{value}' as number")));
                    }
                }
                serde_json::Value::Object(_) => {
                    return Err(invalid("cannot replace a whole section".into()));
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    /// Path of the config file inside the data directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// fails validation, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there if it is missing.
    ///
    /// A file that exists but cannot be read is an error and is left alone.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Check that intervals are non-zero and the volume ratio is a fraction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("timer.tick_interval_ms", self.timer.tick_interval_ms),
            ("timer.alarm_window_ms", self.timer.alarm_window_ms),
            ("timer.alarm_repeat_ms", self.timer.alarm_repeat_ms),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.into(),
                    message: "must be greater than zero".into(),
                });
            }
        }
        if !(0.0..=1.0).contains(&self.audio.volume_ratio) {
            return Err(ConfigError::InvalidValue {
                key: "audio.volume_ratio".into(),
                message: format!("{} is not between 0.0 and 1.0", self.audio.volume_ratio),
            });
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value in memory by dot-separated key, validating the result.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    pub fn audio_settings(&self) -> AudioSettings {
        AudioSettings {
            volume_ratio: self.audio.volume_ratio,
            ..AudioSettings::default()
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(error = %e, "falling back to default configuration");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.timer.alarm_window_ms, 7000);
    }

    #[test]
    fn missing_sections_take_defaults() {
        let parsed: Config = toml::from_str("[timer]\nalarm_window_ms = 9000\n").unwrap();
        assert_eq!(parsed.timer.alarm_window_ms, 9000);
        assert_eq!(parsed.timer.tick_interval_ms, 1000);
        assert_eq!(parsed.audio.volume_ratio, 0.7);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.alarm_repeat_ms").as_deref(), Some("2000"));
        assert_eq!(cfg.get("timer.restart_counts_as_round").as_deref(), Some("true"));
        assert_eq!(cfg.get("audio.volume_ratio").as_deref(), Some("0.7"));
        assert!(cfg.get("timer.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn apply_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.apply("timer.restart_counts_as_round", "false").unwrap();
        cfg.apply("timer.alarm_window_ms", "9000").unwrap();
        cfg.apply("audio.volume_ratio", "0.5").unwrap();
        assert!(!cfg.timer.restart_counts_as_round);
        assert_eq!(cfg.timer.alarm_window_ms, 9000);
        assert_eq!(cfg.audio.volume_ratio, 0.5);
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        let result = cfg.apply("timer.nonexistent", "1");
        assert!(matches!(result, Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn apply_rejects_invalid_type() {
        let mut cfg = Config::default();
        let result = cfg.apply("timer.restart_counts_as_round", "maybe");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        assert!(cfg.timer.restart_counts_as_round);
    }

    #[test]
    fn apply_rejects_values_failing_validation() {
        let mut cfg = Config::default();
        assert!(cfg.apply("timer.tick_interval_ms", "0").is_err());
        assert!(cfg.apply("audio.volume_ratio", "1.5").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.apply("timer.alarm_repeat_ms", "1500").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.timer.alarm_repeat_ms, 1500);
    }

    #[test]
    fn load_from_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timer]\ntick_interval_ms = 0\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue { .. })
        ));

        std::fs::write(&path, "not = [valid").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn load_from_keeps_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let original: &[u8] = b"[timer]\nalarm_window_ms = 9000\n# caf\xE9\n";
        std::fs::write(&path, original).unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
        assert_eq!(std::fs::read(&path).unwrap(), original);
    }

    #[test]
    fn audio_settings_carry_volume_ratio() {
        let mut cfg = Config::default();
        cfg.audio.volume_ratio = 0.25;
        assert_eq!(cfg.audio_settings().volume_ratio, 0.25);
    }
}
