//! TOML-based configuration.
//!
//! Holds the timing constants for the breathing controller and the chat
//! playback scheduler, plus the optional seed for cosmetic randomness.
//!
//! Configuration is read from `~/.config/sirru/config.toml`. It is never
//! written back; a missing file means defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Breathing session timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathingConfig {
    /// Length of every phase, in whole seconds.
    #[serde(default = "default_phase_duration_secs")]
    pub phase_duration_secs: u32,
    /// Cycles after which the session completes on its own.
    #[serde(default = "default_target_cycles")]
    pub target_cycles: u32,
}

/// Chat playback timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// How long before a scripted reveal the typing indicator appears.
    #[serde(default = "default_typing_lead_ms")]
    pub typing_lead_ms: u64,
    /// Delay between a user message and the responder starting to type.
    #[serde(default = "default_response_delay_ms")]
    pub response_delay_ms: u64,
    /// How long the responder types before its reply appears.
    #[serde(default = "default_response_typing_ms")]
    pub response_typing_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbienceConfig {
    /// Fixed seed for cosmetic randomness. `None` draws from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub breathing: BreathingConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub ambience: AmbienceConfig,
}

fn default_phase_duration_secs() -> u32 {
    4
}
fn default_target_cycles() -> u32 {
    3
}
fn default_typing_lead_ms() -> u64 {
    1500
}
fn default_response_delay_ms() -> u64 {
    1000
}
fn default_response_typing_ms() -> u64 {
    2000
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            phase_duration_secs: default_phase_duration_secs(),
            target_cycles: default_target_cycles(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            typing_lead_ms: default_typing_lead_ms(),
            response_delay_ms: default_response_delay_ms(),
            response_typing_ms: default_response_typing_ms(),
        }
    }
}

/// Returns `~/.config/sirru[-dev]/` based on SIRRU_ENV.
///
/// Set SIRRU_ENV=dev to use the development directory. The directory is
/// not created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .ok_or(ConfigError::NoHomeDir)?
        .join(".config");

    let env = std::env::var("SIRRU_ENV").unwrap_or_else(|_| "production".to_string());

    Ok(if env == "dev" {
        base_dir.join("sirru-dev")
    } else {
        base_dir.join("sirru")
    })
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
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parent) = parent_path {
            for part in parent.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }

        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            // `seed` is the only optional field and it holds a number.
            serde_json::Value::Number(_) | serde_json::Value::Null => {
                if value == "none" {
                    serde_json::Value::Null
                } else {
                    let n = value
                        .parse::<u64>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                    serde_json::Value::Number(n.into())
                }
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    /// Default config file location.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, or defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed,
    /// or if it holds invalid values.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the timing engines cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.breathing.phase_duration_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "breathing.phase_duration_secs".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.breathing.target_cycles == 0 {
            return Err(ConfigError::InvalidValue {
                key: "breathing.target_cycles".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.chat.response_typing_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "chat.response_typing_ms".into(),
                message: "must be greater than 0".into(),
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

    /// Set a config value in memory by dot-separated key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result fails validation. On error `self` is unchanged.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Load from `path` (or the default location) and apply overrides.
    pub fn resolve<'a, I>(path: Option<&Path>, overrides: I) -> crate::error::Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut cfg = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        cfg.apply_overrides(overrides)?;
        Ok(cfg)
    }

    /// Apply `key=value` overrides in order.
    pub fn apply_overrides<'a, I>(&mut self, overrides: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for pair in overrides {
            let (key, value) = pair.split_once('=').ok_or_else(|| ConfigError::InvalidValue {
                key: pair.to_string(),
                message: "expected key=value".into(),
            })?;
            self.set(key.trim(), value.trim())?;
        }
        Ok(())
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
        assert_eq!(parsed.breathing.phase_duration_secs, 4);
        assert_eq!(parsed.chat.typing_lead_ms, 1500);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg = Config::from_toml_str("[breathing]\ntarget_cycles = 5\n").unwrap();
        assert_eq!(cfg.breathing.target_cycles, 5);
        assert_eq!(cfg.breathing.phase_duration_secs, 4);
        assert_eq!(cfg.chat.response_delay_ms, 1000);
        assert_eq!(cfg.ambience.seed, None);
    }

    #[test]
    fn zero_phase_duration_is_rejected() {
        let err = Config::from_toml_str("[breathing]\nphase_duration_secs = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref key, .. } if key == "breathing.phase_duration_secs"
        ));
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("breathing.target_cycles").as_deref(), Some("3"));
        assert_eq!(cfg.get("ambience.seed").as_deref(), Some("null"));
        assert!(cfg.get("chat.missing_key").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set("chat.typing_lead_ms", "900").unwrap();
        assert_eq!(cfg.chat.typing_lead_ms, 900);
    }

    #[test]
    fn set_fills_optional_seed() {
        let mut cfg = Config::default();
        cfg.set("ambience.seed", "7").unwrap();
        assert_eq!(cfg.ambience.seed, Some(7));
        cfg.set("ambience.seed", "none").unwrap();
        assert_eq!(cfg.ambience.seed, None);
    }

    #[test]
    fn set_rejects_unknown_and_invalid_without_mutating() {
        let mut cfg = Config::default();
        assert!(matches!(cfg.set("breathing.nope", "1"), Err(ConfigError::UnknownKey(_))));
        assert!(cfg.set("breathing.target_cycles", "lots").is_err());
        assert!(cfg.set("breathing.target_cycles", "0").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn overrides_apply_in_order() {
        let mut cfg = Config::default();
        cfg.apply_overrides(["breathing.target_cycles=2", "breathing.target_cycles = 6"])
            .unwrap();
        assert_eq!(cfg.breathing.target_cycles, 6);
        assert!(cfg.apply_overrides(["no-equals-sign"]).is_err());
    }

    #[test]
    fn resolve_layers_overrides_on_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[breathing]\ntarget_cycles = 5\n").unwrap();
        let cfg =
            Config::resolve(Some(path.as_path()), ["breathing.phase_duration_secs=2"]).unwrap();
        assert_eq!(cfg.breathing.target_cycles, 5);
        assert_eq!(cfg.breathing.phase_duration_secs, 2);

        let err = Config::resolve(Some(path.as_path()), ["breathing.bogus=1"]).unwrap_err();
        assert!(matches!(err, crate::error::CoreError::Config(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn file_on_disk_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ambience]\nseed = 42\n").unwrap();
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.ambience.seed, Some(42));
    }
}
