//! Runtime configuration.
//!
//! Read from `<config dir>/tankcontrol/config.toml` (or the file named by
//! `TANK_CONFIG`), then overridden by `TANK_BROKER_HOST`,
//! `TANK_BROKER_PORT` and `TANK_ROBOT_NAME`. A missing or broken file
//! falls back to the defaults so the tools always start.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::mqtt::config::MqttConfig;

const CONFIG_DIR: &str = "tankcontrol";
const CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_ROBOT_NAME: &str = "Tank_1";

pub const ENV_CONFIG_PATH: &str = "TANK_CONFIG";
pub const ENV_BROKER_HOST: &str = "TANK_BROKER_HOST";
pub const ENV_BROKER_PORT: &str = "TANK_BROKER_PORT";
pub const ENV_ROBOT_NAME: &str = "TANK_ROBOT_NAME";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct TankConfig {
    /// Robot addressed by every topic, `Tanks/<robot_name>/...`.
    pub robot_name: String,
    pub mqtt: MqttConfig,
    pub ui: UIConfig,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            robot_name: DEFAULT_ROBOT_NAME.to_string(),
            mqtt: MqttConfig::default(),
            ui: UIConfig::default(),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct UIConfig {
    pub fullscreen: bool,
    /// Number of inbound messages kept in the panel's feedback log.
    pub feedback_log_len: usize,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            fullscreen: false,
            feedback_log_len: 50,
        }
    }
}

impl TankConfig {
    /// Loads the configuration file and applies environment overrides.
    pub fn load() -> Self {
        let mut config = match default_path() {
            Some(path) => match Self::read_file(&path) {
                Ok(Some(config)) => {
                    info!("Loaded configuration from {}", path.display());
                    config
                }
                Ok(None) => {
                    debug!("No configuration at {}, using defaults", path.display());
                    Self::default()
                }
                Err(e) => {
                    warn!("{}; using defaults", e);
                    Self::default()
                }
            },
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Reads `path`, returning `None` if it does not exist.
    pub fn read_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        match fs::read_to_string(path) {
            Ok(raw) => Ok(Some(Self::from_toml_str(&raw)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Applies `TANK_*` overrides looked up through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup(ENV_BROKER_HOST).filter(|v| !v.trim().is_empty()) {
            self.mqtt.host = host.trim().to_string();
        }
        if let Some(port) = lookup(ENV_BROKER_PORT) {
            match port.trim().parse() {
                Ok(port) => self.mqtt.port = port,
                Err(e) => warn!("Ignoring {}={}: {}", ENV_BROKER_PORT, port, e),
            }
        }
        if let Some(name) = lookup(ENV_ROBOT_NAME).filter(|v| !v.trim().is_empty()) {
            self.robot_name = name.trim().to_string();
        }
    }
}

fn default_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
        return Some(PathBuf::from(path));
    }
    let mut path = dirs::config_dir()?;
    path.push(CONFIG_DIR);
    path.push(CONFIG_FILE);
    Some(path)
}
