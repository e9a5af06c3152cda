use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_REMINDER_AT: &str = "19:00";
pub const DATA_DIR_NAME: &str = "mood-mirror";
pub const HIDDEN_DATA_DIR_NAME: &str = ".mood-mirror";
pub const ENV_DATA_DIR: &str = "MOOD_MIRROR_DATA_DIR";
pub const ENV_REMINDER_AT: &str = "MOOD_MIRROR_REMINDER_AT";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataDir(PathBuf);

impl DataDir {
    pub fn new<P: Into<PathBuf>>(value: P) -> Result<Self, ConfigError> {
        let p = value.into();
        if p.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDataDir);
        }
        Ok(Self(p))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

/// Local wall-clock time of the daily reminder.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReminderTime(pub NaiveTime);

impl ReminderTime {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        NaiveTime::parse_from_str(value.trim(), "%H:%M")
            .map(Self)
            .map_err(|_| ConfigError::InvalidReminderTime(value.to_owned()))
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }
}

impl Default for ReminderTime {
    fn default() -> Self {
        Self(NaiveTime::from_hms_opt(19, 0, 0).unwrap_or(NaiveTime::MIN))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: DataDir,
    pub reminder_at: ReminderTime,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("data directory must not be empty")]
    EmptyDataDir,
    #[error("reminder time must look like HH:MM (got {0:?})")]
    InvalidReminderTime(String),
}

pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

#[derive(Clone, Debug, Default)]
pub struct StdEnv;

impl Env for StdEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MapEnv {
    vars: std::collections::BTreeMap<String, String>,
}

impl MapEnv {
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl Env for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// The platform's local data directory joined with `mood-mirror`, then
/// `~/.mood-mirror`, then `.mood-mirror` in the working directory.
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(DATA_DIR_NAME))
        .or_else(|| dirs::home_dir().map(|h| h.join(HIDDEN_DATA_DIR_NAME)))
        .unwrap_or_else(|| PathBuf::from(HIDDEN_DATA_DIR_NAME))
}

pub fn resolve_data_dir(cli_value: Option<PathBuf>, env: &impl Env) -> Result<DataDir, ConfigError> {
    match cli_value {
        Some(p) => DataDir::new(p),
        None => match env.var(ENV_DATA_DIR) {
            Some(v) => DataDir::new(v),
            None => DataDir::new(default_data_dir()),
        },
    }
}

pub fn resolve_string_with_default(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
    default: &str,
) -> String {
    match cli_value {
        Some(v) => v,
        None => env.var(env_key).unwrap_or_else(|| default.to_owned()),
    }
}

pub fn resolve_reminder_time(
    cli_value: Option<String>,
    env: &impl Env,
) -> Result<ReminderTime, ConfigError> {
    let raw = resolve_string_with_default(cli_value, ENV_REMINDER_AT, env, DEFAULT_REMINDER_AT);
    ReminderTime::parse(&raw)
}
