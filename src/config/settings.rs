use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// File holding credentials, looked up next to the executable and in the
/// working directory
pub const SECRETS_FILE: &str = "trello_secrets.env";

pub const DEFAULT_API_BASE: &str = "https://api.trello.com/1";
pub const DEFAULT_FONT_SIZE: f32 = 28.0;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_TICK_RATE: u32 = 60;
pub const MAX_TICK_RATE: u32 = 240;

/// Fonts tried in order when `FONT_PATH` is not set
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required setting {key}")]
    Missing { key: &'static str },

    #[error("Invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Failed to read {path}: {source}")]
    EnvFile {
        path: PathBuf,
        source: dotenvy::Error,
    },

    #[error("No usable font found; set FONT_PATH to a TrueType file")]
    NoFont,
}

/// Credentials and list selection for the Trello API
#[derive(Clone, PartialEq, Eq)]
pub struct TrelloCredentials {
    pub api_key: String,
    pub api_token: String,
    pub list_id: String,
}

impl fmt::Debug for TrelloCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrelloCredentials")
            .field("api_key", &"<redacted>")
            .field("api_token", &"<redacted>")
            .field("list_id", &self.list_id)
            .finish()
    }
}

/// Runtime settings gathered at startup
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub credentials: TrelloCredentials,
    pub api_base: String,
    pub font_path: PathBuf,
    pub font_size: f32,
    pub log_level: String,
    pub tick_rate: u32,
}

impl Config {
    /// Loads settings from the process environment and the secrets file
    ///
    /// Real environment variables take precedence over the file.
    pub fn load() -> Result<Self, ConfigError> {
        let file_values = match find_secrets_file() {
            Some(path) => read_env_file(&path)?,
            None => HashMap::new(),
        };

        Self::from_lookup(|key| std::env::var(key).ok().or_else(|| file_values.get(key).cloned()))
    }

    /// Loads settings from a specific env file only
    pub fn from_env_file(path: &Path) -> Result<Self, ConfigError> {
        let values = read_env_file(path)?;
        Self::from_lookup(|key| values.get(key).cloned())
    }

    /// Builds settings from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing { key })
        };

        let credentials = TrelloCredentials {
            api_key: required("API_KEY")?,
            api_token: required("API_TOKEN")?,
            list_id: required("LIST_ID")?,
        };

        let api_base = lookup("TRELLO_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let font_path = match lookup("FONT_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_font().ok_or(ConfigError::NoFont)?,
        };

        let font_size = match lookup("FONT_SIZE") {
            Some(value) => parse_font_size(&value)?,
            None => DEFAULT_FONT_SIZE,
        };

        let tick_rate = match lookup("TICK_RATE") {
            Some(value) => parse_tick_rate(&value)?,
            None => DEFAULT_TICK_RATE,
        };

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            credentials,
            api_base,
            font_path,
            font_size,
            log_level,
            tick_rate,
        })
    }
}

fn parse_font_size(value: &str) -> Result<f32, ConfigError> {
    let invalid = |reason: &str| ConfigError::Invalid {
        key: "FONT_SIZE",
        value: value.to_string(),
        reason: reason.to_string(),
    };
    let size: f32 = value.trim().parse().map_err(|_| invalid("not a number"))?;
    if !size.is_finite() || size < 6.0 {
        return Err(invalid("must be at least 6 pixels"));
    }
    Ok(size)
}

fn parse_tick_rate(value: &str) -> Result<u32, ConfigError> {
    let rate: u32 = value.trim().parse().map_err(|_| ConfigError::Invalid {
        key: "TICK_RATE",
        value: value.to_string(),
        reason: "not a whole number".to_string(),
    })?;
    Ok(rate.clamp(1, MAX_TICK_RATE))
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let to_error = |source: dotenvy::Error| ConfigError::EnvFile {
        path: path.to_path_buf(),
        source,
    };
    let mut values = HashMap::new();
    for item in dotenvy::from_path_iter(path).map_err(to_error)? {
        let (key, value) = item.map_err(to_error)?;
        values.insert(key, value);
    }
    Ok(values)
}

fn find_secrets_file() -> Option<PathBuf> {
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(SECRETS_FILE)));

    beside_exe
        .into_iter()
        .chain(std::iter::once(PathBuf::from(SECRETS_FILE)))
        .find(|path| path.is_file())
}

/// First installed font from a list of common system locations
pub fn default_font() -> Option<PathBuf> {
    FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_file())
}
