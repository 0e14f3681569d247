//! Board configuration.
//!
//! Settings come from `~/.config/birthday-board/config.toml`, overridden by
//! `BIRTHDAY_BOARD_*` environment variables. Command-line flags are applied
//! on top by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{BoardError, BoardResult};

pub const ENV_PREFIX: &str = "BIRTHDAY_BOARD";

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(30);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

fn default_refresh_interval() -> Duration {
    DEFAULT_REFRESH_INTERVAL
}

fn default_retry_delay() -> Duration {
    DEFAULT_RETRY_DELAY
}

fn default_request_timeout() -> Duration {
    DEFAULT_REQUEST_TIMEOUT
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Published CSV export of the birthday sheet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_url: Option<String>,

    #[serde(default = "default_refresh_interval", with = "humantime_str")]
    pub refresh_interval: Duration,

    /// Delay before the single retry after a failed refresh.
    #[serde(default = "default_retry_delay", with = "humantime_str")]
    pub retry_delay: Duration,

    #[serde(default = "default_request_timeout", with = "humantime_str")]
    pub request_timeout: Duration,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            sheet_url: None,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            retry_delay: DEFAULT_RETRY_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl BoardConfig {
    pub fn config_path() -> BoardResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| BoardError::Config("Could not determine config directory".into()))?
            .join("birthday-board");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented template first if
    /// there is no config file yet.
    pub fn load() -> BoardResult<Self> {
        Self::load_with_url(None)
    }

    /// Like [`load`](Self::load), with `sheet_url` (from `--url`) replacing
    /// whatever the file or environment set before validation.
    pub fn load_with_url(sheet_url: Option<String>) -> BoardResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::resolve(&config_path, Environment::with_prefix(ENV_PREFIX), sheet_url)
    }

    /// Load from `path` (which may be missing) plus the process environment.
    pub fn load_from(path: &Path) -> BoardResult<Self> {
        Self::resolve(path, Environment::with_prefix(ENV_PREFIX), None)
    }

    fn resolve(path: &Path, env: Environment, sheet_url: Option<String>) -> BoardResult<Self> {
        let mut config: BoardConfig = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(env)
            .build()?
            .try_deserialize()?;

        if sheet_url.is_some() {
            config.sheet_url = sheet_url;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> BoardResult<()> {
        for (key, value) in [
            ("refresh_interval", self.refresh_interval),
            ("retry_delay", self.retry_delay),
            ("request_timeout", self.request_timeout),
        ] {
            if value.is_zero() {
                return Err(BoardError::Config(format!("{key} must be greater than zero")));
            }
        }

        if self.sheet_url.is_some() {
            self.sheet_url()?;
        }

        Ok(())
    }

    /// The configured sheet URL, checked to be an http(s) address.
    pub fn sheet_url(&self) -> BoardResult<Url> {
        let raw = self.sheet_url.as_deref().ok_or_else(|| {
            BoardError::Config(
                "No sheet_url configured. Set it in the config file or pass --url".into(),
            )
        })?;

        let url = Url::parse(raw)
            .map_err(|e| BoardError::Config(format!("Invalid sheet_url '{raw}': {e}")))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(BoardError::Config(format!(
                "Unsupported sheet_url scheme '{other}', expected http or https"
            ))),
        }
    }

    /// Effective settings as TOML.
    pub fn to_toml(&self) -> BoardResult<String> {
        toml::to_string_pretty(self).map_err(|e| BoardError::Config(e.to_string()))
    }

    /// Create a config file with every option commented out.
    pub fn create_default_config(path: &Path) -> BoardResult<()> {
        let contents = format!(
            "\
# birthday-board configuration

# Published CSV export of the sheet (File > Share > Publish to web > CSV):
# sheet_url = \"https://docs.google.com/spreadsheets/d/e/<id>/pub?output=csv\"

# How often to reload the sheet:
# refresh_interval = \"{}\"

# Wait before retrying after a failed load:
# retry_delay = \"{}\"

# Give up on a single request after:
# request_timeout = \"{}\"
",
            humantime::format_duration(DEFAULT_REFRESH_INTERVAL),
            humantime::format_duration(DEFAULT_RETRY_DELAY),
            humantime::format_duration(DEFAULT_REQUEST_TIMEOUT),
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                BoardError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| BoardError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

/// Durations written the human way (`30s`, `5m`). Bare numbers are seconds.
pub mod humantime_str {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn parse(raw: &str) -> Result<Duration, String> {
        let raw = raw.trim();
        if let Ok(secs) = raw.parse::<u64>() {
            return Ok(Duration::from_secs(secs));
        }
        humantime::parse_duration(raw).map_err(|e| format!("invalid duration '{raw}': {e}"))
    }

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }
}
