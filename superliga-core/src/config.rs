//! User configuration at ~/.config/superliga-cal/config.toml

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::api::{ApiConfig, RetryPolicy};
use crate::error::{SuperligaError, SuperligaResult};

static DEFAULT_OUTPUT_DIR: &str = "superliga_calendars";
static DEFAULT_BASE_URL: &str = "https://en.volleyballworld.com/api/v1/";
static DEFAULT_UTC_OFFSET: &str = "-04:00";
static DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";

/// Which tournament id of a competition listing belongs to a league.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Division {
    Men,
    Women,
}

/// A league tracked across seasons, matched on the API's short name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub short_name: String,
    pub display_name: String,
    pub division: Division,
}

fn default_leagues() -> Vec<League> {
    vec![
        League {
            short_name: "SuperLiga Masculina".into(),
            display_name: "Superliga Masculina".into(),
            division: Division::Men,
        },
        League {
            short_name: "SuperLiga Feminina".into(),
            display_name: "Superliga Feminina".into(),
            division: Division::Women,
        },
    ]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_utc_offset() -> String {
    DEFAULT_UTC_OFFSET.to_string()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_request_delay_ms() -> u64 {
    500
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_max_attempts() -> u32 {
    4
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_multiplier() -> u32 {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Where calendars are written, `~` is expanded.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Offset segment of the match-days endpoint.
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,

    /// Written as X-WR-TIMEZONE.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(default = "default_multiplier")]
    pub backoff_multiplier: u32,

    #[serde(default = "default_leagues")]
    pub leagues: Vec<League>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            output_dir: default_output_dir(),
            base_url: default_base_url(),
            utc_offset: default_utc_offset(),
            timezone: default_timezone(),
            request_delay_ms: default_request_delay_ms(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            backoff_multiplier: default_multiplier(),
            leagues: default_leagues(),
        }
    }
}

impl Settings {
    pub fn config_path() -> SuperligaResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SuperligaError::Config("Could not determine config directory".into()))?
            .join("superliga-cal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load settings from the default location, creating a commented
    /// config file the first time.
    pub fn load() -> SuperligaResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> SuperligaResult<Self> {
        let settings: Settings = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .build()
            .map_err(|e| SuperligaError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| SuperligaError::Config(e.to_string()))?;

        if settings.max_attempts == 0 {
            return Err(SuperligaError::Config("max_attempts must be at least 1".into()));
        }

        Ok(settings)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> SuperligaResult<()> {
        let defaults = toml::to_string_pretty(&Settings::default())
            .map_err(|e| SuperligaError::Config(e.to_string()))?;

        let commented: String = defaults
            .lines()
            .map(|line| {
                if line.is_empty() {
                    "\n".to_string()
                } else {
                    format!("# {line}\n")
                }
            })
            .collect();

        let contents = format!("# superliga-cal configuration\n\n{commented}");

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SuperligaError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| SuperligaError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    pub fn output_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.output_dir.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.base_delay_ms),
            multiplier: self.backoff_multiplier,
        }
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.clone(),
            utc_offset: self.utc_offset.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            ..ApiConfig::default()
        }
    }
}
