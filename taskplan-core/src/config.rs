//! taskplan configuration.
//!
//! Read from ~/.config/taskplan/config.toml (optional) and overridden by
//! `TASKPLAN_*` environment variables, e.g. `TASKPLAN_CALENDAR_ID`.

use std::path::{Path, PathBuf};

use config::{Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CALENDAR_ID, DEFAULT_TIME_ZONE};
use crate::error::{Error, Result};
use crate::reconcile::TimestampParsing;

static DEFAULT_TOKEN_FILE: &str = "~/.config/taskplan/token.json";
static DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;

fn default_calendar_id() -> String {
    DEFAULT_CALENDAR_ID.to_string()
}

fn default_time_zone() -> String {
    DEFAULT_TIME_ZONE.to_string()
}

fn default_token_file() -> PathBuf {
    PathBuf::from(DEFAULT_TOKEN_FILE)
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Calendar holding the tasks.
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,

    /// IANA zone attached to timed tasks on creation.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,

    /// OAuth token file (authorized-user JSON).
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Append-only diagnostics log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    #[serde(default)]
    pub timestamp_parsing: TimestampParsing,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            calendar_id: default_calendar_id(),
            time_zone: default_time_zone(),
            token_file: default_token_file(),
            host: default_host(),
            port: default_port(),
            log_file: None,
            timestamp_parsing: TimestampParsing::default(),
        }
    }
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not determine config directory".into()))?
            .join("taskplan");

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path` (which may not exist) plus the environment.
    pub fn load_from(path: &Path) -> Result<Self> {
        config::Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("TASKPLAN").try_parsing(true))
            .build()
            .map_err(|e| Error::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| Error::Config(e.to_string()))
    }

    pub fn token_path(&self) -> PathBuf {
        expand(&self.token_file)
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.as_deref().map(expand)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> Result<()> {
        let contents = format!(
            "\
# taskplan configuration

# Calendar that holds your tasks:
# calendar_id = \"{DEFAULT_CALENDAR_ID}\"

# Time zone for new timed tasks:
# time_zone = \"{DEFAULT_TIME_ZONE}\"

# OAuth token file:
# token_file = \"{DEFAULT_TOKEN_FILE}\"

# HTTP server:
# host = \"{DEFAULT_HOST}\"
# port = {DEFAULT_PORT}

# Diagnostics log (appended to):
# log_file = \"~/.local/state/taskplan/taskplan.log\"

# \"permissive\" ignores malformed offsets, \"strict\" rejects them:
# timestamp_parsing = \"permissive\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| Error::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
