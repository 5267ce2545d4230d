//! Configuration for the `taskboard` client.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/taskboard/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use taskboard_proto::task::TaskStatus;
use url::Url;

use crate::board::Column;
use crate::forms::{DEFAULT_EVENT_BUFFER, FormSettings};

/// Base URL of the task service when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/v1/";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// The service base URL is not an absolute http(s) URL.
    #[error("invalid base URL {value:?}: {reason}")]
    InvalidBaseUrl {
        /// The configured value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    api: ApiFileConfig,
    ui: UiFileConfig,
}

/// `[api]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ApiFileConfig {
    base_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// `[ui]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiFileConfig {
    event_buffer: Option<usize>,
    navigate_after_submit: Option<bool>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the task service.
    pub base_url: String,
    /// Per-request timeout; an expired request is a network error.
    pub request_timeout: Duration,
    /// Capacity of the form and board event channels.
    pub event_buffer: usize,
    /// Whether the create forms ask to show the board after a success.
    pub navigate_after_submit: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            event_buffer: DEFAULT_EVENT_BUFFER,
            navigate_after_submit: false,
        }
    }
}

impl ClientConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an explicit config file cannot be read or
    /// parsed, if the default file exists but is malformed, or if the
    /// resulting base URL is invalid.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Self::resolve(cli, &file)
    }

    /// Resolve a `ClientConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default.
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            base_url: cli
                .base_url
                .clone()
                .or_else(|| file.api.base_url.clone())
                .unwrap_or(defaults.base_url),
            request_timeout: cli
                .request_timeout_secs
                .or(file.api.request_timeout_secs)
                .map_or(defaults.request_timeout, Duration::from_secs),
            event_buffer: file.ui.event_buffer.unwrap_or(defaults.event_buffer),
            navigate_after_submit: file
                .ui
                .navigate_after_submit
                .unwrap_or(defaults.navigate_after_submit),
        };
        config.api_url()?;
        Ok(config)
    }

    /// The base URL, parsed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] unless the value is an
    /// absolute `http` or `https` URL.
    pub fn api_url(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            value: self.base_url.clone(),
            reason,
        };
        let url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(invalid(format!("unsupported scheme {other}"))),
        }
    }

    /// Settings handed to the form controllers.
    #[must_use]
    pub const fn form_settings(&self) -> FormSettings {
        FormSettings {
            event_buffer: self.event_buffer,
            navigate_after_submit: self.navigate_after_submit,
        }
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Kanban task board client")]
pub struct CliArgs {
    /// Base URL of the task service (default: `http://127.0.0.1:8000/api/v1/`).
    #[arg(long, env = "TASKBOARD_API_URL")]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "TASKBOARD_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,

    /// Path to config file (default: `~/.config/taskboard/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "TASKBOARD_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/taskboard.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// What to do. Shows the board when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Host subcommands, one per board or form operation.
#[derive(clap::Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the board, one section per column.
    Board,

    /// List the users available as task owners.
    Users,

    /// Register a task.
    AddTask {
        #[arg(long, default_value = "")]
        description: String,
        /// Sector the task belongs to.
        #[arg(long, default_value = "")]
        sector: String,
        /// low, mid or high.
        #[arg(long, default_value = "")]
        priority: String,
        /// todo, in_progress or done.
        #[arg(long, default_value = "todo")]
        status: String,
        /// Owner's user id.
        #[arg(long, default_value = "")]
        user: String,
    },

    /// Edit a task; omitted fields keep their current value.
    EditTask {
        id: u64,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        sector: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },

    /// Drop a task on a column (`todo`, `in_progress`, `done` or a title).
    Move { id: u64, column: Column },

    /// Change a task's status.
    SetStatus { id: u64, status: TaskStatus },

    /// Delete a task after confirmation.
    Delete {
        id: u64,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// Register a user.
    AddUser {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and missing file
/// is treated as empty config.
fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        p.to_path_buf()
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfigFile::default());
        };
        config_dir.join("taskboard").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && explicit_path.is_none() => {
            Ok(ConfigFile::default())
        }
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
