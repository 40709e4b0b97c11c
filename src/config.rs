//! Viewer configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`):
//!
//! | Variable          | Default          | Meaning                               |
//! |-------------------|------------------|---------------------------------------|
//! | `VIEW_HOST`       | `localhost:8000` | Page host the endpoint is derived from |
//! | `VIEW_VERBOSE`    | `false`          | Debug-level logging                   |
//! | `VIEW_LOG_FORMAT` | `text`           | `text` or `json` log output           |
//! | `VIEW_PRETTY`     | `true`           | Pretty-print rendered state           |

use std::str::FromStr;

use crate::endpoint::Endpoint;
use crate::error::ViewError;

/// Host used when `VIEW_HOST` is not set.
pub const DEFAULT_HOST: &str = "localhost:8000";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ViewError::Config(format!(
                "VIEW_LOG_FORMAT must be `text` or `json`, got {other:?}"
            ))),
        }
    }
}

/// Top-level viewer configuration.
///
/// Loaded once at startup via [`ViewConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Connection target derived from `VIEW_HOST`.
    pub endpoint: Endpoint,

    /// Enables debug-level logging when `RUST_LOG` is unset.
    pub verbose: bool,

    /// Log output format.
    pub log_format: LogFormat,

    /// Pretty-print each rendered state.
    pub pretty: bool,
}

impl ViewConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Config`] if `VIEW_HOST` or `VIEW_LOG_FORMAT` is
    /// set to an unusable value.
    pub fn from_env() -> Result<Self, ViewError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ViewConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ViewError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("VIEW_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let endpoint = Endpoint::from_host(&host)
            .map_err(|err| ViewError::Config(format!("VIEW_HOST: {err}")))?;

        let log_format = match lookup("VIEW_LOG_FORMAT") {
            Some(v) => v.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            endpoint,
            verbose: parse_bool(lookup("VIEW_VERBOSE").as_deref(), false),
            log_format,
            pretty: parse_bool(lookup("VIEW_PRETTY").as_deref(), true),
        })
    }

    /// Default `tracing` filter directive when `RUST_LOG` is unset.
    #[must_use]
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

/// Parses a boolean flag. Accepts `"true"`, `"1"`, `"false"`, `"0"`
/// (case-insensitive). Returns `default` otherwise.
fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value.map(str::to_ascii_lowercase).as_deref() {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        _ => default,
    }
}
