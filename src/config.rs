//! Configuration: socket path, logging and report format.
//!
//! Layering, lowest to highest: built-in defaults, TOML file,
//! `DISKWATCH_SOCKET` environment variable, command-line flags.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{DiskwatchError, Result};

/// Well-known bind address used by producers.
pub const DEFAULT_SOCKET_PATH: &str = "/var/run/diskwatch";

/// Environment variable overriding the socket path.
pub const SOCKET_ENV: &str = "DISKWATCH_SOCKET";

/// How decoded ranges are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// `info` log line per range
    #[default]
    Log,
    /// JSON object per line on stdout
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub socket_path: PathBuf,
    pub log_level: String,
    pub report: ReportFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
            log_level: "info".to_string(),
            report: ReportFormat::Log,
        }
    }
}

/// Settings given on the command line. They win over everything else.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub socket: Option<PathBuf>,
    pub json: bool,
    pub verbose: bool,
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(text).map_err(|e| DiskwatchError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file. The file must exist.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            DiskwatchError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    /// Build the effective config: defaults, then `file`, then the
    /// `DISKWATCH_SOCKET` value `env_socket`, then `overrides`.
    pub fn layered(
        file: Option<&Path>,
        env_socket: Option<OsString>,
        overrides: &Overrides,
    ) -> Result<Self> {
        let mut config = match file {
            Some(p) => Self::load(p)?,
            None => Self::default(),
        };
        if let Some(socket) = env_socket {
            config.socket_path = PathBuf::from(socket);
        }
        if let Some(socket) = &overrides.socket {
            config.socket_path = socket.clone();
        }
        if overrides.json {
            config.report = ReportFormat::Json;
        }
        if overrides.verbose {
            config.log_level = "debug".to_string();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.socket_path.as_os_str().is_empty() {
            return Err(DiskwatchError::Config("socket_path is empty".to_string()));
        }
        Ok(())
    }
}
