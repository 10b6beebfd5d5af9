//! Precedence resolution for server settings.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (or their `FOLIO_*` environment variables)
//! 2. `<root>/folio.kdl`
//! 3. Built-in defaults

use crate::config::FolioConfig;
use crate::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 100;

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from CLI flag or its environment variable
    CliFlag,
    /// Value from the config file at this path
    ConfigFile(PathBuf),
    /// Built-in default value
    Default,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::ConfigFile(path) => write!(f, "file:{}", path.display()),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Values passed on the command line.
#[derive(Debug, Clone, Default)]
pub struct ServerOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub max_upload_mb: Option<u64>,
}

/// Fully resolved server configuration with source tracking.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Portfolio root directory
    pub root: PathBuf,
    pub host: Resolved<String>,
    pub port: Resolved<u16>,
    pub max_upload_mb: Resolved<u64>,
}

impl ResolvedConfig {
    /// `host:port` string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host.value, self.port.value)
    }

    /// Request body limit in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        usize::try_from(self.max_upload_mb.value.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX)
    }
}

fn pick<T>(cli: Option<T>, file: Option<T>, default: T, file_source: &ValueSource) -> Resolved<T> {
    match (cli, file) {
        (Some(v), _) => Resolved::new(v, ValueSource::CliFlag),
        (None, Some(v)) => Resolved::new(v, file_source.clone()),
        (None, None) => Resolved::new(default, ValueSource::Default),
    }
}

/// Resolve server settings for `root` with full precedence chain.
pub fn resolve_config(root: &Path, overrides: &ServerOverrides) -> Result<ResolvedConfig> {
    if overrides.port == Some(0) {
        return Err(Error::InvalidInput("port must be 1-65535, got 0".to_string()));
    }
    if overrides.max_upload_mb == Some(0) {
        return Err(Error::InvalidInput(
            "max-upload-mb must be at least 1".to_string(),
        ));
    }

    let file = FolioConfig::load(root)?;
    let file_source = ValueSource::ConfigFile(FolioConfig::path(root));

    Ok(ResolvedConfig {
        root: root.to_path_buf(),
        host: pick(
            overrides.host.clone(),
            file.host,
            DEFAULT_HOST.to_string(),
            &file_source,
        ),
        port: pick(overrides.port, file.port, DEFAULT_PORT, &file_source),
        max_upload_mb: pick(
            overrides.max_upload_mb,
            file.max_upload_mb,
            DEFAULT_MAX_UPLOAD_MB,
            &file_source,
        ),
    })
}
