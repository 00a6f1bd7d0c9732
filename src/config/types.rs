//! Core configuration types.
//! - Config holds everything one run needs; it is built once and passed by reference.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::catalog::Backend;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Dispositions and summary (default)
    #[default]
    Normal,
    /// Per-entity details (what `--verbose` selects)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        })
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime configuration for one relocation run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Which catalog service to ask
    pub backend: Backend,
    /// Catalog service address
    pub host: String,
    /// Catalog API credential
    pub api_key: String,
    /// Tag label selecting the entities to relocate
    pub tag: String,
    /// Where relocated folders are copied to
    pub destination_root: PathBuf,
    /// Root the symlinks point into; `None` means `destination_root`
    pub symlink_root: Option<PathBuf>,
    /// Prefix prepended to catalog paths to reach them locally
    pub source_prefix: Option<PathBuf>,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// Emit JSON log lines
    pub json_logs: bool,
    /// Log the plan but do not touch the filesystem
    pub dry_run: bool,
    /// Carry timestamps over to copied entries
    pub preserve_times: bool,
}

impl Config {
    /// Config with the required inputs; everything else at its default.
    pub fn new(
        backend: Backend,
        api_key: impl Into<String>,
        tag: impl Into<String>,
        destination_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            backend,
            host: backend.default_host().to_string(),
            api_key: api_key.into(),
            tag: tag.into(),
            destination_root: destination_root.into(),
            symlink_root: None,
            source_prefix: None,
            log_level: LogLevel::Normal,
            log_file: None,
            json_logs: false,
            dry_run: false,
            preserve_times: false,
        }
    }

    pub fn effective_symlink_root(&self) -> &Path {
        self.symlink_root
            .as_deref()
            .unwrap_or(&self.destination_root)
    }
}
