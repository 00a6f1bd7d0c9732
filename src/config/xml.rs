//! Optional XML settings file.
//! - Supplies defaults that would otherwise have to be repeated on every
//!   invocation (API keys, hosts, prefix, symlink root, logging).
//! - Unknown elements are rejected so typos surface instead of being ignored.
//! - CLI flags always override what the file says; merging happens in the binary.
//!
//! ```xml
//! <config>
//!   <log_level>normal</log_level>
//!   <log_file>/var/log/arr_relocate.log</log_file>
//!   <prefix_path>/host</prefix_path>
//!   <symlink_root>/data/slow</symlink_root>
//!   <radarr><host>http://radarr:7878</host><api_key>...</api_key></radarr>
//!   <sonarr><host>http://sonarr:8989</host><api_key>...</api_key></sonarr>
//! </config>
//! ```

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::default_config_path;
use super::types::LogLevel;
use crate::catalog::Backend;

#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    log_level: Option<String>,
    log_file: Option<String>,
    prefix_path: Option<String>,
    symlink_root: Option<String>,
    radarr: Option<XmlBackend>,
    sonarr: Option<XmlBackend>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct XmlBackend {
    host: Option<String>,
    api_key: Option<String>,
}

/// Per-backend values from the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendSettings {
    pub host: Option<String>,
    pub api_key: Option<String>,
}

/// Values from the settings file, trimmed; blank elements count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSettings {
    pub log_level: Option<LogLevel>,
    pub log_file: Option<PathBuf>,
    pub prefix_path: Option<PathBuf>,
    pub symlink_root: Option<PathBuf>,
    pub radarr: BackendSettings,
    pub sonarr: BackendSettings,
}

impl FileSettings {
    pub fn backend(&self, backend: Backend) -> &BackendSettings {
        match backend {
            Backend::Radarr => &self.radarr,
            Backend::Sonarr => &self.sonarr,
        }
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl From<XmlBackend> for BackendSettings {
    fn from(x: XmlBackend) -> Self {
        Self {
            host: non_blank(x.host),
            api_key: non_blank(x.api_key),
        }
    }
}

fn to_settings(parsed: XmlConfig) -> Result<FileSettings> {
    let log_level = match non_blank(parsed.log_level) {
        Some(s) => Some(s.parse::<LogLevel>().map_err(anyhow::Error::msg)?),
        None => None,
    };
    Ok(FileSettings {
        log_level,
        log_file: non_blank(parsed.log_file).map(PathBuf::from),
        prefix_path: non_blank(parsed.prefix_path).map(PathBuf::from),
        symlink_root: non_blank(parsed.symlink_root).map(PathBuf::from),
        radarr: parsed.radarr.map(BackendSettings::from).unwrap_or_default(),
        sonarr: parsed.sonarr.map(BackendSettings::from).unwrap_or_default(),
    })
}

/// Parse a settings file at `path`.
pub fn load_file_settings_from(path: &Path) -> Result<FileSettings> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    to_settings(parsed).with_context(|| format!("invalid value in '{}'", path.display()))
}

/// Load the settings file in use, if one exists. A file named explicitly via
/// the environment must exist; the OS default location is optional.
pub fn load_file_settings() -> Result<Option<FileSettings>> {
    let Some(path) = default_config_path() else {
        return Ok(None);
    };
    let explicit = std::env::var_os(super::paths::CONFIG_ENV).is_some_and(|v| !v.is_empty());
    if !explicit && !path.exists() {
        debug!(path = %path.display(), "no config file");
        return Ok(None);
    }
    let settings = load_file_settings_from(&path)?;
    debug!(path = %path.display(), "loaded config file");
    Ok(Some(settings))
}
