//! Config validation logic.
//! Checks required inputs, then normalizes the roots: absolute, lexically
//! cleaned, destination created if missing and probed for writability.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::types::Config;
use crate::fs_ops::{io_error_with_help, normalize_lexical};

/// Validate `cfg` and rewrite its paths into normalized form, in place.
pub fn validate_and_normalize(cfg: &mut Config) -> Result<()> {
    if cfg.api_key.trim().is_empty() {
        bail!("{} API key is required", cfg.backend);
    }
    if cfg.tag.trim().is_empty() {
        bail!("tag is required");
    }
    if cfg.destination_root.as_os_str().is_empty() {
        bail!("destination is required");
    }

    cfg.destination_root = absolute_clean(&cfg.destination_root)?;
    cfg.symlink_root = cfg
        .symlink_root
        .as_deref()
        .map(absolute_clean)
        .transpose()?;
    cfg.source_prefix = cfg
        .source_prefix
        .as_deref()
        .filter(|p| !p.as_os_str().is_empty())
        .map(absolute_clean)
        .transpose()?;

    if cfg.dry_run {
        // Read-only: a missing destination would be created on a real run.
        if cfg.destination_root.exists() && !cfg.destination_root.is_dir() {
            bail!(
                "destination exists but isn't a directory: {}",
                cfg.destination_root.display()
            );
        }
    } else {
        ensure_dir_is_or_create(&cfg.destination_root, "destination")?;
        ensure_writable(&cfg.destination_root, "destination")?;
    }

    info!(
        backend = %cfg.backend,
        host = %cfg.host,
        tag = %cfg.tag,
        destination = %cfg.destination_root.display(),
        symlink_root = %cfg.effective_symlink_root().display(),
        prefix = %cfg.source_prefix.as_deref().map(|p| p.display().to_string()).unwrap_or_else(|| "<none>".into()),
        "config validated"
    );
    Ok(())
}

fn absolute_clean(p: &Path) -> Result<PathBuf> {
    let abs = std::path::absolute(p).with_context(|| format!("resolve '{}'", p.display()))?;
    Ok(normalize_lexical(&abs))
}

/// Ensure directory exists (create if missing). If it exists, it must be a directory.
fn ensure_dir_is_or_create(path: &Path, name: &str) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            bail!("{name} exists but isn't a directory: {}", path.display());
        }
    } else {
        fs::create_dir_all(path).map_err(io_error_with_help("create directory", path))?;
        info!("Created {name} directory: {}", path.display());
    }
    Ok(())
}

/// Ensure directory is writable using a throwaway probe file.
fn ensure_writable(path: &Path, name: &str) -> Result<()> {
    let probe = path.join(format!(".arr_relocate_probe_{}.tmp", std::process::id()));
    fs::OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(&probe)
        .map_err(io_error_with_help("write probe file", &probe))
        .with_context(|| format!("{name} '{}' is not writable", path.display()))?;
    let _ = fs::remove_file(&probe);
    debug!("{name} writable: {}", path.display());
    Ok(())
}
