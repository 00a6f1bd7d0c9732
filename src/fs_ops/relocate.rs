//! Relocation engine: copy the entity's directory to the destination root,
//! remove the original, and leave a symlink at the original path.
//!
//! Callers must have classified the entity as `Movable` first; nothing here
//! guards against relocating the same entity twice.
//!
//! Failure states:
//! - copy (or verification) fails: the partial copy is discarded, source untouched
//! - removing the source fails: copy and (partial) source coexist, manual repair
//! - creating the link fails: source path is gone, copy is intact, manual repair

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::copy::{copy_tree, CopyOptions, CopyStats};
use super::manifest::TreeManifest;
use super::paths::{folder_name_for, normalize_lexical};
use crate::catalog::Relocatable;
use crate::config::Config;
use crate::errors::{CopyError, RelocateError};
use crate::platform;

/// Where one entity goes and what its link will point at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationPlan {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub link_target: PathBuf,
}

impl RelocationPlan {
    /// `destination_root/<folder>` and `symlink_root/<folder>`, where the
    /// folder is the catalog's name for the entity, else the source basename.
    pub fn for_entity(
        entity: &Relocatable,
        destination_root: &Path,
        symlink_root: &Path,
    ) -> Result<Self, RelocateError> {
        let source = normalize_lexical(&entity.source_dir);
        let folder = folder_name_for(entity.folder_name.as_deref(), &source).ok_or_else(|| {
            RelocateError::InvalidFolderName {
                source_dir: entity.source_dir.clone(),
            }
        })?;
        Ok(Self {
            destination: normalize_lexical(destination_root).join(&folder),
            link_target: normalize_lexical(symlink_root).join(&folder),
            source,
        })
    }
}

/// Runs relocations against fixed destination and symlink roots.
#[derive(Debug, Clone)]
pub struct Relocator {
    destination_root: PathBuf,
    symlink_root: PathBuf,
    copy: CopyOptions,
    dry_run: bool,
}

impl Relocator {
    /// `symlink_root` defaults to `destination_root`.
    pub fn new(destination_root: impl Into<PathBuf>, symlink_root: Option<PathBuf>) -> Self {
        let destination_root = destination_root.into();
        let symlink_root = symlink_root.unwrap_or_else(|| destination_root.clone());
        Self {
            destination_root,
            symlink_root,
            copy: CopyOptions::default(),
            dry_run: false,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.destination_root.clone(), cfg.symlink_root.clone())
            .with_copy_options(CopyOptions {
                preserve_times: cfg.preserve_times,
            })
            .dry_run(cfg.dry_run)
    }

    pub fn with_copy_options(mut self, copy: CopyOptions) -> Self {
        self.copy = copy;
        self
    }

    pub fn dry_run(mut self, on: bool) -> Self {
        self.dry_run = on;
        self
    }

    pub fn destination_root(&self) -> &Path {
        &self.destination_root
    }

    pub fn symlink_root(&self) -> &Path {
        &self.symlink_root
    }

    pub fn plan(&self, entity: &Relocatable) -> Result<RelocationPlan, RelocateError> {
        RelocationPlan::for_entity(entity, &self.destination_root, &self.symlink_root)
    }

    /// Copy, remove, link. Returns the executed plan.
    pub fn relocate(&self, entity: &Relocatable) -> Result<RelocationPlan, RelocateError> {
        let plan = self.plan(entity)?;
        let RelocationPlan {
            source,
            destination,
            link_target,
        } = &plan;

        ensure_outside_source(source, destination)?;

        match fs::symlink_metadata(destination) {
            Ok(_) => return Err(RelocateError::DestinationExists(destination.clone())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(RelocateError::CopyFailed(CopyError::io(
                    "inspect destination",
                    destination,
                    e,
                )));
            }
        }

        if self.dry_run {
            info!(
                title = %entity.title,
                src = %source.display(),
                dest = %destination.display(),
                link = %link_target.display(),
                "dry-run: would relocate"
            );
            return Ok(plan);
        }

        let stats = self.copy_verified(source, destination)?;
        debug!(title = %entity.title, files = stats.files, bytes = stats.bytes, "copy verified");

        fs::remove_dir_all(source).map_err(|error| RelocateError::RemoveFailed {
            path: source.clone(),
            error,
        })?;

        platform::symlink_dir(link_target, source).map_err(|error| RelocateError::LinkFailed {
            link: source.clone(),
            target: link_target.clone(),
            error,
        })?;

        info!(
            title = %entity.title,
            src = %source.display(),
            dest = %destination.display(),
            link = %link_target.display(),
            "relocated"
        );
        Ok(plan)
    }

    /// Copy `source` to `destination` and check the copy's structure against
    /// a snapshot of the source. Any failure discards the destination.
    fn copy_verified(&self, source: &Path, destination: &Path) -> Result<CopyStats, RelocateError> {
        let before = TreeManifest::scan(source)
            .map_err(|e| RelocateError::CopyFailed(CopyError::io("scan source", source, e)))?;

        let result = copy_tree(source, destination, &self.copy).and_then(|stats| {
            let after = TreeManifest::scan(destination)
                .map_err(|e| CopyError::io("scan copy", destination, e))?;
            match before.first_difference(&after) {
                None => Ok(stats),
                Some(diff) => Err(CopyError::Mismatch {
                    destination: destination.to_path_buf(),
                    detail: diff.to_string(),
                }),
            }
        });

        result.map_err(|e| {
            discard_partial_copy(destination);
            RelocateError::CopyFailed(e)
        })
    }
}

/// Refuse a destination that resolves to somewhere under the source. Only
/// the existing part of the destination path can be resolved; the rest is
/// compared lexically.
fn ensure_outside_source(source: &Path, destination: &Path) -> Result<(), RelocateError> {
    let Ok(src) = dunce::canonicalize(source) else {
        // A missing source surfaces as a copy failure.
        return Ok(());
    };
    let mut existing = destination;
    let mut rest = Vec::new();
    let resolved = loop {
        match dunce::canonicalize(existing) {
            Ok(p) => break Some(p),
            Err(_) => match (existing.parent(), existing.file_name()) {
                (Some(parent), Some(name)) => {
                    rest.push(name.to_os_string());
                    existing = parent;
                }
                _ => break None,
            },
        }
    };
    let mut dest = resolved.unwrap_or_else(|| destination.to_path_buf());
    dest.extend(rest.iter().rev());
    if dest.starts_with(&src) {
        return Err(RelocateError::DestinationInsideSource {
            source_dir: source.to_path_buf(),
            destination: destination.to_path_buf(),
        });
    }
    Ok(())
}

/// Best-effort removal of a partial copy.
fn discard_partial_copy(destination: &Path) {
    match fs::remove_dir_all(destination) {
        Ok(()) => debug!(dest = %destination.display(), "discarded partial copy"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(
            dest = %destination.display(),
            error = %e,
            "failed to discard partial copy; remove it by hand"
        ),
    }
}
