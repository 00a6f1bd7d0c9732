//! Typed error definitions for arr_relocate.
//!
//! Each failure family gets its own enum so the driver can tell a clean abort
//! (catalog lookup, probe, copy) apart from the two outcomes that leave an
//! entity half relocated (remove, link).
//!
//! I/O-backed variants render their cause through `describe_io_error`, so the
//! Display text is self-contained and carries the same platform hints as the
//! rest of the tool.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::fs_ops::{describe_io_error, EntryStatus};

/// Failures while asking the catalog service for the entities on a tag.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no tag labelled '{0}' exists in the catalog")]
    TagNotFound(String),

    #[error("request to {url} failed: {error}")]
    Transport { url: String, error: reqwest::Error },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("could not decode response from {url}: {error}")]
    Decode { url: String, error: serde_json::Error },
}

/// Failures while classifying an entity's probe paths.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("no probe paths to inspect")]
    NoProbes,

    #[error("{}", describe_io_error("inspect", .path, .error))]
    Io { path: PathBuf, error: io::Error },

    #[error("'{}' is a {status} entry and cannot be relocated", .path.display())]
    Unsupported { path: PathBuf, status: EntryStatus },
}

impl ProbeError {
    /// The path the probe failed on, when there is one.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            ProbeError::NoProbes => None,
            ProbeError::Io { path, .. }
            | ProbeError::Unsupported { path, .. } => Some(path),
        }
    }
}

/// Failures while duplicating a directory tree.
#[derive(Debug, Error)]
pub enum CopyError {
    #[error("{}", describe_io_error(.op, .path, .error))]
    Io {
        op: &'static str,
        path: PathBuf,
        error: io::Error,
    },

    #[error("refusing to copy '{}': {reason}", .path.display())]
    Unsupported { path: PathBuf, reason: &'static str },

    #[error("copy at '{}' does not match its source: {detail}", .destination.display())]
    Mismatch { destination: PathBuf, detail: String },
}

impl CopyError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, error: io::Error) -> Self {
        CopyError::Io {
            op,
            path: path.into(),
            error,
        }
    }
}

/// Failures of the copy -> remove -> link sequence.
#[derive(Debug, Error)]
pub enum RelocateError {
    #[error("cannot derive a folder name for '{}'", .source_dir.display())]
    InvalidFolderName { source_dir: PathBuf },

    #[error("destination '{}' already exists; refusing to overwrite it", .0.display())]
    DestinationExists(PathBuf),

    #[error("destination '{}' lies inside the source '{}'", .destination.display(), .source_dir.display())]
    DestinationInsideSource {
        source_dir: PathBuf,
        destination: PathBuf,
    },

    #[error("copy failed: {0}")]
    CopyFailed(CopyError),

    #[error("{}", describe_io_error("remove source directory", .path, .error))]
    RemoveFailed { path: PathBuf, error: io::Error },

    #[error("{} (link target '{}')", describe_io_error("create symlink", .link, .error), .target.display())]
    LinkFailed {
        link: PathBuf,
        target: PathBuf,
        error: io::Error,
    },
}

impl RelocateError {
    /// Stable numeric code for structured logs.
    pub fn code(&self) -> u16 {
        match self {
            RelocateError::InvalidFolderName { .. } => 10,
            RelocateError::DestinationExists(_) => 11,
            RelocateError::DestinationInsideSource { .. } => 12,
            RelocateError::CopyFailed(_) => 20,
            RelocateError::RemoveFailed { .. } => 30,
            RelocateError::LinkFailed { .. } => 40,
        }
    }

    /// Short snake_case label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RelocateError::InvalidFolderName { .. } => "invalid_folder_name",
            RelocateError::DestinationExists(_) => "destination_exists",
            RelocateError::DestinationInsideSource { .. } => "destination_inside_source",
            RelocateError::CopyFailed(_) => "copy_failed",
            RelocateError::RemoveFailed { .. } => "remove_failed",
            RelocateError::LinkFailed { .. } => "link_failed",
        }
    }

    /// True when the entity is left neither at its source nor fully relocated.
    pub fn requires_manual_repair(&self) -> bool {
        matches!(
            self,
            RelocateError::RemoveFailed { .. } | RelocateError::LinkFailed { .. }
        )
    }
}

/// The first fatal error of a batch run, tagged with the entity it hit.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("catalog lookup failed: {0}")]
    Catalog(#[from] CatalogError),

    #[error("failed to check whether '{title}' is movable: {error}")]
    Probe { title: String, error: ProbeError },

    #[error("failed to relocate '{title}': {error}")]
    Relocate { title: String, error: RelocateError },
}
