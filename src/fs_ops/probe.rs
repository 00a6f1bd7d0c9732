//! Movability check: decide from the probe paths whether an entity still
//! lives at its source or has already been replaced by a symlink.
//!
//! Every probe is inspected with `symlink_metadata`, so a link in the final
//! component is reported rather than followed. Intermediate components are
//! resolved by the OS as usual, which is why a probe beneath another probe
//! that is a link counts as linked too (a media file reached through a
//! relocated movie directory).

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::errors::ProbeError;

/// What a non-link-following status query says about one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Directory,
    File,
    Symlink,
    Other,
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntryStatus::Directory => "directory",
            EntryStatus::File => "regular file",
            EntryStatus::Symlink => "symbolic link",
            EntryStatus::Other => "special",
        })
    }
}

/// Outcome of a successful probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movability {
    Movable,
    AlreadyRelocated,
}

/// Status of `path` without following a symlink in its last component.
/// A missing path surfaces as the underlying `NotFound` error.
pub fn entry_status(path: &Path) -> io::Result<EntryStatus> {
    let ft = fs::symlink_metadata(path)?.file_type();
    Ok(if ft.is_symlink() {
        EntryStatus::Symlink
    } else if ft.is_dir() {
        EntryStatus::Directory
    } else if ft.is_file() {
        EntryStatus::File
    } else {
        EntryStatus::Other
    })
}

/// Classify an entity from its probe paths.
///
/// - every probe linked -> `AlreadyRelocated`
/// - any unlinked probe that is neither a directory nor a regular file
///   (fifo, socket, device) -> `ProbeError::Unsupported`
/// - a probe missing or unreadable, and not beneath a link -> `ProbeError::Io`
/// - otherwise `Movable`, even when some probes are links (a media file
///   that is itself a symlink inside a real movie directory)
pub fn check_movability<P: AsRef<Path>>(probes: &[P]) -> Result<Movability, ProbeError> {
    if probes.is_empty() {
        return Err(ProbeError::NoProbes);
    }

    let probed: Vec<(PathBuf, io::Result<EntryStatus>)> = probes
        .iter()
        .map(|p| (p.as_ref().to_path_buf(), entry_status(p.as_ref())))
        .collect();
    let links: Vec<PathBuf> = probed
        .iter()
        .filter(|(_, status)| matches!(status, Ok(EntryStatus::Symlink)))
        .map(|(path, _)| path.clone())
        .collect();

    // A probe beneath a linked probe is reached through the link; its own
    // status is irrelevant and may not even resolve here.
    let mut statuses: Vec<(PathBuf, EntryStatus)> = Vec::with_capacity(probed.len());
    let mut linked: Vec<bool> = Vec::with_capacity(probed.len());
    for (path, status) in probed {
        let under_link = links.iter().any(|l| *l != path && path.starts_with(l));
        let status = match status {
            Ok(status) => status,
            Err(_) if under_link => EntryStatus::Symlink,
            Err(error) => return Err(ProbeError::Io { path, error }),
        };
        trace!(path = %path.display(), %status, under_link, "probed");
        linked.push(under_link || status == EntryStatus::Symlink);
        statuses.push((path, status));
    }

    if linked.iter().all(|l| *l) {
        debug!(probes = statuses.len(), "all probes are links");
        return Ok(Movability::AlreadyRelocated);
    }

    if let Some((path, status)) = statuses
        .iter()
        .find(|(_, status)| *status == EntryStatus::Other)
    {
        return Err(ProbeError::Unsupported {
            path: path.clone(),
            status: *status,
        });
    }

    Ok(Movability::Movable)
}
