//! Recursive directory copy.
//! - Walks the source with walkdir (no link following), parents before children.
//! - Files are streamed into newly created destination files (never clobbers) and fsynced.
//! - Permission bits are applied to every file and directory; directory modes
//!   (and times, when requested) are applied deepest-first once all contents exist.
//! - Symlinks inside the tree are recreated as links with the same target.
//!   Special files (fifo, socket, device) abort the copy.
//! - Fails fast: the first error is returned and the partial tree is left for the caller.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

use super::metadata::{apply_permissions, apply_times};
use crate::errors::CopyError;
use crate::platform;

#[derive(Debug, Clone, Copy, Default)]
pub struct CopyOptions {
    /// Carry atime/mtime over to the copy (best-effort).
    pub preserve_times: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub dirs: usize,
    pub files: usize,
    pub links: usize,
    pub bytes: u64,
}

/// Copy the tree rooted at `src` to `dst`. `dst` must not exist yet; its
/// parent directories are created as needed.
pub fn copy_tree(src: &Path, dst: &Path, opts: &CopyOptions) -> Result<CopyStats, CopyError> {
    let root_meta =
        fs::symlink_metadata(src).map_err(|e| CopyError::io("inspect source", src, e))?;
    if root_meta.file_type().is_symlink() {
        return Err(CopyError::Unsupported {
            path: src.to_path_buf(),
            reason: "source root is a symbolic link",
        });
    }
    if !root_meta.is_dir() {
        return Err(CopyError::Unsupported {
            path: src.to_path_buf(),
            reason: "source root is not a directory",
        });
    }

    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CopyError::io("create destination parent", parent, e))?;
    }
    fs::create_dir(dst).map_err(|e| CopyError::io("create directory", dst, e))?;

    let mut stats = CopyStats {
        dirs: 1,
        ..CopyStats::default()
    };
    let mut dirs: Vec<(PathBuf, fs::Metadata)> = vec![(dst.to_path_buf(), root_meta)];

    for entry in WalkDir::new(src)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            CopyError::io("read source entry", path, io::Error::from(e))
        })?;
        let from = entry.path();
        let rel = from.strip_prefix(src).map_err(|_| CopyError::Unsupported {
            path: from.to_path_buf(),
            reason: "entry resolved outside the source root",
        })?;
        let to = dst.join(rel);
        let ft = entry.file_type();

        if ft.is_symlink() {
            let target =
                fs::read_link(from).map_err(|e| CopyError::io("read symlink", from, e))?;
            platform::recreate_symlink(from, &target, &to)
                .map_err(|e| CopyError::io("create symlink", &to, e))?;
            trace!(link = %to.display(), target = %target.display(), "recreated symlink");
            stats.links += 1;
        } else if ft.is_dir() {
            fs::create_dir(&to).map_err(|e| CopyError::io("create directory", &to, e))?;
            let meta = entry
                .metadata()
                .map_err(|e| CopyError::io("read metadata", from, io::Error::from(e)))?;
            dirs.push((to, meta));
            stats.dirs += 1;
        } else if ft.is_file() {
            let meta = entry
                .metadata()
                .map_err(|e| CopyError::io("read metadata", from, io::Error::from(e)))?;
            let bytes = copy_file(from, &to)?;
            apply_permissions(&to, &meta).map_err(|e| CopyError::io("set permissions", &to, e))?;
            if opts.preserve_times {
                apply_times(&to, &meta);
            }
            trace!(src = %from.display(), dst = %to.display(), bytes, "copied file");
            stats.files += 1;
            stats.bytes += bytes;
        } else {
            return Err(CopyError::Unsupported {
                path: from.to_path_buf(),
                reason: "special files (fifo, socket, device) are not copied",
            });
        }
    }

    for (dir, meta) in dirs.iter().rev() {
        apply_permissions(dir, meta).map_err(|e| CopyError::io("set permissions", dir, e))?;
        if opts.preserve_times {
            apply_times(dir, meta);
        }
    }

    debug!(
        src = %src.display(),
        dst = %dst.display(),
        dirs = stats.dirs,
        files = stats.files,
        links = stats.links,
        bytes = stats.bytes,
        "copied tree"
    );
    Ok(stats)
}

/// Stream one file into a newly created destination and fsync it.
fn copy_file(from: &Path, to: &Path) -> Result<u64, CopyError> {
    let mut reader = File::open(from).map_err(|e| CopyError::io("open source file", from, e))?;
    let mut writer = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(to)
        .map_err(|e| CopyError::io("create file", to, e))?;
    let bytes = io::copy(&mut reader, &mut writer).map_err(|e| CopyError::io("copy file", from, e))?;
    writer
        .sync_all()
        .map_err(|e| CopyError::io("flush file", to, e))?;
    Ok(bytes)
}
