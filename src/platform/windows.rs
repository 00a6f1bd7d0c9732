//! Windows implementations of platform helpers.
//! Directory and file symlinks are distinct objects here, so recreating a
//! link has to look at what the original resolves to.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::os::windows::fs::{symlink_dir as win_symlink_dir, symlink_file};
use std::path::Path;

pub fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    win_symlink_dir(target, link)
}

/// Dangling originals are recreated as file links.
pub fn recreate_symlink(original: &Path, target: &Path, link: &Path) -> io::Result<()> {
    match fs::metadata(original) {
        Ok(meta) if meta.is_dir() => win_symlink_dir(target, link),
        _ => symlink_file(target, link),
    }
}

pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    OpenOptions::new().create(true).append(true).open(path)
}
