//! Unix implementations of platform helpers.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::os::unix::fs::{symlink, OpenOptionsExt, PermissionsExt};
use std::path::Path;

/// Create `link` pointing at the directory `target`. The target need not
/// exist locally (it may only resolve inside the catalog's mount namespace).
pub fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    symlink(target, link)
}

/// Recreate a symlink found at `_original` as `link` -> `target`.
/// Unix links carry no file/dir flavour, so the original is not consulted.
pub fn recreate_symlink(_original: &Path, target: &Path, link: &Path) -> io::Result<()> {
    symlink(target, link)
}

/// Open log file for appending; new files get 0600, existing files keep their mode.
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let existed = path.exists();
    let f = OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600)
        .open(path)?;
    if !existed {
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(f)
}
