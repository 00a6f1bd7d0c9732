//! I/O error helpers.
//!
//! Turns a bare `io::Error` into a message that names the operation, the
//! path, and (when the OS code is a common one) a hint about what to check.
//!
//! Usage:
//!   // typed errors render through describe_io_error in their Display impl
//!   // anyhow code paths use the map_err adapter:
//!   fs::create_dir_all(dir).map_err(io_error_with_help("create directory", dir))?;

use anyhow::anyhow;
use std::io;
use std::path::Path;

/// Hint for a raw OS error code, if it's one users commonly hit while moving media.
#[cfg(unix)]
fn os_hint(code: i32) -> Option<&'static str> {
    let hint = match code {
        libc::EACCES | libc::EPERM => "permission denied; check ownership and write permissions",
        libc::EXDEV => "cross-filesystem operation",
        libc::EBUSY => "resource busy; is a media server holding the file open?",
        libc::ENOENT => "path not found; is the source prefix right?",
        libc::EEXIST => "already exists; remove the target first",
        libc::ENOSPC => "insufficient space on device",
        libc::EROFS => "read-only filesystem; cannot write here",
        libc::ELOOP => "too many symbolic link levels; possible symlink cycle",
        libc::ENAMETOOLONG => "filename or path too long",
        libc::ENOTEMPTY => "directory not empty",
        libc::EMFILE => "process file descriptor limit reached",
        libc::ENFILE => "system-wide file table overflow",
        _ => return None,
    };
    Some(hint)
}

#[cfg(windows)]
fn os_hint(code: i32) -> Option<&'static str> {
    let hint = match code {
        5 => "access denied; check permissions",
        17 => "not same device",
        32 => "sharing violation; file is in use",
        2 | 3 => "path not found; is the source prefix right?",
        80 | 183 => "already exists; remove the target first",
        112 => "insufficient disk space",
        19 => "write protected media",
        206 => "filename or path too long",
        1314 => "symlink creation needs Developer Mode or elevation",
        _ => return None,
    };
    Some(hint)
}

fn kind_hint(kind: io::ErrorKind) -> Option<&'static str> {
    match kind {
        io::ErrorKind::PermissionDenied => {
            Some("permission denied; check ownership and write permissions")
        }
        io::ErrorKind::NotFound => Some("path not found; is the source prefix right?"),
        io::ErrorKind::AlreadyExists => Some("already exists; remove the target first"),
        _ => None,
    }
}

/// "<op> '<path>': <error> — <hint> [os code: N]"
pub fn describe_io_error(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    match e.raw_os_error() {
        Some(code) => {
            if let Some(hint) = os_hint(code) {
                msg.push_str(" — ");
                msg.push_str(hint);
            }
            msg.push_str(&format!(" [os code: {code}]"));
        }
        None => {
            if let Some(hint) = kind_hint(e.kind()) {
                msg.push_str(" — ");
                msg.push_str(hint);
            }
        }
    }
    msg
}

/// Adapter for anyhow code: `.map_err(io_error_with_help("op", path))`.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(describe_io_error(op, path, &e))
}
