//! Metadata carried over from source entries to their copies.
//! - Permission bits are always applied; a failure is a copy failure.
//! - Timestamps (atime, mtime) are best-effort and only when requested.

use filetime::{set_file_times, FileTime};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{trace, warn};

/// Apply the source's permission bits to `dest`.
pub(super) fn apply_permissions(dest: &Path, src_meta: &fs::Metadata) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = src_meta.permissions().mode() & 0o7777;
        fs::set_permissions(dest, fs::Permissions::from_mode(mode))?;
        trace!(path = %dest.display(), mode = format!("{:o}", mode), "applied permissions");
    }
    #[cfg(windows)]
    {
        let mut perms = fs::metadata(dest)?.permissions();
        perms.set_readonly(src_meta.permissions().readonly());
        fs::set_permissions(dest, perms)?;
    }
    Ok(())
}

/// Copy atime/mtime from `src_meta` onto `dest`. Failures are logged and ignored.
pub(super) fn apply_times(dest: &Path, src_meta: &fs::Metadata) {
    let at = FileTime::from_last_access_time(src_meta);
    let mt = FileTime::from_last_modification_time(src_meta);
    if let Err(e) = set_file_times(dest, at, mt) {
        warn!(path = %dest.display(), error = %e, "failed to set atime/mtime on copy");
    } else {
        trace!(path = %dest.display(), "set atime/mtime on copy");
    }
}
