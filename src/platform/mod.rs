//! Platform-specific helpers.
//! Symlink creation and log file opening differ between Unix and Windows;
//! the rest of the crate only sees this uniform API.

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
pub use unix::{open_log_file_secure_append, recreate_symlink, symlink_dir};

#[cfg(windows)]
pub use windows::{open_log_file_secure_append, recreate_symlink, symlink_dir};
