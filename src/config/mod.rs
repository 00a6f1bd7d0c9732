//! Configuration: the run's `Config` value, default paths, the optional XML
//! settings file, and validation/normalization of the roots.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{default_config_path, default_log_path, path_has_symlink_ancestor, CONFIG_ENV};
pub use types::{Config, LogLevel};
pub use validate::validate_and_normalize;
pub use xml::{load_file_settings, load_file_settings_from, BackendSettings, FileSettings};
