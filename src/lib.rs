//! arr_relocate library.
//!
//! Moves the folders of tagged Radarr/Sonarr entities onto other storage and
//! leaves a symlink at each original path, so the catalog keeps working while
//! the data lives elsewhere.
//!
//! Modules:
//! - catalog: REST clients that list the entities on a tag
//! - fs_ops: probing, tree copy and the copy -> remove -> link engine
//! - batch: the sequential driver tying both together
//! - config / errors / output / platform: supporting pieces

pub mod batch;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;

pub use batch::{run_batch, BatchSummary, Reporter};
pub use catalog::{provider_for, Backend, EntityProvider, Relocatable};
pub use config::{default_config_path, default_log_path, path_has_symlink_ancestor, Config, LogLevel};
pub use errors::{BatchError, CatalogError, CopyError, ProbeError, RelocateError};
pub use fs_ops::{check_movability, copy_tree, CopyOptions, Movability, RelocationPlan, Relocator};
