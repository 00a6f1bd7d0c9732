//! Filesystem side of a relocation: probing, copying, and the copy -> remove -> link engine.

mod copy;
mod helpers;
mod manifest;
mod metadata;
mod paths;
mod probe;
mod relocate;

pub use copy::{copy_tree, CopyOptions, CopyStats};
pub use helpers::{describe_io_error, io_error_with_help};
pub use manifest::{ManifestDiff, ManifestEntry, TreeManifest};
pub use paths::{folder_name_for, normalize_lexical, reroot};
pub use probe::{check_movability, entry_status, EntryStatus, Movability};
pub use relocate::{RelocationPlan, Relocator};
