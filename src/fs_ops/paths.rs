//! Pure path helpers shared by the engine, the config layer and the catalog.
//! None of these touch the filesystem.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Lexically clean a path: drop `.` segments and trailing separators, fold
/// `..` into its parent. `..` above the root is discarded, matching how the
/// kernel resolves `/..`. Symlinks are not consulted.
pub fn normalize_lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::Prefix(_) | Component::RootDir => out.push(comp.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                let at_root = out.parent().is_none() && out.has_root();
                if at_root {
                    continue;
                }
                match out.components().next_back() {
                    Some(Component::Normal(_)) => {
                        out.pop();
                    }
                    // relative path climbing above its start: keep the `..`
                    _ => out.push(".."),
                }
            }
            Component::Normal(seg) => out.push(seg),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Re-root a catalog-reported path under a local prefix.
///
/// Catalog paths are absolute, so `Path::join` would discard the prefix; the
/// root (and any Windows prefix) is stripped before joining instead.
pub fn reroot(prefix: &Path, catalog_path: &Path) -> PathBuf {
    let relative: PathBuf = catalog_path
        .components()
        .filter(|c| !matches!(c, Component::Prefix(_) | Component::RootDir))
        .collect();
    normalize_lexical(&prefix.join(relative))
}

/// Pick the folder name an entity is relocated under.
///
/// The catalog-supplied name wins when present (only its last segment is
/// used, since some catalogs report a full path there); otherwise the
/// basename of the source directory. `None` when neither yields a usable
/// single segment.
pub fn folder_name_for(canonical: Option<&str>, source_dir: &Path) -> Option<String> {
    let from_catalog = canonical
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| last_segment(Path::new(s)));
    from_catalog.or_else(|| last_segment(&normalize_lexical(source_dir)))
}

fn last_segment(path: &Path) -> Option<String> {
    match path.components().next_back() {
        Some(Component::Normal(seg)) => usable(seg),
        _ => None,
    }
}

fn usable(seg: &OsStr) -> Option<String> {
    let s = seg.to_string_lossy();
    if s.is_empty() || s == "." || s == ".." {
        None
    } else {
        Some(s.into_owned())
    }
}
