//! Structural snapshot of a directory tree: every entry's relative path and,
//! for files, its size. Used to check a copy against its source before the
//! source is removed. Contents are not hashed.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestEntry {
    Dir,
    File(u64),
    Link(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TreeManifest {
    entries: BTreeMap<PathBuf, ManifestEntry>,
}

impl TreeManifest {
    /// Walk `root` without following links. The root itself is not listed.
    pub fn scan(root: &Path) -> io::Result<Self> {
        let mut entries = BTreeMap::new();
        for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
            let entry = entry.map_err(io::Error::from)?;
            let rel = entry
                .path()
                .strip_prefix(root)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?
                .to_path_buf();
            let ft = entry.file_type();
            let item = if ft.is_symlink() {
                ManifestEntry::Link(fs::read_link(entry.path())?)
            } else if ft.is_dir() {
                ManifestEntry::Dir
            } else {
                ManifestEntry::File(entry.metadata().map_err(io::Error::from)?.len())
            };
            entries.insert(rel, item);
        }
        Ok(Self { entries })
    }

    pub fn total_bytes(&self) -> u64 {
        self.entries
            .values()
            .map(|e| match e {
                ManifestEntry::File(len) => *len,
                _ => 0,
            })
            .sum()
    }

    pub fn file_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| matches!(e, ManifestEntry::File(_)))
            .count()
    }

    pub fn get(&self, rel: &Path) -> Option<&ManifestEntry> {
        self.entries.get(rel)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First difference between `self` (expected) and `other`, if any.
    pub fn first_difference(&self, other: &TreeManifest) -> Option<ManifestDiff> {
        for (rel, want) in &self.entries {
            match other.entries.get(rel) {
                None => return Some(ManifestDiff::Missing(rel.clone())),
                Some(got) if got != want => {
                    return Some(ManifestDiff::Changed {
                        path: rel.clone(),
                        expected: want.clone(),
                        found: got.clone(),
                    });
                }
                Some(_) => {}
            }
        }
        other
            .entries
            .keys()
            .find(|rel| !self.entries.contains_key(*rel))
            .map(|rel| ManifestDiff::Unexpected(rel.clone()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestDiff {
    Missing(PathBuf),
    Unexpected(PathBuf),
    Changed {
        path: PathBuf,
        expected: ManifestEntry,
        found: ManifestEntry,
    },
}

impl fmt::Display for ManifestDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestDiff::Missing(p) => write!(f, "'{}' missing from copy", p.display()),
            ManifestDiff::Unexpected(p) => write!(f, "'{}' not present in source", p.display()),
            ManifestDiff::Changed {
                path,
                expected,
                found,
            } => write!(
                f,
                "'{}' differs (expected {:?}, found {:?})",
                path.display(),
                expected,
                found
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn scan_lists_nested_entries_with_sizes() {
        let td = tempdir().unwrap();
        let root = td.path();
        fs::create_dir_all(root.join("season 1")).unwrap();
        fs::write(root.join("season 1/episode 1.mp4"), b"12345").unwrap();
        fs::write(root.join("poster.jpg"), b"ab").unwrap();

        let m = TreeManifest::scan(root).unwrap();
        assert_eq!(m.len(), 3);
        assert_eq!(m.file_count(), 2);
        assert_eq!(m.total_bytes(), 7);
        assert_eq!(m.get(Path::new("season 1")), Some(&ManifestEntry::Dir));
        assert_eq!(
            m.get(Path::new("season 1/episode 1.mp4")),
            Some(&ManifestEntry::File(5))
        );
    }

    #[test]
    fn differences_are_reported() {
        let a = tempdir().unwrap();
        let b = tempdir().unwrap();
        fs::write(a.path().join("x"), b"123").unwrap();
        fs::write(b.path().join("x"), b"12").unwrap();
        let ma = TreeManifest::scan(a.path()).unwrap();
        let mb = TreeManifest::scan(b.path()).unwrap();
        assert!(matches!(
            ma.first_difference(&mb),
            Some(ManifestDiff::Changed { .. })
        ));

        fs::write(b.path().join("x"), b"123").unwrap();
        let mb = TreeManifest::scan(b.path()).unwrap();
        assert_eq!(ma.first_difference(&mb), None);

        fs::write(b.path().join("y"), b"").unwrap();
        let mb = TreeManifest::scan(b.path()).unwrap();
        assert_eq!(
            ma.first_difference(&mb),
            Some(ManifestDiff::Unexpected(PathBuf::from("y")))
        );
        assert_eq!(
            mb.first_difference(&ma),
            Some(ManifestDiff::Missing(PathBuf::from("y")))
        );
    }
}
