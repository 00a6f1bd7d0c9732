//! Catalog side: what the movie/series managers report for a tag.
//!
//! Each backend implements `EntityProvider`; the driver only ever sees
//! `Relocatable` values, so backend quirks (Radarr's per-movie lookups and
//! folder names, Sonarr's tag filtering) stay inside their modules.

mod client;
mod radarr;
mod sonarr;

use std::fmt;
use std::path::{Path, PathBuf};

pub use client::ApiClient;
pub use radarr::RadarrProvider;
pub use sonarr::SonarrProvider;

use crate::errors::CatalogError;
use crate::fs_ops::reroot;

/// One catalog entry that may be relocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocatable {
    pub title: String,
    /// Directory holding the entity's media, as the catalog reports it.
    pub source_dir: PathBuf,
    /// Folder name the catalog uses for the entity, when it reports one.
    pub folder_name: Option<String>,
    /// Media files the catalog tracks for the entity; probed alongside the directory.
    pub media_files: Vec<PathBuf>,
}

impl Relocatable {
    pub fn new(
        title: impl Into<String>,
        source_dir: impl Into<PathBuf>,
        folder_name: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            source_dir: source_dir.into(),
            folder_name,
            media_files: Vec::new(),
        }
    }

    pub fn with_media_files(mut self, files: impl IntoIterator<Item = PathBuf>) -> Self {
        self.media_files.extend(files);
        self
    }

    /// Same entity with its paths re-rooted under `prefix`, for runs in a
    /// different mount namespace than the catalog service.
    pub fn localized(&self, prefix: Option<&Path>) -> Self {
        match prefix {
            None => self.clone(),
            Some(prefix) => Self {
                title: self.title.clone(),
                source_dir: reroot(prefix, &self.source_dir),
                folder_name: self.folder_name.clone(),
                media_files: self.media_files.iter().map(|f| reroot(prefix, f)).collect(),
            },
        }
    }

    /// The directory first, then any media files.
    pub fn probe_paths(&self) -> Vec<PathBuf> {
        std::iter::once(self.source_dir.clone())
            .chain(self.media_files.iter().cloned())
            .collect()
    }
}

impl fmt::Display for Relocatable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Supported catalog services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Movie library manager.
    Radarr,
    /// Series library manager.
    Sonarr,
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Radarr => "radarr",
            Backend::Sonarr => "sonarr",
        }
    }

    pub fn default_host(&self) -> &'static str {
        match self {
            Backend::Radarr => "http://localhost:7878",
            Backend::Sonarr => "http://localhost:8989",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lists the entities on a tag, in catalog order.
pub trait EntityProvider {
    fn backend(&self) -> Backend;

    /// `CatalogError::TagNotFound` when no tag carries `tag` as its label.
    fn relocatables(&self, tag: &str) -> Result<Vec<Relocatable>, CatalogError>;
}

/// Build the provider for `backend` talking to `host` with `api_key`.
pub fn provider_for(
    backend: Backend,
    host: &str,
    api_key: &str,
) -> Result<Box<dyn EntityProvider>, CatalogError> {
    let client = ApiClient::new(host, api_key)?;
    Ok(match backend {
        Backend::Radarr => Box::new(RadarrProvider::new(client)),
        Backend::Sonarr => Box::new(SonarrProvider::new(client)),
    })
}
