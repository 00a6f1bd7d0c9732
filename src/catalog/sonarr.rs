//! Sonarr (series-backend): the tag list gives the tag id, the full series
//! list is filtered by it. Series report no separate folder name, so the
//! basename of their path is used.

use serde::Deserialize;
use tracing::debug;

use super::client::{find_labelled, ApiClient};
use super::{Backend, EntityProvider, Relocatable};
use crate::errors::CatalogError;

#[derive(Debug, Deserialize)]
struct Tag {
    id: i64,
    label: String,
}

#[derive(Debug, Deserialize)]
struct Series {
    title: String,
    path: String,
    #[serde(default)]
    tags: Vec<i64>,
}

pub struct SonarrProvider {
    client: ApiClient,
}

impl SonarrProvider {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

fn tagged(series: Vec<Series>, tag_id: i64) -> Vec<Relocatable> {
    series
        .into_iter()
        .filter(|s| s.tags.contains(&tag_id))
        .map(|s| Relocatable::new(s.title, s.path, None))
        .collect()
}

impl EntityProvider for SonarrProvider {
    fn backend(&self) -> Backend {
        Backend::Sonarr
    }

    fn relocatables(&self, tag: &str) -> Result<Vec<Relocatable>, CatalogError> {
        let tags: Vec<Tag> = self.client.get_json("/api/v3/tag")?;
        let found = find_labelled(tags, tag, |t| t.label.as_str())
            .ok_or_else(|| CatalogError::TagNotFound(tag.to_string()))?;

        let series: Vec<Series> = self.client.get_json("/api/v3/series")?;
        let picked = tagged(series, found.id);
        debug!(tag, tag_id = found.id, series = picked.len(), "resolved sonarr tag");
        Ok(picked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn only_tagged_series_in_catalog_order() {
        let json = r#"[
            {"id": 1, "title": "The Expanse", "path": "/tv/The Expanse", "tags": [2, 5]},
            {"id": 2, "title": "Dark", "path": "/tv/Dark", "tags": []},
            {"id": 3, "title": "Severance", "path": "/tv/Severance", "tags": [5]}
        ]"#;
        let series: Vec<Series> = serde_json::from_str(json).unwrap();
        let picked = tagged(series, 5);
        let titles: Vec<_> = picked.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["The Expanse", "Severance"]);
        assert_eq!(picked[1].source_dir, PathBuf::from("/tv/Severance"));
        assert!(picked.iter().all(|r| r.folder_name.is_none() && r.media_files.is_empty()));
    }
}
