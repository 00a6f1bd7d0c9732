//! Radarr (movie-backend): tag detail lists movie ids, each movie is fetched
//! on its own. Movies carry a folder name and, when downloaded, a media file
//! path that is probed alongside the movie directory.

use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;

use super::client::{find_labelled, ApiClient};
use super::{Backend, EntityProvider, Relocatable};
use crate::errors::CatalogError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TagDetail {
    label: String,
    #[serde(default)]
    movie_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Movie {
    title: String,
    path: String,
    #[serde(default)]
    folder_name: Option<String>,
    #[serde(default)]
    has_file: bool,
    #[serde(default)]
    movie_file: Option<MovieFile>,
}

#[derive(Debug, Deserialize)]
struct MovieFile {
    #[serde(default)]
    path: Option<String>,
}

impl From<Movie> for Relocatable {
    fn from(movie: Movie) -> Self {
        let media = movie
            .movie_file
            .filter(|_| movie.has_file)
            .and_then(|f| f.path)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        Relocatable::new(movie.title, movie.path, movie.folder_name).with_media_files(media)
    }
}

pub struct RadarrProvider {
    client: ApiClient,
}

impl RadarrProvider {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl EntityProvider for RadarrProvider {
    fn backend(&self) -> Backend {
        Backend::Radarr
    }

    fn relocatables(&self, tag: &str) -> Result<Vec<Relocatable>, CatalogError> {
        let tags: Vec<TagDetail> = self.client.get_json("/api/v3/tag/detail")?;
        let detail = find_labelled(tags, tag, |t| t.label.as_str())
            .ok_or_else(|| CatalogError::TagNotFound(tag.to_string()))?;
        debug!(tag, movies = detail.movie_ids.len(), "resolved radarr tag");

        detail
            .movie_ids
            .iter()
            .map(|id| {
                self.client
                    .get_json::<Movie>(&format!("/api/v3/movie/{id}"))
                    .map(Relocatable::from)
            })
            .collect()
    }
}
