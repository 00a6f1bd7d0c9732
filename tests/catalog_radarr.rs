mod common;

use arr_relocate::catalog::{ApiClient, RadarrProvider};
use arr_relocate::{provider_for, Backend, CatalogError, EntityProvider};
use std::path::PathBuf;

const TAGS: &str = r#"[
  {"id": 1, "label": "keep", "movieIds": [9]},
  {"id": 2, "label": "archive", "movieIds": [3, 1]}
]"#;

const ALIEN: &str = r#"{
  "id": 3, "title": "Alien", "path": "/movies/Alien (1979)", "folderName": "/movies/Alien (1979)",
  "hasFile": true, "movieFile": {"path": "/movies/Alien (1979)/Alien.1979.mkv"}
}"#;

const HEAT: &str = r#"{"id": 1, "title": "Heat", "path": "/movies/heat", "hasFile": false}"#;

fn radarr(base: &str) -> RadarrProvider {
    RadarrProvider::new(ApiClient::new(base, "secret").unwrap())
}

#[test]
fn lists_tagged_movies_in_tag_order() {
    let stub = common::serve(&[
        ("/api/v3/tag/detail", 200, TAGS),
        ("/api/v3/movie/3", 200, ALIEN),
        ("/api/v3/movie/1", 200, HEAT),
    ]);

    let movies = radarr(&stub.base).relocatables("Archive").unwrap();
    assert_eq!(movies.len(), 2);

    assert_eq!(movies[0].title, "Alien");
    assert_eq!(movies[0].source_dir, PathBuf::from("/movies/Alien (1979)"));
    assert_eq!(
        movies[0].media_files,
        vec![PathBuf::from("/movies/Alien (1979)/Alien.1979.mkv")]
    );
    assert_eq!(movies[1].title, "Heat");
    assert!(movies[1].media_files.is_empty());

    assert_eq!(
        stub.paths(),
        vec!["/api/v3/tag/detail", "/api/v3/movie/3", "/api/v3/movie/1"]
    );
    assert!(stub.api_keys().iter().all(|k| k.as_deref() == Some("secret")));
}

#[test]
fn unknown_tag_is_distinct_error() {
    let stub = common::serve(&[("/api/v3/tag/detail", 200, TAGS)]);
    let err = radarr(&stub.base).relocatables("missing").unwrap_err();
    assert!(matches!(err, CatalogError::TagNotFound(ref t) if t == "missing"));
}

#[test]
fn http_status_is_reported() {
    let stub = common::serve(&[("/api/v3/tag/detail", 401, r#"{"error":"Unauthorized"}"#)]);
    let provider = provider_for(Backend::Radarr, &stub.base, "wrong").unwrap();
    match provider.relocatables("archive").unwrap_err() {
        CatalogError::Status { status, url } => {
            assert_eq!(status, 401);
            assert!(url.ends_with("/api/v3/tag/detail"));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn malformed_body_is_decode_error() {
    let stub = common::serve(&[("/api/v3/tag/detail", 200, "<html>login</html>")]);
    let err = radarr(&stub.base).relocatables("archive").unwrap_err();
    assert!(matches!(err, CatalogError::Decode { .. }));
}

#[test]
fn unreachable_service_is_transport_error() {
    let err = radarr(&common::dead_address())
        .relocatables("archive")
        .unwrap_err();
    assert!(matches!(err, CatalogError::Transport { .. }));
}
