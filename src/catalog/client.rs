//! Blocking JSON client shared by the catalog backends.
//! The API key travels in the `X-Api-Key` header so it never shows up in
//! URLs, error messages or logs.

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::CatalogError;

const API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Debug, Clone)]
pub struct ApiClient {
    base: String,
    api_key: String,
    http: Client,
}

impl ApiClient {
    /// `host` may omit the scheme (`localhost:7878` means `http://localhost:7878`).
    pub fn new(host: &str, api_key: &str) -> Result<Self, CatalogError> {
        let base = normalize_base(host);
        let http = Client::builder()
            .user_agent(concat!("arr_relocate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| CatalogError::Transport {
                url: base.clone(),
                error,
            })?;
        Ok(Self {
            base,
            api_key: api_key.to_string(),
            http,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// GET `<base><path>` and decode the JSON body.
    pub fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.base, path);
        debug!(%url, "catalog request");
        let resp = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|error| CatalogError::Transport {
                url: url.clone(),
                error,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = resp.text().map_err(|error| CatalogError::Transport {
            url: url.clone(),
            error,
        })?;
        serde_json::from_str(&body).map_err(|error| CatalogError::Decode { url, error })
    }
}

fn normalize_base(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}

/// Pick the item whose label matches `label` (ASCII case-insensitive; the
/// catalogs store tag labels lowercased).
pub(super) fn find_labelled<T>(
    items: Vec<T>,
    label: &str,
    label_of: impl Fn(&T) -> &str,
) -> Option<T> {
    let wanted = label.trim();
    items
        .into_iter()
        .find(|item| label_of(item).eq_ignore_ascii_case(wanted))
}
