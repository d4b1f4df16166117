use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    domain::{MovieDetail, MovieId, Query, SearchResult},
    error::CatalogError,
};
use tracing::{debug, warn};
use url::{form_urlencoded, Url};

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn search(&self, query: &Query, page: u32) -> Result<SearchResult, CatalogError>;
    async fn fetch_detail(&self, id: MovieId) -> Result<MovieDetail, CatalogError>;
}

pub struct HttpCatalogApi {
    http: Client,
    base_url: Url,
}

impl HttpCatalogApi {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url.trim())
            .with_context(|| format!("invalid catalog base url '{base_url}'"))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            bail!("catalog base url must be an http(s) address, got '{base_url}'");
        }
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn search_url(&self, query: &Query, page: u32) -> Url {
        let mut url = self.endpoint(&["search"]);
        url.set_query(Some(&format!("q={}&page={page}", encode_component(query.as_str()))));
        url
    }

    pub fn detail_url(&self, id: MovieId) -> Url {
        self.endpoint(&["movie", &id.to_string()])
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base url always has path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        debug!(%url, "catalog request");
        let response = self.http.get(url.clone()).send().await.map_err(|error| {
            warn!(%url, %error, "catalog request failed without a response");
            CatalogError::transport()
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "catalog request rejected");
            return Err(CatalogError::status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|error| {
            warn!(%url, %error, "catalog response body was interrupted");
            CatalogError::transport()
        })?;
        serde_json::from_slice(&body).map_err(|error| CatalogError::decode(error.to_string()))
    }
}

// Spaces go out as `%20`; a literal `+` is already `%2B` at this point.
fn encode_component(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn search(&self, query: &Query, page: u32) -> Result<SearchResult, CatalogError> {
        self.get_json(self.search_url(query, page)).await
    }

    async fn fetch_detail(&self, id: MovieId) -> Result<MovieDetail, CatalogError> {
        self.get_json(self.detail_url(id)).await
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
