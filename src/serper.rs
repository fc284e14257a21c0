use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::pipeline::ArtistLookup;

/// Client for the Serper web-search endpoint, used to fill in artists the
/// extraction model left blank.
#[derive(Clone)]
pub struct SerperClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
}

impl SerperClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    async fn search(&self, query: &str) -> Result<SearchResponse> {
        #[derive(Serialize)]
        struct SearchReq<'a> {
            q: &'a str,
        }

        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .post(url)
            .header("X-API-KEY", &self.api_key)
            .json(&SearchReq { q: query })
            .send()
            .await
            .context("failed to call serper search endpoint")?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("serper search returned {status}: {}", body.trim());
        }

        response
            .json::<SearchResponse>()
            .await
            .context("failed to decode serper search response")
    }
}

#[async_trait]
impl ArtistLookup for SerperClient {
    async fn lookup_artist(&self, song: &str) -> Option<String> {
        let query = format!("{song} song");
        match self.search(&query).await {
            Ok(results) => results
                .organic
                .first()
                .and_then(|top| artist_from_title(&top.title)),
            Err(err) => {
                tracing::warn!("artist lookup for {song:?} failed: {err:#}");
                None
            }
        }
    }
}

/// Search result titles for songs commonly read `"<title> by <artist>"`; the
/// artist is everything after the last `" by "`, trimmed.
fn artist_from_title(title: &str) -> Option<String> {
    let (_, artist) = title.rsplit_once(" by ")?;
    let artist = artist.trim();
    if artist.is_empty() {
        return None;
    }
    Some(artist.to_string())
}
