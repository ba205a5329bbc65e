//! Remote image API client.
//!
//! Wraps a Pixabay-shaped HTTP endpoint behind the [`SearchBackend`] trait
//! so the app and tests can swap the transport out. The client itself is a
//! thin `ureq` agent: compose the query string, deserialize the JSON page,
//! map the payload into [`ImageRecord`]s.

use std::time::Duration;

use serde::Deserialize;
use ureq::Agent;

use crate::search::{ImageRecord, PageResult};

pub const DEFAULT_ENDPOINT: &str = "https://pixabay.com/api/";
pub const DEFAULT_PER_PAGE: u32 = 12;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors surfaced by the remote image source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("image service returned HTTP {0}")]
    Status(u16),
    #[error("{0}")]
    Transport(String),
    #[error("malformed response from image service: {0}")]
    Malformed(String),
}

impl RemoteError {
    /// User-facing text for the error toast.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Remote collaborator: paginated image search plus thumbnail bytes.
pub trait SearchBackend: Send + Sync {
    /// Fetch one page of results for `query`. `page` is 1-based.
    fn search(&self, query: &str, page: u64) -> Result<PageResult, RemoteError>;

    /// Fetch the raw bytes of a thumbnail rendition.
    fn fetch_thumbnail(&self, url: &str) -> Result<Vec<u8>, RemoteError>;
}

#[derive(Debug, Deserialize)]
struct HitPayload {
    id: u64,
    #[serde(default)]
    tags: String,
    #[serde(rename = "webformatURL")]
    webformat_url: String,
    #[serde(rename = "largeImageURL")]
    large_image_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "totalHits")]
    total_hits: u64,
    hits: Vec<HitPayload>,
}

impl From<HitPayload> for ImageRecord {
    fn from(hit: HitPayload) -> Self {
        Self {
            id: hit.id.to_string(),
            tags: hit.tags,
            thumbnail_url: hit.webformat_url,
            full_image_url: hit.large_image_url,
        }
    }
}

/// Pixabay API client.
#[derive(Clone)]
pub struct PixabayClient {
    agent: Agent,
    endpoint: String,
    api_key: String,
    per_page: u32,
}

impl PixabayClient {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT.to_string())
    }

    pub fn with_endpoint(api_key: String, endpoint: String) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .new_agent();
        Self {
            agent,
            endpoint,
            api_key,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    #[must_use]
    pub const fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub const fn per_page(&self) -> u32 {
        self.per_page
    }
}

fn transport_error(err: &ureq::Error) -> RemoteError {
    match err {
        ureq::Error::StatusCode(code) => RemoteError::Status(*code),
        other => RemoteError::Transport(other.to_string()),
    }
}

impl SearchBackend for PixabayClient {
    fn search(&self, query: &str, page: u64) -> Result<PageResult, RemoteError> {
        let mut response = self
            .agent
            .get(&self.endpoint)
            .query("key", &self.api_key)
            .query("q", query)
            .query("page", page.to_string())
            .query("per_page", self.per_page.to_string())
            .query("image_type", "photo")
            .query("orientation", "horizontal")
            .query("safesearch", "true")
            .call()
            .map_err(|err| transport_error(&err))?;

        let payload: SearchResponse = response
            .body_mut()
            .read_json()
            .map_err(|err| RemoteError::Malformed(err.to_string()))?;

        Ok(PageResult {
            hits: payload.hits.into_iter().map(ImageRecord::from).collect(),
            total_hits: payload.total_hits,
        })
    }

    fn fetch_thumbnail(&self, url: &str) -> Result<Vec<u8>, RemoteError> {
        let mut response = self
            .agent
            .get(url)
            .call()
            .map_err(|err| transport_error(&err))?;
        response
            .body_mut()
            .read_to_vec()
            .map_err(|err| RemoteError::Transport(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PAGE: &str = r#"{
        "total": 4692,
        "totalHits": 500,
        "hits": [
            {
                "id": 195893,
                "pageURL": "https://pixabay.com/en/blossom-bloom-flower-195893/",
                "type": "photo",
                "tags": "blossom, bloom, flower",
                "previewURL": "https://cdn.pixabay.com/photo/195893_150.jpg",
                "webformatURL": "https://pixabay.com/get/35bbf209e13e39d2_640.jpg",
                "largeImageURL": "https://pixabay.com/get/ed6a99fd0a76647_1280.jpg",
                "imageWidth": 4000,
                "imageHeight": 2250,
                "views": 7671,
                "downloads": 6439,
                "likes": 5,
                "user": "Josch13"
            }
        ]
    }"#;

    #[test]
    fn test_sample_payload_deserializes() {
        let payload: SearchResponse = serde_json::from_str(SAMPLE_PAGE).unwrap();
        assert_eq!(payload.total_hits, 500);
        assert_eq!(payload.hits.len(), 1);
        assert_eq!(payload.hits[0].id, 195_893);
    }

    #[test]
    fn test_hit_maps_to_image_record() {
        let payload: SearchResponse = serde_json::from_str(SAMPLE_PAGE).unwrap();
        let record = ImageRecord::from(payload.hits.into_iter().next().unwrap());
        assert_eq!(record.id, "195893");
        assert_eq!(record.tags, "blossom, bloom, flower");
        assert_eq!(
            record.thumbnail_url,
            "https://pixabay.com/get/35bbf209e13e39d2_640.jpg"
        );
        assert_eq!(
            record.full_image_url,
            "https://pixabay.com/get/ed6a99fd0a76647_1280.jpg"
        );
    }

    #[test]
    fn test_missing_tags_default_to_empty() {
        let json = r#"{
            "totalHits": 1,
            "hits": [{
                "id": 7,
                "webformatURL": "https://x/7_640.jpg",
                "largeImageURL": "https://x/7_1280.jpg"
            }]
        }"#;
        let payload: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(payload.hits[0].tags, "");
    }

    #[test]
    fn test_client_defaults() {
        let client = PixabayClient::new("key".to_string());
        assert_eq!(client.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(client.per_page(), DEFAULT_PER_PAGE);
    }

    #[test]
    fn test_custom_endpoint_and_page_size() {
        let client = PixabayClient::with_endpoint("key".to_string(), "https://example.com/api".to_string())
            .with_per_page(40);
        assert_eq!(client.endpoint(), "https://example.com/api");
        assert_eq!(client.per_page(), 40);
    }

    #[test]
    fn test_remote_error_messages() {
        assert_eq!(
            RemoteError::Status(429).message(),
            "image service returned HTTP 429"
        );
        assert_eq!(RemoteError::Transport("timeout".to_string()).message(), "timeout");
    }
}
