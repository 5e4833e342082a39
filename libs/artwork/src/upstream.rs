//! Catalog content API adapter
//!
//! One `fetch_artwork` call is one GET against the content API. The response
//! status decides the outcome before the body is looked at; only a 200 body
//! is parsed and validated.

use common::error::{ArtworkError, ArtworkResult};
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::model::ArtworkRecord;
use crate::validation::validate_artwork;

/// Where the content API lives and how it wraps its payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    /// Path between the base URL and the artwork id
    pub artwork_path: String,
    /// Member of the response object holding the artwork; `None` for a bare payload
    pub payload_key: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://paint.nginx".to_string(),
            artwork_path: "browsing/artwork".to_string(),
            payload_key: Some("data".to_string()),
        }
    }
}

impl UpstreamConfig {
    /// The older palette API, which serves the artwork unwrapped
    pub fn palette() -> Self {
        Self {
            base_url: "http://palette.nginx".to_string(),
            artwork_path: "artwork".to_string(),
            payload_key: None,
        }
    }
}

/// Outcome of an upstream call as told by its status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamStatus {
    Success,
    NotFound,
    OtherError(u16),
}

pub fn classify_status(status: u16) -> UpstreamStatus {
    match status {
        200 => UpstreamStatus::Success,
        404 => UpstreamStatus::NotFound,
        other => UpstreamStatus::OtherError(other),
    }
}

/// HTTP client for the catalog content API
#[derive(Debug, Clone)]
pub struct ArtworkClient {
    http: reqwest::Client,
    config: UpstreamConfig,
}

impl ArtworkClient {
    pub fn new(config: UpstreamConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(http: reqwest::Client, config: UpstreamConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// URL of one artwork, with the id encoded as a single path segment
    ///
    /// Ids that URL path normalization would drop (empty, `.` and `..`) are
    /// rejected instead of silently addressing the parent collection.
    pub fn artwork_url(&self, artwork_id: &str) -> ArtworkResult<Url> {
        if matches!(artwork_id, "" | "." | "..") {
            return Err(ArtworkError::InvalidId {
                artwork_id: artwork_id.to_string(),
            });
        }

        let mut url = Url::parse(&self.config.base_url).map_err(|e| {
            ArtworkError::Transport(format!(
                "invalid upstream base URL {:?}: {}",
                self.config.base_url, e
            ))
        })?;

        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ArtworkError::Transport(format!(
                    "upstream base URL {:?} cannot carry a path",
                    self.config.base_url
                ))
            })?;
            segments
                .pop_if_empty()
                .extend(self.config.artwork_path.split('/').filter(|s| !s.is_empty()))
                .push(artwork_id);
        }

        Ok(url)
    }

    /// Fetch and validate one artwork
    pub async fn fetch_artwork(&self, artwork_id: &str) -> ArtworkResult<ArtworkRecord> {
        let url = self.artwork_url(artwork_id)?;
        debug!("Fetching artwork {} from {}", artwork_id, url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ArtworkError::Transport(e.to_string()))?;

        match classify_status(response.status().as_u16()) {
            UpstreamStatus::Success => {}
            UpstreamStatus::NotFound => {
                debug!("Artwork {} does not exist upstream", artwork_id);
                return Err(ArtworkError::NotFound {
                    artwork_id: artwork_id.to_string(),
                });
            }
            UpstreamStatus::OtherError(status) => {
                let body = response.text().await.unwrap_or_else(|e| {
                    debug!(
                        "Failed to read the {} response body for artwork {}: {}",
                        status, artwork_id, e
                    );
                    String::new()
                });
                return Err(ArtworkError::Upstream { status, body });
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ArtworkError::MalformedResponse(format!("failed to read body: {}", e)))?;
        let document: Value = serde_json::from_slice(&body)
            .map_err(|e| ArtworkError::MalformedResponse(format!("body is not JSON: {}", e)))?;

        let payload = match &self.config.payload_key {
            Some(key) => document.get(key.as_str()).ok_or_else(|| {
                ArtworkError::MalformedResponse(format!("response has no `{}` member", key))
            })?,
            None => &document,
        };

        validate_artwork(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status() {
        assert_eq!(classify_status(200), UpstreamStatus::Success);
        assert_eq!(classify_status(404), UpstreamStatus::NotFound);
        assert_eq!(classify_status(500), UpstreamStatus::OtherError(500));
        assert_eq!(classify_status(201), UpstreamStatus::OtherError(201));
        assert_eq!(classify_status(410), UpstreamStatus::OtherError(410));
    }

    #[test]
    fn test_artwork_url() {
        let client = ArtworkClient::new(UpstreamConfig::default());
        assert_eq!(
            client.artwork_url("3353900").unwrap().as_str(),
            "http://paint.nginx/browsing/artwork/3353900"
        );

        let client = ArtworkClient::new(UpstreamConfig::palette());
        assert_eq!(
            client.artwork_url("3353900").unwrap().as_str(),
            "http://palette.nginx/artwork/3353900"
        );
    }

    #[test]
    fn test_artwork_id_stays_one_segment() {
        let client = ArtworkClient::new(UpstreamConfig {
            base_url: "http://catalog.local/api/".to_string(),
            ..UpstreamConfig::default()
        });

        assert_eq!(
            client.artwork_url("12/../34").unwrap().as_str(),
            "http://catalog.local/api/browsing/artwork/12%2F..%2F34"
        );
    }

    #[test]
    fn test_dot_segment_ids_are_rejected() {
        let client = ArtworkClient::new(UpstreamConfig::default());

        for artwork_id in ["", ".", ".."] {
            match client.artwork_url(artwork_id) {
                Err(ArtworkError::InvalidId { artwork_id: rejected }) => {
                    assert_eq!(rejected, artwork_id)
                }
                other => panic!("expected {:?} to be rejected, got {:?}", artwork_id, other),
            }
        }

        assert_eq!(
            client.artwork_url("...").unwrap().as_str(),
            "http://paint.nginx/browsing/artwork/..."
        );
    }

    #[tokio::test]
    async fn test_fetch_rejects_dot_segment_ids_without_a_request() {
        let client = ArtworkClient::new(UpstreamConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            ..UpstreamConfig::default()
        });

        let err = client.fetch_artwork("..").await.unwrap_err();
        assert!(matches!(err, ArtworkError::InvalidId { .. }), "got {:?}", err);
    }

    #[test]
    fn test_invalid_base_url() {
        let client = ArtworkClient::new(UpstreamConfig {
            base_url: "not a url".to_string(),
            ..UpstreamConfig::default()
        });

        assert!(matches!(
            client.artwork_url("1"),
            Err(ArtworkError::Transport(_))
        ));
    }
}
