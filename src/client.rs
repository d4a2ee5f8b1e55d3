use std::fmt;
use std::time::Duration;
use url::Url;

use crate::models::{ApiResponse, Influencer};

/// Filters sent with a list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub limit: u32,
    pub search: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug)]
pub enum ClientError {
    /// The configured base URL cannot address the API.
    InvalidBaseUrl(String),
    /// The request never produced a response.
    Transport(reqwest::Error),
    /// The response body is not an envelope.
    Decode(reqwest::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::InvalidBaseUrl(msg) => write!(f, "Invalid base URL: {}", msg),
            ClientError::Transport(e) => write!(f, "Request failed: {}", e),
            ClientError::Decode(e) => write!(f, "Failed to parse response: {}", e),
        }
    }
}

impl std::error::Error for ClientError {}

/// HTTP client for the influencer collection endpoint.
#[derive(Clone)]
pub struct InfluencerApiClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl InfluencerApiClient {
    /// Creates a client for the API served at `base_url`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Scheme and authority of the server, e.g. `http://localhost:3000`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let endpoint = Url::parse(base_url)
            .and_then(|base| base.join("/api/influencers"))
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ClientError::Transport)?;

        Ok(Self { client, endpoint })
    }

    /// Builds the list URL; `search` and `status` are only sent when non-empty.
    pub fn list_url(&self, request: &ListRequest) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("limit", &request.limit.to_string());
            if let Some(search) = request.search.as_deref().filter(|s| !s.is_empty()) {
                pairs.append_pair("search", search);
            }
            if let Some(status) = request.status.as_deref().filter(|s| !s.is_empty()) {
                pairs.append_pair("status", status);
            }
        }
        url
    }

    /// Fetches one page of influencers.
    ///
    /// Error envelopes are returned as `Ok`, whatever the HTTP status; only
    /// transport and decoding failures are errors.
    pub async fn list(
        &self,
        request: &ListRequest,
    ) -> Result<ApiResponse<Vec<Influencer>>, ClientError> {
        let url = self.list_url(request);
        tracing::debug!("Fetching influencers: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        let status = response.status();
        let envelope: ApiResponse<Vec<Influencer>> =
            response.json().await.map_err(ClientError::Decode)?;

        tracing::debug!(
            "Influencer list responded {} with {} row(s)",
            status,
            envelope.data.len()
        );
        Ok(envelope)
    }
}
