use crate::models::{DislikeResponse, LikeResponse, PageQuery, Profile, ProfileId, StatsResponse};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

/// Errors that can occur when talking to the dating service
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: unknown or missing telegram id")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Remote collaborator consumed by the feed engine
///
/// The engine never talks HTTP directly; everything goes through this
/// trait so sessions can run against a scripted service in tests.
#[mockall::automock]
#[async_trait]
pub trait DatingApi: Send + Sync {
    /// Next page of candidates. An empty page signals exhaustion.
    async fn fetch_feed(&self, limit: u32, offset: u32) -> Result<Vec<Profile>, ApiError>;

    /// Like a profile and learn whether it produced a mutual match
    async fn decide_accept(&self, profile_id: ProfileId) -> Result<LikeResponse, ApiError>;

    /// Dislike a profile. Best-effort; callers do not rely on the payload.
    async fn decide_reject(&self, profile_id: ProfileId) -> Result<DislikeResponse, ApiError>;

    /// Profiles that liked the current user and have not been answered yet
    async fn fetch_liked_me(&self, limit: u32, offset: u32) -> Result<Vec<Profile>, ApiError>;

    async fn fetch_stats(&self) -> Result<StatsResponse, ApiError>;
}

/// HTTP client for the dating endpoints of the campus backend
pub struct HttpDatingApi {
    base_url: String,
    telegram_id: i64,
    client: Client,
}

impl HttpDatingApi {
    /// Create a new client
    pub fn new(base_url: impl Into<String>, telegram_id: i64, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into(),
            telegram_id,
            client,
        })
    }

    /// Build a client from loaded settings
    pub fn from_settings(settings: &crate::config::ApiSettings) -> Result<Self, ApiError> {
        Self::new(
            settings.base_url.clone(),
            settings.telegram_id,
            Duration::from_secs(settings.timeout_secs),
        )
    }

    fn page(limit: u32, offset: u32) -> Result<PageQuery, ApiError> {
        let query = PageQuery::new(limit, offset);
        query.validate().map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        Ok(query)
    }

    fn url(&self, path: &str, query: Option<PageQuery>) -> String {
        let telegram_id = self.telegram_id.to_string();
        let mut url = format!(
            "{}/{}?telegram_id={}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/'),
            urlencoding::encode(&telegram_id)
        );
        if let Some(query) = query {
            url.push('&');
            url.push_str(&query.to_query_string());
        }
        url
    }

    async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, ApiError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Failed to {}: {} - {}", what, status, body);
            return Err(ApiError::ApiError {
                status: status.as_u16(),
                message: format!("Failed to {}", what),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse {} response: {}", what, e)))
    }
}

#[async_trait]
impl DatingApi for HttpDatingApi {
    async fn fetch_feed(&self, limit: u32, offset: u32) -> Result<Vec<Profile>, ApiError> {
        let url = self.url("/dating/feed", Some(Self::page(limit, offset)?));
        tracing::debug!("Fetching feed page: limit={}, offset={}", limit, offset);

        let response = self.client.get(&url).send().await?;
        Self::read_json(response, "fetch feed").await
    }

    async fn decide_accept(&self, profile_id: ProfileId) -> Result<LikeResponse, ApiError> {
        let url = self.url(&format!("/dating/{}/like", profile_id), None);

        let response = self.client.post(&url).send().await?;
        let like: LikeResponse = Self::read_json(response, "like profile").await?;

        if !like.success {
            return Err(ApiError::ApiError {
                status: 200,
                message: like.error.unwrap_or_else(|| "like rejected by server".to_string()),
            });
        }

        tracing::debug!("Liked profile {} (match: {})", profile_id, like.is_match);
        Ok(like)
    }

    async fn decide_reject(&self, profile_id: ProfileId) -> Result<DislikeResponse, ApiError> {
        let url = self.url(&format!("/dating/{}/dislike", profile_id), None);

        let response = self.client.post(&url).send().await?;
        Self::read_json(response, "dislike profile").await
    }

    async fn fetch_liked_me(&self, limit: u32, offset: u32) -> Result<Vec<Profile>, ApiError> {
        let url = self.url("/dating/likes-received", Some(Self::page(limit, offset)?));

        let response = self.client.get(&url).send().await?;
        Self::read_json(response, "fetch likes received").await
    }

    async fn fetch_stats(&self) -> Result<StatsResponse, ApiError> {
        let url = self.url("/dating/stats", None);

        let response = self.client.get(&url).send().await?;
        Self::read_json(response, "fetch stats").await
    }
}
