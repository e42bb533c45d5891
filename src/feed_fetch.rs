// src/feed_fetch.rs
use crate::announcement::Announcement;
use crate::errors::FeedError;
use async_trait::async_trait;
use log::{info, warn};
use reqwest::{Client, Response};
use url::Url;

/// Path of the snapshot endpoint, relative to the portal base address.
const SNAPSHOT_PATH: &str = "api/announcements";

pub fn snapshot_url(base: &Url) -> String {
    format!("{}/{}", base.as_str().trim_end_matches('/'), SNAPSHOT_PATH)
}

// ===== fetcher
#[async_trait]
pub trait SnapshotFetcher: Send + Sync {
    /// Pulls the current full announcement list, in server order. The bearer
    /// token is attached only when the session carries one.
    async fn fetch_snapshot(
        &self,
        base: &Url,
        token: Option<&str>,
    ) -> Result<Vec<Announcement>, FeedError>;
}

// ===== Live http fetcher
pub struct HttpSnapshotFetcher {
    client: Client,
}

impl HttpSnapshotFetcher {
    pub fn new() -> Self {
        const APP_USER_AGENT: &str = concat!("portero/", env!("CARGO_PKG_VERSION"));

        let client: Client = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create request client.");

        Self { client }
    }
}

impl Default for HttpSnapshotFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotFetcher for HttpSnapshotFetcher {
    async fn fetch_snapshot(
        &self,
        base: &Url,
        token: Option<&str>,
    ) -> Result<Vec<Announcement>, FeedError> {
        let url = snapshot_url(base);
        info!("HttpSnapshotFetcher: fetching {}", url);

        let mut request = self.client.get(&url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        } else {
            warn!("HttpSnapshotFetcher: no cached token, requesting unauthenticated");
        }

        let response: Response = request.send().await?;
        if !response.status().is_success() {
            return Err(FeedError::Status(response.status()));
        }

        let body = response.text().await?;
        let announcements: Vec<Announcement> = serde_json::from_str(&body)?;
        info!("HttpSnapshotFetcher: snapshot holds {} announcements", announcements.len());
        Ok(announcements)
    }
}

// ===== Fake fetcher for testing
pub struct FakeFetcher {
    pub response: String,
}

#[async_trait]
impl SnapshotFetcher for FakeFetcher {
    async fn fetch_snapshot(
        &self,
        _base: &Url,
        _token: Option<&str>,
    ) -> Result<Vec<Announcement>, FeedError> {
        Ok(serde_json::from_str(&self.response)?)
    }
}
