//! Raw HTTP client for the queue-status endpoint.
//!
//! No dashboard awareness — just makes the two calls via reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::filter::sort_by_start_time;
use super::types::{PickRequest, QueueItem};
use super::QueueService;

/// Errors from queue endpoint operations.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error! status: {status}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    Parse(String),
}

/// HTTP client bound to one endpoint URL. Reads and claims share the URL.
#[derive(Debug, Clone)]
pub struct QueueClient {
    http: Client,
    endpoint: String,
}

impl QueueClient {
    /// Create a client with reqwest's default settings (no request timeout).
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Create a client whose requests fail after `timeout`.
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, QueueError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `GET <endpoint>` and decode the snapshot, sorted by start time.
    pub async fn fetch_snapshot(&self) -> Result<Vec<QueueItem>, QueueError> {
        let response = self.http.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "(no body)".into());
            return Err(QueueError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let mut items: Vec<QueueItem> = serde_json::from_slice(&bytes)
            .map_err(|e| QueueError::Parse(format!("failed to parse queue snapshot: {e}")))?;

        sort_by_start_time(&mut items);
        debug!(count = items.len(), "fetched queue snapshot");
        Ok(items)
    }

    /// `POST <endpoint>` a claim. Only the status code matters.
    pub async fn submit_pick(&self, request: &PickRequest) -> Result<(), QueueError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "(no body)".into());
            return Err(QueueError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl QueueService for QueueClient {
    async fn fetch_snapshot(&self) -> Result<Vec<QueueItem>, QueueError> {
        QueueClient::fetch_snapshot(self).await
    }

    async fn submit_pick(&self, request: &PickRequest) -> Result<(), QueueError> {
        QueueClient::submit_pick(self, request).await
    }
}
