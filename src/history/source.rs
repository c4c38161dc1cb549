//! History backend client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::config::HistoryConfig;

/// One opaque record from the history backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryRecord(pub String);

impl fmt::Display for HistoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors fetching history. Callers treat them as "no data".
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("History request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("History backend returned status {0}")]
    Status(u16),
}

/// Source of historical bridge records.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Fetch all records, in backend order.
    async fn fetch(&self) -> Result<Vec<HistoryRecord>, HistoryError>;
}

/// History source reached over HTTP; the endpoint returns a JSON string array.
#[derive(Debug, Clone)]
pub struct HttpHistorySource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpHistorySource {
    pub fn new(config: &HistoryConfig) -> Result<Self, HistoryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl HistorySource for HttpHistorySource {
    async fn fetch(&self) -> Result<Vec<HistoryRecord>, HistoryError> {
        let res = self.client.get(&self.endpoint).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(HistoryError::Status(status.as_u16()));
        }
        Ok(res.json().await?)
    }
}
