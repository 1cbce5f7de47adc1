use super::{SeedError, SeedRecord};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Somewhere a JSON array of seed records can be read from
#[async_trait]
pub trait SeedSource: Send + Sync {
    /// Human readable location, used in logs
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<Vec<SeedRecord>, SeedError>;
}

pub struct HttpSeedSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSeedSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SeedError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SeedError::Fetch(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl SeedSource for HttpSeedSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<Vec<SeedRecord>, SeedError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SeedError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SeedError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SeedError::Fetch(e.to_string()))?;
        debug!(url = %self.url, bytes = body.len(), "Fetched seed data");

        serde_json::from_slice(&body).map_err(|e| SeedError::Decode(e.to_string()))
    }
}

pub struct FileSeedSource {
    path: PathBuf,
}

impl FileSeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SeedSource for FileSeedSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Vec<SeedRecord>, SeedError> {
        let body = tokio::fs::read(&self.path)
            .await
            .map_err(|e| SeedError::Io(format!("{}: {}", self.path.display(), e)))?;

        serde_json::from_slice(&body).map_err(|e| SeedError::Decode(e.to_string()))
    }
}
