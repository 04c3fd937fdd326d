use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::app_config::ChunkerConfig;
use crate::errors::ChunkerError;
use crate::providers::PhraseChunker;
use crate::transcript::{PhraseBoundaries, Word};

/// Client for the local phrase chunking service
#[derive(Debug)]
pub struct HttpChunker {
    /// Base URL of the service
    base_url: String,
    /// HTTP client for making requests
    client: Client,
}

/// Chunking request sent to the service
#[derive(Debug, Serialize, Deserialize)]
pub struct ChunkRequest {
    /// Word texts in transcript order
    words: Vec<String>,
}

/// Chunking response from the service
#[derive(Debug, Serialize, Deserialize)]
pub struct ChunkResponse {
    /// 0-based indices of phrase-final words
    pub boundaries: Vec<usize>,
}

impl HttpChunker {
    /// Create a new client from the chunker section of the configuration.
    ///
    /// Fails when the HTTP client cannot be built, instead of silently
    /// continuing without the configured request timeout.
    pub fn new(config: &ChunkerConfig) -> Result<Self> {
        let base_url = config.endpoint.trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client for the chunking service")?;

        Ok(HttpChunker { base_url, client })
    }
}

#[async_trait]
impl PhraseChunker for HttpChunker {
    async fn chunk(&self, words: &[Word]) -> Result<PhraseBoundaries, ChunkerError> {
        let url = format!("{}/chunk", self.base_url);
        let request = ChunkRequest {
            words: words.iter().map(|w| w.text.clone()).collect(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ChunkerError::Unavailable(e.to_string())
                } else {
                    ChunkerError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!("Chunking service returned {}: {}", status, message);
            return Err(ChunkerError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let parsed: ChunkResponse = response
            .json()
            .await
            .map_err(|e| ChunkerError::ParseError(e.to_string()))?;

        // Indices past the end of the word list are service bugs; drop them
        let word_count = words.len();
        let boundaries: PhraseBoundaries = parsed
            .boundaries
            .into_iter()
            .filter(|&i| i < word_count)
            .collect();

        debug!(
            "Chunking service returned {} phrase boundaries for {} words",
            boundaries.len(),
            word_count
        );
        Ok(boundaries)
    }

    async fn test_connection(&self) -> Result<(), ChunkerError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ChunkerError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ChunkerError::Unavailable(format!(
                "Health check returned status {}",
                response.status()
            )));
        }

        Ok(())
    }
}
