//! Gemini backend implementation.
//!
//! One HTTPS POST to `generateContent` per call. The credential travels in the
//! `key` query parameter, not a header.

use super::Generator;
use crate::config::Config;
use crate::error::GeminiError;
use crate::protocol::{GenerateRequest, ResponseDocument};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Gemini backend for the Generative Language API.
pub struct GeminiClient {
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl GeminiClient {
    /// Create a new Gemini client from configuration and the credential
    /// resolved at startup.
    pub fn new(config: &Config, api_key: Option<String>) -> Result<Self, GeminiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.http.connect_timeout_secs))
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .build()?;

        Ok(Self::with_client(client, config.endpoint(), api_key))
    }

    /// Build around an existing HTTP client.
    pub fn with_client(client: Client, endpoint: String, api_key: Option<String>) -> Self {
        Self {
            endpoint,
            api_key,
            client,
        }
    }
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<ResponseDocument, GeminiError> {
        let api_key = self.api_key.as_deref().ok_or(GeminiError::AuthMissing)?;

        debug!("POST {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .header("Content-Type", "application/json")
            .json(&GenerateRequest::from_prompt(prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GeminiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Received {} bytes", body.len());
        ResponseDocument::from_body(&body)
    }
}
