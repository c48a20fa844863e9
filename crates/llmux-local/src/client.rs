// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for a local Ollama-compatible inference daemon.
//!
//! Model loading and inference internals belong to the daemon; from the
//! router's point of view this is just one more provider. No auth, no
//! internal retry.

use std::time::Duration;

use async_trait::async_trait;
use llmux_core::error::{LlmuxError, ProviderError};
use llmux_core::traits::ProviderClient;
use llmux_core::types::ProviderId;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// HTTP client for one local model.
#[derive(Debug, Clone)]
pub struct LocalClient {
    id: ProviderId,
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl LocalClient {
    /// Creates a client for `model` served at `endpoint`
    /// (e.g. `http://127.0.0.1:11434`).
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmuxError> {
        let client = reqwest::Client::builder()
            // Local inference on modest hardware can be slow to first byte.
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| LlmuxError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            id: ProviderId::new("local"),
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }
}

#[async_trait]
impl ProviderClient for LocalClient {
    fn id(&self) -> &ProviderId {
        &self.id
    }

    async fn send(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.endpoint))
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "local daemon response received");

        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            // The daemon has no auth or rate limiting; everything is Unknown.
            return Err(ProviderError::Unknown(format!("{status}: {body}")));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Unknown(format!("unparseable response body: {e}")))?;
        Ok(parsed.response)
    }
}

fn transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout {
            duration: Duration::from_secs(300),
        }
    } else if e.is_connect() {
        ProviderError::Unreachable(e.to_string())
    } else {
        ProviderError::Unknown(e.to_string())
    }
}
