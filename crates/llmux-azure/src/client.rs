// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Azure OpenAI chat completions API.
//!
//! One request per call, no internal retry: the router owns all retry and
//! fallback policy, so this client only translates outcomes into the fixed
//! `ProviderError` taxonomy.

use std::time::Duration;

use async_trait::async_trait;
use llmux_core::error::{LlmuxError, ProviderError};
use llmux_core::traits::ProviderClient;
use llmux_core::types::ProviderId;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::types::{ApiErrorResponse, ChatMessage, ChatRequest, ChatResponse};

/// API version pinned for the deployments endpoint.
const API_VERSION: &str = "2024-06-01";

/// HTTP client for one Azure OpenAI deployment.
#[derive(Debug, Clone)]
pub struct AzureClient {
    id: ProviderId,
    client: reqwest::Client,
    endpoint: String,
    deployment: String,
}

impl AzureClient {
    /// Creates a client for `deployment` on the given resource endpoint,
    /// e.g. `https://my-resource.openai.azure.com`.
    pub fn new(
        api_key: &str,
        endpoint: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Result<Self, LlmuxError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "api-key",
            HeaderValue::from_str(api_key)
                .map_err(|e| LlmuxError::Config(format!("invalid Azure API key header value: {e}")))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| LlmuxError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            id: ProviderId::new("azure"),
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            deployment: deployment.into(),
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={API_VERSION}",
            self.endpoint, self.deployment
        )
    }
}

#[async_trait]
impl ProviderClient for AzureClient {
    fn id(&self) -> &ProviderId {
        &self.id
    }

    async fn send(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = ChatRequest {
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: None,
        };

        let response = self
            .client
            .post(self.url())
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        debug!(status = %status, deployment = %self.deployment, "azure response received");

        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Unknown(format!("unparseable response body: {e}")))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ProviderError::Unknown("response contained no choices".to_string()))
    }
}

/// Maps a transport-level failure into the provider error taxonomy.
fn transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout {
            duration: Duration::from_secs(120),
        }
    } else if e.is_connect() {
        ProviderError::Unreachable(e.to_string())
    } else {
        ProviderError::Unknown(e.to_string())
    }
}

/// Maps an HTTP error status into the provider error taxonomy.
fn status_error(status: reqwest::StatusCode, body: &str) -> ProviderError {
    let detail = match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(err) => format!("{} ({})", err.error.message, err.error.code),
        Err(_) => format!("{status}: {body}"),
    };
    match status.as_u16() {
        429 => ProviderError::RateLimited(detail),
        401 | 403 => ProviderError::AuthFailed(detail),
        _ => ProviderError::Unknown(detail),
    }
}
