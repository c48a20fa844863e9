// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini generateContent API.
//!
//! No internal retry; the router owns fallback policy.

use std::time::Duration;

use async_trait::async_trait;
use llmux_core::error::{LlmuxError, ProviderError};
use llmux_core::traits::ProviderClient;
use llmux_core::types::ProviderId;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::types::{ApiErrorResponse, Content, GenerateRequest, GenerateResponse, Part};

/// Default base URL for the Generative Language API.
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// HTTP client for one Gemini model.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    id: ProviderId,
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Creates a client for `model`. `base_url` overrides the public API
    /// endpoint (used in tests and proxies); pass `None` for the default.
    pub fn new(
        api_key: &str,
        model: impl Into<String>,
        base_url: Option<String>,
    ) -> Result<Self, LlmuxError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(api_key)
                .map_err(|e| LlmuxError::Config(format!("invalid Gemini API key header value: {e}")))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| LlmuxError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            id: ProviderId::new("gemini"),
            client,
            base_url: base_url
                .unwrap_or_else(|| API_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: model.into(),
        })
    }

    fn url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ProviderClient for GeminiClient {
    fn id(&self) -> &ProviderId {
        &self.id
    }

    async fn send(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(self.url())
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "gemini response received");

        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Unknown(format!("unparseable response body: {e}")))?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ProviderError::Unknown(
                "response contained no candidates".to_string(),
            ));
        }
        Ok(text)
    }
}

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

fn status_error(status: reqwest::StatusCode, body: &str) -> ProviderError {
    let detail = match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(err) => format!("{} ({} {})", err.error.message, err.error.code, err.error.status),
        Err(_) => format!("{status}: {body}"),
    };
    match status.as_u16() {
        429 => ProviderError::RateLimited(detail),
        401 | 403 => ProviderError::AuthFailed(detail),
        _ => ProviderError::Unknown(detail),
    }
}
