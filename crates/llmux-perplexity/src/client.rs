// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Perplexity chat completions API.
//!
//! Online models answer from live search, which is why this backend is
//! registered with a current-data strength. No internal retry; the router
//! owns fallback policy.

use std::time::Duration;

use async_trait::async_trait;
use llmux_core::error::{LlmuxError, ProviderError};
use llmux_core::traits::ProviderClient;
use llmux_core::types::ProviderId;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::types::{ChatMessage, ChatRequest, ChatResponse};

/// Default base URL for the Perplexity API.
const API_BASE_URL: &str = "https://api.perplexity.ai";

/// HTTP client for one Perplexity model.
#[derive(Debug, Clone)]
pub struct PerplexityClient {
    id: ProviderId,
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl PerplexityClient {
    /// Creates a client for `model`. `base_url` overrides the public API
    /// endpoint; pass `None` for the default.
    pub fn new(
        api_key: &str,
        model: impl Into<String>,
        base_url: Option<String>,
    ) -> Result<Self, LlmuxError> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {api_key}");
        headers.insert(
            "authorization",
            HeaderValue::from_str(&bearer).map_err(|e| {
                LlmuxError::Config(format!("invalid Perplexity API key header value: {e}"))
            })?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| LlmuxError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            id: ProviderId::new("perplexity"),
            client,
            base_url: base_url
                .unwrap_or_else(|| API_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: model.into(),
        })
    }
}

#[async_trait]
impl ProviderClient for PerplexityClient {
    fn id(&self) -> &ProviderId {
        &self.id
    }

    async fn send(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "perplexity response received");

        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(match status.as_u16() {
                429 => ProviderError::RateLimited(body),
                401 | 403 => ProviderError::AuthFailed(body),
                _ => ProviderError::Unknown(format!("{status}: {body}")),
            });
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

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn send_passes_model_and_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer pplx-key"))
            .and(body_partial_json(serde_json::json!({"model": "sonar-pro"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "It is 2026"}}]
            })))
            .mount(&server)
            .await;

        let client = PerplexityClient::new("pplx-key", "sonar-pro", Some(server.uri())).unwrap();
        assert_eq!(client.send("what year is it?").await.unwrap(), "It is 2026");
    }

    #[tokio::test]
    async fn quota_exceeded_maps_to_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let client = PerplexityClient::new("pplx-key", "sonar-pro", Some(server.uri())).unwrap();
        let err = client.send("hi").await.unwrap_err();
        assert!(matches!(err, ProviderError::RateLimited(_)), "got: {err}");
    }

    #[tokio::test]
    async fn invalid_token_maps_to_auth_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
            .mount(&server)
            .await;

        let client = PerplexityClient::new("bad", "sonar-pro", Some(server.uri())).unwrap();
        let err = client.send("hi").await.unwrap_err();
        assert!(matches!(err, ProviderError::AuthFailed(_)), "got: {err}");
    }

    #[tokio::test]
    async fn connection_refused_maps_to_unreachable() {
        let client =
            PerplexityClient::new("k", "sonar-pro", Some("http://127.0.0.1:1".into())).unwrap();
        let err = client.send("hi").await.unwrap_err();
        assert!(matches!(err, ProviderError::Unreachable(_)), "got: {err}");
    }
}
