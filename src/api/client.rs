use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;

use crate::api::ChatRequest;
use crate::credentials::ApiKey;
use crate::error::{FncallError, Result};

/// Anything that can answer a chat-completions request.
///
/// The dispatch loop only talks to this trait, so tests can script replies
/// without a network.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<Value>;
}

pub struct HttpChatClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpChatClient {
    pub fn new(api_key: &ApiKey, endpoint: &str, timeout: Duration) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.expose()))
            .map_err(|_| {
                FncallError::CredentialError("API key contains invalid header characters".into())
            })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for HttpChatClient {
    async fn complete(&self, request: &ChatRequest) -> Result<Value> {
        let response = self.client.post(&self.endpoint).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FncallError::ApiError {
                status,
                message: error_text,
            });
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text)
            .map_err(|e| FncallError::malformed(format!("response body is not JSON: {}", e)))
    }
}
