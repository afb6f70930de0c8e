//! HTTP client for the chat endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

use crate::types::{ChatReply, ChatRequest, HealthStatus, ReadyStatus};
use crate::{Error, Result};

/// One request/response round trip with a chat backend.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a message and wait for the reply.
    ///
    /// Any transport error, non-success status or unparsable body is an `Err`.
    async fn exchange(&self, request: &ChatRequest) -> Result<ChatReply>;
}

/// HTTP client for the chat endpoint
#[derive(Debug, Clone)]
pub struct ChatClient {
    base_url: String,
    client: Client,
}

impl ChatClient {
    /// Create a new client with the given base URL
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a client that reuses an existing reqwest client
    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========================================================================
    // Internal HTTP Methods
    // ========================================================================

    /// Make a GET request
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;

        Self::decode(response).await
    }

    /// Make a POST request
    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        // Read as text first so a malformed body surfaces as a JSON error
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    // ========================================================================
    // Chat API
    // ========================================================================

    /// Send a chat message
    pub async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        self.post("/api/chat", request).await
    }

    /// Check that the chat route is mounted
    pub async fn ready(&self) -> Result<ReadyStatus> {
        self.get("/api/chat").await
    }

    // ========================================================================
    // Health API
    // ========================================================================

    /// Fetch the liveness payload
    pub async fn health(&self) -> Result<HealthStatus> {
        self.get("/health").await
    }

    /// Check if the endpoint is healthy
    pub async fn is_healthy(&self) -> bool {
        match self.health().await {
            Ok(status) => status.is_ok(),
            Err(err) => {
                tracing::debug!("Health check failed: {}", err);
                false
            }
        }
    }
}

#[async_trait]
impl ChatTransport for ChatClient {
    async fn exchange(&self, request: &ChatRequest) -> Result<ChatReply> {
        self.send_chat(request).await
    }
}
