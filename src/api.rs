use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use tracing::{debug, error};

use crate::error::{BotError, Result};

/// Source of homework status answers.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch the statuses changed since `from_date` (unix seconds) as raw JSON.
    async fn fetch(&self, from_date: i64) -> Result<Value>;
}

/// Shared HTTP client with a per-request timeout.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| BotError::Transport {
            endpoint: "<client>".to_string(),
            reason: e.to_string(),
        })
}

/// Review API client authenticated with an OAuth token.
pub struct PracticumClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl StatusSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> Result<Value> {
        debug!("GET {} from_date={from_date}", self.endpoint);
        let response = self
            .http
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| {
                error!("No access to {}: {e}", self.endpoint);
                BotError::Transport {
                    endpoint: self.endpoint.clone(),
                    reason: e.to_string(),
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            error!("{} answered with status {status}", self.endpoint);
            return Err(BotError::BadStatus {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| BotError::Decode(e.to_string()))?;
        debug!("Answer received from {}", self.endpoint);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A URL that will always refuse connections (port 1 is reserved and unbound)
    const UNREACHABLE_URL: &str = "http://127.0.0.1:1/api/user_api/homework_statuses/";

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        let http = build_http_client(Duration::from_secs(5)).unwrap();
        let client = PracticumClient::new(http, UNREACHABLE_URL, "token");
        let err = client.fetch(0).await.unwrap_err();

        match &err {
            BotError::Transport { endpoint, .. } => assert_eq!(endpoint, UNREACHABLE_URL),
            other => panic!("expected BotError::Transport, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_error_mentions_endpoint() {
        let http = build_http_client(Duration::from_secs(5)).unwrap();
        let client = PracticumClient::new(http, UNREACHABLE_URL, "token");
        let err = client.fetch(1000).await.unwrap_err();
        assert!(err.to_string().contains("127.0.0.1:1"), "{err}");
    }

    #[test]
    fn endpoint_accessor() {
        let client = PracticumClient::new(reqwest::Client::new(), "http://localhost/x", "t");
        assert_eq!(client.endpoint(), "http://localhost/x");
    }
}
