//! Query submission over HTTP
//!
//! One query, one POST, one response. No retries, no caching: failure
//! handling belongs to the session, which swallows every [`ClientError`]
//! into the synthetic error payload.

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use advisor_core::response::{Query, RawResponse};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, instrument};

/// Seam between the session and the network. The session only ever sees
/// this trait, which keeps the busy guard and recovery logic testable
/// without a live service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Submitter: Send + Sync {
    /// Issue exactly one request carrying the query text.
    async fn submit(&self, query: &Query) -> Result<RawResponse>;
}

#[derive(Serialize)]
struct QueryBody<'a> {
    query: &'a str,
}

/// HTTP client for the analysis service.
pub struct AgentClient {
    client: Client,
    config: ClientConfig,
}

impl AgentClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl Submitter for AgentClient {
    #[instrument(skip(self, query), fields(endpoint = %self.config.endpoint))]
    async fn submit(&self, query: &Query) -> Result<RawResponse> {
        debug!("submitting query to analysis service");

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&QueryBody { query: query.text() })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        // Decode into a generic value first: the service may answer with a
        // structured object, a wrapped object, or a bare string, and none
        // of those should be a decode error.
        let text = response.text().await?;
        let body: serde_json::Value = serde_json::from_str(&text)?;
        debug!("received response body");
        Ok(RawResponse::from_value(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation_keeps_config() {
        let config = ClientConfig::default().with_timeout_secs(3);
        let client = AgentClient::new(config).unwrap();
        assert_eq!(client.config().endpoint, "http://127.0.0.1:5000/ask_agent");
        assert_eq!(client.config().timeout.as_secs(), 3);
    }

    #[test]
    fn query_body_serializes_as_the_service_expects() {
        let query = Query::parse("should I buy TSLA?").unwrap();
        let body = serde_json::to_value(QueryBody { query: query.text() }).unwrap();
        assert_eq!(body, serde_json::json!({ "query": "should I buy TSLA?" }));
    }
}
