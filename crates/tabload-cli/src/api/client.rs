//! HTTP API client for the collection store
//!
//! Every call goes through [`ApiClient::send_with_retry`], the only retry loop
//! in the system.

use crate::api::retry::RetryPolicy;
use crate::api::{endpoints, types::*};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tabload_common::types::Record;
use tabload_common::TransportError;
use tracing::{debug, instrument, warn};

// ============================================================================
// API Client Constants
// ============================================================================

/// Default timeout for a single HTTP request in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

type Result<T> = std::result::Result<T, TransportError>;

/// API client for the collection store
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>, timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        let base_url = base_url.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::request(base_url.as_str(), e))?;

        Ok(Self {
            client,
            base_url,
            retry,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Exchange credentials for a bearer token
    #[instrument(skip(self, password), fields(base_url = %self.base_url))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<AccessToken> {
        let url = endpoints::endpoint_url(&self.base_url, endpoints::AUTHENTICATE);
        let form = [
            ("Grant", "password"),
            ("Username", username),
            ("Password", password),
        ];

        let response = self
            .send_with_retry(endpoints::AUTHENTICATE, || {
                self.client.post(&url).form(&form)
            })
            .await?;

        let auth: AuthResponse = decode(endpoints::AUTHENTICATE, response).await?;
        debug!("Authenticated");
        Ok(AccessToken::new(auth.accesstoken))
    }

    /// Submit one batch of items to a collection
    pub async fn add_items(
        &self,
        token: &AccessToken,
        collection: &str,
        items: &[Record],
    ) -> Result<()> {
        let request = AddItemsRequest {
            collection_name: collection,
            items,
        };
        self.post(endpoints::ADD_ITEMS, token, &request).await?;
        Ok(())
    }

    /// Fetch the collection's declared row count and field list
    pub async fn collection_details(
        &self,
        token: &AccessToken,
        collection: &str,
    ) -> Result<CollectionDetails> {
        let request = CollectionRequest {
            collection_name: collection,
        };
        let response = self
            .post(endpoints::COLLECTION_DETAILS, token, &request)
            .await?;
        decode(endpoints::COLLECTION_DETAILS, response).await
    }

    /// Fetch one item by key, requesting the given attribute names
    pub async fn get_item(
        &self,
        token: &AccessToken,
        collection: &str,
        key: &str,
        attributes: Vec<String>,
    ) -> Result<GetItemResponse> {
        let request = GetItemRequest {
            collection_name: collection,
            attributes,
            key,
        };
        let response = self.post(endpoints::GET_ITEM, token, &request).await?;
        decode(endpoints::GET_ITEM, response).await
    }

    async fn post<B: serde::Serialize>(
        &self,
        endpoint: &str,
        token: &AccessToken,
        body: &B,
    ) -> Result<Response> {
        let url = endpoints::endpoint_url(&self.base_url, endpoint);
        self.send_with_retry(endpoint, || {
            self.client
                .post(&url)
                .bearer_auth(token.as_str())
                .json(body)
        })
        .await
    }

    /// Send a request, retrying transient denials per the retry policy
    ///
    /// Any other non-success status is returned immediately as
    /// [`TransportError::Status`].
    async fn send_with_retry<F>(&self, endpoint: &str, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let max_attempts = self.retry.max_attempts;

        for attempt in 1..=max_attempts {
            let response = build()
                .send()
                .await
                .map_err(|e| TransportError::request(endpoint, e))?;

            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            if !RetryPolicy::is_transient_denial(status) {
                let body = response.text().await.unwrap_or_default();
                return Err(TransportError::Status {
                    endpoint: endpoint.to_string(),
                    status: status.as_u16(),
                    body,
                });
            }

            warn!(
                endpoint,
                attempt,
                max_attempts,
                delay_ms = self.retry.delay.as_millis() as u64,
                "Access denied, retrying"
            );

            if attempt < max_attempts {
                tokio::time::sleep(self.retry.delay).await;
            }
        }

        Err(TransportError::RetriesExhausted {
            endpoint: endpoint.to_string(),
            attempts: max_attempts,
        })
    }
}

async fn decode<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| TransportError::decode(endpoint, e))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_api_client_creation() {
        let client = ApiClient::new(
            "http://localhost:8000",
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            RetryPolicy::default(),
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.retry_policy().max_attempts, 10);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_request_error() {
        let client = ApiClient::new(
            "http://127.0.0.1:9",
            Duration::from_secs(2),
            RetryPolicy::new(1, Duration::from_millis(1)),
        )
        .unwrap();

        let err = client.authenticate("user", "pass").await.unwrap_err();
        assert!(matches!(err, TransportError::Request { .. }));
    }
}
