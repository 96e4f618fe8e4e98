//! Main client for the Postman API.

use crate::config::{ClientConfig, DEFAULT_BASE_URL};
use crate::error::{PostmanError, PostmanResult};
use crate::http::HttpTransport;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Pre-authenticated binding to the Postman API.
///
/// Constructed once at startup and shared read-only by all tool groups.
/// Cloning is cheap; all clones share the same underlying connection pool.
#[derive(Debug, Clone)]
pub struct PostmanClient {
    http: HttpTransport,
}

impl PostmanClient {
    /// Create a new client builder.
    pub fn builder() -> PostmanClientBuilder {
        PostmanClientBuilder::new()
    }

    /// Create a client from configuration.
    pub fn from_config(config: ClientConfig) -> PostmanResult<Self> {
        let http = HttpTransport::new(Arc::new(config))?;
        Ok(Self { http })
    }

    /// Execute a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> PostmanResult<T> {
        self.http.get(path).await
    }

    /// Execute a GET request with query parameters.
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> PostmanResult<T> {
        self.http.get_with_query(path, query).await
    }

    /// Execute a POST request.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> PostmanResult<T> {
        self.http.post(path, body).await
    }

    /// Execute a POST request with query parameters.
    pub async fn post_with_query<T: DeserializeOwned, B: Serialize + ?Sized, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        query: &Q,
    ) -> PostmanResult<T> {
        self.http.post_with_query(path, body, query).await
    }

    /// Execute a PUT request.
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> PostmanResult<T> {
        self.http.put(path, body).await
    }

    /// Execute a PATCH request.
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> PostmanResult<T> {
        self.http.patch(path, body).await
    }

    /// Execute a DELETE request.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> PostmanResult<T> {
        self.http.delete(path).await
    }
}

/// Builder for creating a [`PostmanClient`].
pub struct PostmanClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Duration,
}

impl PostmanClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Override the Postman API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API key (required).
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> PostmanResult<PostmanClient> {
        let api_key = self
            .api_key
            .ok_or_else(|| PostmanError::Config("api_key is required".to_string()))?;

        let base_url_str = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url_str)?;

        let config = ClientConfig {
            base_url,
            api_key,
            timeout: self.timeout,
        };

        PostmanClient::from_config(config)
    }
}

impl Default for PostmanClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
