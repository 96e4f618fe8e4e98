//! HTTP transport for the Postman API client.

use crate::config::ClientConfig;
use crate::error::{PostmanError, PostmanResult};
use reqwest::{header, Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::debug;

/// HTTP transport for making API requests.
///
/// Holds the pre-authenticated `reqwest` client; every request carries the
/// configured `X-Api-Key` header. The transport performs exactly one attempt
/// per call.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> PostmanResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::HeaderName::from_static("x-api-key"),
            header::HeaderValue::from_str(&config.api_key)
                .map_err(|_| PostmanError::Config("Invalid API key format".to_string()))?,
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Build a URL for the given path.
    fn build_url(&self, path: &str) -> PostmanResult<url::Url> {
        self.config
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(PostmanError::InvalidUrl)
    }

    /// Send a request and decode the JSON body, converting non-success
    /// statuses into `PostmanError::Api`.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> PostmanResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PostmanError::from_response(status.as_u16(), &body));
        }

        let body = response.json().await?;
        Ok(body)
    }

    /// Execute a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> PostmanResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "GET request");
        self.execute(self.client.get(url)).await
    }

    /// Execute a GET request with query parameters.
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> PostmanResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "GET request with query");
        self.execute(self.client.get(url).query(query)).await
    }

    /// Execute a POST request.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> PostmanResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "POST request");
        self.execute(self.client.post(url).json(body)).await
    }

    /// Execute a POST request with query parameters.
    pub async fn post_with_query<T: DeserializeOwned, B: Serialize + ?Sized, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        query: &Q,
    ) -> PostmanResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "POST request with query");
        self.execute(self.client.post(url).query(query).json(body))
            .await
    }

    /// Execute a PUT request.
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> PostmanResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "PUT request");
        self.execute(self.client.put(url).json(body)).await
    }

    /// Execute a PATCH request.
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> PostmanResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "PATCH request");
        self.execute(self.client.patch(url).json(body)).await
    }

    /// Execute a DELETE request.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> PostmanResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "DELETE request");
        self.execute(self.client.delete(url)).await
    }
}
