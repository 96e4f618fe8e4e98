//! Configuration for the Postman API client.

use std::time::Duration;
use url::Url;

/// Default base URL for the Postman API.
pub const DEFAULT_BASE_URL: &str = "https://api.getpostman.com";

/// Configuration for the Postman client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Postman API.
    pub base_url: Url,
    /// API key sent as the `X-Api-Key` header on every request.
    pub api_key: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration with the given base URL and API key.
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            base_url,
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
        }
    }
}
