//! HTTP client for the Postman API.
//!
//! Provides a thin, pre-authenticated binding to `https://api.getpostman.com`:
//! a base URL, an `X-Api-Key` header, and the five HTTP verbs the tool
//! handlers need. Path and payload shaping lives with the handlers, not here.
//!
//! ```rust,no_run
//! use postman_mcp_client::{PostmanClient, PostmanResult};
//!
//! # async fn example() -> PostmanResult<()> {
//! let client = PostmanClient::builder()
//!     .api_key("PMAK-your-api-key")
//!     .build()?;
//!
//! let me: serde_json::Value = client.get("/me").await?;
//! println!("{me}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;

pub use client::{PostmanClient, PostmanClientBuilder};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{PostmanError, PostmanResult};
