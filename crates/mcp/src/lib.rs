//! MCP server exposing the Postman API as invokable tools.
//!
//! Speaks JSON-RPC 2.0 over stdio. Tool calls are validated locally, then
//! forwarded to the Postman API through [`postman_mcp_client`].

pub mod collection_validator;
pub mod error;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod validate;

pub use error::{ToolError, ToolResult};
pub use server::McpServer;
