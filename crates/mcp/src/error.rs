//! Error taxonomy for tool dispatch.
//!
//! Validation and routing failures surface as JSON-RPC errors so the
//! enclosing protocol loop can format them uniformly. Upstream API failures
//! are downgraded to data (an error-flagged tool result) exactly once, at
//! the dispatch boundary; handlers never catch them.

use crate::protocol::JsonRpcError;
use postman_mcp_client::PostmanError;

/// Result type for tool handlers.
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors a tool invocation can raise.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Caller-supplied arguments failed a type guard.
    #[error("{0}")]
    InvalidParams(String),

    /// Unknown operation name.
    #[error("Unknown tool: {0}")]
    MethodNotFound(String),

    /// Structurally unparseable domain document (collection validator only).
    #[error("{0}")]
    InvalidRequest(String),

    /// The upstream Postman API call failed.
    #[error(transparent)]
    Api(#[from] PostmanError),

    /// Programming/integration fault; never masked as a user error.
    #[error("{0}")]
    Internal(String),
}

impl ToolError {
    /// Map to the JSON-RPC error the protocol loop should answer with.
    ///
    /// `Api` is not expected here; the dispatcher converts it to an
    /// error-flagged tool result before the error reaches the loop. If one
    /// leaks through anyway it is reported as an internal error.
    pub fn to_rpc_error(&self) -> JsonRpcError {
        match self {
            Self::InvalidParams(message) => JsonRpcError::invalid_params(message.clone()),
            Self::MethodNotFound(name) => JsonRpcError::method_not_found(name),
            Self::InvalidRequest(message) => JsonRpcError::invalid_request(message.clone()),
            Self::Api(err) => JsonRpcError::internal_error(err.to_string()),
            Self::Internal(message) => JsonRpcError::internal_error(message.clone()),
        }
    }
}
