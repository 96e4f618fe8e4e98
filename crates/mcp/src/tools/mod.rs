//! Tool implementations, grouped by Postman API resource family.

pub mod collections;
pub mod environments;
mod registry;
pub mod sdk;
pub mod users;
pub mod workspaces;

use crate::error::ToolError;
use crate::protocol::{CallToolResult, ToolSchema};

pub use registry::{
    json_schema_array, json_schema_boolean, json_schema_enum, json_schema_number,
    json_schema_object, json_schema_string, ToolRegistry,
};

/// Render an upstream response body as a pretty-printed text result.
pub(crate) fn json_result(body: &serde_json::Value) -> Result<CallToolResult, ToolError> {
    let text = serde_json::to_string_pretty(body)
        .map_err(|e| ToolError::Internal(format!("failed to render response: {}", e)))?;
    Ok(CallToolResult::text(text))
}

/// A single invokable tool.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Discovery schema: name, description, and argument shape.
    fn schema(&self) -> ToolSchema;

    /// Run the tool against validated arguments.
    ///
    /// Upstream API failures are returned as `ToolError::Api` and are
    /// downgraded to an error-flagged result by the dispatcher, not here.
    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError>;
}
