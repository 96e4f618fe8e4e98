//! Local validation tools. These never call the API.

use crate::collection_validator::validate_collection;
use crate::error::ToolError;
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_object, Tool, ToolRegistry};
use crate::validate::{parse_args, ValidateArgs};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

pub fn register_tools(registry: &mut ToolRegistry) {
    registry.register(Arc::new(ValidateCollectionTool));
}

#[derive(Debug, Deserialize)]
struct ValidateCollectionArgs {
    collection: serde_json::Value,
}

impl ValidateArgs for ValidateCollectionArgs {}

/// Validate a collection document without touching the API.
pub struct ValidateCollectionTool;

#[async_trait::async_trait]
impl Tool for ValidateCollectionTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "validate_collection".to_string(),
            description:
                "Validates a Postman Collection, providing detailed feedback beyond basic schema validation"
                    .to_string(),
            input_schema: json_schema_object(
                json!({
                    "collection": {
                        "type": "object",
                        "description": "The collection JSON to validate"
                    },
                }),
                vec!["collection"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: ValidateCollectionArgs = parse_args("validate_collection", arguments)?;
        let result = validate_collection(&args.collection)?;
        let text = serde_json::to_string_pretty(&result)
            .map_err(|e| ToolError::Internal(format!("failed to render response: {}", e)))?;
        Ok(CallToolResult::text(text))
    }
}
