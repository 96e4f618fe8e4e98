// Tool registry and JSON schema helpers

use crate::protocol::ToolSchema;
use crate::tools::Tool;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of available tools.
///
/// Listing order is registration order and is stable across calls, so
/// clients that diff `tools/list` output never see spurious reordering.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a tool. Re-registering a name replaces the tool in place,
    /// keeping its original position in the listing.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.schema().name;
        match self.index.get(&name) {
            Some(&pos) => self.tools[pos] = tool,
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&pos| self.tools[pos].clone())
    }

    /// Check if a tool exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// List all tool schemas, in registration order.
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        self.tools.iter().map(|t| t.schema()).collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Helper functions for creating tool schemas

pub fn json_schema_object(properties: serde_json::Value, required: Vec<&str>) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_string(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "description": description
    })
}

pub fn json_schema_enum(description: &str, values: Vec<&str>) -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "description": description,
        "enum": values
    })
}

pub fn json_schema_number(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "number",
        "description": description
    })
}

pub fn json_schema_boolean(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "boolean",
        "description": description
    })
}

pub fn json_schema_array(items: serde_json::Value, description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "array",
        "items": items,
        "description": description
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;
    use crate::protocol::CallToolResult;

    struct StaticTool {
        name: &'static str,
        reply: &'static str,
    }

    #[async_trait::async_trait]
    impl Tool for StaticTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: self.name.to_string(),
                description: "test tool".to_string(),
                input_schema: json_schema_object(serde_json::json!({}), vec![]),
            }
        }

        async fn execute(
            &self,
            _arguments: serde_json::Value,
        ) -> Result<CallToolResult, ToolError> {
            Ok(CallToolResult::text(self.reply))
        }
    }

    fn names(registry: &ToolRegistry) -> Vec<String> {
        registry.list_schemas().into_iter().map(|s| s.name).collect()
    }

    #[test]
    fn test_listing_preserves_registration_order() {
        let mut registry = ToolRegistry::new();
        for name in ["list_workspaces", "get_workspace", "list_environments"] {
            registry.register(Arc::new(StaticTool { name, reply: "{}" }));
        }
        assert_eq!(
            names(&registry),
            vec!["list_workspaces", "get_workspace", "list_environments"]
        );
        // Same order on repeated listings.
        assert_eq!(names(&registry), names(&registry));
    }

    #[test]
    fn test_duplicate_registration_replaces_in_place() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(StaticTool { name: "a", reply: "first" }));
        registry.register(Arc::new(StaticTool { name: "b", reply: "second" }));
        registry.register(Arc::new(StaticTool { name: "a", reply: "replaced" }));

        assert_eq!(registry.len(), 2);
        assert_eq!(names(&registry), vec!["a", "b"]);

        let tool = registry.get("a").unwrap();
        let result = futures_executor(tool.execute(serde_json::json!({})));
        assert_eq!(
            serde_json::to_value(&result.unwrap()).unwrap()["content"][0]["text"],
            "replaced"
        );
    }

    #[test]
    fn test_get_and_contains() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(StaticTool { name: "get_user_info", reply: "{}" }));
        assert!(registry.contains("get_user_info"));
        assert!(registry.get("get_user_info").is_some());
        assert!(!registry.contains("missing"));
        assert!(registry.get("missing").is_none());
    }

    fn futures_executor<F: std::future::Future>(fut: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(fut)
    }
}
