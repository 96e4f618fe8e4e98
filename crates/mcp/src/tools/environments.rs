//! Environment tools, including the fork/merge/pull lifecycle.
//!
//! Operations that address a fork lineage (update, fork, merge, pull, fork
//! listing) require full composite UIDs; simple reads and deletes accept the
//! plain environment ID the API also understands.

use crate::error::ToolError;
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    json_result, json_schema_array, json_schema_boolean, json_schema_enum, json_schema_number,
    json_schema_object, json_schema_string, Tool, ToolRegistry,
};
use crate::validate::{is_valid_uid, parse_args, ValidateArgs};
use postman_mcp_client::PostmanClient;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Register all environment tools.
pub fn register_tools(registry: &mut ToolRegistry, client: &PostmanClient) {
    registry.register(Arc::new(ListEnvironmentsTool::new(client.clone())));
    registry.register(Arc::new(GetEnvironmentTool::new(client.clone())));
    registry.register(Arc::new(CreateEnvironmentTool::new(client.clone())));
    registry.register(Arc::new(UpdateEnvironmentTool::new(client.clone())));
    registry.register(Arc::new(DeleteEnvironmentTool::new(client.clone())));
    registry.register(Arc::new(ForkEnvironmentTool::new(client.clone())));
    registry.register(Arc::new(GetEnvironmentForksTool::new(client.clone())));
    registry.register(Arc::new(MergeEnvironmentForkTool::new(client.clone())));
    registry.register(Arc::new(PullEnvironmentTool::new(client.clone())));
}

/// A single variable inside an environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentValue {
    pub key: String,
    pub value: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ValueKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Default,
    Secret,
}

fn value_item_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "key": json_schema_string("The variable name"),
            "value": json_schema_string("The variable value"),
            "type": json_schema_enum("Variable type", vec!["default", "secret"]),
            "enabled": json_schema_boolean("Whether the variable is enabled"),
        },
        "required": ["key", "value"]
    })
}

fn workspace_reference(id: &str) -> serde_json::Value {
    json!({"id": id, "type": "workspace"})
}

#[derive(Debug, Deserialize)]
struct ListEnvironmentsArgs {
    workspace: String,
}

impl ValidateArgs for ListEnvironmentsArgs {}

/// List environments in a workspace.
pub struct ListEnvironmentsTool {
    client: PostmanClient,
}

impl ListEnvironmentsTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for ListEnvironmentsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_environments".to_string(),
            description: "List all environments in a workspace".to_string(),
            input_schema: json_schema_object(
                json!({
                    "workspace": json_schema_string("The workspace ID"),
                }),
                vec!["workspace"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: ListEnvironmentsArgs = parse_args("list_environments", arguments)?;
        let body: serde_json::Value = self
            .client
            .get_with_query("/environments", &[("workspace", args.workspace.as_str())])
            .await?;
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct EnvironmentIdArgs {
    #[serde(rename = "environmentId")]
    environment_id: String,
}

impl ValidateArgs for EnvironmentIdArgs {}

/// Fetch a single environment.
pub struct GetEnvironmentTool {
    client: PostmanClient,
}

impl GetEnvironmentTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for GetEnvironmentTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_environment".to_string(),
            description: "Get details of a specific environment".to_string(),
            input_schema: json_schema_object(
                json!({
                    "environmentId": json_schema_string("The environment ID"),
                }),
                vec!["environmentId"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: EnvironmentIdArgs = parse_args("get_environment", arguments)?;
        let body: serde_json::Value = self
            .client
            .get(&format!("/environments/{}", args.environment_id))
            .await?;
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct CreateEnvironmentArgs {
    environment: EnvironmentDraft,
    #[serde(default)]
    workspace: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct EnvironmentDraft {
    name: String,
    values: Vec<EnvironmentValue>,
}

impl ValidateArgs for CreateEnvironmentArgs {}

/// Create an environment, optionally placing it in a workspace.
pub struct CreateEnvironmentTool {
    client: PostmanClient,
}

impl CreateEnvironmentTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for CreateEnvironmentTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_environment".to_string(),
            description: "Create a new environment".to_string(),
            input_schema: json_schema_object(
                json!({
                    "environment": json_schema_object(
                        json!({
                            "name": json_schema_string("The environment name"),
                            "values": json_schema_array(
                                value_item_schema(),
                                "The environment variables",
                            ),
                        }),
                        vec!["name", "values"],
                    ),
                    "workspace": json_schema_string("The workspace ID to create the environment in"),
                }),
                vec!["environment"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: CreateEnvironmentArgs = parse_args("create_environment", arguments)?;
        let mut payload = json!({
            "environment": args.environment,
        });
        if let Some(workspace) = &args.workspace {
            payload["workspace"] = workspace_reference(workspace);
        }
        let body: serde_json::Value = self.client.post("/environments", &payload).await?;
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct UpdateEnvironmentArgs {
    #[serde(rename = "environmentId")]
    environment_id: String,
    environment: EnvironmentPatch,
}

#[derive(Debug, Serialize, Deserialize)]
struct EnvironmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    values: Option<Vec<EnvironmentValue>>,
}

impl ValidateArgs for UpdateEnvironmentArgs {
    fn validate(&self) -> Result<(), String> {
        if !is_valid_uid(&self.environment_id) {
            return Err(format!(
                "environmentId must be a full UID (ownerId-environmentId), got: {}",
                self.environment_id
            ));
        }
        Ok(())
    }
}

/// Update an environment's name or variables.
pub struct UpdateEnvironmentTool {
    client: PostmanClient,
}

impl UpdateEnvironmentTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for UpdateEnvironmentTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "update_environment".to_string(),
            description: "Update an existing environment".to_string(),
            input_schema: json_schema_object(
                json!({
                    "environmentId": json_schema_string(
                        "The environment UID (ownerId-environmentId)",
                    ),
                    "environment": json_schema_object(
                        json!({
                            "name": json_schema_string("The environment name"),
                            "values": json_schema_array(
                                value_item_schema(),
                                "The environment variables",
                            ),
                        }),
                        vec![],
                    ),
                }),
                vec!["environmentId", "environment"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: UpdateEnvironmentArgs = parse_args("update_environment", arguments)?;
        let payload = json!({"environment": args.environment});
        let body: serde_json::Value = self
            .client
            .put(&format!("/environments/{}", args.environment_id), &payload)
            .await?;
        json_result(&body)
    }
}

/// Delete an environment.
pub struct DeleteEnvironmentTool {
    client: PostmanClient,
}

impl DeleteEnvironmentTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for DeleteEnvironmentTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "delete_environment".to_string(),
            description: "Delete an environment".to_string(),
            input_schema: json_schema_object(
                json!({
                    "environmentId": json_schema_string("The environment ID"),
                }),
                vec!["environmentId"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: EnvironmentIdArgs = parse_args("delete_environment", arguments)?;
        let body: serde_json::Value = self
            .client
            .delete(&format!("/environments/{}", args.environment_id))
            .await?;
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct ForkEnvironmentArgs {
    #[serde(rename = "environmentId")]
    environment_id: String,
    label: String,
    workspace: String,
}

impl ValidateArgs for ForkEnvironmentArgs {
    fn validate(&self) -> Result<(), String> {
        if !is_valid_uid(&self.environment_id) {
            return Err(format!(
                "environmentId must be a full UID (ownerId-environmentId), got: {}",
                self.environment_id
            ));
        }
        Ok(())
    }
}

/// Fork an environment into a workspace.
pub struct ForkEnvironmentTool {
    client: PostmanClient,
}

impl ForkEnvironmentTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for ForkEnvironmentTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "fork_environment".to_string(),
            description: "Create a fork of an environment in a workspace".to_string(),
            input_schema: json_schema_object(
                json!({
                    "environmentId": json_schema_string(
                        "The environment UID (ownerId-environmentId)",
                    ),
                    "label": json_schema_string("The fork label"),
                    "workspace": json_schema_string("The workspace ID to fork into"),
                }),
                vec!["environmentId", "label", "workspace"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: ForkEnvironmentArgs = parse_args("fork_environment", arguments)?;
        let payload = json!({
            "label": args.label,
            "workspace": workspace_reference(&args.workspace),
        });
        let body: serde_json::Value = self
            .client
            .post(&format!("/environments/{}/forks", args.environment_id), &payload)
            .await?;
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct GetEnvironmentForksArgs {
    #[serde(rename = "environmentId")]
    environment_id: String,
    #[serde(default)]
    cursor: Option<String>,
    #[serde(default)]
    direction: Option<SortDirection>,
    #[serde(default)]
    limit: Option<u32>,
    #[serde(default)]
    sort: Option<ForkSortKey>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
enum ForkSortKey {
    #[serde(rename = "createdAt")]
    CreatedAt,
}

impl ValidateArgs for GetEnvironmentForksArgs {
    fn validate(&self) -> Result<(), String> {
        if !is_valid_uid(&self.environment_id) {
            return Err(format!(
                "environmentId must be a full UID (ownerId-environmentId), got: {}",
                self.environment_id
            ));
        }
        Ok(())
    }
}

/// List the forks of an environment.
pub struct GetEnvironmentForksTool {
    client: PostmanClient,
}

impl GetEnvironmentForksTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for GetEnvironmentForksTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_environment_forks".to_string(),
            description: "List the forks of an environment".to_string(),
            input_schema: json_schema_object(
                json!({
                    "environmentId": json_schema_string(
                        "The environment UID (ownerId-environmentId)",
                    ),
                    "cursor": json_schema_string("Pagination cursor"),
                    "direction": json_schema_enum("Sort direction", vec!["asc", "desc"]),
                    "limit": json_schema_number("Maximum number of forks to return"),
                    "sort": json_schema_enum("Sort key", vec!["createdAt"]),
                }),
                vec!["environmentId"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: GetEnvironmentForksArgs = parse_args("get_environment_forks", arguments)?;
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(cursor) = &args.cursor {
            query.push(("cursor", cursor.clone()));
        }
        if let Some(direction) = args.direction {
            let value = match direction {
                SortDirection::Asc => "asc",
                SortDirection::Desc => "desc",
            };
            query.push(("direction", value.to_string()));
        }
        if let Some(limit) = args.limit {
            query.push(("limit", limit.to_string()));
        }
        if args.sort.is_some() {
            query.push(("sort", "createdAt".to_string()));
        }
        let path = format!("/environments/{}/forks", args.environment_id);
        let body: serde_json::Value = self.client.get_with_query(&path, &query).await?;
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct MergeEnvironmentForkArgs {
    #[serde(rename = "environmentId")]
    environment_id: String,
    source: String,
    destination: String,
    #[serde(default)]
    strategy: Option<MergeStrategy>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MergeStrategy {
    #[serde(rename = "deleteSource", skip_serializing_if = "Option::is_none")]
    delete_source: Option<bool>,
}

impl ValidateArgs for MergeEnvironmentForkArgs {
    fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("environmentId", &self.environment_id),
            ("source", &self.source),
            ("destination", &self.destination),
        ] {
            if !is_valid_uid(value) {
                return Err(format!(
                    "{} must be a full UID (ownerId-environmentId), got: {}",
                    field, value
                ));
            }
        }
        Ok(())
    }
}

/// Merge an environment fork back into its parent.
pub struct MergeEnvironmentForkTool {
    client: PostmanClient,
}

impl MergeEnvironmentForkTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for MergeEnvironmentForkTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "merge_environment_fork".to_string(),
            description: "Merge a forked environment back into its parent".to_string(),
            input_schema: json_schema_object(
                json!({
                    "environmentId": json_schema_string(
                        "The environment UID (ownerId-environmentId)",
                    ),
                    "source": json_schema_string("The source environment UID"),
                    "destination": json_schema_string("The destination environment UID"),
                    "strategy": json_schema_object(
                        json!({
                            "deleteSource": json_schema_boolean(
                                "Whether to delete the source environment after merging",
                            ),
                        }),
                        vec![],
                    ),
                }),
                vec!["environmentId", "source", "destination"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: MergeEnvironmentForkArgs = parse_args("merge_environment_fork", arguments)?;
        let mut payload = json!({
            "source": args.source,
            "destination": args.destination,
        });
        if let Some(strategy) = &args.strategy {
            payload["strategy"] = serde_json::to_value(strategy)
                .map_err(|e| ToolError::Internal(e.to_string()))?;
        }
        let body: serde_json::Value = self
            .client
            .post(&format!("/environments/{}/merges", args.environment_id), &payload)
            .await?;
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct PullEnvironmentArgs {
    #[serde(rename = "environmentId")]
    environment_id: String,
    source: String,
    destination: String,
}

impl ValidateArgs for PullEnvironmentArgs {
    fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("environmentId", &self.environment_id),
            ("source", &self.source),
            ("destination", &self.destination),
        ] {
            if !is_valid_uid(value) {
                return Err(format!(
                    "{} must be a full UID (ownerId-environmentId), got: {}",
                    field, value
                ));
            }
        }
        Ok(())
    }
}

/// Pull parent changes into a forked environment.
pub struct PullEnvironmentTool {
    client: PostmanClient,
}

impl PullEnvironmentTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for PullEnvironmentTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "pull_environment".to_string(),
            description: "Pull changes from a parent environment into its fork".to_string(),
            input_schema: json_schema_object(
                json!({
                    "environmentId": json_schema_string(
                        "The environment UID (ownerId-environmentId)",
                    ),
                    "source": json_schema_string("The source (parent) environment UID"),
                    "destination": json_schema_string("The destination (fork) environment UID"),
                }),
                vec!["environmentId", "source", "destination"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: PullEnvironmentArgs = parse_args("pull_environment", arguments)?;
        let payload = json!({
            "source": args.source,
            "destination": args.destination,
        });
        let body: serde_json::Value = self
            .client
            .post(&format!("/environments/{}/pulls", args.environment_id), &payload)
            .await?;
        json_result(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const UID: &str = "31912785-b8cdb26a-0c58-4f35-9775-4945c39d7ee2";
    const UID2: &str = "31912785-ffb88062-1b46-4307-a217-d0b345358c4f";

    async fn test_client(server: &MockServer) -> PostmanClient {
        PostmanClient::builder()
            .api_key("PMAK-test")
            .base_url(server.uri())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_environments_passes_workspace_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/environments"))
            .and(query_param("workspace", "ws-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"environments": []})))
            .expect(1)
            .mount(&server)
            .await;

        let tool = ListEnvironmentsTool::new(test_client(&server).await);
        let result = tool.execute(json!({"workspace": "ws-1"})).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_environment_wraps_workspace_reference() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/environments"))
            .and(body_json(json!({
                "environment": {
                    "name": "Staging",
                    "values": [{"key": "HOST", "value": "stage.example.com"}]
                },
                "workspace": {"id": "ws-1", "type": "workspace"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"environment": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let tool = CreateEnvironmentTool::new(test_client(&server).await);
        let result = tool
            .execute(json!({
                "environment": {
                    "name": "Staging",
                    "values": [{"key": "HOST", "value": "stage.example.com"}]
                },
                "workspace": "ws-1"
            }))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_environment_omits_workspace_when_absent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/environments"))
            .and(body_json(json!({
                "environment": {"name": "Local", "values": []}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"environment": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let tool = CreateEnvironmentTool::new(test_client(&server).await);
        let result = tool
            .execute(json!({"environment": {"name": "Local", "values": []}}))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_environment_rejects_bad_value_entry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let tool = CreateEnvironmentTool::new(test_client(&server).await);
        let result = tool
            .execute(json!({
                "environment": {"name": "Bad", "values": [{"key": "HOST"}]}
            }))
            .await;
        assert!(matches!(result, Err(ToolError::InvalidParams(_))));
    }

    #[tokio::test]
    async fn test_update_environment_requires_uid() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let tool = UpdateEnvironmentTool::new(test_client(&server).await);
        let result = tool
            .execute(json!({
                "environmentId": "b8cdb26a-0c58-4f35-9775-4945c39d7ee2",
                "environment": {"name": "Renamed"}
            }))
            .await;
        assert!(matches!(result, Err(ToolError::InvalidParams(_))));
    }

    #[tokio::test]
    async fn test_update_environment_sends_partial_patch() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(format!("/environments/{}", UID)))
            .and(body_json(json!({"environment": {"name": "Renamed"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"environment": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let tool = UpdateEnvironmentTool::new(test_client(&server).await);
        let result = tool
            .execute(json!({
                "environmentId": UID,
                "environment": {"name": "Renamed"}
            }))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_fork_environment_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/environments/{}/forks", UID)))
            .and(body_json(json!({
                "label": "experiment",
                "workspace": {"id": "ws-1", "type": "workspace"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"environment": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let tool = ForkEnvironmentTool::new(test_client(&server).await);
        let result = tool
            .execute(json!({
                "environmentId": UID,
                "label": "experiment",
                "workspace": "ws-1"
            }))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_get_environment_forks_forwards_pagination() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/environments/{}/forks", UID)))
            .and(query_param("direction", "desc"))
            .and(query_param("limit", "10"))
            .and(query_param("sort", "createdAt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .expect(1)
            .mount(&server)
            .await;

        let tool = GetEnvironmentForksTool::new(test_client(&server).await);
        let result = tool
            .execute(json!({
                "environmentId": UID,
                "direction": "desc",
                "limit": 10,
                "sort": "createdAt"
            }))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_get_environment_forks_rejects_bad_direction() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let tool = GetEnvironmentForksTool::new(test_client(&server).await);
        let result = tool
            .execute(json!({"environmentId": UID, "direction": "sideways"}))
            .await;
        assert!(matches!(result, Err(ToolError::InvalidParams(_))));
    }

    #[tokio::test]
    async fn test_merge_environment_fork_checks_all_uids() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let tool = MergeEnvironmentForkTool::new(test_client(&server).await);
        let result = tool
            .execute(json!({
                "environmentId": UID,
                "source": "not-a-uid",
                "destination": UID2
            }))
            .await;
        match result {
            Err(ToolError::InvalidParams(message)) => assert!(message.contains("source")),
            other => panic!("expected InvalidParams, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_merge_environment_fork_payload_with_strategy() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/environments/{}/merges", UID)))
            .and(body_json(json!({
                "source": UID2,
                "destination": UID,
                "strategy": {"deleteSource": true}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"environment": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let tool = MergeEnvironmentForkTool::new(test_client(&server).await);
        let result = tool
            .execute(json!({
                "environmentId": UID,
                "source": UID2,
                "destination": UID,
                "strategy": {"deleteSource": true}
            }))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_pull_environment_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/environments/{}/pulls", UID)))
            .and(body_json(json!({"source": UID2, "destination": UID})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"environment": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let tool = PullEnvironmentTool::new(test_client(&server).await);
        let result = tool
            .execute(json!({
                "environmentId": UID,
                "source": UID2,
                "destination": UID
            }))
            .await;
        assert!(result.is_ok());
    }
}
