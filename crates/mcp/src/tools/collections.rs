//! Collection tools: CRUD, folder/request/response items, and the
//! fork/merge/pull/transfer lifecycle.
//!
//! Collection, folder, request, and response documents are passed through to
//! the API as raw JSON; validation checks the fields the API will reject the
//! call without, not the whole document shape.

use crate::error::ToolError;
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    json_result, json_schema_array, json_schema_boolean, json_schema_enum, json_schema_number,
    json_schema_object, json_schema_string, Tool, ToolRegistry,
};
use crate::validate::{parse_args, ValidateArgs};
use postman_mcp_client::PostmanClient;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// Register all collection tools.
pub fn register_tools(registry: &mut ToolRegistry, client: &PostmanClient) {
    registry.register(Arc::new(ListCollectionsTool::new(client.clone())));
    registry.register(Arc::new(GetCollectionTool::new(client.clone())));
    registry.register(Arc::new(CreateCollectionTool::new(client.clone())));
    registry.register(Arc::new(UpdateCollectionTool::new(client.clone())));
    registry.register(Arc::new(PatchCollectionTool::new(client.clone())));
    registry.register(Arc::new(DeleteCollectionTool::new(client.clone())));
    registry.register(Arc::new(CreateCollectionFolderTool::new(client.clone())));
    registry.register(Arc::new(GetCollectionFolderTool::new(client.clone())));
    registry.register(Arc::new(UpdateCollectionFolderTool::new(client.clone())));
    registry.register(Arc::new(DeleteCollectionFolderTool::new(client.clone())));
    registry.register(Arc::new(CreateCollectionRequestTool::new(client.clone())));
    registry.register(Arc::new(GetCollectionRequestTool::new(client.clone())));
    registry.register(Arc::new(UpdateCollectionRequestTool::new(client.clone())));
    registry.register(Arc::new(DeleteCollectionRequestTool::new(client.clone())));
    registry.register(Arc::new(CreateCollectionResponseTool::new(client.clone())));
    registry.register(Arc::new(GetCollectionResponseTool::new(client.clone())));
    registry.register(Arc::new(UpdateCollectionResponseTool::new(client.clone())));
    registry.register(Arc::new(DeleteCollectionResponseTool::new(client.clone())));
    registry.register(Arc::new(ForkCollectionTool::new(client.clone())));
    registry.register(Arc::new(GetCollectionForksTool::new(client.clone())));
    registry.register(Arc::new(MergeCollectionForkTool::new(client.clone())));
    registry.register(Arc::new(PullCollectionChangesTool::new(client.clone())));
    registry.register(Arc::new(TransferCollectionItemsTool::new(client.clone())));
}

fn workspace_reference(id: &str) -> serde_json::Value {
    json!({"id": id, "type": "workspace"})
}

/// Require a string at a JSON pointer inside a pass-through document.
fn require_string_at(value: &serde_json::Value, pointer: &str, label: &str) -> Result<(), String> {
    match value.pointer(pointer).and_then(|v| v.as_str()) {
        Some(_) => Ok(()),
        None => Err(format!("{} is required and must be a string", label)),
    }
}

/// `ids`/`uid`/`populate` flags shared by the item detail reads.
#[derive(Debug, Default, Deserialize)]
struct DetailFlags {
    #[serde(default)]
    ids: Option<bool>,
    #[serde(default)]
    uid: Option<bool>,
    #[serde(default)]
    populate: Option<bool>,
}

impl DetailFlags {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(ids) = self.ids {
            query.push(("ids", ids.to_string()));
        }
        if let Some(uid) = self.uid {
            query.push(("uid", uid.to_string()));
        }
        if let Some(populate) = self.populate {
            query.push(("populate", populate.to_string()));
        }
        query
    }
}

fn detail_flag_properties() -> serde_json::Value {
    json!({
        "ids": json_schema_boolean("Return only properties that contain ID values"),
        "uid": json_schema_boolean("Return all IDs in UID format"),
        "populate": json_schema_boolean("Return all item contents"),
    })
}

#[derive(Debug, Deserialize)]
struct CollectionIdArgs {
    collection_id: String,
}

impl ValidateArgs for CollectionIdArgs {}

#[derive(Debug, Deserialize)]
struct ListCollectionsArgs {
    #[serde(default)]
    workspace: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    limit: Option<u32>,
    #[serde(default)]
    offset: Option<u32>,
}

impl ValidateArgs for ListCollectionsArgs {}

/// List collections, optionally filtered by workspace or name.
pub struct ListCollectionsTool {
    client: PostmanClient,
}

impl ListCollectionsTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for ListCollectionsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_collections".to_string(),
            description: "List all collections in a workspace. Supports filtering and pagination."
                .to_string(),
            input_schema: json_schema_object(
                json!({
                    "workspace": json_schema_string("Workspace ID"),
                    "name": json_schema_string(
                        "Filter results by collections that match the given name",
                    ),
                    "limit": json_schema_number("Maximum number of results to return"),
                    "offset": json_schema_number("Number of results to skip"),
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: ListCollectionsArgs = parse_args("list_collections", arguments)?;
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(workspace) = &args.workspace {
            query.push(("workspace", workspace.clone()));
        }
        if let Some(name) = &args.name {
            query.push(("name", name.clone()));
        }
        if let Some(limit) = args.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = args.offset {
            query.push(("offset", offset.to_string()));
        }
        let body: serde_json::Value = self.client.get_with_query("/collections", &query).await?;
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct GetCollectionArgs {
    collection_id: String,
    #[serde(default)]
    access_key: Option<String>,
    #[serde(default)]
    model: Option<CollectionModel>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
enum CollectionModel {
    #[serde(rename = "minimal")]
    Minimal,
}

impl ValidateArgs for GetCollectionArgs {}

/// Fetch a collection by ID.
pub struct GetCollectionTool {
    client: PostmanClient,
}

impl GetCollectionTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for GetCollectionTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_collection".to_string(),
            description: "Get details of a specific collection".to_string(),
            input_schema: json_schema_object(
                json!({
                    "collection_id": json_schema_string("Collection ID"),
                    "access_key": json_schema_string(
                        "Collection's read-only access key. Using this query parameter does not require an API key.",
                    ),
                    "model": json_schema_enum(
                        "Return minimal collection data (only root-level request and folder IDs)",
                        vec!["minimal"],
                    ),
                }),
                vec!["collection_id"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: GetCollectionArgs = parse_args("get_collection", arguments)?;
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(access_key) = &args.access_key {
            query.push(("access_key", access_key.clone()));
        }
        if args.model.is_some() {
            query.push(("model", "minimal".to_string()));
        }
        let path = format!("/collections/{}", args.collection_id);
        let body: serde_json::Value = self.client.get_with_query(&path, &query).await?;
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct CreateCollectionArgs {
    collection: serde_json::Value,
    #[serde(default)]
    workspace: Option<String>,
}

impl ValidateArgs for CreateCollectionArgs {
    fn validate(&self) -> Result<(), String> {
        require_string_at(&self.collection, "/info/name", "collection.info.name")?;
        require_string_at(&self.collection, "/info/schema", "collection.info.schema")?;
        Ok(())
    }
}

/// Create a collection, optionally in a workspace.
pub struct CreateCollectionTool {
    client: PostmanClient,
}

impl CreateCollectionTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for CreateCollectionTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_collection".to_string(),
            description:
                "Create a new collection in a workspace. Supports Postman Collection v2.1.0 format."
                    .to_string(),
            input_schema: json_schema_object(
                json!({
                    "workspace": json_schema_string(
                        "Workspace ID. Creates in \"My Workspace\" if not specified.",
                    ),
                    "collection": {
                        "type": "object",
                        "description": "Collection details in Postman Collection Format v2.1",
                        "required": ["info"],
                        "properties": {
                            "info": {
                                "type": "object",
                                "required": ["name", "schema"],
                                "properties": {
                                    "name": {"type": "string"},
                                    "schema": {"type": "string"}
                                }
                            }
                        }
                    },
                }),
                vec!["collection"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: CreateCollectionArgs = parse_args("create_collection", arguments)?;
        let mut payload = json!({"collection": args.collection});
        if let Some(workspace) = &args.workspace {
            payload["workspace"] = workspace_reference(workspace);
        }
        let body: serde_json::Value = self.client.post("/collections", &payload).await?;
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct UpdateCollectionArgs {
    collection_id: String,
    collection: serde_json::Value,
}

impl ValidateArgs for UpdateCollectionArgs {
    fn validate(&self) -> Result<(), String> {
        require_string_at(&self.collection, "/info/name", "collection.info.name")?;
        require_string_at(&self.collection, "/info/schema", "collection.info.schema")?;
        if self.collection.pointer("/item").and_then(|v| v.as_array()).is_none() {
            return Err("collection.item is required and must be an array".to_string());
        }
        Ok(())
    }
}

/// Replace a collection wholesale.
pub struct UpdateCollectionTool {
    client: PostmanClient,
}

impl UpdateCollectionTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for UpdateCollectionTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "update_collection".to_string(),
            description:
                "Update an existing collection. Full collection replacement with maximum size of 20 MB."
                    .to_string(),
            input_schema: json_schema_object(
                json!({
                    "collection_id": json_schema_string("Collection ID"),
                    "collection": {
                        "type": "object",
                        "description": "Collection details in Postman Collection Format v2.1",
                        "required": ["info", "item"],
                        "properties": {
                            "info": {
                                "type": "object",
                                "required": ["name", "schema"],
                                "properties": {
                                    "name": {"type": "string"},
                                    "schema": {"type": "string"}
                                }
                            },
                            "item": {"type": "array"}
                        }
                    },
                }),
                vec!["collection_id", "collection"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: UpdateCollectionArgs = parse_args("update_collection", arguments)?;
        let payload = json!({"collection": args.collection});
        let body: serde_json::Value = self
            .client
            .put(&format!("/collections/{}", args.collection_id), &payload)
            .await?;
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct PatchCollectionArgs {
    collection_id: String,
    collection: serde_json::Value,
}

impl ValidateArgs for PatchCollectionArgs {
    fn validate(&self) -> Result<(), String> {
        if !self.collection.is_object() {
            return Err("collection must be an object".to_string());
        }
        Ok(())
    }
}

/// Partially update a collection.
pub struct PatchCollectionTool {
    client: PostmanClient,
}

impl PatchCollectionTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for PatchCollectionTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "patch_collection".to_string(),
            description: "Partially update a collection. Only updates provided fields.".to_string(),
            input_schema: json_schema_object(
                json!({
                    "collection_id": json_schema_string("Collection ID"),
                    "collection": {
                        "type": "object",
                        "description": "Collection fields to update",
                        "properties": {
                            "info": {
                                "type": "object",
                                "properties": {
                                    "name": {"type": "string"},
                                    "description": {"type": "string"}
                                }
                            }
                        }
                    },
                }),
                vec!["collection_id", "collection"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: PatchCollectionArgs = parse_args("patch_collection", arguments)?;
        let payload = json!({"collection": args.collection});
        let body: serde_json::Value = self
            .client
            .patch(&format!("/collections/{}", args.collection_id), &payload)
            .await?;
        json_result(&body)
    }
}

/// Delete a collection.
pub struct DeleteCollectionTool {
    client: PostmanClient,
}

impl DeleteCollectionTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for DeleteCollectionTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "delete_collection".to_string(),
            description: "Delete a collection".to_string(),
            input_schema: json_schema_object(
                json!({
                    "collection_id": json_schema_string("Collection ID"),
                }),
                vec!["collection_id"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: CollectionIdArgs = parse_args("delete_collection", arguments)?;
        let body: serde_json::Value = self
            .client
            .delete(&format!("/collections/{}", args.collection_id))
            .await?;
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct CreateFolderArgs {
    collection_id: String,
    folder: serde_json::Value,
}

impl ValidateArgs for CreateFolderArgs {
    fn validate(&self) -> Result<(), String> {
        if !self.folder.is_object() {
            return Err("folder must be an object".to_string());
        }
        Ok(())
    }
}

/// Create a folder in a collection.
pub struct CreateCollectionFolderTool {
    client: PostmanClient,
}

impl CreateCollectionFolderTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for CreateCollectionFolderTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_collection_folder".to_string(),
            description: "Create a new folder in a collection".to_string(),
            input_schema: json_schema_object(
                json!({
                    "collection_id": json_schema_string("Collection ID"),
                    "folder": json_schema_object(
                        json!({
                            "name": json_schema_string("Folder name"),
                            "description": json_schema_string("Folder description"),
                        }),
                        vec![],
                    ),
                }),
                vec!["collection_id", "folder"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: CreateFolderArgs = parse_args("create_collection_folder", arguments)?;
        let body: serde_json::Value = self
            .client
            .post(&format!("/collections/{}/folders", args.collection_id), &args.folder)
            .await?;
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct GetFolderArgs {
    collection_id: String,
    folder_id: String,
    #[serde(flatten)]
    flags: DetailFlags,
}

impl ValidateArgs for GetFolderArgs {}

/// Fetch a folder from a collection.
pub struct GetCollectionFolderTool {
    client: PostmanClient,
}

impl GetCollectionFolderTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for GetCollectionFolderTool {
    fn schema(&self) -> ToolSchema {
        let mut properties = json!({
            "collection_id": json_schema_string("Collection ID"),
            "folder_id": json_schema_string("Folder ID"),
        });
        merge_properties(&mut properties, detail_flag_properties());
        ToolSchema {
            name: "get_collection_folder".to_string(),
            description: "Get details of a specific folder in a collection".to_string(),
            input_schema: json_schema_object(properties, vec!["collection_id", "folder_id"]),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: GetFolderArgs = parse_args("get_collection_folder", arguments)?;
        let path = format!(
            "/collections/{}/folders/{}",
            args.collection_id, args.folder_id
        );
        let body: serde_json::Value = self
            .client
            .get_with_query(&path, &args.flags.to_query())
            .await?;
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct UpdateFolderArgs {
    collection_id: String,
    folder_id: String,
    folder: serde_json::Value,
}

impl ValidateArgs for UpdateFolderArgs {
    fn validate(&self) -> Result<(), String> {
        if !self.folder.is_object() {
            return Err("folder must be an object".to_string());
        }
        Ok(())
    }
}

/// Update a folder; only provided fields change.
pub struct UpdateCollectionFolderTool {
    client: PostmanClient,
}

impl UpdateCollectionFolderTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for UpdateCollectionFolderTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "update_collection_folder".to_string(),
            description:
                "Update a folder in a collection. Acts like PATCH, only updates provided values."
                    .to_string(),
            input_schema: json_schema_object(
                json!({
                    "collection_id": json_schema_string("Collection ID"),
                    "folder_id": json_schema_string("Folder ID"),
                    "folder": json_schema_object(
                        json!({
                            "name": json_schema_string("Folder name"),
                            "description": json_schema_string("Folder description"),
                        }),
                        vec![],
                    ),
                }),
                vec!["collection_id", "folder_id", "folder"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: UpdateFolderArgs = parse_args("update_collection_folder", arguments)?;
        let path = format!(
            "/collections/{}/folders/{}",
            args.collection_id, args.folder_id
        );
        let body: serde_json::Value = self.client.put(&path, &args.folder).await?;
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct FolderIdArgs {
    collection_id: String,
    folder_id: String,
}

impl ValidateArgs for FolderIdArgs {}

/// Delete a folder from a collection.
pub struct DeleteCollectionFolderTool {
    client: PostmanClient,
}

impl DeleteCollectionFolderTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for DeleteCollectionFolderTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "delete_collection_folder".to_string(),
            description: "Delete a folder from a collection".to_string(),
            input_schema: json_schema_object(
                json!({
                    "collection_id": json_schema_string("Collection ID"),
                    "folder_id": json_schema_string("Folder ID"),
                }),
                vec!["collection_id", "folder_id"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: FolderIdArgs = parse_args("delete_collection_folder", arguments)?;
        let path = format!(
            "/collections/{}/folders/{}",
            args.collection_id, args.folder_id
        );
        let body: serde_json::Value = self.client.delete(&path).await?;
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct CreateRequestArgs {
    collection_id: String,
    #[serde(default)]
    folder_id: Option<String>,
    request: serde_json::Value,
}

impl ValidateArgs for CreateRequestArgs {
    fn validate(&self) -> Result<(), String> {
        if !self.request.is_object() {
            return Err("request must be an object".to_string());
        }
        Ok(())
    }
}

/// Create a request, optionally inside a folder.
pub struct CreateCollectionRequestTool {
    client: PostmanClient,
}

impl CreateCollectionRequestTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for CreateCollectionRequestTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_collection_request".to_string(),
            description: "Create a new request in a collection".to_string(),
            input_schema: json_schema_object(
                json!({
                    "collection_id": json_schema_string("Collection ID"),
                    "folder_id": json_schema_string("Optional folder ID to create request in"),
                    "request": json_schema_object(
                        json!({
                            "name": json_schema_string("Request name"),
                            "method": json_schema_string("HTTP method"),
                            "url": json_schema_string("Request URL"),
                        }),
                        vec![],
                    ),
                }),
                vec!["collection_id", "request"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: CreateRequestArgs = parse_args("create_collection_request", arguments)?;
        let path = format!("/collections/{}/requests", args.collection_id);
        let body: serde_json::Value = match &args.folder_id {
            Some(folder_id) => {
                self.client
                    .post_with_query(&path, &args.request, &[("folder_id", folder_id.as_str())])
                    .await?
            }
            None => self.client.post(&path, &args.request).await?,
        };
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct GetRequestArgs {
    collection_id: String,
    request_id: String,
    #[serde(flatten)]
    flags: DetailFlags,
}

impl ValidateArgs for GetRequestArgs {}

/// Fetch a request from a collection.
pub struct GetCollectionRequestTool {
    client: PostmanClient,
}

impl GetCollectionRequestTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for GetCollectionRequestTool {
    fn schema(&self) -> ToolSchema {
        let mut properties = json!({
            "collection_id": json_schema_string("Collection ID"),
            "request_id": json_schema_string("Request ID"),
        });
        merge_properties(&mut properties, detail_flag_properties());
        ToolSchema {
            name: "get_collection_request".to_string(),
            description: "Get details of a specific request in a collection".to_string(),
            input_schema: json_schema_object(properties, vec!["collection_id", "request_id"]),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: GetRequestArgs = parse_args("get_collection_request", arguments)?;
        let path = format!(
            "/collections/{}/requests/{}",
            args.collection_id, args.request_id
        );
        let body: serde_json::Value = self
            .client
            .get_with_query(&path, &args.flags.to_query())
            .await?;
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct UpdateRequestArgs {
    collection_id: String,
    request_id: String,
    request: serde_json::Value,
}

impl ValidateArgs for UpdateRequestArgs {
    fn validate(&self) -> Result<(), String> {
        if !self.request.is_object() {
            return Err("request must be an object".to_string());
        }
        Ok(())
    }
}

/// Number of script lines under `event[0].script.exec`, if present.
fn sent_script_lines(request: &serde_json::Value) -> Option<usize> {
    request
        .pointer("/event/0/script/exec")
        .and_then(|v| v.as_array())
        .map(|lines| lines.len())
        .filter(|&len| len > 0)
}

/// Number of script lines the API echoed back under `data.events[0].script.exec`.
fn returned_script_lines(response: &serde_json::Value) -> Option<usize> {
    response
        .pointer("/data/events/0/script/exec")
        .and_then(|v| v.as_array())
        .map(|lines| lines.len())
}

/// Update a request. Cannot change the request's folder.
///
/// The API accepts scripts under the singular `event` key but echoes them
/// back under plural `events`, and has been observed to drop script lines in
/// transit. The update therefore records the request's revision beforehand
/// and compares script line counts afterwards; a mismatch is surfaced as an
/// observation appended to the result, never as a failure.
pub struct UpdateCollectionRequestTool {
    client: PostmanClient,
}

impl UpdateCollectionRequestTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for UpdateCollectionRequestTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "update_collection_request".to_string(),
            description:
                "Update a request in a collection. Cannot change request folder. For scripts, the input request object should use the 'event' (singular) key for an array of event definitions."
                    .to_string(),
            input_schema: json_schema_object(
                json!({
                    "collection_id": json_schema_string(
                        "The unique identifier of the collection this request belongs to.",
                    ),
                    "request_id": json_schema_string(
                        "The unique identifier of the request to update.",
                    ),
                    "request": {
                        "type": "object",
                        "description": "An object containing the request details to update. Only include the fields you want to change.",
                        "properties": {
                            "name": json_schema_string("The name of the request."),
                            "method": json_schema_string(
                                "The HTTP method for the request (e.g., GET, POST, PUT).",
                            ),
                            "url": json_schema_string("The URL of the request."),
                            "description": json_schema_string("A description for the request."),
                            "auth": {
                                "type": "object",
                                "description": "The authentication method for the request."
                            },
                            "header": json_schema_array(
                                json!({
                                    "type": "object",
                                    "properties": {
                                        "key": {"type": "string"},
                                        "value": {"type": "string"},
                                        "disabled": {"type": "boolean"},
                                        "description": {"type": "string"}
                                    },
                                    "required": ["key", "value"]
                                }),
                                "An array of header objects for the request.",
                            ),
                            "body": {
                                "type": "object",
                                "description": "The body of the request."
                            },
                            "event": json_schema_array(
                                json!({
                                    "type": "object",
                                    "properties": {
                                        "listen": json_schema_string(
                                            "Specifies when the script will execute. Common values are 'prerequest' and 'test'.",
                                        ),
                                        "script": {
                                            "type": "object",
                                            "description": "Contains the script details.",
                                            "properties": {
                                                "id": {"type": "string"},
                                                "type": {"type": "string", "default": "text/javascript"},
                                                "exec": {
                                                    "type": "array",
                                                    "items": {"type": "string"},
                                                    "description": "An array of strings, where each string is a line of the script."
                                                },
                                                "name": {"type": "string"}
                                            },
                                            "required": ["exec"]
                                        },
                                        "disabled": {"type": "boolean", "default": false}
                                    },
                                    "required": ["listen", "script"]
                                }),
                                "An array of event objects for pre-request scripts or test scripts.",
                            ),
                        }
                    },
                }),
                vec!["collection_id", "request_id", "request"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: UpdateRequestArgs = parse_args("update_collection_request", arguments)?;
        let path = format!(
            "/collections/{}/requests/{}",
            args.collection_id, args.request_id
        );

        debug!(
            collection_id = %args.collection_id,
            request_id = %args.request_id,
            "updating collection request"
        );
        let sent_lines = sent_script_lines(&args.request);
        if let Some(lines) = sent_lines {
            debug!(script_lines = lines, "request carries a script");
        }

        // Record the current revision first. A failed read is not a reason
        // to abort the update.
        match self
            .client
            .get::<serde_json::Value>(&path)
            .await
        {
            Ok(current) => {
                let revision = current
                    .pointer("/data/lastRevision")
                    .cloned()
                    .unwrap_or(serde_json::Value::String("unknown".to_string()));
                debug!(revision = %revision, "current revision before update");
            }
            Err(err) => {
                warn!(error = %err, "failed to read request before update");
            }
        }

        let body: serde_json::Value = self.client.put(&path, &args.request).await?;

        let mut result = json_result(&body)?;
        if let (Some(sent), Some(returned)) = (sent_lines, returned_script_lines(&body)) {
            if sent != returned {
                warn!(
                    sent_lines = sent,
                    returned_lines = returned,
                    "script length changed unexpectedly"
                );
                result = result.with_note(format!(
                    "Note: script length changed unexpectedly ({} lines sent, {} returned)",
                    sent, returned
                ));
            }
        }
        Ok(result)
    }
}

#[derive(Debug, Deserialize)]
struct RequestIdArgs {
    collection_id: String,
    request_id: String,
}

impl ValidateArgs for RequestIdArgs {}

/// Delete a request from a collection.
pub struct DeleteCollectionRequestTool {
    client: PostmanClient,
}

impl DeleteCollectionRequestTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for DeleteCollectionRequestTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "delete_collection_request".to_string(),
            description: "Delete a request from a collection".to_string(),
            input_schema: json_schema_object(
                json!({
                    "collection_id": json_schema_string("Collection ID"),
                    "request_id": json_schema_string("Request ID"),
                }),
                vec!["collection_id", "request_id"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: RequestIdArgs = parse_args("delete_collection_request", arguments)?;
        let path = format!(
            "/collections/{}/requests/{}",
            args.collection_id, args.request_id
        );
        let body: serde_json::Value = self.client.delete(&path).await?;
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct CreateResponseArgs {
    collection_id: String,
    request_id: String,
    response: serde_json::Value,
}

impl ValidateArgs for CreateResponseArgs {
    fn validate(&self) -> Result<(), String> {
        if !self.response.is_object() {
            return Err("response must be an object".to_string());
        }
        Ok(())
    }
}

/// Create a saved response under a request.
pub struct CreateCollectionResponseTool {
    client: PostmanClient,
}

impl CreateCollectionResponseTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for CreateCollectionResponseTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_collection_response".to_string(),
            description: "Create a new response in a collection".to_string(),
            input_schema: json_schema_object(
                json!({
                    "collection_id": json_schema_string("Collection ID"),
                    "request_id": json_schema_string("Parent request ID"),
                    "response": json_schema_object(
                        json!({
                            "name": json_schema_string("Response name"),
                            "code": json_schema_number("HTTP status code"),
                            "status": json_schema_string("HTTP status text"),
                        }),
                        vec![],
                    ),
                }),
                vec!["collection_id", "request_id", "response"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: CreateResponseArgs = parse_args("create_collection_response", arguments)?;
        let path = format!("/collections/{}/responses", args.collection_id);
        let body: serde_json::Value = self
            .client
            .post_with_query(&path, &args.response, &[("request_id", args.request_id.as_str())])
            .await?;
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct GetResponseArgs {
    collection_id: String,
    response_id: String,
    #[serde(flatten)]
    flags: DetailFlags,
}

impl ValidateArgs for GetResponseArgs {}

/// Fetch a saved response from a collection.
pub struct GetCollectionResponseTool {
    client: PostmanClient,
}

impl GetCollectionResponseTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for GetCollectionResponseTool {
    fn schema(&self) -> ToolSchema {
        let mut properties = json!({
            "collection_id": json_schema_string("Collection ID"),
            "response_id": json_schema_string("Response ID"),
        });
        merge_properties(&mut properties, detail_flag_properties());
        ToolSchema {
            name: "get_collection_response".to_string(),
            description: "Get details of a specific response in a collection".to_string(),
            input_schema: json_schema_object(properties, vec!["collection_id", "response_id"]),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: GetResponseArgs = parse_args("get_collection_response", arguments)?;
        let path = format!(
            "/collections/{}/responses/{}",
            args.collection_id, args.response_id
        );
        let body: serde_json::Value = self
            .client
            .get_with_query(&path, &args.flags.to_query())
            .await?;
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct UpdateResponseArgs {
    collection_id: String,
    response_id: String,
    response: serde_json::Value,
}

impl ValidateArgs for UpdateResponseArgs {
    fn validate(&self) -> Result<(), String> {
        if !self.response.is_object() {
            return Err("response must be an object".to_string());
        }
        Ok(())
    }
}

/// Update a saved response; only provided fields change.
pub struct UpdateCollectionResponseTool {
    client: PostmanClient,
}

impl UpdateCollectionResponseTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for UpdateCollectionResponseTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "update_collection_response".to_string(),
            description:
                "Update a response in a collection. Acts like PATCH, only updates provided values."
                    .to_string(),
            input_schema: json_schema_object(
                json!({
                    "collection_id": json_schema_string("Collection ID"),
                    "response_id": json_schema_string("Response ID"),
                    "response": json_schema_object(
                        json!({
                            "name": json_schema_string("Response name"),
                            "code": json_schema_number("HTTP status code"),
                            "status": json_schema_string("HTTP status text"),
                        }),
                        vec![],
                    ),
                }),
                vec!["collection_id", "response_id", "response"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: UpdateResponseArgs = parse_args("update_collection_response", arguments)?;
        let path = format!(
            "/collections/{}/responses/{}",
            args.collection_id, args.response_id
        );
        let body: serde_json::Value = self.client.put(&path, &args.response).await?;
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct ResponseIdArgs {
    collection_id: String,
    response_id: String,
}

impl ValidateArgs for ResponseIdArgs {}

/// Delete a saved response from a collection.
pub struct DeleteCollectionResponseTool {
    client: PostmanClient,
}

impl DeleteCollectionResponseTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for DeleteCollectionResponseTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "delete_collection_response".to_string(),
            description: "Delete a response from a collection".to_string(),
            input_schema: json_schema_object(
                json!({
                    "collection_id": json_schema_string("Collection ID"),
                    "response_id": json_schema_string("Response ID"),
                }),
                vec!["collection_id", "response_id"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: ResponseIdArgs = parse_args("delete_collection_response", arguments)?;
        let path = format!(
            "/collections/{}/responses/{}",
            args.collection_id, args.response_id
        );
        let body: serde_json::Value = self.client.delete(&path).await?;
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct ForkCollectionArgs {
    collection_id: String,
    workspace: String,
    label: String,
}

impl ValidateArgs for ForkCollectionArgs {}

/// Fork a collection into a workspace.
pub struct ForkCollectionTool {
    client: PostmanClient,
}

impl ForkCollectionTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for ForkCollectionTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "fork_collection".to_string(),
            description: "Fork a collection to a workspace".to_string(),
            input_schema: json_schema_object(
                json!({
                    "collection_id": json_schema_string("Collection ID to fork"),
                    "workspace": json_schema_string("Destination workspace ID"),
                    "label": json_schema_string("Label for the forked collection"),
                }),
                vec!["collection_id", "workspace", "label"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: ForkCollectionArgs = parse_args("fork_collection", arguments)?;
        let payload = json!({
            "workspace": workspace_reference(&args.workspace),
            "label": args.label,
        });
        let body: serde_json::Value = self
            .client
            .post(&format!("/collections/fork/{}", args.collection_id), &payload)
            .await?;
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct GetCollectionForksArgs {
    collection_id: String,
    #[serde(default)]
    cursor: Option<String>,
    #[serde(default)]
    limit: Option<u32>,
    #[serde(default)]
    direction: Option<SortDirection>,
    #[serde(default)]
    sort: Option<ForkSortKey>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Deserialize)]
enum ForkSortKey {
    #[serde(rename = "createdAt")]
    CreatedAt,
}

impl ValidateArgs for GetCollectionForksArgs {}

/// List the forks of a collection.
pub struct GetCollectionForksTool {
    client: PostmanClient,
}

impl GetCollectionForksTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for GetCollectionForksTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_collection_forks".to_string(),
            description: "Get a list of collection forks".to_string(),
            input_schema: json_schema_object(
                json!({
                    "collection_id": json_schema_string("Collection ID"),
                    "cursor": json_schema_string("Pagination cursor"),
                    "limit": json_schema_number("Maximum number of results to return"),
                    "direction": json_schema_enum("Sort direction", vec!["asc", "desc"]),
                    "sort": json_schema_enum("Sort field", vec!["createdAt"]),
                }),
                vec!["collection_id"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: GetCollectionForksArgs = parse_args("get_collection_forks", arguments)?;
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(cursor) = &args.cursor {
            query.push(("cursor", cursor.clone()));
        }
        if let Some(limit) = args.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(direction) = args.direction {
            let value = match direction {
                SortDirection::Asc => "asc",
                SortDirection::Desc => "desc",
            };
            query.push(("direction", value.to_string()));
        }
        if args.sort.is_some() {
            query.push(("sort", "createdAt".to_string()));
        }
        let path = format!("/collections/{}/forks", args.collection_id);
        let body: serde_json::Value = self.client.get_with_query(&path, &query).await?;
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct MergeCollectionForkArgs {
    source: String,
    destination: String,
    strategy: MergeStrategy,
}

#[derive(Debug, Clone, Copy, Deserialize)]
enum MergeStrategy {
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "updateSourceWithDestination")]
    UpdateSourceWithDestination,
    #[serde(rename = "deleteSource")]
    DeleteSource,
}

impl MergeStrategy {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::UpdateSourceWithDestination => "updateSourceWithDestination",
            Self::DeleteSource => "deleteSource",
        }
    }
}

impl ValidateArgs for MergeCollectionForkArgs {}

/// Merge a forked collection back into its parent.
pub struct MergeCollectionForkTool {
    client: PostmanClient,
}

impl MergeCollectionForkTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for MergeCollectionForkTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "merge_collection_fork".to_string(),
            description: "Merge a forked collection back into its parent".to_string(),
            input_schema: json_schema_object(
                json!({
                    "source": json_schema_string("Source collection ID"),
                    "destination": json_schema_string("Destination collection ID"),
                    "strategy": json_schema_enum(
                        "Merge strategy",
                        vec!["default", "updateSourceWithDestination", "deleteSource"],
                    ),
                }),
                vec!["source", "destination", "strategy"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: MergeCollectionForkArgs = parse_args("merge_collection_fork", arguments)?;
        let payload = json!({
            "strategy": args.strategy.as_str(),
            "source": args.source,
            "destination": args.destination,
        });
        let body: serde_json::Value = self.client.put("/collection-merges", &payload).await?;
        json_result(&body)
    }
}

/// Pull parent changes into a forked collection.
pub struct PullCollectionChangesTool {
    client: PostmanClient,
}

impl PullCollectionChangesTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for PullCollectionChangesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "pull_collection_changes".to_string(),
            description: "Pull changes from parent collection into forked collection".to_string(),
            input_schema: json_schema_object(
                json!({
                    "collection_id": json_schema_string("Collection ID"),
                }),
                vec!["collection_id"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: CollectionIdArgs = parse_args("pull_collection_changes", arguments)?;
        let body: serde_json::Value = self
            .client
            .put(&format!("/collections/{}/pulls", args.collection_id), &json!({}))
            .await?;
        json_result(&body)
    }
}

#[derive(Debug, Deserialize)]
struct TransferItemsArgs {
    #[serde(rename = "type")]
    item_type: TransferItemType,
    ids: Vec<String>,
    target: serde_json::Value,
    #[serde(default)]
    location: Option<serde_json::Value>,
    mode: TransferMode,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TransferItemType {
    Folder,
    Request,
    Response,
}

impl TransferItemType {
    fn endpoint(&self) -> &'static str {
        match self {
            Self::Folder => "/collection-folders-transfers",
            Self::Request => "/collection-requests-transfers",
            Self::Response => "/collection-responses-transfers",
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TransferMode {
    Copy,
    Move,
}

impl TransferMode {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Move => "move",
        }
    }
}

impl ValidateArgs for TransferItemsArgs {
    fn validate(&self) -> Result<(), String> {
        if self.ids.is_empty() {
            return Err("ids must not be empty".to_string());
        }
        if !self.target.is_object() {
            return Err("target must be an object".to_string());
        }
        Ok(())
    }
}

/// Copy or move folders, requests, or responses between collections.
pub struct TransferCollectionItemsTool {
    client: PostmanClient,
}

impl TransferCollectionItemsTool {
    pub fn new(client: PostmanClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for TransferCollectionItemsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "transfer_collection_items".to_string(),
            description: "Transfer items between collections".to_string(),
            input_schema: json_schema_object(
                json!({
                    "type": json_schema_enum(
                        "Type of items to transfer",
                        vec!["folder", "request", "response"],
                    ),
                    "ids": json_schema_array(
                        json!({"type": "string"}),
                        "IDs of items to transfer",
                    ),
                    "target": json_schema_object(
                        json!({
                            "model": json_schema_string("Target model"),
                            "id": json_schema_string("Target ID"),
                        }),
                        vec![],
                    ),
                    "location": json_schema_object(
                        json!({
                            "position": json_schema_string("Placement position"),
                            "model": json_schema_string("Location model"),
                            "id": json_schema_string("Location ID"),
                        }),
                        vec![],
                    ),
                    "mode": json_schema_enum("Transfer mode", vec!["copy", "move"]),
                }),
                vec!["type", "ids", "target", "mode"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: TransferItemsArgs = parse_args("transfer_collection_items", arguments)?;
        let mut payload = json!({
            "ids": args.ids,
            "target": args.target,
            "mode": args.mode.as_str(),
        });
        if let Some(location) = &args.location {
            payload["location"] = location.clone();
        }
        let body: serde_json::Value = self
            .client
            .post(args.item_type.endpoint(), &payload)
            .await?;
        json_result(&body)
    }
}

/// Merge additional properties into a `properties` JSON object.
fn merge_properties(base: &mut serde_json::Value, extra: serde_json::Value) {
    if let (Some(base_map), Some(extra_map)) = (base.as_object_mut(), extra.as_object()) {
        for (key, value) in extra_map {
            base_map.insert(key.clone(), value.clone());
        }
    }
}
