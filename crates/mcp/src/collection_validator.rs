//! Structural validation of Postman Collection v2.1 documents.
//!
//! Walks the whole item tree and reports three severities: errors (the
//! collection is unusable), warnings (usable but missing something callers
//! rely on), and suggestions. A document that cannot be interpreted as a
//! collection at all is rejected outright.

use crate::error::{ToolError, ToolResult};
use serde::{Deserialize, Serialize};

/// Outcome of validating one collection document.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    #[serde(rename = "isValid")]
    pub is_valid: bool,
    pub details: ValidationDetails,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationDetails {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CollectionDocument {
    #[serde(default)]
    info: Option<CollectionInfo>,
    #[serde(default)]
    item: Vec<CollectionItem>,
}

#[derive(Debug, Deserialize)]
struct CollectionInfo {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// A tree node: a request when `request` is set, otherwise a folder whose
/// children live under `item`.
#[derive(Debug, Deserialize)]
struct CollectionItem {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    request: Option<RequestDefinition>,
    #[serde(default)]
    item: Option<Vec<CollectionItem>>,
}

#[derive(Debug, Deserialize)]
struct RequestDefinition {
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    url: Option<serde_json::Value>,
}

impl CollectionItem {
    fn is_folder(&self) -> bool {
        self.request.is_none() && self.item.is_some()
    }

    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed)")
    }
}

/// Validate a collection document without calling the API.
///
/// A document that does not deserialize as a collection is an invalid
/// request, not a validation outcome.
pub fn validate_collection(collection: &serde_json::Value) -> ToolResult<ValidationResult> {
    let document: CollectionDocument = serde_json::from_value(collection.clone())
        .map_err(|e| ToolError::InvalidRequest(format!("Unable to parse collection: {}", e)))?;

    let mut details = ValidationDetails::default();

    let info = document.info.as_ref();
    match info.and_then(|i| i.name.as_deref()).filter(|n| !n.is_empty()) {
        Some(_) => {}
        None => details.errors.push("Collection must have a name".to_string()),
    }
    if info.and_then(|i| i.description.as_deref()).filter(|d| !d.is_empty()).is_none() {
        details.warnings.push(
            "Collection lacks description which helps other users understand its purpose"
                .to_string(),
        );
    }

    for item in &document.item {
        validate_item(item, &mut details);
    }

    Ok(ValidationResult {
        is_valid: details.errors.is_empty(),
        details,
    })
}

fn validate_item(item: &CollectionItem, details: &mut ValidationDetails) {
    if item.is_folder() {
        if let Some(children) = &item.item {
            for child in children {
                validate_item(child, details);
            }
        }
        return;
    }

    let name = item.display_name();
    let request = match &item.request {
        Some(request) => request,
        None => {
            details
                .errors
                .push(format!("Item \"{}\" is missing request definition", name));
            return;
        }
    };

    if request.url.is_none() {
        details
            .errors
            .push(format!("Request \"{}\" is missing URL", name));
    }
    if request.method.as_deref().filter(|m| !m.is_empty()).is_none() {
        details
            .errors
            .push(format!("Request \"{}\" is missing HTTP method", name));
    }

    if item.name.as_deref().filter(|n| !n.is_empty()).is_none() {
        details.warnings.push(
            "Request is missing name which makes it harder to identify".to_string(),
        );
    }
    if item.description.as_deref().filter(|d| !d.is_empty()).is_none() {
        details
            .suggestions
            .push(format!("Consider adding description to request \"{}\"", name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_well_formed_collection_is_valid() {
        let collection = json!({
            "info": {
                "name": "Orders",
                "description": "Order management endpoints"
            },
            "item": [
                {
                    "name": "Get order",
                    "description": "Fetch one order",
                    "request": {"method": "GET", "url": "https://example.com/orders/1"}
                }
            ]
        });
        let result = validate_collection(&collection).unwrap();
        assert!(result.is_valid);
        assert!(result.details.errors.is_empty());
        assert!(result.details.warnings.is_empty());
    }

    #[test]
    fn test_item_without_request_is_an_error() {
        let collection = json!({
            "info": {"name": "T"},
            "item": [{"name": "r"}]
        });
        let result = validate_collection(&collection).unwrap();
        assert!(!result.is_valid);
        assert!(result
            .details
            .errors
            .iter()
            .any(|e| e.contains("\"r\"") && e.contains("missing request definition")));
    }

    #[test]
    fn test_missing_name_is_an_error_and_missing_description_a_warning() {
        let collection = json!({"info": {}, "item": []});
        let result = validate_collection(&collection).unwrap();
        assert!(!result.is_valid);
        assert!(result
            .details
            .errors
            .contains(&"Collection must have a name".to_string()));
        assert_eq!(result.details.warnings.len(), 1);
    }

    #[test]
    fn test_request_missing_url_and_method() {
        let collection = json!({
            "info": {"name": "T", "description": "d"},
            "item": [
                {"name": "broken", "description": "d", "request": {}}
            ]
        });
        let result = validate_collection(&collection).unwrap();
        assert!(!result.is_valid);
        assert!(result
            .details
            .errors
            .iter()
            .any(|e| e.contains("missing URL")));
        assert!(result
            .details
            .errors
            .iter()
            .any(|e| e.contains("missing HTTP method")));
    }

    #[test]
    fn test_folders_are_walked_recursively() {
        let collection = json!({
            "info": {"name": "T", "description": "d"},
            "item": [
                {
                    "name": "folder",
                    "item": [
                        {"name": "nested", "request": {"method": "GET"}}
                    ]
                }
            ]
        });
        let result = validate_collection(&collection).unwrap();
        assert!(!result.is_valid);
        assert!(result
            .details
            .errors
            .iter()
            .any(|e| e.contains("\"nested\"") && e.contains("missing URL")));
        // Missing description on the nested request is only a suggestion.
        assert_eq!(result.details.suggestions.len(), 1);
    }

    #[test]
    fn test_unnamed_request_warns_without_failing_validation() {
        let collection = json!({
            "info": {"name": "T", "description": "d"},
            "item": [
                {"description": "d", "request": {"method": "GET", "url": "https://x"}}
            ]
        });
        let result = validate_collection(&collection).unwrap();
        assert!(result.is_valid);
        assert_eq!(result.details.warnings.len(), 1);
    }

    #[test]
    fn test_unparseable_document_is_invalid_request() {
        let result = validate_collection(&json!({"info": {"name": 42}}));
        assert!(matches!(result, Err(ToolError::InvalidRequest(_))));
    }
}
