//! Argument validation: the single gate between untrusted input and the
//! tool handlers.
//!
//! Every handler deserializes its argument bundle through [`parse_args`]
//! before doing anything else. Structural constraints `serde` cannot express
//! (composite UID patterns, nested-document shape) live in [`ValidateArgs`]
//! implementations next to the argument structs.

use crate::error::{ToolError, ToolResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;

/// Environment UID: `<ownerId>-<environmentUuid>` where the owner is numeric
/// and the environment part is a canonical lowercase hex UUID.
static UID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+-[\da-f]{8}-[\da-f]{4}-[\da-f]{4}-[\da-f]{4}-[\da-f]{12}$")
        .expect("UID pattern is valid")
});

/// Structural checks beyond what deserialization enforces.
pub trait ValidateArgs {
    /// Reject the bundle with a reason, or accept it.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Deserialize and validate a tool's argument bundle.
///
/// Rejections become `ToolError::InvalidParams` carrying the tool name and
/// the reason; no handler runs on a rejected bundle.
pub fn parse_args<T>(tool: &str, args: serde_json::Value) -> ToolResult<T>
where
    T: DeserializeOwned + ValidateArgs,
{
    let bundle: T = serde_json::from_value(args)
        .map_err(|e| ToolError::InvalidParams(format!("Invalid arguments for {}: {}", tool, e)))?;
    bundle
        .validate()
        .map_err(|reason| ToolError::InvalidParams(format!("Invalid arguments for {}: {}", tool, reason)))?;
    Ok(bundle)
}

/// Check an environment identifier in composite UID form.
pub fn is_valid_uid(id: &str) -> bool {
    UID_PATTERN.is_match(id)
}

/// Build an environment UID from its owner and environment parts.
pub fn construct_environment_uid(owner: &str, id: &str) -> String {
    format!("{}-{}", owner, id)
}

/// Split an environment UID on the first `-`, recovering the owner and
/// environment parts. Returns `None` when there is no separator.
pub fn split_environment_uid(uid: &str) -> Option<(&str, &str)> {
    uid.split_once('-')
}
