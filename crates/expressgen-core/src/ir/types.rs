use serde::{Deserialize, Serialize};

use super::grouping::group_by_tag;
use super::operations::IrOperation;

/// The parsed API model a generation run works from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrSpec {
    pub info: IrInfo,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<IrServer>,
    #[serde(default)]
    pub operations: Vec<IrOperation>,
    /// The original specification document, re-serialized into the output tree.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub document: serde_json::Value,
}

impl IrSpec {
    /// Operations grouped by tag, one module per tag.
    pub fn modules(&self) -> Vec<IrModule> {
        group_by_tag(&self.operations)
    }
}

/// API metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrInfo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub version: String,
}

/// A server URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrServer {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A module groups operations by tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrModule {
    pub name: String,
    pub operations: Vec<usize>, // indices into IrSpec.operations
}

// Re-export operation types for convenience
pub use super::operations::*;
