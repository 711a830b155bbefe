pub mod grouping;
pub mod operations;
pub mod types;

pub use grouping::{DEFAULT_TAG, PathGroup, group_by_path, group_by_primary_tag, group_by_tag};
pub use operations::*;
pub use types::{IrInfo, IrModule, IrServer, IrSpec};

use crate::error::ModelError;

/// Load a model document from YAML.
pub fn from_yaml(input: &str) -> Result<IrSpec, ModelError> {
    let spec: IrSpec = serde_yaml_ng::from_str(input)?;
    validate(&spec)?;
    Ok(spec)
}

/// Load a model document from JSON.
pub fn from_json(input: &str) -> Result<IrSpec, ModelError> {
    let spec: IrSpec = serde_json::from_str(input)?;
    validate(&spec)?;
    Ok(spec)
}

// Only checks what routing and grouping rely on; specification correctness is
// the parser's concern.
fn validate(spec: &IrSpec) -> Result<(), ModelError> {
    for (i, op) in spec.operations.iter().enumerate() {
        if op.operation_id.is_empty() {
            return Err(ModelError::MissingField(format!(
                "operations[{i}].operationId"
            )));
        }
        if op.path.is_empty() {
            return Err(ModelError::MissingField(format!("operations[{i}].path")));
        }
    }
    Ok(())
}
