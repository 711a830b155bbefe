//! The copy of the API document served and validated against at runtime.

use expressgen_core::GeneratorError;
use expressgen_core::ir::{IrOperation, IrSpec};
use serde_json::{Map, Value, json};

use super::context::ContextBuilder;

pub const OPENAPI_TEMPLATE: &str = "openapi";

/// Module express-openapi-validator loads operation handlers from.
pub const OPERATION_HANDLER: &str = "controllers/DefaultApiController";

/// Serialize the API document to YAML, annotating every operation with the
/// handler module and exported function that serve it.
///
/// Models without an embedded document get a minimal one built from the
/// operations. Function names come from `builder`, so they match the
/// controller exports exactly.
pub fn emit_openapi_yaml(
    ir: &IrSpec,
    builder: &ContextBuilder<'_>,
) -> Result<String, GeneratorError> {
    let mut document = if ir.document.is_object() {
        ir.document.clone()
    } else {
        minimal_document(ir)
    };

    for op in &ir.operations {
        let method = op.method.as_lower();
        match operation_object(&mut document, &op.path, method) {
            Some(object) => {
                object.insert(
                    "x-eov-operation-handler".to_string(),
                    Value::from(OPERATION_HANDLER),
                );
                object.insert(
                    "x-eov-operation-id".to_string(),
                    Value::from(builder.operation_name(&op.operation_id)),
                );
            }
            None => log::warn!(
                "operation `{}` ({} {}) is missing from the API document",
                op.operation_id,
                op.method,
                op.path
            ),
        }
    }

    Ok(serde_yaml_ng::to_string(&document)?)
}

fn operation_object<'a>(
    document: &'a mut Value,
    path: &str,
    method: &str,
) -> Option<&'a mut Map<String, Value>> {
    document
        .get_mut("paths")?
        .get_mut(path)?
        .get_mut(method)?
        .as_object_mut()
}

fn minimal_document(ir: &IrSpec) -> Value {
    let mut info = Map::new();
    info.insert("title".to_string(), Value::from(ir.info.title.as_str()));
    if let Some(description) = &ir.info.description {
        info.insert("description".to_string(), Value::from(description.as_str()));
    }
    info.insert("version".to_string(), Value::from(ir.info.version.as_str()));

    let mut paths = Map::new();
    for op in &ir.operations {
        let item = paths
            .entry(op.path.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Some(item) = item.as_object_mut() {
            item.insert(op.method.as_lower().to_string(), minimal_operation(op));
        }
    }

    let servers: Vec<Value> = ir.servers.iter().map(|s| json!({ "url": s.url })).collect();
    let mut document = Map::new();
    document.insert("openapi".to_string(), Value::from("3.0.3"));
    document.insert("info".to_string(), Value::Object(info));
    if !servers.is_empty() {
        document.insert("servers".to_string(), Value::Array(servers));
    }
    document.insert("paths".to_string(), Value::Object(paths));
    Value::Object(document)
}

fn minimal_operation(op: &IrOperation) -> Value {
    let mut object = Map::new();
    object.insert("operationId".to_string(), Value::from(op.operation_id.as_str()));
    if let Some(summary) = &op.summary {
        object.insert("summary".to_string(), Value::from(summary.as_str()));
    }
    if !op.tags.is_empty() {
        object.insert("tags".to_string(), json!(op.tags));
    }
    if !op.parameters.is_empty() {
        let parameters: Vec<Value> = op
            .parameters
            .iter()
            .map(|p| {
                json!({
                    "name": p.name,
                    "in": p.location.as_str(),
                    "required": p.required,
                    "schema": { "type": "string" },
                })
            })
            .collect();
        object.insert("parameters".to_string(), Value::Array(parameters));
    }

    let mut responses = Map::new();
    for response in &op.responses {
        responses.insert(
            response.code.clone(),
            json!({ "description": response.description.as_deref().unwrap_or("") }),
        );
    }
    if responses.is_empty() {
        responses.insert("default".to_string(), json!({ "description": "" }));
    }
    object.insert("responses".to_string(), Value::Object(responses));
    Value::Object(object)
}
