use std::collections::{HashMap, HashSet};

use expressgen_core::config::ServerConfig;
use expressgen_core::ir::{IrOperation, IrResponse, IrSpec, group_by_path};
use expressgen_core::routing::RoutingTable;
use expressgen_core::transform::NameSanitizer;
use expressgen_core::{GeneratorError, RoutingError};
use serde::Serialize;

use super::scaffold::package_name;

/// Template that holds the per-tag business logic services delegate to.
pub const API_IMPL_TEMPLATE: &str = "api_impl/api_implementation";

/// Values every template sees.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectContext {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub version: String,
    pub api_version: String,
    pub impl_folder: String,
    pub server_port: u16,
    pub package_name: String,
    /// Path part of the first server URL, without leading or trailing slashes.
    pub base_path: String,
}

impl ProjectContext {
    pub fn new(ir: &IrSpec, config: &ServerConfig) -> Self {
        Self {
            title: ir.info.title.clone(),
            description: ir.info.description.clone(),
            version: ir.info.version.clone(),
            api_version: config.api_version.clone(),
            impl_folder: config.impl_folder.clone(),
            server_port: config.port,
            package_name: package_name(ir, config),
            base_path: ir
                .servers
                .first()
                .map(|s| base_path(&s.url))
                .unwrap_or_default(),
        }
    }
}

/// An operation as the templates see it.
#[derive(Debug, Clone, Serialize)]
pub struct OperationContext {
    /// `operationId` exactly as declared; used as the handler lookup key.
    pub operation_id: String,
    /// Sanitized JavaScript identifier.
    pub name: String,
    pub http_method: &'static str,
    pub path: String,
    pub express_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tag: String,
    /// Module under `api_impl/` implementing this operation.
    pub impl_module: String,
    pub parameters: Vec<ParameterContext>,
    pub success_code: u16,
    pub error_code: u16,
    pub error_message: String,
    pub deprecated: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParameterContext {
    pub name: String,
    pub param_name: String,
    pub location: &'static str,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub needs_alias: bool,
}

/// Operations sharing one path, for "one block per path" templates.
#[derive(Debug, Clone, Serialize)]
pub struct PathGroupContext {
    pub path: String,
    pub operations: Vec<OperationContext>,
}

/// JavaScript function name for each `operationId`, unique across the API.
///
/// Names are sanitized first. When two operations sanitize to the same name
/// (`get-pet` and `getPet`), later ones get `_1`, `_2`, ... in model order.
#[derive(Debug, Clone, Default)]
pub struct OperationNames {
    names: HashMap<String, String>,
}

impl OperationNames {
    pub fn new(sanitizer: &NameSanitizer, operations: &[IrOperation]) -> Self {
        let mut taken: HashSet<String> = HashSet::new();
        let mut names = HashMap::new();
        for op in operations {
            if names.contains_key(&op.operation_id) {
                continue;
            }
            let base = sanitizer.sanitize(&op.operation_id);
            let mut name = base.clone();
            let mut counter = 0;
            while taken.contains(&name) {
                counter += 1;
                name = format!("{base}_{counter}");
            }
            if counter > 0 {
                log::warn!(
                    "operation `{}` renamed to `{name}` to avoid a duplicate identifier",
                    op.operation_id
                );
            }
            taken.insert(name.clone());
            names.insert(op.operation_id.clone(), name);
        }
        Self { names }
    }

    /// The assigned name, or the plain sanitized one for unknown ids.
    pub fn get(&self, sanitizer: &NameSanitizer, operation_id: &str) -> String {
        self.names
            .get(operation_id)
            .cloned()
            .unwrap_or_else(|| sanitizer.sanitize(operation_id))
    }
}

/// Builds template contexts from IR operations.
pub struct ContextBuilder<'a> {
    pub routing: &'a RoutingTable,
    pub sanitizer: &'a NameSanitizer,
    names: OperationNames,
}

impl<'a> ContextBuilder<'a> {
    /// `operations` is the whole API; function names are assigned across all of it.
    pub fn new(
        routing: &'a RoutingTable,
        sanitizer: &'a NameSanitizer,
        operations: &[IrOperation],
    ) -> Self {
        Self {
            routing,
            sanitizer,
            names: OperationNames::new(sanitizer, operations),
        }
    }

    pub fn operation_name(&self, operation_id: &str) -> String {
        self.names.get(self.sanitizer, operation_id)
    }

    pub fn operation(&self, op: &IrOperation) -> Result<OperationContext, RoutingError> {
        let tag = op.primary_tag().to_string();
        let impl_module = self.routing.base_filename(API_IMPL_TEMPLATE, &tag)?;

        let parameters = op
            .parameters
            .iter()
            .map(|p| {
                let param_name = self.sanitizer.sanitize(&p.name);
                ParameterContext {
                    needs_alias: param_name != p.name,
                    name: p.name.clone(),
                    param_name,
                    location: p.location.as_str(),
                    required: p.required,
                    description: p.description.clone(),
                }
            })
            .collect();

        let codes: Vec<(u16, &IrResponse)> = op
            .responses
            .iter()
            .filter_map(|r| r.code.parse::<u16>().ok().map(|code| (code, r)))
            .collect();
        let success_code = codes
            .iter()
            .find(|(code, _)| (200..300).contains(code))
            .map(|(code, _)| *code)
            .unwrap_or(200);
        let error = codes.iter().find(|(code, _)| *code >= 400);

        Ok(OperationContext {
            operation_id: op.operation_id.clone(),
            name: self.operation_name(&op.operation_id),
            http_method: op.method.as_lower(),
            path: op.path.clone(),
            express_path: express_path(&op.path),
            summary: op.summary.clone(),
            description: op.description.clone(),
            tag,
            impl_module,
            parameters,
            success_code,
            error_code: error.map(|(code, _)| *code).unwrap_or(405),
            error_message: error
                .and_then(|(_, r)| r.description.clone())
                .unwrap_or_else(|| "Invalid input".to_string()),
            deprecated: op.deprecated,
        })
    }

    pub fn operations<'o, I>(&self, ops: I) -> Result<Vec<OperationContext>, GeneratorError>
    where
        I: IntoIterator<Item = &'o IrOperation>,
    {
        ops.into_iter()
            .map(|op| self.operation(op).map_err(GeneratorError::from))
            .collect()
    }

    /// Group by path first, then build each group's operation contexts.
    pub fn operations_by_path<'o, I>(&self, ops: I) -> Result<Vec<PathGroupContext>, GeneratorError>
    where
        I: IntoIterator<Item = &'o IrOperation>,
    {
        let ops: Vec<IrOperation> = ops.into_iter().cloned().collect();
        group_by_path(&ops)
            .into_iter()
            .map(|group| {
                Ok(PathGroupContext {
                    path: group.path.to_string(),
                    operations: self.operations(group.operations)?,
                })
            })
            .collect()
    }
}

/// Distinct implementation modules, in first-seen order.
pub fn impl_modules(ops: &[OperationContext]) -> Vec<String> {
    let mut modules: Vec<String> = Vec::new();
    for op in ops {
        if !modules.contains(&op.impl_module) {
            modules.push(op.impl_module.clone());
        }
    }
    modules
}

/// `/pet/{petId}` → `/pet/:petId`
pub fn express_path(path: &str) -> String {
    path.replace('{', ":").replace('}', "")
}

/// Path part of a server URL without surrounding slashes.
///
/// - `http://localhost:8080/v2` → `v2`
/// - `/api/v1/` → `api/v1`
/// - `https://example.com` → ``
pub fn base_path(url: &str) -> String {
    let without_scheme = match url.split_once("://") {
        Some((_, rest)) => match rest.find('/') {
            Some(i) => &rest[i..],
            None => "",
        },
        None => url,
    };
    without_scheme.trim_matches('/').to_string()
}
