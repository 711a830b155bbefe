use expressgen_core::ir::{DEFAULT_TAG, IrModule, IrOperation, IrSpec, group_by_primary_tag};
use expressgen_core::routing::RoutingTable;
use expressgen_core::{FileCategory, GeneratedFile, GeneratorError, WriteMode};
use indexmap::IndexMap;
use minijinja::{Environment, Value, context};

use super::context::{ContextBuilder, ProjectContext, impl_modules};
use super::render;

/// Render every API template once per distinct output path.
///
/// Operations are bucketed by their primary tag, so an operation with several
/// tags lands in exactly one per-tag file. Each module is routed next. Modules
/// that land on the same path (all of them, for consolidated templates) are
/// merged so the file is rendered once with the union of their operations, in
/// model order.
pub fn emit_api_files(
    env: &Environment<'_>,
    builder: &ContextBuilder<'_>,
    templates: &[&str],
    ir: &IrSpec,
    project: &ProjectContext,
) -> Result<Vec<GeneratedFile>, GeneratorError> {
    let routing = builder.routing;
    routing.validate(templates.iter().copied())?;

    let mut modules = group_by_primary_tag(&ir.operations);
    if modules.is_empty() {
        // Consolidated files still have to exist for an API with no operations.
        modules.push(IrModule {
            name: DEFAULT_TAG.to_string(),
            operations: Vec::new(),
        });
    }

    let project = Value::from_serialize(project);
    let mut files = Vec::new();
    for &template in templates {
        for (path, target) in route_modules(routing, template, &modules)? {
            let target_ops: Vec<&IrOperation> =
                target.indices.iter().map(|&i| &ir.operations[i]).collect();
            let operations = builder.operations(target_ops.iter().copied())?;
            let operations_by_path = builder.operations_by_path(target_ops.iter().copied())?;
            let class_name = routing.base_filename(template, &target.tag)?;
            let ctx = context! {
                tag => &target.tag,
                class_name => class_name,
                impl_modules => impl_modules(&operations),
                operations => operations,
                operations_by_path => operations_by_path,
                ..project.clone()
            };
            let content = render(env, template, ctx)?;
            log::debug!(
                "rendered `{template}` to {path} ({} operations)",
                target.indices.len()
            );
            files.push(GeneratedFile {
                path,
                content,
                category: FileCategory::Api,
                write_mode: WriteMode::Overwrite,
            });
        }
    }
    Ok(files)
}

struct RenderTarget {
    /// Tag of the first module routed here.
    tag: String,
    indices: Vec<usize>,
}

fn route_modules(
    routing: &RoutingTable,
    template: &str,
    modules: &[IrModule],
) -> Result<IndexMap<String, RenderTarget>, GeneratorError> {
    let mut targets: IndexMap<String, RenderTarget> = IndexMap::new();
    for module in modules {
        let path = routing.resolve(template, &module.name)?;
        targets
            .entry(path)
            .or_insert_with(|| RenderTarget {
                tag: module.name.clone(),
                indices: Vec::new(),
            })
            .indices
            .extend(&module.operations);
    }
    for target in targets.values_mut() {
        target.indices.sort_unstable();
        target.indices.dedup();
    }
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitters::environment;
    use expressgen_core::config::ServerConfig;
    use expressgen_core::ir::{HttpMethod, IrInfo, IrOperation};
    use expressgen_core::transform::NameSanitizer;

    fn op(id: &str, path: &str, tags: &[&str]) -> IrOperation {
        IrOperation {
            operation_id: id.to_string(),
            method: HttpMethod::Get,
            path: path.to_string(),
            summary: None,
            description: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            parameters: Vec::new(),
            responses: Vec::new(),
            deprecated: false,
        }
    }

    fn spec(operations: Vec<IrOperation>) -> IrSpec {
        IrSpec {
            info: IrInfo {
                title: "Test API".to_string(),
                description: None,
                version: "1.0.0".to_string(),
            },
            servers: Vec::new(),
            operations,
            document: serde_json::Value::Null,
        }
    }

    fn routing() -> RoutingTable {
        RoutingTable::default()
            .register("controllers/api_controller", "src/controllers", ".js")
            .register("controllers/handlers", "src/controllers", ".js")
            .register("api_impl/api_implementation", "src/api_impl", ".js")
    }

    fn emit(ir: &IrSpec, templates: &[&str]) -> Result<Vec<GeneratedFile>, GeneratorError> {
        let env = environment()?;
        let routing = routing();
        let sanitizer = NameSanitizer::default();
        let builder = ContextBuilder::new(&routing, &sanitizer, &ir.operations);
        let project = ProjectContext::new(ir, &ServerConfig::default());
        emit_api_files(&env, &builder, templates, ir, &project)
    }

    #[test]
    fn test_consolidated_template_rendered_once() {
        let ir = spec(vec![
            op("listPets", "/pets", &["pet"]),
            op("getInventory", "/store/inventory", &["store"]),
            op("ping", "/ping", &["pet", "store"]),
        ]);
        let files = emit(&ir, &["controllers/api_controller"]).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "src/controllers/DefaultApiController.js");

        let content = &files[0].content;
        assert_eq!(content.matches("const ping = ").count(), 1);
        let list = content.find("const listPets").unwrap();
        let inventory = content.find("const getInventory").unwrap();
        let ping = content.find("const ping").unwrap();
        assert!(list < inventory && inventory < ping);
    }

    #[test]
    fn test_per_tag_template() {
        let ir = spec(vec![
            op("listPets", "/pets", &["pet"]),
            op("getInventory", "/store/inventory", &["store"]),
            op("health", "/health", &[]),
        ]);
        let files = emit(&ir, &["api_impl/api_implementation"]).unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "src/api_impl/PetApi.js",
                "src/api_impl/StoreApi.js",
                "src/api_impl/DefaultApi.js",
            ]
        );
        assert!(files[0].content.contains("export const listPets"));
        assert!(!files[0].content.contains("getInventory"));
        assert!(files.iter().all(|f| f.category == FileCategory::Api));
    }

    #[test]
    fn test_empty_api_still_renders_consolidated_file() {
        let files = emit(&spec(Vec::new()), &["controllers/api_controller"]).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].content.contains("export default {"));
    }

    #[test]
    fn test_unregistered_template_fails() {
        let ir = spec(vec![op("listPets", "/pets", &["pet"])]);
        let err = emit(&ir, &["controllers/api_controller", "models/model"]).unwrap_err();
        assert!(matches!(err, GeneratorError::Routing(_)));
    }

    #[test]
    fn test_handlers_map_every_operation() {
        let ir = spec(vec![
            op("listPets", "/pets", &["pet"]),
            op("get-inventory", "/store/inventory", &["store"]),
            op("showPet", "/pets", &["pet"]),
        ]);
        let files = emit(&ir, &["controllers/handlers"]).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "src/controllers/DefaultHandlers.js");

        let content = &files[0].content;
        assert!(content.contains(r#""listPets": DefaultApiController.listPets,"#));
        assert!(content.contains(r#""showPet": DefaultApiController.showPet,"#));
        assert!(content.contains(r#""get-inventory": DefaultApiController.getInventory,"#));
        assert_eq!(content.matches("// /pets\n").count(), 1);
        assert!(content.find("// /pets\n").unwrap() < content.find("// /store/inventory").unwrap());
    }

    #[test]
    fn test_multi_tag_operation_implemented_once() {
        let ir = spec(vec![
            op("listPets", "/pets", &["pet"]),
            op("ping", "/ping", &["pet", "store"]),
        ]);
        let files = emit(&ir, &["api_impl/api_implementation"]).unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["src/api_impl/PetApi.js"]);
        assert_eq!(files[0].content.matches("export const ping").count(), 1);
    }

    #[test]
    fn test_colliding_operation_names_stay_unique() {
        let ir = spec(vec![
            op("get-pet", "/pets/a", &["pet"]),
            op("getPet", "/pets/b", &["pet"]),
        ]);
        let files = emit(
            &ir,
            &["controllers/api_controller", "controllers/handlers"],
        )
        .unwrap();
        let controller = &files[0].content;
        assert_eq!(controller.matches("const getPet = async").count(), 1);
        assert_eq!(controller.matches("const getPet_1 = async").count(), 1);

        let handlers = &files[1].content;
        assert!(handlers.contains(r#""get-pet": DefaultApiController.getPet,"#));
        assert!(handlers.contains(r#""getPet": DefaultApiController.getPet_1,"#));
    }

    #[test]
    fn test_string_literals_cannot_be_closed_by_api_text() {
        let mut pet = op("listPets", "/pets", &["pet"]);
        pet.responses.push(expressgen_core::ir::IrResponse {
            code: "400".to_string(),
            description: Some(r#"bad\"); process.exit(1); //"#.to_string()),
        });
        let ir = spec(vec![pet]);
        let env = environment().unwrap();
        let routing = routing().register("services/services", "src/services", ".js");
        let sanitizer = NameSanitizer::default();
        let builder = ContextBuilder::new(&routing, &sanitizer, &ir.operations);
        let project = ProjectContext::new(&ir, &ServerConfig::default());
        let files = emit_api_files(&env, &builder, &["services/services"], &ir, &project).unwrap();

        let services = &files[0].content;
        assert!(services.contains(r#"e.message || "bad\\\"); process.exit(1); //","#));
        assert!(!services.contains(r#"|| "bad\""#));
    }
}
