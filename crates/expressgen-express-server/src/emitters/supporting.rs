use expressgen_core::ir::{IrSpec, group_by_primary_tag};
use expressgen_core::routing::join_path;
use expressgen_core::transform::to_api_filename;
use expressgen_core::{FileCategory, GeneratedFile, GeneratorError, WriteMode};
use minijinja::{Environment, Value, context};

use super::context::{ContextBuilder, ProjectContext};
use super::render;
use super::spec_file::OPENAPI_TEMPLATE;

/// A template rendered once per run to a fixed destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportingFile {
    pub template: String,
    pub folder: String,
    pub destination: String,
    pub write_mode: WriteMode,
}

impl SupportingFile {
    pub fn new(template: &str, folder: &str, destination: &str) -> Self {
        Self {
            template: template.to_string(),
            folder: folder.to_string(),
            destination: destination.to_string(),
            write_mode: WriteMode::Overwrite,
        }
    }

    /// Keep a user-edited copy on later runs.
    pub fn do_not_overwrite(mut self) -> Self {
        self.write_mode = WriteMode::SkipIfExists;
        self
    }

    /// Output path relative to the output root.
    pub fn path(&self) -> String {
        join_path(&self.folder, &self.destination)
    }
}

/// The files an Express server needs besides the per-API ones.
pub fn express_supporting_files() -> Vec<SupportingFile> {
    vec![
        SupportingFile::new("controllers/Controller", "src/controllers", "Controller.js"),
        SupportingFile::new("services/index", "src/services", "index.js"),
        SupportingFile::new("services/Service", "src/services", "Service.js"),
        SupportingFile::new(OPENAPI_TEMPLATE, "src/api", "openapi.yaml"),
        SupportingFile::new("config", "src", "config.js"),
        SupportingFile::new("expressServer", "src", "expressServer.js"),
        SupportingFile::new("server", "src", "server.js"),
        SupportingFile::new("logger", "src", "logger.js"),
        SupportingFile::new("eslintrc", "", ".eslintrc.json"),
        SupportingFile::new("utils/openapiRouter", "src/utils", "openapiRouter.js"),
        SupportingFile::new("package", "", "package.json").do_not_overwrite(),
        SupportingFile::new("README", "", "README.md").do_not_overwrite(),
    ]
}

/// Render each supporting file with the whole-API context.
pub fn emit_supporting_files(
    env: &Environment<'_>,
    builder: &ContextBuilder<'_>,
    files: &[SupportingFile],
    ir: &IrSpec,
    project: &ProjectContext,
    openapi_yaml: &str,
) -> Result<Vec<GeneratedFile>, GeneratorError> {
    let operations = builder.operations(&ir.operations)?;
    // Same buckets as the per-tag implementation files.
    let modules: Vec<Value> = group_by_primary_tag(&ir.operations)
        .into_iter()
        .map(|module| {
            context! {
                class_name => to_api_filename(&module.name),
                operations => module.operations,
                name => module.name,
            }
        })
        .collect();
    let ctx = context! {
        operations => operations,
        operations_by_path => builder.operations_by_path(&ir.operations)?,
        modules => modules,
        openapi_yaml => openapi_yaml,
        ..Value::from_serialize(project)
    };

    files
        .iter()
        .map(|file| {
            let path = file.path();
            log::debug!("rendering supporting file {path} from `{}`", file.template);
            Ok(GeneratedFile {
                content: render(env, &file.template, ctx.clone())?,
                path,
                category: FileCategory::Supporting,
                write_mode: file.write_mode,
            })
        })
        .collect()
}
