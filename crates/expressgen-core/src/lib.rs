pub mod config;
pub mod error;
pub mod features;
pub mod ir;
pub mod output;
pub mod postprocess;
pub mod routing;
pub mod transform;

pub use error::{ConfigError, GeneratorError, ModelError, RoutingError, WriteError};

use config::ServerConfig;
use features::FeatureSet;

/// How a generated file treats an existing file at its destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    #[default]
    Overwrite,
    /// Leave an existing file untouched (package manifest, README).
    SkipIfExists,
}

/// What produced a generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    /// Rendered from an API template, once per tag or once per consolidated file.
    Api,
    /// A supporting file not tied to a single operation.
    Supporting,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Api => "api",
            FileCategory::Supporting => "supporting-file",
        }
    }
}

/// A generated file with path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
    pub category: FileCategory,
    pub write_mode: WriteMode,
}

/// Trait for code generators that produce files from an IR spec.
pub trait CodeGenerator {
    /// Name used to select the generator (`-g`).
    fn name(&self) -> &'static str;

    /// Specification capabilities this generator accepts.
    fn features(&self) -> &FeatureSet;

    /// Extension (without the dot) of the generated language's source files.
    fn source_extension(&self) -> &'static str;

    /// Environment variable naming the per-file formatter command.
    fn post_process_env(&self) -> &'static str;

    fn generate(
        &self,
        ir: &ir::IrSpec,
        config: &ServerConfig,
    ) -> Result<Vec<GeneratedFile>, GeneratorError>;
}
