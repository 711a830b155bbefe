use expressgen_core::config::ServerConfig;
use expressgen_core::features::{
    DocumentationFeature, FeatureSet, GlobalFeature, ParameterFeature, SchemaSupportFeature,
    SecurityFeature, WireFormatFeature,
};
use expressgen_core::ir::IrSpec;
use expressgen_core::routing::RoutingTable;
use expressgen_core::transform::NameSanitizer;
use expressgen_core::{CodeGenerator, GeneratedFile, GeneratorError};

use crate::emitters;
use crate::emitters::context::{API_IMPL_TEMPLATE, ContextBuilder, ProjectContext};
use crate::emitters::supporting::{SupportingFile, express_supporting_files};

pub const GENERATOR_NAME: &str = "nodejs-express-server-esm";

/// Environment variable holding the per-file formatter command.
pub const POST_PROCESS_ENV: &str = "JS_POST_PROCESS_FILE";

const SOURCE_EXTENSION: &str = "js";

/// API templates and their output directories, in render order.
const API_TEMPLATES: &[(&str, &str)] = &[
    ("controllers/api_controller", "src/controllers"),
    ("controllers/handlers", "src/controllers"),
    ("controllers/index", "src/controllers"),
    ("services/services", "src/services"),
    (API_IMPL_TEMPLATE, "src/api_impl"),
];

/// Node.js Express server stub generator emitting ES modules.
#[derive(Debug, Clone)]
pub struct ExpressServerGenerator {
    routing: RoutingTable,
    api_templates: Vec<String>,
    supporting_files: Vec<SupportingFile>,
    features: FeatureSet,
    sanitizer: NameSanitizer,
}

impl ExpressServerGenerator {
    pub fn new() -> Self {
        let mut routing = RoutingTable::default();
        for &(template, dir) in API_TEMPLATES {
            routing = routing.register(template, dir, ".js");
        }

        Self {
            routing,
            api_templates: API_TEMPLATES.iter().map(|(t, _)| t.to_string()).collect(),
            supporting_files: express_supporting_files(),
            features: express_features(),
            sanitizer: NameSanitizer::default(),
        }
    }

    /// Render an additional API template. It must have a routing entry by
    /// generation time.
    pub fn with_api_template(mut self, template: &str) -> Self {
        self.api_templates.push(template.to_string());
        self
    }

    pub fn routing(&self) -> &RoutingTable {
        &self.routing
    }

    pub fn api_templates(&self) -> impl Iterator<Item = &str> {
        self.api_templates.iter().map(String::as_str)
    }

    pub fn supporting_files(&self) -> &[SupportingFile] {
        &self.supporting_files
    }

    pub fn sanitizer(&self) -> &NameSanitizer {
        &self.sanitizer
    }
}

impl Default for ExpressServerGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn express_features() -> FeatureSet {
    FeatureSet::toolkit_default()
        .include_documentation([DocumentationFeature::Readme, DocumentationFeature::Api])
        .wire_formats([WireFormatFeature::Json])
        .security([SecurityFeature::OAuth2Implicit])
        .exclude_global([
            GlobalFeature::XmlStructureDefinitions,
            GlobalFeature::Callbacks,
            GlobalFeature::LinkObjects,
            GlobalFeature::ParameterStyling,
        ])
        .exclude_schema_support([SchemaSupportFeature::Polymorphism])
        .include_parameters([ParameterFeature::Cookie])
}

impl CodeGenerator for ExpressServerGenerator {
    fn name(&self) -> &'static str {
        GENERATOR_NAME
    }

    fn features(&self) -> &FeatureSet {
        &self.features
    }

    fn source_extension(&self) -> &'static str {
        SOURCE_EXTENSION
    }

    fn post_process_env(&self) -> &'static str {
        POST_PROCESS_ENV
    }

    fn generate(
        &self,
        ir: &IrSpec,
        config: &ServerConfig,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        let templates: Vec<&str> = self.api_templates().collect();
        // Fail before rendering anything if a template has no route.
        self.routing.validate(templates.iter().copied())?;

        let env = emitters::environment()?;
        let builder = ContextBuilder::new(&self.routing, &self.sanitizer, &ir.operations);
        let project = ProjectContext::new(ir, config);

        let mut files = emitters::api::emit_api_files(&env, &builder, &templates, ir, &project)?;
        let openapi_yaml = emitters::spec_file::emit_openapi_yaml(ir, &builder)?;
        files.extend(emitters::supporting::emit_supporting_files(
            &env,
            &builder,
            &self.supporting_files,
            ir,
            &project,
            &openapi_yaml,
        )?);

        log::info!(
            "{GENERATOR_NAME}: generated {} files for {} operations",
            files.len(),
            ir.operations.len()
        );
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expressgen_core::features::Feature;

    #[test]
    fn test_api_templates_routed() {
        let generator = ExpressServerGenerator::new();
        assert!(generator.routing().validate(generator.api_templates()).is_ok());
        assert!(!generator.routing().is_consolidated(API_IMPL_TEMPLATE));
        assert!(generator.routing().is_consolidated("services/services"));
    }

    #[test]
    fn test_features() {
        let features = ExpressServerGenerator::new().features().clone();
        assert!(features.supports(Feature::Parameter(ParameterFeature::Cookie)));
        assert!(features.supports(Feature::Security(SecurityFeature::OAuth2Implicit)));
        assert!(!features.supports(Feature::Global(GlobalFeature::Callbacks)));
        assert!(!features.supports(Feature::SchemaSupport(
            SchemaSupportFeature::Polymorphism
        )));
    }

    #[test]
    fn test_unrouted_template_rejected_before_render() {
        let generator = ExpressServerGenerator::new().with_api_template("docs/api_doc");
        let ir: IrSpec = serde_json::from_value(serde_json::json!({
            "info": { "title": "T", "version": "1" },
        }))
        .unwrap();
        let err = generator.generate(&ir, &ServerConfig::default()).unwrap_err();
        assert!(matches!(err, GeneratorError::Routing(_)));
    }
}
