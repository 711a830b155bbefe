pub mod api;
pub mod context;
pub mod scaffold;
pub mod spec_file;
pub mod supporting;

use expressgen_core::GeneratorError;
use expressgen_core::transform::{
    escape_quotation_mark, escape_string_literal, escape_unsafe_characters,
};
use minijinja::{AutoEscape, Environment, Value};

/// Embedded templates, keyed by template identifier.
pub const TEMPLATES: &[(&str, &str)] = &[
    (
        "controllers/api_controller",
        include_str!("../../templates/controllers/api_controller.j2"),
    ),
    (
        "controllers/handlers",
        include_str!("../../templates/controllers/handlers.j2"),
    ),
    (
        "controllers/index",
        include_str!("../../templates/controllers/index.j2"),
    ),
    (
        "controllers/Controller",
        include_str!("../../templates/controllers/Controller.j2"),
    ),
    (
        "services/services",
        include_str!("../../templates/services/services.j2"),
    ),
    (
        "services/index",
        include_str!("../../templates/services/index.j2"),
    ),
    (
        "services/Service",
        include_str!("../../templates/services/Service.j2"),
    ),
    (
        "api_impl/api_implementation",
        include_str!("../../templates/api_impl/api_implementation.j2"),
    ),
    ("openapi", include_str!("../../templates/openapi.j2")),
    ("config", include_str!("../../templates/config.j2")),
    ("expressServer", include_str!("../../templates/expressServer.j2")),
    ("server", include_str!("../../templates/server.j2")),
    ("logger", include_str!("../../templates/logger.j2")),
    ("eslintrc", include_str!("../../templates/eslintrc.j2")),
    (
        "utils/openapiRouter",
        include_str!("../../templates/utils/openapiRouter.j2"),
    ),
    ("package", include_str!("../../templates/package.j2")),
    ("README", include_str!("../../templates/README.j2")),
];

/// Build the template environment with every embedded template loaded.
pub fn environment() -> Result<Environment<'static>, GeneratorError> {
    let mut env = Environment::new();
    // Output is JavaScript, JSON and YAML; escaping is done explicitly with filters.
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_keep_trailing_newline(true);
    env.add_filter("escape_quotes", escape_quotes);
    env.add_filter("escape_unsafe", escape_unsafe);
    // Use inside "..." literals in JS and JSON output.
    env.add_filter("js_string", js_string);

    for &(name, source) in TEMPLATES {
        env.add_template(name, source)
            .map_err(|e| render_error(name, &e))?;
    }
    Ok(env)
}

fn escape_quotes(value: String) -> String {
    escape_quotation_mark(&value)
}

fn js_string(value: String) -> String {
    escape_string_literal(&value)
}

fn escape_unsafe(value: String) -> String {
    escape_unsafe_characters(&value)
}

/// Render a template by identifier.
pub fn render(env: &Environment<'_>, template: &str, ctx: Value) -> Result<String, GeneratorError> {
    let tmpl = env
        .get_template(template)
        .map_err(|e| render_error(template, &e))?;
    tmpl.render(ctx).map_err(|e| render_error(template, &e))
}

fn render_error(template: &str, err: &minijinja::Error) -> GeneratorError {
    GeneratorError::Render {
        template: template.to_string(),
        message: err.to_string(),
    }
}
