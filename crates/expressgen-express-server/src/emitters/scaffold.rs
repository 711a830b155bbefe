use expressgen_core::config::ServerConfig;
use expressgen_core::ir::IrSpec;

/// Used when neither the configuration nor the API title yields a name.
pub const FALLBACK_PACKAGE_NAME: &str = "openapi-express-server";

/// npm package name: the configured one, else the slugified API title.
pub fn package_name(ir: &IrSpec, config: &ServerConfig) -> String {
    let configured = config
        .package_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());
    if let Some(name) = configured {
        return name.to_string();
    }
    let slug = slugify(&ir.info.title);
    if slug.is_empty() {
        FALLBACK_PACKAGE_NAME.to_string()
    } else {
        slug
    }
}

/// Lowercase kebab-case: runs of non-alphanumerics become a single dash.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}
