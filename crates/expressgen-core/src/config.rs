use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level project configuration loaded from `.expressgen.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExpressgenConfig {
    /// Model document produced by the external parser (YAML or JSON).
    pub input: String,
    pub output: String,
    pub generator: String,
    pub server: ServerConfig,
}

impl Default for ExpressgenConfig {
    fn default() -> Self {
        Self {
            input: "api-model.yaml".to_string(),
            output: "generated-code/nodejs-express-server-esm".to_string(),
            generator: "nodejs-express-server-esm".to_string(),
            server: ServerConfig::default(),
        }
    }
}

/// Values exposed to every template as additional properties.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub api_version: String,
    /// Folder holding the service implementations, relative to `src`.
    pub impl_folder: String,
    /// Custom package name for package.json (defaults to slugified API title).
    pub package_name: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            api_version: "1.0.0".to_string(),
            impl_folder: "services".to_string(),
            package_name: None,
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".expressgen.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<ExpressgenConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: ExpressgenConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# expressgen configuration
input: api-model.yaml        # model document emitted by your OpenAPI parser
output: generated-code/nodejs-express-server-esm
generator: nodejs-express-server-esm

server:
  port: 8080
  api_version: 1.0.0
  impl_folder: services
  # package_name: my-express-server   # defaults to slugified API title

# Set JS_POST_PROCESS_FILE (e.g. "npx prettier --write") to format each generated .js file.
"#
}
