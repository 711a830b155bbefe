use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to parse YAML model: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON model: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("missing required field: {0}")]
    MissingField(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml_ng::Error,
    },
}

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("template `{0}` has no routing entry; register it with an output directory and suffix")]
    UnregisteredTemplate(String),
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("routing error: {0}")]
    Routing(#[from] RoutingError),

    #[error("failed to render template `{template}`: {message}")]
    Render { template: String, message: String },

    #[error("failed to serialize specification: {0}")]
    Serialize(#[from] serde_yaml_ng::Error),
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
