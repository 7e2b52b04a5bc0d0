//! Common types and utilities for apim-graph
//!
//! This crate contains the resource definitions that make up a resource graph,
//! the configuration record, the content negotiation rule, deferred schema
//! references and the error type shared by the parser, generator and CLI.

pub mod config;
pub mod content;
pub mod deferred;
pub mod resources;

pub use config::ApiConfiguration;
pub use content::{is_form_content_type, negotiate, SchemaBinding, FORM_CONTENT_TYPES};
pub use deferred::{CatalogIdentity, DeferredSchemaRef};
pub use resources::*;

use thiserror::Error;

/// Errors that can occur while building or applying a resource graph
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Provisioning error: {0}")]
    Provision(String),

    #[error("Schema catalog identity was never resolved for {0}")]
    Unresolved(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for apim-graph operations
pub type Result<T> = std::result::Result<T, GeneratorError>;
