//! OpenAPI document loader

use super::types::OpenApiSpec;
use apim_graph_common::{GeneratorError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Serialization format of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Guess the format from a file extension, falling back to the content
    pub fn detect(path: &Path, content: &str) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                DocumentFormat::Yaml
            }
            _ => Self::sniff(content),
        }
    }

    /// Guess the format from the first non-whitespace character
    pub fn sniff(content: &str) -> Self {
        if content.trim_start().starts_with('{') {
            DocumentFormat::Json
        } else {
            DocumentFormat::Yaml
        }
    }
}

/// OpenAPI specification parser
///
/// Reads and validates OpenAPI 3.x documents. A document that fails to
/// parse is fatal: no resource graph is ever built from it.
#[derive(Debug)]
pub struct OpenApiParser {
    /// Loaded OpenAPI spec
    spec: OpenApiSpec,
}

impl OpenApiParser {
    /// Load an OpenAPI document from a file path
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = OpenApiParser::from_file("petstore.yaml")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Parse(format!(
                "Failed to read OpenAPI file {}: {}",
                path.display(),
                e
            ))
        })?;

        let format = DocumentFormat::detect(path, &content);
        debug!(path = %path.display(), ?format, "loading OpenAPI document");
        Self::from_str_with_format(&content, format)
    }

    /// Parse an OpenAPI document, detecting JSON or YAML from its content
    pub fn from_str(content: &str) -> Result<Self> {
        Self::from_str_with_format(content, DocumentFormat::sniff(content))
    }

    /// Parse OpenAPI spec from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_str_with_format(json, DocumentFormat::Json)
    }

    /// Parse OpenAPI spec from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::from_str_with_format(yaml, DocumentFormat::Yaml)
    }

    fn from_str_with_format(content: &str, format: DocumentFormat) -> Result<Self> {
        let spec: OpenApiSpec = match format {
            DocumentFormat::Json => serde_json::from_str(content).map_err(|e| {
                GeneratorError::Parse(format!("Failed to parse OpenAPI JSON: {}", e))
            })?,
            DocumentFormat::Yaml => {
                let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| {
                    GeneratorError::Parse(format!("Failed to parse OpenAPI YAML: {}", e))
                })?;
                serde_yaml::from_value(stringify_keys(value)).map_err(|e| {
                    GeneratorError::Parse(format!("Failed to parse OpenAPI YAML: {}", e))
                })?
            }
        };

        Self::from_spec(spec)
    }

    /// Wrap an already-parsed document, checking it is OpenAPI 3.x
    pub fn from_spec(spec: OpenApiSpec) -> Result<Self> {
        if !spec.openapi.starts_with("3.") {
            return Err(GeneratorError::Parse(format!(
                "Unsupported OpenAPI version {:?}, expected 3.x",
                spec.openapi
            )));
        }

        Ok(Self { spec })
    }

    /// Get reference to the underlying OpenAPI spec
    pub fn spec(&self) -> &OpenApiSpec {
        &self.spec
    }

    /// Take the underlying OpenAPI spec
    pub fn into_spec(self) -> OpenApiSpec {
        self.spec
    }
}

/// Turn scalar mapping keys into strings
///
/// YAML documents often leave status codes unquoted (`200:`), which would
/// otherwise fail to deserialize into string-keyed maps.
fn stringify_keys(value: serde_yaml::Value) -> serde_yaml::Value {
    use serde_yaml::Value;

    match value {
        Value::Mapping(mapping) => Value::Mapping(
            mapping
                .into_iter()
                .map(|(key, value)| {
                    let key = match key {
                        Value::Number(number) => Value::String(number.to_string()),
                        Value::Bool(flag) => Value::String(flag.to_string()),
                        other => other,
                    };
                    (key, stringify_keys(value))
                })
                .collect(),
        ),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(stringify_keys).collect()),
        other => other,
    }
}
