//! API configuration loading from YAML or JSON files
//!
//! The configuration record names the management plane targets and the
//! gateway settings for one API. Every field is required; nothing is
//! defaulted.

use crate::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Input record for one API transformation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfiguration {
    /// Display name used to label the component
    pub api_name: String,
    /// Resource group holding the management service
    pub resource_group: String,
    /// Location of the OpenAPI document (file path or URL)
    pub document_location: String,
    /// Gateway path prefix for the API
    pub api_path: String,
    /// Backend service URL requests are forwarded to
    pub service_url: String,
    /// Name of the management service
    pub management_service_name: String,
}

impl ApiConfiguration {
    /// Load configuration from a file, choosing YAML or JSON by extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Config(format!(
                "Failed to read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| GeneratorError::Config(format!("Invalid YAML configuration: {}", e)))
    }

    /// Parse configuration from a JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| GeneratorError::Config(format!("Invalid JSON configuration: {}", e)))
    }

    /// Replace the document location (e.g. from a command-line override)
    pub fn with_document_location(mut self, location: impl Into<String>) -> Self {
        self.document_location = location.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const YAML: &str = r#"
api_name: Pet Store API
resource_group: petstore-rg
document_location: ./petstore.yaml
api_path: pet-store
service_url: https://petstore.example.com
management_service_name: petstore-apim
"#;

    #[test]
    fn test_parse_yaml_configuration() {
        let config = ApiConfiguration::from_yaml(YAML).unwrap();
        assert_eq!(config.api_name, "Pet Store API");
        assert_eq!(config.api_path, "pet-store");
        assert_eq!(config.management_service_name, "petstore-apim");
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let yaml = "api_name: Pets\nresource_group: rg\n";
        let err = ApiConfiguration::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, GeneratorError::Config(_)));
    }

    #[test]
    fn test_load_json_file_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{
                "api_name": "Pets",
                "resource_group": "rg",
                "document_location": "spec.json",
                "api_path": "pets",
                "service_url": "",
                "management_service_name": "apim"
            }}"#
        )
        .unwrap();

        let config = ApiConfiguration::from_file(file.path()).unwrap();
        assert_eq!(config.document_location, "spec.json");
        assert_eq!(config.service_url, "");
    }

    #[test]
    fn test_load_yaml_file_and_override_location() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(YAML.as_bytes()).unwrap();

        let config = ApiConfiguration::from_file(file.path())
            .unwrap()
            .with_document_location("other.json");
        assert_eq!(config.document_location, "other.json");
    }
}
