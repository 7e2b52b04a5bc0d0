//! Resource definitions making up a resource graph
//!
//! Each definition describes one resource the provisioner creates on the
//! management plane. Definitions are immutable once built; schema bindings
//! of representations are the only values completed later, through the
//! graph's [`CatalogIdentity`].

use crate::deferred::{CatalogIdentity, DeferredSchemaRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of the schema catalog resource
pub const SCHEMA_CATALOG_ID: &str = "apischema";

/// Content type of the schema catalog document
pub const SCHEMA_CATALOG_CONTENT_TYPE: &str = "application/vnd.oai.openapi.components+json";

/// Identifier every policy resource is created under
pub const POLICY_ID: &str = "policy";

/// Resource name of the API-scoped policy
pub const API_POLICY_RESOURCE_NAME: &str = "api-policy";

/// Management plane the graph is provisioned into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementTarget {
    /// Resource group holding the management service
    pub resource_group: String,
    /// Management service name
    pub service_name: String,
}

/// Transport protocol exposed by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Https,
}

/// The API entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDefinition {
    /// Generated identifier (lower-cased title without whitespace)
    pub id: String,
    /// Display name (document title)
    pub display_name: String,
    /// Description from the document info block
    pub description: Option<String>,
    /// Gateway path prefix
    pub path: String,
    /// Backend service URL
    pub service_url: String,
    /// Exposed protocols
    pub protocols: Vec<Protocol>,
}

impl ApiDefinition {
    /// Derive the API identifier from a document title
    ///
    /// # Examples
    /// ```
    /// use apim_graph_common::ApiDefinition;
    ///
    /// assert_eq!(ApiDefinition::id_from_title(" Swagger Petstore "), "swaggerpetstore");
    /// ```
    pub fn id_from_title(title: &str) -> String {
        title
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect()
    }
}

/// Simplified descriptor of one reusable schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    /// Declared type tag
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
}

/// All reusable schemas of the document, keyed by component name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaCatalog {
    /// Resource identifier of the catalog
    pub schema_id: String,
    /// Content type of the catalog document
    pub content_type: String,
    /// Schema descriptors by name
    pub schemas: BTreeMap<String, SchemaDescriptor>,
}

impl SchemaCatalog {
    /// Create a catalog with the fixed identifier and content type
    pub fn new(schemas: BTreeMap<String, SchemaDescriptor>) -> Self {
        Self {
            schema_id: SCHEMA_CATALOG_ID.to_string(),
            content_type: SCHEMA_CATALOG_CONTENT_TYPE.to_string(),
            schemas,
        }
    }

    /// Components document uploaded for the catalog: `{"schemas": {...}}`
    pub fn components(&self) -> serde_json::Value {
        serde_json::json!({ "schemas": self.schemas })
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// HTTP method of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter is carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    /// Parse an OpenAPI `in` value
    pub fn parse(location: &str) -> Option<Self> {
        match location {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "cookie" => Some(ParameterLocation::Cookie),
            _ => None,
        }
    }
}

/// Route, query or header parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDefinition {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    /// Declared schema type (empty when none)
    #[serde(rename = "type")]
    pub type_name: String,
    pub description: Option<String>,
    /// Stringified default value (empty when none)
    pub default_value: String,
}

/// Content-type specific body shape
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepresentationDefinition {
    pub content_type: String,
    /// Compact JSON example payload
    pub sample: String,
    /// Schema binding, resolved once the schema catalog exists
    pub schema: DeferredSchemaRef,
}

/// Request contract of an operation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDefinition {
    pub description: Option<String>,
    pub representations: Vec<RepresentationDefinition>,
    pub headers: Vec<ParameterDefinition>,
    pub query_parameters: Vec<ParameterDefinition>,
}

/// Response contract for one numeric status code
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDefinition {
    pub status_code: i32,
    pub description: Option<String>,
    pub representations: Vec<RepresentationDefinition>,
    pub headers: Vec<ParameterDefinition>,
}

/// One path + verb exposed by the gateway
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDefinition {
    /// Operation identifier (declared, or generated when absent)
    pub operation_id: String,
    /// Operation id exactly as declared in the document
    pub declared_operation_id: Option<String>,
    pub display_name: String,
    pub method: HttpMethod,
    pub url_template: String,
    pub description: Option<String>,
    pub template_parameters: Vec<ParameterDefinition>,
    pub request: Option<RequestDefinition>,
    pub responses: Vec<ResponseDefinition>,
}

/// What a policy applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum PolicyScope {
    Api,
    #[serde(rename_all = "camelCase")]
    Operation { operation_id: String },
}

/// Format of a policy document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyFormat {
    Xml,
}

/// Rendered policy document for the API or one operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDefinition {
    pub resource_name: String,
    pub scope: PolicyScope,
    pub policy_id: String,
    pub format: PolicyFormat,
    pub value: String,
}

impl PolicyDefinition {
    /// Resource name of an operation-scoped policy
    pub fn operation_resource_name(operation_id: &str) -> String {
        format!("operation-{}-policy", operation_id)
    }
}

/// Node of the resource graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "id")]
pub enum ResourceId {
    Api,
    ApiPolicy,
    SchemaCatalog,
    Operation(String),
    OperationPolicy(String),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Api => write!(f, "api"),
            ResourceId::ApiPolicy => write!(f, "api-policy"),
            ResourceId::SchemaCatalog => write!(f, "schema-catalog"),
            ResourceId::Operation(id) => write!(f, "operation:{}", id),
            ResourceId::OperationPolicy(id) => write!(f, "operation-policy:{}", id),
        }
    }
}

/// `dependent` must be provisioned after `dependency`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdge {
    pub dependent: ResourceId,
    pub dependency: ResourceId,
}

/// Everything the provisioner needs, with ordering edges
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGraph {
    pub target: ManagementTarget,
    pub api: ApiDefinition,
    pub schema_catalog: SchemaCatalog,
    pub operations: Vec<OperationDefinition>,
    pub policies: Vec<PolicyDefinition>,
    pub edges: Vec<DependencyEdge>,
    #[serde(skip)]
    pub catalog_identity: CatalogIdentity,
}

impl ResourceGraph {
    /// Look up an operation by identifier
    pub fn operation(&self, operation_id: &str) -> Option<&OperationDefinition> {
        self.operations
            .iter()
            .find(|op| op.operation_id == operation_id)
    }

    /// The API-scoped policy, if the document declares one
    pub fn api_policy(&self) -> Option<&PolicyDefinition> {
        self.policies
            .iter()
            .find(|policy| policy.scope == PolicyScope::Api)
    }

    /// The policy scoped to one operation, if declared
    pub fn operation_policy(&self, operation_id: &str) -> Option<&PolicyDefinition> {
        self.policies.iter().find(|policy| {
            matches!(&policy.scope, PolicyScope::Operation { operation_id: id } if id == operation_id)
        })
    }

    /// Resources that must exist before `resource`
    pub fn dependencies_of(&self, resource: &ResourceId) -> Vec<&ResourceId> {
        self.edges
            .iter()
            .filter(|edge| &edge.dependent == resource)
            .map(|edge| &edge.dependency)
            .collect()
    }

    /// Every resource in an order that satisfies all edges
    ///
    /// API first, then the API policy, the schema catalog, and each operation
    /// followed by its own policy.
    pub fn provisioning_order(&self) -> Vec<ResourceId> {
        let mut order = vec![ResourceId::Api];
        if self.api_policy().is_some() {
            order.push(ResourceId::ApiPolicy);
        }
        order.push(ResourceId::SchemaCatalog);

        for operation in &self.operations {
            order.push(ResourceId::Operation(operation.operation_id.clone()));
            if self.operation_policy(&operation.operation_id).is_some() {
                order.push(ResourceId::OperationPolicy(operation.operation_id.clone()));
            }
        }

        order
    }

    /// Number of resources in the graph
    pub fn resource_count(&self) -> usize {
        2 + self.operations.len() + self.policies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_id_from_title() {
        assert_eq!(ApiDefinition::id_from_title("Pet Store API"), "petstoreapi");
        assert_eq!(ApiDefinition::id_from_title("Tabs\tAnd\nLines"), "tabsandlines");
        assert_eq!(ApiDefinition::id_from_title(""), "");
    }

    #[test]
    fn test_catalog_components_document() {
        let mut schemas = BTreeMap::new();
        schemas.insert(
            "Pet".to_string(),
            SchemaDescriptor {
                schema_type: Some("object".to_string()),
            },
        );
        schemas.insert("Untyped".to_string(), SchemaDescriptor::default());

        let catalog = SchemaCatalog::new(schemas);
        assert_eq!(catalog.schema_id, SCHEMA_CATALOG_ID);
        assert_eq!(
            catalog.components(),
            serde_json::json!({ "schemas": { "Pet": { "type": "object" }, "Untyped": {} } })
        );
    }

    #[test]
    fn test_parameter_location_parse() {
        assert_eq!(ParameterLocation::parse("path"), Some(ParameterLocation::Path));
        assert_eq!(ParameterLocation::parse("header"), Some(ParameterLocation::Header));
        assert_eq!(ParameterLocation::parse("body"), None);
    }

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(
            serde_json::to_value(HttpMethod::Delete).unwrap(),
            serde_json::json!("DELETE")
        );
    }

    #[test]
    fn test_operation_policy_resource_name() {
        assert_eq!(
            PolicyDefinition::operation_resource_name("listPets"),
            "operation-listPets-policy"
        );
    }
}
