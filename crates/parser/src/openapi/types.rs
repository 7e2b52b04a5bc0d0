//! OpenAPI 3.x type definitions
//!
//! Simplified representation focusing on what a gateway needs: paths,
//! operations, parameters, bodies, responses, reusable schemas and
//! specification extensions. Maps keep document order.

use apim_graph_common::HttpMethod;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// OpenAPI document root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenApiSpec {
    /// OpenAPI version (e.g., "3.0.3")
    pub openapi: String,

    /// API metadata
    pub info: Info,

    /// API paths (endpoints)
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,

    /// Reusable components
    #[serde(default)]
    pub components: Option<Components>,

    /// Servers
    #[serde(default)]
    pub servers: Vec<Server>,

    /// Remaining fields, including `x-*` extensions
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// API information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    /// API title
    pub title: String,

    /// API version
    #[serde(default)]
    pub version: String,

    /// API description
    #[serde(default)]
    pub description: Option<String>,
}

/// Server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    /// Server URL
    pub url: String,

    /// Server description
    #[serde(default)]
    pub description: Option<String>,
}

/// Path item (operations for a path)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub get: Option<Operation>,

    #[serde(default)]
    pub put: Option<Operation>,

    #[serde(default)]
    pub post: Option<Operation>,

    #[serde(default)]
    pub delete: Option<Operation>,

    #[serde(default)]
    pub options: Option<Operation>,

    #[serde(default)]
    pub head: Option<Operation>,

    #[serde(default)]
    pub patch: Option<Operation>,

    #[serde(default)]
    pub trace: Option<Operation>,

    /// Parameters shared by every operation under this path
    #[serde(default)]
    pub parameters: Vec<RefOr<Parameter>>,
}

impl PathItem {
    /// Declared operations in method order: get, put, post, delete, options,
    /// head, patch, trace
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        [
            (HttpMethod::Get, &self.get),
            (HttpMethod::Put, &self.put),
            (HttpMethod::Post, &self.post),
            (HttpMethod::Delete, &self.delete),
            (HttpMethod::Options, &self.options),
            (HttpMethod::Head, &self.head),
            (HttpMethod::Patch, &self.patch),
            (HttpMethod::Trace, &self.trace),
        ]
        .into_iter()
        .filter_map(|(method, operation)| operation.as_ref().map(|op| (method, op)))
    }
}

/// HTTP operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Operation {
    /// Operation ID (unique identifier)
    #[serde(rename = "operationId")]
    #[serde(default)]
    pub operation_id: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub parameters: Vec<RefOr<Parameter>>,

    #[serde(rename = "requestBody")]
    #[serde(default)]
    pub request_body: Option<RefOr<RequestBody>>,

    /// Responses keyed by status code (or "default", "2XX", ...)
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<Response>>,

    /// Tags (for grouping)
    #[serde(default)]
    pub tags: Vec<String>,

    /// Remaining fields, including `x-*` extensions
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// Parameter definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,

    /// Location: query, header, path, cookie
    #[serde(rename = "in")]
    pub location: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub schema: Option<SchemaOrRef>,
}

/// Request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub description: Option<String>,

    /// Media types by content type
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,

    #[serde(default)]
    pub required: bool,
}

/// Response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: Option<String>,

    /// Media types by content type
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,

    /// Response headers by name
    #[serde(default)]
    pub headers: IndexMap<String, RefOr<Header>>,
}

/// Response header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub schema: Option<SchemaOrRef>,
}

/// Media type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(default)]
    pub schema: Option<SchemaOrRef>,

    /// Explicit example payload
    #[serde(default)]
    pub example: Option<Value>,
}

/// Either a `$ref` to a component or the item itself
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    /// Reference to a component
    Reference {
        #[serde(rename = "$ref")]
        ref_path: String,
    },

    /// Inline item
    Item(T),
}

/// Schema or reference
pub type SchemaOrRef = RefOr<Schema>;

impl<T> RefOr<T> {
    /// Name of the referenced component (last path segment), if a reference
    ///
    /// e.g., "#/components/schemas/Pet" -> "Pet"
    pub fn reference_id(&self) -> Option<&str> {
        match self {
            RefOr::Reference { ref_path } => ref_path.rsplit('/').next(),
            RefOr::Item(_) => None,
        }
    }

    /// The inline item, if not a reference
    pub fn as_item(&self) -> Option<&T> {
        match self {
            RefOr::Item(item) => Some(item),
            RefOr::Reference { .. } => None,
        }
    }
}

impl<T: Component> RefOr<T> {
    /// Resolve to the inline item or the referenced component
    pub fn resolve<'a>(&'a self, spec: &'a OpenApiSpec) -> Option<&'a T> {
        match self {
            RefOr::Item(item) => Some(item),
            RefOr::Reference { ref_path } => spec.component(ref_path),
        }
    }
}

/// Declared schema type: a single tag, or a list of tags (OpenAPI 3.1)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

impl SchemaType {
    /// The primary type tag, ignoring "null" in a type list
    pub fn primary(&self) -> Option<&str> {
        match self {
            SchemaType::Single(tag) => Some(tag.as_str()),
            SchemaType::Multiple(tags) => tags
                .iter()
                .map(String::as_str)
                .find(|tag| *tag != "null"),
        }
    }
}

/// Schema definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    /// Type: string, number, integer, boolean, array, object
    #[serde(rename = "type")]
    #[serde(default)]
    pub schema_type: Option<SchemaType>,

    /// Format (e.g., int32, int64, date-time)
    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Properties (for object type)
    #[serde(default)]
    pub properties: IndexMap<String, SchemaOrRef>,

    /// Required properties
    #[serde(default)]
    pub required: Vec<String>,

    /// Items schema (for array type)
    #[serde(default)]
    pub items: Option<Box<SchemaOrRef>>,

    /// Explicit example
    #[serde(default)]
    pub example: Option<Value>,

    /// Default value
    #[serde(default)]
    pub default: Option<Value>,

    /// Enum values
    #[serde(rename = "enum")]
    #[serde(default)]
    pub enum_values: Vec<Value>,

    /// Remaining fields, including `x-*` extensions
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

impl Schema {
    /// The declared type tag, if any
    pub fn type_name(&self) -> Option<&str> {
        self.schema_type.as_ref().and_then(SchemaType::primary)
    }
}

/// Reusable components
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, Schema>,

    #[serde(default)]
    pub parameters: IndexMap<String, Parameter>,

    #[serde(rename = "requestBodies")]
    #[serde(default)]
    pub request_bodies: IndexMap<String, RequestBody>,

    #[serde(default)]
    pub responses: IndexMap<String, Response>,

    #[serde(default)]
    pub headers: IndexMap<String, Header>,
}

/// An item that can be stored under `components` and referenced by `$ref`
pub trait Component: Sized {
    /// Reference prefix, e.g. "#/components/schemas/"
    const PREFIX: &'static str;

    /// The components table holding items of this kind
    fn table(components: &Components) -> &IndexMap<String, Self>;
}

impl Component for Schema {
    const PREFIX: &'static str = "#/components/schemas/";

    fn table(components: &Components) -> &IndexMap<String, Self> {
        &components.schemas
    }
}

impl Component for Parameter {
    const PREFIX: &'static str = "#/components/parameters/";

    fn table(components: &Components) -> &IndexMap<String, Self> {
        &components.parameters
    }
}

impl Component for RequestBody {
    const PREFIX: &'static str = "#/components/requestBodies/";

    fn table(components: &Components) -> &IndexMap<String, Self> {
        &components.request_bodies
    }
}

impl Component for Response {
    const PREFIX: &'static str = "#/components/responses/";

    fn table(components: &Components) -> &IndexMap<String, Self> {
        &components.responses
    }
}

impl Component for Header {
    const PREFIX: &'static str = "#/components/headers/";

    fn table(components: &Components) -> &IndexMap<String, Self> {
        &components.headers
    }
}

/// Access to `x-*` specification extensions
pub trait Extensible {
    /// All unmodelled fields of the object
    fn extension_fields(&self) -> &IndexMap<String, Value>;

    /// An extension value; only `x-` prefixed keys are extensions
    fn extension(&self, key: &str) -> Option<&Value> {
        if !key.starts_with("x-") {
            return None;
        }
        self.extension_fields().get(key)
    }

    /// An extension value, only when it is a plain string
    fn extension_str(&self, key: &str) -> Option<&str> {
        match self.extension(key) {
            Some(Value::String(value)) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl Extensible for OpenApiSpec {
    fn extension_fields(&self) -> &IndexMap<String, Value> {
        &self.extensions
    }
}

impl Extensible for Operation {
    fn extension_fields(&self) -> &IndexMap<String, Value> {
        &self.extensions
    }
}

impl OpenApiSpec {
    /// Look up a component by reference path
    /// e.g., "#/components/parameters/Limit" -> the Limit parameter
    pub fn component<T: Component>(&self, ref_path: &str) -> Option<&T> {
        let name = ref_path.strip_prefix(T::PREFIX)?;
        self.components
            .as_ref()
            .and_then(|components| T::table(components).get(name))
    }

    /// Get a schema by reference path
    /// e.g., "#/components/schemas/Pet" -> returns Pet schema
    pub fn resolve_schema_ref(&self, ref_path: &str) -> Option<&Schema> {
        self.component(ref_path)
    }

    /// Reusable schemas in document order (empty when there are none)
    pub fn schemas(&self) -> impl Iterator<Item = (&String, &Schema)> {
        self.components
            .iter()
            .flat_map(|components| components.schemas.iter())
    }
}
