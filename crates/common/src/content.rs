//! Content negotiation for representation schema bindings
//!
//! Form-encoded payloads are key/value encoded, so the gateway cannot
//! validate them against a schema. Representations with those content types
//! never carry a schema binding.

use serde::{Deserialize, Serialize};

/// Content types that never bind to a schema (compared case-insensitively)
pub const FORM_CONTENT_TYPES: [&str; 2] =
    ["multipart/form-data", "application/x-www-form-urlencoded"];

/// Schema catalog name and type name bound to a representation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaBinding {
    /// Durable name of the schema catalog resource
    pub schema_id: Option<String>,

    /// Name of the schema within the catalog
    pub type_name: Option<String>,
}

impl SchemaBinding {
    /// Binding with neither a schema nor a type
    pub fn unbound() -> Self {
        Self::default()
    }

    /// Whether this binding points at a schema
    pub fn is_bound(&self) -> bool {
        self.schema_id.is_some()
    }
}

/// Check whether a content type is form-encoded
pub fn is_form_content_type(content_type: &str) -> bool {
    FORM_CONTENT_TYPES
        .iter()
        .any(|form| form.eq_ignore_ascii_case(content_type))
}

/// Decide the schema binding for a representation
///
/// Form-encoded content types are always unbound. Everything else passes the
/// catalog name and candidate type through unchanged, even an empty candidate.
///
/// # Examples
/// ```
/// use apim_graph_common::negotiate;
///
/// let bound = negotiate("application/json", "apischema", "Pet");
/// assert_eq!(bound.type_name.as_deref(), Some("Pet"));
///
/// let form = negotiate("Multipart/Form-Data", "apischema", "Pet");
/// assert!(form.schema_id.is_none() && form.type_name.is_none());
/// ```
pub fn negotiate(content_type: &str, catalog_name: &str, candidate: &str) -> SchemaBinding {
    if is_form_content_type(content_type) {
        return SchemaBinding::unbound();
    }

    SchemaBinding {
        schema_id: Some(catalog_name.to_string()),
        type_name: Some(candidate.to_string()),
    }
}
