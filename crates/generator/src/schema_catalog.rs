//! Builds the schema catalog from `components.schemas`

use apim_graph_common::{SchemaCatalog, SchemaDescriptor};
use apim_graph_parser::openapi::OpenApiSpec;
use std::collections::BTreeMap;

/// Flatten every reusable schema to its declared type tag
///
/// Structure, formats and nested schemas are dropped; operations only need
/// to reference schemas by name.
pub fn build_schema_catalog(spec: &OpenApiSpec) -> SchemaCatalog {
    let schemas: BTreeMap<String, SchemaDescriptor> = spec
        .schemas()
        .map(|(name, schema)| {
            (
                name.clone(),
                SchemaDescriptor {
                    schema_type: schema.type_name().map(str::to_string),
                },
            )
        })
        .collect();

    SchemaCatalog::new(schemas)
}
