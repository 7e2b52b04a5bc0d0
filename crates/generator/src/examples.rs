//! Example payload synthesis
//!
//! Every representation carries a compact JSON sample. A declared example is
//! used verbatim; otherwise one is built from the schema shape:
//!
//! - array schemas (`items` present) produce a single-element array whose
//!   object has every item property, valued by its example or a type default
//! - any other schema produces an object holding only the properties that
//!   declare an example; the rest are left out, not defaulted

use apim_graph_parser::openapi::{MediaType, OpenApiSpec, Schema, SchemaOrRef};
use serde_json::{Map, Value};
use tracing::warn;

/// Shape of a schema as far as sample synthesis is concerned
#[derive(Debug, Clone, Copy)]
pub enum Shape<'a> {
    /// The schema declares its own example
    Declared(&'a Value),

    /// `items` is present; carries the resolved item schema
    Array(Option<&'a Schema>),

    /// Everything else
    Object(&'a Schema),
}

/// Builds sample payloads for schemas and media types of one document
pub struct ExampleSynthesizer<'a> {
    spec: &'a OpenApiSpec,
}

impl<'a> ExampleSynthesizer<'a> {
    pub fn new(spec: &'a OpenApiSpec) -> Self {
        Self { spec }
    }

    /// Sample for a media type: its own example first, then its schema
    pub fn for_media_type(&self, media_type: &MediaType) -> String {
        if let Some(example) = &media_type.example {
            return example.to_string();
        }

        match &media_type.schema {
            Some(schema) => self.for_schema(schema),
            None => Value::Object(Map::new()).to_string(),
        }
    }

    /// Sample for a schema or schema reference
    pub fn for_schema(&self, schema: &SchemaOrRef) -> String {
        let value = match self.resolve(schema) {
            Some(schema) => self.synthesize(self.shape_of(schema)),
            None => {
                warn!(
                    reference = schema.reference_id().unwrap_or_default(),
                    "unresolvable schema reference, using an empty sample"
                );
                Value::Object(Map::new())
            }
        };

        value.to_string()
    }

    /// Classify a resolved schema
    pub fn shape_of<'s>(&'s self, schema: &'s Schema) -> Shape<'s> {
        if let Some(example) = &schema.example {
            return Shape::Declared(example);
        }

        match &schema.items {
            Some(items) => Shape::Array(self.resolve(items)),
            None => Shape::Object(schema),
        }
    }

    /// Build the sample value for a shape
    pub fn synthesize<'s>(&'s self, shape: Shape<'s>) -> Value {
        match shape {
            Shape::Declared(example) => example.clone(),
            Shape::Array(items) => {
                let mut sample = Map::new();
                for (name, property) in items.into_iter().flat_map(|s| s.properties.iter()) {
                    let property = self.resolve(property);
                    let value = match property.and_then(|p| p.example.as_ref()) {
                        Some(example) => example.clone(),
                        None => primitive_default(property.and_then(Schema::type_name)),
                    };
                    sample.insert(name.clone(), value);
                }
                Value::Array(vec![Value::Object(sample)])
            }
            Shape::Object(schema) => {
                let sample: Map<String, Value> = schema
                    .properties
                    .iter()
                    .filter_map(|(name, property)| {
                        let example = self.resolve(property)?.example.as_ref()?;
                        Some((name.clone(), example.clone()))
                    })
                    .collect();
                Value::Object(sample)
            }
        }
    }

    fn resolve<'s>(&'s self, schema: &'s SchemaOrRef) -> Option<&'s Schema> {
        schema.resolve(self.spec)
    }
}

/// Placeholder value for a property type without an example
///
/// # Examples
/// ```
/// use apim_graph_generator::examples::primitive_default;
/// use serde_json::json;
///
/// assert_eq!(primitive_default(Some("integer")), json!(0));
/// assert_eq!(primitive_default(Some("object")), json!(""));
/// ```
pub fn primitive_default(type_name: Option<&str>) -> Value {
    match type_name.map(str::to_ascii_lowercase).as_deref() {
        Some("string") => Value::from("string"),
        Some("integer") => Value::from(0),
        Some("boolean") => Value::from(false),
        Some("number") => Value::from(0.0),
        _ => Value::from(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apim_graph_parser::openapi::RefOr;
    use serde_json::json;

    fn spec_with_schemas(schemas: Value) -> OpenApiSpec {
        serde_json::from_value(json!({
            "openapi": "3.0.0",
            "info": {"title": "Examples", "version": "1"},
            "components": {"schemas": schemas}
        }))
        .unwrap()
    }

    fn schema(value: Value) -> SchemaOrRef {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_media_type_example_wins() {
        let spec = spec_with_schemas(json!({}));
        let synthesizer = ExampleSynthesizer::new(&spec);
        let media: MediaType = serde_json::from_value(json!({
            "example": {"name": "Rex", "tags": [ "a", "b" ]},
            "schema": {"type": "object", "example": {"ignored": true}}
        }))
        .unwrap();

        assert_eq!(
            synthesizer.for_media_type(&media),
            r#"{"name":"Rex","tags":["a","b"]}"#
        );
    }

    #[test]
    fn test_schema_example_is_verbatim() {
        let spec = spec_with_schemas(json!({}));
        let synthesizer = ExampleSynthesizer::new(&spec);

        assert_eq!(
            synthesizer.for_schema(&schema(json!({"type": "string", "example": "tabby"}))),
            r#""tabby""#
        );
    }

    #[test]
    fn test_array_shape_defaults_missing_examples() {
        let spec = spec_with_schemas(json!({
            "Pet": {
                "type": "object",
                "properties": {
                    "id": {"type": "integer"},
                    "name": {"type": "string", "example": "Rex"},
                    "vaccinated": {"type": "boolean"},
                    "weight": {"type": "number"},
                    "owner": {"type": "object"},
                    "nickname": {"type": "String"}
                }
            }
        }));
        let synthesizer = ExampleSynthesizer::new(&spec);

        let sample = synthesizer.for_schema(&schema(json!({
            "type": "array",
            "items": {"$ref": "#/components/schemas/Pet"}
        })));

        assert_eq!(
            sample,
            r#"[{"id":0,"name":"Rex","vaccinated":false,"weight":0.0,"owner":"","nickname":"string"}]"#
        );
    }

    #[test]
    fn test_object_shape_omits_properties_without_examples() {
        let spec = spec_with_schemas(json!({
            "Pet": {
                "type": "object",
                "properties": {
                    "id": {"type": "integer", "format": "int64"},
                    "name": {"type": "string", "example": "Rex"},
                    "tag": {"type": "string"}
                }
            }
        }));
        let synthesizer = ExampleSynthesizer::new(&spec);

        let sample = synthesizer.for_schema(&RefOr::Reference {
            ref_path: "#/components/schemas/Pet".to_string(),
        });
        assert_eq!(sample, r#"{"name":"Rex"}"#);
    }

    #[test]
    fn test_object_without_examples_is_empty() {
        let spec = spec_with_schemas(json!({
            "Pet": {"type": "object", "properties": {"id": {"type": "integer"}}}
        }));
        let synthesizer = ExampleSynthesizer::new(&spec);

        let sample = synthesizer.for_schema(&schema(json!({"$ref": "#/components/schemas/Pet"})));
        assert_eq!(sample, "{}");
    }

    #[test]
    fn test_missing_schema_and_reference() {
        let spec = spec_with_schemas(json!({}));
        let synthesizer = ExampleSynthesizer::new(&spec);

        assert_eq!(synthesizer.for_media_type(&MediaType::default()), "{}");
        assert_eq!(
            synthesizer.for_schema(&schema(json!({"$ref": "#/components/schemas/Nope"}))),
            "{}"
        );
    }

    #[test]
    fn test_array_without_item_properties() {
        let spec = spec_with_schemas(json!({}));
        let synthesizer = ExampleSynthesizer::new(&spec);

        let sample = synthesizer.for_schema(&schema(json!({
            "type": "array",
            "items": {"type": "string"}
        })));
        assert_eq!(sample, "[{}]");
    }

    #[test]
    fn test_primitive_defaults() {
        assert_eq!(primitive_default(Some("string")), json!("string"));
        assert_eq!(primitive_default(Some("BOOLEAN")), json!(false));
        assert_eq!(primitive_default(Some("number")).to_string(), "0.0");
        assert_eq!(primitive_default(None), json!(""));
    }
}
