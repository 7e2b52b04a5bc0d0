//! Maps path/verb pairs to operation definitions
//!
//! Every omission in the source degrades to an empty or default value; the
//! mapper never fails. Schema bindings of representations are handed out by
//! the graph's [`CatalogIdentity`] and resolve once the catalog exists.

use crate::examples::ExampleSynthesizer;
use apim_graph_common::{
    CatalogIdentity, DeferredSchemaRef, HttpMethod, OperationDefinition, ParameterDefinition,
    ParameterLocation, RepresentationDefinition, RequestDefinition, ResponseDefinition,
};
use apim_graph_parser::openapi::{
    Header, MediaType, OpenApiSpec, Operation, Parameter, PathItem, RefOr, Schema, SchemaOrRef,
};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

/// Builds operation definitions for one document
pub struct OperationMapper<'a> {
    spec: &'a OpenApiSpec,
    examples: ExampleSynthesizer<'a>,
    catalog: &'a CatalogIdentity,
}

impl<'a> OperationMapper<'a> {
    pub fn new(spec: &'a OpenApiSpec, catalog: &'a CatalogIdentity) -> Self {
        Self {
            spec,
            examples: ExampleSynthesizer::new(spec),
            catalog,
        }
    }

    /// Map every operation of the document, paired with its source operation
    ///
    /// Paths keep document order; operations under a path follow method
    /// order (get, put, post, delete, options, head, patch, trace).
    pub fn map_operations(&self) -> Vec<(OperationDefinition, &'a Operation)> {
        let spec = self.spec;
        spec.paths
            .iter()
            .flat_map(|(path, item)| {
                item.operations()
                    .map(move |(method, operation)| (path.as_str(), item, method, operation))
            })
            .map(|(path, item, method, operation)| {
                (self.map_operation(path, item, method, operation), operation)
            })
            .collect()
    }

    /// Map a single operation
    pub fn map_operation(
        &self,
        path: &str,
        path_item: &PathItem,
        method: HttpMethod,
        operation: &Operation,
    ) -> OperationDefinition {
        let operation_id = match non_blank(operation.operation_id.as_deref()) {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };
        let display_name = non_blank(operation.summary.as_deref())
            .unwrap_or(path)
            .to_string();

        let template_parameters: Vec<ParameterDefinition> = self
            .parameters(path_item, operation)
            .into_iter()
            .filter(|param| param.location == ParameterLocation::Path)
            .collect();

        // Header and query contracts only carry what the operation declares.
        let declared: Vec<ParameterDefinition> = operation
            .parameters
            .iter()
            .filter_map(|param| self.resolve_parameter(param))
            .collect();
        let by_location = |location: ParameterLocation| -> Vec<ParameterDefinition> {
            declared
                .iter()
                .filter(|param| param.location == location)
                .cloned()
                .collect()
        };

        let request = self.request(
            operation,
            by_location(ParameterLocation::Header),
            by_location(ParameterLocation::Query),
        );
        let responses = self.responses(operation);

        debug!(
            operation_id = %operation_id,
            method = %method,
            path,
            responses = responses.len(),
            "mapped operation"
        );

        OperationDefinition {
            operation_id,
            declared_operation_id: operation.operation_id.clone(),
            display_name,
            method,
            url_template: path.to_string(),
            description: operation.description.clone(),
            template_parameters,
            request,
            responses,
        }
    }

    /// Operation-level parameters followed by path-level ones the operation
    /// does not override (same name and location)
    fn parameters(&self, path_item: &PathItem, operation: &Operation) -> Vec<ParameterDefinition> {
        let mut parameters: Vec<ParameterDefinition> = operation
            .parameters
            .iter()
            .filter_map(|param| self.resolve_parameter(param))
            .collect();

        for inherited in path_item
            .parameters
            .iter()
            .filter_map(|param| self.resolve_parameter(param))
        {
            let overridden = parameters
                .iter()
                .any(|p| p.name == inherited.name && p.location == inherited.location);
            if !overridden {
                parameters.push(inherited);
            }
        }

        parameters
    }

    fn resolve_parameter(&self, param: &RefOr<Parameter>) -> Option<ParameterDefinition> {
        let Some(param) = param.resolve(self.spec) else {
            warn!(
                reference = param.reference_id().unwrap_or_default(),
                "skipping unresolvable parameter reference"
            );
            return None;
        };

        let location = ParameterLocation::parse(&param.location)?;
        let schema = self.resolve_schema(param.schema.as_ref());

        Some(ParameterDefinition {
            name: param.name.clone(),
            location,
            required: param.required,
            type_name: type_name(schema),
            description: param.description.clone(),
            default_value: default_value(schema),
        })
    }

    fn request(
        &self,
        operation: &Operation,
        headers: Vec<ParameterDefinition>,
        query_parameters: Vec<ParameterDefinition>,
    ) -> Option<RequestDefinition> {
        let body = operation.request_body.as_ref().and_then(|body| {
            let resolved = body.resolve(self.spec);
            if resolved.is_none() {
                warn!(
                    reference = body.reference_id().unwrap_or_default(),
                    "skipping unresolvable request body reference"
                );
            }
            resolved
        });

        if body.is_none() && headers.is_empty() && query_parameters.is_empty() {
            return None;
        }

        // Only bodies bound to a named schema give the gateway something to
        // validate against.
        let representations = body
            .into_iter()
            .flat_map(|body| body.content.iter())
            .filter_map(|(content_type, media_type)| {
                let schema = media_type.schema.as_ref()?;
                non_blank(schema.reference_id())?;
                Some(RepresentationDefinition {
                    content_type: content_type.clone(),
                    sample: self.examples.for_schema(schema),
                    schema: self.schema_ref(content_type, media_type),
                })
            })
            .collect();

        Some(RequestDefinition {
            description: operation.description.clone(),
            representations,
            headers,
            query_parameters,
        })
    }

    fn responses(&self, operation: &Operation) -> Vec<ResponseDefinition> {
        operation
            .responses
            .iter()
            .filter_map(|(status, response)| {
                let status_code = status.parse::<i32>().ok()?;
                let Some(response) = response.resolve(self.spec) else {
                    warn!(
                        status = %status,
                        reference = response.reference_id().unwrap_or_default(),
                        "skipping unresolvable response reference"
                    );
                    return None;
                };

                Some(ResponseDefinition {
                    status_code,
                    description: response.description.clone(),
                    representations: response
                        .content
                        .iter()
                        .map(|(content_type, media_type)| RepresentationDefinition {
                            content_type: content_type.clone(),
                            sample: self.examples.for_media_type(media_type),
                            schema: self.schema_ref(content_type, media_type),
                        })
                        .collect(),
                    headers: response
                        .headers
                        .iter()
                        .filter_map(|(name, header)| self.response_header(name, header))
                        .collect(),
                })
            })
            .collect()
    }

    fn response_header(&self, name: &str, header: &RefOr<Header>) -> Option<ParameterDefinition> {
        let Some(header) = header.resolve(self.spec) else {
            warn!(
                header = name,
                reference = header.reference_id().unwrap_or_default(),
                "skipping unresolvable header reference"
            );
            return None;
        };
        let schema = self.resolve_schema(header.schema.as_ref());

        Some(ParameterDefinition {
            name: name.to_string(),
            location: ParameterLocation::Header,
            required: header.required,
            type_name: type_name(schema),
            description: header.description.clone(),
            default_value: default_value(schema),
        })
    }

    fn schema_ref(&self, content_type: &str, media_type: &MediaType) -> DeferredSchemaRef {
        let candidate = media_type
            .schema
            .as_ref()
            .and_then(RefOr::reference_id)
            .unwrap_or_default();
        self.catalog.reference(content_type, candidate)
    }

    fn resolve_schema<'s>(&'s self, schema: Option<&'s SchemaOrRef>) -> Option<&'s Schema> {
        schema.and_then(|schema| schema.resolve(self.spec))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn type_name(schema: Option<&Schema>) -> String {
    schema
        .and_then(Schema::type_name)
        .unwrap_or_default()
        .to_string()
}

/// Stringified default: strings raw, anything else as compact JSON
fn default_value(schema: Option<&Schema>) -> String {
    match schema.and_then(|s| s.default.as_ref()) {
        Some(Value::String(value)) => value.clone(),
        Some(value) => value.to_string(),
        None => String::new(),
    }
}
