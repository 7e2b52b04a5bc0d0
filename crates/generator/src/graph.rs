//! Assembles the resource graph
//!
//! API → schema catalog → operations → operation policies. Construction is
//! deterministic for a given document apart from generated operation ids.

use crate::operations::OperationMapper;
use crate::policy::PolicyRenderer;
use crate::schema_catalog::build_schema_catalog;
use apim_graph_common::{
    ApiConfiguration, ApiDefinition, CatalogIdentity, DependencyEdge, ManagementTarget, Protocol,
    ResourceGraph, ResourceId, Result,
};
use apim_graph_parser::openapi::OpenApiSpec;
use tracing::info;

/// Builds resource graphs from OpenAPI documents
///
/// Holds the compiled policy template, so one builder can serve any number
/// of documents.
pub struct ResourceGraphBuilder {
    policies: PolicyRenderer,
}

impl ResourceGraphBuilder {
    /// Create a builder, compiling the policy template
    pub fn new() -> Result<Self> {
        Ok(Self {
            policies: PolicyRenderer::new()?,
        })
    }

    /// Transform a document into a resource graph
    pub fn build(&self, spec: &OpenApiSpec, config: &ApiConfiguration) -> Result<ResourceGraph> {
        let api = ApiDefinition {
            id: ApiDefinition::id_from_title(&spec.info.title),
            display_name: spec.info.title.clone(),
            description: spec.info.description.clone(),
            path: config.api_path.clone(),
            service_url: config.service_url.clone(),
            protocols: vec![Protocol::Https],
        };
        let schema_catalog = build_schema_catalog(spec);
        let catalog_identity = CatalogIdentity::new();

        let mut edges = vec![edge(ResourceId::SchemaCatalog, ResourceId::Api)];
        let mut policies = Vec::new();

        if let Some(policy) = self.policies.api_policy(spec)? {
            edges.push(edge(ResourceId::ApiPolicy, ResourceId::Api));
            policies.push(policy);
        }

        let mapped = OperationMapper::new(spec, &catalog_identity).map_operations();
        let mut operations = Vec::with_capacity(mapped.len());

        for (definition, source) in mapped {
            let operation = ResourceId::Operation(definition.operation_id.clone());
            edges.push(edge(operation.clone(), ResourceId::SchemaCatalog));

            if let Some(policy) = self
                .policies
                .operation_policy(&definition.operation_id, source)?
            {
                edges.push(edge(
                    ResourceId::OperationPolicy(definition.operation_id.clone()),
                    operation,
                ));
                policies.push(policy);
            }

            operations.push(definition);
        }

        info!(
            api = %api.id,
            schemas = schema_catalog.len(),
            operations = operations.len(),
            policies = policies.len(),
            "built resource graph"
        );

        Ok(ResourceGraph {
            target: ManagementTarget {
                resource_group: config.resource_group.clone(),
                service_name: config.management_service_name.clone(),
            },
            api,
            schema_catalog,
            operations,
            policies,
            edges,
            catalog_identity,
        })
    }
}

fn edge(dependent: ResourceId, dependency: ResourceId) -> DependencyEdge {
    DependencyEdge {
        dependent,
        dependency,
    }
}
