//! Resource graph generation for API management
//!
//! This crate transforms a parsed OpenAPI document into the set of resources
//! that publish it on an API management service:
//! - the API itself
//! - a schema catalog built from `components.schemas`
//! - one operation per path and method
//! - custom inbound policies declared through specification extensions
//!
//! Resources are returned as a [`ResourceGraph`] with explicit dependency
//! edges. [`apply_graph`] hands the graph to a [`ResourceProvisioner`].

pub mod examples;
pub mod graph;
pub mod operations;
pub mod policy;
pub mod provisioner;
pub mod schema_catalog;

pub use apim_graph_common::content;
pub use examples::ExampleSynthesizer;
pub use graph::ResourceGraphBuilder;
pub use operations::OperationMapper;
pub use policy::{PolicyRenderer, POLICY_EXTENSION_KEY};
pub use provisioner::{apply_graph, ProvisionReport, ResourceProvisioner};
pub use schema_catalog::build_schema_catalog;

use apim_graph_common::{ApiConfiguration, ResourceGraph, Result};
use apim_graph_parser::openapi::OpenApiSpec;

/// Build the resource graph for one document
///
/// Shorthand for [`ResourceGraphBuilder::new`] followed by
/// [`ResourceGraphBuilder::build`].
pub fn build_resource_graph(
    spec: &OpenApiSpec,
    config: &ApiConfiguration,
) -> Result<ResourceGraph> {
    ResourceGraphBuilder::new()?.build(spec, config)
}
