//! Seam to the provisioning engine
//!
//! The engine that talks to the management plane lives outside this crate
//! and implements [`ResourceProvisioner`]. [`apply_graph`] walks a resource
//! graph in dependency order and, as soon as the schema catalog has been
//! created, feeds its durable name into the graph's catalog identity so that
//! every representation's schema binding resolves before the operations that
//! carry them are provisioned.

use apim_graph_common::{
    ApiDefinition, GeneratorError, ManagementTarget, OperationDefinition, PolicyDefinition,
    ResourceGraph, ResourceId, Result, SchemaCatalog,
};
use async_trait::async_trait;
use tracing::info;

/// Creates or updates resources on the management plane
///
/// Each call returns the durable name of the created resource.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceProvisioner: Send + Sync {
    async fn provision_api(&self, target: &ManagementTarget, api: &ApiDefinition) -> Result<String>;

    async fn provision_api_policy(
        &self,
        target: &ManagementTarget,
        api_name: &str,
        policy: &PolicyDefinition,
    ) -> Result<String>;

    async fn provision_schema_catalog(
        &self,
        target: &ManagementTarget,
        api_name: &str,
        catalog: &SchemaCatalog,
    ) -> Result<String>;

    async fn provision_operation(
        &self,
        target: &ManagementTarget,
        api_name: &str,
        operation: &OperationDefinition,
    ) -> Result<String>;

    async fn provision_operation_policy(
        &self,
        target: &ManagementTarget,
        api_name: &str,
        operation_name: &str,
        policy: &PolicyDefinition,
    ) -> Result<String>;
}

/// Durable names of everything [`apply_graph`] created
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    pub api_name: String,
    pub catalog_name: String,
    /// (operation id, durable operation name) in provisioning order
    pub operations: Vec<(String, String)>,
    /// Durable policy names in provisioning order
    pub policies: Vec<String>,
}

impl ProvisionReport {
    fn operation_name(&self, operation_id: &str) -> Option<&str> {
        self.operations
            .iter()
            .find(|(id, _)| id == operation_id)
            .map(|(_, name)| name.as_str())
    }
}

/// Provision every resource of a graph in dependency order
///
/// Stops at the first failure; nothing is retried or rolled back.
pub async fn apply_graph<P>(graph: &ResourceGraph, provisioner: &P) -> Result<ProvisionReport>
where
    P: ResourceProvisioner + ?Sized,
{
    let target = &graph.target;
    let mut report = ProvisionReport::default();

    for resource in graph.provisioning_order() {
        match &resource {
            ResourceId::Api => {
                report.api_name = provisioner.provision_api(target, &graph.api).await?;
            }
            ResourceId::ApiPolicy => {
                let policy = graph.api_policy().ok_or_else(|| missing(&resource))?;
                let name = provisioner
                    .provision_api_policy(target, &report.api_name, policy)
                    .await?;
                report.policies.push(name);
            }
            ResourceId::SchemaCatalog => {
                let name = provisioner
                    .provision_schema_catalog(target, &report.api_name, &graph.schema_catalog)
                    .await?;
                graph.catalog_identity.resolve(name.clone());
                report.catalog_name = name;
            }
            ResourceId::Operation(operation_id) => {
                let operation = graph
                    .operation(operation_id)
                    .ok_or_else(|| missing(&resource))?;
                let name = provisioner
                    .provision_operation(target, &report.api_name, operation)
                    .await?;
                report.operations.push((operation_id.clone(), name));
            }
            ResourceId::OperationPolicy(operation_id) => {
                let policy = graph
                    .operation_policy(operation_id)
                    .ok_or_else(|| missing(&resource))?;
                let operation_name = report
                    .operation_name(operation_id)
                    .ok_or_else(|| missing(&ResourceId::Operation(operation_id.clone())))?
                    .to_string();
                let name = provisioner
                    .provision_operation_policy(target, &report.api_name, &operation_name, policy)
                    .await?;
                report.policies.push(name);
            }
        }

        info!(resource = %resource, "provisioned");
    }

    Ok(report)
}

fn missing(resource: &ResourceId) -> GeneratorError {
    GeneratorError::Provision(format!("resource {} is not in the graph", resource))
}
