//! Provisioner that logs instead of calling a management plane

use apim_graph_common::{
    ApiDefinition, ManagementTarget, OperationDefinition, PolicyDefinition, Result, SchemaCatalog,
};
use apim_graph_generator::ResourceProvisioner;
use async_trait::async_trait;
use tracing::info;

/// Echoes each resource and hands back its logical name as the durable name
pub struct DryRunProvisioner;

#[async_trait]
impl ResourceProvisioner for DryRunProvisioner {
    async fn provision_api(
        &self,
        target: &ManagementTarget,
        api: &ApiDefinition,
    ) -> Result<String> {
        info!(
            resource_group = %target.resource_group,
            service = %target.service_name,
            api = %api.id,
            path = %api.path,
            "would create api"
        );
        Ok(api.id.clone())
    }

    async fn provision_api_policy(
        &self,
        _target: &ManagementTarget,
        api_name: &str,
        policy: &PolicyDefinition,
    ) -> Result<String> {
        info!(api = api_name, policy = %policy.resource_name, "would create api policy");
        Ok(policy.resource_name.clone())
    }

    async fn provision_schema_catalog(
        &self,
        _target: &ManagementTarget,
        api_name: &str,
        catalog: &SchemaCatalog,
    ) -> Result<String> {
        info!(
            api = api_name,
            schema_id = %catalog.schema_id,
            schemas = catalog.len(),
            "would create schema catalog"
        );
        Ok(catalog.schema_id.clone())
    }

    async fn provision_operation(
        &self,
        _target: &ManagementTarget,
        api_name: &str,
        operation: &OperationDefinition,
    ) -> Result<String> {
        info!(
            api = api_name,
            operation = %operation.operation_id,
            method = %operation.method,
            url_template = %operation.url_template,
            "would create operation"
        );
        Ok(operation.operation_id.clone())
    }

    async fn provision_operation_policy(
        &self,
        _target: &ManagementTarget,
        api_name: &str,
        operation_name: &str,
        policy: &PolicyDefinition,
    ) -> Result<String> {
        info!(
            api = api_name,
            operation = operation_name,
            policy = %policy.resource_name,
            "would create operation policy"
        );
        Ok(policy.resource_name.clone())
    }
}
