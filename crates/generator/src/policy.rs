//! Custom inbound policies declared as specification extensions
//!
//! The API object and each operation may carry a string under
//! [`POLICY_EXTENSION_KEY`]. The string is appended to the inbound section of
//! a fixed policy envelope; the backend, outbound and on-error sections only
//! inherit from the parent scope.

use apim_graph_common::{
    GeneratorError, PolicyDefinition, PolicyFormat, PolicyScope, Result, API_POLICY_RESOURCE_NAME,
    POLICY_ID,
};
use apim_graph_parser::openapi::{Extensible, OpenApiSpec, Operation};
use tera::{Context, Tera};
use tracing::debug;

/// Extension key holding an inbound policy fragment
pub const POLICY_EXTENSION_KEY: &str = "x-az-apim-inbound-append-policy";

const POLICY_TEMPLATE_NAME: &str = "policy.xml";

const POLICY_TEMPLATE: &str = "<policies>
      <inbound>
          <base />
          {{ inbound_append | safe }}      </inbound>
      <backend>
          <base />
      </backend>
      <outbound>
          <base />
      </outbound>
      <on-error>
          <base />
      </on-error>
  </policies>";

/// Renders policy documents from the envelope template
///
/// The template is compiled once when the renderer is created.
pub struct PolicyRenderer {
    tera: Tera,
}

impl PolicyRenderer {
    /// Compile the policy envelope
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(POLICY_TEMPLATE_NAME, POLICY_TEMPLATE)
            .map_err(|e| {
                GeneratorError::Generation(format!("Failed to load policy template: {}", e))
            })?;

        Ok(Self { tera })
    }

    /// Wrap an inbound fragment in the policy envelope
    pub fn render(&self, inbound_append: &str) -> Result<String> {
        let mut context = Context::new();
        context.insert("inbound_append", inbound_append);

        self.tera
            .render(POLICY_TEMPLATE_NAME, &context)
            .map_err(|e| GeneratorError::Generation(format!("Template error: {}", e)))
    }

    /// Policy for the whole API, if the document declares one
    pub fn api_policy(&self, spec: &OpenApiSpec) -> Result<Option<PolicyDefinition>> {
        self.extract(spec, PolicyScope::Api, API_POLICY_RESOURCE_NAME.to_string())
    }

    /// Policy for one operation, if the operation declares one
    pub fn operation_policy(
        &self,
        operation_id: &str,
        operation: &Operation,
    ) -> Result<Option<PolicyDefinition>> {
        self.extract(
            operation,
            PolicyScope::Operation {
                operation_id: operation_id.to_string(),
            },
            PolicyDefinition::operation_resource_name(operation_id),
        )
    }

    fn extract<E: Extensible>(
        &self,
        source: &E,
        scope: PolicyScope,
        resource_name: String,
    ) -> Result<Option<PolicyDefinition>> {
        let Some(fragment) = source.extension_str(POLICY_EXTENSION_KEY) else {
            return Ok(None);
        };

        debug!(resource = %resource_name, "rendering custom inbound policy");
        Ok(Some(PolicyDefinition {
            resource_name,
            scope,
            policy_id: POLICY_ID.to_string(),
            format: PolicyFormat::Xml,
            value: self.render(fragment)?,
        }))
    }
}
