//! Deferred schema references
//!
//! A representation may only point at the schema catalog once the catalog
//! resource exists and has a durable name. `CatalogIdentity` is the single
//! place that name is fed in; every `DeferredSchemaRef` handed out by it
//! resolves from that one value.

use crate::content::{negotiate, SchemaBinding};
use crate::{GeneratorError, Result};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use tokio::sync::watch;

/// Resolution point for the schema catalog's durable name
#[derive(Debug)]
pub struct CatalogIdentity {
    tx: watch::Sender<Option<String>>,
}

impl CatalogIdentity {
    /// Create an unresolved identity
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Hand out a reference that resolves once the catalog name is known
    pub fn reference(&self, content_type: &str, candidate_type_name: &str) -> DeferredSchemaRef {
        DeferredSchemaRef {
            content_type: content_type.to_string(),
            candidate_type_name: candidate_type_name.to_string(),
            rx: self.tx.subscribe(),
        }
    }

    /// Feed the durable catalog name to every outstanding reference
    ///
    /// Resolving twice replaces the name; references observe the latest one.
    pub fn resolve(&self, catalog_name: impl Into<String>) {
        self.tx.send_replace(Some(catalog_name.into()));
    }

    /// The durable catalog name, if it has been resolved
    pub fn name(&self) -> Option<String> {
        self.tx.borrow().clone()
    }

    /// Whether the catalog name has been resolved
    pub fn is_resolved(&self) -> bool {
        self.tx.borrow().is_some()
    }
}

impl Default for CatalogIdentity {
    fn default() -> Self {
        Self::new()
    }
}

/// Schema binding of a representation, available once the catalog exists
#[derive(Debug, Clone)]
pub struct DeferredSchemaRef {
    content_type: String,
    candidate_type_name: String,
    rx: watch::Receiver<Option<String>>,
}

impl DeferredSchemaRef {
    /// Content type the binding is negotiated for
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Schema name taken from the source document (empty when none)
    pub fn candidate_type_name(&self) -> &str {
        &self.candidate_type_name
    }

    /// Wait for the catalog name and negotiate the binding
    ///
    /// Fails with [`GeneratorError::Unresolved`] when the identity is dropped
    /// without ever being resolved.
    pub async fn resolve(&self) -> Result<SchemaBinding> {
        let mut rx = self.rx.clone();
        let catalog_name = rx
            .wait_for(Option::is_some)
            .await
            .map_err(|_| GeneratorError::Unresolved(self.content_type.clone()))?
            .clone();

        catalog_name
            .map(|name| negotiate(&self.content_type, &name, &self.candidate_type_name))
            .ok_or_else(|| GeneratorError::Unresolved(self.content_type.clone()))
    }

    /// Binding if the catalog name is already known, without waiting
    pub fn current(&self) -> Option<SchemaBinding> {
        self.rx
            .borrow()
            .as_deref()
            .map(|name| negotiate(&self.content_type, name, &self.candidate_type_name))
    }
}

impl Serialize for DeferredSchemaRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let current = self.current();
        let binding = current.clone().unwrap_or_default();

        let mut state = serializer.serialize_struct("DeferredSchemaRef", 4)?;
        state.serialize_field("resolved", &current.is_some())?;
        state.serialize_field("schemaId", &binding.schema_id)?;
        state.serialize_field("typeName", &binding.type_name)?;
        state.serialize_field("candidateTypeName", &self.candidate_type_name)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_reference_has_no_binding() {
        let identity = CatalogIdentity::new();
        let reference = identity.reference("application/json", "Pet");

        assert!(!identity.is_resolved());
        assert!(reference.current().is_none());
    }

    #[tokio::test]
    async fn test_reference_resolves_after_catalog_exists() {
        let identity = CatalogIdentity::new();
        let reference = identity.reference("application/json", "Pet");

        let waiter = tokio::spawn({
            let reference = reference.clone();
            async move { reference.resolve().await }
        });

        identity.resolve("apischema");

        let binding = waiter.await.unwrap().unwrap();
        assert_eq!(binding.schema_id.as_deref(), Some("apischema"));
        assert_eq!(binding.type_name.as_deref(), Some("Pet"));
        assert_eq!(reference.current(), Some(binding));
    }

    #[tokio::test]
    async fn test_form_reference_resolves_unbound() {
        let identity = CatalogIdentity::new();
        let reference = identity.reference("multipart/form-data", "Upload");
        identity.resolve("apischema");

        let binding = reference.resolve().await.unwrap();
        assert_eq!(binding, SchemaBinding::unbound());
    }

    #[tokio::test]
    async fn test_dropped_identity_fails_waiters() {
        let identity = CatalogIdentity::new();
        let reference = identity.reference("application/json", "Pet");
        drop(identity);

        let result = reference.resolve().await;
        assert!(matches!(result, Err(GeneratorError::Unresolved(_))));
    }

    #[test]
    fn test_serializes_current_resolution() {
        let identity = CatalogIdentity::new();
        let reference = identity.reference("application/json", "Pet");

        let pending = serde_json::to_value(&reference).unwrap();
        assert_eq!(pending["resolved"], false);
        assert!(pending["schemaId"].is_null());
        assert_eq!(pending["candidateTypeName"], "Pet");

        identity.resolve("apischema");
        let resolved = serde_json::to_value(&reference).unwrap();
        assert_eq!(resolved["resolved"], true);
        assert_eq!(resolved["schemaId"], "apischema");
        assert_eq!(resolved["typeName"], "Pet");
    }
}
