//! The Pexip Infinity provider.
//!
//! [`InfinityProvider`] holds the handler registries and, once configured,
//! a client for the management node. Every host call is dispatched by type
//! name to a resource, data source or action handler.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::actions::{self, ActionHandler};
use crate::config::ProviderConfig;
use crate::data_sources::{self, DataSourceHandler};
use crate::error::ProviderError;
use crate::infinity::InfinityClient;
use crate::plan::plan_resource;
use crate::resources::{self, ResourceHandler};
use crate::schema::{Diagnostic, ProviderSchema};
use crate::server::ProviderService;
use crate::types::{ImportedResource, PlanResult, ProgressEvent};
use crate::validation::validate;

/// Provider for a Pexip Infinity management node.
pub struct InfinityProvider {
    client: RwLock<Option<InfinityClient>>,
    resources: HashMap<&'static str, Arc<dyn ResourceHandler>>,
    data_sources: HashMap<&'static str, Arc<dyn DataSourceHandler>>,
    actions: HashMap<&'static str, Arc<dyn ActionHandler>>,
}

impl InfinityProvider {
    /// An unconfigured provider. Everything except schema, validation and
    /// data sources fails until [`ProviderService::configure`] succeeds.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// A provider that talks through `client` without being configured.
    pub fn with_client(client: InfinityClient) -> Self {
        Self::build(Some(client))
    }

    fn build(client: Option<InfinityClient>) -> Self {
        Self {
            client: RwLock::new(client),
            resources: resources::all()
                .into_iter()
                .map(|h| (h.type_name(), h))
                .collect(),
            data_sources: data_sources::all()
                .into_iter()
                .map(|h| (h.type_name(), h))
                .collect(),
            actions: actions::all()
                .into_iter()
                .map(|h| (h.type_name(), h))
                .collect(),
        }
    }

    /// Whether a client is available.
    pub async fn is_configured(&self) -> bool {
        self.client.read().await.is_some()
    }

    async fn client(&self) -> Result<InfinityClient, ProviderError> {
        self.client.read().await.clone().ok_or_else(|| {
            ProviderError::Configuration(
                "the provider has not been configured with a management node address and credentials"
                    .to_string(),
            )
        })
    }

    fn resource(&self, name: &str) -> Result<&Arc<dyn ResourceHandler>, ProviderError> {
        self.resources
            .get(name)
            .ok_or_else(|| ProviderError::UnknownResource(name.to_string()))
    }

    fn data_source(&self, name: &str) -> Result<&Arc<dyn DataSourceHandler>, ProviderError> {
        self.data_sources
            .get(name)
            .ok_or_else(|| ProviderError::UnknownResource(name.to_string()))
    }

    fn action(&self, name: &str) -> Result<&Arc<dyn ActionHandler>, ProviderError> {
        self.actions
            .get(name)
            .ok_or_else(|| ProviderError::UnknownResource(name.to_string()))
    }

    /// Schema check of the block followed by a check of the resolved
    /// settings. Returns the settings only when there are no errors.
    fn check_config(&self, config: &Value) -> (Option<ProviderConfig>, Vec<Diagnostic>) {
        let mut diagnostics = validate(&ProviderConfig::schema(), config);
        if diagnostics.iter().any(Diagnostic::is_error) {
            return (None, diagnostics);
        }

        let resolved = match ProviderConfig::from_value(config) {
            Ok(resolved) => resolved,
            Err(err) => {
                diagnostics.push(err.to_diagnostic());
                return (None, diagnostics);
            },
        };

        // Environment values have not been checked yet.
        diagnostics.extend(resolved.validate());
        if diagnostics.iter().any(Diagnostic::is_error) {
            return (None, diagnostics);
        }
        (Some(resolved), diagnostics)
    }
}

impl Default for InfinityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ProviderService for InfinityProvider {
    fn schema(&self) -> ProviderSchema {
        let mut schema = ProviderSchema::new().with_provider_config(ProviderConfig::schema());
        for (name, handler) in &self.resources {
            schema = schema.with_resource(*name, handler.schema());
        }
        for (name, handler) in &self.data_sources {
            schema = schema.with_data_source(*name, handler.schema());
        }
        for (name, handler) in &self.actions {
            schema = schema.with_action(*name, handler.schema());
        }
        schema
    }

    async fn validate_provider_config(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        Ok(self.check_config(&config).1)
    }

    #[instrument(skip_all)]
    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let (resolved, mut diagnostics) = self.check_config(&config);
        let Some(resolved) = resolved else {
            warn!(errors = diagnostics.len(), "provider configuration rejected");
            return Ok(diagnostics);
        };

        let client_config = resolved.client_config()?;
        if client_config.insecure {
            diagnostics.push(
                Diagnostic::warning("TLS certificate verification disabled")
                    .with_detail(format!(
                        "Certificates presented by {} will not be verified",
                        client_config.address
                    ))
                    .with_attribute("insecure"),
            );
        }

        let client = InfinityClient::new(&client_config)
            .map_err(|err| ProviderError::Configuration(err.to_string()))?;
        *self.client.write().await = Some(client);

        info!(
            address = %client_config.address,
            username = %client_config.username,
            insecure = client_config.insecure,
            "provider configured"
        );
        Ok(diagnostics)
    }

    async fn stop(&self) -> Result<(), ProviderError> {
        debug!("releasing management node client");
        self.client.write().await.take();
        Ok(())
    }

    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        Ok(validate(&self.resource(resource_type)?.schema(), &config))
    }

    async fn plan(
        &self,
        resource_type: &str,
        prior_state: Option<Value>,
        proposed_state: Value,
        _config: Value,
    ) -> Result<PlanResult, ProviderError> {
        let schema = self.resource(resource_type)?.schema();
        Ok(plan_resource(&schema, prior_state.as_ref(), &proposed_state))
    }

    async fn create(&self, resource_type: &str, planned_state: Value) -> Result<Value, ProviderError> {
        let handler = self.resource(resource_type)?;
        handler.create(&self.client().await?, planned_state).await
    }

    async fn read(&self, resource_type: &str, current_state: Value) -> Result<Value, ProviderError> {
        let handler = self.resource(resource_type)?;
        handler.read(&self.client().await?, current_state).await
    }

    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        let handler = self.resource(resource_type)?;
        handler
            .update(&self.client().await?, prior_state, planned_state)
            .await
    }

    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), ProviderError> {
        let handler = self.resource(resource_type)?;
        handler.delete(&self.client().await?, current_state).await
    }

    async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        let handler = self.resource(resource_type)?;
        let state = handler.import_state(&self.client().await?, id).await?;
        Ok(vec![ImportedResource::new(resource_type, state)])
    }

    async fn validate_data_source_config(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        Ok(validate(&self.data_source(data_source_type)?.schema(), &config))
    }

    async fn read_data_source(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Value, ProviderError> {
        self.data_source(data_source_type)?.read(config).await
    }

    async fn invoke_action(
        &self,
        action_type: &str,
        config: Value,
    ) -> Result<Vec<ProgressEvent>, ProviderError> {
        let handler = self.action(action_type)?;
        handler.invoke(&self.client().await?, config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infinity::{Method, MockTransport, API_PREFIX};
    use crate::testing::{
        assert_plan_changes_attribute, assert_plan_replaces, assert_plan_updates_in_place,
        ProviderTester,
    };
    use serde_json::json;

    fn configured() -> (Arc<MockTransport>, ProviderTester<InfinityProvider>) {
        let mock = Arc::new(MockTransport::new());
        let client = InfinityClient::with_transport(mock.clone());
        (mock, ProviderTester::new(InfinityProvider::with_client(client)))
    }

    #[tokio::test]
    async fn test_dns_server_create_and_update() {
        let (mock, tester) = configured();

        let state = tester
            .lifecycle_create("pexip_infinity_dns_server", json!({"address": "1.1.1.1"}))
            .await
            .unwrap();

        assert_eq!(state["address"], "1.1.1.1");
        assert_eq!(state["description"], "");
        assert_eq!(state["resource_id"], 1);
        assert_eq!(state["id"], format!("{}dns_server/1/", API_PREFIX));

        mock.clear_requests();
        let plan = tester
            .plan_update(
                "pexip_infinity_dns_server",
                state.clone(),
                json!({"address": "8.8.8.8"}),
            )
            .await
            .unwrap();
        assert_plan_updates_in_place(&plan);
        assert_plan_changes_attribute(&plan, "address");

        let updated = tester
            .update("pexip_infinity_dns_server", state, plan.planned_state)
            .await
            .unwrap();
        assert_eq!(updated["address"], "8.8.8.8");

        let puts = mock.requests_for(Method::Put, "dns_server");
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].body.as_ref().unwrap()["address"], "8.8.8.8");
        assert_eq!(mock.mutation_count(), 1);
    }

    #[tokio::test]
    async fn test_new_entitlement_replaces_licence() {
        let (_, tester) = configured();
        let prior = json!({
            "id": "/api/admin/configuration/v1/licence/ABC/",
            "fingerprint": "ABC",
            "entitlement_id": "old-entitlement",
            "status": "ACTIVE",
        });

        let plan = tester
            .plan_update(
                "pexip_infinity_licence",
                prior,
                json!({"entitlement_id": "new-entitlement"}),
            )
            .await
            .unwrap();

        assert_plan_replaces(&plan);
        assert!(plan.planned_state["fingerprint"].is_null());
    }

    #[tokio::test]
    async fn test_read_of_deleted_object_removes_it() {
        let (mock, tester) = configured();
        let state = tester
            .create("pexip_infinity_dns_server", json!({"address": "1.1.1.1"}))
            .await
            .unwrap();

        mock.remove("dns_server", "1");

        let refreshed = tester.read("pexip_infinity_dns_server", state).await.unwrap();
        assert!(refreshed.is_null());
    }

    #[tokio::test]
    async fn test_unconfigured_provider_rejects_crud() {
        let tester = ProviderTester::new(InfinityProvider::new());

        let err = tester
            .create("pexip_infinity_dns_server", json!({"address": "1.1.1.1"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));

        let err = tester
            .invoke_action("pexip_infinity_delete_default_management_certificate", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_data_source_works_before_configure() {
        let tester = ProviderTester::new(InfinityProvider::new());
        let state = tester
            .read_data_source(
                "pexip_infinity_manager_config",
                json!({
                    "hostname": "manager",
                    "domain": "example.com",
                    "ip": "10.0.0.2",
                    "mask": "255.255.255.0",
                    "gw": "10.0.0.1",
                    "dns": "10.0.0.53",
                    "ntp": "pool.ntp.org",
                    "user": "admin",
                    "pass": "secret",
                    "admin_password": "secret",
                }),
            )
            .await
            .unwrap();
        assert_eq!(state["id"], "manager");
    }

    #[tokio::test]
    async fn test_unknown_types() {
        let (_, tester) = configured();

        let err = tester
            .read("pexip_infinity_nope", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnknownResource(_)));

        let err = tester
            .read_data_source("pexip_infinity_nope", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnknownResource(_)));

        let err = tester
            .invoke_action("pexip_infinity_nope", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnknownResource(_)));
    }

    #[tokio::test]
    async fn test_configure_rejects_bad_address() {
        let provider = InfinityProvider::new();

        let diagnostics = provider
            .configure(json!({
                "address": "not a url",
                "username": "admin",
                "password": "secret",
            }))
            .await
            .unwrap();

        assert!(diagnostics.iter().any(|d| d.is_error()));
        assert!(diagnostics
            .iter()
            .any(|d| d.attribute.as_deref() == Some("address")));
        assert!(!provider.is_configured().await);
    }

    #[tokio::test]
    async fn test_configure_builds_client() {
        let provider = InfinityProvider::new();

        let diagnostics = provider
            .configure(json!({
                "address": "https://manager.example.com",
                "username": "admin",
                "password": "secret",
                "insecure": true,
            }))
            .await
            .unwrap();

        assert!(!diagnostics.iter().any(|d| d.is_error()));
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("insecure"));
        assert!(provider.is_configured().await);

        provider.stop().await.unwrap();
        assert!(!provider.is_configured().await);
    }

    #[tokio::test]
    async fn test_validate_resource_config_reports_attribute() {
        let (_, tester) = configured();

        let err = tester
            .validate_resource_config("pexip_infinity_dns_server", json!({"address": "1.1.1"}))
            .await
            .unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("address"), "{}", rendered);
    }

    #[tokio::test]
    async fn test_import_wraps_state() {
        let (mock, tester) = configured();
        mock.insert("ntp_server", json!({"address": "pool.ntp.org", "description": ""}));

        let imported = tester
            .import_resource("pexip_infinity_ntp_server", "1")
            .await
            .unwrap();

        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].resource_type, "pexip_infinity_ntp_server");
        assert_eq!(imported[0].state["address"], "pool.ntp.org");
    }

    #[test]
    fn test_schema_covers_every_handler() {
        let provider = InfinityProvider::new();
        let schema = provider.schema();

        assert_eq!(schema.resources.len(), resources::all().len());
        assert!(schema.data_sources.contains_key("pexip_infinity_manager_config"));
        assert!(schema
            .actions
            .contains_key("pexip_infinity_delete_default_management_certificate"));
        assert!(schema.provider.attribute("password").unwrap().flags.sensitive);

        let metadata = provider.metadata();
        assert!(metadata
            .resources
            .iter()
            .all(|name| name.starts_with(resources::TYPE_PREFIX)));
    }
}
