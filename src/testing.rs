//! Test harness for the provider.
//!
//! [`ProviderTester`] drives a [`ProviderService`] directly, without a gRPC
//! server, and [`ProviderTester::with_mock`] wires an [`InfinityProvider`]
//! to an in-memory [`MockTransport`].
//!
//! ```no_run
//! use pexip_infinity_provider::testing::ProviderTester;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), pexip_infinity_provider::ProviderError> {
//! let (mock, tester) = ProviderTester::with_mock();
//!
//! let state = tester
//!     .lifecycle_create("pexip_infinity_dns_server", json!({"address": "1.1.1.1"}))
//!     .await?;
//! assert_eq!(state["description"], "");
//! assert_eq!(mock.len("dns_server"), 1);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use serde_json::Value;

use crate::error::ProviderError;
use crate::infinity::{InfinityClient, MockTransport};
use crate::provider::InfinityProvider;
use crate::schema::{Diagnostic, DiagnosticSeverity, ProviderSchema};
use crate::server::ProviderService;
use crate::types::{ImportedResource, PlanResult, ProgressEvent};

/// Calls a provider the way the host would, minus the wire.
pub struct ProviderTester<P: ProviderService> {
    provider: P,
}

impl ProviderTester<InfinityProvider> {
    /// A configured provider backed by a fresh [`MockTransport`].
    pub fn with_mock() -> (Arc<MockTransport>, Self) {
        let mock = Arc::new(MockTransport::new());
        let client = InfinityClient::with_transport(mock.clone());
        (mock, Self::new(InfinityProvider::with_client(client)))
    }
}

impl<P: ProviderService> ProviderTester<P> {
    /// Wrap a provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// The wrapped provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    // =========================================================================
    // Schema & Metadata
    // =========================================================================

    /// The provider's schema.
    pub fn schema(&self) -> ProviderSchema {
        self.provider.schema()
    }

    /// Resource type names.
    pub fn resource_types(&self) -> Vec<String> {
        self.provider.metadata().resources
    }

    /// Data source type names.
    pub fn data_source_types(&self) -> Vec<String> {
        self.provider.metadata().data_sources
    }

    /// Action type names.
    pub fn action_types(&self) -> Vec<String> {
        self.provider.metadata().actions
    }

    // =========================================================================
    // Provider Lifecycle
    // =========================================================================

    /// Validate the provider block. Error diagnostics become `Err`.
    pub async fn validate_provider_config(&self, config: Value) -> Result<(), TestError> {
        let diagnostics = self.provider.validate_provider_config(config).await?;
        check_diagnostics(diagnostics)
    }

    /// Configure the provider. Error diagnostics become `Err`.
    pub async fn configure(&self, config: Value) -> Result<(), TestError> {
        let diagnostics = self.provider.configure(config).await?;
        check_diagnostics(diagnostics)
    }

    /// Stop the provider.
    pub async fn stop(&self) -> Result<(), ProviderError> {
        self.provider.stop().await
    }

    // =========================================================================
    // Resource Operations
    // =========================================================================

    /// Validate a resource configuration. Error diagnostics become `Err`.
    pub async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<(), TestError> {
        let diagnostics = self
            .provider
            .validate_resource_config(resource_type, config)
            .await?;
        check_diagnostics(diagnostics)
    }

    /// Plan a create.
    pub async fn plan_create(
        &self,
        resource_type: &str,
        proposed_state: Value,
    ) -> Result<PlanResult, ProviderError> {
        self.provider
            .plan(resource_type, None, proposed_state.clone(), proposed_state)
            .await
    }

    /// Plan an update.
    pub async fn plan_update(
        &self,
        resource_type: &str,
        prior_state: Value,
        proposed_state: Value,
    ) -> Result<PlanResult, ProviderError> {
        self.provider
            .plan(
                resource_type,
                Some(prior_state),
                proposed_state.clone(),
                proposed_state,
            )
            .await
    }

    /// Plan a destroy.
    pub async fn plan_delete(
        &self,
        resource_type: &str,
        prior_state: Value,
    ) -> Result<PlanResult, ProviderError> {
        self.provider
            .plan(resource_type, Some(prior_state), Value::Null, Value::Null)
            .await
    }

    /// Create a resource.
    pub async fn create(
        &self,
        resource_type: &str,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        self.provider.create(resource_type, planned_state).await
    }

    /// Refresh a resource.
    pub async fn read(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<Value, ProviderError> {
        self.provider.read(resource_type, current_state).await
    }

    /// Update a resource.
    pub async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        self.provider
            .update(resource_type, prior_state, planned_state)
            .await
    }

    /// Delete a resource.
    pub async fn delete(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<(), ProviderError> {
        self.provider.delete(resource_type, current_state).await
    }

    /// Import an existing object.
    pub async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        self.provider.import_resource(resource_type, id).await
    }

    // =========================================================================
    // Data Sources & Actions
    // =========================================================================

    /// Validate a data source configuration. Error diagnostics become `Err`.
    pub async fn validate_data_source_config(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<(), TestError> {
        let diagnostics = self
            .provider
            .validate_data_source_config(data_source_type, config)
            .await?;
        check_diagnostics(diagnostics)
    }

    /// Read a data source.
    pub async fn read_data_source(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Value, ProviderError> {
        self.provider
            .read_data_source(data_source_type, config)
            .await
    }

    /// Invoke an action.
    pub async fn invoke_action(
        &self,
        action_type: &str,
        config: Value,
    ) -> Result<Vec<ProgressEvent>, ProviderError> {
        self.provider.invoke_action(action_type, config).await
    }

    // =========================================================================
    // Lifecycle Helpers
    // =========================================================================

    /// Plan, create, then read back.
    pub async fn lifecycle_create(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Value, ProviderError> {
        let plan = self.plan_create(resource_type, config).await?;
        let created = self.create(resource_type, plan.planned_state).await?;
        self.read(resource_type, created).await
    }

    /// Plan, update, then read back.
    pub async fn lifecycle_update(
        &self,
        resource_type: &str,
        prior_state: Value,
        proposed_state: Value,
    ) -> Result<Value, ProviderError> {
        let plan = self
            .plan_update(resource_type, prior_state.clone(), proposed_state)
            .await?;
        let updated = self
            .update(resource_type, prior_state, plan.planned_state)
            .await?;
        self.read(resource_type, updated).await
    }

    /// Plan the destroy, then delete.
    pub async fn lifecycle_delete(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<(), ProviderError> {
        self.plan_delete(resource_type, current_state.clone())
            .await?;
        self.delete(resource_type, current_state).await
    }

    /// Create, update and delete. Returns the state after the update.
    pub async fn lifecycle_crud(
        &self,
        resource_type: &str,
        initial_config: Value,
        updated_config: Value,
    ) -> Result<Value, ProviderError> {
        let created = self.lifecycle_create(resource_type, initial_config).await?;
        let updated = self
            .lifecycle_update(resource_type, created, updated_config)
            .await?;
        self.lifecycle_delete(resource_type, updated.clone())
            .await?;
        Ok(updated)
    }
}

/// Failure of a tester call that reports diagnostics.
#[derive(Debug)]
pub enum TestError {
    /// Error diagnostics.
    Diagnostics(Vec<Diagnostic>),
    /// The call itself failed.
    Provider(ProviderError),
}

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestError::Diagnostics(diags) => {
                writeln!(f, "Operation failed with {} diagnostic(s):", diags.len())?;
                for diag in diags {
                    write!(f, "  [{:?}] {}", diag.severity, diag.summary)?;
                    if let Some(detail) = &diag.detail {
                        write!(f, ": {}", detail)?;
                    }
                    if let Some(attr) = &diag.attribute {
                        write!(f, " (at {})", attr)?;
                    }
                    writeln!(f)?;
                }
                Ok(())
            },
            TestError::Provider(e) => write!(f, "Provider error: {}", e),
        }
    }
}

impl std::error::Error for TestError {}

impl From<ProviderError> for TestError {
    fn from(e: ProviderError) -> Self {
        TestError::Provider(e)
    }
}

fn check_diagnostics(diagnostics: Vec<Diagnostic>) -> Result<(), TestError> {
    let errors: Vec<_> = diagnostics.into_iter().filter(Diagnostic::is_error).collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(TestError::Diagnostics(errors))
    }
}

// =========================================================================
// Assertion Helpers
// =========================================================================

/// Assert that a plan creates without replacing.
///
/// # Panics
///
/// Panics if the plan has no changes or requires replacement.
pub fn assert_plan_creates(plan: &PlanResult) {
    assert!(
        !plan.changes.is_empty(),
        "Expected plan to have changes for create, but got no changes"
    );
    assert!(
        !plan.requires_replace,
        "Expected plan to create, not replace"
    );
}

/// Assert that a plan has no changes.
///
/// # Panics
///
/// Panics if the plan has any changes.
pub fn assert_plan_no_changes(plan: &PlanResult) {
    assert!(
        plan.changes.is_empty(),
        "Expected no changes, but got {} change(s): {:?}",
        plan.changes.len(),
        plan.changes.iter().map(|c| &c.path).collect::<Vec<_>>()
    );
}

/// Assert that a plan requires replacement.
///
/// # Panics
///
/// Panics if the plan does not require replacement.
pub fn assert_plan_replaces(plan: &PlanResult) {
    assert!(
        plan.requires_replace,
        "Expected plan to require replacement, but it does not"
    );
}

/// Assert that a plan changes something in place.
///
/// # Panics
///
/// Panics if the plan has no changes or requires replacement.
pub fn assert_plan_updates_in_place(plan: &PlanResult) {
    assert!(
        !plan.changes.is_empty(),
        "Expected plan to have changes, but got no changes"
    );
    assert!(
        !plan.requires_replace,
        "Expected plan to update in place, but it requires replacement"
    );
}

/// Assert that a plan changes `path`.
///
/// # Panics
///
/// Panics if the plan does not have a change for the given path.
pub fn assert_plan_changes_attribute(plan: &PlanResult, path: &str) {
    let has_change = plan.changes.iter().any(|c| c.path == path);
    assert!(
        has_change,
        "Expected plan to change attribute '{}', but it was not changed. Changed attributes: {:?}",
        path,
        plan.changes.iter().map(|c| &c.path).collect::<Vec<_>>()
    );
}

/// Assert that a plan leaves `path` alone.
///
/// # Panics
///
/// Panics if the plan has a change for the given path.
pub fn assert_plan_does_not_change_attribute(plan: &PlanResult, path: &str) {
    let has_change = plan.changes.iter().any(|c| c.path == path);
    assert!(
        !has_change,
        "Expected plan to not change attribute '{}', but it was changed",
        path
    );
}

/// Assert that diagnostics contain no errors.
///
/// # Panics
///
/// Panics if there are any error diagnostics.
pub fn assert_no_errors(diagnostics: &[Diagnostic]) {
    let errors: Vec<_> = diagnostics.iter().filter(|d| d.is_error()).collect();

    assert!(
        errors.is_empty(),
        "Expected no errors, but got {} error(s): {:?}",
        errors.len(),
        errors.iter().map(|d| &d.summary).collect::<Vec<_>>()
    );
}

/// Assert that some error diagnostic points at `attribute`.
///
/// # Panics
///
/// Panics if no error diagnostic names the attribute.
pub fn assert_error_at(diagnostics: &[Diagnostic], attribute: &str) {
    let found = diagnostics
        .iter()
        .any(|d| d.severity == DiagnosticSeverity::Error && d.attribute.as_deref() == Some(attribute));

    assert!(
        found,
        "Expected an error at '{}', but got errors at {:?}",
        attribute,
        diagnostics
            .iter()
            .filter(|d| d.is_error())
            .map(|d| d.attribute.as_deref())
            .collect::<Vec<_>>()
    );
}

/// Assert that some progress event contains `substring`.
///
/// # Panics
///
/// Panics if no event message contains the substring.
pub fn assert_event_contains(events: &[ProgressEvent], substring: &str) {
    assert!(
        events.iter().any(|e| e.message.contains(substring)),
        "Expected an event containing '{}', but got {:?}",
        substring,
        events.iter().map(|e| &e.message).collect::<Vec<_>>()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infinity::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_tester_lists_types() {
        let (_, tester) = ProviderTester::with_mock();

        assert!(tester
            .resource_types()
            .contains(&"pexip_infinity_ntp_server".to_string()));
        assert_eq!(
            tester.data_source_types(),
            vec!["pexip_infinity_manager_config".to_string()]
        );
        assert_eq!(tester.action_types().len(), 1);
    }

    #[tokio::test]
    async fn test_tester_lifecycle_crud() {
        let (mock, tester) = ProviderTester::with_mock();

        let updated = tester
            .lifecycle_crud(
                "pexip_infinity_syslog_server",
                json!({"address": "10.0.0.5"}),
                json!({"address": "10.0.0.6", "description": "central"}),
            )
            .await
            .unwrap();

        assert_eq!(updated["address"], "10.0.0.6");
        assert_eq!(updated["description"], "central");
        assert_eq!(mock.request_count(Method::Post, "syslog_server"), 1);
        assert_eq!(mock.request_count(Method::Put, "syslog_server"), 1);
        assert_eq!(mock.request_count(Method::Delete, "syslog_server"), 1);
        assert!(mock.is_empty("syslog_server"));
    }

    #[tokio::test]
    async fn test_tester_plan_without_changes() {
        let (_, tester) = ProviderTester::with_mock();
        let state = tester
            .lifecycle_create("pexip_infinity_dns_server", json!({"address": "1.1.1.1"}))
            .await
            .unwrap();

        let plan = tester
            .plan_update(
                "pexip_infinity_dns_server",
                state.clone(),
                json!({"address": "1.1.1.1"}),
            )
            .await
            .unwrap();

        assert_plan_no_changes(&plan);
        assert_eq!(plan.planned_state["id"], state["id"]);
    }

    #[tokio::test]
    async fn test_tester_plan_create() {
        let (_, tester) = ProviderTester::with_mock();
        let plan = tester
            .plan_create("pexip_infinity_dns_server", json!({"address": "1.1.1.1"}))
            .await
            .unwrap();

        assert_plan_creates(&plan);
        assert_plan_changes_attribute(&plan, "address");
        assert_plan_does_not_change_attribute(&plan, "id");
    }

    #[tokio::test]
    async fn test_tester_validation_errors() {
        let (_, tester) = ProviderTester::with_mock();

        let err = tester
            .validate_resource_config("pexip_infinity_dns_server", json!({}))
            .await
            .unwrap_err();
        match err {
            TestError::Diagnostics(diagnostics) => assert_error_at(&diagnostics, "address"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_tester_invoke_action() {
        let (_, tester) = ProviderTester::with_mock();
        let events = tester
            .invoke_action(
                "pexip_infinity_delete_default_management_certificate",
                json!({}),
            )
            .await
            .unwrap();

        assert_event_contains(&events, "nothing to delete");
    }

    #[test]
    fn test_assert_no_errors() {
        let diagnostics = vec![Diagnostic::warning("Just a warning")];
        assert_no_errors(&diagnostics);
    }

    #[test]
    #[should_panic(expected = "Expected no errors")]
    fn test_assert_no_errors_fails() {
        let diagnostics = vec![Diagnostic::error("An error")];
        assert_no_errors(&diagnostics);
    }

    #[test]
    #[should_panic(expected = "Expected an error at 'address'")]
    fn test_assert_error_at_fails() {
        let diagnostics = vec![Diagnostic::error("Bad").with_attribute("username")];
        assert_error_at(&diagnostics, "address");
    }

    #[test]
    fn test_test_error_display() {
        let err = TestError::Diagnostics(vec![
            Diagnostic::error("First error").with_attribute("address"),
            Diagnostic::error("Second error").with_detail("More info"),
        ]);

        let display = format!("{}", err);
        assert!(display.contains("First error"));
        assert!(display.contains("Second error"));
        assert!(display.contains("(at address)"));
        assert!(display.contains("More info"));
    }
}
