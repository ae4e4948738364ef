//! One-shot actions.
//!
//! An action is invoked with a configuration, does its work against the
//! management node and reports what it did as a list of progress events.
//! Nothing is kept in state.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ProviderError;
use crate::infinity::InfinityClient;
use crate::schema::Schema;
use crate::types::ProgressEvent;

mod delete_default_management_certificate;

pub use delete_default_management_certificate::{
    DeleteDefaultManagementCertificateAction, DeleteDefaultManagementCertificateConfig,
};

/// An action over JSON configuration.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// Full type name.
    fn type_name(&self) -> &'static str;

    /// Configuration schema.
    fn schema(&self) -> Schema;

    /// Run the action.
    async fn invoke(
        &self,
        client: &InfinityClient,
        config: Value,
    ) -> Result<Vec<ProgressEvent>, ProviderError>;
}

/// Every action this provider serves.
pub fn all() -> Vec<Arc<dyn ActionHandler>> {
    vec![Arc::new(DeleteDefaultManagementCertificateAction)]
}
