//! Data sources.
//!
//! Data sources are read-only. The ones served here are rendered locally
//! from their configuration and never call the management node, so they
//! work before the provider is configured.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ProviderError;
use crate::schema::Schema;

mod manager_config;

pub use manager_config::{ManagerConfigDataSource, ManagerConfigModel};

/// A data source over JSON configuration.
#[async_trait]
pub trait DataSourceHandler: Send + Sync {
    /// Full type name.
    fn type_name(&self) -> &'static str;

    /// Attribute schema.
    fn schema(&self) -> Schema;

    /// Compute the data source's state from its configuration.
    async fn read(&self, config: Value) -> Result<Value, ProviderError>;
}

/// Every data source this provider serves.
pub fn all() -> Vec<Arc<dyn DataSourceHandler>> {
    vec![Arc::new(ManagerConfigDataSource)]
}
