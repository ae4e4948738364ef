//! `pexip_infinity_snmp_network_management_system`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{
    create_object_id, delete_object, import_error, parse_import_id, read_object,
    required_resource_id, resource_schema, update_object, Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{SnmpNetworkManagementSystem, SnmpNetworkManagementSystemRequest};
use crate::infinity::InfinityClient;
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "SNMP network management system";

/// State of a `pexip_infinity_snmp_network_management_system`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnmpNetworkManagementSystemModel {
    /// Resource URI assigned by the node.
    pub id: Option<String>,
    /// Numeric id used in API paths.
    pub resource_id: Option<i64>,
    /// Unique name.
    pub name: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// IP address of the management system.
    pub address: Option<String>,
    /// Port number.
    pub port: Option<i64>,
    /// Trap community string. Write-only.
    pub snmp_trap_community: Option<String>,
}

/// Manages SNMP trap receivers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnmpNetworkManagementSystemResource;

fn request(plan: &SnmpNetworkManagementSystemModel) -> SnmpNetworkManagementSystemRequest {
    SnmpNetworkManagementSystemRequest {
        name: plan.name.clone().unwrap_or_default(),
        address: plan.address.clone().unwrap_or_default(),
        description: plan.description.clone(),
        port: plan.port,
        snmp_trap_community: plan.snmp_trap_community.clone(),
    }
}

async fn read(
    client: &InfinityClient,
    id: i64,
    known: &SnmpNetworkManagementSystemModel,
) -> Result<SnmpNetworkManagementSystemModel, ProviderError> {
    let nms: SnmpNetworkManagementSystem = read_object(client, WHAT, id).await?;
    Ok(SnmpNetworkManagementSystemModel {
        id: Some(nms.resource_uri),
        resource_id: Some(id),
        name: Some(nms.name),
        description: Some(nms.description),
        address: Some(nms.address),
        port: Some(nms.port),
        snmp_trap_community: known.snmp_trap_community.clone(),
    })
}

#[async_trait]
impl Resource for SnmpNetworkManagementSystemResource {
    type Model = SnmpNetworkManagementSystemModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_snmp_network_management_system"
    }

    fn schema(&self) -> Schema {
        resource_schema("Manages an SNMP network management system that receives traps.")
            .with_attribute(
                "name",
                Attribute::required_string().with_validator(Validator::length(1, 250)),
            )
            .with_attribute(
                "description",
                Attribute::optional_computed_string().with_validator(Validator::max_length(250)),
            )
            .with_attribute(
                "address",
                Attribute::required_string()
                    .with_description("IP address of the management system")
                    .with_validator(Validator::IpAddress),
            )
            .with_attribute(
                "port",
                Attribute::optional_int64()
                    .with_default(json!(161))
                    .with_validator(Validator::port()),
            )
            .with_attribute(
                "snmp_trap_community",
                Attribute::optional_string()
                    .sensitive()
                    .with_validator(Validator::max_length(16)),
            )
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: SnmpNetworkManagementSystemModel,
    ) -> Result<SnmpNetworkManagementSystemModel, ProviderError> {
        let id = create_object_id::<SnmpNetworkManagementSystem>(client, WHAT, &request(&plan))
            .await?;
        read(client, id, &plan).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        state: SnmpNetworkManagementSystemModel,
    ) -> Result<SnmpNetworkManagementSystemModel, ProviderError> {
        read(client, required_resource_id(state.resource_id)?, &state).await
    }

    async fn update(
        &self,
        client: &InfinityClient,
        prior: SnmpNetworkManagementSystemModel,
        plan: SnmpNetworkManagementSystemModel,
    ) -> Result<SnmpNetworkManagementSystemModel, ProviderError> {
        let id = required_resource_id(prior.resource_id)?;
        update_object::<SnmpNetworkManagementSystem>(client, WHAT, id, &request(&plan)).await?;
        read(client, id, &plan).await
    }

    async fn delete(
        &self,
        client: &InfinityClient,
        state: SnmpNetworkManagementSystemModel,
    ) -> Result<(), ProviderError> {
        let id = required_resource_id(state.resource_id)?;
        delete_object::<SnmpNetworkManagementSystem>(client, WHAT, &id.to_string()).await
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        id: &str,
    ) -> Result<SnmpNetworkManagementSystemModel, ProviderError> {
        let id = parse_import_id(id)?;
        read(client, id, &SnmpNetworkManagementSystemModel::default())
            .await
            .map_err(|err| import_error(WHAT, id, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::mock_client;

    #[tokio::test]
    async fn test_community_is_not_returned_but_kept() {
        let (mock, client) = mock_client();
        let plan = SnmpNetworkManagementSystemModel {
            name: Some("nms".to_string()),
            address: Some("10.0.0.6".to_string()),
            snmp_trap_community: Some("private".to_string()),
            ..Default::default()
        };

        let state = SnmpNetworkManagementSystemResource
            .create(&client, plan)
            .await
            .unwrap();

        let fetched = client
            .config()
            .get::<SnmpNetworkManagementSystem>(1)
            .await
            .unwrap();
        assert_eq!(fetched.name, "nms");
        assert_eq!(
            mock.object("snmp_network_management_system", "1").unwrap()["snmp_trap_community"],
            "private"
        );
        assert_eq!(state.snmp_trap_community.as_deref(), Some("private"));
    }
}
