//! `pexip_infinity_system_location`: a group of nodes sharing network
//! services.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    create_object_id, delete_object, import_error, parse_import_id, read_object,
    required_resource_id, resource_schema, update_object, Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{SystemLocation, SystemLocationRequest};
use crate::infinity::InfinityClient;
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "system location";

/// State of a `pexip_infinity_system_location`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemLocationModel {
    /// Resource URI assigned by the node.
    pub id: Option<String>,
    /// Numeric id used in API paths.
    pub resource_id: Option<i64>,
    /// Unique name.
    pub name: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Resource URIs of `dns_server` objects.
    pub dns_servers: Option<Vec<String>>,
    /// Resource URIs of `ntp_server` objects.
    pub ntp_servers: Option<Vec<String>>,
    /// Resource URIs of `syslog_server` objects.
    pub syslog_servers: Option<Vec<String>>,
    /// Maximum transmission unit.
    pub mtu: Option<i64>,
}

/// Manages system locations.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLocationResource;

fn request(plan: &SystemLocationModel) -> SystemLocationRequest {
    SystemLocationRequest {
        name: plan.name.clone().unwrap_or_default(),
        description: plan.description.clone(),
        dns_servers: plan.dns_servers.clone(),
        ntp_servers: plan.ntp_servers.clone(),
        syslog_servers: plan.syslog_servers.clone(),
        mtu: plan.mtu,
    }
}

async fn read(client: &InfinityClient, id: i64) -> Result<SystemLocationModel, ProviderError> {
    let location: SystemLocation = read_object(client, WHAT, id).await?;
    Ok(SystemLocationModel {
        id: Some(location.resource_uri),
        resource_id: Some(id),
        name: Some(location.name),
        description: Some(location.description),
        dns_servers: Some(location.dns_servers),
        ntp_servers: Some(location.ntp_servers),
        syslog_servers: Some(location.syslog_servers),
        mtu: Some(location.mtu),
    })
}

#[async_trait]
impl Resource for SystemLocationResource {
    type Model = SystemLocationModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_system_location"
    }

    fn schema(&self) -> Schema {
        resource_schema("Manages a system location.")
            .with_attribute(
                "name",
                Attribute::required_string().with_validator(Validator::length(1, 250)),
            )
            .with_attribute(
                "description",
                Attribute::optional_computed_string().with_validator(Validator::max_length(250)),
            )
            .with_attribute(
                "dns_servers",
                Attribute::optional_computed_string_set()
                    .with_description("Resource URIs of the DNS servers used by this location"),
            )
            .with_attribute(
                "ntp_servers",
                Attribute::optional_computed_string_set()
                    .with_description("Resource URIs of the NTP servers used by this location"),
            )
            .with_attribute(
                "syslog_servers",
                Attribute::optional_computed_string_set()
                    .with_description("Resource URIs of the syslog servers used by this location"),
            )
            .with_attribute(
                "mtu",
                Attribute::optional_computed_int64()
                    .with_description("Maximum transmission unit")
                    .with_validator(Validator::range(512, 1500)),
            )
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: SystemLocationModel,
    ) -> Result<SystemLocationModel, ProviderError> {
        let id = create_object_id::<SystemLocation>(client, WHAT, &request(&plan)).await?;
        read(client, id).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        state: SystemLocationModel,
    ) -> Result<SystemLocationModel, ProviderError> {
        read(client, required_resource_id(state.resource_id)?).await
    }

    async fn update(
        &self,
        client: &InfinityClient,
        prior: SystemLocationModel,
        plan: SystemLocationModel,
    ) -> Result<SystemLocationModel, ProviderError> {
        let id = required_resource_id(prior.resource_id)?;
        update_object::<SystemLocation>(client, WHAT, id, &request(&plan)).await?;
        read(client, id).await
    }

    async fn delete(
        &self,
        client: &InfinityClient,
        state: SystemLocationModel,
    ) -> Result<(), ProviderError> {
        let id = required_resource_id(state.resource_id)?;
        delete_object::<SystemLocation>(client, WHAT, &id.to_string()).await
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        id: &str,
    ) -> Result<SystemLocationModel, ProviderError> {
        let id = parse_import_id(id)?;
        read(client, id).await.map_err(|err| import_error(WHAT, id, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::mock_client;

    const DNS: &str = "/api/admin/configuration/v1/dns_server/1/";
    const NTP: &str = "/api/admin/configuration/v1/ntp_server/4/";

    #[tokio::test]
    async fn test_dns_servers_are_mapped_to_dns_servers() {
        let (_mock, client) = mock_client();
        let plan = SystemLocationModel {
            name: Some("Oslo".to_string()),
            dns_servers: Some(vec![DNS.to_string()]),
            ntp_servers: Some(vec![NTP.to_string()]),
            ..Default::default()
        };

        let state = SystemLocationResource.create(&client, plan).await.unwrap();
        assert_eq!(state.dns_servers, Some(vec![DNS.to_string()]));
        assert_eq!(state.ntp_servers, Some(vec![NTP.to_string()]));
        assert_eq!(state.syslog_servers, Some(vec![]));
    }
}
