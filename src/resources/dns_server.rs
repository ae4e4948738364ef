//! `pexip_infinity_dns_server`: a DNS server the platform may use.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    create_object_id, delete_object, import_error, parse_import_id, read_object,
    required_resource_id, resource_schema, update_object, Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{DnsServer, DnsServerCreateRequest, DnsServerUpdateRequest};
use crate::infinity::InfinityClient;
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "DNS server";

/// State of a `pexip_infinity_dns_server`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsServerModel {
    /// Resource URI.
    pub id: Option<String>,
    /// Numeric object id.
    pub resource_id: Option<i64>,
    /// IPv4 or IPv6 address.
    pub address: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
}

impl DnsServerModel {
    fn from_api(server: DnsServer, resource_id: i64) -> Self {
        Self {
            id: Some(server.resource_uri),
            resource_id: Some(resource_id),
            address: Some(server.address),
            description: Some(server.description),
        }
    }
}

/// Manages DNS servers.
#[derive(Debug, Clone, Copy, Default)]
pub struct DnsServerResource;

async fn read(client: &InfinityClient, id: i64) -> Result<DnsServerModel, ProviderError> {
    let server: DnsServer = read_object(client, WHAT, id).await?;
    Ok(DnsServerModel::from_api(server, id))
}

#[async_trait]
impl Resource for DnsServerResource {
    type Model = DnsServerModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_dns_server"
    }

    fn schema(&self) -> Schema {
        resource_schema("Manages a DNS server used by the Infinity platform.")
            .with_attribute(
                "address",
                Attribute::required_string()
                    .with_description("IPv4 or IPv6 address of the DNS server")
                    .with_validator(Validator::IpAddress),
            )
            .with_attribute(
                "description",
                Attribute::optional_computed_string()
                    .with_description("Description of the DNS server")
                    .with_validator(Validator::max_length(250)),
            )
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: DnsServerModel,
    ) -> Result<DnsServerModel, ProviderError> {
        let request = DnsServerCreateRequest {
            address: plan.address.unwrap_or_default(),
            description: plan.description,
        };
        let id = create_object_id::<DnsServer>(client, WHAT, &request).await?;
        read(client, id).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        state: DnsServerModel,
    ) -> Result<DnsServerModel, ProviderError> {
        read(client, required_resource_id(state.resource_id)?).await
    }

    async fn update(
        &self,
        client: &InfinityClient,
        prior: DnsServerModel,
        plan: DnsServerModel,
    ) -> Result<DnsServerModel, ProviderError> {
        let id = required_resource_id(prior.resource_id)?;
        let request = DnsServerUpdateRequest {
            address: plan.address.unwrap_or_default(),
            description: plan.description,
        };
        update_object::<DnsServer>(client, WHAT, id, &request).await?;
        read(client, id).await
    }

    async fn delete(
        &self,
        client: &InfinityClient,
        state: DnsServerModel,
    ) -> Result<(), ProviderError> {
        let id = required_resource_id(state.resource_id)?;
        delete_object::<DnsServer>(client, WHAT, &id.to_string()).await
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        id: &str,
    ) -> Result<DnsServerModel, ProviderError> {
        let id = parse_import_id(id)?;
        read(client, id).await.map_err(|err| import_error(WHAT, id, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infinity::Method;
    use crate::resources::test_support::mock_client;

    fn plan(address: &str) -> DnsServerModel {
        DnsServerModel {
            address: Some(address.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_without_description_reads_empty_string() {
        let (mock, client) = mock_client();

        let state = DnsServerResource.create(&client, plan("1.1.1.1")).await.unwrap();

        assert_eq!(state.address.as_deref(), Some("1.1.1.1"));
        assert_eq!(state.description.as_deref(), Some(""));
        let stored = mock.object("dns_server", "1").unwrap();
        assert_eq!(state.id.as_deref(), stored["resource_uri"].as_str());
        assert_eq!(state.resource_id, Some(1));
    }

    #[tokio::test]
    async fn test_update_issues_single_put_with_new_address() {
        let (mock, client) = mock_client();
        let state = DnsServerResource.create(&client, plan("1.1.1.1")).await.unwrap();
        mock.clear_requests();

        let updated = DnsServerResource
            .update(
                &client,
                state.clone(),
                DnsServerModel {
                    address: Some("8.8.8.8".to_string()),
                    ..state
                },
            )
            .await
            .unwrap();

        let puts = mock.requests_for(Method::Put, "dns_server");
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].path, "dns_server/1/");
        assert_eq!(puts[0].body.as_ref().unwrap()["address"], "8.8.8.8");
        assert_eq!(mock.mutation_count(), 1);
        assert_eq!(updated.address.as_deref(), Some("8.8.8.8"));
    }

    #[tokio::test]
    async fn test_create_surfaces_api_error() {
        let (mock, client) = mock_client();
        mock.fail_next(Method::Post, "dns_server", 400, "address: Enter a valid IPv4 or IPv6 address.");

        let err = DnsServerResource.create(&client, plan("1.1.1.1")).await.unwrap_err();
        let diagnostic = err.to_diagnostic();
        assert_eq!(diagnostic.summary, "Error Creating Infinity DNS server");
        assert!(diagnostic.detail.unwrap().contains("Enter a valid"));
    }

    #[tokio::test]
    async fn test_import() {
        let (mock, client) = mock_client();
        mock.insert(
            "dns_server",
            serde_json::json!({"address": "9.9.9.9", "description": "quad9"}),
        );

        let state = DnsServerResource.import_state(&client, "1").await.unwrap();
        assert_eq!(state.description.as_deref(), Some("quad9"));

        assert!(DnsServerResource.import_state(&client, "abc").await.is_err());
        assert!(DnsServerResource.import_state(&client, "2").await.is_err());
    }
}
