//! `pexip_infinity_ntp_server`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    create_object_id, delete_object, import_error, parse_import_id, read_object,
    required_resource_id, resource_schema, update_object, Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{NtpServer, NtpServerRequest};
use crate::infinity::InfinityClient;
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "NTP server";

/// State of a `pexip_infinity_ntp_server`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NtpServerModel {
    /// Resource URI assigned by the node.
    pub id: Option<String>,
    /// Numeric id used in API paths.
    pub resource_id: Option<i64>,
    /// Hostname or IP address of the NTP server.
    pub address: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Symmetric authentication key. Write-only.
    pub key: Option<String>,
    /// Authentication key id.
    pub key_id: Option<i64>,
}

/// Manages NTP servers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NtpServerResource;

fn request(plan: &NtpServerModel) -> NtpServerRequest {
    NtpServerRequest {
        address: plan.address.clone().unwrap_or_default(),
        description: plan.description.clone(),
        key: plan.key.clone(),
        key_id: plan.key_id,
    }
}

async fn read(
    client: &InfinityClient,
    id: i64,
    known: &NtpServerModel,
) -> Result<NtpServerModel, ProviderError> {
    let server: NtpServer = read_object(client, WHAT, id).await?;
    Ok(NtpServerModel {
        id: Some(server.resource_uri),
        resource_id: Some(id),
        address: Some(server.address),
        description: Some(server.description),
        key: known.key.clone(),
        key_id: server.key_id,
    })
}

#[async_trait]
impl Resource for NtpServerResource {
    type Model = NtpServerModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_ntp_server"
    }

    fn schema(&self) -> Schema {
        resource_schema("Manages an NTP server used by the Infinity platform.")
            .with_attribute(
                "address",
                Attribute::required_string()
                    .with_description("Hostname or IP address of the NTP server")
                    .with_validator(Validator::length(1, 255)),
            )
            .with_attribute(
                "description",
                Attribute::optional_computed_string().with_validator(Validator::max_length(250)),
            )
            .with_attribute(
                "key",
                Attribute::optional_string()
                    .sensitive()
                    .with_description("Authentication key, never returned by the API"),
            )
            .with_attribute(
                "key_id",
                Attribute::optional_int64()
                    .with_description("Authentication key id")
                    .with_validator(Validator::range(1, 65535)),
            )
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: NtpServerModel,
    ) -> Result<NtpServerModel, ProviderError> {
        let id = create_object_id::<NtpServer>(client, WHAT, &request(&plan)).await?;
        read(client, id, &plan).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        state: NtpServerModel,
    ) -> Result<NtpServerModel, ProviderError> {
        read(client, required_resource_id(state.resource_id)?, &state).await
    }

    async fn update(
        &self,
        client: &InfinityClient,
        prior: NtpServerModel,
        plan: NtpServerModel,
    ) -> Result<NtpServerModel, ProviderError> {
        let id = required_resource_id(prior.resource_id)?;
        update_object::<NtpServer>(client, WHAT, id, &request(&plan)).await?;
        read(client, id, &plan).await
    }

    async fn delete(
        &self,
        client: &InfinityClient,
        state: NtpServerModel,
    ) -> Result<(), ProviderError> {
        let id = required_resource_id(state.resource_id)?;
        delete_object::<NtpServer>(client, WHAT, &id.to_string()).await
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        id: &str,
    ) -> Result<NtpServerModel, ProviderError> {
        let id = parse_import_id(id)?;
        read(client, id, &NtpServerModel::default())
            .await
            .map_err(|err| import_error(WHAT, id, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::mock_client;

    #[tokio::test]
    async fn test_key_is_kept_from_plan() {
        let (mock, client) = mock_client();
        let plan = NtpServerModel {
            address: Some("time.example.com".to_string()),
            key: Some("s3cret".to_string()),
            key_id: Some(7),
            ..Default::default()
        };

        let state = NtpServerResource.create(&client, plan).await.unwrap();
        assert_eq!(state.key.as_deref(), Some("s3cret"));
        assert_eq!(state.key_id, Some(7));
        assert_eq!(mock.object("ntp_server", "1").unwrap()["key"], "s3cret");

        let refreshed = NtpServerResource.read(&client, state.clone()).await.unwrap();
        assert_eq!(refreshed, state);
    }
}
