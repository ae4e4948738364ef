//! `pexip_infinity_turn_server`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{
    create_object_id, delete_object, import_error, parse_import_id, read_object,
    required_resource_id, resource_schema, update_object, Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{TurnServer, TurnServerRequest};
use crate::infinity::InfinityClient;
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "TURN server";

/// State of a `pexip_infinity_turn_server`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnServerModel {
    /// Resource URI assigned by the node.
    pub id: Option<String>,
    /// Numeric id used in API paths.
    pub resource_id: Option<i64>,
    /// Unique name.
    pub name: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Host name or IP address.
    pub address: Option<String>,
    /// Port number.
    pub port: Option<i64>,
    /// TURN server type.
    pub server_type: Option<String>,
    /// Transport between the node and the server.
    pub transport_type: Option<String>,
    /// Username for authentication.
    pub username: Option<String>,
    /// Write-only.
    pub password: Option<String>,
    /// Shared secret for time-limited credentials. Write-only.
    pub secret_key: Option<String>,
}

/// Manages TURN media relays.
#[derive(Debug, Clone, Copy, Default)]
pub struct TurnServerResource;

fn request(plan: &TurnServerModel) -> TurnServerRequest {
    TurnServerRequest {
        name: plan.name.clone().unwrap_or_default(),
        address: plan.address.clone().unwrap_or_default(),
        description: plan.description.clone(),
        port: plan.port,
        server_type: plan.server_type.clone(),
        transport_type: plan.transport_type.clone(),
        username: plan.username.clone(),
        password: plan.password.clone(),
        secret_key: plan.secret_key.clone(),
    }
}

async fn read(
    client: &InfinityClient,
    id: i64,
    known: &TurnServerModel,
) -> Result<TurnServerModel, ProviderError> {
    let server: TurnServer = read_object(client, WHAT, id).await?;
    Ok(TurnServerModel {
        id: Some(server.resource_uri),
        resource_id: Some(id),
        name: Some(server.name),
        description: Some(server.description),
        address: Some(server.address),
        port: Some(server.port),
        server_type: Some(server.server_type),
        transport_type: Some(server.transport_type),
        username: Some(server.username),
        password: known.password.clone(),
        secret_key: known.secret_key.clone(),
    })
}

#[async_trait]
impl Resource for TurnServerResource {
    type Model = TurnServerModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_turn_server"
    }

    fn schema(&self) -> Schema {
        resource_schema("Manages a TURN server used to relay media.")
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
                Attribute::required_string().with_validator(Validator::length(1, 255)),
            )
            .with_attribute(
                "port",
                Attribute::optional_int64()
                    .with_default(json!(3478))
                    .with_validator(Validator::port()),
            )
            .with_attribute(
                "server_type",
                Attribute::optional_string()
                    .with_default(json!("namepsw"))
                    .with_validator(Validator::one_of(["namepsw", "coturn_shared"])),
            )
            .with_attribute(
                "transport_type",
                Attribute::optional_string()
                    .with_default(json!("udp"))
                    .with_validator(Validator::one_of(["udp", "tcp", "tls"])),
            )
            .with_attribute(
                "username",
                Attribute::optional_computed_string().with_validator(Validator::max_length(100)),
            )
            .with_attribute(
                "password",
                Attribute::optional_string()
                    .sensitive()
                    .with_validator(Validator::max_length(100)),
            )
            .with_attribute(
                "secret_key",
                Attribute::optional_string()
                    .sensitive()
                    .with_description("Shared secret, used with the coturn_shared server type"),
            )
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: TurnServerModel,
    ) -> Result<TurnServerModel, ProviderError> {
        let id = create_object_id::<TurnServer>(client, WHAT, &request(&plan)).await?;
        read(client, id, &plan).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        state: TurnServerModel,
    ) -> Result<TurnServerModel, ProviderError> {
        read(client, required_resource_id(state.resource_id)?, &state).await
    }

    async fn update(
        &self,
        client: &InfinityClient,
        prior: TurnServerModel,
        plan: TurnServerModel,
    ) -> Result<TurnServerModel, ProviderError> {
        let id = required_resource_id(prior.resource_id)?;
        update_object::<TurnServer>(client, WHAT, id, &request(&plan)).await?;
        read(client, id, &plan).await
    }

    async fn delete(
        &self,
        client: &InfinityClient,
        state: TurnServerModel,
    ) -> Result<(), ProviderError> {
        let id = required_resource_id(state.resource_id)?;
        delete_object::<TurnServer>(client, WHAT, &id.to_string()).await
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        id: &str,
    ) -> Result<TurnServerModel, ProviderError> {
        let id = parse_import_id(id)?;
        read(client, id, &TurnServerModel::default())
            .await
            .map_err(|err| import_error(WHAT, id, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::mock_client;

    #[tokio::test]
    async fn test_secrets_follow_the_plan_on_update() {
        let (mock, client) = mock_client();
        let plan = TurnServerModel {
            name: Some("turn".to_string()),
            address: Some("turn.example.com".to_string()),
            password: Some("old".to_string()),
            ..Default::default()
        };
        let state = TurnServerResource.create(&client, plan).await.unwrap();

        let planned = TurnServerModel {
            password: Some("new".to_string()),
            secret_key: Some("shared".to_string()),
            ..state.clone()
        };
        let updated = TurnServerResource.update(&client, state, planned).await.unwrap();

        assert_eq!(updated.password.as_deref(), Some("new"));
        assert_eq!(updated.secret_key.as_deref(), Some("shared"));
        assert_eq!(mock.object("turn_server", "1").unwrap()["password"], "new");
    }
}
