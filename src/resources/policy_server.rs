//! `pexip_infinity_policy_server`: external policy lookups.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    create_object_id, delete_object, import_error, parse_import_id, read_object,
    required_resource_id, resource_schema, update_object, Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{PolicyServer, PolicyServerRequest};
use crate::infinity::InfinityClient;
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "policy server";

/// State of a `pexip_infinity_policy_server`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyServerModel {
    /// Resource URI assigned by the node.
    pub id: Option<String>,
    /// Numeric id used in API paths.
    pub resource_id: Option<i64>,
    /// Unique name.
    pub name: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Base URL of the policy server.
    pub url: Option<String>,
    /// Username for authentication.
    pub username: Option<String>,
    /// Write-only.
    pub password: Option<String>,
    /// Query the server for services.
    pub enable_service_lookup: Option<bool>,
    /// Query the server for participant policy.
    pub enable_participant_lookup: Option<bool>,
    /// Query the server for registrations.
    pub enable_registration_lookup: Option<bool>,
    /// Query the server for directory lookups.
    pub enable_directory_lookup: Option<bool>,
    /// Query the server for avatars.
    pub enable_avatar_lookup: Option<bool>,
}

/// Manages external policy servers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyServerResource;

fn request(plan: &PolicyServerModel) -> PolicyServerRequest {
    PolicyServerRequest {
        name: plan.name.clone().unwrap_or_default(),
        description: plan.description.clone(),
        url: plan.url.clone(),
        username: plan.username.clone(),
        password: plan.password.clone(),
        enable_service_lookup: plan.enable_service_lookup,
        enable_participant_lookup: plan.enable_participant_lookup,
        enable_registration_lookup: plan.enable_registration_lookup,
        enable_directory_lookup: plan.enable_directory_lookup,
        enable_avatar_lookup: plan.enable_avatar_lookup,
    }
}

async fn read(
    client: &InfinityClient,
    id: i64,
    known: &PolicyServerModel,
) -> Result<PolicyServerModel, ProviderError> {
    let server: PolicyServer = read_object(client, WHAT, id).await?;
    Ok(PolicyServerModel {
        id: Some(server.resource_uri),
        resource_id: Some(id),
        name: Some(server.name),
        description: Some(server.description),
        url: Some(server.url),
        username: Some(server.username),
        password: known.password.clone(),
        enable_service_lookup: Some(server.enable_service_lookup),
        enable_participant_lookup: Some(server.enable_participant_lookup),
        enable_registration_lookup: Some(server.enable_registration_lookup),
        enable_directory_lookup: Some(server.enable_directory_lookup),
        enable_avatar_lookup: Some(server.enable_avatar_lookup),
    })
}

#[async_trait]
impl Resource for PolicyServerResource {
    type Model = PolicyServerModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_policy_server"
    }

    fn schema(&self) -> Schema {
        resource_schema("Manages an external policy server.")
            .with_attribute(
                "name",
                Attribute::required_string().with_validator(Validator::length(1, 250)),
            )
            .with_attribute(
                "description",
                Attribute::optional_computed_string().with_validator(Validator::max_length(250)),
            )
            .with_attribute(
                "url",
                Attribute::optional_computed_string()
                    .with_description("Base URL of the policy server")
                    .with_validator(Validator::Url),
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
            .with_attribute("enable_service_lookup", Attribute::optional_computed_bool())
            .with_attribute("enable_participant_lookup", Attribute::optional_computed_bool())
            .with_attribute("enable_registration_lookup", Attribute::optional_computed_bool())
            .with_attribute("enable_directory_lookup", Attribute::optional_computed_bool())
            .with_attribute("enable_avatar_lookup", Attribute::optional_computed_bool())
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: PolicyServerModel,
    ) -> Result<PolicyServerModel, ProviderError> {
        let id = create_object_id::<PolicyServer>(client, WHAT, &request(&plan)).await?;
        read(client, id, &plan).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        state: PolicyServerModel,
    ) -> Result<PolicyServerModel, ProviderError> {
        read(client, required_resource_id(state.resource_id)?, &state).await
    }

    async fn update(
        &self,
        client: &InfinityClient,
        prior: PolicyServerModel,
        plan: PolicyServerModel,
    ) -> Result<PolicyServerModel, ProviderError> {
        let id = required_resource_id(prior.resource_id)?;
        update_object::<PolicyServer>(client, WHAT, id, &request(&plan)).await?;
        read(client, id, &plan).await
    }

    async fn delete(
        &self,
        client: &InfinityClient,
        state: PolicyServerModel,
    ) -> Result<(), ProviderError> {
        let id = required_resource_id(state.resource_id)?;
        delete_object::<PolicyServer>(client, WHAT, &id.to_string()).await
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        id: &str,
    ) -> Result<PolicyServerModel, ProviderError> {
        let id = parse_import_id(id)?;
        read(client, id, &PolicyServerModel::default())
            .await
            .map_err(|err| import_error(WHAT, id, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;
    use serde_json::json;

    #[test]
    fn test_url_must_be_http() {
        let schema = PolicyServerResource.schema();
        for bad in ["policy.example.com", "ftp://policy.example.com"] {
            let diagnostics = validate(&schema, &json!({"name": "p", "url": bad}));
            assert_eq!(diagnostics.len(), 1, "{}", bad);
            assert_eq!(diagnostics[0].attribute.as_deref(), Some("url"));
        }
    }
}
