//! `pexip_infinity_gms_access_token`: Google Meet interoperability token.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    create_object_id, delete_object, import_error, parse_import_id, read_object,
    required_resource_id, resource_schema, update_object, Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{GmsAccessToken, GmsAccessTokenRequest};
use crate::infinity::InfinityClient;
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "GMS access token";

/// State of a `pexip_infinity_gms_access_token`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GmsAccessTokenModel {
    /// Resource URI assigned by the node.
    pub id: Option<String>,
    /// Numeric id used in API paths.
    pub resource_id: Option<i64>,
    /// Name of the token.
    pub name: Option<String>,
    /// Write-only.
    pub token: Option<String>,
}

/// Manages Google Meet access tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct GmsAccessTokenResource;

fn request(plan: &GmsAccessTokenModel) -> GmsAccessTokenRequest {
    GmsAccessTokenRequest {
        name: plan.name.clone().unwrap_or_default(),
        token: plan.token.clone(),
    }
}

async fn read(
    client: &InfinityClient,
    id: i64,
    known: &GmsAccessTokenModel,
) -> Result<GmsAccessTokenModel, ProviderError> {
    let token: GmsAccessToken = read_object(client, WHAT, id).await?;
    Ok(GmsAccessTokenModel {
        id: Some(token.resource_uri),
        resource_id: Some(id),
        name: Some(token.name),
        token: known.token.clone(),
    })
}

#[async_trait]
impl Resource for GmsAccessTokenResource {
    type Model = GmsAccessTokenModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_gms_access_token"
    }

    fn schema(&self) -> Schema {
        resource_schema("Manages a Google Meet interoperability access token.")
            .with_attribute(
                "name",
                Attribute::required_string().with_validator(Validator::length(1, 250)),
            )
            .with_attribute(
                "token",
                Attribute::required_string()
                    .sensitive()
                    .with_description("Access token issued by Google"),
            )
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: GmsAccessTokenModel,
    ) -> Result<GmsAccessTokenModel, ProviderError> {
        let id = create_object_id::<GmsAccessToken>(client, WHAT, &request(&plan)).await?;
        read(client, id, &plan).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        state: GmsAccessTokenModel,
    ) -> Result<GmsAccessTokenModel, ProviderError> {
        read(client, required_resource_id(state.resource_id)?, &state).await
    }

    async fn update(
        &self,
        client: &InfinityClient,
        prior: GmsAccessTokenModel,
        plan: GmsAccessTokenModel,
    ) -> Result<GmsAccessTokenModel, ProviderError> {
        let id = required_resource_id(prior.resource_id)?;
        update_object::<GmsAccessToken>(client, WHAT, id, &request(&plan)).await?;
        read(client, id, &plan).await
    }

    async fn delete(
        &self,
        client: &InfinityClient,
        state: GmsAccessTokenModel,
    ) -> Result<(), ProviderError> {
        let id = required_resource_id(state.resource_id)?;
        delete_object::<GmsAccessToken>(client, WHAT, &id.to_string()).await
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        id: &str,
    ) -> Result<GmsAccessTokenModel, ProviderError> {
        let id = parse_import_id(id)?;
        read(client, id, &GmsAccessTokenModel::default())
            .await
            .map_err(|err| import_error(WHAT, id, err))
    }
}
