//! `pexip_infinity_sip_credential`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    create_object_id, delete_object, import_error, parse_import_id, read_object,
    required_resource_id, resource_schema, update_object, Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{SipCredential, SipCredentialRequest};
use crate::infinity::InfinityClient;
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "SIP credential";

/// State of a `pexip_infinity_sip_credential`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SipCredentialModel {
    /// Resource URI assigned by the node.
    pub id: Option<String>,
    /// Numeric id used in API paths.
    pub resource_id: Option<i64>,
    /// SIP realm.
    pub realm: Option<String>,
    /// Username for authentication.
    pub username: Option<String>,
    /// Password. Write-only.
    pub password: Option<String>,
}

/// Manages credentials used for outbound SIP authentication.
#[derive(Debug, Clone, Copy, Default)]
pub struct SipCredentialResource;

fn request(plan: &SipCredentialModel) -> SipCredentialRequest {
    SipCredentialRequest {
        realm: plan.realm.clone().unwrap_or_default(),
        username: plan.username.clone().unwrap_or_default(),
        password: plan.password.clone(),
    }
}

async fn read(
    client: &InfinityClient,
    id: i64,
    known: &SipCredentialModel,
) -> Result<SipCredentialModel, ProviderError> {
    let credential: SipCredential = read_object(client, WHAT, id).await?;
    Ok(SipCredentialModel {
        id: Some(credential.resource_uri),
        resource_id: Some(id),
        realm: Some(credential.realm),
        username: Some(credential.username),
        password: known.password.clone(),
    })
}

#[async_trait]
impl Resource for SipCredentialResource {
    type Model = SipCredentialModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_sip_credential"
    }

    fn schema(&self) -> Schema {
        resource_schema("Manages a SIP authentication credential.")
            .with_attribute(
                "realm",
                Attribute::required_string().with_validator(Validator::length(1, 250)),
            )
            .with_attribute(
                "username",
                Attribute::required_string().with_validator(Validator::length(1, 100)),
            )
            .with_attribute(
                "password",
                Attribute::required_string()
                    .sensitive()
                    .with_validator(Validator::length(1, 100)),
            )
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: SipCredentialModel,
    ) -> Result<SipCredentialModel, ProviderError> {
        let id = create_object_id::<SipCredential>(client, WHAT, &request(&plan)).await?;
        read(client, id, &plan).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        state: SipCredentialModel,
    ) -> Result<SipCredentialModel, ProviderError> {
        read(client, required_resource_id(state.resource_id)?, &state).await
    }

    async fn update(
        &self,
        client: &InfinityClient,
        prior: SipCredentialModel,
        plan: SipCredentialModel,
    ) -> Result<SipCredentialModel, ProviderError> {
        let id = required_resource_id(prior.resource_id)?;
        update_object::<SipCredential>(client, WHAT, id, &request(&plan)).await?;
        read(client, id, &plan).await
    }

    async fn delete(
        &self,
        client: &InfinityClient,
        state: SipCredentialModel,
    ) -> Result<(), ProviderError> {
        let id = required_resource_id(state.resource_id)?;
        delete_object::<SipCredential>(client, WHAT, &id.to_string()).await
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        id: &str,
    ) -> Result<SipCredentialModel, ProviderError> {
        let id = parse_import_id(id)?;
        read(client, id, &SipCredentialModel::default())
            .await
            .map_err(|err| import_error(WHAT, id, err))
    }
}
