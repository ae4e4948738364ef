//! `pexip_infinity_ssh_authorized_key`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    create_object_id, delete_object, import_error, parse_import_id, read_object,
    required_resource_id, resource_schema, update_object, Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{SshAuthorizedKey, SshAuthorizedKeyRequest};
use crate::infinity::InfinityClient;
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "SSH authorized key";

/// Key algorithms the platform accepts.
const KEY_TYPES: [&str; 7] = [
    "ssh-rsa",
    "ssh-dss",
    "ssh-ed25519",
    "ecdsa-sha2-nistp256",
    "ecdsa-sha2-nistp384",
    "ecdsa-sha2-nistp521",
    "sk-ssh-ed25519@openssh.com",
];

/// State of a `pexip_infinity_ssh_authorized_key`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SshAuthorizedKeyModel {
    /// Resource URI assigned by the node.
    pub id: Option<String>,
    /// Numeric id used in API paths.
    pub resource_id: Option<i64>,
    /// Key algorithm.
    pub keytype: Option<String>,
    /// Base64 encoded public key.
    pub key: Option<String>,
    /// Key comment.
    pub comment: Option<String>,
    /// Resource URIs of the nodes the key applies to.
    pub nodes: Option<Vec<String>>,
}

/// Manages SSH keys authorized on the nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SshAuthorizedKeyResource;

fn request(plan: &SshAuthorizedKeyModel) -> SshAuthorizedKeyRequest {
    SshAuthorizedKeyRequest {
        keytype: plan.keytype.clone().unwrap_or_default(),
        key: plan.key.clone().unwrap_or_default(),
        comment: plan.comment.clone(),
        nodes: plan.nodes.clone(),
    }
}

async fn read(client: &InfinityClient, id: i64) -> Result<SshAuthorizedKeyModel, ProviderError> {
    let key: SshAuthorizedKey = read_object(client, WHAT, id).await?;
    Ok(SshAuthorizedKeyModel {
        id: Some(key.resource_uri),
        resource_id: Some(id),
        keytype: Some(key.keytype),
        key: Some(key.key),
        comment: Some(key.comment),
        nodes: Some(key.nodes),
    })
}

#[async_trait]
impl Resource for SshAuthorizedKeyResource {
    type Model = SshAuthorizedKeyModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_ssh_authorized_key"
    }

    fn schema(&self) -> Schema {
        resource_schema("Manages an SSH public key authorized for administrative access.")
            .with_attribute(
                "keytype",
                Attribute::required_string().with_validator(Validator::one_of(KEY_TYPES)),
            )
            .with_attribute(
                "key",
                Attribute::required_string()
                    .with_description("Base64 encoded public key")
                    .with_validator(Validator::length(1, 8192)),
            )
            .with_attribute(
                "comment",
                Attribute::optional_computed_string().with_validator(Validator::max_length(250)),
            )
            .with_attribute(
                "nodes",
                Attribute::optional_computed_string_set()
                    .with_description("Resource URIs of the nodes the key applies to"),
            )
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: SshAuthorizedKeyModel,
    ) -> Result<SshAuthorizedKeyModel, ProviderError> {
        let id = create_object_id::<SshAuthorizedKey>(client, WHAT, &request(&plan)).await?;
        read(client, id).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        state: SshAuthorizedKeyModel,
    ) -> Result<SshAuthorizedKeyModel, ProviderError> {
        read(client, required_resource_id(state.resource_id)?).await
    }

    async fn update(
        &self,
        client: &InfinityClient,
        prior: SshAuthorizedKeyModel,
        plan: SshAuthorizedKeyModel,
    ) -> Result<SshAuthorizedKeyModel, ProviderError> {
        let id = required_resource_id(prior.resource_id)?;
        update_object::<SshAuthorizedKey>(client, WHAT, id, &request(&plan)).await?;
        read(client, id).await
    }

    async fn delete(
        &self,
        client: &InfinityClient,
        state: SshAuthorizedKeyModel,
    ) -> Result<(), ProviderError> {
        let id = required_resource_id(state.resource_id)?;
        delete_object::<SshAuthorizedKey>(client, WHAT, &id.to_string()).await
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        id: &str,
    ) -> Result<SshAuthorizedKeyModel, ProviderError> {
        let id = parse_import_id(id)?;
        read(client, id).await.map_err(|err| import_error(WHAT, id, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::is_valid;
    use serde_json::json;

    #[test]
    fn test_keytype() {
        let schema = SshAuthorizedKeyResource.schema();
        assert!(is_valid(&schema, &json!({"keytype": "ssh-rsa", "key": "AAAAB3Nza"})));
        assert!(!is_valid(&schema, &json!({"keytype": "rsa", "key": "AAAAB3Nza"})));
    }
}
