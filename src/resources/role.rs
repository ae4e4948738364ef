//! `pexip_infinity_role`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    create_object_id, delete_object, import_error, parse_import_id, read_object,
    required_resource_id, resource_schema, update_object, Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{Role, RoleRequest};
use crate::infinity::InfinityClient;
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "role";

/// State of a `pexip_infinity_role`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleModel {
    /// Resource URI assigned by the node.
    pub id: Option<String>,
    /// Numeric id used in API paths.
    pub resource_id: Option<i64>,
    /// Unique name.
    pub name: Option<String>,
    /// Resource URIs of `permission` objects.
    pub permissions: Option<Vec<String>>,
}

/// Manages administrator roles.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleResource;

fn request(plan: &RoleModel) -> RoleRequest {
    RoleRequest {
        name: plan.name.clone().unwrap_or_default(),
        permissions: plan.permissions.clone(),
    }
}

async fn read(client: &InfinityClient, id: i64) -> Result<RoleModel, ProviderError> {
    let role: Role = read_object(client, WHAT, id).await?;
    Ok(RoleModel {
        id: Some(role.resource_uri),
        resource_id: Some(id),
        name: Some(role.name),
        permissions: Some(role.permissions),
    })
}

#[async_trait]
impl Resource for RoleResource {
    type Model = RoleModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_role"
    }

    fn schema(&self) -> Schema {
        resource_schema("Manages an administrator role.")
            .with_attribute(
                "name",
                Attribute::required_string().with_validator(Validator::length(1, 250)),
            )
            .with_attribute(
                "permissions",
                Attribute::optional_computed_string_set()
                    .with_description("Resource URIs of the permissions granted by this role"),
            )
    }

    async fn create(&self, client: &InfinityClient, plan: RoleModel) -> Result<RoleModel, ProviderError> {
        let id = create_object_id::<Role>(client, WHAT, &request(&plan)).await?;
        read(client, id).await
    }

    async fn read(&self, client: &InfinityClient, state: RoleModel) -> Result<RoleModel, ProviderError> {
        read(client, required_resource_id(state.resource_id)?).await
    }

    async fn update(
        &self,
        client: &InfinityClient,
        prior: RoleModel,
        plan: RoleModel,
    ) -> Result<RoleModel, ProviderError> {
        let id = required_resource_id(prior.resource_id)?;
        update_object::<Role>(client, WHAT, id, &request(&plan)).await?;
        read(client, id).await
    }

    async fn delete(&self, client: &InfinityClient, state: RoleModel) -> Result<(), ProviderError> {
        let id = required_resource_id(state.resource_id)?;
        delete_object::<Role>(client, WHAT, &id.to_string()).await
    }

    async fn import_state(&self, client: &InfinityClient, id: &str) -> Result<RoleModel, ProviderError> {
        let id = parse_import_id(id)?;
        read(client, id).await.map_err(|err| import_error(WHAT, id, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::mock_client;

    #[tokio::test]
    async fn test_permissions_round_trip() {
        let (_mock, client) = mock_client();
        let permissions = vec![
            "/api/admin/configuration/v1/permission/1/".to_string(),
            "/api/admin/configuration/v1/permission/9/".to_string(),
        ];
        let plan = RoleModel {
            name: Some("ops".to_string()),
            permissions: Some(permissions.clone()),
            ..Default::default()
        };

        let state = RoleResource.create(&client, plan).await.unwrap();
        assert_eq!(state.permissions, Some(permissions));
    }
}
