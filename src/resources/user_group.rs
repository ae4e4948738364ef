//! `pexip_infinity_user_group`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    create_object_id, delete_object, import_error, parse_import_id, read_object,
    required_resource_id, resource_schema, update_object, Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{UserGroup, UserGroupRequest};
use crate::infinity::InfinityClient;
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "user group";

/// State of a `pexip_infinity_user_group`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserGroupModel {
    /// Resource URI assigned by the node.
    pub id: Option<String>,
    /// Numeric id used in API paths.
    pub resource_id: Option<i64>,
    /// Unique name.
    pub name: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Resource URIs of `end_user` members.
    pub users: Option<Vec<String>>,
}

/// Manages groups of end users.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserGroupResource;

fn request(plan: &UserGroupModel) -> UserGroupRequest {
    UserGroupRequest {
        name: plan.name.clone().unwrap_or_default(),
        description: plan.description.clone(),
        users: plan.users.clone(),
    }
}

async fn read(client: &InfinityClient, id: i64) -> Result<UserGroupModel, ProviderError> {
    let group: UserGroup = read_object(client, WHAT, id).await?;
    Ok(UserGroupModel {
        id: Some(group.resource_uri),
        resource_id: Some(id),
        name: Some(group.name),
        description: Some(group.description),
        users: Some(group.users),
    })
}

#[async_trait]
impl Resource for UserGroupResource {
    type Model = UserGroupModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_user_group"
    }

    fn schema(&self) -> Schema {
        resource_schema("Manages a group of end users.")
            .with_attribute(
                "name",
                Attribute::required_string().with_validator(Validator::length(1, 250)),
            )
            .with_attribute(
                "description",
                Attribute::optional_computed_string().with_validator(Validator::max_length(250)),
            )
            .with_attribute(
                "users",
                Attribute::optional_computed_string_set()
                    .with_description("Resource URIs of the member end users"),
            )
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: UserGroupModel,
    ) -> Result<UserGroupModel, ProviderError> {
        let id = create_object_id::<UserGroup>(client, WHAT, &request(&plan)).await?;
        read(client, id).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        state: UserGroupModel,
    ) -> Result<UserGroupModel, ProviderError> {
        read(client, required_resource_id(state.resource_id)?).await
    }

    async fn update(
        &self,
        client: &InfinityClient,
        prior: UserGroupModel,
        plan: UserGroupModel,
    ) -> Result<UserGroupModel, ProviderError> {
        let id = required_resource_id(prior.resource_id)?;
        update_object::<UserGroup>(client, WHAT, id, &request(&plan)).await?;
        read(client, id).await
    }

    async fn delete(
        &self,
        client: &InfinityClient,
        state: UserGroupModel,
    ) -> Result<(), ProviderError> {
        let id = required_resource_id(state.resource_id)?;
        delete_object::<UserGroup>(client, WHAT, &id.to_string()).await
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        id: &str,
    ) -> Result<UserGroupModel, ProviderError> {
        let id = parse_import_id(id)?;
        read(client, id).await.map_err(|err| import_error(WHAT, id, err))
    }
}
