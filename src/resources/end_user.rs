//! `pexip_infinity_end_user`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    create_object_id, delete_object, import_error, parse_import_id, read_object,
    required_resource_id, resource_schema, update_object, Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{EndUser, EndUserRequest};
use crate::infinity::InfinityClient;
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "end user";

/// State of a `pexip_infinity_end_user`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EndUserModel {
    /// Resource URI assigned by the node.
    pub id: Option<String>,
    /// Numeric id used in API paths.
    pub resource_id: Option<i64>,
    /// Primary email address, unique per user.
    pub primary_email_address: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// Telephone number.
    pub telephone_number: Option<String>,
    /// Mobile number.
    pub mobile_number: Option<String>,
    /// Job title.
    pub title: Option<String>,
    /// Department.
    pub department: Option<String>,
    /// URL of the user's avatar image.
    pub avatar_url: Option<String>,
    /// Directory object id of the user.
    pub user_oid: Option<String>,
}

/// Manages end users.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndUserResource;

fn request(plan: &EndUserModel) -> EndUserRequest {
    EndUserRequest {
        primary_email_address: plan.primary_email_address.clone().unwrap_or_default(),
        first_name: plan.first_name.clone(),
        last_name: plan.last_name.clone(),
        display_name: plan.display_name.clone(),
        telephone_number: plan.telephone_number.clone(),
        mobile_number: plan.mobile_number.clone(),
        title: plan.title.clone(),
        department: plan.department.clone(),
        avatar_url: plan.avatar_url.clone(),
        user_oid: plan.user_oid.clone(),
    }
}

async fn read(client: &InfinityClient, id: i64) -> Result<EndUserModel, ProviderError> {
    let user: EndUser = read_object(client, WHAT, id).await?;
    Ok(EndUserModel {
        id: Some(user.resource_uri),
        resource_id: Some(id),
        primary_email_address: Some(user.primary_email_address),
        first_name: Some(user.first_name),
        last_name: Some(user.last_name),
        display_name: Some(user.display_name),
        telephone_number: Some(user.telephone_number),
        mobile_number: Some(user.mobile_number),
        title: Some(user.title),
        department: Some(user.department),
        avatar_url: Some(user.avatar_url),
        user_oid: user.user_oid,
    })
}

fn optional_field(max: usize) -> Attribute {
    Attribute::optional_computed_string().with_validator(Validator::max_length(max))
}

#[async_trait]
impl Resource for EndUserResource {
    type Model = EndUserModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_end_user"
    }

    fn schema(&self) -> Schema {
        resource_schema("Manages an end user of the conferencing platform.")
            .with_attribute(
                "primary_email_address",
                Attribute::required_string()
                    .with_description("Primary email address, unique per user")
                    .with_validator(Validator::length(3, 100)),
            )
            .with_attribute("first_name", optional_field(250))
            .with_attribute("last_name", optional_field(250))
            .with_attribute("display_name", optional_field(250))
            .with_attribute("telephone_number", optional_field(100))
            .with_attribute("mobile_number", optional_field(100))
            .with_attribute("title", optional_field(128))
            .with_attribute("department", optional_field(100))
            .with_attribute(
                "avatar_url",
                optional_field(255).with_description("URL of the user's avatar image"),
            )
            .with_attribute(
                "user_oid",
                Attribute::optional_string().with_description("Directory object id of the user"),
            )
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: EndUserModel,
    ) -> Result<EndUserModel, ProviderError> {
        let id = create_object_id::<EndUser>(client, WHAT, &request(&plan)).await?;
        read(client, id).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        state: EndUserModel,
    ) -> Result<EndUserModel, ProviderError> {
        read(client, required_resource_id(state.resource_id)?).await
    }

    async fn update(
        &self,
        client: &InfinityClient,
        prior: EndUserModel,
        plan: EndUserModel,
    ) -> Result<EndUserModel, ProviderError> {
        let id = required_resource_id(prior.resource_id)?;
        update_object::<EndUser>(client, WHAT, id, &request(&plan)).await?;
        read(client, id).await
    }

    async fn delete(&self, client: &InfinityClient, state: EndUserModel) -> Result<(), ProviderError> {
        let id = required_resource_id(state.resource_id)?;
        delete_object::<EndUser>(client, WHAT, &id.to_string()).await
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        id: &str,
    ) -> Result<EndUserModel, ProviderError> {
        let id = parse_import_id(id)?;
        read(client, id).await.map_err(|err| import_error(WHAT, id, err))
    }
}
