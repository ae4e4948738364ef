//! `pexip_infinity_device`: an endpoint allowed to register with the
//! platform.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    create_object_id, delete_object, import_error, parse_import_id, read_object,
    required_resource_id, resource_schema, update_object, Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{Device, DeviceRequest};
use crate::infinity::InfinityClient;
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "device";

/// State of a `pexip_infinity_device`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceModel {
    /// Resource URI assigned by the node.
    pub id: Option<String>,
    /// Numeric id used in API paths.
    pub resource_id: Option<i64>,
    /// Alias the device registers with.
    pub alias: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Username for authentication.
    pub username: Option<String>,
    /// Registration password. Write-only.
    pub password: Option<String>,
    /// Email address of the owner.
    pub primary_owner_email_address: Option<String>,
    /// Allow SIP.
    pub enable_sip: Option<bool>,
    /// Allow H.323.
    pub enable_h323: Option<bool>,
    /// Allow app registration without SSO.
    pub enable_infinity_connect_non_sso: Option<bool>,
    /// Allow app registration with SSO.
    pub enable_infinity_connect_sso: Option<bool>,
    /// Allow standard SSO registration.
    pub enable_standard_sso: Option<bool>,
    /// Free-text tag for grouping.
    pub tag: Option<String>,
}

/// Manages registered devices.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceResource;

fn request(plan: &DeviceModel) -> DeviceRequest {
    DeviceRequest {
        alias: plan.alias.clone().unwrap_or_default(),
        description: plan.description.clone(),
        username: plan.username.clone(),
        password: plan.password.clone(),
        primary_owner_email_address: plan.primary_owner_email_address.clone(),
        enable_sip: plan.enable_sip,
        enable_h323: plan.enable_h323,
        enable_infinity_connect_non_sso: plan.enable_infinity_connect_non_sso,
        enable_infinity_connect_sso: plan.enable_infinity_connect_sso,
        enable_standard_sso: plan.enable_standard_sso,
        tag: plan.tag.clone(),
    }
}

async fn read(
    client: &InfinityClient,
    id: i64,
    known: &DeviceModel,
) -> Result<DeviceModel, ProviderError> {
    let device: Device = read_object(client, WHAT, id).await?;
    Ok(DeviceModel {
        id: Some(device.resource_uri),
        resource_id: Some(id),
        alias: Some(device.alias),
        description: Some(device.description),
        username: Some(device.username),
        password: known.password.clone(),
        primary_owner_email_address: Some(device.primary_owner_email_address),
        enable_sip: Some(device.enable_sip),
        enable_h323: Some(device.enable_h323),
        enable_infinity_connect_non_sso: Some(device.enable_infinity_connect_non_sso),
        enable_infinity_connect_sso: Some(device.enable_infinity_connect_sso),
        enable_standard_sso: Some(device.enable_standard_sso),
        tag: Some(device.tag),
    })
}

#[async_trait]
impl Resource for DeviceResource {
    type Model = DeviceModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_device"
    }

    fn schema(&self) -> Schema {
        resource_schema("Manages a device permitted to register.")
            .with_attribute(
                "alias",
                Attribute::required_string()
                    .with_description("Alias the device registers with")
                    .with_validator(Validator::length(1, 250)),
            )
            .with_attribute(
                "description",
                Attribute::optional_computed_string().with_validator(Validator::max_length(250)),
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
                "primary_owner_email_address",
                Attribute::optional_computed_string().with_validator(Validator::max_length(100)),
            )
            .with_attribute("enable_sip", Attribute::optional_computed_bool())
            .with_attribute("enable_h323", Attribute::optional_computed_bool())
            .with_attribute(
                "enable_infinity_connect_non_sso",
                Attribute::optional_computed_bool(),
            )
            .with_attribute("enable_infinity_connect_sso", Attribute::optional_computed_bool())
            .with_attribute("enable_standard_sso", Attribute::optional_computed_bool())
            .with_attribute(
                "tag",
                Attribute::optional_computed_string().with_validator(Validator::max_length(250)),
            )
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: DeviceModel,
    ) -> Result<DeviceModel, ProviderError> {
        let id = create_object_id::<Device>(client, WHAT, &request(&plan)).await?;
        read(client, id, &plan).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        state: DeviceModel,
    ) -> Result<DeviceModel, ProviderError> {
        read(client, required_resource_id(state.resource_id)?, &state).await
    }

    async fn update(
        &self,
        client: &InfinityClient,
        prior: DeviceModel,
        plan: DeviceModel,
    ) -> Result<DeviceModel, ProviderError> {
        let id = required_resource_id(prior.resource_id)?;
        update_object::<Device>(client, WHAT, id, &request(&plan)).await?;
        read(client, id, &plan).await
    }

    async fn delete(&self, client: &InfinityClient, state: DeviceModel) -> Result<(), ProviderError> {
        let id = required_resource_id(state.resource_id)?;
        delete_object::<Device>(client, WHAT, &id.to_string()).await
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        id: &str,
    ) -> Result<DeviceModel, ProviderError> {
        let id = parse_import_id(id)?;
        read(client, id, &DeviceModel::default())
            .await
            .map_err(|err| import_error(WHAT, id, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infinity::Method;
    use crate::resources::test_support::mock_client;

    #[tokio::test]
    async fn test_unset_password_is_not_sent() {
        let (mock, client) = mock_client();
        let plan = DeviceModel {
            alias: Some("room1@example.com".to_string()),
            enable_sip: Some(true),
            ..Default::default()
        };

        let state = DeviceResource.create(&client, plan).await.unwrap();
        assert_eq!(state.password, None);
        assert_eq!(state.enable_sip, Some(true));

        let posts = mock.requests_for(Method::Post, "device");
        let body = posts[0].body.as_ref().unwrap();
        assert!(body.get("password").is_none());
        assert!(body.get("tag").is_none());
    }
}
