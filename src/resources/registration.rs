//! `pexip_infinity_registration`: device registration policy (singleton).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{
    import_error, read_object, reset_singleton, resource_schema, update_object, Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{Registration, RegistrationRequest};
use crate::infinity::{InfinityClient, SINGLETON_ID};
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "registration settings";

/// State of a `pexip_infinity_registration`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationModel {
    /// Resource URI assigned by the node.
    pub id: Option<String>,
    /// Numeric id used in API paths.
    pub resource_id: Option<i64>,
    /// Allow devices to register.
    pub enable: Option<bool>,
    /// Registration refresh strategy.
    pub refresh_strategy: Option<String>,
    /// Minimum refresh in adaptive mode, seconds.
    pub adaptive_min_refresh: Option<i64>,
    /// Maximum refresh in adaptive mode, seconds.
    pub adaptive_max_refresh: Option<i64>,
    /// Minimum refresh in maximum mode, seconds.
    pub maximum_min_refresh: Option<i64>,
    /// Maximum refresh in maximum mode, seconds.
    pub maximum_max_refresh: Option<i64>,
    /// Minimum refresh behind NAT, seconds.
    pub natted_min_refresh: Option<i64>,
    /// Maximum refresh behind NAT, seconds.
    pub natted_max_refresh: Option<i64>,
    /// Route calls through the registrar.
    pub route_via_registrar: Option<bool>,
    /// Enable push notifications.
    pub enable_push_notifications: Option<bool>,
    /// Enable Google Cloud Messaging.
    pub enable_google_cloud_messaging: Option<bool>,
    /// Write-only.
    pub push_token: Option<String>,
}

/// Manages the registration singleton.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrationResource;

fn request(plan: &RegistrationModel) -> RegistrationRequest {
    RegistrationRequest {
        enable: plan.enable,
        refresh_strategy: plan.refresh_strategy.clone(),
        adaptive_min_refresh: plan.adaptive_min_refresh,
        adaptive_max_refresh: plan.adaptive_max_refresh,
        maximum_min_refresh: plan.maximum_min_refresh,
        maximum_max_refresh: plan.maximum_max_refresh,
        natted_min_refresh: plan.natted_min_refresh,
        natted_max_refresh: plan.natted_max_refresh,
        route_via_registrar: plan.route_via_registrar,
        enable_push_notifications: plan.enable_push_notifications,
        enable_google_cloud_messaging: plan.enable_google_cloud_messaging,
        push_token: plan.push_token.clone(),
    }
}

async fn read(
    client: &InfinityClient,
    known: &RegistrationModel,
) -> Result<RegistrationModel, ProviderError> {
    let registration: Registration = read_object(client, WHAT, SINGLETON_ID).await?;
    Ok(RegistrationModel {
        id: Some(registration.resource_uri),
        resource_id: Some(SINGLETON_ID),
        enable: Some(registration.enable),
        refresh_strategy: Some(registration.refresh_strategy),
        adaptive_min_refresh: Some(registration.adaptive_min_refresh),
        adaptive_max_refresh: Some(registration.adaptive_max_refresh),
        maximum_min_refresh: Some(registration.maximum_min_refresh),
        maximum_max_refresh: Some(registration.maximum_max_refresh),
        natted_min_refresh: Some(registration.natted_min_refresh),
        natted_max_refresh: Some(registration.natted_max_refresh),
        route_via_registrar: Some(registration.route_via_registrar),
        enable_push_notifications: Some(registration.enable_push_notifications),
        enable_google_cloud_messaging: Some(registration.enable_google_cloud_messaging),
        push_token: known.push_token.clone(),
    })
}

async fn write(
    client: &InfinityClient,
    plan: &RegistrationModel,
) -> Result<RegistrationModel, ProviderError> {
    update_object::<Registration>(client, WHAT, SINGLETON_ID, &request(plan)).await?;
    read(client, plan).await
}

fn refresh_interval() -> Attribute {
    Attribute::optional_computed_int64().with_validator(Validator::range(60, 7200))
}

#[async_trait]
impl Resource for RegistrationResource {
    type Model = RegistrationModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_registration"
    }

    fn schema(&self) -> Schema {
        resource_schema("Manages device registration settings (singleton).")
            .with_attribute(
                "enable",
                Attribute::optional_computed_bool()
                    .with_description("Allow devices to register"),
            )
            .with_attribute(
                "refresh_strategy",
                Attribute::optional_computed_string()
                    .with_validator(Validator::one_of(["adaptive", "maximum"])),
            )
            .with_attribute("adaptive_min_refresh", refresh_interval())
            .with_attribute("adaptive_max_refresh", refresh_interval())
            .with_attribute("maximum_min_refresh", refresh_interval())
            .with_attribute("maximum_max_refresh", refresh_interval())
            .with_attribute("natted_min_refresh", refresh_interval())
            .with_attribute("natted_max_refresh", refresh_interval())
            .with_attribute("route_via_registrar", Attribute::optional_computed_bool())
            .with_attribute("enable_push_notifications", Attribute::optional_computed_bool())
            .with_attribute(
                "enable_google_cloud_messaging",
                Attribute::optional_computed_bool(),
            )
            .with_attribute("push_token", Attribute::optional_string().sensitive())
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: RegistrationModel,
    ) -> Result<RegistrationModel, ProviderError> {
        write(client, &plan).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        state: RegistrationModel,
    ) -> Result<RegistrationModel, ProviderError> {
        read(client, &state).await
    }

    async fn update(
        &self,
        client: &InfinityClient,
        _prior: RegistrationModel,
        plan: RegistrationModel,
    ) -> Result<RegistrationModel, ProviderError> {
        write(client, &plan).await
    }

    async fn delete(
        &self,
        client: &InfinityClient,
        _state: RegistrationModel,
    ) -> Result<(), ProviderError> {
        reset_singleton::<Registration>(client, WHAT, json!({"enable": false})).await
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        _id: &str,
    ) -> Result<RegistrationModel, ProviderError> {
        read(client, &RegistrationModel::default())
            .await
            .map_err(|err| import_error(WHAT, SINGLETON_ID, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infinity::Method;
    use crate::resources::test_support::mock_client;

    #[tokio::test]
    async fn test_delete_disables_registration() {
        let (mock, client) = mock_client();
        let plan = RegistrationModel {
            enable: Some(true),
            refresh_strategy: Some("adaptive".to_string()),
            push_token: Some("apns-token".to_string()),
            ..Default::default()
        };
        let state = RegistrationResource.create(&client, plan).await.unwrap();
        assert_eq!(state.enable, Some(true));
        assert_eq!(state.push_token.as_deref(), Some("apns-token"));

        RegistrationResource.delete(&client, state).await.unwrap();

        let patches = mock.requests_for(Method::Patch, "registration");
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].body, Some(json!({"enable": false})));
        assert_eq!(mock.object("registration", "1").unwrap()["enable"], false);
    }

    #[tokio::test]
    async fn test_update_and_create_send_the_same_request() {
        let (mock, client) = mock_client();
        let plan = RegistrationModel {
            enable: Some(true),
            natted_min_refresh: Some(120),
            ..Default::default()
        };

        let state = RegistrationResource.create(&client, plan.clone()).await.unwrap();
        RegistrationResource.update(&client, state, plan).await.unwrap();

        let puts = mock.requests_for(Method::Put, "registration");
        assert_eq!(puts.len(), 2);
        assert_eq!(puts[0].body, puts[1].body);
    }
}
