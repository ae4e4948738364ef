//! `pexip_infinity_global_configuration`: platform-wide settings
//! (singleton, endpoint `global`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{import_error, read_object, resource_schema, update_object, Resource};
use crate::error::ProviderError;
use crate::infinity::types::{GlobalConfiguration, GlobalConfigurationRequest};
use crate::infinity::{InfinityClient, SINGLETON_ID};
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "global configuration";

/// State of a `pexip_infinity_global_configuration`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfigurationModel {
    /// Resource URI assigned by the node.
    pub id: Option<String>,
    /// Numeric id used in API paths.
    pub resource_id: Option<i64>,
    /// Allow WebRTC.
    pub enable_webrtc: Option<bool>,
    /// Allow SIP.
    pub enable_sip: Option<bool>,
    /// Allow H.323.
    pub enable_h323: Option<bool>,
    /// Allow RTMP.
    pub enable_rtmp: Option<bool>,
    /// Media encryption policy.
    pub crypto_mode: Option<String>,
    /// Maximum call quality.
    pub max_pixels_per_second: Option<String>,
    /// First media port.
    pub media_ports_start: Option<i64>,
    /// Last media port.
    pub media_ports_end: Option<i64>,
    /// First signalling port.
    pub signalling_ports_start: Option<i64>,
    /// Last signalling port.
    pub signalling_ports_end: Option<i64>,
    /// Seconds a conference stays up with only guests.
    pub guests_only_timeout: Option<i64>,
    /// Seconds guests wait for a host.
    pub waiting_for_chair_timeout: Option<i64>,
    /// Send usage statistics.
    pub enable_analytics: Option<bool>,
    /// Send incident reports.
    pub enable_error_reporting: Option<bool>,
    /// Incident report endpoint.
    pub error_reporting_url: Option<String>,
}

/// Manages the global configuration singleton.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalConfigurationResource;

fn request(plan: &GlobalConfigurationModel) -> GlobalConfigurationRequest {
    GlobalConfigurationRequest {
        enable_webrtc: plan.enable_webrtc,
        enable_sip: plan.enable_sip,
        enable_h323: plan.enable_h323,
        enable_rtmp: plan.enable_rtmp,
        crypto_mode: plan.crypto_mode.clone(),
        max_pixels_per_second: plan.max_pixels_per_second.clone(),
        media_ports_start: plan.media_ports_start,
        media_ports_end: plan.media_ports_end,
        signalling_ports_start: plan.signalling_ports_start,
        signalling_ports_end: plan.signalling_ports_end,
        guests_only_timeout: plan.guests_only_timeout,
        waiting_for_chair_timeout: plan.waiting_for_chair_timeout,
        enable_analytics: plan.enable_analytics,
        enable_error_reporting: plan.enable_error_reporting,
        error_reporting_url: plan.error_reporting_url.clone(),
    }
}

async fn read(client: &InfinityClient) -> Result<GlobalConfigurationModel, ProviderError> {
    let global: GlobalConfiguration = read_object(client, WHAT, SINGLETON_ID).await?;
    Ok(GlobalConfigurationModel {
        id: Some(global.resource_uri),
        resource_id: Some(SINGLETON_ID),
        enable_webrtc: Some(global.enable_webrtc),
        enable_sip: Some(global.enable_sip),
        enable_h323: Some(global.enable_h323),
        enable_rtmp: Some(global.enable_rtmp),
        crypto_mode: Some(global.crypto_mode),
        max_pixels_per_second: Some(global.max_pixels_per_second),
        media_ports_start: Some(global.media_ports_start),
        media_ports_end: Some(global.media_ports_end),
        signalling_ports_start: Some(global.signalling_ports_start),
        signalling_ports_end: Some(global.signalling_ports_end),
        guests_only_timeout: Some(global.guests_only_timeout),
        waiting_for_chair_timeout: Some(global.waiting_for_chair_timeout),
        enable_analytics: Some(global.enable_analytics),
        enable_error_reporting: Some(global.enable_error_reporting),
        error_reporting_url: Some(global.error_reporting_url),
    })
}

async fn write(
    client: &InfinityClient,
    plan: &GlobalConfigurationModel,
) -> Result<GlobalConfigurationModel, ProviderError> {
    update_object::<GlobalConfiguration>(client, WHAT, SINGLETON_ID, &request(plan)).await?;
    read(client).await
}

fn port() -> Attribute {
    Attribute::optional_computed_int64().with_validator(Validator::range(1024, 65535))
}

#[async_trait]
impl Resource for GlobalConfigurationResource {
    type Model = GlobalConfigurationModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_global_configuration"
    }

    fn schema(&self) -> Schema {
        resource_schema("Manages platform-wide settings (singleton).")
            .with_attribute("enable_webrtc", Attribute::optional_computed_bool())
            .with_attribute("enable_sip", Attribute::optional_computed_bool())
            .with_attribute("enable_h323", Attribute::optional_computed_bool())
            .with_attribute("enable_rtmp", Attribute::optional_computed_bool())
            .with_attribute(
                "crypto_mode",
                Attribute::optional_computed_string()
                    .with_description("Media encryption policy")
                    .with_validator(Validator::one_of(["besteffort", "on", "off"])),
            )
            .with_attribute(
                "max_pixels_per_second",
                Attribute::optional_computed_string()
                    .with_description("Maximum call quality")
                    .with_validator(Validator::one_of(["sd", "hd", "fullhd"])),
            )
            .with_attribute("media_ports_start", port())
            .with_attribute("media_ports_end", port())
            .with_attribute("signalling_ports_start", port())
            .with_attribute("signalling_ports_end", port())
            .with_attribute(
                "guests_only_timeout",
                Attribute::optional_computed_int64().with_validator(Validator::range(0, 86400)),
            )
            .with_attribute(
                "waiting_for_chair_timeout",
                Attribute::optional_computed_int64().with_validator(Validator::range(0, 86400)),
            )
            .with_attribute("enable_analytics", Attribute::optional_computed_bool())
            .with_attribute("enable_error_reporting", Attribute::optional_computed_bool())
            .with_attribute(
                "error_reporting_url",
                Attribute::optional_computed_string().with_validator(Validator::Url),
            )
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: GlobalConfigurationModel,
    ) -> Result<GlobalConfigurationModel, ProviderError> {
        write(client, &plan).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        _state: GlobalConfigurationModel,
    ) -> Result<GlobalConfigurationModel, ProviderError> {
        read(client).await
    }

    async fn update(
        &self,
        client: &InfinityClient,
        _prior: GlobalConfigurationModel,
        plan: GlobalConfigurationModel,
    ) -> Result<GlobalConfigurationModel, ProviderError> {
        write(client, &plan).await
    }

    async fn delete(
        &self,
        _client: &InfinityClient,
        _state: GlobalConfigurationModel,
    ) -> Result<(), ProviderError> {
        debug!("global configuration cannot be deleted, leaving it in place");
        Ok(())
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        _id: &str,
    ) -> Result<GlobalConfigurationModel, ProviderError> {
        read(client)
            .await
            .map_err(|err| import_error(WHAT, SINGLETON_ID, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::mock_client;

    #[tokio::test]
    async fn test_update_writes_global_and_delete_is_a_no_op() {
        let (mock, client) = mock_client();
        let plan = GlobalConfigurationModel {
            enable_webrtc: Some(true),
            crypto_mode: Some("on".to_string()),
            media_ports_start: Some(40000),
            ..Default::default()
        };

        let state = GlobalConfigurationResource.create(&client, plan).await.unwrap();
        assert_eq!(state.crypto_mode.as_deref(), Some("on"));
        assert_eq!(state.media_ports_start, Some(40000));
        assert!(state.id.unwrap().ends_with("/global/1/"));

        mock.clear_requests();
        GlobalConfigurationResource
            .delete(&client, GlobalConfigurationModel::default())
            .await
            .unwrap();
        assert!(mock.requests().is_empty());
        assert!(mock.object("global", "1").is_some());
    }
}
