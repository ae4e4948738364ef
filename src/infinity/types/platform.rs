//! Licensing and the node-wide singleton settings.

use serde::{Deserialize, Serialize};

use super::config_object;

/// `licence`, addressed by fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Licence {
    pub fingerprint: String,
    pub entitlement_id: String,
    pub offline_mode: bool,
    pub status: String,
    pub concurrent: i64,
    pub concurrent_overdraft: i64,
    pub activatable: i64,
    pub activatable_overdraft: i64,
    pub hybrid: i64,
    pub expiration_date: String,
    pub features: String,
    pub product_id: String,
    pub license_type: String,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LicenceCreateRequest {
    pub entitlement_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offline_mode: Option<bool>,
}

config_object!(Licence, "licence", LicenceCreateRequest, LicenceCreateRequest);

/// `licence_request`: an offline activation request, addressed by sequence
/// number. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenceRequest {
    pub sequence_number: String,
    pub reference: String,
    pub actions: String,
    pub generation_time: String,
    pub status: String,
    pub response_xml: String,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LicenceRequestCreateRequest {
    pub reference: String,
    pub actions: String,
}

config_object!(
    LicenceRequest,
    "licence_request",
    LicenceRequestCreateRequest,
    LicenceRequestCreateRequest
);

/// `registration` singleton: device registration policy.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Registration {
    pub id: i64,
    pub enable: bool,
    pub refresh_strategy: String,
    pub adaptive_min_refresh: i64,
    pub adaptive_max_refresh: i64,
    pub maximum_min_refresh: i64,
    pub maximum_max_refresh: i64,
    pub natted_min_refresh: i64,
    pub natted_max_refresh: i64,
    pub route_via_registrar: bool,
    pub enable_push_notifications: bool,
    pub enable_google_cloud_messaging: bool,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RegistrationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adaptive_min_refresh: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adaptive_max_refresh: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_min_refresh: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_max_refresh: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub natted_min_refresh: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub natted_max_refresh: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_via_registrar: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_push_notifications: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_google_cloud_messaging: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_token: Option<String>,
}

config_object!(Registration, "registration", RegistrationRequest, RegistrationRequest);

/// `global` singleton: platform-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfiguration {
    pub id: i64,
    pub enable_webrtc: bool,
    pub enable_sip: bool,
    pub enable_h323: bool,
    pub enable_rtmp: bool,
    pub crypto_mode: String,
    pub max_pixels_per_second: String,
    pub media_ports_start: i64,
    pub media_ports_end: i64,
    pub signalling_ports_start: i64,
    pub signalling_ports_end: i64,
    pub guests_only_timeout: i64,
    pub waiting_for_chair_timeout: i64,
    pub enable_analytics: bool,
    pub enable_error_reporting: bool,
    pub error_reporting_url: String,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct GlobalConfigurationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_webrtc: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_sip: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_h323: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_rtmp: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crypto_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pixels_per_second: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_ports_start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_ports_end: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signalling_ports_start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signalling_ports_end: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guests_only_timeout: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waiting_for_chair_timeout: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_analytics: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_error_reporting: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_reporting_url: Option<String>,
}

config_object!(
    GlobalConfiguration,
    "global",
    GlobalConfigurationRequest,
    GlobalConfigurationRequest
);

/// `gms_gateway_token` singleton: the certificate used to join Google Meet.
/// The private key is write-only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GmsGatewayToken {
    pub id: i64,
    pub certificate: String,
    pub intermediate_certificate: String,
    pub supports_direct_guest_join: bool,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct GmsGatewayTokenRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intermediate_certificate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

config_object!(
    GmsGatewayToken,
    "gms_gateway_token",
    GmsGatewayTokenRequest,
    GmsGatewayTokenRequest
);
