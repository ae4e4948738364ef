//! Call signalling, media relay and external policy.

use serde::{Deserialize, Serialize};

use super::config_object;

/// `sip_credential`. The password is write-only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SipCredential {
    pub id: i64,
    pub realm: String,
    pub username: String,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SipCredentialRequest {
    pub realm: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

config_object!(SipCredential, "sip_credential", SipCredentialRequest, SipCredentialRequest);

/// `sip_proxy`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SipProxy {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub address: String,
    pub port: i64,
    pub transport: String,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SipProxyRequest {
    pub name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<String>,
}

config_object!(SipProxy, "sip_proxy", SipProxyRequest, SipProxyRequest);

/// `h323_gatekeeper`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct H323Gatekeeper {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub address: String,
    pub port: i64,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct H323GatekeeperRequest {
    pub name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
}

config_object!(
    H323Gatekeeper,
    "h323_gatekeeper",
    H323GatekeeperRequest,
    H323GatekeeperRequest
);

/// `turn_server`. Password and shared secret are write-only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnServer {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub address: String,
    pub port: i64,
    pub server_type: String,
    pub transport_type: String,
    pub username: String,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TurnServerRequest {
    pub name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
}

config_object!(TurnServer, "turn_server", TurnServerRequest, TurnServerRequest);

/// `policy_server`: external policy lookups. The password is write-only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyServer {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub url: String,
    pub username: String,
    pub enable_service_lookup: bool,
    pub enable_participant_lookup: bool,
    pub enable_registration_lookup: bool,
    pub enable_directory_lookup: bool,
    pub enable_avatar_lookup: bool,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PolicyServerRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_service_lookup: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_participant_lookup: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_registration_lookup: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_directory_lookup: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_avatar_lookup: Option<bool>,
}

config_object!(PolicyServer, "policy_server", PolicyServerRequest, PolicyServerRequest);
