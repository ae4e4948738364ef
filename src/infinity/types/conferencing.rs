//! Virtual meeting rooms, aliases, users and devices.

use serde::{Deserialize, Serialize};

use super::{config_object, related_uri, related_uris};

/// `conference`. PINs are write-only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Conference {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub service_type: String,
    pub allow_guests: bool,
    pub guests_can_present: bool,
    pub participant_limit: Option<i64>,
    pub tag: String,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ConferenceRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_pin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_guests: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guests_can_present: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

config_object!(Conference, "conference", ConferenceRequest, ConferenceRequest);

/// `conference_alias`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConferenceAlias {
    pub id: i64,
    pub alias: String,
    #[serde(deserialize_with = "related_uri")]
    pub conference: Option<String>,
    pub description: String,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ConferenceAliasRequest {
    pub alias: String,
    pub conference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

config_object!(
    ConferenceAlias,
    "conference_alias",
    ConferenceAliasRequest,
    ConferenceAliasRequest
);

/// `automatic_participant`: an endpoint dialled out to when a conference
/// starts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomaticParticipant {
    pub id: i64,
    pub alias: String,
    pub description: String,
    #[serde(deserialize_with = "related_uris")]
    pub conference: Vec<String>,
    pub protocol: String,
    pub call_type: String,
    pub role: String,
    pub dtmf_sequence: String,
    pub keep_conference_alive: String,
    pub routing: String,
    #[serde(deserialize_with = "related_uri")]
    pub system_location: Option<String>,
    pub streaming: bool,
    pub remote_display_name: String,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AutomaticParticipantRequest {
    pub alias: String,
    pub conference: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtmf_sequence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_conference_alive: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streaming: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_display_name: Option<String>,
}

config_object!(
    AutomaticParticipant,
    "automatic_participant",
    AutomaticParticipantRequest,
    AutomaticParticipantRequest
);

/// `end_user`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EndUser {
    pub id: i64,
    pub primary_email_address: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub telephone_number: String,
    pub mobile_number: String,
    pub title: String,
    pub department: String,
    pub avatar_url: String,
    pub user_oid: Option<String>,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EndUserRequest {
    pub primary_email_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_oid: Option<String>,
}

config_object!(EndUser, "end_user", EndUserRequest, EndUserRequest);

/// `device`: a registered endpoint. The registration password is
/// write-only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Device {
    pub id: i64,
    pub alias: String,
    pub description: String,
    pub username: String,
    pub primary_owner_email_address: String,
    pub enable_sip: bool,
    pub enable_h323: bool,
    pub enable_infinity_connect_non_sso: bool,
    pub enable_infinity_connect_sso: bool,
    pub enable_standard_sso: bool,
    pub tag: String,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DeviceRequest {
    pub alias: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_owner_email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_sip: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_h323: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_infinity_connect_non_sso: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_infinity_connect_sso: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_standard_sso: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

config_object!(Device, "device", DeviceRequest, DeviceRequest);

/// `gms_access_token`: Google Meet interop token. The token is write-only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GmsAccessToken {
    pub id: i64,
    pub name: String,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct GmsAccessTokenRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

config_object!(
    GmsAccessToken,
    "gms_access_token",
    GmsAccessTokenRequest,
    GmsAccessTokenRequest
);
