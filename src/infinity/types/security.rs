//! Certificates, keys and administrator access.

use serde::{Deserialize, Serialize};

use super::{config_object, related_uris};

/// `tls_certificate`. Private key material is write-only; the subject,
/// issuer and validity fields are derived by the node from the PEM.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsCertificate {
    pub id: i64,
    pub certificate: String,
    pub parameters: String,
    #[serde(deserialize_with = "related_uris")]
    pub nodes: Vec<String>,
    pub subject_name: String,
    pub issuer_name: String,
    pub serial_no: String,
    pub start_date: String,
    pub end_date: String,
    pub resource_uri: String,
}

impl TlsCertificate {
    /// Whether the certificate signed itself.
    pub fn is_self_signed(&self) -> bool {
        !self.subject_name.is_empty() && self.subject_name == self.issuer_name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TlsCertificateRequest {
    pub certificate: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key_passphrase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<String>>,
}

config_object!(
    TlsCertificate,
    "tls_certificate",
    TlsCertificateRequest,
    TlsCertificateRequest
);

/// `ssh_authorized_key`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SshAuthorizedKey {
    pub id: i64,
    pub keytype: String,
    pub key: String,
    pub comment: String,
    #[serde(deserialize_with = "related_uris")]
    pub nodes: Vec<String>,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SshAuthorizedKeyRequest {
    pub keytype: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<String>>,
}

config_object!(
    SshAuthorizedKey,
    "ssh_authorized_key",
    SshAuthorizedKeyRequest,
    SshAuthorizedKeyRequest
);

/// `role`: a named set of administrator permissions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Role {
    pub id: i64,
    pub name: String,
    #[serde(deserialize_with = "related_uris")]
    pub permissions: Vec<String>,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RoleRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

config_object!(Role, "role", RoleRequest, RoleRequest);

/// `user_group`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserGroup {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(deserialize_with = "related_uris")]
    pub users: Vec<String>,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct UserGroupRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<String>>,
}

config_object!(UserGroup, "user_group", UserGroupRequest, UserGroupRequest);

/// `authentication` singleton: how administrators log in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Authentication {
    pub id: i64,
    pub source: String,
    pub client_certificate: String,
    pub api_oauth2_disable_basic: bool,
    pub api_oauth2_allow_all_perms: bool,
    pub api_oauth2_expiration: i64,
    pub ldap_server: String,
    pub ldap_base_dn: String,
    pub ldap_bind_username: String,
    pub ldap_user_search_dn: String,
    pub ldap_user_filter: String,
    pub ldap_use_global_catalog: bool,
    pub ldap_permit_no_tls: bool,
    pub oidc_metadata_url: String,
    pub oidc_client_id: String,
    pub oidc_auth_method: String,
    pub oidc_scope: String,
    pub oidc_username_field: String,
    pub oidc_groups_field: String,
    pub oidc_domain_hint: String,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AuthenticationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_certificate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_oauth2_disable_basic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_oauth2_allow_all_perms: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_oauth2_expiration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ldap_server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ldap_base_dn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ldap_bind_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ldap_bind_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ldap_user_search_dn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ldap_user_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ldap_use_global_catalog: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ldap_permit_no_tls: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oidc_metadata_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oidc_client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oidc_client_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oidc_auth_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oidc_scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oidc_username_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oidc_groups_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oidc_domain_hint: Option<String>,
}

config_object!(
    Authentication,
    "authentication",
    AuthenticationRequest,
    AuthenticationRequest
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_signed() {
        let cert = TlsCertificate {
            subject_name: "pexip.local".to_string(),
            issuer_name: "pexip.local".to_string(),
            ..Default::default()
        };
        assert!(cert.is_self_signed());

        let cert = TlsCertificate {
            subject_name: "pexip.local".to_string(),
            issuer_name: "Example CA".to_string(),
            ..Default::default()
        };
        assert!(!cert.is_self_signed());
        assert!(!TlsCertificate::default().is_self_signed());
    }
}
