//! `pexip_infinity_authentication`: how administrators sign in.
//!
//! The object is a singleton. Create and update write the same settings;
//! delete puts the node back on local accounts only.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::{
    import_error, read_object, reset_singleton, resource_schema, update_object, Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{Authentication, AuthenticationRequest};
use crate::infinity::{InfinityClient, SINGLETON_ID};
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "authentication settings";

/// Accepted `source` values.
const SOURCES: [&str; 5] = ["LOCAL", "LDAP", "LOCAL_AND_LDAP", "OIDC", "LOCAL_AND_OIDC"];

/// State of a `pexip_infinity_authentication`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthenticationModel {
    /// Resource URI assigned by the node.
    pub id: Option<String>,
    /// Numeric id used in API paths.
    pub resource_id: Option<i64>,
    /// Where administrator accounts are looked up.
    pub source: Option<String>,
    /// Client certificate requirement for administrators.
    pub client_certificate: Option<String>,
    /// Disable basic auth on the management API when OAuth2 is enabled.
    pub api_oauth2_disable_basic: Option<bool>,
    /// Grant OAuth2 clients every permission.
    pub api_oauth2_allow_all_perms: Option<bool>,
    /// OAuth2 token lifetime in seconds.
    pub api_oauth2_expiration: Option<i64>,
    /// LDAP server address.
    pub ldap_server: Option<String>,
    /// Base DN for LDAP searches.
    pub ldap_base_dn: Option<String>,
    /// LDAP bind username.
    pub ldap_bind_username: Option<String>,
    /// Write-only.
    pub ldap_bind_password: Option<String>,
    /// DN under which users are searched.
    pub ldap_user_search_dn: Option<String>,
    /// LDAP filter for user lookups.
    pub ldap_user_filter: Option<String>,
    /// Search the Active Directory global catalog.
    pub ldap_use_global_catalog: Option<bool>,
    /// Allow LDAP without TLS.
    pub ldap_permit_no_tls: Option<bool>,
    /// OpenID Connect metadata URL.
    pub oidc_metadata_url: Option<String>,
    /// OpenID Connect client id.
    pub oidc_client_id: Option<String>,
    /// Write-only.
    pub oidc_client_secret: Option<String>,
    /// OpenID Connect client authentication method.
    pub oidc_auth_method: Option<String>,
    /// OpenID Connect scope.
    pub oidc_scope: Option<String>,
    /// Claim holding the username.
    pub oidc_username_field: Option<String>,
    /// Claim holding group memberships.
    pub oidc_groups_field: Option<String>,
    /// Domain hint sent to the identity provider.
    pub oidc_domain_hint: Option<String>,
}

/// Manages the authentication singleton.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthenticationResource;

fn request(plan: &AuthenticationModel) -> AuthenticationRequest {
    AuthenticationRequest {
        source: plan.source.clone(),
        client_certificate: plan.client_certificate.clone(),
        api_oauth2_disable_basic: plan.api_oauth2_disable_basic,
        api_oauth2_allow_all_perms: plan.api_oauth2_allow_all_perms,
        api_oauth2_expiration: plan.api_oauth2_expiration,
        ldap_server: plan.ldap_server.clone(),
        ldap_base_dn: plan.ldap_base_dn.clone(),
        ldap_bind_username: plan.ldap_bind_username.clone(),
        ldap_bind_password: plan.ldap_bind_password.clone(),
        ldap_user_search_dn: plan.ldap_user_search_dn.clone(),
        ldap_user_filter: plan.ldap_user_filter.clone(),
        ldap_use_global_catalog: plan.ldap_use_global_catalog,
        ldap_permit_no_tls: plan.ldap_permit_no_tls,
        oidc_metadata_url: plan.oidc_metadata_url.clone(),
        oidc_client_id: plan.oidc_client_id.clone(),
        oidc_client_secret: plan.oidc_client_secret.clone(),
        oidc_auth_method: plan.oidc_auth_method.clone(),
        oidc_scope: plan.oidc_scope.clone(),
        oidc_username_field: plan.oidc_username_field.clone(),
        oidc_groups_field: plan.oidc_groups_field.clone(),
        oidc_domain_hint: plan.oidc_domain_hint.clone(),
    }
}

async fn read(
    client: &InfinityClient,
    known: &AuthenticationModel,
) -> Result<AuthenticationModel, ProviderError> {
    let auth: Authentication = read_object(client, WHAT, SINGLETON_ID).await?;
    Ok(AuthenticationModel {
        id: Some(auth.resource_uri),
        resource_id: Some(SINGLETON_ID),
        source: Some(auth.source),
        client_certificate: Some(auth.client_certificate),
        api_oauth2_disable_basic: Some(auth.api_oauth2_disable_basic),
        api_oauth2_allow_all_perms: Some(auth.api_oauth2_allow_all_perms),
        api_oauth2_expiration: Some(auth.api_oauth2_expiration),
        ldap_server: Some(auth.ldap_server),
        ldap_base_dn: Some(auth.ldap_base_dn),
        ldap_bind_username: Some(auth.ldap_bind_username),
        ldap_bind_password: known.ldap_bind_password.clone(),
        ldap_user_search_dn: Some(auth.ldap_user_search_dn),
        ldap_user_filter: Some(auth.ldap_user_filter),
        ldap_use_global_catalog: Some(auth.ldap_use_global_catalog),
        ldap_permit_no_tls: Some(auth.ldap_permit_no_tls),
        oidc_metadata_url: Some(auth.oidc_metadata_url),
        oidc_client_id: Some(auth.oidc_client_id),
        oidc_client_secret: known.oidc_client_secret.clone(),
        oidc_auth_method: Some(auth.oidc_auth_method),
        oidc_scope: Some(auth.oidc_scope),
        oidc_username_field: Some(auth.oidc_username_field),
        oidc_groups_field: Some(auth.oidc_groups_field),
        oidc_domain_hint: Some(auth.oidc_domain_hint),
    })
}

async fn write(
    client: &InfinityClient,
    plan: &AuthenticationModel,
) -> Result<AuthenticationModel, ProviderError> {
    update_object::<Authentication>(client, WHAT, SINGLETON_ID, &request(plan)).await?;
    read(client, plan).await
}

fn text(max: usize) -> Attribute {
    Attribute::optional_computed_string().with_validator(Validator::max_length(max))
}

#[async_trait]
impl Resource for AuthenticationResource {
    type Model = AuthenticationModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_authentication"
    }

    fn schema(&self) -> Schema {
        resource_schema("Manages administrator authentication settings (singleton).")
            .with_attribute(
                "source",
                Attribute::optional_computed_string()
                    .with_description("Where administrator accounts are looked up")
                    .with_validator(Validator::one_of(SOURCES)),
            )
            .with_attribute(
                "client_certificate",
                Attribute::optional_computed_string().with_validator(Validator::one_of([
                    "NO",
                    "YES",
                    "REQUIRED",
                ])),
            )
            .with_attribute("api_oauth2_disable_basic", Attribute::optional_computed_bool())
            .with_attribute("api_oauth2_allow_all_perms", Attribute::optional_computed_bool())
            .with_attribute(
                "api_oauth2_expiration",
                Attribute::optional_computed_int64()
                    .with_description("OAuth2 token lifetime in seconds")
                    .with_validator(Validator::range(60, 86400)),
            )
            .with_attribute("ldap_server", text(255))
            .with_attribute("ldap_base_dn", text(255))
            .with_attribute("ldap_bind_username", text(255))
            .with_attribute(
                "ldap_bind_password",
                Attribute::optional_string()
                    .sensitive()
                    .with_validator(Validator::max_length(100)),
            )
            .with_attribute("ldap_user_search_dn", text(255))
            .with_attribute("ldap_user_filter", text(1024))
            .with_attribute("ldap_use_global_catalog", Attribute::optional_computed_bool())
            .with_attribute("ldap_permit_no_tls", Attribute::optional_computed_bool())
            .with_attribute("oidc_metadata_url", text(255))
            .with_attribute("oidc_client_id", text(255))
            .with_attribute(
                "oidc_client_secret",
                Attribute::optional_string()
                    .sensitive()
                    .with_validator(Validator::max_length(255)),
            )
            .with_attribute(
                "oidc_auth_method",
                Attribute::optional_computed_string()
                    .with_validator(Validator::one_of(["client_secret", "private_key"])),
            )
            .with_attribute("oidc_scope", text(255))
            .with_attribute("oidc_username_field", text(100))
            .with_attribute("oidc_groups_field", text(100))
            .with_attribute("oidc_domain_hint", text(255))
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: AuthenticationModel,
    ) -> Result<AuthenticationModel, ProviderError> {
        write(client, &plan).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        state: AuthenticationModel,
    ) -> Result<AuthenticationModel, ProviderError> {
        read(client, &state).await
    }

    async fn update(
        &self,
        client: &InfinityClient,
        _prior: AuthenticationModel,
        plan: AuthenticationModel,
    ) -> Result<AuthenticationModel, ProviderError> {
        write(client, &plan).await
    }

    async fn delete(
        &self,
        client: &InfinityClient,
        _state: AuthenticationModel,
    ) -> Result<(), ProviderError> {
        debug!("resetting authentication to local accounts");
        reset_singleton::<Authentication>(
            client,
            WHAT,
            json!({
                "source": "LOCAL",
                "ldap_server": "",
                "ldap_base_dn": "",
                "ldap_bind_username": "",
                "ldap_bind_password": "",
                "oidc_metadata_url": "",
                "oidc_client_id": "",
                "oidc_client_secret": "",
            }),
        )
        .await
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        _id: &str,
    ) -> Result<AuthenticationModel, ProviderError> {
        read(client, &AuthenticationModel::default())
            .await
            .map_err(|err| import_error(WHAT, SINGLETON_ID, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infinity::Method;
    use crate::resources::test_support::mock_client;

    fn ldap_plan() -> AuthenticationModel {
        AuthenticationModel {
            source: Some("LOCAL_AND_LDAP".to_string()),
            ldap_server: Some("ldap.example.com".to_string()),
            ldap_bind_username: Some("svc-pexip".to_string()),
            ldap_bind_password: Some("bind-secret".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_is_a_put_on_the_singleton() {
        let (mock, client) = mock_client();

        let state = AuthenticationResource.create(&client, ldap_plan()).await.unwrap();

        assert_eq!(mock.request_count(Method::Post, "authentication"), 0);
        let puts = mock.requests_for(Method::Put, "authentication");
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].path, "authentication/1/");
        assert_eq!(state.resource_id, Some(SINGLETON_ID));
        assert_eq!(state.source.as_deref(), Some("LOCAL_AND_LDAP"));
        assert_eq!(state.ldap_bind_password.as_deref(), Some("bind-secret"));
    }

    #[tokio::test]
    async fn test_delete_resets_to_local() {
        let (mock, client) = mock_client();
        let state = AuthenticationResource.create(&client, ldap_plan()).await.unwrap();

        AuthenticationResource.delete(&client, state).await.unwrap();

        let stored = mock.object("authentication", "1").unwrap();
        assert_eq!(stored["source"], "LOCAL");
        assert_eq!(stored["ldap_server"], "");
        assert_eq!(stored["ldap_bind_password"], "");
        assert_eq!(mock.request_count(Method::Delete, "authentication"), 0);
    }

    #[tokio::test]
    async fn test_import_accepts_any_id() {
        let (_mock, client) = mock_client();
        let imported = AuthenticationResource
            .import_state(&client, "whatever")
            .await
            .unwrap();
        assert_eq!(imported.resource_id, Some(1));
        assert_eq!(imported.ldap_bind_password, None);
    }
}
