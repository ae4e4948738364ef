//! `pexip_infinity_licence`: an activated licence entitlement.
//!
//! Licences are addressed by fingerprint rather than numeric id, and an
//! entitlement cannot be changed in place.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{
    create_object, delete_object, import_error, operation_error, read_object_by_key, Operation,
    Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{Licence, LicenceCreateRequest};
use crate::infinity::InfinityClient;
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "licence";

/// State of a `pexip_infinity_licence`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenceModel {
    /// Resource URI of the licence.
    pub id: Option<String>,
    /// Licence fingerprint.
    pub fingerprint: Option<String>,
    /// Entitlement (activation) key.
    pub entitlement_id: Option<String>,
    /// Activate offline.
    pub offline_mode: Option<bool>,
    /// Status reported by the node.
    pub status: Option<String>,
    /// Concurrent call licences.
    pub concurrent: Option<i64>,
    /// Concurrent overdraft licences.
    pub concurrent_overdraft: Option<i64>,
    /// Activatable licences.
    pub activatable: Option<i64>,
    /// Activatable overdraft licences.
    pub activatable_overdraft: Option<i64>,
    /// Hybrid licences.
    pub hybrid: Option<i64>,
    /// Expiry date.
    pub expiration_date: Option<String>,
    /// Licensed features.
    pub features: Option<String>,
    /// Product id.
    pub product_id: Option<String>,
    /// Licence type.
    pub license_type: Option<String>,
}

/// Manages licence activations.
#[derive(Debug, Clone, Copy, Default)]
pub struct LicenceResource;

fn required_fingerprint(state: &LicenceModel) -> Result<&str, ProviderError> {
    state
        .fingerprint
        .as_deref()
        .filter(|f| !f.is_empty())
        .ok_or_else(|| ProviderError::Validation("fingerprint is missing from state".to_string()))
}

async fn read(
    client: &InfinityClient,
    fingerprint: &str,
    known: &LicenceModel,
) -> Result<LicenceModel, ProviderError> {
    let licence: Licence = read_object_by_key(client, WHAT, fingerprint).await?;
    Ok(LicenceModel {
        id: Some(licence.resource_uri),
        fingerprint: Some(licence.fingerprint),
        // The node may normalise or omit the entitlement once activated.
        entitlement_id: if licence.entitlement_id.is_empty() {
            known.entitlement_id.clone()
        } else {
            Some(licence.entitlement_id)
        },
        offline_mode: Some(licence.offline_mode),
        status: Some(licence.status),
        concurrent: Some(licence.concurrent),
        concurrent_overdraft: Some(licence.concurrent_overdraft),
        activatable: Some(licence.activatable),
        activatable_overdraft: Some(licence.activatable_overdraft),
        hybrid: Some(licence.hybrid),
        expiration_date: Some(licence.expiration_date),
        features: Some(licence.features),
        product_id: Some(licence.product_id),
        license_type: Some(licence.license_type),
    })
}

#[async_trait]
impl Resource for LicenceResource {
    type Model = LicenceModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_licence"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("Activates a licence entitlement on the platform.")
            .with_attribute(
                "id",
                Attribute::computed_string().with_description("Resource URI of the licence"),
            )
            .with_attribute(
                "fingerprint",
                Attribute::computed_string().with_description("Licence fingerprint"),
            )
            .with_attribute(
                "entitlement_id",
                Attribute::required_string()
                    .with_force_new()
                    .with_description("Entitlement (activation) key")
                    .with_validator(Validator::length(1, 128)),
            )
            .with_attribute(
                "offline_mode",
                Attribute::optional_bool()
                    .with_default(json!(false))
                    .with_force_new()
                    .with_description("Activate offline"),
            )
            .with_attribute("status", Attribute::computed_string())
            .with_attribute("concurrent", Attribute::computed_int64())
            .with_attribute("concurrent_overdraft", Attribute::computed_int64())
            .with_attribute("activatable", Attribute::computed_int64())
            .with_attribute("activatable_overdraft", Attribute::computed_int64())
            .with_attribute("hybrid", Attribute::computed_int64())
            .with_attribute("expiration_date", Attribute::computed_string())
            .with_attribute("features", Attribute::computed_string())
            .with_attribute("product_id", Attribute::computed_string())
            .with_attribute("license_type", Attribute::computed_string())
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: LicenceModel,
    ) -> Result<LicenceModel, ProviderError> {
        let request = LicenceCreateRequest {
            entitlement_id: plan.entitlement_id.clone().unwrap_or_default(),
            offline_mode: plan.offline_mode,
        };
        let created = create_object::<Licence>(client, WHAT, &request).await?;
        let fingerprint = created
            .resource_key()
            .map_err(|err| operation_error(Operation::Create, WHAT, None, err))?;
        read(client, fingerprint, &plan).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        state: LicenceModel,
    ) -> Result<LicenceModel, ProviderError> {
        read(client, required_fingerprint(&state)?, &state).await
    }

    /// Every configurable attribute forces replacement, so an update only
    /// refreshes the computed fields.
    async fn update(
        &self,
        client: &InfinityClient,
        prior: LicenceModel,
        plan: LicenceModel,
    ) -> Result<LicenceModel, ProviderError> {
        read(client, required_fingerprint(&prior)?, &plan).await
    }

    async fn delete(
        &self,
        client: &InfinityClient,
        state: LicenceModel,
    ) -> Result<(), ProviderError> {
        delete_object::<Licence>(client, WHAT, required_fingerprint(&state)?).await
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        id: &str,
    ) -> Result<LicenceModel, ProviderError> {
        let fingerprint = id.trim();
        if fingerprint.is_empty() {
            return Err(ProviderError::operation(
                "Invalid Import ID",
                "Expected a licence fingerprint, got an empty string",
            ));
        }
        read(client, fingerprint, &LicenceModel::default())
            .await
            .map_err(|err| import_error(WHAT, fingerprint, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infinity::Method;
    use crate::resources::test_support::mock_client;

    fn plan() -> LicenceModel {
        LicenceModel {
            entitlement_id: Some("1234-5678-9012".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_lifecycle_by_fingerprint() {
        let (mock, client) = mock_client();

        let state = LicenceResource.create(&client, plan()).await.unwrap();
        let fingerprint = state.fingerprint.clone().unwrap();
        assert_eq!(fingerprint.len(), 32);
        assert_eq!(state.entitlement_id.as_deref(), Some("1234-5678-9012"));
        assert!(state.id.unwrap().ends_with(&format!("/licence/{}/", fingerprint)));

        let imported = LicenceResource.import_state(&client, &fingerprint).await.unwrap();
        assert_eq!(imported.fingerprint.as_deref(), Some(fingerprint.as_str()));

        LicenceResource.delete(&client, imported).await.unwrap();
        assert!(mock.is_empty("licence"));
        let deletes = mock.requests_for(Method::Delete, "licence");
        assert_eq!(deletes[0].path, format!("licence/{}/", fingerprint));
    }

    #[tokio::test]
    async fn test_update_does_not_write() {
        let (mock, client) = mock_client();
        let state = LicenceResource.create(&client, plan()).await.unwrap();
        mock.clear_requests();

        let updated = LicenceResource
            .update(&client, state.clone(), state.clone())
            .await
            .unwrap();
        assert_eq!(updated, state);
        assert_eq!(mock.mutation_count(), 0);
    }

    #[test]
    fn test_entitlement_forces_replacement() {
        let schema = LicenceResource.schema();
        assert!(schema.attribute("entitlement_id").unwrap().force_new);
        assert!(schema.attribute("fingerprint").unwrap().is_computed_only());
    }

    #[tokio::test]
    async fn test_import_rejects_empty_and_unknown() {
        let (_mock, client) = mock_client();
        let err = LicenceResource.import_state(&client, " ").await.unwrap_err();
        assert_eq!(err.to_diagnostic().summary, "Invalid Import ID");

        let err = LicenceResource.import_state(&client, "DEADBEEF").await.unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
