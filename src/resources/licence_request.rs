//! `pexip_infinity_licence_request`: an offline licence activation request.
//!
//! Requests are addressed by sequence number and cannot be modified once
//! submitted.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    create_object, delete_object, import_error, operation_error, read_object_by_key, Operation,
    Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{LicenceRequest, LicenceRequestCreateRequest};
use crate::infinity::InfinityClient;
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "licence request";

/// State of a `pexip_infinity_licence_request`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenceRequestModel {
    /// Resource URI of the request.
    pub id: Option<String>,
    /// Sequence number addressing the request.
    pub sequence_number: Option<String>,
    /// Reference returned by the licensing server.
    pub reference: Option<String>,
    /// Licence actions requested, as generated by the licensing portal.
    pub actions: Option<String>,
    /// When the request was generated.
    pub generation_time: Option<String>,
    /// Status reported by the node.
    pub status: Option<String>,
    /// Response from the licensing server.
    pub response_xml: Option<String>,
}

/// Manages offline licence requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct LicenceRequestResource;

fn required_sequence_number(state: &LicenceRequestModel) -> Result<&str, ProviderError> {
    state
        .sequence_number
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            ProviderError::Validation("sequence_number is missing from state".to_string())
        })
}

async fn read(
    client: &InfinityClient,
    sequence_number: &str,
) -> Result<LicenceRequestModel, ProviderError> {
    let request: LicenceRequest = read_object_by_key(client, WHAT, sequence_number).await?;
    Ok(LicenceRequestModel {
        id: Some(request.resource_uri),
        sequence_number: Some(request.sequence_number),
        reference: Some(request.reference),
        actions: Some(request.actions),
        generation_time: Some(request.generation_time),
        status: Some(request.status),
        response_xml: Some(request.response_xml),
    })
}

#[async_trait]
impl Resource for LicenceRequestResource {
    type Model = LicenceRequestModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_licence_request"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("Submits an offline licence request.")
            .with_attribute(
                "id",
                Attribute::computed_string().with_description("Resource URI of the request"),
            )
            .with_attribute("sequence_number", Attribute::computed_string())
            .with_attribute(
                "reference",
                Attribute::required_string()
                    .with_force_new()
                    .with_validator(Validator::length(1, 250)),
            )
            .with_attribute(
                "actions",
                Attribute::required_string()
                    .with_force_new()
                    .with_description("Licence actions requested, as generated by the licensing portal"),
            )
            .with_attribute("generation_time", Attribute::computed_string())
            .with_attribute("status", Attribute::computed_string())
            .with_attribute("response_xml", Attribute::computed_string())
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: LicenceRequestModel,
    ) -> Result<LicenceRequestModel, ProviderError> {
        let request = LicenceRequestCreateRequest {
            reference: plan.reference.unwrap_or_default(),
            actions: plan.actions.unwrap_or_default(),
        };
        let created = create_object::<LicenceRequest>(client, WHAT, &request).await?;
        let sequence_number = created
            .resource_key()
            .map_err(|err| operation_error(Operation::Create, WHAT, None, err))?;
        read(client, sequence_number).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        state: LicenceRequestModel,
    ) -> Result<LicenceRequestModel, ProviderError> {
        read(client, required_sequence_number(&state)?).await
    }

    async fn update(
        &self,
        _client: &InfinityClient,
        prior: LicenceRequestModel,
        _plan: LicenceRequestModel,
    ) -> Result<LicenceRequestModel, ProviderError> {
        Err(ProviderError::operation(
            "Update Not Supported",
            format!(
                "Infinity licence request {} cannot be updated; change its configuration to replace it",
                prior.sequence_number.as_deref().unwrap_or("(unknown)")
            ),
        ))
    }

    async fn delete(
        &self,
        client: &InfinityClient,
        state: LicenceRequestModel,
    ) -> Result<(), ProviderError> {
        delete_object::<LicenceRequest>(client, WHAT, required_sequence_number(&state)?).await
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        id: &str,
    ) -> Result<LicenceRequestModel, ProviderError> {
        let sequence_number = id.trim();
        if sequence_number.is_empty() {
            return Err(ProviderError::operation(
                "Invalid Import ID",
                "Expected a licence request sequence number, got an empty string",
            ));
        }
        read(client, sequence_number)
            .await
            .map_err(|err| import_error(WHAT, sequence_number, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::mock_client;

    #[tokio::test]
    async fn test_update_is_refused_without_api_call() {
        let (mock, client) = mock_client();
        let plan = LicenceRequestModel {
            reference: Some("offline-1".to_string()),
            actions: Some("activate".to_string()),
            ..Default::default()
        };
        let state = LicenceRequestResource.create(&client, plan).await.unwrap();
        assert_eq!(state.sequence_number.as_deref(), Some("1"));
        mock.clear_requests();

        let err = LicenceRequestResource
            .update(&client, state.clone(), state)
            .await
            .unwrap_err();
        assert_eq!(err.to_diagnostic().summary, "Update Not Supported");
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_read_and_delete_by_sequence_number() {
        let (mock, client) = mock_client();
        let plan = LicenceRequestModel {
            reference: Some("offline-2".to_string()),
            actions: Some("activate".to_string()),
            ..Default::default()
        };
        let state = LicenceRequestResource.create(&client, plan).await.unwrap();

        let refreshed = LicenceRequestResource.read(&client, state.clone()).await.unwrap();
        assert_eq!(refreshed.reference.as_deref(), Some("offline-2"));

        LicenceRequestResource.delete(&client, state.clone()).await.unwrap();
        assert!(mock.is_empty("licence_request"));
        // Already gone.
        LicenceRequestResource.delete(&client, state).await.unwrap();
    }
}
