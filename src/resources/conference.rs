//! `pexip_infinity_conference`: a virtual meeting room or other conferencing
//! service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{
    create_object_id, delete_object, import_error, parse_import_id, read_object,
    required_resource_id, resource_schema, update_object, Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{Conference, ConferenceRequest};
use crate::infinity::InfinityClient;
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "conference";

/// Accepted `service_type` values.
pub const SERVICE_TYPES: [&str; 5] = [
    "conference",
    "lecture",
    "two_stage_dialing",
    "test_call",
    "media_playback",
];

/// State of a `pexip_infinity_conference`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConferenceModel {
    /// Resource URI assigned by the node.
    pub id: Option<String>,
    /// Numeric id used in API paths.
    pub resource_id: Option<i64>,
    /// Unique name of the service.
    pub name: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Kind of service.
    pub service_type: Option<String>,
    /// Host PIN. Write-only.
    pub pin: Option<String>,
    /// Guest PIN. Write-only.
    pub guest_pin: Option<String>,
    /// Allow guests to join.
    pub allow_guests: Option<bool>,
    /// Allow guests to present content.
    pub guests_can_present: Option<bool>,
    /// Maximum number of participants, unlimited when unset.
    pub participant_limit: Option<i64>,
    /// Free-text tag for grouping.
    pub tag: Option<String>,
}

/// Manages conferences.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConferenceResource;

fn request(plan: &ConferenceModel) -> ConferenceRequest {
    ConferenceRequest {
        name: plan.name.clone().unwrap_or_default(),
        description: plan.description.clone(),
        service_type: plan.service_type.clone(),
        pin: plan.pin.clone(),
        guest_pin: plan.guest_pin.clone(),
        allow_guests: plan.allow_guests,
        guests_can_present: plan.guests_can_present,
        participant_limit: plan.participant_limit,
        tag: plan.tag.clone(),
    }
}

async fn read(
    client: &InfinityClient,
    id: i64,
    known: &ConferenceModel,
) -> Result<ConferenceModel, ProviderError> {
    let conference: Conference = read_object(client, WHAT, id).await?;
    Ok(ConferenceModel {
        id: Some(conference.resource_uri),
        resource_id: Some(id),
        name: Some(conference.name),
        description: Some(conference.description),
        service_type: Some(conference.service_type),
        pin: known.pin.clone(),
        guest_pin: known.guest_pin.clone(),
        allow_guests: Some(conference.allow_guests),
        guests_can_present: Some(conference.guests_can_present),
        participant_limit: conference.participant_limit,
        tag: Some(conference.tag),
    })
}

#[async_trait]
impl Resource for ConferenceResource {
    type Model = ConferenceModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_conference"
    }

    fn schema(&self) -> Schema {
        resource_schema("Manages a conference (virtual meeting room, lecture, test call...).")
            .with_attribute(
                "name",
                Attribute::required_string()
                    .with_description("Unique name of the service")
                    .with_validator(Validator::length(1, 250)),
            )
            .with_attribute(
                "description",
                Attribute::optional_computed_string().with_validator(Validator::max_length(250)),
            )
            .with_attribute(
                "service_type",
                Attribute::optional_string()
                    .with_default(json!("conference"))
                    .with_validator(Validator::one_of(SERVICE_TYPES)),
            )
            .with_attribute(
                "pin",
                Attribute::optional_string()
                    .sensitive()
                    .with_description("Host PIN")
                    .with_validator(Validator::length(4, 20)),
            )
            .with_attribute(
                "guest_pin",
                Attribute::optional_string()
                    .sensitive()
                    .with_description("Guest PIN")
                    .with_validator(Validator::length(4, 20)),
            )
            .with_attribute("allow_guests", Attribute::optional_computed_bool())
            .with_attribute("guests_can_present", Attribute::optional_computed_bool())
            .with_attribute(
                "participant_limit",
                Attribute::optional_int64()
                    .with_description("Maximum number of participants, unlimited when unset")
                    .with_validator(Validator::range(0, 1_000_000)),
            )
            .with_attribute(
                "tag",
                Attribute::optional_computed_string().with_validator(Validator::max_length(250)),
            )
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: ConferenceModel,
    ) -> Result<ConferenceModel, ProviderError> {
        let id = create_object_id::<Conference>(client, WHAT, &request(&plan)).await?;
        read(client, id, &plan).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        state: ConferenceModel,
    ) -> Result<ConferenceModel, ProviderError> {
        read(client, required_resource_id(state.resource_id)?, &state).await
    }

    async fn update(
        &self,
        client: &InfinityClient,
        prior: ConferenceModel,
        plan: ConferenceModel,
    ) -> Result<ConferenceModel, ProviderError> {
        let id = required_resource_id(prior.resource_id)?;
        update_object::<Conference>(client, WHAT, id, &request(&plan)).await?;
        read(client, id, &plan).await
    }

    async fn delete(
        &self,
        client: &InfinityClient,
        state: ConferenceModel,
    ) -> Result<(), ProviderError> {
        let id = required_resource_id(state.resource_id)?;
        delete_object::<Conference>(client, WHAT, &id.to_string()).await
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        id: &str,
    ) -> Result<ConferenceModel, ProviderError> {
        let id = parse_import_id(id)?;
        read(client, id, &ConferenceModel::default())
            .await
            .map_err(|err| import_error(WHAT, id, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::mock_client;
    use crate::validation::validate;

    #[test]
    fn test_service_type_is_enumerated() {
        let schema = ConferenceResource.schema();
        assert!(validate(&schema, &json!({"name": "vmr", "service_type": "lecture"})).is_empty());

        let diagnostics = validate(&schema, &json!({"name": "vmr", "service_type": "webinar"}));
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("service_type"));
    }

    #[tokio::test]
    async fn test_pins_survive_refresh_and_import_drops_them() {
        let (mock, client) = mock_client();
        let plan = ConferenceModel {
            name: Some("Board".to_string()),
            pin: Some("1234".to_string()),
            guest_pin: Some("5678".to_string()),
            participant_limit: Some(10),
            ..Default::default()
        };

        let state = ConferenceResource.create(&client, plan).await.unwrap();
        assert_eq!(mock.object("conference", "1").unwrap()["guest_pin"], "5678");

        let refreshed = ConferenceResource.read(&client, state.clone()).await.unwrap();
        assert_eq!(refreshed.pin.as_deref(), Some("1234"));
        assert_eq!(refreshed.guest_pin.as_deref(), Some("5678"));
        assert_eq!(refreshed.participant_limit, Some(10));

        let imported = ConferenceResource.import_state(&client, "1").await.unwrap();
        assert_eq!(imported.pin, None);
        assert_eq!(imported.name.as_deref(), Some("Board"));
    }
}
