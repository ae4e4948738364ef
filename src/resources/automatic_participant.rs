//! `pexip_infinity_automatic_participant`: an endpoint dialled out to when a
//! conference starts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{
    create_object_id, delete_object, import_error, parse_import_id, read_object,
    required_resource_id, resource_schema, update_object, Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{AutomaticParticipant, AutomaticParticipantRequest};
use crate::infinity::InfinityClient;
use crate::schema::{Attribute, AttributeFlags, AttributeType, Schema, Validator};

const WHAT: &str = "automatic participant";

/// State of a `pexip_infinity_automatic_participant`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomaticParticipantModel {
    /// Resource URI assigned by the node.
    pub id: Option<String>,
    /// Numeric id used in API paths.
    pub resource_id: Option<i64>,
    /// Alias of the endpoint to dial.
    pub alias: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Resource URIs of the conferences that dial this participant.
    pub conference: Option<Vec<String>>,
    /// Dial-out protocol.
    pub protocol: Option<String>,
    /// Call capability.
    pub call_type: Option<String>,
    /// Participant role.
    pub role: Option<String>,
    /// DTMF digits sent on connect.
    pub dtmf_sequence: Option<String>,
    /// Whether this participant keeps the conference running.
    pub keep_conference_alive: Option<String>,
    /// Routing mode for the dial-out.
    pub routing: Option<String>,
    /// Resource URI of the location to dial from.
    pub system_location: Option<String>,
    /// Whether the participant is a streaming endpoint.
    pub streaming: Option<bool>,
    /// Display name shown for the participant.
    pub remote_display_name: Option<String>,
}

/// Manages automatically dialled participants.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutomaticParticipantResource;

fn request(plan: &AutomaticParticipantModel) -> AutomaticParticipantRequest {
    AutomaticParticipantRequest {
        alias: plan.alias.clone().unwrap_or_default(),
        conference: plan.conference.clone().unwrap_or_default(),
        description: plan.description.clone(),
        protocol: plan.protocol.clone(),
        call_type: plan.call_type.clone(),
        role: plan.role.clone(),
        dtmf_sequence: plan.dtmf_sequence.clone(),
        keep_conference_alive: plan.keep_conference_alive.clone(),
        routing: plan.routing.clone(),
        system_location: plan.system_location.clone(),
        streaming: plan.streaming,
        remote_display_name: plan.remote_display_name.clone(),
    }
}

async fn read(
    client: &InfinityClient,
    id: i64,
) -> Result<AutomaticParticipantModel, ProviderError> {
    let participant: AutomaticParticipant = read_object(client, WHAT, id).await?;
    Ok(AutomaticParticipantModel {
        id: Some(participant.resource_uri),
        resource_id: Some(id),
        alias: Some(participant.alias),
        description: Some(participant.description),
        conference: Some(participant.conference),
        protocol: Some(participant.protocol),
        call_type: Some(participant.call_type),
        role: Some(participant.role),
        dtmf_sequence: Some(participant.dtmf_sequence),
        keep_conference_alive: Some(participant.keep_conference_alive),
        routing: Some(participant.routing),
        system_location: participant.system_location,
        streaming: Some(participant.streaming),
        remote_display_name: Some(participant.remote_display_name),
    })
}

#[async_trait]
impl Resource for AutomaticParticipantResource {
    type Model = AutomaticParticipantModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_automatic_participant"
    }

    fn schema(&self) -> Schema {
        resource_schema("Manages a participant that is dialled automatically into conferences.")
            .with_attribute(
                "alias",
                Attribute::required_string()
                    .with_description("Alias of the endpoint to dial")
                    .with_validator(Validator::length(1, 250)),
            )
            .with_attribute(
                "description",
                Attribute::optional_computed_string().with_validator(Validator::max_length(250)),
            )
            .with_attribute(
                "conference",
                Attribute::new(
                    AttributeType::list(AttributeType::String),
                    AttributeFlags::required(),
                )
                .with_description("Resource URIs of the conferences"),
            )
            .with_attribute(
                "protocol",
                Attribute::optional_string()
                    .with_default(json!("sip"))
                    .with_validator(Validator::one_of(["sip", "h323", "rtmp", "mssip", "auto"])),
            )
            .with_attribute(
                "call_type",
                Attribute::optional_string()
                    .with_default(json!("video"))
                    .with_validator(Validator::one_of(["video", "video-only", "audio"])),
            )
            .with_attribute(
                "role",
                Attribute::optional_string()
                    .with_default(json!("guest"))
                    .with_validator(Validator::one_of(["chair", "guest"])),
            )
            .with_attribute(
                "dtmf_sequence",
                Attribute::optional_computed_string().with_validator(Validator::max_length(250)),
            )
            .with_attribute(
                "keep_conference_alive",
                Attribute::optional_string()
                    .with_default(json!("keep_conference_alive_if_multiple"))
                    .with_validator(Validator::one_of([
                        "keep_conference_alive",
                        "keep_conference_alive_if_multiple",
                        "keep_conference_alive_never",
                    ])),
            )
            .with_attribute(
                "routing",
                Attribute::optional_string()
                    .with_default(json!("manual"))
                    .with_validator(Validator::one_of(["manual", "routing_rule"])),
            )
            .with_attribute(
                "system_location",
                Attribute::optional_string()
                    .with_description("Resource URI of the location to dial from"),
            )
            .with_attribute("streaming", Attribute::optional_computed_bool())
            .with_attribute(
                "remote_display_name",
                Attribute::optional_computed_string().with_validator(Validator::max_length(250)),
            )
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: AutomaticParticipantModel,
    ) -> Result<AutomaticParticipantModel, ProviderError> {
        let id = create_object_id::<AutomaticParticipant>(client, WHAT, &request(&plan)).await?;
        read(client, id).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        state: AutomaticParticipantModel,
    ) -> Result<AutomaticParticipantModel, ProviderError> {
        read(client, required_resource_id(state.resource_id)?).await
    }

    async fn update(
        &self,
        client: &InfinityClient,
        prior: AutomaticParticipantModel,
        plan: AutomaticParticipantModel,
    ) -> Result<AutomaticParticipantModel, ProviderError> {
        let id = required_resource_id(prior.resource_id)?;
        update_object::<AutomaticParticipant>(client, WHAT, id, &request(&plan)).await?;
        read(client, id).await
    }

    async fn delete(
        &self,
        client: &InfinityClient,
        state: AutomaticParticipantModel,
    ) -> Result<(), ProviderError> {
        let id = required_resource_id(state.resource_id)?;
        delete_object::<AutomaticParticipant>(client, WHAT, &id.to_string()).await
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        id: &str,
    ) -> Result<AutomaticParticipantModel, ProviderError> {
        let id = parse_import_id(id)?;
        read(client, id).await.map_err(|err| import_error(WHAT, id, err))
    }
}
