//! `pexip_infinity_event_sink`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{
    create_object_id, delete_object, import_error, parse_import_id, read_object,
    required_resource_id, resource_schema, update_object, Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{EventSink, EventSinkRequest};
use crate::infinity::InfinityClient;
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "event sink";

/// State of a `pexip_infinity_event_sink`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSinkModel {
    /// Resource URI assigned by the node.
    pub id: Option<String>,
    /// Numeric id used in API paths.
    pub resource_id: Option<i64>,
    /// Unique name.
    pub name: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// URL events are POSTed to.
    pub url: Option<String>,
    /// Username for authentication.
    pub username: Option<String>,
    /// Write-only.
    pub password: Option<String>,
    /// Send events in batches.
    pub bulk_support: Option<bool>,
    /// Verify the server certificate.
    pub verify_tls_certificate: Option<bool>,
    /// Event format version.
    pub version: Option<i64>,
}

/// Manages event sinks that receive conference events over HTTP.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventSinkResource;

fn request(plan: &EventSinkModel) -> EventSinkRequest {
    EventSinkRequest {
        name: plan.name.clone().unwrap_or_default(),
        url: plan.url.clone().unwrap_or_default(),
        description: plan.description.clone(),
        username: plan.username.clone(),
        password: plan.password.clone(),
        bulk_support: plan.bulk_support,
        verify_tls_certificate: plan.verify_tls_certificate,
        version: plan.version,
    }
}

async fn read(
    client: &InfinityClient,
    id: i64,
    known: &EventSinkModel,
) -> Result<EventSinkModel, ProviderError> {
    let sink: EventSink = read_object(client, WHAT, id).await?;
    Ok(EventSinkModel {
        id: Some(sink.resource_uri),
        resource_id: Some(id),
        name: Some(sink.name),
        description: Some(sink.description),
        url: Some(sink.url),
        username: Some(sink.username),
        password: known.password.clone(),
        bulk_support: Some(sink.bulk_support),
        verify_tls_certificate: Some(sink.verify_tls_certificate),
        version: Some(sink.version),
    })
}

#[async_trait]
impl Resource for EventSinkResource {
    type Model = EventSinkModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_event_sink"
    }

    fn schema(&self) -> Schema {
        resource_schema("Manages an event sink.")
            .with_attribute(
                "name",
                Attribute::required_string().with_validator(Validator::length(1, 250)),
            )
            .with_attribute(
                "description",
                Attribute::optional_computed_string().with_validator(Validator::max_length(250)),
            )
            .with_attribute(
                "url",
                Attribute::required_string()
                    .with_description("URL events are POSTed to")
                    .with_validator(Validator::Url),
            )
            .with_attribute(
                "username",
                Attribute::optional_computed_string().with_validator(Validator::max_length(100)),
            )
            .with_attribute(
                "password",
                Attribute::optional_string()
                    .sensitive()
                    .with_validator(Validator::max_length(100)),
            )
            .with_attribute("bulk_support", Attribute::optional_computed_bool())
            .with_attribute(
                "verify_tls_certificate",
                Attribute::optional_bool().with_default(json!(true)),
            )
            .with_attribute(
                "version",
                Attribute::optional_int64()
                    .with_default(json!(2))
                    .with_description("Event format version")
                    .with_validator(Validator::range(1, 2)),
            )
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: EventSinkModel,
    ) -> Result<EventSinkModel, ProviderError> {
        let id = create_object_id::<EventSink>(client, WHAT, &request(&plan)).await?;
        read(client, id, &plan).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        state: EventSinkModel,
    ) -> Result<EventSinkModel, ProviderError> {
        read(client, required_resource_id(state.resource_id)?, &state).await
    }

    async fn update(
        &self,
        client: &InfinityClient,
        prior: EventSinkModel,
        plan: EventSinkModel,
    ) -> Result<EventSinkModel, ProviderError> {
        let id = required_resource_id(prior.resource_id)?;
        update_object::<EventSink>(client, WHAT, id, &request(&plan)).await?;
        read(client, id, &plan).await
    }

    async fn delete(
        &self,
        client: &InfinityClient,
        state: EventSinkModel,
    ) -> Result<(), ProviderError> {
        let id = required_resource_id(state.resource_id)?;
        delete_object::<EventSink>(client, WHAT, &id.to_string()).await
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        id: &str,
    ) -> Result<EventSinkModel, ProviderError> {
        let id = parse_import_id(id)?;
        read(client, id, &EventSinkModel::default())
            .await
            .map_err(|err| import_error(WHAT, id, err))
    }
}
