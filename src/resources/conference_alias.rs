//! `pexip_infinity_conference_alias`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    create_object_id, delete_object, import_error, parse_import_id, read_object,
    required_resource_id, resource_schema, update_object, Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{ConferenceAlias, ConferenceAliasRequest};
use crate::infinity::InfinityClient;
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "conference alias";

/// State of a `pexip_infinity_conference_alias`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConferenceAliasModel {
    /// Resource URI assigned by the node.
    pub id: Option<String>,
    /// Numeric id used in API paths.
    pub resource_id: Option<i64>,
    /// The dialable alias, e.g. meet@example.com.
    pub alias: Option<String>,
    /// Resource URI of the conference this alias dials into.
    pub conference: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
}

/// Manages the dialable aliases of a conference.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConferenceAliasResource;

fn request(plan: &ConferenceAliasModel) -> ConferenceAliasRequest {
    ConferenceAliasRequest {
        alias: plan.alias.clone().unwrap_or_default(),
        conference: plan.conference.clone().unwrap_or_default(),
        description: plan.description.clone(),
    }
}

async fn read(client: &InfinityClient, id: i64) -> Result<ConferenceAliasModel, ProviderError> {
    let alias: ConferenceAlias = read_object(client, WHAT, id).await?;
    Ok(ConferenceAliasModel {
        id: Some(alias.resource_uri),
        resource_id: Some(id),
        alias: Some(alias.alias),
        conference: alias.conference,
        description: Some(alias.description),
    })
}

#[async_trait]
impl Resource for ConferenceAliasResource {
    type Model = ConferenceAliasModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_conference_alias"
    }

    fn schema(&self) -> Schema {
        resource_schema("Manages an alias that participants dial to reach a conference.")
            .with_attribute(
                "alias",
                Attribute::required_string()
                    .with_description("The dialable alias, e.g. meet@example.com")
                    .with_validator(Validator::length(1, 250)),
            )
            .with_attribute(
                "conference",
                Attribute::required_string()
                    .with_description("Resource URI of the conference"),
            )
            .with_attribute(
                "description",
                Attribute::optional_computed_string().with_validator(Validator::max_length(250)),
            )
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: ConferenceAliasModel,
    ) -> Result<ConferenceAliasModel, ProviderError> {
        let id = create_object_id::<ConferenceAlias>(client, WHAT, &request(&plan)).await?;
        read(client, id).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        state: ConferenceAliasModel,
    ) -> Result<ConferenceAliasModel, ProviderError> {
        read(client, required_resource_id(state.resource_id)?).await
    }

    async fn update(
        &self,
        client: &InfinityClient,
        prior: ConferenceAliasModel,
        plan: ConferenceAliasModel,
    ) -> Result<ConferenceAliasModel, ProviderError> {
        let id = required_resource_id(prior.resource_id)?;
        update_object::<ConferenceAlias>(client, WHAT, id, &request(&plan)).await?;
        read(client, id).await
    }

    async fn delete(
        &self,
        client: &InfinityClient,
        state: ConferenceAliasModel,
    ) -> Result<(), ProviderError> {
        let id = required_resource_id(state.resource_id)?;
        delete_object::<ConferenceAlias>(client, WHAT, &id.to_string()).await
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        id: &str,
    ) -> Result<ConferenceAliasModel, ProviderError> {
        let id = parse_import_id(id)?;
        read(client, id).await.map_err(|err| import_error(WHAT, id, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::mock_client;
    use serde_json::json;

    #[tokio::test]
    async fn test_inline_conference_is_read_as_uri() {
        let (mock, client) = mock_client();
        mock.insert(
            "conference_alias",
            json!({
                "alias": "meet@example.com",
                "conference": {
                    "id": 5,
                    "name": "vmr",
                    "resource_uri": "/api/admin/configuration/v1/conference/5/"
                }
            }),
        );

        let state = ConferenceAliasResource.import_state(&client, "1").await.unwrap();
        assert_eq!(
            state.conference.as_deref(),
            Some("/api/admin/configuration/v1/conference/5/")
        );
        assert_eq!(state.description.as_deref(), Some(""));
    }
}
