//! `pexip_infinity_h323_gatekeeper`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{
    create_object_id, delete_object, import_error, parse_import_id, read_object,
    required_resource_id, resource_schema, update_object, Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{H323Gatekeeper, H323GatekeeperRequest};
use crate::infinity::InfinityClient;
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "H.323 gatekeeper";

/// State of a `pexip_infinity_h323_gatekeeper`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct H323GatekeeperModel {
    /// Resource URI assigned by the node.
    pub id: Option<String>,
    /// Numeric id used in API paths.
    pub resource_id: Option<i64>,
    /// Unique name.
    pub name: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Gatekeeper address.
    pub address: Option<String>,
    /// Port number.
    pub port: Option<i64>,
}

/// Manages H.323 gatekeepers.
#[derive(Debug, Clone, Copy, Default)]
pub struct H323GatekeeperResource;

fn request(plan: &H323GatekeeperModel) -> H323GatekeeperRequest {
    H323GatekeeperRequest {
        name: plan.name.clone().unwrap_or_default(),
        address: plan.address.clone().unwrap_or_default(),
        description: plan.description.clone(),
        port: plan.port,
    }
}

async fn read(client: &InfinityClient, id: i64) -> Result<H323GatekeeperModel, ProviderError> {
    let gatekeeper: H323Gatekeeper = read_object(client, WHAT, id).await?;
    Ok(H323GatekeeperModel {
        id: Some(gatekeeper.resource_uri),
        resource_id: Some(id),
        name: Some(gatekeeper.name),
        description: Some(gatekeeper.description),
        address: Some(gatekeeper.address),
        port: Some(gatekeeper.port),
    })
}

#[async_trait]
impl Resource for H323GatekeeperResource {
    type Model = H323GatekeeperModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_h323_gatekeeper"
    }

    fn schema(&self) -> Schema {
        resource_schema("Manages an H.323 gatekeeper used for outbound calls.")
            .with_attribute(
                "name",
                Attribute::required_string().with_validator(Validator::length(1, 250)),
            )
            .with_attribute(
                "description",
                Attribute::optional_computed_string().with_validator(Validator::max_length(250)),
            )
            .with_attribute(
                "address",
                Attribute::required_string().with_validator(Validator::length(1, 255)),
            )
            .with_attribute(
                "port",
                Attribute::optional_int64()
                    .with_default(json!(1719))
                    .with_validator(Validator::port()),
            )
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: H323GatekeeperModel,
    ) -> Result<H323GatekeeperModel, ProviderError> {
        let id = create_object_id::<H323Gatekeeper>(client, WHAT, &request(&plan)).await?;
        read(client, id).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        state: H323GatekeeperModel,
    ) -> Result<H323GatekeeperModel, ProviderError> {
        read(client, required_resource_id(state.resource_id)?).await
    }

    async fn update(
        &self,
        client: &InfinityClient,
        prior: H323GatekeeperModel,
        plan: H323GatekeeperModel,
    ) -> Result<H323GatekeeperModel, ProviderError> {
        let id = required_resource_id(prior.resource_id)?;
        update_object::<H323Gatekeeper>(client, WHAT, id, &request(&plan)).await?;
        read(client, id).await
    }

    async fn delete(
        &self,
        client: &InfinityClient,
        state: H323GatekeeperModel,
    ) -> Result<(), ProviderError> {
        let id = required_resource_id(state.resource_id)?;
        delete_object::<H323Gatekeeper>(client, WHAT, &id.to_string()).await
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        id: &str,
    ) -> Result<H323GatekeeperModel, ProviderError> {
        let id = parse_import_id(id)?;
        read(client, id).await.map_err(|err| import_error(WHAT, id, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;

    #[test]
    fn test_port_out_of_range() {
        let diagnostics = validate(
            &H323GatekeeperResource.schema(),
            &json!({"name": "gk", "address": "10.0.0.8", "port": 70000}),
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("port"));
    }
}
