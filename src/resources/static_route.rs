//! `pexip_infinity_static_route`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    create_object_id, delete_object, import_error, parse_import_id, read_object,
    required_resource_id, resource_schema, update_object, Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{StaticRoute, StaticRouteRequest};
use crate::infinity::InfinityClient;
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "static route";

/// State of a `pexip_infinity_static_route`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticRouteModel {
    /// Resource URI assigned by the node.
    pub id: Option<String>,
    /// Numeric id used in API paths.
    pub resource_id: Option<i64>,
    /// Unique name.
    pub name: Option<String>,
    /// Destination network address.
    pub address: Option<String>,
    /// Destination prefix length.
    pub prefix: Option<i64>,
    /// Next hop.
    pub gateway: Option<String>,
}

/// Manages static routes applied to every node.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticRouteResource;

fn request(plan: &StaticRouteModel) -> StaticRouteRequest {
    StaticRouteRequest {
        name: plan.name.clone().unwrap_or_default(),
        address: plan.address.clone().unwrap_or_default(),
        prefix: plan.prefix.unwrap_or_default(),
        gateway: plan.gateway.clone().unwrap_or_default(),
    }
}

async fn read(client: &InfinityClient, id: i64) -> Result<StaticRouteModel, ProviderError> {
    let route: StaticRoute = read_object(client, WHAT, id).await?;
    Ok(StaticRouteModel {
        id: Some(route.resource_uri),
        resource_id: Some(id),
        name: Some(route.name),
        address: Some(route.address),
        prefix: Some(route.prefix),
        gateway: Some(route.gateway),
    })
}

#[async_trait]
impl Resource for StaticRouteResource {
    type Model = StaticRouteModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_static_route"
    }

    fn schema(&self) -> Schema {
        resource_schema("Manages a static network route.")
            .with_attribute(
                "name",
                Attribute::required_string().with_validator(Validator::length(1, 50)),
            )
            .with_attribute(
                "address",
                Attribute::required_string()
                    .with_description("Destination network address")
                    .with_validator(Validator::IpAddress),
            )
            .with_attribute(
                "prefix",
                Attribute::required_int64()
                    .with_description("Destination prefix length")
                    .with_validator(Validator::range(0, 128)),
            )
            .with_attribute(
                "gateway",
                Attribute::required_string()
                    .with_description("Next hop")
                    .with_validator(Validator::IpAddress),
            )
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: StaticRouteModel,
    ) -> Result<StaticRouteModel, ProviderError> {
        let id = create_object_id::<StaticRoute>(client, WHAT, &request(&plan)).await?;
        read(client, id).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        state: StaticRouteModel,
    ) -> Result<StaticRouteModel, ProviderError> {
        read(client, required_resource_id(state.resource_id)?).await
    }

    async fn update(
        &self,
        client: &InfinityClient,
        prior: StaticRouteModel,
        plan: StaticRouteModel,
    ) -> Result<StaticRouteModel, ProviderError> {
        let id = required_resource_id(prior.resource_id)?;
        update_object::<StaticRoute>(client, WHAT, id, &request(&plan)).await?;
        read(client, id).await
    }

    async fn delete(
        &self,
        client: &InfinityClient,
        state: StaticRouteModel,
    ) -> Result<(), ProviderError> {
        let id = required_resource_id(state.resource_id)?;
        delete_object::<StaticRoute>(client, WHAT, &id.to_string()).await
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        id: &str,
    ) -> Result<StaticRouteModel, ProviderError> {
        let id = parse_import_id(id)?;
        read(client, id).await.map_err(|err| import_error(WHAT, id, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;
    use serde_json::json;

    #[test]
    fn test_prefix_and_gateway_are_checked() {
        let schema = StaticRouteResource.schema();
        let diagnostics = validate(
            &schema,
            &json!({"name": "r", "address": "10.1.0.0", "prefix": 129, "gateway": "router"}),
        );
        let mut paths: Vec<_> = diagnostics
            .iter()
            .filter_map(|d| d.attribute.as_deref())
            .collect();
        paths.sort_unstable();
        assert_eq!(paths, vec!["gateway", "prefix"]);
    }
}
