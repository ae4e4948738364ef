//! `pexip_infinity_sip_proxy`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{
    create_object_id, delete_object, import_error, parse_import_id, read_object,
    required_resource_id, resource_schema, update_object, Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{SipProxy, SipProxyRequest};
use crate::infinity::InfinityClient;
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "SIP proxy";

/// State of a `pexip_infinity_sip_proxy`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SipProxyModel {
    /// Resource URI assigned by the node.
    pub id: Option<String>,
    /// Numeric id used in API paths.
    pub resource_id: Option<i64>,
    /// Unique name.
    pub name: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Hostname or IP address of the proxy.
    pub address: Option<String>,
    /// Port number.
    pub port: Option<i64>,
    /// Transport protocol.
    pub transport: Option<String>,
}

/// Manages outbound SIP proxies.
#[derive(Debug, Clone, Copy, Default)]
pub struct SipProxyResource;

fn request(plan: &SipProxyModel) -> SipProxyRequest {
    SipProxyRequest {
        name: plan.name.clone().unwrap_or_default(),
        address: plan.address.clone().unwrap_or_default(),
        description: plan.description.clone(),
        port: plan.port,
        transport: plan.transport.clone(),
    }
}

async fn read(client: &InfinityClient, id: i64) -> Result<SipProxyModel, ProviderError> {
    let proxy: SipProxy = read_object(client, WHAT, id).await?;
    Ok(SipProxyModel {
        id: Some(proxy.resource_uri),
        resource_id: Some(id),
        name: Some(proxy.name),
        description: Some(proxy.description),
        address: Some(proxy.address),
        port: Some(proxy.port),
        transport: Some(proxy.transport),
    })
}

#[async_trait]
impl Resource for SipProxyResource {
    type Model = SipProxyModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_sip_proxy"
    }

    fn schema(&self) -> Schema {
        resource_schema("Manages a SIP proxy used for outbound calls.")
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
                Attribute::required_string()
                    .with_description("Hostname or IP address of the proxy")
                    .with_validator(Validator::length(1, 255)),
            )
            .with_attribute(
                "port",
                Attribute::optional_int64()
                    .with_default(json!(5060))
                    .with_validator(Validator::port()),
            )
            .with_attribute(
                "transport",
                Attribute::optional_string()
                    .with_default(json!("tcp"))
                    .with_validator(Validator::one_of(["tcp", "udp", "tls"])),
            )
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: SipProxyModel,
    ) -> Result<SipProxyModel, ProviderError> {
        let id = create_object_id::<SipProxy>(client, WHAT, &request(&plan)).await?;
        read(client, id).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        state: SipProxyModel,
    ) -> Result<SipProxyModel, ProviderError> {
        read(client, required_resource_id(state.resource_id)?).await
    }

    async fn update(
        &self,
        client: &InfinityClient,
        prior: SipProxyModel,
        plan: SipProxyModel,
    ) -> Result<SipProxyModel, ProviderError> {
        let id = required_resource_id(prior.resource_id)?;
        update_object::<SipProxy>(client, WHAT, id, &request(&plan)).await?;
        read(client, id).await
    }

    async fn delete(
        &self,
        client: &InfinityClient,
        state: SipProxyModel,
    ) -> Result<(), ProviderError> {
        let id = required_resource_id(state.resource_id)?;
        delete_object::<SipProxy>(client, WHAT, &id.to_string()).await
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        id: &str,
    ) -> Result<SipProxyModel, ProviderError> {
        let id = parse_import_id(id)?;
        read(client, id).await.map_err(|err| import_error(WHAT, id, err))
    }
}
