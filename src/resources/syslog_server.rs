//! `pexip_infinity_syslog_server`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{
    create_object_id, delete_object, import_error, parse_import_id, read_object,
    required_resource_id, resource_schema, update_object, Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{SyslogServer, SyslogServerRequest};
use crate::infinity::InfinityClient;
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "syslog server";

/// State of a `pexip_infinity_syslog_server`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyslogServerModel {
    /// Resource URI assigned by the node.
    pub id: Option<String>,
    /// Numeric id used in API paths.
    pub resource_id: Option<i64>,
    /// IP address or FQDN of the syslog server.
    pub address: Option<String>,
    /// Port number, 514 by default.
    pub port: Option<i64>,
    /// Free-text description.
    pub description: Option<String>,
    /// Transport protocol.
    pub transport: Option<String>,
    /// Send the audit log.
    pub audit_log: Option<bool>,
    /// Send the support log.
    pub support_log: Option<bool>,
    /// Send the web server log.
    pub web_log: Option<bool>,
}

/// Manages remote syslog targets.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyslogServerResource;

fn request(plan: &SyslogServerModel) -> SyslogServerRequest {
    SyslogServerRequest {
        address: plan.address.clone().unwrap_or_default(),
        port: plan.port,
        description: plan.description.clone(),
        transport: plan.transport.clone(),
        audit_log: plan.audit_log,
        support_log: plan.support_log,
        web_log: plan.web_log,
    }
}

async fn read(client: &InfinityClient, id: i64) -> Result<SyslogServerModel, ProviderError> {
    let server: SyslogServer = read_object(client, WHAT, id).await?;
    Ok(SyslogServerModel {
        id: Some(server.resource_uri),
        resource_id: Some(id),
        address: Some(server.address),
        port: Some(server.port),
        description: Some(server.description),
        transport: Some(server.transport),
        audit_log: Some(server.audit_log),
        support_log: Some(server.support_log),
        web_log: Some(server.web_log),
    })
}

#[async_trait]
impl Resource for SyslogServerResource {
    type Model = SyslogServerModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_syslog_server"
    }

    fn schema(&self) -> Schema {
        resource_schema("Manages a remote syslog server.")
            .with_attribute(
                "address",
                Attribute::required_string()
                    .with_description("IP address or FQDN of the syslog server")
                    .with_validator(Validator::length(1, 255)),
            )
            .with_attribute(
                "port",
                Attribute::optional_int64()
                    .with_default(json!(514))
                    .with_validator(Validator::port()),
            )
            .with_attribute(
                "description",
                Attribute::optional_computed_string().with_validator(Validator::max_length(250)),
            )
            .with_attribute(
                "transport",
                Attribute::optional_string()
                    .with_default(json!("udp"))
                    .with_validator(Validator::one_of(["udp", "tcp", "tls"])),
            )
            .with_attribute(
                "audit_log",
                Attribute::optional_bool()
                    .with_default(json!(false))
                    .with_description("Send the audit log"),
            )
            .with_attribute(
                "support_log",
                Attribute::optional_bool()
                    .with_default(json!(true))
                    .with_description("Send the support log"),
            )
            .with_attribute(
                "web_log",
                Attribute::optional_bool()
                    .with_default(json!(false))
                    .with_description("Send the web server log"),
            )
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: SyslogServerModel,
    ) -> Result<SyslogServerModel, ProviderError> {
        let id = create_object_id::<SyslogServer>(client, WHAT, &request(&plan)).await?;
        read(client, id).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        state: SyslogServerModel,
    ) -> Result<SyslogServerModel, ProviderError> {
        read(client, required_resource_id(state.resource_id)?).await
    }

    async fn update(
        &self,
        client: &InfinityClient,
        prior: SyslogServerModel,
        plan: SyslogServerModel,
    ) -> Result<SyslogServerModel, ProviderError> {
        let id = required_resource_id(prior.resource_id)?;
        update_object::<SyslogServer>(client, WHAT, id, &request(&plan)).await?;
        read(client, id).await
    }

    async fn delete(
        &self,
        client: &InfinityClient,
        state: SyslogServerModel,
    ) -> Result<(), ProviderError> {
        let id = required_resource_id(state.resource_id)?;
        delete_object::<SyslogServer>(client, WHAT, &id.to_string()).await
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        id: &str,
    ) -> Result<SyslogServerModel, ProviderError> {
        let id = parse_import_id(id)?;
        read(client, id).await.map_err(|err| import_error(WHAT, id, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::mock_client;
    use crate::validation::validate;

    #[test]
    fn test_transport_must_be_known() {
        let schema = SyslogServerResource.schema();
        let diagnostics = validate(&schema, &json!({"address": "10.0.0.5", "transport": "quic"}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("transport"));
    }

    #[tokio::test]
    async fn test_log_toggles_round_trip() {
        let (_mock, client) = mock_client();
        let plan = SyslogServerModel {
            address: Some("10.0.0.5".to_string()),
            port: Some(6514),
            transport: Some("tls".to_string()),
            audit_log: Some(true),
            support_log: Some(false),
            web_log: Some(true),
            ..Default::default()
        };

        let state = SyslogServerResource.create(&client, plan).await.unwrap();
        assert_eq!(state.port, Some(6514));
        assert_eq!(state.transport.as_deref(), Some("tls"));
        assert_eq!(state.audit_log, Some(true));
        assert_eq!(state.support_log, Some(false));
        assert_eq!(state.web_log, Some(true));
    }
}
