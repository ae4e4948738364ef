//! `pexip_infinity_smtp_server`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{
    create_object_id, delete_object, import_error, parse_import_id, read_object,
    required_resource_id, resource_schema, update_object, Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{SmtpServer, SmtpServerRequest};
use crate::infinity::InfinityClient;
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "SMTP server";

/// State of a `pexip_infinity_smtp_server`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpServerModel {
    /// Resource URI assigned by the node.
    pub id: Option<String>,
    /// Numeric id used in API paths.
    pub resource_id: Option<i64>,
    /// Unique name.
    pub name: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Hostname or IP address of the mail server.
    pub address: Option<String>,
    /// Port number.
    pub port: Option<i64>,
    /// Username for authentication.
    pub username: Option<String>,
    /// Write-only.
    pub password: Option<String>,
    /// Sender address.
    pub from_email_address: Option<String>,
    /// Connection security mode.
    pub connection_security: Option<String>,
}

/// Manages outbound mail servers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpServerResource;

fn request(plan: &SmtpServerModel) -> SmtpServerRequest {
    SmtpServerRequest {
        name: plan.name.clone().unwrap_or_default(),
        address: plan.address.clone().unwrap_or_default(),
        description: plan.description.clone(),
        port: plan.port,
        username: plan.username.clone(),
        password: plan.password.clone(),
        from_email_address: plan.from_email_address.clone(),
        connection_security: plan.connection_security.clone(),
    }
}

async fn read(
    client: &InfinityClient,
    id: i64,
    known: &SmtpServerModel,
) -> Result<SmtpServerModel, ProviderError> {
    let server: SmtpServer = read_object(client, WHAT, id).await?;
    Ok(SmtpServerModel {
        id: Some(server.resource_uri),
        resource_id: Some(id),
        name: Some(server.name),
        description: Some(server.description),
        address: Some(server.address),
        port: Some(server.port),
        username: Some(server.username),
        password: known.password.clone(),
        from_email_address: Some(server.from_email_address),
        connection_security: Some(server.connection_security),
    })
}

#[async_trait]
impl Resource for SmtpServerResource {
    type Model = SmtpServerModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_smtp_server"
    }

    fn schema(&self) -> Schema {
        resource_schema("Manages an SMTP server used to send email.")
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
                    .with_description("Hostname or IP address of the mail server")
                    .with_validator(Validator::length(1, 255)),
            )
            .with_attribute(
                "port",
                Attribute::optional_int64()
                    .with_default(json!(587))
                    .with_validator(Validator::port()),
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
            .with_attribute(
                "from_email_address",
                Attribute::optional_computed_string().with_validator(Validator::max_length(100)),
            )
            .with_attribute(
                "connection_security",
                Attribute::optional_string()
                    .with_default(json!("NONE"))
                    .with_validator(Validator::one_of(["NONE", "STARTTLS", "SSL_TLS"])),
            )
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: SmtpServerModel,
    ) -> Result<SmtpServerModel, ProviderError> {
        let id = create_object_id::<SmtpServer>(client, WHAT, &request(&plan)).await?;
        read(client, id, &plan).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        state: SmtpServerModel,
    ) -> Result<SmtpServerModel, ProviderError> {
        read(client, required_resource_id(state.resource_id)?, &state).await
    }

    async fn update(
        &self,
        client: &InfinityClient,
        prior: SmtpServerModel,
        plan: SmtpServerModel,
    ) -> Result<SmtpServerModel, ProviderError> {
        let id = required_resource_id(prior.resource_id)?;
        update_object::<SmtpServer>(client, WHAT, id, &request(&plan)).await?;
        read(client, id, &plan).await
    }

    async fn delete(
        &self,
        client: &InfinityClient,
        state: SmtpServerModel,
    ) -> Result<(), ProviderError> {
        let id = required_resource_id(state.resource_id)?;
        delete_object::<SmtpServer>(client, WHAT, &id.to_string()).await
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        id: &str,
    ) -> Result<SmtpServerModel, ProviderError> {
        let id = parse_import_id(id)?;
        read(client, id, &SmtpServerModel::default())
            .await
            .map_err(|err| import_error(WHAT, id, err))
    }
}
