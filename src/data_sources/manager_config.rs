//! `pexip_infinity_manager_config`: the bootstrap document for a new
//! management node.
//!
//! The document is what the node's installer reads on first boot. It is
//! rendered as JSON under a `management_node_config` key.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::DataSourceHandler;
use crate::error::ProviderError;
use crate::schema::{Attribute, Schema, Validator};
use crate::validation::validate_result;

/// Configuration and state of `pexip_infinity_manager_config`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfigModel {
    /// Hostname of the node, set on read.
    pub id: Option<String>,
    /// Management node hostname.
    pub hostname: Option<String>,
    /// DNS domain.
    pub domain: Option<String>,
    /// IPv4 address.
    pub ip: Option<String>,
    /// Network mask.
    pub mask: Option<String>,
    /// Default gateway.
    pub gw: Option<String>,
    /// DNS server address.
    pub dns: Option<String>,
    /// NTP server address.
    pub ntp: Option<String>,
    /// Web administrator username.
    pub user: Option<String>,
    /// Web administrator password.
    pub pass: Option<String>,
    /// OS administrator password.
    pub admin_password: Option<String>,
    /// Send incident reports.
    pub error_reports: Option<bool>,
    /// Send usage statistics.
    pub enable_analytics: Option<bool>,
    /// Contact for incident reports.
    pub contact_email_address: Option<String>,
    /// Rendered bootstrap document.
    pub rendered: Option<String>,
}

/// Renders management node bootstrap configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManagerConfigDataSource;

impl ManagerConfigDataSource {
    fn render(model: &ManagerConfigModel) -> Result<String, ProviderError> {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let document = json!({
            "management_node_config": {
                "hostname": text(&model.hostname),
                "domain": text(&model.domain),
                "ip": text(&model.ip),
                "mask": text(&model.mask),
                "gw": text(&model.gw),
                "dns": text(&model.dns),
                "ntp": text(&model.ntp),
                "user": text(&model.user),
                "pass": text(&model.pass),
                "admin_password": text(&model.admin_password),
                "error_reports": model.error_reports.unwrap_or(false),
                "enable_analytics": model.enable_analytics.unwrap_or(false),
                "contact_email_address": text(&model.contact_email_address),
            }
        });
        Ok(serde_json::to_string(&document)?)
    }
}

fn ip() -> Attribute {
    Attribute::required_string().with_validator(Validator::IpAddress)
}

#[async_trait]
impl DataSourceHandler for ManagerConfigDataSource {
    fn type_name(&self) -> &'static str {
        "pexip_infinity_manager_config"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("Renders the bootstrap configuration of a management node.")
            .with_attribute(
                "id",
                Attribute::computed_string().with_description("The hostname"),
            )
            .with_attribute(
                "hostname",
                Attribute::required_string().with_validator(Validator::length(1, 63)),
            )
            .with_attribute(
                "domain",
                Attribute::required_string().with_validator(Validator::length(1, 192)),
            )
            .with_attribute("ip", ip().with_description("Management node IP address"))
            .with_attribute("mask", ip().with_description("Network mask"))
            .with_attribute("gw", ip().with_description("Default gateway"))
            .with_attribute("dns", ip().with_description("DNS server"))
            .with_attribute(
                "ntp",
                Attribute::required_string().with_description("NTP server"),
            )
            .with_attribute(
                "user",
                Attribute::required_string().with_description("Web administrator username"),
            )
            .with_attribute(
                "pass",
                Attribute::required_string()
                    .sensitive()
                    .with_description("Web administrator password"),
            )
            .with_attribute(
                "admin_password",
                Attribute::required_string()
                    .sensitive()
                    .with_description("Console administrator password"),
            )
            .with_attribute(
                "error_reports",
                Attribute::optional_bool().with_default(json!(false)),
            )
            .with_attribute(
                "enable_analytics",
                Attribute::optional_bool().with_default(json!(false)),
            )
            .with_attribute("contact_email_address", Attribute::optional_string())
            .with_attribute(
                "rendered",
                Attribute::computed_string()
                    .sensitive()
                    .with_description("The bootstrap document as JSON"),
            )
    }

    async fn read(&self, config: Value) -> Result<Value, ProviderError> {
        validate_result(&self.schema(), &config).map_err(|diagnostics| {
            let detail = diagnostics
                .iter()
                .map(|d| d.detail.clone().unwrap_or_else(|| d.summary.clone()))
                .collect::<Vec<_>>()
                .join("; ");
            ProviderError::Validation(detail)
        })?;

        let mut model: ManagerConfigModel = serde_json::from_value(config)?;
        model.error_reports.get_or_insert(false);
        model.enable_analytics.get_or_insert(false);
        model.rendered = Some(Self::render(&model)?);
        model.id = model.hostname.clone();
        debug!(hostname = ?model.hostname, "rendered management node configuration");

        Ok(serde_json::to_value(model)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Value {
        json!({
            "hostname": "manager",
            "domain": "example.com",
            "ip": "10.0.0.2",
            "mask": "255.255.255.0",
            "gw": "10.0.0.1",
            "dns": "10.0.0.53",
            "ntp": "pool.ntp.org",
            "user": "admin",
            "pass": "web-secret",
            "admin_password": "console-secret",
        })
    }

    #[tokio::test]
    async fn test_renders_bootstrap_document() {
        let state = ManagerConfigDataSource.read(config()).await.unwrap();

        assert_eq!(state["id"], "manager");
        assert_eq!(state["error_reports"], false);

        let rendered: Value = serde_json::from_str(state["rendered"].as_str().unwrap()).unwrap();
        let node = &rendered["management_node_config"];
        assert_eq!(node["hostname"], "manager");
        assert_eq!(node["gw"], "10.0.0.1");
        assert_eq!(node["pass"], "web-secret");
        assert_eq!(node["enable_analytics"], false);
        assert_eq!(node["contact_email_address"], "");
    }

    #[tokio::test]
    async fn test_rejects_bad_ip() {
        let mut bad = config();
        bad["gw"] = json!("10.0.0");

        let err = ManagerConfigDataSource.read(bad).await.unwrap_err();
        assert!(matches!(err, ProviderError::Validation(_)));
        assert!(err.to_string().contains("gw"));
    }

    #[test]
    fn test_secrets_are_sensitive() {
        let schema = ManagerConfigDataSource.schema();
        assert_eq!(
            schema.sensitive_attributes(),
            vec!["admin_password", "pass", "rendered"]
        );
    }
}
