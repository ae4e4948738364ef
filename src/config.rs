//! Provider block configuration.
//!
//! Every setting can come from the provider block or, when the block leaves
//! it unset, from the environment:
//!
//! | attribute         | environment variable        |
//! |-------------------|-----------------------------|
//! | `address`         | `PEXIP_INFINITY_ADDRESS`    |
//! | `username`        | `PEXIP_INFINITY_USERNAME`   |
//! | `password`        | `PEXIP_INFINITY_PASSWORD`   |
//! | `insecure`        | `PEXIP_INFINITY_INSECURE`   |
//!
//! `timeout_seconds` has no environment fallback.

use std::fmt;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ProviderError;
use crate::infinity::{ClientConfig, DEFAULT_TIMEOUT_SECONDS};
use crate::schema::{Attribute, Diagnostic, Schema, Validator};
use crate::validation::validate;

/// Environment variable for `address`.
pub const ENV_ADDRESS: &str = "PEXIP_INFINITY_ADDRESS";
/// Environment variable for `username`.
pub const ENV_USERNAME: &str = "PEXIP_INFINITY_USERNAME";
/// Environment variable for `password`.
pub const ENV_PASSWORD: &str = "PEXIP_INFINITY_PASSWORD";
/// Environment variable for `insecure`.
pub const ENV_INSECURE: &str = "PEXIP_INFINITY_INSECURE";

const MAX_TIMEOUT_SECONDS: i64 = 600;

/// Settings from the provider block, after environment fallbacks.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Management node base URL.
    pub address: Option<String>,
    /// Administrator username.
    pub username: Option<String>,
    /// Administrator password.
    pub password: Option<String>,
    /// Skip TLS certificate verification.
    pub insecure: Option<bool>,
    /// Per-request timeout.
    pub timeout_seconds: Option<i64>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("address", &self.address)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("insecure", &self.insecure)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl ProviderConfig {
    /// Schema of the provider block.
    ///
    /// `address`, `username` and `password` are optional here because the
    /// environment may supply them; [`ProviderConfig::validate`] enforces
    /// that they end up set.
    pub fn schema() -> Schema {
        Schema::v0()
            .with_description("Connection settings for a Pexip Infinity management node.")
            .with_attribute(
                "address",
                Attribute::optional_string()
                    .with_description(format!(
                        "Management node URL, e.g. https://manager.example.com. Defaults to ${}",
                        ENV_ADDRESS
                    ))
                    .with_validator(Validator::Url),
            )
            .with_attribute(
                "username",
                Attribute::optional_string()
                    .with_description(format!("Administrator username. Defaults to ${}", ENV_USERNAME)),
            )
            .with_attribute(
                "password",
                Attribute::optional_string()
                    .sensitive()
                    .with_description(format!("Administrator password. Defaults to ${}", ENV_PASSWORD)),
            )
            .with_attribute(
                "insecure",
                Attribute::optional_bool()
                    .with_default(json!(false))
                    .with_description(format!(
                        "Accept invalid TLS certificates. Defaults to ${}, then false",
                        ENV_INSECURE
                    )),
            )
            .with_attribute(
                "timeout_seconds",
                Attribute::optional_int64()
                    .with_default(json!(DEFAULT_TIMEOUT_SECONDS))
                    .with_validator(Validator::range(1, MAX_TIMEOUT_SECONDS))
                    .with_description("Per-request timeout in seconds"),
            )
    }

    /// Parse the provider block, filling unset values from the process
    /// environment.
    pub fn from_value(config: &Value) -> Result<Self, ProviderError> {
        Self::from_value_with_env(config, |name| std::env::var(name).ok())
    }

    /// Like [`ProviderConfig::from_value`] with a custom environment.
    pub fn from_value_with_env(
        config: &Value,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ProviderError> {
        let parsed: Self = if config.is_null() {
            Self::default()
        } else {
            serde_json::from_value(config.clone())?
        };
        Ok(parsed.with_env(env))
    }

    fn with_env(mut self, env: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |name: &str| env(name).filter(|v| !v.trim().is_empty());
        if blank(&self.address) {
            self.address = lookup(ENV_ADDRESS);
        }
        if blank(&self.username) {
            self.username = lookup(ENV_USERNAME);
        }
        if blank(&self.password) {
            self.password = lookup(ENV_PASSWORD);
        }
        if self.insecure.is_none() {
            self.insecure = lookup(ENV_INSECURE).map(|v| parse_flag(&v));
        }
        self
    }

    /// Check the resolved settings. An empty list means they are usable.
    pub fn validate(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for (name, value, env) in [
            ("address", &self.address, ENV_ADDRESS),
            ("username", &self.username, ENV_USERNAME),
            ("password", &self.password, ENV_PASSWORD),
        ] {
            if blank(value) {
                diagnostics.push(
                    Diagnostic::error(format!("Missing {}", name))
                        .with_detail(format!(
                            "Set {} in the provider block or the {} environment variable",
                            name, env
                        ))
                        .with_attribute(name),
                );
            }
        }

        // Values from the environment have not been through the schema yet.
        let resolved = json!({
            "address": self.address,
            "timeout_seconds": self.timeout_seconds,
        });
        diagnostics.extend(validate(&Self::schema(), &resolved));

        diagnostics
    }

    /// Client settings. Fails with [`ProviderError::Configuration`] when
    /// [`ProviderConfig::validate`] reports errors.
    pub fn client_config(&self) -> Result<ClientConfig, ProviderError> {
        if let Some(problem) = self.validate().into_iter().find(|d| d.is_error()) {
            return Err(ProviderError::Configuration(
                problem.detail.unwrap_or(problem.summary),
            ));
        }

        let mut config = ClientConfig::new(
            self.address.clone().unwrap_or_default(),
            self.username.clone().unwrap_or_default(),
            self.password.clone().unwrap_or_default(),
        );
        config.insecure = self.insecure.unwrap_or(false);
        if let Some(timeout) = self.timeout_seconds {
            config.timeout_seconds = timeout.unsigned_abs();
        }
        Ok(config)
    }
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_block_values_win_over_environment() {
        let config = ProviderConfig::from_value_with_env(
            &json!({"address": "https://manager.example.com", "username": "admin", "password": "pw"}),
            env(&[(ENV_ADDRESS, "https://other.example.com"), (ENV_USERNAME, "other")]),
        )
        .unwrap();

        assert_eq!(config.address.as_deref(), Some("https://manager.example.com"));
        assert_eq!(config.username.as_deref(), Some("admin"));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_environment_fills_gaps() {
        let config = ProviderConfig::from_value_with_env(
            &json!({"password": ""}),
            env(&[
                (ENV_ADDRESS, "https://manager.example.com"),
                (ENV_USERNAME, "admin"),
                (ENV_PASSWORD, "from-env"),
                (ENV_INSECURE, "TRUE"),
            ]),
        )
        .unwrap();

        assert_eq!(config.password.as_deref(), Some("from-env"));
        assert_eq!(config.insecure, Some(true));

        let client = config.client_config().unwrap();
        assert!(client.insecure);
        assert_eq!(client.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
    }

    #[test]
    fn test_missing_credentials_are_reported() {
        let config = ProviderConfig::from_value_with_env(&Value::Null, env(&[])).unwrap();
        let diagnostics = config.validate();

        let attributes: Vec<_> = diagnostics
            .iter()
            .filter_map(|d| d.attribute.as_deref())
            .collect();
        assert_eq!(attributes, vec!["address", "username", "password"]);

        let err = config.client_config().unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
    }

    #[test]
    fn test_address_and_timeout_are_validated() {
        let config = ProviderConfig::from_value_with_env(
            &json!({"username": "admin", "password": "pw", "timeout_seconds": 0}),
            env(&[(ENV_ADDRESS, "manager.example.com")]),
        )
        .unwrap();

        let diagnostics = config.validate();
        let attributes: Vec<_> = diagnostics
            .iter()
            .filter_map(|d| d.attribute.as_deref())
            .collect();
        assert!(attributes.contains(&"address"));
        assert!(attributes.contains(&"timeout_seconds"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = ProviderConfig {
            password: Some("hunter2".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" yes "));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("nope"));
    }
}
