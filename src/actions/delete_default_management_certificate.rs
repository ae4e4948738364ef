//! `pexip_infinity_delete_default_management_certificate`: removes the
//! self-signed certificate a management node generates on install.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::ActionHandler;
use crate::error::ProviderError;
use crate::infinity::types::TlsCertificate;
use crate::infinity::InfinityClient;
use crate::resources::{operation_error, tolerate_missing, Operation};
use crate::schema::{Attribute, Schema, Validator};
use crate::types::ProgressEvent;

const WHAT: &str = "TLS certificate";

/// Subject of the certificate generated on install.
pub const DEFAULT_SUBJECT_NAME: &str = "pexip.local";

/// Action configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct DeleteDefaultManagementCertificateConfig {
    /// Subject of the certificates to remove. Null or empty means
    /// [`DEFAULT_SUBJECT_NAME`].
    pub subject_name: Option<String>,
}

impl DeleteDefaultManagementCertificateConfig {
    /// The subject to look for.
    pub fn subject(&self) -> &str {
        self.subject_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SUBJECT_NAME)
    }
}

/// Deletes self-signed certificates with a given subject.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteDefaultManagementCertificateAction;

#[async_trait]
impl ActionHandler for DeleteDefaultManagementCertificateAction {
    fn type_name(&self) -> &'static str {
        "pexip_infinity_delete_default_management_certificate"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description(
                "Deletes the self-signed TLS certificate created when the management node was installed.",
            )
            .with_attribute(
                "subject_name",
                Attribute::optional_string()
                    .with_default(json!(DEFAULT_SUBJECT_NAME))
                    .with_validator(Validator::length(1, 255))
                    .with_description("Subject of the certificates to delete"),
            )
    }

    #[instrument(skip_all, fields(action = self.type_name()))]
    async fn invoke(
        &self,
        client: &InfinityClient,
        config: Value,
    ) -> Result<Vec<ProgressEvent>, ProviderError> {
        let config: DeleteDefaultManagementCertificateConfig = if config.is_null() {
            Default::default()
        } else {
            serde_json::from_value(config)?
        };
        let subject = config.subject();
        let mut events = vec![ProgressEvent::new(format!(
            "Looking up self-signed TLS certificates for {}...",
            subject
        ))];

        let listed = client
            .config()
            .list::<TlsCertificate>(&[("subject_name", subject)])
            .await
            .map_err(|err| operation_error(Operation::Read, WHAT, None, err))?;

        let targets: Vec<TlsCertificate> = listed
            .objects
            .into_iter()
            .filter(|cert| cert.subject_name == subject && cert.is_self_signed())
            .collect();

        if targets.is_empty() {
            info!(subject, "no default management certificate found");
            events.push(ProgressEvent::new(format!(
                "No self-signed TLS certificate for {} found, nothing to delete",
                subject
            )));
            return Ok(events);
        }

        for cert in &targets {
            events.push(ProgressEvent::new(format!(
                "Deleting TLS certificate {} (serial {})...",
                cert.id, cert.serial_no
            )));
            tolerate_missing(client.config().delete::<TlsCertificate>(cert.id).await)
                .map_err(|err| operation_error(Operation::Delete, WHAT, Some(&cert.id), err))?;
        }

        info!(subject, deleted = targets.len(), "deleted default management certificates");
        events.push(ProgressEvent::new(format!(
            "Deleted {} self-signed TLS certificate(s) for {}",
            targets.len(),
            subject
        )));
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infinity::{Method, MockTransport};
    use std::sync::Arc;

    fn client_with(certs: &[(&str, &str)]) -> (Arc<MockTransport>, InfinityClient) {
        let mock = Arc::new(MockTransport::new());
        for (subject, issuer) in certs {
            mock.insert(
                "tls_certificate",
                json!({
                    "certificate": "-----BEGIN CERTIFICATE-----",
                    "subject_name": subject,
                    "issuer_name": issuer,
                    "serial_no": "01",
                }),
            );
        }
        let client = InfinityClient::with_transport(mock.clone());
        (mock, client)
    }

    #[tokio::test]
    async fn test_deletes_only_self_signed_default() {
        let (mock, client) = client_with(&[
            ("pexip.local", "pexip.local"),
            ("pexip.local", "Example CA"),
            ("manager.example.com", "Example CA"),
        ]);

        let events = DeleteDefaultManagementCertificateAction
            .invoke(&client, json!({}))
            .await
            .unwrap();

        assert_eq!(mock.request_count(Method::Delete, "tls_certificate"), 1);
        assert_eq!(mock.len("tls_certificate"), 2);

        let messages: Vec<_> = events.iter().map(|e| e.message.as_str()).collect();
        assert!(messages[0].starts_with("Looking up"));
        assert!(messages[1].starts_with("Deleting TLS certificate 1"));
        assert_eq!(
            messages[2],
            "Deleted 1 self-signed TLS certificate(s) for pexip.local"
        );
    }

    #[tokio::test]
    async fn test_nothing_to_delete_is_not_an_error() {
        let (mock, client) = client_with(&[("manager.example.com", "Example CA")]);

        let events = DeleteDefaultManagementCertificateAction
            .invoke(&client, Value::Null)
            .await
            .unwrap();

        assert_eq!(events.len(), 2);
        assert!(events[1].message.contains("nothing to delete"));
        assert_eq!(mock.mutation_count(), 0);
    }

    #[tokio::test]
    async fn test_null_subject_uses_default() {
        let (mock, client) = client_with(&[("pexip.local", "pexip.local")]);

        let events = DeleteDefaultManagementCertificateAction
            .invoke(&client, json!({"subject_name": null}))
            .await
            .unwrap();

        assert_eq!(mock.request_count(Method::Delete, "tls_certificate"), 1);
        assert!(events[0].message.ends_with("pexip.local..."));

        let (mock, client) = client_with(&[("pexip.local", "pexip.local")]);
        DeleteDefaultManagementCertificateAction
            .invoke(&client, json!({"subject_name": ""}))
            .await
            .unwrap();
        assert_eq!(mock.request_count(Method::Delete, "tls_certificate"), 1);
    }

    #[tokio::test]
    async fn test_custom_subject() {
        let (mock, client) = client_with(&[
            ("pexip.local", "pexip.local"),
            ("node.lab", "node.lab"),
        ]);

        DeleteDefaultManagementCertificateAction
            .invoke(&client, json!({"subject_name": "node.lab"}))
            .await
            .unwrap();

        let gone = mock.requests_for(Method::Delete, "tls_certificate");
        assert_eq!(gone.len(), 1);
        assert_eq!(gone[0].path, "tls_certificate/2/");
    }

    #[tokio::test]
    async fn test_delete_failure_is_reported() {
        let (mock, client) = client_with(&[("pexip.local", "pexip.local")]);
        mock.fail_next(Method::Delete, "tls_certificate", 500, "Internal Server Error");

        let err = DeleteDefaultManagementCertificateAction
            .invoke(&client, json!({}))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_diagnostic().summary,
            "Error Deleting Infinity TLS certificate"
        );
    }
}
