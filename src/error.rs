//! Error types for the provider surface.

use thiserror::Error;

use crate::infinity::InfinityError;
use crate::schema::Diagnostic;

/// Errors returned by provider operations.
///
/// Every variant is surfaced to the host as a [`Diagnostic`]; see
/// [`ProviderError::to_diagnostic`].
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The remote object no longer exists.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The supplied configuration or state failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The provider is missing or has invalid configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested resource, data source or action type is unknown.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// A CRUD operation failed. The summary names the operation and the
    /// detail carries the triggering resource id and the underlying cause.
    #[error("{summary}: {detail}")]
    Operation {
        /// Short summary, e.g. `Error Reading Infinity DNS server`.
        summary: String,
        /// Full explanation.
        detail: String,
    },

    /// The Infinity API returned an error that was not otherwise classified.
    #[error("Infinity API error: {0}")]
    Api(#[from] InfinityError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A gRPC transport error occurred.
    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// Operation not implemented.
    #[error("Unimplemented: {0}")]
    Unimplemented(String),

    /// Invalid request from the host.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ProviderError {
    /// Build an [`ProviderError::Operation`].
    pub fn operation(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Operation {
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    /// Whether this error means the remote object is gone.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Api(err) => err.is_not_found(),
            _ => false,
        }
    }

    /// Convert this error into an error diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Operation { summary, detail } => {
                Diagnostic::error(summary.clone()).with_detail(detail.clone())
            },
            other => Diagnostic::error(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DiagnosticSeverity;

    #[test]
    fn test_error_display() {
        let err = ProviderError::NotFound("dns_server 12".to_string());
        assert_eq!(format!("{}", err), "Resource not found: dns_server 12");

        let err = ProviderError::UnknownResource("pexip_infinity_nope".to_string());
        assert_eq!(format!("{}", err), "Unknown resource type: pexip_infinity_nope");

        let err = ProviderError::operation(
            "Update Not Supported",
            "Licence requests cannot be changed after creation",
        );
        assert_eq!(
            format!("{}", err),
            "Update Not Supported: Licence requests cannot be changed after creation"
        );
    }

    #[test]
    fn test_operation_error_diagnostic_keeps_summary_and_detail() {
        let diag = ProviderError::operation("Error Creating Infinity DNS server", "boom")
            .to_diagnostic();
        assert_eq!(diag.severity, DiagnosticSeverity::Error);
        assert_eq!(diag.summary, "Error Creating Infinity DNS server");
        assert_eq!(diag.detail.as_deref(), Some("boom"));
    }

    #[test]
    fn test_not_found_classification() {
        assert!(ProviderError::NotFound("x".to_string()).is_not_found());

        let api = ProviderError::Api(InfinityError::Api {
            status: 404,
            message: "Not Found".to_string(),
        });
        assert!(api.is_not_found());

        let api = ProviderError::Api(InfinityError::Api {
            status: 500,
            message: "Internal Server Error".to_string(),
        });
        assert!(!api.is_not_found());
        assert!(!ProviderError::Validation("x".to_string()).is_not_found());
    }
}
