use thiserror::Error;

/// Errors returned by the Infinity configuration API client.
///
/// Messages never carry credentials.
#[derive(Debug, Error)]
pub enum InfinityError {
    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, or the canonical reason when the body is empty.
        message: String,
    },

    /// Connection failure, timeout or TLS error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A request or response body failed to (de)serialize.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A create call succeeded but returned no `Location` header.
    #[error("response did not include a Location header")]
    MissingLocation,

    /// A resource URI did not end in an object id.
    #[error("invalid resource URI: '{0}'")]
    InvalidResourceUri(String),
}

const LOOKUP_ERROR_MARKERS: [&str; 3] = ["Lookup error", "does not exist", "Failed to find"];

impl InfinityError {
    /// Build an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The object does not exist (HTTP 404).
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The API rejected the request because an object it references is
    /// already gone.
    pub fn is_lookup_error(&self) -> bool {
        match self {
            Self::Api {
                status: 400,
                message,
            } => LOOKUP_ERROR_MARKERS.iter().any(|m| message.contains(m)),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = InfinityError::api(403, "Forbidden");
        assert_eq!(err.to_string(), "API error (403): Forbidden");
    }

    #[test]
    fn test_not_found() {
        assert!(InfinityError::api(404, "").is_not_found());
        assert!(!InfinityError::api(400, "Not Found").is_not_found());
        assert!(!InfinityError::MissingLocation.is_not_found());
    }

    #[test]
    fn test_lookup_error() {
        let err = InfinityError::api(
            400,
            r#"{"conference": ["Lookup error: conference matching query does not exist."]}"#,
        );
        assert!(err.is_lookup_error());
        assert!(InfinityError::api(400, "Failed to find system location").is_lookup_error());

        assert!(!InfinityError::api(400, "address: Enter a valid IPv4 address").is_lookup_error());
        assert!(!InfinityError::api(500, "Lookup error").is_lookup_error());
        assert!(!InfinityError::api(404, "").is_lookup_error());
    }

    #[test]
    fn test_resource_uri_display() {
        let err = InfinityError::InvalidResourceUri("/api/admin/configuration/v1/dns_server/".into());
        assert!(err.to_string().contains("dns_server"));
    }
}
