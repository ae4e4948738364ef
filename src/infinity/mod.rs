//! Client for the Pexip Infinity management node configuration API.
//!
//! Objects live below `/api/admin/configuration/v1/<endpoint>/`. Every
//! object type implements [`ConfigObject`], which ties its endpoint to the
//! request bodies used to create and update it; [`ConfigService`] then
//! offers the same typed CRUD calls for all of them.
//!
//! ```no_run
//! use pexip_infinity_provider::infinity::{ClientConfig, InfinityClient};
//! use pexip_infinity_provider::infinity::types::{DnsServer, DnsServerCreateRequest};
//!
//! # async fn example() -> Result<(), pexip_infinity_provider::infinity::InfinityError> {
//! let client = InfinityClient::new(&ClientConfig::new(
//!     "https://manager.example.com",
//!     "admin",
//!     "secret",
//! ))?;
//!
//! let created = client
//!     .config()
//!     .create::<DnsServer>(&DnsServerCreateRequest {
//!         address: "1.1.1.1".to_string(),
//!         description: None,
//!     })
//!     .await?;
//! let server: DnsServer = client.config().get(created.resource_id()?).await?;
//! assert_eq!(server.address, "1.1.1.1");
//! # Ok(())
//! # }
//! ```

mod error;
mod mock;
mod transport;
#[allow(missing_docs)]
pub mod types;

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

pub use error::InfinityError;
pub use mock::MockTransport;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};

/// Path prefix of the configuration API.
pub const API_PREFIX: &str = "/api/admin/configuration/v1/";

/// Object id every singleton configuration lives at.
pub const SINGLETON_ID: i64 = 1;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Connection settings for a management node.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the management node, e.g. `https://manager.example.com`.
    pub address: String,
    /// Administrator username.
    pub username: String,
    /// Administrator password.
    pub password: String,
    /// Accept invalid TLS certificates.
    pub insecure: bool,
    /// Per-request timeout.
    pub timeout_seconds: u64,
}

impl ClientConfig {
    /// Settings with certificate checks on and the default timeout.
    pub fn new(
        address: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            username: username.into(),
            password: password.into(),
            insecure: false,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("address", &self.address)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("insecure", &self.insecure)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// A configuration object type.
pub trait ConfigObject: DeserializeOwned + Send + Sync + 'static {
    /// Endpoint name below [`API_PREFIX`], without slashes.
    const ENDPOINT: &'static str;

    /// Body sent on POST.
    type CreateRequest: Serialize + Send + Sync;

    /// Body sent on PUT.
    type UpdateRequest: Serialize + Send + Sync;

    /// The server-assigned URI. Empty when the API returned a blank object.
    fn resource_uri(&self) -> &str;
}

/// Handle on a management node.
#[derive(Debug, Clone)]
pub struct InfinityClient {
    transport: Arc<dyn Transport>,
}

impl InfinityClient {
    /// Connect over HTTPS.
    pub fn new(config: &ClientConfig) -> Result<Self, InfinityError> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new(config)?)))
    }

    /// Use a custom transport, e.g. [`MockTransport`].
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// The configuration API.
    pub fn config(&self) -> ConfigService<'_> {
        ConfigService {
            transport: self.transport.as_ref(),
        }
    }
}

/// Result of a create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostResponse {
    /// `Location` header of the response.
    pub location: String,
}

impl PostResponse {
    /// The last path segment of the location (the object id or key).
    pub fn resource_key(&self) -> Result<&str, InfinityError> {
        self.location
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| InfinityError::InvalidResourceUri(self.location.clone()))
    }

    /// The numeric object id at the end of the location.
    pub fn resource_id(&self) -> Result<i64, InfinityError> {
        self.resource_key()?
            .parse::<i64>()
            .map_err(|_| InfinityError::InvalidResourceUri(self.location.clone()))
    }
}

/// Paging metadata of a list response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListMeta {
    /// Number of matching objects across all pages.
    pub total_count: i64,
    /// Page size.
    pub limit: i64,
    /// Offset of this page.
    pub offset: i64,
    /// URI of the next page.
    pub next: Option<String>,
    /// URI of the previous page.
    pub previous: Option<String>,
}

/// A page of objects.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
pub struct ListResponse<T> {
    /// Paging metadata.
    #[serde(default)]
    pub meta: ListMeta,
    /// The objects on this page.
    #[serde(default = "Vec::new")]
    pub objects: Vec<T>,
}

/// Typed CRUD over the configuration API.
#[derive(Debug, Clone, Copy)]
pub struct ConfigService<'a> {
    transport: &'a dyn Transport,
}

impl ConfigService<'_> {
    /// POST a new object.
    #[instrument(level = "debug", skip_all, fields(endpoint = T::ENDPOINT))]
    pub async fn create<T: ConfigObject>(
        &self,
        request: &T::CreateRequest,
    ) -> Result<PostResponse, InfinityError> {
        let body = serde_json::to_value(request)?;
        let response = self
            .transport
            .send(ApiRequest::new(Method::Post, format!("{}/", T::ENDPOINT)).with_body(body))
            .await?;
        let location = response.location.ok_or(InfinityError::MissingLocation)?;
        debug!(%location, "object created");
        Ok(PostResponse { location })
    }

    /// GET an object by numeric id.
    pub async fn get<T: ConfigObject>(&self, id: i64) -> Result<T, InfinityError> {
        self.get_by_key(&id.to_string()).await
    }

    /// GET an object by key (numeric id, licence fingerprint, sequence number).
    #[instrument(level = "debug", skip(self), fields(endpoint = T::ENDPOINT))]
    pub async fn get_by_key<T: ConfigObject>(&self, key: &str) -> Result<T, InfinityError> {
        let response = self
            .transport
            .send(ApiRequest::new(Method::Get, object_path::<T>(key)))
            .await?;
        decode(response.body)
    }

    /// GET objects matching every `(field, value)` filter.
    #[instrument(level = "debug", skip(self), fields(endpoint = T::ENDPOINT))]
    pub async fn list<T: ConfigObject>(
        &self,
        filters: &[(&str, &str)],
    ) -> Result<ListResponse<T>, InfinityError> {
        let query = filters
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let response = self
            .transport
            .send(ApiRequest::new(Method::Get, format!("{}/", T::ENDPOINT)).with_query(query))
            .await?;
        decode(response.body)
    }

    /// PUT a full update.
    #[instrument(level = "debug", skip(self, request), fields(endpoint = T::ENDPOINT))]
    pub async fn update<T: ConfigObject>(
        &self,
        id: i64,
        request: &T::UpdateRequest,
    ) -> Result<(), InfinityError> {
        let body = serde_json::to_value(request)?;
        self.transport
            .send(ApiRequest::new(Method::Put, object_path::<T>(&id.to_string())).with_body(body))
            .await?;
        Ok(())
    }

    /// PATCH selected fields.
    #[instrument(level = "debug", skip(self, fields), fields(endpoint = T::ENDPOINT))]
    pub async fn patch<T: ConfigObject>(&self, id: i64, fields: &Value) -> Result<(), InfinityError> {
        self.transport
            .send(
                ApiRequest::new(Method::Patch, object_path::<T>(&id.to_string()))
                    .with_body(fields.clone()),
            )
            .await?;
        Ok(())
    }

    /// DELETE an object by numeric id.
    pub async fn delete<T: ConfigObject>(&self, id: i64) -> Result<(), InfinityError> {
        self.delete_by_key::<T>(&id.to_string()).await
    }

    /// DELETE an object by key.
    #[instrument(level = "debug", skip(self), fields(endpoint = T::ENDPOINT))]
    pub async fn delete_by_key<T: ConfigObject>(&self, key: &str) -> Result<(), InfinityError> {
        self.transport
            .send(ApiRequest::new(Method::Delete, object_path::<T>(key)))
            .await?;
        Ok(())
    }
}

fn object_path<T: ConfigObject>(key: &str) -> String {
    format!("{}/{}/", T::ENDPOINT, key)
}

fn decode<T: DeserializeOwned>(body: Option<Value>) -> Result<T, InfinityError> {
    let body = body.ok_or_else(|| InfinityError::InvalidResponse("empty body".to_string()))?;
    Ok(serde_json::from_value(body)?)
}

#[cfg(test)]
mod tests {
    use super::types::{DnsServer, DnsServerCreateRequest, DnsServerUpdateRequest};
    use super::*;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn mock_client() -> (Arc<MockTransport>, InfinityClient) {
        let mock = Arc::new(MockTransport::new());
        let client = InfinityClient::with_transport(mock.clone());
        (mock, client)
    }

    #[test]
    fn test_post_response_resource_id() {
        let response = PostResponse {
            location: "https://manager.example.com/api/admin/configuration/v1/dns_server/12/"
                .to_string(),
        };
        assert_eq!(assert_ok!(response.resource_id()), 12);

        let keyed = PostResponse {
            location: "/api/admin/configuration/v1/licence/ABCDEF0123/".to_string(),
        };
        assert_eq!(assert_ok!(keyed.resource_key()), "ABCDEF0123");
        assert!(matches!(
            keyed.resource_id(),
            Err(InfinityError::InvalidResourceUri(_))
        ));

        let empty = PostResponse {
            location: "/".to_string(),
        };
        assert_err!(empty.resource_key());
    }

    #[test]
    fn test_client_config_debug_redacts_password() {
        let config = ClientConfig::new("https://manager", "admin", "hunter2");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
    }

    #[tokio::test]
    async fn test_crud_through_config_service() {
        let (mock, client) = mock_client();
        let config = client.config();

        let created = config
            .create::<DnsServer>(&DnsServerCreateRequest {
                address: "1.1.1.1".to_string(),
                description: Some("cloudflare".to_string()),
            })
            .await
            .unwrap();
        let id = created.resource_id().unwrap();

        let server: DnsServer = config.get(id).await.unwrap();
        assert_eq!(server.address, "1.1.1.1");
        assert_eq!(server.resource_uri, created.location);

        config
            .update::<DnsServer>(
                id,
                &DnsServerUpdateRequest {
                    address: "8.8.8.8".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();
        let server: DnsServer = config.get(id).await.unwrap();
        assert_eq!(server.address, "8.8.8.8");
        assert_eq!(server.description, "cloudflare");

        config.delete::<DnsServer>(id).await.unwrap();
        let err = config.get::<DnsServer>(id).await.unwrap_err();
        assert!(err.is_not_found());

        assert_eq!(mock.request_count(Method::Put, "dns_server"), 1);
    }

    #[tokio::test]
    async fn test_list_filters() {
        let (mock, client) = mock_client();
        mock.insert("dns_server", json!({"address": "1.1.1.1"}));
        mock.insert("dns_server", json!({"address": "8.8.8.8"}));

        let all = client.config().list::<DnsServer>(&[]).await.unwrap();
        assert_eq!(all.meta.total_count, 2);

        let filtered = client
            .config()
            .list::<DnsServer>(&[("address", "8.8.8.8")])
            .await
            .unwrap();
        assert_eq!(filtered.objects.len(), 1);
        assert_eq!(filtered.objects[0].address, "8.8.8.8");
    }
}
