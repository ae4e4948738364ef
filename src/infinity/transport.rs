//! Request transport for the configuration API.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE, LOCATION};
use serde_json::Value;
use tracing::{debug, instrument};

use super::{ClientConfig, InfinityError, API_PREFIX};

/// HTTP verb of an API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl Method {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_reqwest().as_str(), f)
    }
}

/// A request against the configuration API.
///
/// `path` is relative to `/api/admin/configuration/v1/`, e.g. `dns_server/7/`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP verb.
    pub method: Method,
    /// Object path below the API prefix.
    pub path: String,
    /// Query string pairs.
    pub query: Vec<(String, String)>,
    /// JSON body.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Build a request without query or body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Attach a JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach query pairs.
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }
}

/// A successful (2xx) API response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// `Location` header, set on object creation.
    pub location: Option<String>,
    /// Parsed JSON body, if any.
    pub body: Option<Value>,
}

/// Sends requests to an Infinity management node.
///
/// Implementations return `Ok` only for 2xx responses; every other status
/// becomes [`InfinityError::Api`].
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Send one request and wait for the response.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, InfinityError>;
}

/// [`Transport`] over HTTPS with basic authentication.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl HttpTransport {
    /// Build a transport from client settings.
    pub fn new(config: &ClientConfig) -> Result<Self, InfinityError> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.insecure)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("pexip-infinity-provider/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(InfinityError::Network)?;

        Ok(Self {
            client,
            base_url: config.address.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(level = "debug", skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, InfinityError> {
        let mut builder = self
            .client
            .request(request.method.as_reqwest(), self.url(&request.path))
            .basic_auth(&self.username, Some(&self.password))
            .header(ACCEPT, HeaderValue::from_static("application/json"));

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await?;
        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = response.text().await?;
        debug!(status = status.as_u16(), "response received");

        if !status.is_success() {
            let message = if text.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                text.trim().to_string()
            };
            return Err(InfinityError::api(status.as_u16(), message));
        }

        let body = if text.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str(&text).map_err(|e| {
                InfinityError::InvalidResponse(format!("body is not JSON: {}", e))
            })?)
        };

        Ok(ApiResponse {
            status: status.as_u16(),
            location,
            body,
        })
    }
}
