//! In-memory stand-in for a management node.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use super::transport::{ApiRequest, ApiResponse, Method, Transport};
use super::{InfinityError, API_PREFIX, SINGLETON_ID};

/// Fields the real API never returns, per endpoint.
const SECRET_FIELDS: &[(&str, &[&str])] = &[
    ("authentication", &["ldap_bind_password", "oidc_client_secret"]),
    ("conference", &["pin", "guest_pin"]),
    ("device", &["password"]),
    ("event_sink", &["password"]),
    ("gms_access_token", &["token"]),
    ("gms_gateway_token", &["private_key"]),
    ("ntp_server", &["key"]),
    ("policy_server", &["password"]),
    ("registration", &["push_token"]),
    ("sip_credential", &["password"]),
    ("smtp_server", &["password"]),
    ("snmp_network_management_system", &["snmp_trap_community"]),
    ("tls_certificate", &["private_key", "private_key_passphrase"]),
    ("turn_server", &["password", "secret_key"]),
    ("worker_vm", &["password"]),
];

/// Endpoints that address objects by a field other than the numeric id.
const KEY_FIELDS: &[(&str, &str)] = &[
    ("licence", "fingerprint"),
    ("licence_request", "sequence_number"),
];

const SINGLETONS: &[&str] = &[
    "authentication",
    "registration",
    "global",
    "gms_gateway_token",
];

#[derive(Debug, Clone)]
struct Failure {
    method: Method,
    endpoint: String,
    status: u16,
    message: String,
}

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    objects: HashMap<String, Vec<(String, Value)>>,
    requests: Vec<ApiRequest>,
    failures: Vec<Failure>,
}

impl State {
    fn find(&self, endpoint: &str, key: &str) -> Option<&Value> {
        self.objects
            .get(endpoint)?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    fn find_mut(&mut self, endpoint: &str, key: &str) -> Option<&mut Value> {
        self.objects
            .get_mut(endpoint)?
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    fn insert(&mut self, endpoint: &str, mut object: Value) -> String {
        self.next_id += 1;
        let id = self.next_id;
        let key = if key_field(endpoint) == Some("fingerprint") {
            format!("{:032X}", id)
        } else {
            id.to_string()
        };

        if let Value::Object(map) = &mut object {
            map.insert("id".to_string(), json!(id));
            if let Some(field) = key_field(endpoint) {
                map.insert(field.to_string(), json!(key));
            }
            map.insert("resource_uri".to_string(), json!(resource_uri(endpoint, &key)));
        }

        self.objects
            .entry(endpoint.to_string())
            .or_default()
            .push((key.clone(), object));
        key
    }

    fn take_failure(&mut self, method: Method, endpoint: &str) -> Option<InfinityError> {
        let pos = self
            .failures
            .iter()
            .position(|f| f.method == method && f.endpoint == endpoint)?;
        let failure = self.failures.remove(pos);
        Some(InfinityError::api(failure.status, failure.message))
    }
}

/// [`Transport`] backed by an in-memory object store.
///
/// Behaves like a management node for the purposes of the resource
/// adapters: POST assigns ids and resource URIs and answers with a
/// `Location` header, GET strips secret fields, PUT and PATCH merge, and
/// singleton objects exist from the start. Every request is recorded.
#[derive(Debug, Default)]
pub struct MockTransport {
    state: Mutex<State>,
}

impl MockTransport {
    /// An empty node with the singleton objects seeded.
    pub fn new() -> Self {
        let mock = Self::default();
        {
            let mut state = mock.lock();
            for endpoint in SINGLETONS {
                let key = SINGLETON_ID.to_string();
                let object = json!({
                    "id": SINGLETON_ID,
                    "resource_uri": resource_uri(endpoint, &key),
                });
                state
                    .objects
                    .entry(endpoint.to_string())
                    .or_default()
                    .push((key, object));
            }
        }
        mock
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Store an object directly, returning its key.
    pub fn insert(&self, endpoint: &str, object: Value) -> String {
        self.lock().insert(endpoint, object)
    }

    /// The stored object, secrets included.
    pub fn object(&self, endpoint: &str, key: &str) -> Option<Value> {
        self.lock().find(endpoint, key).cloned()
    }

    /// Edit a stored object in place. Returns false if it does not exist.
    pub fn modify(&self, endpoint: &str, key: &str, f: impl FnOnce(&mut Value)) -> bool {
        match self.lock().find_mut(endpoint, key) {
            Some(object) => {
                f(object);
                true
            },
            None => false,
        }
    }

    /// Remove a stored object behind the client's back.
    pub fn remove(&self, endpoint: &str, key: &str) -> bool {
        let mut state = self.lock();
        match state.objects.get_mut(endpoint) {
            Some(objects) => {
                let before = objects.len();
                objects.retain(|(k, _)| k != key);
                objects.len() != before
            },
            None => false,
        }
    }

    /// Number of objects stored at an endpoint.
    pub fn len(&self, endpoint: &str) -> usize {
        self.lock().objects.get(endpoint).map_or(0, Vec::len)
    }

    /// Whether an endpoint holds no objects.
    pub fn is_empty(&self, endpoint: &str) -> bool {
        self.len(endpoint) == 0
    }

    /// Fail the next `method` request against `endpoint` with an API error.
    pub fn fail_next(&self, method: Method, endpoint: &str, status: u16, message: &str) {
        self.lock().failures.push(Failure {
            method,
            endpoint: endpoint.to_string(),
            status,
            message: message.to_string(),
        });
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock().requests.clone()
    }

    /// Requests with the given method against the given endpoint.
    pub fn requests_for(&self, method: Method, endpoint: &str) -> Vec<ApiRequest> {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == method && split_path(&r.path).0 == endpoint)
            .cloned()
            .collect()
    }

    /// Count of requests with the given method against the given endpoint.
    pub fn request_count(&self, method: Method, endpoint: &str) -> usize {
        self.requests_for(method, endpoint).len()
    }

    /// Count of mutating (non-GET) requests.
    pub fn mutation_count(&self) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method != Method::Get)
            .count()
    }

    /// Forget recorded requests.
    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, InfinityError> {
        let mut state = self.lock();
        state.requests.push(request.clone());

        let (endpoint, key) = split_path(&request.path);
        if let Some(err) = state.take_failure(request.method, &endpoint) {
            return Err(err);
        }

        match (request.method, key) {
            (Method::Post, None) => {
                let body = request.body.unwrap_or_else(|| json!({}));
                let key = state.insert(&endpoint, body);
                Ok(ApiResponse {
                    status: 201,
                    location: Some(format!("https://mock{}", resource_uri(&endpoint, &key))),
                    body: None,
                })
            },
            (Method::Get, None) => {
                let objects: Vec<Value> = state
                    .objects
                    .get(&endpoint)
                    .map(|objects| {
                        objects
                            .iter()
                            .map(|(_, v)| v)
                            .filter(|v| matches_filters(v, &request.query))
                            .map(|v| strip_secrets(&endpoint, v))
                            .collect()
                    })
                    .unwrap_or_default();
                Ok(ApiResponse {
                    status: 200,
                    location: None,
                    body: Some(json!({
                        "meta": {
                            "total_count": objects.len(),
                            "limit": 20,
                            "offset": 0,
                            "next": null,
                            "previous": null,
                        },
                        "objects": objects,
                    })),
                })
            },
            (Method::Get, Some(key)) => {
                let object = state.find(&endpoint, &key).ok_or_else(not_found)?;
                Ok(ApiResponse {
                    status: 200,
                    location: None,
                    body: Some(strip_secrets(&endpoint, object)),
                })
            },
            (Method::Put | Method::Patch, Some(key)) => {
                let object = state.find_mut(&endpoint, &key).ok_or_else(not_found)?;
                if let (Value::Object(target), Some(Value::Object(fields))) =
                    (object, request.body)
                {
                    merge(target, fields);
                }
                Ok(ApiResponse {
                    status: 202,
                    ..Default::default()
                })
            },
            (Method::Delete, Some(key)) => {
                let objects = state.objects.get_mut(&endpoint).ok_or_else(not_found)?;
                let before = objects.len();
                objects.retain(|(k, _)| *k != key);
                if objects.len() == before {
                    return Err(not_found());
                }
                Ok(ApiResponse {
                    status: 204,
                    ..Default::default()
                })
            },
            (method, _) => Err(InfinityError::api(
                405,
                format!("{} not allowed on {}", method, request.path),
            )),
        }
    }
}

fn not_found() -> InfinityError {
    InfinityError::api(404, "Not Found")
}

fn key_field(endpoint: &str) -> Option<&'static str> {
    KEY_FIELDS
        .iter()
        .find(|(e, _)| *e == endpoint)
        .map(|(_, field)| *field)
}

fn resource_uri(endpoint: &str, key: &str) -> String {
    format!("{}{}/{}/", API_PREFIX, endpoint, key)
}

fn split_path(path: &str) -> (String, Option<String>) {
    let mut parts = path.split('/').filter(|p| !p.is_empty());
    let endpoint = parts.next().unwrap_or_default().to_string();
    (endpoint, parts.next().map(str::to_string))
}

fn strip_secrets(endpoint: &str, object: &Value) -> Value {
    let mut object = object.clone();
    let secrets = SECRET_FIELDS
        .iter()
        .find(|(e, _)| *e == endpoint)
        .map(|(_, fields)| *fields)
        .unwrap_or_default();
    if let Value::Object(map) = &mut object {
        for field in secrets {
            map.remove(*field);
        }
    }
    object
}

fn matches_filters(object: &Value, filters: &[(String, String)]) -> bool {
    filters.iter().all(|(field, expected)| match object.get(field) {
        Some(Value::String(s)) => s == expected,
        Some(other) => other.to_string() == *expected,
        None => false,
    })
}

fn merge(target: &mut Map<String, Value>, fields: Map<String, Value>) {
    for (k, v) in fields {
        // The server owns these.
        if k == "id" || k == "resource_uri" {
            continue;
        }
        target.insert(k, v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_post_assigns_id_and_location() {
        let mock = MockTransport::new();
        let response = mock
            .send(
                ApiRequest::new(Method::Post, "dns_server/")
                    .with_body(json!({"address": "1.1.1.1"})),
            )
            .await
            .unwrap();

        let location = response.location.unwrap();
        assert!(location.ends_with("/api/admin/configuration/v1/dns_server/1/"));

        let stored = mock.object("dns_server", "1").unwrap();
        assert_eq!(stored["id"], 1);
        assert_eq!(stored["resource_uri"], "/api/admin/configuration/v1/dns_server/1/");
    }

    #[tokio::test]
    async fn test_get_strips_secrets() {
        let mock = MockTransport::new();
        let key = mock.insert("sip_credential", json!({"username": "alice", "password": "pw"}));

        let response = mock
            .send(ApiRequest::new(Method::Get, format!("sip_credential/{}/", key)))
            .await
            .unwrap();
        let body = response.body.unwrap();
        assert_eq!(body["username"], "alice");
        assert!(body.get("password").is_none());

        // The store still has it.
        assert_eq!(mock.object("sip_credential", &key).unwrap()["password"], "pw");
    }

    #[tokio::test]
    async fn test_keyed_endpoints() {
        let mock = MockTransport::new();
        let key = mock.insert("licence", json!({"entitlement_id": "abc"}));
        assert_eq!(key.len(), 32);
        assert_eq!(mock.object("licence", &key).unwrap()["fingerprint"], key);

        let key = mock.insert("licence_request", json!({"reference": "r"}));
        assert_eq!(mock.object("licence_request", &key).unwrap()["sequence_number"], key);
    }

    #[tokio::test]
    async fn test_singletons_are_seeded() {
        let mock = MockTransport::new();
        for endpoint in SINGLETONS {
            assert!(mock.object(endpoint, "1").is_some(), "{} missing", endpoint);
        }
        assert!(mock.is_empty("dns_server"));
    }

    #[tokio::test]
    async fn test_fail_next_is_consumed() {
        let mock = MockTransport::new();
        mock.fail_next(Method::Delete, "dns_server", 500, "boom");

        let err = mock
            .send(ApiRequest::new(Method::Delete, "dns_server/1/"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));

        let err = mock
            .send(ApiRequest::new(Method::Delete, "dns_server/1/"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(mock.request_count(Method::Delete, "dns_server"), 2);
    }

    #[tokio::test]
    async fn test_put_merges_and_keeps_server_fields() {
        let mock = MockTransport::new();
        let key = mock.insert("dns_server", json!({"address": "1.1.1.1", "description": "a"}));

        mock.send(
            ApiRequest::new(Method::Put, format!("dns_server/{}/", key))
                .with_body(json!({"address": "8.8.8.8", "id": 99})),
        )
        .await
        .unwrap();

        let stored = mock.object("dns_server", &key).unwrap();
        assert_eq!(stored["address"], "8.8.8.8");
        assert_eq!(stored["description"], "a");
        assert_eq!(stored["id"], 1);
        assert_eq!(mock.mutation_count(), 1);
    }
}
