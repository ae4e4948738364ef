//! Wire types of the configuration API.
//!
//! Response structs default every missing field, so a partially populated
//! object still decodes. Request structs leave `None` fields out of the
//! body entirely.

use serde::{Deserialize, Deserializer};

// Wire fields mirror the API's JSON names.
#[allow(missing_docs)]
mod call_control;
#[allow(missing_docs)]
mod conferencing;
#[allow(missing_docs)]
mod platform;
#[allow(missing_docs)]
mod security;
#[allow(missing_docs)]
mod system;

pub use call_control::*;
pub use conferencing::*;
pub use platform::*;
pub use security::*;
pub use system::*;

/// Implements [`ConfigObject`](crate::infinity::ConfigObject) for a
/// response type with a `resource_uri` field.
macro_rules! config_object {
    ($object:ty, $endpoint:literal, $create:ty, $update:ty) => {
        impl $crate::infinity::ConfigObject for $object {
            const ENDPOINT: &'static str = $endpoint;
            type CreateRequest = $create;
            type UpdateRequest = $update;

            fn resource_uri(&self) -> &str {
                &self.resource_uri
            }
        }
    };
}
pub(crate) use config_object;

/// A related object as the API returns it: either its URI or the whole
/// object inline.
#[derive(Deserialize)]
#[serde(untagged)]
enum Related {
    Uri(String),
    Inline { resource_uri: String },
}

impl Related {
    fn into_uri(self) -> String {
        match self {
            Self::Uri(uri) | Self::Inline { resource_uri: uri } => uri,
        }
    }
}

/// Deserialize a list of related objects into their URIs.
pub(crate) fn related_uris<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Option<Vec<Related>> = Option::deserialize(deserializer)?;
    Ok(items
        .unwrap_or_default()
        .into_iter()
        .map(Related::into_uri)
        .collect())
}

/// Deserialize an optional related object into its URI.
pub(crate) fn related_uri<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let item: Option<Related> = Option::deserialize(deserializer)?;
    Ok(item.map(Related::into_uri).filter(|uri| !uri.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_system_location_accepts_inline_and_uri_servers() {
        let location: SystemLocation = serde_json::from_value(json!({
            "id": 3,
            "name": "Oslo",
            "dns_servers": [
                {"id": 1, "address": "1.1.1.1", "resource_uri": "/api/admin/configuration/v1/dns_server/1/"},
                "/api/admin/configuration/v1/dns_server/2/"
            ],
            "ntp_servers": null,
            "resource_uri": "/api/admin/configuration/v1/system_location/3/"
        }))
        .unwrap();

        assert_eq!(
            location.dns_servers,
            vec![
                "/api/admin/configuration/v1/dns_server/1/",
                "/api/admin/configuration/v1/dns_server/2/"
            ]
        );
        assert!(location.ntp_servers.is_empty());
        assert_eq!(location.mtu, 0);
    }

    #[test]
    fn test_related_uri_treats_empty_as_none() {
        let vm: WorkerVm = serde_json::from_value(json!({"system_location": ""})).unwrap();
        assert_eq!(vm.system_location, None);

        let vm: WorkerVm = serde_json::from_value(json!({
            "system_location": {"resource_uri": "/api/admin/configuration/v1/system_location/3/"}
        }))
        .unwrap();
        assert_eq!(
            vm.system_location.as_deref(),
            Some("/api/admin/configuration/v1/system_location/3/")
        );
    }

    #[test]
    fn test_request_omits_unset_fields() {
        let body = serde_json::to_value(DnsServerCreateRequest {
            address: "1.1.1.1".to_string(),
            description: None,
        })
        .unwrap();
        assert_eq!(body, json!({"address": "1.1.1.1"}));
    }
}
