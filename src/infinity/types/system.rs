//! Platform networking and node objects.

use serde::{Deserialize, Serialize};

use super::{config_object, related_uri, related_uris};

/// `dns_server`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsServer {
    pub id: i64,
    pub address: String,
    pub description: String,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DnsServerCreateRequest {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DnsServerUpdateRequest {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

config_object!(DnsServer, "dns_server", DnsServerCreateRequest, DnsServerUpdateRequest);

/// `ntp_server`. The authentication key is write-only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NtpServer {
    pub id: i64,
    pub address: String,
    pub description: String,
    pub key_id: Option<i64>,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct NtpServerRequest {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_id: Option<i64>,
}

config_object!(NtpServer, "ntp_server", NtpServerRequest, NtpServerRequest);

/// `syslog_server`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyslogServer {
    pub id: i64,
    pub address: String,
    pub port: i64,
    pub description: String,
    pub transport: String,
    pub audit_log: bool,
    pub support_log: bool,
    pub web_log: bool,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SyslogServerRequest {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_log: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_log: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_log: Option<bool>,
}

config_object!(SyslogServer, "syslog_server", SyslogServerRequest, SyslogServerRequest);

/// `snmp_network_management_system`. The trap community is write-only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnmpNetworkManagementSystem {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub address: String,
    pub port: i64,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SnmpNetworkManagementSystemRequest {
    pub name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snmp_trap_community: Option<String>,
}

config_object!(
    SnmpNetworkManagementSystem,
    "snmp_network_management_system",
    SnmpNetworkManagementSystemRequest,
    SnmpNetworkManagementSystemRequest
);

/// `static_route`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticRoute {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub prefix: i64,
    pub gateway: String,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StaticRouteRequest {
    pub name: String,
    pub address: String,
    pub prefix: i64,
    pub gateway: String,
}

config_object!(StaticRoute, "static_route", StaticRouteRequest, StaticRouteRequest);

/// `system_location`. Server lists come back either as URIs or as inline
/// objects; both decode to URIs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemLocation {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(deserialize_with = "related_uris")]
    pub dns_servers: Vec<String>,
    #[serde(deserialize_with = "related_uris")]
    pub ntp_servers: Vec<String>,
    #[serde(deserialize_with = "related_uris")]
    pub syslog_servers: Vec<String>,
    pub mtu: i64,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SystemLocationRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_servers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ntp_servers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syslog_servers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<i64>,
}

config_object!(SystemLocation, "system_location", SystemLocationRequest, SystemLocationRequest);

/// `smtp_server`. The password is write-only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpServer {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub address: String,
    pub port: i64,
    pub username: String,
    pub from_email_address: String,
    pub connection_security: String,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SmtpServerRequest {
    pub name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_security: Option<String>,
}

config_object!(SmtpServer, "smtp_server", SmtpServerRequest, SmtpServerRequest);

/// `worker_vm`. The node password is write-only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerVm {
    pub id: i64,
    pub name: String,
    pub hostname: String,
    pub domain: String,
    pub address: String,
    pub netmask: String,
    pub gateway: String,
    #[serde(deserialize_with = "related_uri")]
    pub system_location: Option<String>,
    pub node_type: String,
    pub transcoding: bool,
    pub maintenance_mode: bool,
    pub maintenance_mode_reason: String,
    pub description: String,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct WorkerVmRequest {
    pub name: String,
    pub hostname: String,
    pub domain: String,
    pub address: String,
    pub netmask: String,
    pub gateway: String,
    pub system_location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcoding: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_mode_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

config_object!(WorkerVm, "worker_vm", WorkerVmRequest, WorkerVmRequest);

/// `event_sink`. The password is write-only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSink {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub url: String,
    pub username: String,
    pub bulk_support: bool,
    pub verify_tls_certificate: bool,
    pub version: i64,
    pub resource_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EventSinkRequest {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bulk_support: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_tls_certificate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

config_object!(EventSink, "event_sink", EventSinkRequest, EventSinkRequest);
