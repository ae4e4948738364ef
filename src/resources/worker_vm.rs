//! `pexip_infinity_worker_vm`: a conferencing or proxying node.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{
    create_object_id, delete_object, import_error, parse_import_id, read_object,
    required_resource_id, resource_schema, update_object, Resource,
};
use crate::error::ProviderError;
use crate::infinity::types::{WorkerVm, WorkerVmRequest};
use crate::infinity::InfinityClient;
use crate::schema::{Attribute, Schema, Validator};

const WHAT: &str = "worker VM";

/// State of a `pexip_infinity_worker_vm`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerVmModel {
    /// Resource URI assigned by the node.
    pub id: Option<String>,
    /// Numeric id used in API paths.
    pub resource_id: Option<i64>,
    /// Unique name.
    pub name: Option<String>,
    /// Host name.
    pub hostname: Option<String>,
    /// DNS domain.
    pub domain: Option<String>,
    /// IPv4 address of the node; changing it replaces the node.
    pub address: Option<String>,
    /// Network mask.
    pub netmask: Option<String>,
    /// Default gateway.
    pub gateway: Option<String>,
    /// Resource URI of the node's system location.
    pub system_location: Option<String>,
    /// Node role.
    pub node_type: Option<String>,
    /// Whether the node transcodes media.
    pub transcoding: Option<bool>,
    /// Console password of the node. Write-only.
    pub password: Option<String>,
    /// Whether the node is in maintenance mode.
    pub maintenance_mode: Option<bool>,
    /// Why maintenance mode was set.
    pub maintenance_mode_reason: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
}

/// Manages worker VMs.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerVmResource;

fn request(plan: &WorkerVmModel) -> WorkerVmRequest {
    WorkerVmRequest {
        name: plan.name.clone().unwrap_or_default(),
        hostname: plan.hostname.clone().unwrap_or_default(),
        domain: plan.domain.clone().unwrap_or_default(),
        address: plan.address.clone().unwrap_or_default(),
        netmask: plan.netmask.clone().unwrap_or_default(),
        gateway: plan.gateway.clone().unwrap_or_default(),
        system_location: plan.system_location.clone().unwrap_or_default(),
        node_type: plan.node_type.clone(),
        transcoding: plan.transcoding,
        password: plan.password.clone(),
        maintenance_mode: plan.maintenance_mode,
        maintenance_mode_reason: plan.maintenance_mode_reason.clone(),
        description: plan.description.clone(),
    }
}

async fn read(
    client: &InfinityClient,
    id: i64,
    known: &WorkerVmModel,
) -> Result<WorkerVmModel, ProviderError> {
    let vm: WorkerVm = read_object(client, WHAT, id).await?;
    Ok(WorkerVmModel {
        id: Some(vm.resource_uri),
        resource_id: Some(id),
        name: Some(vm.name),
        hostname: Some(vm.hostname),
        domain: Some(vm.domain),
        address: Some(vm.address),
        netmask: Some(vm.netmask),
        gateway: Some(vm.gateway),
        system_location: vm.system_location,
        node_type: Some(vm.node_type),
        transcoding: Some(vm.transcoding),
        password: known.password.clone(),
        maintenance_mode: Some(vm.maintenance_mode),
        maintenance_mode_reason: Some(vm.maintenance_mode_reason),
        description: Some(vm.description),
    })
}

#[async_trait]
impl Resource for WorkerVmResource {
    type Model = WorkerVmModel;

    fn type_name(&self) -> &'static str {
        "pexip_infinity_worker_vm"
    }

    fn schema(&self) -> Schema {
        resource_schema("Manages a worker VM (conferencing or proxying node).")
            .with_attribute(
                "name",
                Attribute::required_string().with_validator(Validator::length(1, 32)),
            )
            .with_attribute(
                "hostname",
                Attribute::required_string().with_validator(Validator::length(1, 63)),
            )
            .with_attribute(
                "domain",
                Attribute::required_string().with_validator(Validator::length(1, 192)),
            )
            .with_attribute(
                "address",
                Attribute::required_string()
                    .with_force_new()
                    .with_description("IPv4 address of the node; changing it replaces the node")
                    .with_validator(Validator::IpAddress),
            )
            .with_attribute(
                "netmask",
                Attribute::required_string().with_validator(Validator::IpAddress),
            )
            .with_attribute(
                "gateway",
                Attribute::required_string().with_validator(Validator::IpAddress),
            )
            .with_attribute(
                "system_location",
                Attribute::required_string()
                    .with_description("Resource URI of the system location"),
            )
            .with_attribute(
                "node_type",
                Attribute::optional_string()
                    .with_default(json!("CONFERENCING"))
                    .with_validator(Validator::one_of(["CONFERENCING", "PROXYING"])),
            )
            .with_attribute("transcoding", Attribute::optional_computed_bool())
            .with_attribute(
                "password",
                Attribute::optional_string()
                    .sensitive()
                    .with_description("Console password of the node"),
            )
            .with_attribute("maintenance_mode", Attribute::optional_computed_bool())
            .with_attribute(
                "maintenance_mode_reason",
                Attribute::optional_computed_string().with_validator(Validator::max_length(250)),
            )
            .with_attribute(
                "description",
                Attribute::optional_computed_string().with_validator(Validator::max_length(250)),
            )
    }

    async fn create(
        &self,
        client: &InfinityClient,
        plan: WorkerVmModel,
    ) -> Result<WorkerVmModel, ProviderError> {
        let id = create_object_id::<WorkerVm>(client, WHAT, &request(&plan)).await?;
        read(client, id, &plan).await
    }

    async fn read(
        &self,
        client: &InfinityClient,
        state: WorkerVmModel,
    ) -> Result<WorkerVmModel, ProviderError> {
        read(client, required_resource_id(state.resource_id)?, &state).await
    }

    async fn update(
        &self,
        client: &InfinityClient,
        prior: WorkerVmModel,
        plan: WorkerVmModel,
    ) -> Result<WorkerVmModel, ProviderError> {
        let id = required_resource_id(prior.resource_id)?;
        update_object::<WorkerVm>(client, WHAT, id, &request(&plan)).await?;
        read(client, id, &plan).await
    }

    async fn delete(
        &self,
        client: &InfinityClient,
        state: WorkerVmModel,
    ) -> Result<(), ProviderError> {
        let id = required_resource_id(state.resource_id)?;
        delete_object::<WorkerVm>(client, WHAT, &id.to_string()).await
    }

    async fn import_state(
        &self,
        client: &InfinityClient,
        id: &str,
    ) -> Result<WorkerVmModel, ProviderError> {
        let id = parse_import_id(id)?;
        read(client, id, &WorkerVmModel::default())
            .await
            .map_err(|err| import_error(WHAT, id, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::mock_client;

    #[tokio::test]
    async fn test_maintenance_mode_update() {
        let (mock, client) = mock_client();
        let plan = WorkerVmModel {
            name: Some("w1".to_string()),
            hostname: Some("w1".to_string()),
            domain: Some("example.com".to_string()),
            address: Some("10.0.0.10".to_string()),
            netmask: Some("255.255.255.0".to_string()),
            gateway: Some("10.0.0.1".to_string()),
            system_location: Some("/api/admin/configuration/v1/system_location/1/".to_string()),
            ..Default::default()
        };
        let state = WorkerVmResource.create(&client, plan).await.unwrap();
        assert_eq!(state.maintenance_mode, Some(false));

        let planned = WorkerVmModel {
            maintenance_mode: Some(true),
            maintenance_mode_reason: Some("patching".to_string()),
            ..state.clone()
        };
        let updated = WorkerVmResource.update(&client, state, planned).await.unwrap();

        assert_eq!(updated.maintenance_mode, Some(true));
        assert_eq!(updated.maintenance_mode_reason.as_deref(), Some("patching"));
        assert_eq!(mock.object("worker_vm", "1").unwrap()["maintenance_mode"], true);
    }
}
