//! The provider side of the plugin protocol.
//!
//! [`ProviderService`] is the JSON-level interface a provider implements;
//! [`serve`] wraps it in the gRPC service from `proto/provider.proto` and
//! runs it on a local port.
//!
//! # Errors
//!
//! Handler errors never surface as gRPC statuses. Every RPC answers `Ok`
//! and carries failures as error diagnostics in the response, so the host
//! can show the summary and detail to the user.
//!
//! # Signal Handling
//!
//! On SIGTERM or SIGINT the server stops accepting connections, waits up
//! to [`ServeOptions::shutdown_timeout`] for in-flight requests, then calls
//! [`ProviderService::stop`].

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::net::TcpListener;
use tonic::transport::Server;
use tracing::{debug, error, info, instrument, warn};

use crate::error::ProviderError;
use crate::generated;
use crate::schema::{Block, BlockNestingMode, Diagnostic, DiagnosticSeverity, ProviderSchema, Schema};
use crate::types::{
    ImportedResource, PlanResult, ProgressEvent, ProviderMetadata, HANDSHAKE_PREFIX,
    PROTOCOL_VERSION,
};

/// JSON-level provider interface.
///
/// Only the schema, configuration and CRUD calls are required; the rest
/// default to "nothing to check" or "not supported".
#[async_trait::async_trait]
pub trait ProviderService: Send + Sync + 'static {
    // =========================================================================
    // Schema & Metadata
    // =========================================================================

    /// Schemas of the provider block and every resource, data source and
    /// action.
    fn schema(&self) -> ProviderSchema;

    /// Type names served, derived from the schema by default.
    fn metadata(&self) -> ProviderMetadata {
        let schema = self.schema();
        let sorted = |mut names: Vec<String>| {
            names.sort();
            names
        };
        ProviderMetadata {
            resources: sorted(schema.resources.into_keys().collect()),
            data_sources: sorted(schema.data_sources.into_keys().collect()),
            actions: sorted(schema.actions.into_keys().collect()),
            capabilities: Default::default(),
        }
    }

    // =========================================================================
    // Provider Lifecycle
    // =========================================================================

    /// Check the provider block without configuring.
    async fn validate_provider_config(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let _ = config;
        Ok(vec![])
    }

    /// Configure the provider. Error diagnostics leave it unconfigured.
    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError>;

    /// Release resources before the process exits.
    async fn stop(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    // =========================================================================
    // Resource Operations
    // =========================================================================

    /// Check a resource configuration before planning.
    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let _ = (resource_type, config);
        Ok(vec![])
    }

    /// Upgrade state written by an older schema version.
    async fn upgrade_resource_state(
        &self,
        resource_type: &str,
        version: i64,
        state: Value,
    ) -> Result<Value, ProviderError> {
        let _ = (resource_type, version);
        Ok(state)
    }

    /// Plan the change from `prior_state` to `proposed_state`.
    async fn plan(
        &self,
        resource_type: &str,
        prior_state: Option<Value>,
        proposed_state: Value,
        config: Value,
    ) -> Result<PlanResult, ProviderError>;

    /// Create a resource.
    async fn create(&self, resource_type: &str, planned_state: Value) -> Result<Value, ProviderError>;

    /// Refresh a resource. `Value::Null` means it no longer exists.
    async fn read(&self, resource_type: &str, current_state: Value) -> Result<Value, ProviderError>;

    /// Update a resource in place.
    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError>;

    /// Delete a resource.
    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), ProviderError>;

    /// Adopt an existing object by id.
    async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        let _ = id;
        Err(ProviderError::Unimplemented(format!(
            "import is not supported for {}",
            resource_type
        )))
    }

    // =========================================================================
    // Data Sources & Actions
    // =========================================================================

    /// Check a data source configuration.
    async fn validate_data_source_config(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let _ = (data_source_type, config);
        Ok(vec![])
    }

    /// Read a data source.
    async fn read_data_source(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Value, ProviderError> {
        let _ = config;
        Err(ProviderError::UnknownResource(data_source_type.to_string()))
    }

    /// Run an action, returning its progress events.
    async fn invoke_action(
        &self,
        action_type: &str,
        config: Value,
    ) -> Result<Vec<ProgressEvent>, ProviderError> {
        let _ = config;
        Err(ProviderError::UnknownResource(action_type.to_string()))
    }
}

/// Wrapper that implements the generated gRPC trait.
struct ProviderGrpcService<P: ProviderService> {
    provider: Arc<P>,
}

fn diagnostics_to_proto(diagnostics: Vec<Diagnostic>) -> Vec<generated::Diagnostic> {
    diagnostics
        .into_iter()
        .map(|d| generated::Diagnostic {
            severity: match d.severity {
                DiagnosticSeverity::Error => generated::diagnostic::Severity::Error as i32,
                DiagnosticSeverity::Warning => generated::diagnostic::Severity::Warning as i32,
            },
            summary: d.summary,
            detail: d.detail.unwrap_or_default(),
            attribute: d.attribute.unwrap_or_default(),
        })
        .collect()
}

fn error_to_diagnostics(err: &ProviderError) -> Vec<generated::Diagnostic> {
    diagnostics_to_proto(vec![err.to_diagnostic()])
}

fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

/// Decode a JSON payload. Empty bytes are `null`.
fn decode(bytes: &[u8]) -> Result<Value, ProviderError> {
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes)
        .map_err(|err| ProviderError::InvalidRequest(format!("payload is not valid JSON: {}", err)))
}

fn encode(value: &Value) -> Vec<u8> {
    serde_json::to_vec(value).unwrap_or_default()
}

fn schema_to_proto(schema: &Schema) -> generated::Schema {
    generated::Schema {
        version: schema.version as i64,
        block: Some(block_to_proto(&schema.block)),
    }
}

fn schemas_to_proto(
    schemas: &std::collections::HashMap<String, Schema>,
) -> std::collections::HashMap<String, generated::Schema> {
    schemas
        .iter()
        .map(|(name, schema)| (name.clone(), schema_to_proto(schema)))
        .collect()
}

fn block_to_proto(block: &Block) -> generated::Block {
    generated::Block {
        attributes: block
            .attributes
            .iter()
            .map(|(name, attr)| generated::Attribute {
                name: name.clone(),
                r#type: serde_json::to_vec(&attr.attr_type).unwrap_or_default(),
                required: attr.flags.required,
                optional: attr.flags.optional,
                computed: attr.flags.computed,
                sensitive: attr.flags.sensitive,
                description: attr.description.clone().unwrap_or_default(),
                force_new: attr.force_new,
                default_value: attr.default.as_ref().map(encode).unwrap_or_default(),
                validators: if attr.validators.is_empty() {
                    Vec::new()
                } else {
                    serde_json::to_vec(&attr.validators).unwrap_or_default()
                },
            })
            .collect(),
        block_types: block
            .blocks
            .iter()
            .map(|(name, nested)| generated::NestedBlock {
                type_name: name.clone(),
                block: Some(block_to_proto(&nested.block)),
                nesting_mode: match nested.nesting_mode {
                    BlockNestingMode::Single => generated::nested_block::NestingMode::Single as i32,
                    BlockNestingMode::List => generated::nested_block::NestingMode::List as i32,
                    BlockNestingMode::Set => generated::nested_block::NestingMode::Set as i32,
                    BlockNestingMode::Map => generated::nested_block::NestingMode::Map as i32,
                },
                min_items: nested.min_items as i32,
                max_items: nested.max_items as i32,
            })
            .collect(),
        description: block.description.clone().unwrap_or_default(),
    }
}

type RpcResult<T> = Result<tonic::Response<T>, tonic::Status>;

#[tonic::async_trait]
impl<P: ProviderService> generated::provider_server::Provider for ProviderGrpcService<P> {
    #[instrument(skip_all, name = "grpc.get_metadata")]
    async fn get_metadata(
        &self,
        _request: tonic::Request<generated::GetMetadataRequest>,
    ) -> RpcResult<generated::GetMetadataResponse> {
        let metadata = self.provider.metadata();
        debug!(
            resources = metadata.resources.len(),
            data_sources = metadata.data_sources.len(),
            actions = metadata.actions.len(),
            "GetMetadata completed"
        );
        Ok(tonic::Response::new(generated::GetMetadataResponse {
            server_capabilities: Some(generated::ServerCapabilities {
                plan_destroy: metadata.capabilities.plan_destroy,
            }),
            resources: metadata.resources,
            data_sources: metadata.data_sources,
            actions: metadata.actions,
            diagnostics: vec![],
        }))
    }

    #[instrument(skip_all, name = "grpc.get_schema")]
    async fn get_schema(
        &self,
        _request: tonic::Request<generated::GetSchemaRequest>,
    ) -> RpcResult<generated::GetSchemaResponse> {
        let schema = self.provider.schema();
        debug!(
            resources = schema.resources.len(),
            data_sources = schema.data_sources.len(),
            actions = schema.actions.len(),
            "GetSchema completed"
        );
        Ok(tonic::Response::new(generated::GetSchemaResponse {
            provider: Some(schema_to_proto(&schema.provider)),
            resources: schemas_to_proto(&schema.resources),
            data_sources: schemas_to_proto(&schema.data_sources),
            actions: schemas_to_proto(&schema.actions),
            diagnostics: vec![],
        }))
    }

    #[instrument(skip_all, name = "grpc.validate_provider_config")]
    async fn validate_provider_config(
        &self,
        request: tonic::Request<generated::ValidateProviderConfigRequest>,
    ) -> RpcResult<generated::ValidateProviderConfigResponse> {
        let req = request.into_inner();
        let result = match decode(&req.config) {
            Ok(config) => self.provider.validate_provider_config(config).await,
            Err(e) => Err(e),
        };

        let diagnostics = match result {
            Ok(diagnostics) => {
                if has_errors(&diagnostics) {
                    warn!(diagnostics = diagnostics.len(), "provider configuration is invalid");
                }
                diagnostics_to_proto(diagnostics)
            },
            Err(e) => {
                error!(error = %e, "ValidateProviderConfig failed");
                error_to_diagnostics(&e)
            },
        };
        Ok(tonic::Response::new(generated::ValidateProviderConfigResponse { diagnostics }))
    }

    #[instrument(skip_all, name = "grpc.configure")]
    async fn configure(
        &self,
        request: tonic::Request<generated::ConfigureRequest>,
    ) -> RpcResult<generated::ConfigureResponse> {
        let req = request.into_inner();
        let result = match decode(&req.config) {
            Ok(config) => self.provider.configure(config).await,
            Err(e) => Err(e),
        };

        let diagnostics = match result {
            Ok(diagnostics) => {
                if has_errors(&diagnostics) {
                    warn!(diagnostics = diagnostics.len(), "Configure completed with errors");
                } else {
                    info!("Configure completed");
                }
                diagnostics_to_proto(diagnostics)
            },
            Err(e) => {
                error!(error = %e, "Configure failed");
                error_to_diagnostics(&e)
            },
        };
        Ok(tonic::Response::new(generated::ConfigureResponse { diagnostics }))
    }

    #[instrument(skip_all, name = "grpc.stop")]
    async fn stop(
        &self,
        _request: tonic::Request<generated::StopRequest>,
    ) -> RpcResult<generated::StopResponse> {
        info!("Stop called");
        let error = match self.provider.stop().await {
            Ok(()) => String::new(),
            Err(e) => {
                error!(error = %e, "Stop failed");
                e.to_string()
            },
        };
        Ok(tonic::Response::new(generated::StopResponse { error }))
    }

    #[instrument(skip_all, name = "grpc.validate_resource_config", fields(resource_type))]
    async fn validate_resource_config(
        &self,
        request: tonic::Request<generated::ValidateResourceConfigRequest>,
    ) -> RpcResult<generated::ValidateResourceConfigResponse> {
        let req = request.into_inner();
        tracing::Span::current().record("resource_type", req.resource_type.as_str());
        let result = match decode(&req.config) {
            Ok(config) => {
                self.provider
                    .validate_resource_config(&req.resource_type, config)
                    .await
            },
            Err(e) => Err(e),
        };

        let diagnostics = match result {
            Ok(diagnostics) => {
                if has_errors(&diagnostics) {
                    debug!(diagnostics = diagnostics.len(), "resource configuration is invalid");
                }
                diagnostics_to_proto(diagnostics)
            },
            Err(e) => {
                error!(error = %e, "ValidateResourceConfig failed");
                error_to_diagnostics(&e)
            },
        };
        Ok(tonic::Response::new(generated::ValidateResourceConfigResponse { diagnostics }))
    }

    #[instrument(skip_all, name = "grpc.upgrade_resource_state", fields(resource_type))]
    async fn upgrade_resource_state(
        &self,
        request: tonic::Request<generated::UpgradeResourceStateRequest>,
    ) -> RpcResult<generated::UpgradeResourceStateResponse> {
        let req = request.into_inner();
        tracing::Span::current().record("resource_type", req.resource_type.as_str());
        let result = match decode(&req.raw_state) {
            Ok(state) => {
                self.provider
                    .upgrade_resource_state(&req.resource_type, req.version, state)
                    .await
            },
            Err(e) => Err(e),
        };

        let response = match result {
            Ok(upgraded) => {
                debug!(from_version = req.version, "UpgradeResourceState completed");
                generated::UpgradeResourceStateResponse {
                    upgraded_state: encode(&upgraded),
                    diagnostics: vec![],
                }
            },
            Err(e) => {
                error!(version = req.version, error = %e, "UpgradeResourceState failed");
                generated::UpgradeResourceStateResponse {
                    upgraded_state: vec![],
                    diagnostics: error_to_diagnostics(&e),
                }
            },
        };
        Ok(tonic::Response::new(response))
    }

    #[instrument(skip_all, name = "grpc.plan", fields(resource_type))]
    async fn plan(
        &self,
        request: tonic::Request<generated::PlanRequest>,
    ) -> RpcResult<generated::PlanResponse> {
        let req = request.into_inner();
        tracing::Span::current().record("resource_type", req.resource_type.as_str());

        let result = async {
            let prior_state = match decode(&req.prior_state)? {
                Value::Null => None,
                prior => Some(prior),
            };
            let proposed_state = decode(&req.proposed_state)?;
            let config = decode(&req.config)?;
            self.provider
                .plan(&req.resource_type, prior_state, proposed_state, config)
                .await
        }
        .await;

        let response = match result {
            Ok(plan) => {
                info!(
                    changes = plan.changes.len(),
                    requires_replace = plan.requires_replace,
                    "Plan completed"
                );
                generated::PlanResponse {
                    planned_state: encode(&plan.planned_state),
                    changes: plan.changes.into_iter().map(Into::into).collect(),
                    requires_replace: plan.requires_replace,
                    diagnostics: vec![],
                }
            },
            Err(e) => {
                error!(error = %e, "Plan failed");
                generated::PlanResponse {
                    planned_state: vec![],
                    changes: vec![],
                    requires_replace: false,
                    diagnostics: error_to_diagnostics(&e),
                }
            },
        };
        Ok(tonic::Response::new(response))
    }

    #[instrument(skip_all, name = "grpc.create", fields(resource_type))]
    async fn create(
        &self,
        request: tonic::Request<generated::CreateRequest>,
    ) -> RpcResult<generated::CreateResponse> {
        let req = request.into_inner();
        tracing::Span::current().record("resource_type", req.resource_type.as_str());
        let result = match decode(&req.planned_state) {
            Ok(planned) => self.provider.create(&req.resource_type, planned).await,
            Err(e) => Err(e),
        };

        let response = match result {
            Ok(state) => {
                info!("Create completed");
                generated::CreateResponse {
                    state: encode(&state),
                    diagnostics: vec![],
                }
            },
            Err(e) => {
                error!(error = %e, "Create failed");
                generated::CreateResponse {
                    state: vec![],
                    diagnostics: error_to_diagnostics(&e),
                }
            },
        };
        Ok(tonic::Response::new(response))
    }

    #[instrument(skip_all, name = "grpc.read", fields(resource_type))]
    async fn read(
        &self,
        request: tonic::Request<generated::ReadRequest>,
    ) -> RpcResult<generated::ReadResponse> {
        let req = request.into_inner();
        tracing::Span::current().record("resource_type", req.resource_type.as_str());
        let result = match decode(&req.current_state) {
            Ok(current) => self.provider.read(&req.resource_type, current).await,
            Err(e) => Err(e),
        };

        let response = match result {
            Ok(state) => {
                debug!(removed = state.is_null(), "Read completed");
                generated::ReadResponse {
                    state: encode(&state),
                    diagnostics: vec![],
                }
            },
            Err(e) => {
                error!(error = %e, "Read failed");
                generated::ReadResponse {
                    state: vec![],
                    diagnostics: error_to_diagnostics(&e),
                }
            },
        };
        Ok(tonic::Response::new(response))
    }

    #[instrument(skip_all, name = "grpc.update", fields(resource_type))]
    async fn update(
        &self,
        request: tonic::Request<generated::UpdateRequest>,
    ) -> RpcResult<generated::UpdateResponse> {
        let req = request.into_inner();
        tracing::Span::current().record("resource_type", req.resource_type.as_str());
        let result = async {
            let prior = decode(&req.prior_state)?;
            let planned = decode(&req.planned_state)?;
            self.provider.update(&req.resource_type, prior, planned).await
        }
        .await;

        let response = match result {
            Ok(state) => {
                info!("Update completed");
                generated::UpdateResponse {
                    state: encode(&state),
                    diagnostics: vec![],
                }
            },
            Err(e) => {
                error!(error = %e, "Update failed");
                generated::UpdateResponse {
                    state: vec![],
                    diagnostics: error_to_diagnostics(&e),
                }
            },
        };
        Ok(tonic::Response::new(response))
    }

    #[instrument(skip_all, name = "grpc.delete", fields(resource_type))]
    async fn delete(
        &self,
        request: tonic::Request<generated::DeleteRequest>,
    ) -> RpcResult<generated::DeleteResponse> {
        let req = request.into_inner();
        tracing::Span::current().record("resource_type", req.resource_type.as_str());
        let result = match decode(&req.current_state) {
            Ok(current) => self.provider.delete(&req.resource_type, current).await,
            Err(e) => Err(e),
        };

        let diagnostics = match result {
            Ok(()) => {
                info!("Delete completed");
                vec![]
            },
            Err(e) => {
                error!(error = %e, "Delete failed");
                error_to_diagnostics(&e)
            },
        };
        Ok(tonic::Response::new(generated::DeleteResponse { diagnostics }))
    }

    #[instrument(skip_all, name = "grpc.import_resource_state", fields(resource_type, id))]
    async fn import_resource_state(
        &self,
        request: tonic::Request<generated::ImportResourceStateRequest>,
    ) -> RpcResult<generated::ImportResourceStateResponse> {
        let req = request.into_inner();
        let span = tracing::Span::current();
        span.record("resource_type", req.resource_type.as_str());
        span.record("id", req.id.as_str());

        let response = match self
            .provider
            .import_resource(&req.resource_type, &req.id)
            .await
        {
            Ok(imported) => {
                info!(imported = imported.len(), "ImportResourceState completed");
                generated::ImportResourceStateResponse {
                    imported: imported
                        .into_iter()
                        .map(|r| generated::ImportedResource {
                            resource_type: r.resource_type,
                            state: encode(&r.state),
                        })
                        .collect(),
                    diagnostics: vec![],
                }
            },
            Err(e) => {
                error!(error = %e, "ImportResourceState failed");
                generated::ImportResourceStateResponse {
                    imported: vec![],
                    diagnostics: error_to_diagnostics(&e),
                }
            },
        };
        Ok(tonic::Response::new(response))
    }

    #[instrument(skip_all, name = "grpc.validate_data_source_config", fields(data_source_type))]
    async fn validate_data_source_config(
        &self,
        request: tonic::Request<generated::ValidateDataSourceConfigRequest>,
    ) -> RpcResult<generated::ValidateDataSourceConfigResponse> {
        let req = request.into_inner();
        tracing::Span::current().record("data_source_type", req.data_source_type.as_str());
        let result = match decode(&req.config) {
            Ok(config) => {
                self.provider
                    .validate_data_source_config(&req.data_source_type, config)
                    .await
            },
            Err(e) => Err(e),
        };

        let diagnostics = match result {
            Ok(diagnostics) => diagnostics_to_proto(diagnostics),
            Err(e) => {
                error!(error = %e, "ValidateDataSourceConfig failed");
                error_to_diagnostics(&e)
            },
        };
        Ok(tonic::Response::new(generated::ValidateDataSourceConfigResponse { diagnostics }))
    }

    #[instrument(skip_all, name = "grpc.read_data_source", fields(data_source_type))]
    async fn read_data_source(
        &self,
        request: tonic::Request<generated::ReadDataSourceRequest>,
    ) -> RpcResult<generated::ReadDataSourceResponse> {
        let req = request.into_inner();
        tracing::Span::current().record("data_source_type", req.data_source_type.as_str());
        let result = match decode(&req.config) {
            Ok(config) => {
                self.provider
                    .read_data_source(&req.data_source_type, config)
                    .await
            },
            Err(e) => Err(e),
        };

        let response = match result {
            Ok(state) => {
                debug!("ReadDataSource completed");
                generated::ReadDataSourceResponse {
                    state: encode(&state),
                    diagnostics: vec![],
                }
            },
            Err(e) => {
                error!(error = %e, "ReadDataSource failed");
                generated::ReadDataSourceResponse {
                    state: vec![],
                    diagnostics: error_to_diagnostics(&e),
                }
            },
        };
        Ok(tonic::Response::new(response))
    }

    #[instrument(skip_all, name = "grpc.invoke_action", fields(action_type))]
    async fn invoke_action(
        &self,
        request: tonic::Request<generated::InvokeActionRequest>,
    ) -> RpcResult<generated::InvokeActionResponse> {
        let req = request.into_inner();
        tracing::Span::current().record("action_type", req.action_type.as_str());
        let result = match decode(&req.config) {
            Ok(config) => self.provider.invoke_action(&req.action_type, config).await,
            Err(e) => Err(e),
        };

        let response = match result {
            Ok(events) => {
                info!(events = events.len(), "InvokeAction completed");
                generated::InvokeActionResponse {
                    events: events.into_iter().map(Into::into).collect(),
                    diagnostics: vec![],
                }
            },
            Err(e) => {
                error!(error = %e, "InvokeAction failed");
                generated::InvokeActionResponse {
                    events: vec![],
                    diagnostics: error_to_diagnostics(&e),
                }
            },
        };
        Ok(tonic::Response::new(response))
    }
}

/// Options for running the provider server.
#[derive(Debug, Clone)]
pub struct ServeOptions {
    /// How long to wait for in-flight requests once a shutdown signal
    /// arrives. Default: 30 seconds.
    pub shutdown_timeout: Duration,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

impl ServeOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shutdown timeout.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

/// Wait for SIGTERM or SIGINT (CTRL+C elsewhere).
async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
                    _ = sigint.recv() => info!("received SIGINT, shutting down"),
                }
                return;
            },
            (Err(err), _) | (_, Err(err)) => {
                warn!(error = %err, "could not install signal handlers, falling back to CTRL+C");
            },
        }
    }

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received CTRL+C, shutting down"),
        Err(err) => {
            error!(error = %err, "could not listen for CTRL+C, serving until killed");
            std::future::pending::<()>().await;
        },
    }
}

/// Serve a provider over gRPC on a free localhost port.
///
/// Prints the handshake line `PEXIP_PROVIDER|<version>|<address>` on
/// stdout once the port is bound, then serves until a shutdown signal.
pub async fn serve<P: ProviderService>(provider: P) -> Result<(), Box<dyn std::error::Error>> {
    serve_with_options(provider, ServeOptions::default()).await
}

/// [`serve`] with custom options.
pub async fn serve_with_options<P: ProviderService>(
    provider: P,
    options: ServeOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    serve_on_listener(provider, listener, addr, options).await
}

/// Format the handshake line for an address.
pub fn handshake_line(addr: SocketAddr) -> String {
    format!("{}|{}|{}", HANDSHAKE_PREFIX, PROTOCOL_VERSION, addr)
}

async fn serve_on_listener<P: ProviderService>(
    provider: P,
    listener: TcpListener,
    addr: SocketAddr,
    options: ServeOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", handshake_line(addr));

    info!(address = %addr, "provider server starting");

    let provider = Arc::new(provider);
    let grpc_service = ProviderGrpcService {
        provider: Arc::clone(&provider),
    };
    let server = generated::provider_server::ProviderServer::new(grpc_service);

    let (signalled_tx, signalled_rx) = tokio::sync::oneshot::channel::<()>();
    let server_future = Server::builder()
        .add_service(server)
        .serve_with_incoming_shutdown(
            tokio_stream::wrappers::TcpListenerStream::new(listener),
            async move {
                wait_for_shutdown_signal().await;
                let _ = signalled_tx.send(());
            },
        );
    tokio::pin!(server_future);

    // The timeout only bounds the drain after a signal.
    let result = tokio::select! {
        result = &mut server_future => result,
        _ = signalled_rx => {
            match tokio::time::timeout(options.shutdown_timeout, &mut server_future).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(timeout = ?options.shutdown_timeout, "shutdown timeout exceeded, forcing shutdown");
                    Ok(())
                },
            }
        }
    };

    if let Err(e) = result {
        error!(error = %e, "server error");
        return Err(ProviderError::from(e).into());
    }

    debug!("calling provider stop()");
    if let Err(e) = provider.stop().await {
        warn!(error = %e, "provider stop() returned an error");
    }

    info!("provider shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generated::provider_server::Provider;
    use crate::infinity::{InfinityClient, MockTransport};
    use crate::provider::InfinityProvider;
    use crate::schema::Validator;
    use serde_json::json;

    fn service() -> (Arc<MockTransport>, ProviderGrpcService<InfinityProvider>) {
        let mock = Arc::new(MockTransport::new());
        let provider = InfinityProvider::with_client(InfinityClient::with_transport(mock.clone()));
        (
            mock,
            ProviderGrpcService {
                provider: Arc::new(provider),
            },
        )
    }

    #[test]
    fn test_handshake_line() {
        let addr: SocketAddr = "127.0.0.1:50051".parse().unwrap();
        assert_eq!(handshake_line(addr), "PEXIP_PROVIDER|1|127.0.0.1:50051");
    }

    #[test]
    fn test_block_to_proto_carries_validators() {
        let schema = Schema::v0().with_attribute(
            "address",
            crate::schema::Attribute::required_string().with_validator(Validator::IpAddress),
        );
        let block = block_to_proto(&schema.block);

        let validators: Vec<Validator> =
            serde_json::from_slice(&block.attributes[0].validators).unwrap();
        assert_eq!(validators, vec![Validator::IpAddress]);
    }

    #[tokio::test]
    async fn test_get_metadata_lists_actions() {
        let (_, service) = service();
        let metadata = service
            .get_metadata(tonic::Request::new(generated::GetMetadataRequest {}))
            .await
            .unwrap()
            .into_inner();

        assert!(metadata.resources.contains(&"pexip_infinity_dns_server".to_string()));
        assert_eq!(
            metadata.actions,
            vec!["pexip_infinity_delete_default_management_certificate".to_string()]
        );
        let mut sorted = metadata.resources.clone();
        sorted.sort();
        assert_eq!(metadata.resources, sorted);
    }

    #[tokio::test]
    async fn test_errors_become_diagnostics() {
        let (mock, service) = service();
        mock.fail_next(crate::infinity::Method::Post, "dns_server", 500, "Internal Server Error");

        let response = service
            .create(tonic::Request::new(generated::CreateRequest {
                resource_type: "pexip_infinity_dns_server".to_string(),
                planned_state: serde_json::to_vec(&json!({"address": "1.1.1.1"})).unwrap(),
            }))
            .await
            .unwrap()
            .into_inner();

        assert!(response.state.is_empty());
        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(
            response.diagnostics[0].summary,
            "Error Creating Infinity DNS server"
        );
        assert!(!response.diagnostics[0].detail.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_json_payload_is_a_diagnostic() {
        let (_, service) = service();
        let response = service
            .read(tonic::Request::new(generated::ReadRequest {
                resource_type: "pexip_infinity_dns_server".to_string(),
                current_state: b"{not json".to_vec(),
            }))
            .await
            .unwrap()
            .into_inner();

        assert!(response.diagnostics[0].summary.starts_with("Invalid request"));
    }

    #[tokio::test]
    async fn test_invoke_action_returns_events() {
        let (mock, service) = service();
        mock.insert(
            "tls_certificate",
            json!({"subject_name": "pexip.local", "issuer_name": "pexip.local", "serial_no": "01"}),
        );

        let response = service
            .invoke_action(tonic::Request::new(generated::InvokeActionRequest {
                action_type: "pexip_infinity_delete_default_management_certificate".to_string(),
                config: Vec::new(),
            }))
            .await
            .unwrap()
            .into_inner();

        assert!(response.diagnostics.is_empty());
        assert_eq!(response.events.len(), 3);
        assert!(mock.is_empty("tls_certificate"));
    }
}
