//! Pexip Infinity provider
//!
//! An infrastructure-as-code provider for the configuration API of a Pexip
//! Infinity management node. The host engine starts the provider binary as
//! a subprocess, reads the handshake line from stdout and then drives it
//! over gRPC.
//!
//! # Overview
//!
//! - [`infinity`]: typed client for `/api/admin/configuration/v1/`, with an
//!   HTTPS transport and an in-memory mock
//! - [`resources`]: one adapter per `pexip_infinity_*` resource type
//! - [`data_sources`] and [`actions`]: read-only and one-shot types
//! - [`provider`]: [`InfinityProvider`], which dispatches host calls to the
//!   adapters
//! - [`plan`], [`schema`] and [`validation`]: schema-driven planning and
//!   attribute checks
//! - [`server`]: the gRPC service and [`serve`]
//!
//! # Running
//!
//! ```no_run
//! use pexip_infinity_provider::{init_logging, serve, InfinityProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_logging();
//!     serve(InfinityProvider::new()).await
//! }
//! ```
//!
//! # Handshake Protocol
//!
//! Once the port is bound, [`serve`] prints one line to stdout:
//!
//! ```text
//! PEXIP_PROVIDER|1|127.0.0.1:50051
//! ```
//!
//! Format: `PEXIP_PROVIDER|<protocol_version>|<address>`. Logs go to
//! stderr so they never interleave with it.
//!
//! # Provider Protocol
//!
//! `proto/provider.proto` (`pexip.provider.v1.Provider`):
//!
//! - **GetMetadata** / **GetSchema**: type names and schemas
//! - **ValidateProviderConfig** / **Configure** / **Stop**
//! - **ValidateResourceConfig**, **UpgradeResourceState**, **Plan**
//! - **Create** / **Read** / **Update** / **Delete** / **ImportResourceState**
//! - **ValidateDataSourceConfig** / **ReadDataSource**
//! - **InvokeAction**: one-shot actions with progress events

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod actions;
pub mod config;
pub mod data_sources;
pub mod error;
pub mod infinity;
pub mod logging;
pub mod plan;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod server;
pub mod testing;
pub mod types;
pub mod validation;

#[allow(missing_docs)]
#[allow(clippy::all)]
pub mod generated;

pub use config::ProviderConfig;
pub use error::ProviderError;
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use provider::InfinityProvider;
pub use schema::ProviderSchema;
pub use server::{serve, serve_with_options, ProviderService, ServeOptions};
pub use types::{
    AttributeChange, ImportedResource, PlanResult, ProgressEvent, ProviderMetadata,
    ServerCapabilities, HANDSHAKE_PREFIX, PROTOCOL_VERSION,
};
pub use validation::{is_valid, validate, validate_result};

pub use async_trait::async_trait;
