#![allow(clippy::missing_errors_doc)] // Every public operation returns ClientResult
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # UiPath Orchestrator Client
//!
//! Async client for the UiPath Orchestrator REST/OData API: authentication,
//! folders, releases and jobs, queues, machine and robot provisioning.
//!
//! ## Overview
//!
//! [`OrchestratorClient`] holds one authenticated session (base URL,
//! organization, tenant and bearer token) and exposes one method per remote
//! operation. Each method issues a single request, checks for the exact success
//! status the orchestrator documents for that operation and decodes the JSON
//! body into typed records. Failures surface as [`ClientError`] variants.
//!
//! ## Module Organization
//!
//! - [`client`] - The session-holding client and its operations
//! - [`auth`] - Legacy and OAuth client-credentials authentication
//! - [`models`] - Request bodies and response records
//! - [`odata`] - Endpoint paths, collection envelope, `$filter` building
//! - [`config`] - Connection settings from file and environment
//! - [`error`] - Error taxonomy
//! - [`logging`] - Default `tracing` subscriber
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use orchestrator_client::{ClientConfig, ContentMap, Credentials, Folder, OrchestratorClient};
//! use serde_json::json;
//!
//! # async fn example() -> orchestrator_client::ClientResult<()> {
//! orchestrator_client::logging::init_structured_logging();
//!
//! let config = ClientConfig::load()?;
//! let client = OrchestratorClient::connect(
//!     config,
//!     Credentials::legacy("Default", "admin", "password"),
//! )
//! .await?;
//!
//! let folder = Folder::new(1493557, "Shared");
//! let item = ContentMap::from([("postNum".to_string(), json!("1211360334160"))]);
//! let queued = client
//!     .add_queue_item("ToolCallingQ", &folder, "PostOffice", &item)
//!     .await?;
//! let status = client.get_queue_item_status(queued.id, &folder).await?;
//! println!("queue item {} is {:?}", status.id, status.status());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod odata;

pub use auth::{AuthMode, BearerToken, Credentials};
pub use client::{OrchestratorClient, Session};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use models::{
    ContentMap, Folder, HostingType, MachineType, NewRobot, QueueItem, RobotType, StopStrategy,
};
