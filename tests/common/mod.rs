#![allow(dead_code)]

pub mod strategies;

use mockito::{Matcher, Mock, ServerGuard};
use orchestrator_client::{ClientConfig, Credentials, Folder, OrchestratorClient};
use serde_json::json;

pub const ORG: &str = "acme";
pub const TENANT: &str = "DefaultTenant";
pub const TOKEN: &str = "test-token";

/// Path of an OData resource on the mock server
pub fn odata_path(resource: &str) -> String {
    format!("/{ORG}/{TENANT}/orchestrator_/odata/{resource}")
}

/// Matcher for an OData collection path that may carry a query string
pub fn odata_collection(resource: &str) -> Matcher {
    Matcher::Regex(format!(r"^{}($|\?)", odata_path(resource)))
}

pub fn config_for(server: &ServerGuard) -> ClientConfig {
    ClientConfig::new(server.url(), ORG, TENANT).with_timeout_ms(5000)
}

pub fn shared_folder() -> Folder {
    Folder::new(1493557, "Shared")
}

pub fn legacy_credentials() -> Credentials {
    Credentials::legacy(ORG, "admin", "password")
}

/// Register a successful legacy authentication returning [`TOKEN`]
pub async fn mock_legacy_auth(server: &mut ServerGuard) -> Mock {
    server
        .mock("POST", "/api/Account/Authenticate")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"result": TOKEN, "success": true}).to_string())
        .create_async()
        .await
}

/// Client authenticated against the mock server with [`TOKEN`]
pub async fn authenticated_client(server: &mut ServerGuard) -> OrchestratorClient {
    mock_legacy_auth(server).await;
    OrchestratorClient::connect(config_for(server), legacy_credentials())
        .await
        .expect("legacy authentication against mock server")
}
