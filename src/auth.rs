//! # Authentication
//!
//! The two ways of obtaining a bearer token from the orchestrator:
//! legacy username/password against the account endpoint, and the OAuth
//! client-credentials grant against the identity server.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::{server_message, ClientError, ClientResult};
use crate::odata::{LEGACY_AUTH_PATH, OAUTH_TOKEN_PATH};

/// Credentials for one of the two authentication modes
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Username/password against `api/Account/Authenticate`
    Legacy {
        tenancy_name: String,
        username: String,
        password: String,
    },
    /// Client-credentials grant against `identity_/connect/token`
    OAuth {
        client_id: String,
        client_secret: String,
        scope: String,
    },
}

impl Credentials {
    pub fn legacy(
        tenancy_name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::Legacy {
            tenancy_name: tenancy_name.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn oauth(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self::OAuth {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope: scope.into(),
        }
    }

    pub fn mode(&self) -> AuthMode {
        match self {
            Credentials::Legacy { .. } => AuthMode::Legacy,
            Credentials::OAuth { .. } => AuthMode::OAuth,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Legacy {
                tenancy_name,
                username,
                ..
            } => f
                .debug_struct("Legacy")
                .field("tenancy_name", tenancy_name)
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Credentials::OAuth {
                client_id, scope, ..
            } => f
                .debug_struct("OAuth")
                .field("client_id", client_id)
                .field("client_secret", &"<redacted>")
                .field("scope", scope)
                .finish(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Legacy,
    OAuth,
}

impl std::fmt::Display for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthMode::Legacy => write!(f, "legacy"),
            AuthMode::OAuth => write!(f, "oauth"),
        }
    }
}

/// Bearer token of an authenticated session
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// `Authorization` header value
    pub(crate) fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LegacyAuthRequest<'a> {
    tenancy_name: &'a str,
    username_or_email_address: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LegacyAuthResponse {
    result: Option<String>,
}

#[derive(Deserialize)]
struct OAuthTokenResponse {
    access_token: Option<String>,
}

/// Exchange credentials for a bearer token
///
/// Both modes treat anything but `200 OK` as [`ClientError::AuthError`].
pub(crate) async fn request_token(
    http: &Client,
    base_url: &str,
    credentials: &Credentials,
) -> ClientResult<BearerToken> {
    let mode = credentials.mode();
    let request = match credentials {
        Credentials::Legacy {
            tenancy_name,
            username,
            password,
        } => http
            .post(format!("{base_url}/{LEGACY_AUTH_PATH}"))
            .json(&LegacyAuthRequest {
                tenancy_name,
                username_or_email_address: username,
                password,
            }),
        Credentials::OAuth {
            client_id,
            client_secret,
            scope,
        } => http
            .post(format!("{base_url}/{OAUTH_TOKEN_PATH}"))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.as_str()),
                ("scope", scope.as_str()),
            ]),
    };

    debug!(mode = %mode, "Requesting orchestrator token");
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if status != StatusCode::OK {
        let message = server_message(status, &body);
        error!(mode = %mode, status = %status, error = %message, "Authentication failed");
        return Err(ClientError::auth_error(status.as_u16(), message));
    }

    let token = match mode {
        AuthMode::Legacy => serde_json::from_str::<LegacyAuthResponse>(&body)?
            .result
            .ok_or_else(|| ClientError::invalid_response("result", "no token in response"))?,
        AuthMode::OAuth => serde_json::from_str::<OAuthTokenResponse>(&body)?
            .access_token
            .ok_or_else(|| ClientError::invalid_response("access_token", "no token in response"))?,
    };

    info!(mode = %mode, "Authenticated with orchestrator");
    Ok(BearerToken::new(token))
}
