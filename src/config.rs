//! # Client Configuration
//!
//! Connection settings for the orchestrator client.
//! Supports a TOML config file and environment variable overrides.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Characters that would end or split a URL path segment
const PATH_RESERVED: [char; 4] = ['/', '?', '#', '%'];

/// Orchestrator connection settings
///
/// # Examples
///
/// ```rust
/// use orchestrator_client::config::ClientConfig;
///
/// let config = ClientConfig::default();
/// assert_eq!(config.base_url, "https://cloud.uipath.com");
/// assert_eq!(config.timeout_ms, 30000);
/// assert!(!config.accept_invalid_certs);
/// ```
///
/// ```rust
/// use orchestrator_client::config::ClientConfig;
///
/// let config = ClientConfig::new("https://orchestrator.example.com", "acme", "DefaultTenant")
///     .with_timeout_ms(10_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Orchestrator base URL (e.g., "<https://cloud.uipath.com>")
    pub base_url: String,
    /// Organization (account) logical name
    pub organization: String,
    /// Tenant logical name
    pub tenant: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Skip TLS certificate validation (self-signed on-premise installs)
    pub accept_invalid_certs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://cloud.uipath.com".to_string(),
            organization: String::new(),
            tenant: String::new(),
            timeout_ms: 30000,
            accept_invalid_certs: false,
        }
    }
}

impl ClientConfig {
    pub fn new(
        base_url: impl Into<String>,
        organization: impl Into<String>,
        tenant: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            organization: organization.into(),
            tenant: tenant.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    #[must_use]
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Load configuration from environment variables and config file
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file (first found, see [`ClientConfig::find_config_file`])
    /// 3. Default values
    pub fn load() -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(config_path) = Self::find_config_file() {
            debug!("Loading config from: {}", config_path.display());
            config = Self::load_from_file(&config_path)?;
        }

        config.apply_env_overrides()?;

        debug!(
            base_url = %config.base_url,
            organization = %config.organization,
            tenant = %config.tenant,
            timeout_ms = config.timeout_ms,
            "Loaded orchestrator client configuration"
        );
        Ok(config)
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClientError::config_error(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ClientError::config_error(format!("Failed to parse config file: {}", e)))
    }

    /// Save configuration to file, creating parent directories
    pub fn save_to_file(&self, path: &Path) -> ClientResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ClientError::config_error(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Default config file path in the user's home directory
    pub fn default_config_path() -> ClientResult<PathBuf> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| ClientError::config_error("Could not determine home directory"))?;

        Ok(home_dir.join(".uipath").join("orchestrator.toml"))
    }

    /// Find the config file in standard locations
    pub fn find_config_file() -> Option<PathBuf> {
        let mut candidates = vec![
            PathBuf::from("./uipath-orchestrator.toml"),
            PathBuf::from("./config/uipath-orchestrator.toml"),
        ];
        if let Ok(home_path) = Self::default_config_path() {
            candidates.push(home_path);
        }

        candidates.into_iter().find(|path| path.is_file())
    }

    fn apply_env_overrides(&mut self) -> ClientResult<()> {
        if let Ok(url) = std::env::var("UIPATH_ORCHESTRATOR_URL") {
            self.base_url = url;
        }
        if let Ok(organization) = std::env::var("UIPATH_ORGANIZATION") {
            self.organization = organization;
        }
        if let Ok(tenant) = std::env::var("UIPATH_TENANT") {
            self.tenant = tenant;
        }
        if let Ok(timeout) = std::env::var("UIPATH_TIMEOUT_MS") {
            self.timeout_ms = timeout.parse().map_err(|_| {
                ClientError::config_error(format!("UIPATH_TIMEOUT_MS is not a number: {timeout}"))
            })?;
        }
        if let Ok(accept) = std::env::var("UIPATH_ACCEPT_INVALID_CERTS") {
            self.accept_invalid_certs = match accept.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ClientError::config_error(format!(
                        "UIPATH_ACCEPT_INVALID_CERTS is not a boolean: {accept}"
                    )))
                }
            };
        }
        Ok(())
    }

    /// Check the settings before any client is built from them
    pub fn validate(&self) -> ClientResult<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::config_error(format!("Invalid base URL: {}", e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::config_error(format!(
                "Base URL must be http or https, got '{}'",
                url.scheme()
            )));
        }

        for (field, value) in [("organization", &self.organization), ("tenant", &self.tenant)] {
            if value.trim().is_empty() {
                return Err(ClientError::config_error(format!("{field} must not be empty")));
            }
            if let Some(bad) = value.chars().find(|c| PATH_RESERVED.contains(c)) {
                return Err(ClientError::config_error(format!(
                    "{field} must not contain '{bad}': {value}"
                )));
            }
        }

        if self.timeout_ms == 0 {
            return Err(ClientError::config_error("timeout_ms must be greater than zero"));
        }
        Ok(())
    }

    /// Base URL without trailing slashes, ready for path concatenation
    pub(crate) fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    const ENV_VARS: [&str; 5] = [
        "UIPATH_ORCHESTRATOR_URL",
        "UIPATH_ORGANIZATION",
        "UIPATH_TENANT",
        "UIPATH_TIMEOUT_MS",
        "UIPATH_ACCEPT_INVALID_CERTS",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://cloud.uipath.com");
        assert!(config.organization.is_empty());
        assert_eq!(config.timeout_ms, 30000);
        assert!(!config.accept_invalid_certs);
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let valid = ClientConfig::new("https://orchestrator.local", "acme", "Default");
        assert!(valid.validate().is_ok());

        let bad_url = ClientConfig::new("not a url", "acme", "Default");
        assert!(matches!(bad_url.validate(), Err(ClientError::ConfigError(_))));

        let ftp = ClientConfig::new("ftp://orchestrator.local", "acme", "Default");
        assert!(ftp.validate().is_err());

        let no_tenant = ClientConfig::new("https://orchestrator.local", "acme", " ");
        assert!(no_tenant.validate().is_err());

        let slashed = ClientConfig::new("https://orchestrator.local", "acme/x", "Default");
        assert!(slashed.validate().is_err());

        for tenant in ["Ten?ant", "Ten#ant", "Ten%2Fant"] {
            let reserved = ClientConfig::new("https://orchestrator.local", "acme", tenant);
            assert!(
                matches!(reserved.validate(), Err(ClientError::ConfigError(_))),
                "tenant {tenant} should be rejected"
            );
        }

        let zero_timeout = valid.clone().with_timeout_ms(0);
        assert!(zero_timeout.validate().is_err());
    }

    #[test]
    fn test_trimmed_base_url() {
        let config = ClientConfig::new("https://orchestrator.local//", "acme", "Default");
        assert_eq!(config.trimmed_base_url(), "https://orchestrator.local");
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("orchestrator.toml");

        let original = ClientConfig::new("https://orchestrator.local", "acme", "Default")
            .with_timeout_ms(5000)
            .with_accept_invalid_certs(true);
        original.save_to_file(&config_path).unwrap();

        let loaded = ClientConfig::load_from_file(&config_path).unwrap();
        assert_eq!(original, loaded);
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("orchestrator.toml");
        std::fs::write(&config_path, "organization = \"acme\"\ntenant = \"Default\"\n").unwrap();

        let loaded = ClientConfig::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.organization, "acme");
        assert_eq!(loaded.base_url, "https://cloud.uipath.com");
        assert_eq!(loaded.timeout_ms, 30000);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("orchestrator.toml");
        std::fs::write(&config_path, "timeout_ms = \"soon\"").unwrap();

        let result = ClientConfig::load_from_file(&config_path);
        assert!(matches!(result, Err(ClientError::ConfigError(_))));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        std::env::set_var("UIPATH_ORCHESTRATOR_URL", "https://onprem.local");
        std::env::set_var("UIPATH_ORGANIZATION", "acme");
        std::env::set_var("UIPATH_TENANT", "Finance");
        std::env::set_var("UIPATH_TIMEOUT_MS", "1500");
        std::env::set_var("UIPATH_ACCEPT_INVALID_CERTS", "true");

        let mut config = ClientConfig::default();
        config.apply_env_overrides().unwrap();
        clear_env();

        assert_eq!(config.base_url, "https://onprem.local");
        assert_eq!(config.organization, "acme");
        assert_eq!(config.tenant, "Finance");
        assert_eq!(config.timeout_ms, 1500);
        assert!(config.accept_invalid_certs);
    }

    #[test]
    #[serial]
    fn test_env_override_rejects_bad_timeout() {
        clear_env();
        std::env::set_var("UIPATH_TIMEOUT_MS", "fast");

        let mut config = ClientConfig::default();
        let result = config.apply_env_overrides();
        clear_env();

        assert!(matches!(result, Err(ClientError::ConfigError(_))));
    }

    #[test]
    #[serial]
    fn test_env_override_rejects_bad_boolean() {
        clear_env();
        std::env::set_var("UIPATH_ACCEPT_INVALID_CERTS", "maybe");

        let mut config = ClientConfig::default();
        let result = config.apply_env_overrides();
        clear_env();

        assert!(matches!(result, Err(ClientError::ConfigError(_))));

        std::env::set_var("UIPATH_ACCEPT_INVALID_CERTS", "FALSE");
        let mut config = ClientConfig::default().with_accept_invalid_certs(true);
        config.apply_env_overrides().unwrap();
        clear_env();
        assert!(!config.accept_invalid_certs);
    }

    #[test]
    #[serial]
    fn test_load_reads_local_file_then_env() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let previous_dir = std::env::current_dir().unwrap();
        std::fs::write(
            temp_dir.path().join("uipath-orchestrator.toml"),
            "base_url = \"https://file.local\"\norganization = \"acme\"\ntenant = \"FromFile\"\ntimeout_ms = 2000\n",
        )
        .unwrap();

        std::env::set_current_dir(temp_dir.path()).unwrap();
        std::env::set_var("UIPATH_TENANT", "FromEnv");
        let found = ClientConfig::find_config_file();
        let loaded = ClientConfig::load();
        std::env::set_current_dir(previous_dir).unwrap();
        clear_env();

        assert_eq!(
            found.as_deref(),
            Some(Path::new("./uipath-orchestrator.toml"))
        );
        let loaded = loaded.unwrap();
        assert_eq!(loaded.base_url, "https://file.local");
        assert_eq!(loaded.organization, "acme");
        assert_eq!(loaded.timeout_ms, 2000);
        assert_eq!(loaded.tenant, "FromEnv");
    }
}
