//! Configuration loader
//!
//! Builds the explicit [`Config`] value object once at process start. Loads
//! from environment variables first, falling back to a JSON config file.
//!
//! ## Environment Variables
//! - `INVOICEPATCH_CLIENT_ID`: OAuth client ID (required)
//! - `INVOICEPATCH_CLIENT_SECRET`: OAuth client secret (required)
//! - `INVOICEPATCH_REALM_ID`: company (realm) identifier (required)
//! - `INVOICEPATCH_REDIRECT_URI`: OAuth redirect URI (required)
//! - `INVOICEPATCH_REFRESH_TOKEN`: seed refresh token for cold start
//! - `INVOICEPATCH_TOKEN_STORE`: credential store path (default `qbo_token.json`)
//! - `INVOICEPATCH_API_BASE`: accounting API base URL (default sandbox)
//! - `INVOICEPATCH_MINOR_VERSION`: API minor version (default 75)
//! - `INVOICEPATCH_AUTH_URL`: authorization endpoint (default Intuit app center)
//! - `INVOICEPATCH_TOKEN_URL`: token endpoint (default Intuit OAuth)
//! - `INVOICEPATCH_SCOPES`: space-separated OAuth scopes (default accounting)
//! - `INVOICEPATCH_BIND_ADDR`: HTTP bind address (default `0.0.0.0:5000`)

use std::path::PathBuf;

use invoicepatch_domain::{
    Config, InvoicePatchError, OAuthSettings, PlatformConfig, Result, ServerConfig,
    DEFAULT_MINOR_VERSION,
};

const DEFAULT_API_BASE: &str = "https://sandbox-quickbooks.api.intuit.com";
const DEFAULT_AUTH_URL: &str = "https://appcenter.intuit.com/connect/oauth2";
const DEFAULT_TOKEN_URL: &str = "https://oauth.platform.intuit.com/oauth2/v1/tokens/bearer";
const DEFAULT_SCOPE: &str = "com.intuit.quickbooks.accounting";
const DEFAULT_TOKEN_STORE: &str = "qbo_token.json";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(PathBuf::from("config.json"))
        }
    }
}

/// Load configuration from environment variables.
///
/// # Errors
/// Returns `InvoicePatchError::Config` if required variables are missing or
/// have invalid values.
pub fn load_from_env() -> Result<Config> {
    let client_id = env_var("INVOICEPATCH_CLIENT_ID")?;
    let client_secret = env_var("INVOICEPATCH_CLIENT_SECRET")?;
    let realm_id = env_var("INVOICEPATCH_REALM_ID")?;
    let redirect_uri = env_var("INVOICEPATCH_REDIRECT_URI")?;

    let minor_version = match std::env::var("INVOICEPATCH_MINOR_VERSION") {
        Ok(raw) => raw.parse::<u32>().map_err(|e| {
            InvoicePatchError::Config(format!("Invalid INVOICEPATCH_MINOR_VERSION: {e}"))
        })?,
        Err(_) => DEFAULT_MINOR_VERSION,
    };

    let scopes = std::env::var("INVOICEPATCH_SCOPES")
        .unwrap_or_else(|_| DEFAULT_SCOPE.to_string())
        .split_whitespace()
        .map(str::to_string)
        .collect();

    Ok(Config {
        oauth: OAuthSettings {
            client_id,
            client_secret,
            redirect_uri,
            auth_url: env_or("INVOICEPATCH_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: env_or("INVOICEPATCH_TOKEN_URL", DEFAULT_TOKEN_URL),
            scopes,
            seed_refresh_token: std::env::var("INVOICEPATCH_REFRESH_TOKEN").ok(),
            token_store_path: PathBuf::from(env_or(
                "INVOICEPATCH_TOKEN_STORE",
                DEFAULT_TOKEN_STORE,
            )),
        },
        platform: PlatformConfig {
            api_base: env_or("INVOICEPATCH_API_BASE", DEFAULT_API_BASE),
            realm_id,
            minor_version,
        },
        server: ServerConfig { bind_addr: env_or("INVOICEPATCH_BIND_ADDR", DEFAULT_BIND_ADDR) },
    })
}

/// Load configuration from a JSON file.
pub fn load_from_file(path: PathBuf) -> Result<Config> {
    if !path.exists() {
        return Err(InvoicePatchError::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    tracing::info!(path = %path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&path)
        .map_err(|e| InvoicePatchError::Config(format!("Failed to read config file: {e}")))?;

    serde_json::from_str(&contents)
        .map_err(|e| InvoicePatchError::Config(format!("Invalid config file: {e}")))
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| InvoicePatchError::Config(format!("Missing environment variable: {name}")))
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &tempfile::TempDir, body: &serde_json::Value) -> PathBuf {
        let path = dir.path().join("config.json");
        std::fs::write(&path, serde_json::to_string_pretty(body).unwrap()).unwrap();
        path
    }

    #[test]
    fn loads_full_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            &serde_json::json!({
                "oauth": {
                    "client_id": "cid",
                    "client_secret": "secret",
                    "redirect_uri": "http://localhost:5000/connect",
                    "auth_url": DEFAULT_AUTH_URL,
                    "token_url": DEFAULT_TOKEN_URL,
                    "scopes": [DEFAULT_SCOPE],
                    "seed_refresh_token": "seed",
                    "token_store_path": "qbo_token.json"
                },
                "platform": {
                    "api_base": DEFAULT_API_BASE,
                    "realm_id": "9130350",
                    "minor_version": 75
                },
                "server": { "bind_addr": "0.0.0.0:5000" }
            }),
        );

        let config = load_from_file(path).unwrap();

        assert_eq!(config.oauth.client_id, "cid");
        assert_eq!(config.platform.realm_id, "9130350");
        assert_eq!(config.platform.minor_version, 75);
        assert_eq!(config.server.bind_addr, "0.0.0.0:5000");
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_from_file(dir.path().join("nope.json"));
        assert!(matches!(result, Err(InvoicePatchError::Config(_))));
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{").unwrap();

        let result = load_from_file(path);
        assert!(matches!(result, Err(InvoicePatchError::Config(_))));
    }
}
