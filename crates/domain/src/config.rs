//! Configuration structures
//!
//! Configuration is constructed once at process start (see the infra config
//! loader) and passed explicitly into the components that need it. Nothing
//! reads the environment ambiently after startup.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default API minor version sent on invoice reads and updates.
pub const DEFAULT_MINOR_VERSION: u32 = 75;

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub oauth: OAuthSettings,
    pub platform: PlatformConfig,
    pub server: ServerConfig,
}

/// Delegated-authorization settings for the accounting platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthSettings {
    /// OAuth client ID issued by the platform's developer portal
    pub client_id: String,

    /// OAuth client secret (confidential client)
    pub client_secret: String,

    /// Redirect URI registered for the authorization-code flow
    pub redirect_uri: String,

    /// Authorization endpoint (browser redirect target)
    pub auth_url: String,

    /// Token endpoint for code exchange and refresh
    pub token_url: String,

    /// OAuth scopes requested during authorization
    pub scopes: Vec<String>,

    /// Seed refresh token used to synthesize a credential on cold start,
    /// before any `/connect` has been completed
    pub seed_refresh_token: Option<String>,

    /// Path of the persisted credential record
    pub token_store_path: PathBuf,
}

/// Accounting platform endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Base URL of the accounting API (sandbox or production)
    pub api_base: String,

    /// Company (realm) identifier all resource paths are scoped to
    pub realm_id: String,

    /// API minor version appended to read and update calls
    pub minor_version: u32,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "0.0.0.0:5000"
    pub bind_addr: String,
}
