//! Delegated-access credential
//!
//! A single record of {access token, refresh token, expiry, token kind},
//! persisted as one JSON object and mutated in place whenever refreshed.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Persisted OAuth credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,

    /// Absolute expiry as unix seconds. Zero means "never valid", which is
    /// the cold-start state that forces a refresh before first use.
    pub expires_at: i64,

    pub token_type: String,
}

impl Credential {
    /// Synthesize a cold-start credential from a configured seed refresh
    /// token. The empty access token and zero expiry guarantee the first
    /// session triggers a refresh exchange.
    pub fn from_seed(refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: String::new(),
            refresh_token: refresh_token.into(),
            expires_at: 0,
            token_type: "bearer".to_string(),
        }
    }

    /// Whether the locally-known expiry has passed.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now().timestamp()
    }
}

/// Token response from the authorization server (RFC 6749 token endpoint).
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl From<TokenResponse> for Credential {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at: Utc::now().timestamp() + response.expires_in,
            token_type: response.token_type,
        }
    }
}
