//! OAuth 2.0 client for the accounting platform's authorization server
//!
//! Implements the two grants this service needs: the one-time
//! authorization-code exchange behind `/connect`, and the refresh-token
//! exchange the session provider performs when the stored credential has
//! expired. Neither is retried; a rejected exchange propagates as an
//! authentication error.

use invoicepatch_domain::{InvoicePatchError, OAuthSettings, Result};
use reqwest::Method;
use tracing::{debug, info};

use super::credential::{Credential, TokenResponse};
use crate::http::HttpClient;

/// OAuth 2.0 client (authorization-code grant, confidential client).
#[derive(Debug, Clone)]
pub struct OAuthClient {
    settings: OAuthSettings,
    http: HttpClient,
}

impl OAuthClient {
    pub fn new(settings: OAuthSettings) -> Result<Self> {
        Ok(Self { settings, http: HttpClient::new()? })
    }

    /// Build the browser authorization URL for the delegated-authorization
    /// flow. `state` must be validated when the redirect comes back.
    pub fn authorization_url(&self, state: &str) -> String {
        let params = [
            ("response_type", "code"),
            ("client_id", self.settings.client_id.as_str()),
            ("redirect_uri", self.settings.redirect_uri.as_str()),
            ("scope", &self.settings.scopes.join(" ")),
            ("state", state),
        ];

        let query = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.settings.auth_url, query)
    }

    /// Exchange an authorization code for a credential.
    pub async fn exchange_code(&self, code: &str) -> Result<Credential> {
        debug!("exchanging authorization code for tokens");
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.settings.redirect_uri.as_str()),
        ])
        .await
    }

    /// Exchange a refresh token for a fresh credential.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Credential> {
        debug!("refreshing access token");
        let credential = self
            .token_request(&[("grant_type", "refresh_token"), ("refresh_token", refresh_token)])
            .await?;
        info!("access token refreshed");
        Ok(credential)
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<Credential> {
        let builder = self
            .http
            .request(Method::POST, &self.settings.token_url)
            .basic_auth(&self.settings.client_id, Some(&self.settings.client_secret))
            .header("Accept", "application/json")
            .form(form);

        let response = self.http.send(builder).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InvoicePatchError::Auth(format!(
                "token exchange rejected (HTTP {}): {body}",
                status.as_u16()
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|err| InvoicePatchError::Auth(format!("malformed token response: {err}")))?;

        Ok(token_response.into())
    }
}
