//! Session provider
//!
//! Produces bearer-authorized API sessions. The expiry check happens at
//! session-creation time only: if the stored credential has passed its local
//! expiry, exactly one refresh exchange is performed and the refreshed
//! credential is persisted through the store before the session is handed to
//! the caller. There is no background refresh loop.

use std::sync::Arc;

use invoicepatch_domain::Result;
use reqwest::{Method, RequestBuilder, Response};
use tracing::debug;

use super::credential::Credential;
use super::oauth::OAuthClient;
use super::store::CredentialStore;
use crate::http::HttpClient;

/// Hands out authorized sessions, refreshing the credential on demand.
pub struct SessionProvider {
    store: Arc<dyn CredentialStore>,
    oauth: OAuthClient,
    http: HttpClient,
}

impl SessionProvider {
    pub fn new(store: Arc<dyn CredentialStore>, oauth: OAuthClient) -> Result<Self> {
        Ok(Self { store, oauth, http: HttpClient::new()? })
    }

    /// Return a session whose requests carry a valid bearer token.
    ///
    /// A refresh failure (revoked or invalid refresh token) propagates as an
    /// authentication error; nothing is retried.
    pub async fn authorized_client(&self) -> Result<ApiSession> {
        let mut credential = self.store.load().await?;

        if credential.is_expired() {
            debug!("stored credential expired, performing refresh exchange");
            credential = self.oauth.refresh(&credential.refresh_token).await?;
            // Persisted before any API call is issued with the new token.
            self.store.save(&credential).await?;
        }

        Ok(ApiSession { http: self.http.clone(), access_token: credential.access_token })
    }

    /// Complete the delegated-authorization flow: exchange the authorization
    /// code and persist the resulting credential.
    pub async fn connect(&self, code: &str) -> Result<Credential> {
        let credential = self.oauth.exchange_code(code).await?;
        self.store.save(&credential).await?;
        Ok(credential)
    }

    /// Browser authorization URL for `/launch`.
    pub fn authorization_url(&self, state: &str) -> String {
        self.oauth.authorization_url(state)
    }
}

/// An HTTP session that attaches the current bearer token to every request.
#[derive(Debug, Clone)]
pub struct ApiSession {
    http: HttpClient,
    access_token: String,
}

impl ApiSession {
    /// Create a request builder with the bearer token attached.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.http.request(method, url).bearer_auth(&self.access_token)
    }

    /// Execute a request built by [`ApiSession::request`].
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        self.http.send(builder).await
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use invoicepatch_domain::{InvoicePatchError, OAuthSettings};
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::auth::store::MemoryCredentialStore;

    fn provider(token_url: String, store: Arc<MemoryCredentialStore>) -> SessionProvider {
        let settings = OAuthSettings {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            redirect_uri: "http://localhost:5000/connect".to_string(),
            auth_url: "https://appcenter.example.com/connect/oauth2".to_string(),
            token_url,
            scopes: vec!["com.example.accounting".to_string()],
            seed_refresh_token: None,
            token_store_path: PathBuf::from("unused.json"),
        };

        SessionProvider::new(store, OAuthClient::new(settings).unwrap()).unwrap()
    }

    fn token_response(access: &str, refresh: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": access,
            "refresh_token": refresh,
            "token_type": "bearer",
            "expires_in": 3600
        }))
    }

    #[tokio::test]
    async fn expired_credential_triggers_exactly_one_refresh() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tokens/bearer"))
            .and(body_string_contains("grant_type=refresh_token"))
            .respond_with(token_response("fresh-at", "fresh-rt"))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryCredentialStore::new(Some("seed-rt".to_string())));
        let provider = provider(format!("{}/tokens/bearer", server.uri()), store.clone());

        let _session = provider.authorized_client().await.unwrap();

        // Refreshed credential was persisted before the session was returned.
        let stored = store.stored().await.expect("credential persisted");
        assert_eq!(stored.access_token, "fresh-at");
        assert_eq!(stored.refresh_token, "fresh-rt");
    }

    #[tokio::test]
    async fn valid_credential_skips_refresh() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tokens/bearer"))
            .respond_with(token_response("unused", "unused"))
            .expect(0)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryCredentialStore::new(None));
        store
            .save(&Credential {
                access_token: "still-good".to_string(),
                refresh_token: "rt".to_string(),
                expires_at: chrono::Utc::now().timestamp() + 3600,
                token_type: "bearer".to_string(),
            })
            .await
            .unwrap();

        let provider = provider(format!("{}/tokens/bearer", server.uri()), store);
        let session = provider.authorized_client().await.unwrap();

        // Session carries the stored token.
        let request = session
            .request(Method::GET, "http://example.invalid/resource")
            .build()
            .unwrap();
        let auth_header = request.headers().get("authorization").unwrap().to_str().unwrap();
        assert_eq!(auth_header, "Bearer still-good");
    }

    #[tokio::test]
    async fn refresh_failure_propagates_as_auth_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tokens/bearer"))
            .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"error":"invalid_grant"}"#))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryCredentialStore::new(Some("revoked".to_string())));
        let provider = provider(format!("{}/tokens/bearer", server.uri()), store.clone());

        let result = provider.authorized_client().await;
        assert!(matches!(result, Err(InvoicePatchError::Auth(_))));

        // Failed refresh persists nothing.
        assert!(store.stored().await.is_none());
    }

    #[tokio::test]
    async fn session_attaches_bearer_token_to_requests() {
        let token_server = MockServer::start().await;
        let api_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tokens/bearer"))
            .respond_with(token_response("bearer-at", "rt"))
            .mount(&token_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/resource"))
            .and(header("authorization", "Bearer bearer-at"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&api_server)
            .await;

        let store = Arc::new(MemoryCredentialStore::new(Some("seed".to_string())));
        let provider = provider(format!("{}/tokens/bearer", token_server.uri()), store);

        let session = provider.authorized_client().await.unwrap();
        let response = session
            .send(session.request(Method::GET, format!("{}/resource", api_server.uri())))
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 200);
    }

    #[tokio::test]
    async fn connect_persists_exchanged_credential() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tokens/bearer"))
            .and(body_string_contains("grant_type=authorization_code"))
            .respond_with(token_response("connected-at", "connected-rt"))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryCredentialStore::new(None));
        let provider = provider(format!("{}/tokens/bearer", server.uri()), store.clone());

        provider.connect("the-code").await.unwrap();

        let stored = store.stored().await.expect("credential persisted on connect");
        assert_eq!(stored.access_token, "connected-at");
    }
}
