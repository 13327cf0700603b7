use std::sync::Arc;

use invoicepatch_api::{router, AppState};
use invoicepatch_domain::Result;
use invoicepatch_infra::auth::{FileCredentialStore, OAuthClient};
use invoicepatch_infra::books::BooksClient;
use invoicepatch_infra::{InvoiceUpdater, SessionProvider};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; a missing file is not an error.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = invoicepatch_infra::config::load()?;

    let store = Arc::new(FileCredentialStore::new(
        config.oauth.token_store_path.clone(),
        config.oauth.seed_refresh_token.clone(),
    ));
    let oauth = OAuthClient::new(config.oauth.clone())?;
    let sessions = Arc::new(SessionProvider::new(store, oauth)?);

    let client = BooksClient::new(&config.platform);
    let updater = Arc::new(InvoiceUpdater::new(sessions.clone(), client));

    let state = AppState::new(sessions, updater);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .map_err(|err| {
            invoicepatch_domain::InvoicePatchError::Config(format!(
                "failed to bind {}: {err}",
                config.server.bind_addr
            ))
        })?;

    tracing::info!(addr = %config.server.bind_addr, "listening");
    axum::serve(listener, app).await.map_err(|err| {
        invoicepatch_domain::InvoicePatchError::Internal(format!("server error: {err}"))
    })
}
