//! Shared application state and the ports the handlers call through.
//!
//! Handlers depend on narrow traits instead of the concrete orchestrator so
//! tests can stand up the router against stubs.

use std::sync::Arc;

use async_trait::async_trait;
use invoicepatch_domain::{Result, UpdateOutcome, UpdateRequest};
use invoicepatch_infra::{InvoiceUpdater, SessionProvider};
use tokio::sync::Mutex;

/// Invoice operations exposed over HTTP.
#[async_trait]
pub trait UpdatePort: Send + Sync {
    async fn update(&self, request: &UpdateRequest) -> Result<UpdateOutcome>;
    async fn download_pdf(&self, doc_number: &str) -> Result<Vec<u8>>;
}

#[async_trait]
impl UpdatePort for InvoiceUpdater {
    async fn update(&self, request: &UpdateRequest) -> Result<UpdateOutcome> {
        InvoiceUpdater::update(self, request).await
    }

    async fn download_pdf(&self, doc_number: &str) -> Result<Vec<u8>> {
        InvoiceUpdater::download_pdf(self, doc_number).await
    }
}

/// Delegated-authorization operations exposed over HTTP.
#[async_trait]
pub trait AuthPort: Send + Sync {
    fn authorization_url(&self, state: &str) -> String;
    async fn connect(&self, code: &str) -> Result<()>;
}

#[async_trait]
impl AuthPort for SessionProvider {
    fn authorization_url(&self, state: &str) -> String {
        SessionProvider::authorization_url(self, state)
    }

    async fn connect(&self, code: &str) -> Result<()> {
        SessionProvider::connect(self, code).await.map(|_| ())
    }
}

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthPort>,
    pub updater: Arc<dyn UpdatePort>,

    /// State token issued by the most recent `/launch`, consumed by
    /// `/connect`. One pending authorization at a time.
    pub pending_state: Arc<Mutex<Option<String>>>,
}

impl AppState {
    pub fn new(auth: Arc<dyn AuthPort>, updater: Arc<dyn UpdatePort>) -> Self {
        Self { auth, updater, pending_state: Arc::new(Mutex::new(None)) }
    }
}
