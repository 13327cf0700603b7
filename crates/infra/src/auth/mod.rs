//! Credential lifecycle
//!
//! Loads a persisted delegated-access credential (or a seed value from
//! configuration), refreshes it on demand, persists any refreshed credential
//! back to storage, and produces bearer-authorized API sessions.

pub mod credential;
pub mod oauth;
pub mod session;
pub mod store;

pub use credential::{Credential, TokenResponse};
pub use oauth::OAuthClient;
pub use session::{ApiSession, SessionProvider};
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
