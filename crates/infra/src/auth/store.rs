//! Credential persistence
//!
//! An injectable storage capability so the session provider never touches the
//! filesystem directly. The file-backed implementation writes through a
//! temporary file so a concurrent load cannot observe a half-written record.

use std::path::PathBuf;

use async_trait::async_trait;
use invoicepatch_domain::{InvoicePatchError, Result};
use tokio::sync::Mutex;
use tracing::debug;

use super::credential::Credential;

/// Storage backend for the delegated-access credential.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Return the persisted credential, or the cold-start seed credential if
    /// nothing has been persisted yet. Absence of a store is a normal state,
    /// not an error.
    async fn load(&self) -> Result<Credential>;

    /// Overwrite the store with the given credential.
    async fn save(&self, credential: &Credential) -> Result<()>;
}

/// Credential store backed by a single JSON file.
pub struct FileCredentialStore {
    path: PathBuf,
    seed_refresh_token: Option<String>,
}

impl FileCredentialStore {
    pub fn new(path: PathBuf, seed_refresh_token: Option<String>) -> Self {
        Self { path, seed_refresh_token }
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<Credential> {
        if !self.path.is_file() {
            debug!(path = %self.path.display(), "no credential store file, using seed credential");
            return Ok(Credential::from_seed(self.seed_refresh_token.clone().unwrap_or_default()));
        }

        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|err| {
            InvoicePatchError::Io(format!(
                "failed to read credential store {}: {err}",
                self.path.display()
            ))
        })?;

        serde_json::from_str(&contents).map_err(|err| {
            InvoicePatchError::Io(format!(
                "credential store {} is not a valid credential record: {err}",
                self.path.display()
            ))
        })
    }

    async fn save(&self, credential: &Credential) -> Result<()> {
        let serialized = serde_json::to_vec_pretty(credential)
            .map_err(|err| InvoicePatchError::Internal(format!("failed to serialize credential: {err}")))?;

        let path = self.path.clone();
        // Write to a sibling temp file, then rename into place.
        tokio::task::spawn_blocking(move || -> Result<()> {
            let dir = path.parent().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
            let mut tmp = tempfile::NamedTempFile::new_in(&dir)
                .map_err(|err| InvoicePatchError::Io(format!("failed to create temp file: {err}")))?;

            std::io::Write::write_all(&mut tmp, &serialized)
                .map_err(|err| InvoicePatchError::Io(format!("failed to write credential: {err}")))?;

            tmp.persist(&path).map_err(|err| {
                InvoicePatchError::Io(format!(
                    "failed to persist credential store {}: {err}",
                    path.display()
                ))
            })?;

            Ok(())
        })
        .await
        .map_err(|err| InvoicePatchError::Internal(format!("credential save task failed: {err}")))??;

        debug!(path = %self.path.display(), "credential persisted");
        Ok(())
    }
}

/// In-memory credential store for tests and embedded use.
pub struct MemoryCredentialStore {
    seed_refresh_token: Option<String>,
    credential: Mutex<Option<Credential>>,
}

impl MemoryCredentialStore {
    pub fn new(seed_refresh_token: Option<String>) -> Self {
        Self { seed_refresh_token, credential: Mutex::new(None) }
    }

    /// The currently stored credential, if any save has happened.
    pub async fn stored(&self) -> Option<Credential> {
        self.credential.lock().await.clone()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<Credential> {
        match self.credential.lock().await.clone() {
            Some(credential) => Ok(credential),
            None => Ok(Credential::from_seed(self.seed_refresh_token.clone().unwrap_or_default())),
        }
    }

    async fn save(&self, credential: &Credential) -> Result<()> {
        *self.credential.lock().await = Some(credential.clone());
        Ok(())
    }
}
