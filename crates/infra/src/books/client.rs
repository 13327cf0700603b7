//! Invoice REST client
//!
//! The handful of calls the orchestrator needs: lookup by document number,
//! full read, PDF fetch, custom-field definitions, and the sparse update
//! itself. Every call runs over an [`ApiSession`] obtained from the session
//! provider; non-success responses are surfaced verbatim and never retried.

use std::collections::BTreeMap;

use invoicepatch_domain::{InvoicePatchError, PlatformConfig, Result};
use reqwest::{Method, Response};
use serde_json::Value;
use tracing::debug;

use super::types::{
    extract_definitions, CustomFieldDefinition, InvoiceEnvelope, InvoiceRef, PreferencesEnvelope,
    QueryEnvelope,
};
use crate::auth::session::ApiSession;

/// REST client scoped to one company (realm).
#[derive(Debug, Clone)]
pub struct BooksClient {
    api_base: String,
    realm_id: String,
    minor_version: u32,
}

impl BooksClient {
    pub fn new(platform: &PlatformConfig) -> Self {
        Self {
            api_base: platform.api_base.trim_end_matches('/').to_string(),
            realm_id: platform.realm_id.clone(),
            minor_version: platform.minor_version,
        }
    }

    fn company_url(&self, resource: &str) -> String {
        format!("{}/v3/company/{}/{resource}", self.api_base, self.realm_id)
    }

    /// Resolve an invoice's internal id and concurrency token by document
    /// number.
    ///
    /// Zero matches is `NotFound`. More than one match is an error rather
    /// than a silent first-row pick: the platform is expected to keep
    /// document numbers unique, so duplicates mean something is wrong.
    pub async fn find_invoice(&self, session: &ApiSession, doc_number: &str) -> Result<InvoiceRef> {
        let query = format!(
            "select Id,SyncToken from Invoice where DocNumber = '{}'",
            doc_number.replace('\'', "\\'")
        );

        let builder = session
            .request(Method::GET, self.company_url("query"))
            .query(&[("query", query.as_str())])
            .header("Accept", "application/json");

        let response = session.send(builder).await?;
        let envelope: QueryEnvelope = Self::parse_json(response).await?;
        let mut rows = envelope.query_response.invoices;

        debug!(doc_number, matches = rows.len(), "invoice lookup completed");

        match rows.len() {
            0 => Err(InvoicePatchError::NotFound(format!(
                "no invoice with DocNumber '{doc_number}' found"
            ))),
            1 => {
                let row = rows.remove(0);
                Ok(InvoiceRef { id: row.id, sync_token: row.sync_token })
            }
            n => Err(InvoicePatchError::Internal(format!(
                "lookup for DocNumber '{doc_number}' returned {n} invoices; refusing to pick one"
            ))),
        }
    }

    /// Fetch the full invoice representation by internal id.
    pub async fn get_invoice(&self, session: &ApiSession, invoice_id: &str) -> Result<Value> {
        let builder = session
            .request(Method::GET, self.company_url(&format!("invoice/{invoice_id}")))
            .query(&[("minorversion", self.minor_version)])
            .header("Accept", "application/json");

        let response = session.send(builder).await?;
        let envelope: InvoiceEnvelope = Self::parse_json(response).await?;
        Ok(envelope.invoice)
    }

    /// Fetch the invoice's current PDF rendering.
    pub async fn fetch_pdf(&self, session: &ApiSession, invoice_id: &str) -> Result<Vec<u8>> {
        let builder = session
            .request(Method::GET, self.company_url(&format!("invoice/{invoice_id}/pdf")))
            .header("Accept", "application/pdf");

        let response = session.send(builder).await?;
        let response = Self::ensure_success(response).await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|err| InvoicePatchError::Network(format!("failed to read PDF body: {err}")))?;

        Ok(bytes.to_vec())
    }

    /// Read the live display-name → definition mapping from the platform's
    /// sales-form preferences. Read fresh on every update; display names are
    /// not stable identifiers, so nothing is cached.
    pub async fn custom_field_definitions(
        &self,
        session: &ApiSession,
    ) -> Result<BTreeMap<String, CustomFieldDefinition>> {
        let builder = session
            .request(Method::GET, self.company_url("preferences"))
            .header("Accept", "application/json");

        let response = session.send(builder).await?;
        let envelope: PreferencesEnvelope = Self::parse_json(response).await?;
        Ok(extract_definitions(&envelope))
    }

    /// Submit a sparse-update body built by the orchestrator.
    pub async fn sparse_update(&self, session: &ApiSession, body: &Value) -> Result<()> {
        let url = self.company_url("invoice");
        let builder = session
            .request(Method::POST, url)
            .query(&[
                ("operation", "update".to_string()),
                ("minorversion", self.minor_version.to_string()),
            ])
            .header("Accept", "application/json")
            .json(body);

        let response = session.send(builder).await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(InvoicePatchError::RemoteRejected { status: status.as_u16(), body })
    }

    async fn parse_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::ensure_success(response).await?;
        response
            .json()
            .await
            .map_err(|err| InvoicePatchError::Internal(format!("malformed API response: {err}")))
    }
}
