//! Invoice update orchestrator
//!
//! Sequences one synchronous invocation: resolve the document's identity and
//! concurrency token, optionally archive its current PDF, resolve and coerce
//! custom-field changes, and submit the sparse update. No queuing, no
//! batching, no retries; every error aborts the invocation.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use invoicepatch_domain::{InvoicePatchError, Result, UpdateOutcome, UpdateRequest};
use serde_json::Value;
use tracing::{debug, info};

use super::archive::{archive_filename, write_archive};
use super::client::BooksClient;
use super::fields::{build_sparse_body, resolve_custom_fields};
use super::types::CustomFieldDefinition;
use crate::auth::session::SessionProvider;

/// Observability hook for troubleshooting update calls.
///
/// Replaces the unconditional debug snapshot files the service used to write:
/// implementations decide what to do with the resolved definitions and the
/// final payload.
pub trait UpdateRecorder: Send + Sync {
    fn definitions_resolved(&self, definitions: &BTreeMap<String, CustomFieldDefinition>);
    fn payload_built(&self, payload: &Value);
}

/// Default recorder: structured debug logs.
pub struct TracingRecorder;

impl UpdateRecorder for TracingRecorder {
    fn definitions_resolved(&self, definitions: &BTreeMap<String, CustomFieldDefinition>) {
        debug!(count = definitions.len(), ?definitions, "resolved custom-field definitions");
    }

    fn payload_built(&self, payload: &Value) {
        debug!(%payload, "built sparse-update payload");
    }
}

/// Orchestrates sparse invoice updates and PDF retrieval.
pub struct InvoiceUpdater {
    sessions: Arc<SessionProvider>,
    client: BooksClient,
    recorder: Arc<dyn UpdateRecorder>,
}

impl InvoiceUpdater {
    pub fn new(sessions: Arc<SessionProvider>, client: BooksClient) -> Self {
        Self::with_recorder(sessions, client, Arc::new(TracingRecorder))
    }

    pub fn with_recorder(
        sessions: Arc<SessionProvider>,
        client: BooksClient,
        recorder: Arc<dyn UpdateRecorder>,
    ) -> Self {
        Self { sessions, client, recorder }
    }

    /// Apply a sparse update to the invoice named by the request.
    ///
    /// The sync token submitted always comes from this invocation's own
    /// lookup; a failed submission is never reported as success, even when
    /// the archive step already ran.
    pub async fn update(&self, request: &UpdateRequest) -> Result<UpdateOutcome> {
        let session = self.sessions.authorized_client().await?;

        let invoice = self.client.find_invoice(&session, &request.doc_number).await?;

        if let Some(dir) = &request.archive_dir {
            let full_invoice = self.client.get_invoice(&session, &invoice.id).await?;
            let txn_date = pre_update_txn_date(&full_invoice)?;
            let pdf = self.client.fetch_pdf(&session, &invoice.id).await?;

            let filename =
                archive_filename(&request.doc_number, txn_date, Utc::now().date_naive());
            write_archive(dir, &filename, &pdf)?;
        }

        let definitions = self.client.custom_field_definitions(&session).await?;
        self.recorder.definitions_resolved(&definitions);

        let entries = resolve_custom_fields(&request.custom_fields, &definitions)?;
        let body = build_sparse_body(&invoice, &request.updates, &entries)?;
        self.recorder.payload_built(&body);

        self.client.sparse_update(&session, &body).await?;

        info!(
            doc_number = %request.doc_number,
            fields = request.updates.len(),
            custom_fields = entries.len(),
            "invoice updated"
        );

        Ok(UpdateOutcome::ok(&request.doc_number))
    }

    /// Fetch the raw PDF bytes for the invoice with the given document
    /// number.
    pub async fn download_pdf(&self, doc_number: &str) -> Result<Vec<u8>> {
        let session = self.sessions.authorized_client().await?;
        let invoice = self.client.find_invoice(&session, doc_number).await?;
        self.client.fetch_pdf(&session, &invoice.id).await
    }
}

fn pre_update_txn_date(invoice: &Value) -> Result<NaiveDate> {
    let raw = invoice
        .get("TxnDate")
        .and_then(Value::as_str)
        .ok_or_else(|| InvoicePatchError::Internal("invoice is missing TxnDate".to_string()))?;

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|err| {
        InvoicePatchError::Internal(format!("invoice TxnDate '{raw}' is not a date: {err}"))
    })
}
