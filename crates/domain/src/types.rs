//! Caller-facing update contract
//!
//! These types define the JSON surface external callers (spreadsheet macros,
//! simple web forms) use to request invoice patches, and the structured
//! outcome they receive back.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::InvoicePatchError;

/// A request to patch fields on an existing invoice.
///
/// `updates` entries are passed through to the platform uninterpreted;
/// `custom_fields` entries are resolved against the platform's live
/// custom-field definitions before submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRequest {
    /// Human-readable document number used to look the invoice up
    #[serde(rename = "DocNumber")]
    pub doc_number: String,

    /// Top-level field changes, forwarded verbatim into the sparse body
    #[serde(rename = "Updates", default)]
    pub updates: BTreeMap<String, Value>,

    /// Custom-field changes keyed by display name
    #[serde(rename = "CustomFields", default)]
    pub custom_fields: BTreeMap<String, String>,

    /// Optional directory to archive the pre-update PDF into
    #[serde(rename = "ArchiveDirectory", default, skip_serializing_if = "Option::is_none")]
    pub archive_dir: Option<PathBuf>,
}

/// Structured result reported back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum UpdateOutcome {
    Ok {
        doc: String,
    },
    Error {
        error: String,
    },
}

impl UpdateOutcome {
    /// Successful outcome for the given document number.
    pub fn ok(doc_number: impl Into<String>) -> Self {
        Self::Ok { doc: doc_number.into() }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

impl From<&InvoicePatchError> for UpdateOutcome {
    fn from(err: &InvoicePatchError) -> Self {
        Self::Error { error: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_caller_payload() {
        let body = serde_json::json!({
            "DocNumber": "1069",
            "Updates": { "TxnDate": "2025-09-30" },
            "CustomFields": { "Crew #": "42" },
            "ArchiveDirectory": "/some/local/path"
        });

        let request: UpdateRequest = serde_json::from_value(body).unwrap();

        assert_eq!(request.doc_number, "1069");
        assert_eq!(request.updates["TxnDate"], "2025-09-30");
        assert_eq!(request.custom_fields["Crew #"], "42");
        assert_eq!(request.archive_dir, Some(PathBuf::from("/some/local/path")));
    }

    #[test]
    fn updates_and_custom_fields_default_to_empty() {
        let request: UpdateRequest =
            serde_json::from_value(serde_json::json!({ "DocNumber": "1069" })).unwrap();

        assert!(request.updates.is_empty());
        assert!(request.custom_fields.is_empty());
        assert!(request.archive_dir.is_none());
    }

    #[test]
    fn ok_outcome_serializes_with_status_tag() {
        let outcome = UpdateOutcome::ok("1069");
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["status"], "ok");
        assert_eq!(json["doc"], "1069");
    }

    #[test]
    fn error_outcome_carries_message() {
        let err = InvoicePatchError::NotFound("no invoice '9999'".to_string());
        let outcome = UpdateOutcome::from(&err);
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["status"], "error");
        assert!(json["error"].as_str().unwrap().contains("9999"));
    }
}
