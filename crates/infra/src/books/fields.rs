//! Custom-field resolution and value coercion
//!
//! Display names are mapped to definition ids against the live preference
//! mapping, and caller-supplied values are encoded per the declared type.
//! Unknown display names are skipped (soft error); a date value that fails to
//! parse is a hard error that must prevent submission.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use invoicepatch_domain::{InvoicePatchError, Result};
use serde_json::{Map, Value};
use tracing::warn;

use super::types::{CustomFieldDefinition, CustomFieldEntry, InvoiceRef};

/// Caller-facing input format for date-typed custom fields.
const DATE_INPUT_FORMAT: &str = "%m/%d/%Y";

/// Wire format the platform expects for date values.
const DATE_WIRE_FORMAT: &str = "%Y-%m-%d";

/// Resolve requested custom-field changes against the live definitions.
///
/// Names absent from the mapping are logged and dropped. Value coercion
/// follows the declared type: `DateType` parses `MM/DD/YYYY` and re-emits
/// `YYYY-MM-DD`, `StringType` passes through, anything else is treated as
/// numeric and passed through without validation.
pub fn resolve_custom_fields(
    requested: &BTreeMap<String, String>,
    definitions: &BTreeMap<String, CustomFieldDefinition>,
) -> Result<Vec<CustomFieldEntry>> {
    let mut entries = Vec::with_capacity(requested.len());

    for (name, value) in requested {
        let Some(definition) = definitions.get(name) else {
            warn!(field = %name, "skipping unknown custom field");
            continue;
        };

        let mut entry = CustomFieldEntry {
            definition_id: definition.definition_id.clone(),
            name: name.clone(),
            field_type: definition.field_type.clone(),
            date_value: None,
            string_value: None,
            number_value: None,
        };

        match definition.field_type.as_str() {
            "DateType" => {
                let date = NaiveDate::parse_from_str(value, DATE_INPUT_FORMAT).map_err(|err| {
                    InvoicePatchError::InvalidInput(format!(
                        "custom field '{name}': expected MM/DD/YYYY date, got '{value}': {err}"
                    ))
                })?;
                entry.date_value = Some(date.format(DATE_WIRE_FORMAT).to_string());
            }
            "StringType" => entry.string_value = Some(value.clone()),
            _ => entry.number_value = Some(value.clone()),
        }

        entries.push(entry);
    }

    Ok(entries)
}

/// Build the sparse-update body: identity and concurrency metadata, the
/// literal top-level changes, and the resolved custom-field entries.
pub fn build_sparse_body(
    invoice: &InvoiceRef,
    updates: &BTreeMap<String, Value>,
    custom_fields: &[CustomFieldEntry],
) -> Result<Value> {
    let mut body = Map::new();
    body.insert("Id".to_string(), Value::String(invoice.id.clone()));
    body.insert("SyncToken".to_string(), Value::String(invoice.sync_token.clone()));
    body.insert("sparse".to_string(), Value::Bool(true));

    for (field, value) in updates {
        body.insert(field.clone(), value.clone());
    }

    if !custom_fields.is_empty() {
        let entries = serde_json::to_value(custom_fields)
            .map_err(|err| InvoicePatchError::Internal(format!("failed to encode custom fields: {err}")))?;
        body.insert("CustomField".to_string(), entries);
    }

    Ok(Value::Object(body))
}
