//! Wire types for the accounting platform's REST API

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Internal-name prefix that marks sales-form custom-field name slots in the
/// preferences payload. The definition id is the index suffix on this name.
const CUSTOM_NAME_PREFIX: &str = "SalesFormsPrefs.SalesCustomName";

/// Resolved identity of an invoice: internal id plus the optimistic
/// concurrency token that must be echoed back on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceRef {
    pub id: String,
    pub sync_token: String,
}

/// One custom-field definition from the platform's preference settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomFieldDefinition {
    /// Platform-assigned numeric definition id
    pub definition_id: String,

    /// Declared value type, e.g. "DateType", "StringType", "NumberType"
    pub field_type: String,
}

/// One resolved custom-field entry in the sparse-update payload. Exactly one
/// of the value envelopes is set, matching the declared type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomFieldEntry {
    #[serde(rename = "DefinitionId")]
    pub definition_id: String,

    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Type")]
    pub field_type: String,

    #[serde(rename = "DateValue", skip_serializing_if = "Option::is_none")]
    pub date_value: Option<String>,

    #[serde(rename = "StringValue", skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,

    #[serde(rename = "NumberValue", skip_serializing_if = "Option::is_none")]
    pub number_value: Option<String>,
}

// -----------------------------------------------------------------------------
// Response envelopes
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct QueryEnvelope {
    #[serde(rename = "QueryResponse", default)]
    pub query_response: QueryResponse,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct QueryResponse {
    #[serde(rename = "Invoice", default)]
    pub invoices: Vec<InvoiceRow>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InvoiceRow {
    #[serde(rename = "Id")]
    pub id: String,

    #[serde(rename = "SyncToken")]
    pub sync_token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InvoiceEnvelope {
    #[serde(rename = "Invoice")]
    pub invoice: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PreferencesEnvelope {
    #[serde(rename = "Preferences", default)]
    pub preferences: Preferences,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Preferences {
    #[serde(rename = "SalesFormsPrefs", default)]
    pub sales_forms_prefs: SalesFormsPrefs,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SalesFormsPrefs {
    #[serde(rename = "CustomField", default)]
    pub custom_field_blocks: Vec<CustomFieldBlock>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CustomFieldBlock {
    #[serde(rename = "CustomField", default)]
    pub custom_fields: Vec<RawCustomField>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCustomField {
    #[serde(rename = "Name", default)]
    pub name: String,

    #[serde(rename = "Type", default)]
    pub field_type: String,

    #[serde(rename = "StringValue", default)]
    pub string_value: String,
}

/// Extract the display-name → definition mapping from a preferences payload.
///
/// Display names come from the `StringValue` of entries whose internal name
/// carries the sales-custom-name prefix; the definition id is the trailing
/// index on that internal name. Entries with a blank display name or no index
/// suffix are ignored.
pub(crate) fn extract_definitions(
    envelope: &PreferencesEnvelope,
) -> BTreeMap<String, CustomFieldDefinition> {
    let mut definitions = BTreeMap::new();

    for block in &envelope.preferences.sales_forms_prefs.custom_field_blocks {
        for field in &block.custom_fields {
            if !field.name.starts_with(CUSTOM_NAME_PREFIX) {
                continue;
            }

            let display_name = field.string_value.trim();
            if display_name.is_empty() {
                continue;
            }

            let Some(definition_id) = trailing_digits(&field.name) else {
                continue;
            };

            definitions.insert(
                display_name.to_string(),
                CustomFieldDefinition { definition_id, field_type: field.field_type.clone() },
            );
        }
    }

    definitions
}

fn trailing_digits(name: &str) -> Option<String> {
    let digits: String = name
        .chars()
        .rev()
        .take_while(char::is_ascii_digit)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preferences(body: serde_json::Value) -> PreferencesEnvelope {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn extracts_display_name_id_and_type() {
        let envelope = preferences(serde_json::json!({
            "Preferences": {
                "SalesFormsPrefs": {
                    "CustomField": [{
                        "CustomField": [
                            {
                                "Name": "SalesFormsPrefs.SalesCustomName1",
                                "Type": "StringType",
                                "StringValue": "Crew #"
                            },
                            {
                                "Name": "SalesFormsPrefs.SalesCustomName2",
                                "Type": "DateType",
                                "StringValue": "Service Date"
                            }
                        ]
                    }]
                }
            }
        }));

        let defs = extract_definitions(&envelope);

        assert_eq!(defs.len(), 2);
        assert_eq!(defs["Crew #"].definition_id, "1");
        assert_eq!(defs["Crew #"].field_type, "StringType");
        assert_eq!(defs["Service Date"].definition_id, "2");
        assert_eq!(defs["Service Date"].field_type, "DateType");
    }

    #[test]
    fn skips_non_name_entries_and_blank_display_names() {
        let envelope = preferences(serde_json::json!({
            "Preferences": {
                "SalesFormsPrefs": {
                    "CustomField": [{
                        "CustomField": [
                            {
                                "Name": "SalesFormsPrefs.UseSalesCustom1",
                                "Type": "BooleanType",
                                "StringValue": "true"
                            },
                            {
                                "Name": "SalesFormsPrefs.SalesCustomName3",
                                "Type": "StringType",
                                "StringValue": "   "
                            },
                            {
                                "Name": "SalesFormsPrefs.SalesCustomName",
                                "Type": "StringType",
                                "StringValue": "No Index"
                            }
                        ]
                    }]
                }
            }
        }));

        assert!(extract_definitions(&envelope).is_empty());
    }

    #[test]
    fn display_names_are_trimmed() {
        let envelope = preferences(serde_json::json!({
            "Preferences": {
                "SalesFormsPrefs": {
                    "CustomField": [{
                        "CustomField": [{
                            "Name": "SalesFormsPrefs.SalesCustomName12",
                            "Type": "NumberType",
                            "StringValue": "  Crew Size "
                        }]
                    }]
                }
            }
        }));

        let defs = extract_definitions(&envelope);
        assert_eq!(defs["Crew Size"].definition_id, "12");
    }

    #[test]
    fn empty_preferences_parse_to_no_definitions() {
        let envelope = preferences(serde_json::json!({ "Preferences": {} }));
        assert!(extract_definitions(&envelope).is_empty());
    }

    #[test]
    fn custom_field_entry_serializes_single_value_envelope() {
        let entry = CustomFieldEntry {
            definition_id: "2".to_string(),
            name: "Service Date".to_string(),
            field_type: "DateType".to_string(),
            date_value: Some("2025-09-30".to_string()),
            string_value: None,
            number_value: None,
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["DefinitionId"], "2");
        assert_eq!(json["DateValue"], "2025-09-30");
        assert!(json.get("StringValue").is_none());
        assert!(json.get("NumberValue").is_none());
    }
}
