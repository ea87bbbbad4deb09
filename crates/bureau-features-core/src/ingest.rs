//! Contract payload ingestion
//!
//! Collaborators receive contracts either as a structured JSON list or as a
//! JSON-encoded string (a CSV cell, or a field of a tabular row forwarded over
//! HTTP). Both are normalized here into `Vec<ContractRecord>`.
//!
//! Nothing in this module fails: an undecodable payload is an empty list and
//! a non-object entry is dropped.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{ContractRecord, TextField};

/// Contracts as they arrive on the wire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContractsPayload {
    /// Absent or `null`
    #[default]
    Missing,
    /// A JSON-encoded list, as found in tabular exports
    Encoded(String),
    /// A structured list
    List(Vec<Value>),
    /// Any other JSON shape
    Other(Value),
}

impl ContractsPayload {
    /// Normalize into typed contract records
    pub fn into_contracts(self) -> Vec<ContractRecord> {
        match self {
            ContractsPayload::Missing => Vec::new(),
            ContractsPayload::Encoded(text) => contracts_from_json_text(&text),
            ContractsPayload::List(items) => contracts_from_items(&items),
            ContractsPayload::Other(value) => {
                tracing::debug!(kind = json_kind(&value), "Contracts payload is not a list");
                Vec::new()
            }
        }
    }
}

/// Decode a JSON-encoded contract list.
///
/// Blank text, invalid JSON and non-array JSON all yield an empty list.
pub fn contracts_from_json_text(text: &str) -> Vec<ContractRecord> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value) => contracts_from_value(&value),
        Err(err) => {
            tracing::debug!(error = %err, "Contracts payload is not valid JSON");
            Vec::new()
        }
    }
}

/// Normalize an already-decoded JSON value
pub fn contracts_from_value(value: &Value) -> Vec<ContractRecord> {
    match value {
        Value::Array(items) => contracts_from_items(items),
        Value::Null => Vec::new(),
        other => {
            tracing::debug!(kind = json_kind(other), "Contracts payload is not a list");
            Vec::new()
        }
    }
}

fn contracts_from_items(items: &[Value]) -> Vec<ContractRecord> {
    let contracts: Vec<ContractRecord> = items.iter().filter_map(contract_from_item).collect();
    let skipped = items.len() - contracts.len();
    if skipped > 0 {
        tracing::debug!(skipped, kept = contracts.len(), "Dropped non-object contract entries");
    }
    contracts
}

fn contract_from_item(item: &Value) -> Option<ContractRecord> {
    let Value::Object(map) = item else {
        return None;
    };
    let field = |name: &str| map.get(name).map(TextField::from_json).unwrap_or_default();

    Some(ContractRecord {
        contract_id: field("contract_id"),
        bank: field("bank"),
        summa: field("summa"),
        loan_summa: field("loan_summa"),
        claim_date: field("claim_date"),
        claim_id: field("claim_id"),
        contract_date: field("contract_date"),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
