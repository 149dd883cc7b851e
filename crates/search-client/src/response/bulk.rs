//! Bulk acknowledgements.
//!
//! A `_bulk` reply lists one item per submitted action, in submission order.
//! Each item is keyed by the action it acknowledges:
//!
//! ```json
//! {"took": 30, "errors": true, "items": [
//!   {"index":  {"_index": "logs", "_id": "1", "status": 201}},
//!   {"delete": {"_index": "logs", "_id": "2", "status": 404, "error": "..."}}
//! ]}
//! ```
//!
//! Item failures are reported per item and never turn the whole reply into an
//! error.

#![allow(missing_docs)]

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::document::BulkCommand;
use crate::error::EngineErrorDetail;

/// Reply of `_bulk`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkResponse {
    #[serde(default)]
    pub took: u64,
    /// Set by the engine when at least one item failed.
    pub errors: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<BulkItem>,
}

impl BulkResponse {
    /// Returns true if the engine flagged errors or any item failed.
    pub fn has_errors(&self) -> bool {
        self.errors || self.items.iter().any(|item| !item.result.is_success())
    }

    /// Returns the failed items with their position in the submitted batch.
    pub fn failed_items(&self) -> impl Iterator<Item = (usize, &BulkItem)> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.result.is_success())
    }
}

/// One acknowledged bulk action.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkItem {
    /// The action this item acknowledges.
    pub command: BulkCommand,
    /// The engine's result for the action.
    pub result: BulkItemResult,
}

impl Serialize for BulkItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.command.as_str(), &self.result)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for BulkItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<String, BulkItemResult>::deserialize(deserializer)?;
        if entries.len() != 1 {
            return Err(D::Error::custom(format!(
                "bulk item must hold exactly one action, found {}",
                entries.len()
            )));
        }
        let (action, result) = entries
            .into_iter()
            .next()
            .ok_or_else(|| D::Error::custom("empty bulk item"))?;
        let command = action.parse().map_err(D::Error::custom)?;
        Ok(BulkItem { command, result })
    }
}

/// The engine's result for a single bulk action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkItemResult {
    #[serde(rename = "_index", default)]
    pub index: String,
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    /// May be absent for failed creates with engine-assigned ids.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "_version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(default)]
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<EngineErrorDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl BulkItemResult {
    /// Returns true if the action succeeded.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && (200..300).contains(&self.status)
    }
}
