//! Records shared by several endpoints.

#![allow(missing_docs)]

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ClientError, ClientResult};

use super::ResponseKind;

/// Shard counts as returned under `_shards`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shards {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub successful: u64,
    #[serde(default)]
    pub failed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped: Option<u64>,
}

/// Reply of administrative calls (create/delete index, mappings, aliases, settings).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcknowledgedResponse {
    pub acknowledged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shards_acknowledged: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
}

/// Reply of `_count`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
    #[serde(rename = "_shards", default)]
    pub shards: Shards,
}

/// Reply of a document GET.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetResponse {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(default)]
    pub found: bool,
    #[serde(rename = "_source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Map<String, Value>>,
}

impl GetResponse {
    /// Deserializes `_source` into `T`, or `None` when the document was not found.
    pub fn source_as<T: DeserializeOwned>(&self) -> ClientResult<Option<T>> {
        match self.source {
            Some(ref source) => serde_json::from_value(source.clone())
                .map(Some)
                .map_err(|e| ClientError::decode(ResponseKind::Get, e, &[])),
            None => Ok(None),
        }
    }
}

/// Reply of a document index, delete or update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteResponse {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    /// `created`, `updated`, `deleted`, `not_found` or `noop` on newer engines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Set by older engines on index calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<bool>,
    /// Set by older engines on delete calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found: Option<bool>,
    #[serde(rename = "_shards", default, skip_serializing_if = "Option::is_none")]
    pub shards: Option<Shards>,
}

impl WriteResponse {
    /// Returns true if the call created a new document.
    pub fn is_created(&self) -> bool {
        self.created == Some(true) || self.result.as_deref() == Some("created")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_found() {
        let body = r#"{
            "_index": "logs", "_type": "event", "_id": "1", "_version": 2,
            "found": true, "_source": {"message": "hello"}
        }"#;
        let get: GetResponse = serde_json::from_str(body).unwrap();
        assert!(get.found);
        assert_eq!(get.version, Some(2));
        assert_eq!(get.doc_type.as_deref(), Some("event"));

        #[derive(Deserialize)]
        struct Event {
            message: String,
        }
        let event: Event = get.source_as().unwrap().unwrap();
        assert_eq!(event.message, "hello");
    }

    #[test]
    fn test_get_not_found() {
        let body = r#"{"_index": "logs", "_id": "nope", "found": false}"#;
        let get: GetResponse = serde_json::from_str(body).unwrap();
        assert!(!get.found);
        assert!(get.source.is_none());
        assert!(get.source_as::<Value>().unwrap().is_none());
    }

    #[test]
    fn test_write_created_legacy_and_modern() {
        let legacy: WriteResponse = serde_json::from_str(
            r#"{"_index":"logs","_type":"event","_id":"1","_version":1,"created":true}"#,
        )
        .unwrap();
        assert!(legacy.is_created());
        assert!(legacy.shards.is_none());

        let modern: WriteResponse = serde_json::from_str(
            r#"{"_index":"logs","_id":"1","_version":3,"result":"updated",
                "_shards":{"total":2,"successful":1,"failed":0}}"#,
        )
        .unwrap();
        assert!(!modern.is_created());
        assert_eq!(modern.shards.unwrap().successful, 1);
    }

    #[test]
    fn test_acknowledged_requires_flag() {
        let ack: AcknowledgedResponse = serde_json::from_str(r#"{"acknowledged":true}"#).unwrap();
        assert!(ack.acknowledged);
        assert!(serde_json::from_str::<AcknowledgedResponse>(r#"{"count":1}"#).is_err());
    }

    #[test]
    fn test_count() {
        let count: CountResponse = serde_json::from_str(
            r#"{"count": 42, "_shards": {"total": 1, "successful": 1, "failed": 0}}"#,
        )
        .unwrap();
        assert_eq!(count.count, 42);
        assert_eq!(count.shards.total, 1);
    }
}
