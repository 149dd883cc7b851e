//! Documents and bulk encoding.
//!
//! A [`Document`] is built by the caller right before an index, delete or bulk
//! call. For bulk calls, [`encode_bulk`] turns a slice of documents into the
//! newline-delimited body the `_bulk` endpoint expects:
//!
//! ```text
//! {"index":{"_index":"logs","_type":"event","_id":"1"}}
//! {"message":"hello"}
//! {"delete":{"_index":"logs","_type":"event","_id":"2"}}
//! ```

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, ClientResult};

/// The bulk action applied to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkCommand {
    /// Index the document, replacing any existing version.
    Index,
    /// Index the document only if it does not exist.
    Create,
    /// Partially update the document.
    Update,
    /// Delete the document.
    Delete,
}

impl BulkCommand {
    /// Returns the wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            BulkCommand::Index => "index",
            BulkCommand::Create => "create",
            BulkCommand::Update => "update",
            BulkCommand::Delete => "delete",
        }
    }

    /// Returns true if the action line is followed by a source line.
    pub fn has_source(&self) -> bool {
        !matches!(self, BulkCommand::Delete)
    }
}

impl fmt::Display for BulkCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BulkCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "index" => Ok(BulkCommand::Index),
            "create" => Ok(BulkCommand::Create),
            "update" => Ok(BulkCommand::Update),
            "delete" => Ok(BulkCommand::Delete),
            other => Err(format!("unknown bulk command: {}", other)),
        }
    }
}

/// A document to send to the engine.
///
/// For [`BulkCommand::Update`] the fields are sent as the update body
/// verbatim, so they should already hold `doc` or `script`.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Target index; omitted from bulk metadata when absent.
    pub index: Option<String>,
    /// Target type; omitted from bulk metadata when absent.
    pub doc_type: Option<String>,
    /// Document id; the engine assigns one when absent.
    pub id: Option<String>,
    /// Bulk action.
    pub bulk_command: BulkCommand,
    /// Field payload.
    pub fields: Option<Value>,
}

impl Document {
    /// Creates a document for the given command with no metadata or fields.
    pub fn new(bulk_command: BulkCommand) -> Self {
        Self {
            index: None,
            doc_type: None,
            id: None,
            bulk_command,
            fields: None,
        }
    }

    /// Sets the target index.
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// Sets the target type.
    pub fn with_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    /// Sets the document id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the field payload from a JSON value.
    pub fn with_fields(mut self, fields: Value) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Serializes any value into the field payload.
    pub fn with_source<T: Serialize + ?Sized>(mut self, source: &T) -> ClientResult<Self> {
        let fields =
            serde_json::to_value(source).map_err(|e| ClientError::encode("document", e))?;
        self.fields = Some(fields);
        Ok(self)
    }

    fn action_line(&self) -> Value {
        let mut meta = serde_json::Map::new();
        if let Some(ref index) = self.index {
            meta.insert("_index".to_string(), Value::String(index.clone()));
        }
        if let Some(ref doc_type) = self.doc_type {
            meta.insert("_type".to_string(), Value::String(doc_type.clone()));
        }
        if let Some(ref id) = self.id {
            meta.insert("_id".to_string(), Value::String(id.clone()));
        }

        let mut action = serde_json::Map::new();
        action.insert(self.bulk_command.as_str().to_string(), Value::Object(meta));
        Value::Object(action)
    }
}

/// Encodes documents into a newline-delimited bulk body.
///
/// Every document contributes an action line and, unless it is a delete, a
/// source line. Document order is preserved. A non-delete document without
/// fields is an [`ClientError::InvalidRequest`], since a missing source line
/// would shift every following action.
pub fn encode_bulk(documents: &[Document]) -> ClientResult<Bytes> {
    if documents.is_empty() {
        return Err(ClientError::InvalidRequest(
            "bulk request requires at least one document".to_string(),
        ));
    }

    let mut buf = Vec::with_capacity(documents.len() * 128);
    for (position, doc) in documents.iter().enumerate() {
        serde_json::to_writer(&mut buf, &doc.action_line())
            .map_err(|e| ClientError::encode("bulk action", e))?;
        buf.push(b'\n');

        if !doc.bulk_command.has_source() {
            continue;
        }
        let fields = doc.fields.as_ref().ok_or_else(|| {
            ClientError::InvalidRequest(format!(
                "bulk {} at position {} has no fields",
                doc.bulk_command, position
            ))
        })?;
        serde_json::to_writer(&mut buf, fields)
            .map_err(|e| ClientError::encode("bulk source", e))?;
        buf.push(b'\n');
    }

    Ok(Bytes::from(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lines(bytes: &Bytes) -> Vec<Value> {
        std::str::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_index_and_delete_lines() {
        let docs = vec![
            Document::new(BulkCommand::Index)
                .with_index("logs")
                .with_type("event")
                .with_id("1")
                .with_fields(json!({"message": "hello"})),
            Document::new(BulkCommand::Delete)
                .with_index("logs")
                .with_type("event")
                .with_id("2")
                .with_fields(json!({"ignored": true})),
        ];

        let body = encode_bulk(&docs).unwrap();
        assert!(body.ends_with(b"\n"));

        let lines = lines(&body);
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            json!({"index": {"_index": "logs", "_type": "event", "_id": "1"}})
        );
        assert_eq!(lines[1], json!({"message": "hello"}));
        assert_eq!(
            lines[2],
            json!({"delete": {"_index": "logs", "_type": "event", "_id": "2"}})
        );
    }

    #[test]
    fn test_absent_metadata_is_omitted() {
        let docs = vec![Document::new(BulkCommand::Create).with_fields(json!({"a": 1}))];
        let lines = lines(&encode_bulk(&docs).unwrap());
        assert_eq!(lines[0], json!({"create": {}}));
        assert_eq!(lines[1], json!({"a": 1}));
    }

    #[test]
    fn test_update_fields_sent_verbatim() {
        let docs = vec![
            Document::new(BulkCommand::Update)
                .with_index("logs")
                .with_id("7")
                .with_fields(json!({"doc": {"seen": true}})),
        ];
        let lines = lines(&encode_bulk(&docs).unwrap());
        assert_eq!(lines[0], json!({"update": {"_index": "logs", "_id": "7"}}));
        assert_eq!(lines[1], json!({"doc": {"seen": true}}));
    }

    #[test]
    fn test_source_command_without_fields_rejected() {
        for command in [BulkCommand::Index, BulkCommand::Create, BulkCommand::Update] {
            let docs = vec![
                Document::new(command).with_index("logs").with_id("1"),
                Document::new(BulkCommand::Delete).with_index("logs").with_id("2"),
            ];
            match encode_bulk(&docs) {
                Err(ClientError::InvalidRequest(message)) => {
                    assert!(message.contains(command.as_str()));
                    assert!(message.contains("position 0"));
                }
                other => panic!("expected invalid request, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_delete_without_fields_has_no_source_line() {
        let docs = vec![
            Document::new(BulkCommand::Delete).with_index("logs").with_id("1"),
            Document::new(BulkCommand::Index)
                .with_index("logs")
                .with_id("2")
                .with_fields(json!({"message": "kept"})),
        ];
        let encoded = lines(&encode_bulk(&docs).unwrap());
        assert_eq!(encoded.len(), 3);
        assert_eq!(encoded[1]["index"]["_id"], "2");
        assert_eq!(encoded[2]["message"], "kept");
    }

    #[test]
    fn test_order_preserved() {
        let docs: Vec<_> = (0..5)
            .map(|i| {
                Document::new(BulkCommand::Delete)
                    .with_index("logs")
                    .with_id(i.to_string())
            })
            .collect();
        let ids: Vec<_> = lines(&encode_bulk(&docs).unwrap())
            .iter()
            .map(|l| l["delete"]["_id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["0", "1", "2", "3", "4"]);
    }

    #[test]
    fn test_empty_bulk_rejected() {
        assert!(matches!(
            encode_bulk(&[]),
            Err(ClientError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_with_source() {
        #[derive(Serialize)]
        struct Event {
            message: &'static str,
        }
        let doc = Document::new(BulkCommand::Index)
            .with_source(&Event { message: "hi" })
            .unwrap();
        assert_eq!(doc.fields, Some(json!({"message": "hi"})));
    }

    #[test]
    fn test_bulk_command_from_str() {
        assert_eq!("delete".parse::<BulkCommand>(), Ok(BulkCommand::Delete));
        assert!("upsert".parse::<BulkCommand>().is_err());
    }

    #[test]
    fn test_bulk_command_serde() {
        assert_eq!(
            serde_json::to_string(&BulkCommand::Create).unwrap(),
            "\"create\""
        );
        let cmd: BulkCommand = serde_json::from_str("\"update\"").unwrap();
        assert_eq!(cmd, BulkCommand::Update);
    }
}
