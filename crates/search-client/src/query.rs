//! Query payloads.
//!
//! The client does not build query DSL. A [`Query`] is any serializable JSON
//! expression the caller hands over, stored in its JSON form so it can be
//! sent as many times as needed.

use bytes::Bytes;
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::{ClientError, ClientResult};

/// A serializable query expression sent as a request body.
#[derive(Debug, Clone, PartialEq)]
pub struct Query(Value);

impl Query {
    /// Serializes any value into a query.
    pub fn new<T: Serialize + ?Sized>(query: &T) -> ClientResult<Self> {
        serde_json::to_value(query)
            .map(Query)
            .map_err(|e| ClientError::encode("query", e))
    }

    /// A `match_all` query.
    pub fn match_all() -> Self {
        Query(json!({ "query": { "match_all": {} } }))
    }

    /// Wraps pre-serialized JSON bytes, rejecting anything that is not JSON.
    pub fn raw(bytes: impl AsRef<[u8]>) -> ClientResult<Self> {
        serde_json::from_slice(bytes.as_ref())
            .map(Query)
            .map_err(|e| ClientError::encode("query", e))
    }

    /// Returns the query as JSON.
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Serializes the query to request-body bytes.
    pub fn to_bytes(&self) -> ClientResult<Bytes> {
        serde_json::to_vec(&self.0)
            .map(Bytes::from)
            .map_err(|e| ClientError::encode("query", e))
    }
}

impl From<Value> for Query {
    fn from(value: Value) -> Self {
        Query(value)
    }
}
