//! Search hits and aggregations.

#![allow(missing_docs)]

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{ClientError, ClientResult};

use super::ResponseKind;
use super::common::Shards;

/// Reply of `_search` and `_search/scroll`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub took: u64,
    #[serde(default)]
    pub timed_out: bool,
    #[serde(rename = "_shards", default)]
    pub shards: Shards,
    pub hits: Hits,
    /// Cursor for the next scroll page.
    #[serde(rename = "_scroll_id", default, skip_serializing_if = "Option::is_none")]
    pub scroll_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregations: Option<BTreeMap<String, Aggregation>>,
}

impl SearchResponse {
    /// Deserializes every hit's `_source` into `T`, skipping hits without one.
    pub fn sources<T: DeserializeOwned>(&self) -> ClientResult<Vec<T>> {
        self.hits
            .hits
            .iter()
            .filter_map(|hit| hit.source_as::<T>().transpose())
            .collect()
    }

    /// Returns a top-level aggregation by name.
    pub fn aggregation(&self, name: &str) -> Option<&Aggregation> {
        self.aggregations.as_ref().and_then(|aggs| aggs.get(name))
    }
}

/// The `hits` member of a search reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hits {
    /// `None` when the engine does not track totals (`track_total_hits=false`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<HitsTotal>,
    /// `None` when the engine reports `null` (e.g. sorted searches).
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// How the total hit count relates to the real number of matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TotalRelation {
    /// The count is exact.
    #[default]
    #[serde(rename = "eq")]
    Equal,
    /// The count is a lower bound.
    #[serde(rename = "gte")]
    GreaterThanOrEqual,
}

/// Total hit count.
///
/// Decodes both the bare integer form (`"total": 12`) and the object form
/// (`"total": {"value": 12, "relation": "eq"}`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HitsTotal {
    pub value: u64,
    pub relation: TotalRelation,
}

impl<'de> Deserialize<'de> for HitsTotal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawTotal {
            Count(u64),
            Object {
                value: u64,
                #[serde(default)]
                relation: TotalRelation,
            },
        }

        Ok(match RawTotal::deserialize(deserializer)? {
            RawTotal::Count(value) => HitsTotal {
                value,
                relation: TotalRelation::Equal,
            },
            RawTotal::Object { value, relation } => HitsTotal { value, relation },
        })
    }
}

/// A single search hit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<Value>,
}

impl Hit {
    /// Deserializes `_source` into `T`.
    pub fn source_as<T: DeserializeOwned>(&self) -> ClientResult<Option<T>> {
        match self.source {
            Some(ref source) => serde_json::from_value(source.clone())
                .map(Some)
                .map_err(|e| ClientError::decode(ResponseKind::Search, e, &[])),
            None => Ok(None),
        }
    }
}

/// An engine-computed aggregation, kept as its JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Aggregation(pub Map<String, Value>);

impl Aggregation {
    /// Returns a raw member of the aggregation.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the `value` of a single-value metric aggregation.
    pub fn value(&self) -> Option<f64> {
        self.0.get("value").and_then(Value::as_f64)
    }

    /// Returns the buckets of a bucket aggregation.
    ///
    /// Keyed buckets (an object instead of an array) are returned in key order
    /// with their key copied into the bucket.
    pub fn buckets(&self) -> Vec<Bucket> {
        match self.0.get("buckets") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_object)
                .map(|b| Bucket(b.clone()))
                .collect(),
            Some(Value::Object(keyed)) => keyed
                .iter()
                .filter_map(|(key, b)| {
                    let mut bucket = b.as_object()?.clone();
                    bucket
                        .entry("key")
                        .or_insert_with(|| Value::String(key.clone()));
                    Some(Bucket(bucket))
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Returns `sum_other_doc_count` for terms aggregations.
    pub fn sum_other_doc_count(&self) -> Option<u64> {
        self.0.get("sum_other_doc_count").and_then(Value::as_u64)
    }
}

/// One bucket of a bucket aggregation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bucket(pub Map<String, Value>);

impl Bucket {
    /// Returns the bucket key.
    pub fn key(&self) -> Option<&Value> {
        self.0.get("key")
    }

    /// Returns `key_as_string`, falling back to a string key.
    pub fn key_as_string(&self) -> Option<&str> {
        self.0
            .get("key_as_string")
            .and_then(Value::as_str)
            .or_else(|| self.key().and_then(Value::as_str))
    }

    /// Returns the bucket document count, zero when absent.
    pub fn doc_count(&self) -> u64 {
        self.0.get("doc_count").and_then(Value::as_u64).unwrap_or(0)
    }

    /// Returns a sub-aggregation by name.
    pub fn aggregation(&self, name: &str) -> Option<Aggregation> {
        self.0
            .get(name)
            .and_then(Value::as_object)
            .map(|agg| Aggregation(agg.clone()))
    }
}
