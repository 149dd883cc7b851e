//! Index status (`_status`).

#![allow(missing_docs)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::common::Shards;

/// Reply of `_status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(rename = "_shards", default)]
    pub shards: Shards,
    pub indices: BTreeMap<String, IndexStatus>,
}

/// Status of a single index. Per-shard details are not decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStatus {
    #[serde(default)]
    pub index: IndexSizeStatus,
    #[serde(default)]
    pub translog: TranslogStatus,
    #[serde(default)]
    pub docs: DocsStatus,
    #[serde(default)]
    pub merges: MergeStatus,
    #[serde(default)]
    pub refresh: TimedCounter,
    #[serde(default)]
    pub flush: TimedCounter,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSizeStatus {
    #[serde(default)]
    pub primary_size_in_bytes: u64,
    #[serde(default)]
    pub size_in_bytes: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslogStatus {
    #[serde(default)]
    pub operations: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocsStatus {
    #[serde(default)]
    pub num_docs: u64,
    #[serde(default)]
    pub max_doc: u64,
    #[serde(default)]
    pub deleted_docs: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStatus {
    #[serde(default)]
    pub current: u64,
    #[serde(default)]
    pub current_docs: u64,
    #[serde(default)]
    pub current_size_in_bytes: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_time_in_millis: u64,
    #[serde(default)]
    pub total_docs: u64,
    #[serde(default)]
    pub total_size_in_bytes: u64,
}

/// A counter with its accumulated time, used by `refresh` and `flush`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedCounter {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_time_in_millis: u64,
}
