//! Per-index statistics (`_stats`).
//!
//! Counters decode as `u64`. Byte sizes and durations are the engine's raw
//! `*_in_bytes` and `*_in_millis` numbers; the human-readable variants the
//! engine adds with `?human=true` are ignored.

#![allow(missing_docs)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::common::Shards;

/// Reply of `_stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(rename = "_shards", default)]
    pub shards: Shards,
    #[serde(rename = "_all")]
    pub all: AllStats,
    /// Per-index stats as reported at the top level by newer engines.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub indices: BTreeMap<String, IndexStats>,
}

impl StatsResponse {
    /// Returns the stats for one index, wherever the engine reported them.
    pub fn index(&self, name: &str) -> Option<&IndexStats> {
        self.indices
            .get(name)
            .or_else(|| self.all.indices.get(name))
    }

    /// Returns the names of all indices with stats, in order.
    pub fn index_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .indices
            .keys()
            .chain(self.all.indices.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

/// The `_all` member of a `_stats` reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllStats {
    #[serde(default)]
    pub primaries: StatGroup,
    #[serde(default)]
    pub total: StatGroup,
    /// Per-index stats nested under `_all` by older engines.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub indices: BTreeMap<String, IndexStats>,
}

/// Stats for a single index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    #[serde(default)]
    pub primaries: StatGroup,
    #[serde(default)]
    pub total: StatGroup,
}

/// A group of stats for primaries or all shard copies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatGroup {
    #[serde(default)]
    pub docs: DocsStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexing: Option<IndexingStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchStats>,
}

/// Document counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocsStats {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub deleted: u64,
}

/// Store size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    #[serde(default)]
    pub size_in_bytes: u64,
}

/// Indexing counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexingStats {
    #[serde(default)]
    pub index_total: u64,
    #[serde(default)]
    pub index_time_in_millis: u64,
    #[serde(default)]
    pub index_current: u64,
    #[serde(default)]
    pub delete_total: u64,
    #[serde(default)]
    pub delete_time_in_millis: u64,
}

/// Search counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    #[serde(default)]
    pub query_total: u64,
    #[serde(default)]
    pub query_time_in_millis: u64,
    #[serde(default)]
    pub fetch_total: u64,
    #[serde(default)]
    pub fetch_time_in_millis: u64,
}
