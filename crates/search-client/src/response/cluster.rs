//! Cluster status (`_cluster/health`).

#![allow(missing_docs)]

use std::fmt;

use serde::{Deserialize, Serialize};

/// Overall cluster health colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All shards are allocated.
    Green,
    /// All primaries are allocated, some replicas are not.
    Yellow,
    /// Some primaries are unallocated.
    Red,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Green => f.write_str("green"),
            HealthStatus::Yellow => f.write_str("yellow"),
            HealthStatus::Red => f.write_str("red"),
        }
    }
}

/// Reply of `_cluster/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterHealthResponse {
    #[serde(default)]
    pub cluster_name: String,
    pub status: HealthStatus,
    #[serde(default)]
    pub timed_out: bool,
    #[serde(default)]
    pub number_of_nodes: u64,
    #[serde(default)]
    pub number_of_data_nodes: u64,
    #[serde(default)]
    pub active_primary_shards: u64,
    #[serde(default)]
    pub active_shards: u64,
    #[serde(default)]
    pub relocating_shards: u64,
    #[serde(default)]
    pub initializing_shards: u64,
    #[serde(default)]
    pub unassigned_shards: u64,
}

impl ClusterHealthResponse {
    /// Returns true unless the cluster is red.
    pub fn is_available(&self) -> bool {
        self.status != HealthStatus::Red
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_health() {
        let body = r#"{
            "cluster_name": "search", "status": "yellow", "timed_out": false,
            "number_of_nodes": 1, "number_of_data_nodes": 1,
            "active_primary_shards": 5, "active_shards": 5,
            "relocating_shards": 0, "initializing_shards": 0, "unassigned_shards": 5
        }"#;
        let health: ClusterHealthResponse = serde_json::from_str(body).unwrap();
        assert_eq!(health.status, HealthStatus::Yellow);
        assert_eq!(health.unassigned_shards, 5);
        assert!(health.is_available());
        assert_eq!(health.status.to_string(), "yellow");
    }

    #[test]
    fn test_red_is_unavailable() {
        let health: ClusterHealthResponse =
            serde_json::from_str(r#"{"cluster_name": "c", "status": "red"}"#).unwrap();
        assert!(!health.is_available());
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!(
            serde_json::from_str::<ClusterHealthResponse>(r#"{"status": "purple"}"#).is_err()
        );
    }
}
