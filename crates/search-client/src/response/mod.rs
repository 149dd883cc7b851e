//! Response envelopes returned by the engine.
//!
//! Each API keyword answers with its own JSON shape. Rather than one record
//! holding every possible field, a reply decodes into the [`Response`] variant
//! selected by the request's keyword and method (see [`ResponseKind`]). The
//! leaf records keep the engine's JSON keys (`_shards`, `_index`, `_source`,
//! `max_score`, ...) exactly.
//!
//! | keyword | method | variant |
//! |---------|--------|---------|
//! | `_search`, `_search/scroll` | any | [`Response::Search`] |
//! | `_count` | any | [`Response::Count`] |
//! | `_bulk` | any | [`Response::Bulk`] |
//! | `_stats` | any | [`Response::Stats`] |
//! | `_status` | any | [`Response::Status`] |
//! | `_cluster/health` | any | [`Response::Health`] |
//! | document endpoint | `GET` | [`Response::Get`] |
//! | document endpoint, `_update` | write methods | [`Response::Write`] |
//! | index endpoint | `GET`, `HEAD` | [`Response::Raw`] |
//! | index endpoint | write methods | [`Response::Acknowledged`] |
//! | `_mapping`, `_settings`, `_aliases`, `_alias` | write methods | [`Response::Acknowledged`] |
//! | anything else | any | [`Response::Raw`] |

mod bulk;
mod cluster;
mod common;
mod search;
mod stats;
mod status;

use std::fmt;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClientError, ClientResult};
use crate::request::Api;

pub use bulk::{BulkItem, BulkItemResult, BulkResponse};
pub use cluster::{ClusterHealthResponse, HealthStatus};
pub use common::{AcknowledgedResponse, CountResponse, GetResponse, Shards, WriteResponse};
pub use search::{Aggregation, Bucket, Hit, Hits, HitsTotal, SearchResponse, TotalRelation};
pub use stats::{
    AllStats, DocsStats, IndexStats, IndexingStats, SearchStats, StatGroup, StatsResponse,
    StoreStats,
};
pub use status::{
    DocsStatus, IndexSizeStatus, IndexStatus, MergeStatus, StatusResponse, TimedCounter,
    TranslogStatus,
};

/// The response shape a request decodes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    /// Search hits.
    Search,
    /// A document count.
    Count,
    /// Per-item bulk acknowledgements.
    Bulk,
    /// Index statistics.
    Stats,
    /// Index status.
    Status,
    /// An `acknowledged` flag.
    Acknowledged,
    /// A fetched document.
    Get,
    /// A document write result.
    Write,
    /// Cluster health.
    Health,
    /// Any JSON value.
    Raw,
}

impl ResponseKind {
    /// Selects the response shape for an API keyword and method.
    pub fn for_request(api: &Api, method: &Method) -> Self {
        let read = *method == Method::GET || *method == Method::HEAD;
        match api {
            Api::Search | Api::Scroll => ResponseKind::Search,
            Api::Count => ResponseKind::Count,
            Api::Bulk => ResponseKind::Bulk,
            Api::Stats => ResponseKind::Stats,
            Api::Status => ResponseKind::Status,
            Api::ClusterHealth => ResponseKind::Health,
            Api::Document if read => ResponseKind::Get,
            Api::Document | Api::Update => ResponseKind::Write,
            Api::Index if read => ResponseKind::Raw,
            Api::Index => ResponseKind::Acknowledged,
            Api::Mapping | Api::Settings | Api::Aliases | Api::Alias if !read => {
                ResponseKind::Acknowledged
            }
            _ => ResponseKind::Raw,
        }
    }

    /// Returns a short lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseKind::Search => "search",
            ResponseKind::Count => "count",
            ResponseKind::Bulk => "bulk",
            ResponseKind::Stats => "stats",
            ResponseKind::Status => "status",
            ResponseKind::Acknowledged => "acknowledged",
            ResponseKind::Get => "get",
            ResponseKind::Write => "write",
            ResponseKind::Health => "cluster health",
            ResponseKind::Raw => "raw",
        }
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded engine reply, one variant per response shape.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum Response {
    Search(SearchResponse),
    Count(CountResponse),
    Bulk(BulkResponse),
    Stats(StatsResponse),
    Status(StatusResponse),
    Acknowledged(AcknowledgedResponse),
    Get(GetResponse),
    Write(WriteResponse),
    Health(ClusterHealthResponse),
    Raw(Value),
}

#[allow(missing_docs)]
impl Response {
    /// Decodes a body into the variant for `kind`.
    ///
    /// Empty and malformed bodies are errors, never empty responses.
    pub fn decode(kind: ResponseKind, body: &[u8]) -> ClientResult<Self> {
        Ok(match kind {
            ResponseKind::Search => Response::Search(decode_json(kind, body)?),
            ResponseKind::Count => Response::Count(decode_json(kind, body)?),
            ResponseKind::Bulk => Response::Bulk(decode_json(kind, body)?),
            ResponseKind::Stats => Response::Stats(decode_json(kind, body)?),
            ResponseKind::Status => Response::Status(decode_json(kind, body)?),
            ResponseKind::Acknowledged => Response::Acknowledged(decode_json(kind, body)?),
            ResponseKind::Get => Response::Get(decode_json(kind, body)?),
            ResponseKind::Write => Response::Write(decode_json(kind, body)?),
            ResponseKind::Health => Response::Health(decode_json(kind, body)?),
            ResponseKind::Raw => Response::Raw(decode_json(kind, body)?),
        })
    }

    /// Returns the shape of this response.
    pub fn kind(&self) -> ResponseKind {
        match self {
            Response::Search(_) => ResponseKind::Search,
            Response::Count(_) => ResponseKind::Count,
            Response::Bulk(_) => ResponseKind::Bulk,
            Response::Stats(_) => ResponseKind::Stats,
            Response::Status(_) => ResponseKind::Status,
            Response::Acknowledged(_) => ResponseKind::Acknowledged,
            Response::Get(_) => ResponseKind::Get,
            Response::Write(_) => ResponseKind::Write,
            Response::Health(_) => ResponseKind::Health,
            Response::Raw(_) => ResponseKind::Raw,
        }
    }

    pub fn as_search(&self) -> Option<&SearchResponse> {
        match self {
            Response::Search(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<&CountResponse> {
        match self {
            Response::Count(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_bulk(&self) -> Option<&BulkResponse> {
        match self {
            Response::Bulk(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_stats(&self) -> Option<&StatsResponse> {
        match self {
            Response::Stats(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_status(&self) -> Option<&StatusResponse> {
        match self {
            Response::Status(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_acknowledged(&self) -> Option<&AcknowledgedResponse> {
        match self {
            Response::Acknowledged(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_get(&self) -> Option<&GetResponse> {
        match self {
            Response::Get(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_write(&self) -> Option<&WriteResponse> {
        match self {
            Response::Write(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_health(&self) -> Option<&ClusterHealthResponse> {
        match self {
            Response::Health(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&Value> {
        match self {
            Response::Raw(v) => Some(v),
            _ => None,
        }
    }
}

/// Decodes a JSON body, rejecting empty bodies.
pub(crate) fn decode_json<T: DeserializeOwned>(kind: ResponseKind, body: &[u8]) -> ClientResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ClientError::decode(kind, "empty response body", body));
    }
    serde_json::from_slice(body).map_err(|e| ClientError::decode(kind, e, body))
}
