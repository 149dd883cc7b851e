//! The request envelope sent to the engine.
//!
//! A [`Request`] names the HTTP method, the API keyword, the target indices
//! and types, an optional document id, extra query-string arguments and at
//! most one [`Payload`]. It carries no connection: the [`Client`](crate::Client)
//! it is sent through supplies scheme, host and port.
//!
//! # Path layout
//!
//! `/{indices}/{types}/{id}/{keyword}`, where empty parts are skipped and
//! multiple index or type names are joined with [`NAME_DELIMITER`] in the
//! order given.
//!
//! ```
//! use helios_search_client::{Api, Method, Request};
//!
//! let request = Request::new(Method::POST, Api::Search)
//!     .indices(["logs-2024", "logs-2025"])
//!     .doc_type("event");
//! assert_eq!(request.path(), "/logs-2024,logs-2025/event/_search");
//! ```

use std::fmt;

use bytes::Bytes;
use reqwest::Method;

use crate::error::ClientResult;
use crate::query::Query;
use crate::response::ResponseKind;

/// Delimiter between multiple index or type names in a path segment.
pub const NAME_DELIMITER: &str = ",";

/// API keyword appended to the request path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Api {
    /// `_search`
    Search,
    /// `_count`
    Count,
    /// `_bulk`
    Bulk,
    /// `_stats`
    Stats,
    /// `_status`
    Status,
    /// `_refresh`
    Refresh,
    /// `_optimize`
    Optimize,
    /// `_update`
    Update,
    /// `_mapping`
    Mapping,
    /// `_settings`
    Settings,
    /// `_aliases`
    Aliases,
    /// `_alias`
    Alias,
    /// `_search/scroll`
    Scroll,
    /// `_cluster/health`
    ClusterHealth,
    /// The index endpoint itself (create, delete, exists).
    Index,
    /// The document endpoint itself (get, index, delete).
    Document,
    /// Any other keyword, sent verbatim.
    Custom(String),
}

impl Api {
    /// Returns the literal keyword used in the path.
    pub fn keyword(&self) -> &str {
        match self {
            Api::Search => "_search",
            Api::Count => "_count",
            Api::Bulk => "_bulk",
            Api::Stats => "_stats",
            Api::Status => "_status",
            Api::Refresh => "_refresh",
            Api::Optimize => "_optimize",
            Api::Update => "_update",
            Api::Mapping => "_mapping",
            Api::Settings => "_settings",
            Api::Aliases => "_aliases",
            Api::Alias => "_alias",
            Api::Scroll => "_search/scroll",
            Api::ClusterHealth => "_cluster/health",
            Api::Index | Api::Document => "",
            Api::Custom(keyword) => keyword,
        }
    }

    /// Parses a literal keyword, falling back to [`Api::Custom`].
    ///
    /// [`Api::Index`] and [`Api::Document`] share the empty keyword; `""`
    /// parses as [`Api::Document`], so `Api::Index` does not round-trip.
    /// Callers addressing the index endpoint should name `Api::Index`
    /// directly.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "_search" => Api::Search,
            "_count" => Api::Count,
            "_bulk" => Api::Bulk,
            "_stats" => Api::Stats,
            "_status" => Api::Status,
            "_refresh" => Api::Refresh,
            "_optimize" => Api::Optimize,
            "_update" => Api::Update,
            "_mapping" => Api::Mapping,
            "_settings" => Api::Settings,
            "_aliases" => Api::Aliases,
            "_alias" => Api::Alias,
            "_search/scroll" => Api::Scroll,
            "_cluster/health" => Api::ClusterHealth,
            "" => Api::Document,
            other => Api::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Api::Index => f.write_str("<index>"),
            Api::Document => f.write_str("<document>"),
            other => f.write_str(other.keyword()),
        }
    }
}

/// The single payload a request carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Payload {
    /// No body.
    #[default]
    None,
    /// A query expression, serialized as JSON.
    Query(Query),
    /// Newline-delimited bulk commands, sent verbatim.
    Bulk(Bytes),
    /// Raw body bytes, sent verbatim.
    Body(Bytes),
}

impl Payload {
    /// Returns true if there is no payload.
    pub fn is_none(&self) -> bool {
        matches!(self, Payload::None)
    }

    /// Returns the `Content-Type` for this payload.
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            Payload::None => None,
            Payload::Query(_) | Payload::Body(_) => Some("application/json"),
            Payload::Bulk(_) => Some("application/x-ndjson"),
        }
    }
}

/// A single request to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// API keyword.
    pub api: Api,
    /// Target indices, joined in order.
    pub indices: Vec<String>,
    /// Target types, joined in order.
    pub types: Vec<String>,
    /// Document identifier.
    pub id: Option<String>,
    /// Extra query-string arguments, encoded in order.
    pub extra_args: Vec<(String, String)>,
    /// Request payload.
    pub payload: Payload,
}

impl Request {
    /// Creates a request with no targets and no payload.
    pub fn new(method: Method, api: Api) -> Self {
        Self {
            method,
            api,
            indices: Vec::new(),
            types: Vec::new(),
            id: None,
            extra_args: Vec::new(),
            payload: Payload::None,
        }
    }

    /// Adds a target index.
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.indices.push(index.into());
        self
    }

    /// Adds several target indices.
    pub fn indices<I, S>(mut self, indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indices.extend(indices.into_iter().map(Into::into));
        self
    }

    /// Adds a target type.
    pub fn doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.types.push(doc_type.into());
        self
    }

    /// Adds several target types.
    pub fn types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types.extend(types.into_iter().map(Into::into));
        self
    }

    /// Sets the document identifier.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Appends a query-string argument.
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_args.push((key.into(), value.into()));
        self
    }

    /// Appends several query-string arguments.
    pub fn args<I, K, V>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.extra_args
            .extend(args.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sets a query payload, replacing any other payload.
    pub fn query(mut self, query: Query) -> Self {
        self.payload = Payload::Query(query);
        self
    }

    /// Sets a bulk payload, replacing any other payload.
    pub fn bulk(mut self, data: impl Into<Bytes>) -> Self {
        self.payload = Payload::Bulk(data.into());
        self
    }

    /// Sets a raw body payload, replacing any other payload.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.payload = Payload::Body(body.into());
        self
    }

    /// Returns the path segments in order, skipping empty parts.
    pub fn path_segments(&self) -> Vec<String> {
        let mut segments = Vec::new();
        if !self.indices.is_empty() {
            segments.push(self.indices.join(NAME_DELIMITER));
        }
        if !self.types.is_empty() {
            segments.push(self.types.join(NAME_DELIMITER));
        }
        if let Some(ref id) = self.id {
            if !id.is_empty() {
                segments.push(id.clone());
            }
        }
        segments.extend(
            self.api
                .keyword()
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        );
        segments
    }

    /// Returns the request path, unencoded.
    pub fn path(&self) -> String {
        format!("/{}", self.path_segments().join("/"))
    }

    /// Returns the body bytes to send, if any.
    pub fn body_bytes(&self) -> ClientResult<Option<Bytes>> {
        match &self.payload {
            Payload::None => Ok(None),
            Payload::Query(query) => query.to_bytes().map(Some),
            Payload::Bulk(data) | Payload::Body(data) => Ok(Some(data.clone())),
        }
    }

    /// Returns the response variant this request decodes into.
    pub fn response_kind(&self) -> ResponseKind {
        ResponseKind::for_request(&self.api, &self.method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_path_single_index() {
        let request = Request::new(Method::POST, Api::Search).index("logs");
        assert_eq!(request.path(), "/logs/_search");
    }

    #[test]
    fn test_multiple_names_join_in_order() {
        let request = Request::new(Method::GET, Api::Search)
            .indices(["c", "a", "b"])
            .types(["z", "y"]);
        assert_eq!(request.path(), "/c,a,b/z,y/_search");
    }

    #[test]
    fn test_document_path_has_no_keyword() {
        let request = Request::new(Method::PUT, Api::Document)
            .index("logs")
            .doc_type("event")
            .id("42");
        assert_eq!(request.path(), "/logs/event/42");
    }

    #[test]
    fn test_update_path_places_id_before_keyword() {
        let request = Request::new(Method::POST, Api::Update)
            .index("logs")
            .doc_type("event")
            .id("42");
        assert_eq!(request.path(), "/logs/event/42/_update");
    }

    #[test]
    fn test_cluster_level_paths() {
        assert_eq!(Request::new(Method::POST, Api::Bulk).path(), "/_bulk");
        assert_eq!(
            Request::new(Method::POST, Api::Scroll).path_segments(),
            vec!["_search", "scroll"]
        );
        assert_eq!(
            Request::new(Method::GET, Api::ClusterHealth).path(),
            "/_cluster/health"
        );
        assert_eq!(Request::new(Method::GET, Api::Index).path(), "/");
    }

    #[test]
    fn test_empty_id_is_skipped() {
        let request = Request::new(Method::POST, Api::Document)
            .index("logs")
            .doc_type("event")
            .id("");
        assert_eq!(request.path(), "/logs/event");
    }

    #[test]
    fn test_payload_replaces_previous() {
        let request = Request::new(Method::POST, Api::Search)
            .query(Query::match_all())
            .body(Bytes::from_static(b"{}"));
        assert_eq!(request.payload, Payload::Body(Bytes::from_static(b"{}")));
        assert_eq!(request.payload.content_type(), Some("application/json"));
    }

    #[test]
    fn test_body_bytes() {
        let none = Request::new(Method::GET, Api::Stats);
        assert!(none.body_bytes().unwrap().is_none());

        let query = Request::new(Method::POST, Api::Search).query(Query::match_all());
        assert_eq!(
            query.body_bytes().unwrap().unwrap(),
            Bytes::from_static(br#"{"query":{"match_all":{}}}"#)
        );

        let bulk = Request::new(Method::POST, Api::Bulk).bulk(b"{}\n".to_vec());
        assert_eq!(bulk.payload.content_type(), Some("application/x-ndjson"));
        assert_eq!(bulk.body_bytes().unwrap().unwrap(), Bytes::from_static(b"{}\n"));
    }

    #[test]
    fn test_keyword_round_trip() {
        for api in [
            Api::Search,
            Api::Count,
            Api::Bulk,
            Api::Stats,
            Api::Status,
            Api::Scroll,
            Api::ClusterHealth,
        ] {
            assert_eq!(Api::from_keyword(api.keyword()), api);
        }
        assert_eq!(Api::from_keyword(Api::Document.keyword()), Api::Document);
        assert_eq!(Api::Index.keyword(), "");
        assert_eq!(Api::from_keyword(Api::Index.keyword()), Api::Document);
        assert_eq!(
            Api::from_keyword("_cat/indices"),
            Api::Custom("_cat/indices".to_string())
        );
    }

    #[test]
    fn test_args_keep_order() {
        let request = Request::new(Method::GET, Api::Search)
            .arg("size", "10")
            .args([("from", "20"), ("q", "user:kimchy")]);
        let keys: Vec<_> = request.extra_args.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["size", "from", "q"]);
    }
}
