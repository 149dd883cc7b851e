//! Engine operations.
//!
//! Each method builds one [`Request`], performs a single round trip through
//! [`Client::execute_as`] or [`Client::exists`] and returns the matching
//! response record. Index and type lists are joined in the order given;
//! `args` become query-string arguments in the order given.

use std::time::Duration;

use reqwest::Method;
use serde_json::{Value, json};

use crate::client::Client;
use crate::document::{Document, encode_bulk};
use crate::error::{ClientError, ClientResult};
use crate::query::Query;
use crate::request::{Api, Request};
use crate::response::{
    AcknowledgedResponse, BulkResponse, ClusterHealthResponse, CountResponse, GetResponse,
    SearchResponse, StatsResponse, StatusResponse, WriteResponse,
};

/// Query-string arguments, encoded in order.
pub type Args<'a> = &'a [(&'a str, &'a str)];

/// Formats a keep-alive duration in engine time units.
///
/// Whole minutes are written as `m`, whole seconds as `s`, anything else as
/// `ms`. Sub-millisecond remainders are dropped, except that a non-zero
/// duration never formats below `1ms`.
pub fn format_keep_alive(keep_alive: Duration) -> String {
    let mut millis = keep_alive.as_millis();
    if millis == 0 && !keep_alive.is_zero() {
        millis = 1;
    }
    if millis > 0 && millis % 60_000 == 0 {
        format!("{}m", millis / 60_000)
    } else if millis % 1_000 == 0 {
        format!("{}s", millis / 1_000)
    } else {
        format!("{}ms", millis)
    }
}

fn to_bytes(what: &'static str, value: &Value) -> ClientResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| ClientError::encode(what, e))
}

fn require<'a>(value: Option<&'a str>, what: &str) -> ClientResult<&'a str> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ClientError::InvalidRequest(format!("document has no {}", what))),
    }
}

fn document_request(method: Method, api: Api, document: &Document, args: Args<'_>) -> ClientResult<Request> {
    let index = require(document.index.as_deref(), "index")?;
    let mut request = Request::new(method, api).index(index).args(args.iter().copied());
    if let Some(ref doc_type) = document.doc_type {
        request = request.doc_type(doc_type.as_str());
    }
    if let Some(ref id) = document.id {
        request = request.id(id.as_str());
    }
    Ok(request)
}

fn alias_actions(action: &str, alias: &str, indices: &[&str]) -> Value {
    let actions: Vec<Value> = indices
        .iter()
        .map(|index| json!({ action: { "index": index, "alias": alias } }))
        .collect();
    json!({ "actions": actions })
}

impl Client {
    /// Runs a query with `POST _search`.
    pub async fn search(
        &self,
        query: &Query,
        indices: &[&str],
        types: &[&str],
        args: Args<'_>,
    ) -> ClientResult<SearchResponse> {
        self.query(query, indices, types, Method::POST, args).await
    }

    /// Runs a query with `_search` using the given HTTP method.
    pub async fn query(
        &self,
        query: &Query,
        indices: &[&str],
        types: &[&str],
        method: Method,
        args: Args<'_>,
    ) -> ClientResult<SearchResponse> {
        let request = Request::new(method, Api::Search)
            .indices(indices.iter().copied())
            .types(types.iter().copied())
            .args(args.iter().copied())
            .query(query.clone());
        self.execute_as(&request).await
    }

    /// Counts the documents matching a query.
    pub async fn count(
        &self,
        query: &Query,
        indices: &[&str],
        types: &[&str],
        args: Args<'_>,
    ) -> ClientResult<CountResponse> {
        let request = Request::new(Method::POST, Api::Count)
            .indices(indices.iter().copied())
            .types(types.iter().copied())
            .args(args.iter().copied())
            .query(query.clone());
        self.execute_as(&request).await
    }

    /// Opens a scan-type scroll. The reply carries a `_scroll_id` and, on
    /// engines that honour `search_type=scan`, no hits.
    pub async fn scan(
        &self,
        query: &Query,
        indices: &[&str],
        types: &[&str],
        keep_alive: Duration,
        size: u64,
    ) -> ClientResult<SearchResponse> {
        let request = Request::new(Method::POST, Api::Search)
            .indices(indices.iter().copied())
            .types(types.iter().copied())
            .arg("search_type", "scan")
            .arg("scroll", format_keep_alive(keep_alive))
            .arg("size", size.to_string())
            .query(query.clone());
        self.execute_as(&request).await
    }

    /// Fetches the next page of a scroll and extends it by `keep_alive`.
    pub async fn scroll(&self, scroll_id: &str, keep_alive: Duration) -> ClientResult<SearchResponse> {
        if scroll_id.is_empty() {
            return Err(ClientError::InvalidRequest("scroll id is empty".to_string()));
        }
        let body = to_bytes("scroll id", &json!({ "scroll_id": scroll_id }))?;
        let request = Request::new(Method::POST, Api::Scroll)
            .arg("scroll", format_keep_alive(keep_alive))
            .body(body);
        self.execute_as(&request).await
    }

    /// Releases a scroll context before its keep-alive expires.
    pub async fn clear_scroll(&self, scroll_id: &str) -> ClientResult<Value> {
        let body = to_bytes("scroll id", &json!({ "scroll_id": [scroll_id] }))?;
        let request = Request::new(Method::DELETE, Api::Scroll).body(body);
        self.execute_as(&request).await
    }

    /// Sends documents in one `_bulk` request.
    ///
    /// Per-item failures are reported in the reply, not as an error.
    pub async fn bulk_send(&self, documents: &[Document]) -> ClientResult<BulkResponse> {
        let request = Request::new(Method::POST, Api::Bulk).bulk(encode_bulk(documents)?);
        let response: BulkResponse = self.execute_as(&request).await?;

        if response.errors {
            tracing::warn!(
                items = response.items.len(),
                failed = response.failed_items().count(),
                "Bulk request completed with item failures"
            );
        }
        Ok(response)
    }

    /// Indexes a document: `PUT` with an id, `POST` without.
    pub async fn index(&self, document: &Document, args: Args<'_>) -> ClientResult<WriteResponse> {
        let fields = document
            .fields
            .as_ref()
            .ok_or_else(|| ClientError::InvalidRequest("document has no fields".to_string()))?;
        let method = if document.id.as_deref().is_some_and(|id| !id.is_empty()) {
            Method::PUT
        } else {
            Method::POST
        };
        let request =
            document_request(method, Api::Document, document, args)?.body(to_bytes("document", fields)?);
        self.execute_as(&request).await
    }

    /// Fetches a document by id. A missing document is `found: false`, not an
    /// error.
    pub async fn get(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        args: Args<'_>,
    ) -> ClientResult<GetResponse> {
        let mut request = Request::new(Method::GET, Api::Document).index(index);
        if !doc_type.is_empty() {
            request = request.doc_type(doc_type);
        }
        let request = request.id(id).args(args.iter().copied());
        self.execute_as(&request).await
    }

    /// Deletes a document by id.
    pub async fn delete(&self, document: &Document, args: Args<'_>) -> ClientResult<WriteResponse> {
        require(document.id.as_deref(), "id")?;
        let request = document_request(Method::DELETE, Api::Document, document, args)?;
        self.execute_as(&request).await
    }

    /// Applies a partial update (`doc` or `script` body) to a document.
    pub async fn update(
        &self,
        document: &Document,
        body: &Value,
        args: Args<'_>,
    ) -> ClientResult<WriteResponse> {
        require(document.id.as_deref(), "id")?;
        let request = document_request(Method::POST, Api::Update, document, args)?
            .body(to_bytes("update", body)?);
        self.execute_as(&request).await
    }

    /// Creates an index, optionally with settings and mappings.
    pub async fn create_index(
        &self,
        name: &str,
        settings: Option<&Value>,
    ) -> ClientResult<AcknowledgedResponse> {
        let mut request = Request::new(Method::PUT, Api::Index).index(name);
        if let Some(settings) = settings {
            request = request.body(to_bytes("index settings", settings)?);
        }
        self.execute_as(&request).await
    }

    /// Deletes an index.
    pub async fn delete_index(&self, name: &str) -> ClientResult<AcknowledgedResponse> {
        let request = Request::new(Method::DELETE, Api::Index).index(name);
        self.execute_as(&request).await
    }

    /// Makes recent writes to an index visible to search.
    pub async fn refresh_index(&self, name: &str) -> ClientResult<Value> {
        let request = Request::new(Method::POST, Api::Refresh).index(name);
        self.execute_as(&request).await
    }

    /// Merges index segments.
    pub async fn optimize(&self, indices: &[&str], args: Args<'_>) -> ClientResult<Value> {
        let request = Request::new(Method::POST, Api::Optimize)
            .indices(indices.iter().copied())
            .args(args.iter().copied());
        self.execute_as(&request).await
    }

    /// Updates the dynamic settings of an index.
    pub async fn update_index_settings(
        &self,
        name: &str,
        settings: &Value,
    ) -> ClientResult<AcknowledgedResponse> {
        let request = Request::new(Method::PUT, Api::Settings)
            .index(name)
            .body(to_bytes("index settings", settings)?);
        self.execute_as(&request).await
    }

    /// Fetches statistics for the given indices, or all when empty.
    pub async fn stats(&self, indices: &[&str], args: Args<'_>) -> ClientResult<StatsResponse> {
        let request = Request::new(Method::GET, Api::Stats)
            .indices(indices.iter().copied())
            .args(args.iter().copied());
        self.execute_as(&request).await
    }

    /// Fetches the status of the given indices, or all when empty.
    pub async fn index_status(&self, indices: &[&str]) -> ClientResult<StatusResponse> {
        let request = Request::new(Method::GET, Api::Status).indices(indices.iter().copied());
        self.execute_as(&request).await
    }

    /// Fetches mappings.
    pub async fn get_mapping(&self, types: &[&str], indices: &[&str]) -> ClientResult<Value> {
        let request = Request::new(Method::GET, Api::Mapping)
            .indices(indices.iter().copied())
            .types(types.iter().copied());
        self.execute_as(&request).await
    }

    /// Puts a type mapping on the given indices. The mapping is sent
    /// verbatim.
    pub async fn put_mapping(
        &self,
        doc_type: &str,
        mapping: &Value,
        indices: &[&str],
    ) -> ClientResult<AcknowledgedResponse> {
        let mut request = Request::new(Method::PUT, Api::Mapping).indices(indices.iter().copied());
        if !doc_type.is_empty() {
            request = request.doc_type(doc_type);
        }
        let request = request.body(to_bytes("mapping", mapping)?);
        self.execute_as(&request).await
    }

    /// Returns true if every given index exists.
    pub async fn indices_exist(&self, indices: &[&str]) -> ClientResult<bool> {
        if indices.is_empty() {
            return Err(ClientError::InvalidRequest(
                "indices_exist requires at least one index".to_string(),
            ));
        }
        let request = Request::new(Method::HEAD, Api::Index).indices(indices.iter().copied());
        self.exists(&request).await
    }

    /// Points an alias at the given indices.
    pub async fn add_alias(&self, alias: &str, indices: &[&str]) -> ClientResult<AcknowledgedResponse> {
        self.update_aliases("add", alias, indices).await
    }

    /// Removes an alias from the given indices.
    pub async fn remove_alias(
        &self,
        alias: &str,
        indices: &[&str],
    ) -> ClientResult<AcknowledgedResponse> {
        self.update_aliases("remove", alias, indices).await
    }

    async fn update_aliases(
        &self,
        action: &str,
        alias: &str,
        indices: &[&str],
    ) -> ClientResult<AcknowledgedResponse> {
        if indices.is_empty() {
            return Err(ClientError::InvalidRequest(format!(
                "alias {} requires at least one index",
                action
            )));
        }
        let body = to_bytes("alias actions", &alias_actions(action, alias, indices))?;
        let request = Request::new(Method::POST, Api::Aliases).body(body);
        self.execute_as(&request).await
    }

    /// Fetches the aliases of the given indices, or all when empty.
    pub async fn get_aliases(&self, indices: &[&str]) -> ClientResult<Value> {
        let request = Request::new(Method::GET, Api::Alias).indices(indices.iter().copied());
        self.execute_as(&request).await
    }

    /// Returns true if the alias exists.
    pub async fn alias_exists(&self, alias: &str) -> ClientResult<bool> {
        let request = Request::new(Method::HEAD, Api::Custom(format!("_alias/{}", alias)));
        self.exists(&request).await
    }

    /// Fetches cluster health.
    pub async fn cluster_health(&self) -> ClientResult<ClusterHealthResponse> {
        let request = Request::new(Method::GET, Api::ClusterHealth);
        self.execute_as(&request).await
    }
}
