//! Helios Search Client
//!
//! A typed HTTP/JSON client for Elasticsearch-compatible search engines. It
//! describes the request envelope sent to the engine and decodes the reply into
//! a typed record per API: search hits, bulk acknowledgements, per-index
//! statistics, index status and cluster health.
//!
//! # Features
//!
//! - **Typed responses**: each API keyword decodes into its own record, never a
//!   catch-all union
//! - **Bulk**: newline-delimited bulk encoding with per-item results
//! - **Scrolling**: scan and scroll with keep-alive durations
//! - **Index administration**: create, delete, refresh, settings, mappings and
//!   aliases
//! - **Configuration**: environment variables, command line or code
//!
//! Every operation is a single stateless round trip. There is no retry policy
//! and no cluster topology awareness; a [`Client`] talks to one host and port.
//!
//! # Architecture
//!
//! - [`config`] - Client configuration
//! - [`client`] - The connection descriptor and HTTP round trip
//! - [`request`] - The request envelope and path layout
//! - [`query`] - Query payloads
//! - [`document`] - Documents and bulk encoding
//! - [`operations`] - One method per engine operation
//! - [`response`] - Response records
//! - [`error`] - Error types for all operations
//!
//! # Quick Start
//!
//! ```no_run
//! use helios_search_client::{BulkCommand, Client, Document, Query};
//! use serde_json::json;
//!
//! # async fn run() -> helios_search_client::ClientResult<()> {
//! let client = Client::new("localhost", 9200);
//!
//! let docs = vec![
//!     Document::new(BulkCommand::Index)
//!         .with_index("logs")
//!         .with_id("1")
//!         .with_fields(json!({"message": "started"})),
//!     Document::new(BulkCommand::Delete)
//!         .with_index("logs")
//!         .with_id("0"),
//! ];
//! let bulk = client.bulk_send(&docs).await?;
//! for (position, item) in bulk.failed_items() {
//!     eprintln!("item {} failed with status {}", position, item.result.status);
//! }
//!
//! client.refresh_index("logs").await?;
//!
//! let query = Query::new(&json!({"query": {"term": {"message": "started"}}}))?;
//! let response = client.search(&query, &["logs"], &[], &[("size", "10")]).await?;
//! for hit in &response.hits.hits {
//!     println!("{} {:?}", hit.id, hit.score);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Sending raw requests
//!
//! Operations not covered by a dedicated method can be sent as a [`Request`]:
//!
//! ```no_run
//! use helios_search_client::{Api, Client, Method, Request, Response};
//!
//! # async fn run() -> helios_search_client::ClientResult<()> {
//! let client = Client::new("localhost", 9200);
//! let request = Request::new(Method::GET, Api::Custom("_cat/indices".to_string()))
//!     .arg("format", "json");
//! if let Response::Raw(indices) = client.send(&request).await? {
//!     println!("{}", indices);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod operations;
pub mod query;
pub mod request;
pub mod response;

pub use client::Client;
pub use config::{ClientAuth, ClientConfig};
pub use document::{BulkCommand, Document, encode_bulk};
pub use error::{ClientError, ClientResult, EngineError, EngineErrorDetail};
pub use operations::format_keep_alive;
pub use query::Query;
pub use request::{Api, Payload, Request};
pub use response::{Response, ResponseKind};

// Re-export the HTTP method type used by requests
pub use reqwest::Method;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
