//! The connection descriptor and HTTP round trip.

use std::fmt::Debug;

use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::{ClientAuth, ClientConfig, url_host};
use crate::error::{ClientError, ClientResult, ErrorBody, body_snippet};
use crate::request::Request;
use crate::response::{Response, ResponseKind, decode_json};

/// A connection to a search engine.
///
/// Holds the scheme, host, port, optional authentication and the HTTP
/// transport. It is immutable after construction; clones share the transport
/// and can be used concurrently.
///
/// # Example
///
/// ```no_run
/// use helios_search_client::{Client, Query};
///
/// # async fn run() -> helios_search_client::ClientResult<()> {
/// let client = Client::new("localhost", 9200);
/// let response = client
///     .search(&Query::match_all(), &["logs"], &[], &[])
///     .await?;
/// if let Some(total) = response.hits.total {
///     println!("{} hits", total.value);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    scheme: String,
    host: String,
    port: u16,
    auth: Option<ClientAuth>,
    http: reqwest::Client,
}

impl Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url())
            .field("auth", &self.auth.as_ref().map(auth_kind))
            .finish_non_exhaustive()
    }
}

fn auth_kind(auth: &ClientAuth) -> &'static str {
    match auth {
        ClientAuth::Basic { .. } => "basic",
        ClientAuth::Bearer { .. } => "bearer",
    }
}

impl Client {
    /// Creates a plain-HTTP client with a default transport.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::with_http_client(host, port, reqwest::Client::new())
    }

    /// Creates a plain-HTTP client using the given transport, which lets the
    /// caller set timeouts, proxies or TLS options.
    pub fn with_http_client(host: impl Into<String>, port: u16, http: reqwest::Client) -> Self {
        Self {
            scheme: "http".to_string(),
            host: host.into(),
            port,
            auth: None,
            http,
        }
    }

    /// Creates a client from configuration.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        config.validate().map_err(ClientError::Config)?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        tracing::debug!(
            base_url = %config.base_url(),
            timeout_secs = config.request_timeout,
            "Search client configured"
        );

        Ok(Self {
            scheme: config.scheme.clone(),
            host: config.host.clone(),
            port: config.port,
            auth: config.auth(),
            http,
        })
    }

    /// Returns the engine host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the engine port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the URL scheme.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns `scheme://host:port`, with IPv6 hosts in brackets.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, url_host(&self.host), self.port)
    }

    /// Builds the full URL for a request.
    ///
    /// Path segments are percent-encoded individually, so ids containing `/`
    /// stay within their segment. Extra arguments are encoded in order.
    pub fn url_for(&self, request: &Request) -> ClientResult<Url> {
        let base = self.base_url();
        let mut url = Url::parse(&base).map_err(|e| ClientError::InvalidUrl {
            message: format!("{}: {}", base, e),
        })?;

        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl {
                message: format!("{} cannot carry a path", base),
            })?
            .clear()
            .extend(request.path_segments());

        if !request.extra_args.is_empty() {
            url.query_pairs_mut().extend_pairs(
                request
                    .extra_args
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            );
        }

        Ok(url)
    }

    /// Sends a request and decodes the reply into the variant selected by its
    /// API keyword and method.
    pub async fn send(&self, request: &Request) -> ClientResult<Response> {
        let kind = request.response_kind();
        let (status, body) = self.dispatch(request).await?;
        check_response(kind, status, &body)?;
        Response::decode(kind, &body)
    }

    /// Sends a request and decodes the reply into `T`.
    pub async fn execute_as<T: DeserializeOwned>(&self, request: &Request) -> ClientResult<T> {
        let kind = request.response_kind();
        let (status, body) = self.dispatch(request).await?;
        check_response(kind, status, &body)?;
        decode_json(kind, &body)
    }

    /// Sends an existence probe: `true` on 200, `false` on 404.
    ///
    /// The request is expected to use `HEAD`; any other status is an error.
    pub async fn exists(&self, request: &Request) -> ClientResult<bool> {
        let (status, body) = self.dispatch(request).await?;
        match status {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            other => Err(ClientError::UnexpectedStatus {
                status: other.as_u16(),
                body: body_snippet(&body),
            }),
        }
    }

    /// Performs the HTTP round trip and returns the raw status and body.
    async fn dispatch(&self, request: &Request) -> ClientResult<(StatusCode, Bytes)> {
        let url = self.url_for(request)?;
        let body = request.body_bytes()?;

        tracing::debug!(
            method = %request.method,
            url = %url,
            api = %request.api,
            body_len = body.as_ref().map_or(0, Bytes::len),
            "Sending search engine request"
        );

        let mut builder = self.http.request(request.method.clone(), url);
        if let Some(content_type) = request.payload.content_type() {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }
        builder = match self.auth {
            Some(ClientAuth::Basic {
                ref username,
                ref password,
            }) => builder.basic_auth(username, password.as_ref()),
            Some(ClientAuth::Bearer { ref token }) => builder.bearer_auth(token),
            None => builder,
        };

        let response = builder.send().await.inspect_err(|e| {
            tracing::debug!(error = %e, "Search engine request failed");
        })?;
        let status = response.status();
        let bytes = response.bytes().await?;

        tracing::debug!(
            status = status.as_u16(),
            body_len = bytes.len(),
            "Received search engine response"
        );

        Ok((status, bytes))
    }
}

/// Turns engine-reported failures into errors.
///
/// An `error` member is an engine failure whatever the HTTP status. A 404
/// without one is a normal reply for document reads and writes
/// (`"found": false`); any other non-success status is unexpected.
fn check_response(kind: ResponseKind, status: StatusCode, body: &[u8]) -> ClientResult<()> {
    if let Some(error_body) = ErrorBody::parse(body) {
        let err = error_body.into_engine_error(status.as_u16());
        tracing::warn!(
            status = err.status,
            error_type = err.error_type.as_deref().unwrap_or("-"),
            message = %err.message,
            "Search engine reported an error"
        );
        return Err(err.into());
    }

    if status.is_success() {
        return Ok(());
    }

    let not_found_document = status == StatusCode::NOT_FOUND
        && matches!(kind, ResponseKind::Get | ResponseKind::Write);
    if not_found_document {
        return Ok(());
    }

    Err(ClientError::UnexpectedStatus {
        status: status.as_u16(),
        body: body_snippet(body),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Api;
    use reqwest::Method;

    #[test]
    fn test_url_for_search() {
        let client = Client::new("localhost", 9200);
        let request = Request::new(Method::POST, Api::Search)
            .indices(["logs", "metrics"])
            .doc_type("event")
            .arg("size", "10")
            .arg("q", "user:kimchy");
        let url = client.url_for(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9200/logs,metrics/event/_search?size=10&q=user%3Akimchy"
        );
    }

    #[test]
    fn test_url_for_encodes_segments() {
        let client = Client::new("es", 9200);
        let request = Request::new(Method::GET, Api::Document)
            .index("logs")
            .doc_type("event")
            .id("a/b c");
        let url = client.url_for(&request).unwrap();
        assert_eq!(url.path(), "/logs/event/a%2Fb%20c");
    }

    #[test]
    fn test_url_for_root_level() {
        let client = Client::new("es", 9201);
        let bulk = Request::new(Method::POST, Api::Bulk);
        assert_eq!(client.url_for(&bulk).unwrap().as_str(), "http://es:9201/_bulk");

        let health = Request::new(Method::GET, Api::ClusterHealth);
        assert_eq!(
            client.url_for(&health).unwrap().as_str(),
            "http://es:9201/_cluster/health"
        );
    }

    #[test]
    fn test_url_for_ipv6_host() {
        let client = Client::new("::1", 9200);
        let request = Request::new(Method::GET, Api::Stats).index("logs");
        assert_eq!(
            client.url_for(&request).unwrap().as_str(),
            "http://[::1]:9200/logs/_stats"
        );
        assert_eq!(client.host(), "::1");
    }

    #[test]
    fn test_url_for_invalid_host() {
        let client = Client::new("bad host", 9200);
        let request = Request::new(Method::GET, Api::Stats);
        assert!(matches!(
            client.url_for(&request),
            Err(ClientError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_from_config() {
        let config = ClientConfig {
            scheme: "https".to_string(),
            host: "search.internal".to_string(),
            port: 9243,
            bearer_token: Some("token".to_string()),
            ..Default::default()
        };
        let client = Client::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "https://search.internal:9243");
        assert_eq!(client.scheme(), "https");

        let debug = format!("{:?}", client);
        assert!(debug.contains("bearer"));
        assert!(!debug.contains("token\""));
    }

    #[test]
    fn test_from_invalid_config() {
        let config = ClientConfig {
            port: 0,
            ..Default::default()
        };
        assert!(matches!(
            Client::from_config(&config),
            Err(ClientError::Config(_))
        ));
    }

    #[test]
    fn test_check_response_engine_error_in_success_body() {
        let err = check_response(
            ResponseKind::Search,
            StatusCode::OK,
            br#"{"error":"SearchPhaseExecutionException[...]","status":400}"#,
        )
        .unwrap_err();
        match err {
            ClientError::Engine(e) => assert_eq!(e.status, 400),
            other => panic!("expected engine error, got {:?}", other),
        }
    }

    #[test]
    fn test_check_response_not_found_document() {
        let body = br#"{"_index":"logs","_id":"1","found":false}"#;
        assert!(check_response(ResponseKind::Get, StatusCode::NOT_FOUND, body).is_ok());
        assert!(check_response(ResponseKind::Write, StatusCode::NOT_FOUND, body).is_ok());
        assert!(matches!(
            check_response(ResponseKind::Search, StatusCode::NOT_FOUND, body),
            Err(ClientError::UnexpectedStatus { status: 404, .. })
        ));
    }

    #[test]
    fn test_check_response_unexpected_status() {
        let err = check_response(
            ResponseKind::Search,
            StatusCode::BAD_GATEWAY,
            b"<html>bad gateway</html>",
        )
        .unwrap_err();
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<Client>();
    }
}
