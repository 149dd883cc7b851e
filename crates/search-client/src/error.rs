//! Error types for the search client.
//!
//! Errors fall into two classes:
//!
//! - **Transport failures**: the HTTP call never completed (connection refused,
//!   timeout, malformed HTTP). These surface as [`ClientError::Transport`] and
//!   are never retried.
//! - **Engine failures**: the engine answered at the HTTP layer but reported an
//!   error in the JSON body. These surface as [`ClientError::Engine`].
//!
//! Partial failures inside a bulk response are not errors: every bulk item
//! carries its own status and error (see [`crate::response::BulkItemResult`]).

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::response::ResponseKind;

/// Result alias used throughout the crate.
pub type ClientResult<T> = Result<T, ClientError>;

/// Maximum number of body bytes kept in error values.
const BODY_SNIPPET_LIMIT: usize = 512;

/// The error type for all client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The HTTP call failed before a response was received.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request could not be turned into a valid URL.
    #[error("invalid url: {message}")]
    InvalidUrl { message: String },

    /// A query or document could not be serialized.
    #[error("failed to encode {what}: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("failed to decode {kind} response: {message}")]
    Decode {
        kind: ResponseKind,
        message: String,
        body: String,
    },

    /// The engine reported an error in its response body.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The engine returned a non-success status without a decodable error body.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The request cannot be sent as built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The client configuration is invalid.
    #[error("invalid configuration: {}", .0.join("; "))]
    Config(Vec<String>),
}

impl ClientError {
    /// Returns true when the HTTP call itself failed.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }

    /// Returns the HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Engine(e) => Some(e.status),
            ClientError::UnexpectedStatus { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub(crate) fn decode(kind: ResponseKind, err: impl fmt::Display, body: &[u8]) -> Self {
        ClientError::Decode {
            kind,
            message: err.to_string(),
            body: body_snippet(body),
        }
    }

    pub(crate) fn encode(what: &'static str, source: serde_json::Error) -> Self {
        ClientError::Encode { what, source }
    }
}

/// An error reported by the engine in a response body.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("[{status}] {message}")]
pub struct EngineError {
    /// HTTP status reported by the engine.
    pub status: u16,
    /// Human-readable reason.
    pub message: String,
    /// Engine error type (e.g. `index_not_found_exception`), when structured.
    pub error_type: Option<String>,
}

impl EngineError {
    /// Builds an engine error from a decoded error detail and status.
    pub fn new(status: u16, detail: &EngineErrorDetail) -> Self {
        Self {
            status,
            message: detail.reason().to_string(),
            error_type: detail.error_type().map(str::to_string),
        }
    }
}

/// The `error` member of an engine reply.
///
/// Older engines return a bare message string; newer ones return an object
/// with `type`, `reason` and `root_cause`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EngineErrorDetail {
    Message(String),
    Structured(StructuredError),
}

impl EngineErrorDetail {
    /// Returns the human-readable reason.
    pub fn reason(&self) -> &str {
        match self {
            EngineErrorDetail::Message(m) => m,
            EngineErrorDetail::Structured(s) => {
                s.reason.as_deref().unwrap_or(s.error_type.as_str())
            }
        }
    }

    /// Returns the engine error type when the error is structured.
    pub fn error_type(&self) -> Option<&str> {
        match self {
            EngineErrorDetail::Message(_) => None,
            EngineErrorDetail::Structured(s) => Some(&s.error_type),
        }
    }
}

impl fmt::Display for EngineErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error_type() {
            Some(t) => write!(f, "{}: {}", t, self.reason()),
            None => f.write_str(self.reason()),
        }
    }
}

/// Structured engine error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredError {
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub root_cause: Vec<StructuredError>,
}

/// Top-level error body: `{"error": ..., "status": ...}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: EngineErrorDetail,
    #[serde(default)]
    pub status: Option<u16>,
}

impl ErrorBody {
    /// Parses an error body, returning `None` if the body carries no `error`.
    pub(crate) fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice::<ErrorBody>(body).ok()
    }

    pub(crate) fn into_engine_error(self, http_status: u16) -> EngineError {
        EngineError::new(self.status.unwrap_or(http_status), &self.error)
    }
}

/// Truncates a body for inclusion in error values.
pub(crate) fn body_snippet(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.len() <= BODY_SNIPPET_LIMIT {
        return text.into_owned();
    }
    let mut end = BODY_SNIPPET_LIMIT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
