//! Client configuration.
//!
//! This module provides the configuration used to build a [`Client`](crate::Client),
//! supporting programmatic construction, environment variables and command-line
//! parsing for host applications that embed the client.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SEARCH_SCHEME` | http | URL scheme (`http` or `https`) |
//! | `SEARCH_HOST` | localhost | Engine host |
//! | `SEARCH_PORT` | 9200 | Engine port |
//! | `SEARCH_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `SEARCH_USERNAME` | - | Basic auth username |
//! | `SEARCH_PASSWORD` | - | Basic auth password |
//! | `SEARCH_BEARER_TOKEN` | - | Bearer token |
//! | `SEARCH_LOG_LEVEL` | info | Log level for host applications |
//!
//! # Example
//!
//! ```rust
//! use helios_search_client::ClientConfig;
//!
//! let config = ClientConfig {
//!     host: "search.internal".to_string(),
//!     port: 9201,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! assert_eq!(config.base_url(), "http://search.internal:9201");
//! ```

use std::borrow::Cow;
use std::time::Duration;

use clap::Parser;
use serde::{Deserialize, Serialize};

/// Authentication applied to every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientAuth {
    /// Basic username/password authentication.
    Basic {
        /// The username for basic auth.
        username: String,
        /// The password for basic auth.
        password: Option<String>,
    },
    /// Bearer token authentication.
    Bearer {
        /// The bearer token.
        token: String,
    },
}

/// Configuration for a search engine client.
#[derive(Debug, Clone, PartialEq, Eq, Parser, Serialize, Deserialize)]
#[command(name = "search-client")]
#[command(about = "Search engine client configuration")]
pub struct ClientConfig {
    /// URL scheme used to reach the engine.
    #[arg(long, env = "SEARCH_SCHEME", default_value = "http")]
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Engine host.
    #[arg(long, env = "SEARCH_HOST", default_value = "localhost")]
    #[serde(default = "default_host")]
    pub host: String,

    /// Engine port.
    #[arg(long, env = "SEARCH_PORT", default_value = "9200")]
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds.
    #[arg(long, env = "SEARCH_REQUEST_TIMEOUT", default_value = "30")]
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Username for basic authentication.
    #[arg(long, env = "SEARCH_USERNAME")]
    #[serde(default)]
    pub username: Option<String>,

    /// Password for basic authentication.
    #[arg(long, env = "SEARCH_PASSWORD")]
    #[serde(default)]
    pub password: Option<String>,

    /// Bearer token for token authentication.
    #[arg(long, env = "SEARCH_BEARER_TOKEN")]
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "SEARCH_LOG_LEVEL", default_value = "info")]
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_scheme() -> String {
    "http".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    9200
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            username: None,
            password: None,
            bearer_token: None,
            log_level: default_log_level(),
        }
    }
}

/// Formats a host for use in a URL authority, bracketing IPv6 literals.
pub(crate) fn url_host(host: &str) -> Cow<'_, str> {
    if host.contains(':') && !host.starts_with('[') {
        Cow::Owned(format!("[{}]", host))
    } else {
        Cow::Borrowed(host)
    }
}

impl ClientConfig {
    /// Creates a configuration from environment variables.
    ///
    /// Parses environment variables without requiring command line arguments,
    /// falling back to defaults when they cannot be parsed.
    pub fn from_env() -> Self {
        Self::try_parse_from(["search-client"]).unwrap_or_default()
    }

    /// Returns the base URL of the engine (`scheme://host:port`).
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, url_host(&self.host), self.port)
    }

    /// Returns the request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Returns a `tracing` filter directive scoping the log level to this
    /// crate, for host applications that install a subscriber.
    pub fn log_filter(&self) -> String {
        format!("helios_search_client={}", self.log_level)
    }

    /// Returns the configured authentication, if any.
    pub fn auth(&self) -> Option<ClientAuth> {
        if let Some(ref token) = self.bearer_token {
            return Some(ClientAuth::Bearer {
                token: token.clone(),
            });
        }
        self.username.as_ref().map(|username| ClientAuth::Basic {
            username: username.clone(),
            password: self.password.clone(),
        })
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.scheme != "http" && self.scheme != "https" {
            errors.push(format!("Unsupported scheme: {}", self.scheme));
        }

        if self.host.trim().is_empty() {
            errors.push("Host cannot be empty".to_string());
        }

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.password.is_some() && self.username.is_none() {
            errors.push("Password requires a username".to_string());
        }

        if self.bearer_token.is_some() && self.username.is_some() {
            errors.push("Basic and bearer authentication are mutually exclusive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
