//! Transport boundary
//!
//! The session layer sends every request through an injected [`Transport`].
//! Implementations must report an authorization failure (HTTP 401) as
//! [`TransportError::AuthorizationDenied`] and nothing else, since that is the
//! only failure the guard recovers from.

use std::fmt;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outgoing API call
#[derive(Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base URL
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Bearer credential, attached by the session guard
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Append a query-string pair
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append several query-string pairs
    pub fn query_pairs<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Attach a JSON body
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, TransportError> {
        let value =
            serde_json::to_value(body).map_err(|e| TransportError::Codec(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Replace the bearer credential
    pub fn bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("has_body", &self.body.is_some())
            .field("bearer", &self.bearer.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// A successful (2xx) API response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Build a response with a JSON body
    pub fn json_body<T: Serialize + ?Sized>(status: u16, body: &T) -> Self {
        Self::new(status, serde_json::to_vec(body).unwrap_or_default())
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        serde_json::from_slice(&self.body).map_err(|e| TransportError::Codec(e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Transport failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The credential was rejected (HTTP 401)
    #[error("Authorization denied")]
    AuthorizationDenied,

    /// The server answered with another non-success status
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// The server could not be reached or did not answer in time
    #[error("Network error: {0}")]
    Network(String),

    /// A body could not be encoded or decoded
    #[error("Codec error: {0}")]
    Codec(String),
}

impl TransportError {
    #[inline]
    pub fn is_authorization_denied(&self) -> bool {
        matches!(self, Self::AuthorizationDenied)
    }

    /// HTTP status, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AuthorizationDenied => Some(401),
            Self::Status { status, .. } => Some(*status),
            Self::Network(_) | Self::Codec(_) => None,
        }
    }
}

/// Sends API requests
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request; only 2xx responses are returned as `Ok`
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}
