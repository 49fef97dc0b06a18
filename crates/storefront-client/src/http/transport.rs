//! `reqwest`-backed transport

use async_trait::async_trait;
use reqwest::StatusCode;
use storefront_common::{ApiConfig, AppError, ErrorResponse};
use storefront_session::{ApiRequest, ApiResponse, Method, Transport, TransportError};
use tracing::instrument;

/// Sends API requests over HTTP
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpTransport {
    /// Build a transport with the configured timeout
    pub fn new(config: &ApiConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("storefront/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Config(format!("HTTP client: {e}")))?;

        Ok(Self::with_client(client, config))
    }

    /// Use an existing `reqwest` client
    pub fn with_client(client: reqwest::Client, config: &ApiConfig) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn transport_error(err: &reqwest::Error) -> TransportError {
    if err.is_decode() || err.is_body() {
        TransportError::Codec(err.to_string())
    } else {
        TransportError::Network(err.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip_all, fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut builder = self
            .client
            .request(http_method(request.method), self.config.url(&request.path));

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| transport_error(&e))?;
        let status = response.status();
        let body = response.bytes().await.map_err(|e| transport_error(&e))?;

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "Response received");

        if status == StatusCode::UNAUTHORIZED {
            return Err(TransportError::AuthorizationDenied);
        }
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: ErrorResponse::message_from_body(&body),
            });
        }

        Ok(ApiResponse::new(status.as_u16(), body.to_vec()))
    }
}
