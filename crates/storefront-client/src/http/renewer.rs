//! Refresh-token exchange over the API

use std::sync::Arc;

use async_trait::async_trait;
use storefront_core::{RefreshRequest, RefreshResponse};
use storefront_session::{ApiRequest, RenewalError, TokenRenewer, Transport, TransportError};

/// Renewal endpoint path
pub const REFRESH_PATH: &str = "/auth/token/refresh/";

/// Posts `{ "refresh": .. }` and reads `{ "access": .. }`
///
/// Sends through the bare transport: the exchange must never itself be
/// guarded, or a rejected refresh token would trigger another renewal.
pub struct HttpTokenRenewer {
    transport: Arc<dyn Transport>,
}

impl HttpTokenRenewer {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl TokenRenewer for HttpTokenRenewer {
    async fn renew(&self, refresh_token: &str) -> Result<String, RenewalError> {
        let request = ApiRequest::post(REFRESH_PATH)
            .json(&RefreshRequest {
                refresh: refresh_token.to_string(),
            })
            .map_err(|e| RenewalError::Transport(e.to_string()))?;

        match self.transport.send(request).await {
            Ok(response) => response
                .json::<RefreshResponse>()
                .map(|body| body.access)
                .map_err(|e| RenewalError::Transport(e.to_string())),
            Err(TransportError::AuthorizationDenied | TransportError::Status { status: 400, .. }) => {
                Err(RenewalError::Rejected)
            }
            Err(e) => Err(RenewalError::Transport(e.to_string())),
        }
    }
}
