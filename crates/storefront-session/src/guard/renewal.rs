//! Refresh-token exchange
//!
//! At most one exchange runs per session. The exchange is spawned onto the
//! runtime so it completes even if the caller that started it is dropped, and
//! every concurrent caller awaits the same [`Flight`].

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};

/// Why a refresh exchange failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenewalError {
    /// The server refused the refresh token (invalid or expired)
    #[error("Refresh token rejected")]
    Rejected,

    /// The renewal endpoint could not be reached or answered nonsense
    #[error("Renewal transport failed: {0}")]
    Transport(String),

    /// The renewal task ended without an outcome
    #[error("Renewal aborted")]
    Aborted,
}

/// Exchanges a refresh token for a new access token
#[async_trait]
pub trait TokenRenewer: Send + Sync {
    async fn renew(&self, refresh_token: &str) -> Result<String, RenewalError>;
}

/// Outcome of one exchange, shared by every waiter
pub(crate) type Flight = Shared<BoxFuture<'static, Result<String, RenewalError>>>;

/// Run `exchange` on the runtime and wrap its handle into a [`Flight`]
pub(crate) fn launch<F>(exchange: F) -> Flight
where
    F: std::future::Future<Output = Result<String, RenewalError>> + Send + 'static,
{
    let handle = tokio::spawn(exchange);
    async move {
        match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Renewal task failed");
                Err(RenewalError::Aborted)
            }
        }
    }
    .boxed()
    .shared()
}
