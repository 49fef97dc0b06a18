//! Session error types

use crate::store::StoreError;
use crate::transport::TransportError;

use super::renewal::RenewalError;

/// Errors surfaced by guarded calls and session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The call itself failed; an authorization failure lands here only when
    /// no renewal was possible or the retry was rejected too
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The refresh exchange failed and the session was purged
    #[error("Session renewal failed: {0}")]
    RenewalFailed(RenewalError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    #[inline]
    pub fn is_authorization_denied(&self) -> bool {
        matches!(self, Self::Transport(TransportError::AuthorizationDenied))
    }

    /// The caller has to sign in again
    #[inline]
    pub fn is_session_lost(&self) -> bool {
        matches!(self, Self::RenewalFailed(_)) || self.is_authorization_denied()
    }
}

impl From<RenewalError> for SessionError {
    fn from(err: RenewalError) -> Self {
        Self::RenewalFailed(err)
    }
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;
