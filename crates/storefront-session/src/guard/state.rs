//! Session state machine

use std::fmt;

/// Lifecycle state of one logical session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    /// No refresh token
    #[default]
    Anonymous,
    /// Refresh token and access token both usable
    Authenticated,
    /// Refresh token usable, access token missing or rejected
    AccessExpired,
    /// The refresh exchange failed; the session is about to be purged
    RefreshFailed,
}

/// Something that happened to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEvent {
    /// Login or registration produced a fresh token pair
    LoggedIn,
    /// A guarded call was rejected with an authorization failure
    AccessDenied,
    /// The refresh exchange produced a new access token
    Renewed,
    /// The refresh exchange failed
    RenewalFailed,
    /// All credentials were cleared after a failed renewal
    Purged,
    /// Explicit logout
    LoggedOut,
    /// The refresh token disappeared from the store
    CredentialsLost,
}

impl SessionState {
    /// Transition function; events that do not apply leave the state unchanged
    #[must_use]
    pub fn on(self, event: SessionEvent) -> Self {
        use SessionEvent as E;
        use SessionState as S;

        match (self, event) {
            (_, E::LoggedOut | E::CredentialsLost) => S::Anonymous,
            (_, E::LoggedIn) => S::Authenticated,
            (S::Authenticated | S::AccessExpired, E::AccessDenied) => S::AccessExpired,
            (S::Authenticated | S::AccessExpired, E::Renewed) => S::Authenticated,
            (S::Authenticated | S::AccessExpired, E::RenewalFailed) => S::RefreshFailed,
            (S::RefreshFailed, E::Purged) => S::Anonymous,
            (state, _) => state,
        }
    }

    /// A refresh token is held, whether or not the access token is usable
    #[inline]
    #[must_use]
    pub fn has_session(self) -> bool {
        matches!(self, Self::Authenticated | Self::AccessExpired)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Authenticated => "authenticated",
            Self::AccessExpired => "access_expired",
            Self::RefreshFailed => "refresh_failed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
