//! Bearer-token guard
//!
//! [`SessionTokenGuard`] is the single owner of the session credentials. It
//! attaches the access token to outgoing calls, renews it when a call is
//! rejected, and purges the session when renewal fails. Other components can
//! read the session through it but only the guard writes the store.
//!
//! Renewal is single-flight: whichever caller first finds the access token
//! dead starts the exchange, and every caller that fails while it runs awaits
//! the same outcome.

mod error;
mod keeper;
mod renewal;
mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{SessionError, SessionResult};
pub use keeper::SessionKeeper;
pub use renewal::{RenewalError, TokenRenewer};
pub use state::{SessionEvent, SessionState};

use std::sync::Arc;

use parking_lot::Mutex;
use storefront_common::{SessionConfig, TokenInspector};
use storefront_core::UserInfo;
use tokio::sync::watch;
use tracing::instrument;

use crate::store::{CredentialStore, StoreChanges, StoreResult};
use crate::transport::{ApiRequest, ApiResponse, Transport, TransportError};
use renewal::Flight;

/// What prompted a renewal
#[derive(Debug, Clone, Copy)]
enum Trigger<'a> {
    /// A call carrying this token was rejected, or the token is known to be expired
    Stale(Option<&'a str>),
    /// Renew whatever the current access token is
    Forced,
}

#[derive(Default)]
struct RenewalSlot {
    flight: Option<Flight>,
    /// Bumped whenever the session is replaced or dropped; a renewal started
    /// under an older generation is not installed
    generation: u64,
}

impl RenewalSlot {
    fn reset(&mut self) {
        self.generation += 1;
        self.flight = None;
    }
}

struct GuardInner {
    transport: Arc<dyn Transport>,
    renewer: Arc<dyn TokenRenewer>,
    store: Box<dyn CredentialStore>,
    inspector: TokenInspector,
    state: watch::Sender<SessionState>,
    renewal: Mutex<RenewalSlot>,
}

impl GuardInner {
    fn apply(&self, event: SessionEvent) -> SessionState {
        let mut current = SessionState::Anonymous;
        self.state.send_if_modified(|state| {
            let next = state.on(event);
            current = next;
            Self::replace(state, next)
        });
        current
    }

    fn set_state(&self, next: SessionState) {
        self.state.send_if_modified(|state| Self::replace(state, next));
    }

    fn replace(state: &mut SessionState, next: SessionState) -> bool {
        if *state == next {
            return false;
        }
        tracing::debug!(from = %state, to = %next, "Session state changed");
        *state = next;
        true
    }

    /// Drop every credential; the caller holds the renewal lock
    fn purge(&self, slot: &mut RenewalSlot) -> StoreResult<()> {
        slot.reset();
        self.store.clear_all()
    }

    fn complete_renewal(
        &self,
        generation: u64,
        outcome: Result<String, RenewalError>,
    ) -> Result<String, RenewalError> {
        let mut slot = self.renewal.lock();
        if slot.generation != generation {
            tracing::debug!("Session replaced during renewal, outcome not installed");
            return outcome;
        }
        slot.flight = None;

        match &outcome {
            Ok(access) => {
                if let Err(e) = self.store.set_access(access) {
                    tracing::warn!(error = %e, "Failed to store renewed access token");
                }
                self.apply(SessionEvent::Renewed);
                tracing::info!("Access token renewed");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token renewal failed, purging session");
                self.apply(SessionEvent::RenewalFailed);
                if let Err(e) = self.purge(&mut slot) {
                    tracing::warn!(error = %e, "Failed to clear credentials");
                }
                self.apply(SessionEvent::Purged);
            }
        }
        outcome
    }

    /// Clear what is left of a session whose refresh token is gone
    fn drop_lost_session(&self, slot: &mut RenewalSlot) {
        if self.state.borrow().has_session() {
            tracing::warn!("Refresh token gone, dropping session");
        }
        if let Err(e) = self.purge(slot) {
            tracing::warn!(error = %e, "Failed to clear credentials");
        }
        self.apply(SessionEvent::CredentialsLost);
    }

    /// Forget a flight that ended without an outcome
    fn abandon(&self, flight: &Flight) {
        let mut slot = self.renewal.lock();
        if slot.flight.as_ref().is_some_and(|f| f.ptr_eq(flight)) {
            slot.flight = None;
        }
    }
}

/// Guards authenticated calls; cheap to clone
#[derive(Clone)]
pub struct SessionTokenGuard {
    inner: Arc<GuardInner>,
}

impl SessionTokenGuard {
    /// Create a guard over `store`, restoring any session it already holds
    ///
    /// A partial session (refresh token without user info, or the reverse)
    /// is discarded.
    pub fn new(
        transport: Arc<dyn Transport>,
        renewer: Arc<dyn TokenRenewer>,
        store: impl CredentialStore + 'static,
        config: &SessionConfig,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::Anonymous);
        let guard = Self {
            inner: Arc::new(GuardInner {
                transport,
                renewer,
                store: Box::new(store),
                inspector: TokenInspector::new(config.expiry_skew()),
                state,
                renewal: Mutex::new(RenewalSlot::default()),
            }),
        };
        guard.restore();
        guard
    }

    fn restore(&self) {
        let store = &self.inner.store;
        let has_refresh = store.refresh().is_some();
        let has_user = store.user_info().is_some();

        if !(has_refresh && has_user) && (has_refresh || has_user || store.access().is_some()) {
            tracing::warn!(has_refresh, has_user, "Discarding partial session");
            let mut slot = self.inner.renewal.lock();
            if let Err(e) = self.inner.purge(&mut slot) {
                tracing::warn!(error = %e, "Failed to clear credentials");
            }
        }

        let state = self.reconcile();
        tracing::info!(state = %state, "Session restored");
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        *self.inner.state.borrow()
    }

    /// Follow state changes
    pub fn subscribe_state(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// A session exists iff both the refresh token and user info are stored
    pub fn is_authenticated(&self) -> bool {
        let store = &self.inner.store;
        store.refresh().is_some() && store.user_info().is_some()
    }

    /// The signed-in user, if any
    pub fn user_info(&self) -> Option<UserInfo> {
        let store = &self.inner.store;
        store.refresh().and(store.user_info())
    }

    /// The refresh token, e.g. to revoke it server-side on logout
    pub fn refresh_token(&self) -> Option<String> {
        self.inner.store.refresh()
    }

    /// Changes made to the store through other handles
    pub(crate) fn store_changes(&self) -> StoreChanges {
        self.inner.store.subscribe()
    }

    /// Install a fresh session after login or registration
    #[instrument(skip_all, fields(user_id = user.id))]
    pub fn establish(&self, access: &str, refresh: &str, user: &UserInfo) -> SessionResult<()> {
        let store = &self.inner.store;
        let mut slot = self.inner.renewal.lock();
        slot.reset();

        // access first so other handles never see a refresh token without it
        let written = store
            .set_access(access)
            .and_then(|()| store.set_user_info(user))
            .and_then(|()| store.set_refresh(refresh));

        if let Err(e) = written {
            tracing::warn!(error = %e, "Failed to store new session");
            if let Err(e) = self.inner.purge(&mut slot) {
                tracing::warn!(error = %e, "Failed to clear partial session");
            }
            self.inner.set_state(SessionState::Anonymous);
            return Err(e.into());
        }

        self.inner.apply(SessionEvent::LoggedIn);
        tracing::info!("Session established");
        Ok(())
    }

    /// Drop the session; allowed in every state
    ///
    /// A renewal still in flight completes for the callers awaiting it, but
    /// its token is not installed.
    #[instrument(skip(self))]
    pub fn logout(&self) -> SessionResult<()> {
        let mut slot = self.inner.renewal.lock();
        let cleared = self.inner.purge(&mut slot);
        self.inner.apply(SessionEvent::LoggedOut);
        tracing::info!("Logged out");
        cleared.map_err(Into::into)
    }

    /// Re-derive the state from the store, e.g. after another handle changed it
    ///
    /// Never writes the store.
    pub fn reconcile(&self) -> SessionState {
        let mut slot = self.inner.renewal.lock();
        let store = &self.inner.store;

        let next = if store.refresh().is_none() || store.user_info().is_none() {
            SessionState::Anonymous
        } else if store.access().is_some() {
            SessionState::Authenticated
        } else {
            SessionState::AccessExpired
        };

        if next == SessionState::Anonymous && self.state() != SessionState::Anonymous {
            slot.reset();
            self.inner.apply(SessionEvent::CredentialsLost);
        } else {
            self.inner.set_state(next);
        }
        next
    }

    /// Renew the access token now, sharing any renewal already in flight
    ///
    /// Without a session this only makes sure the state reads `Anonymous`.
    #[instrument(skip(self))]
    pub async fn refresh_now(&self) -> SessionResult<()> {
        if !self.is_authenticated() {
            self.reconcile();
            return Ok(());
        }
        self.renew(Trigger::Forced).await?;
        Ok(())
    }

    /// Send a call with the current access token attached
    ///
    /// An authorization failure triggers one renewal and one retry with the
    /// new token. A second failure, a failure with no refresh token to renew
    /// with, or a failure of a token renewed just before sending is returned
    /// as-is. Every other error passes through.
    #[instrument(skip_all, fields(method = %request.method, path = %request.path))]
    pub async fn send(&self, request: ApiRequest) -> SessionResult<ApiResponse> {
        let mut token = self.inner.store.access();

        let renewed = match token.as_deref() {
            Some(current) if self.inner.inspector.is_expired(current) => {
                tracing::debug!("Access token expired, renewing before sending");
                self.renew(Trigger::Stale(Some(current))).await?
            }
            _ => None,
        };
        let renewed_before_send = renewed.is_some();
        if renewed_before_send {
            token = renewed;
        }

        match self
            .inner
            .transport
            .send(request.clone().bearer(token.clone()))
            .await
        {
            Err(TransportError::AuthorizationDenied) => {}
            other => return other.map_err(Into::into),
        }

        if renewed_before_send {
            tracing::warn!("Renewed access token rejected");
            return Err(TransportError::AuthorizationDenied.into());
        }

        tracing::debug!("Call rejected, renewing access token");
        let Some(fresh) = self.renew(Trigger::Stale(token.as_deref())).await? else {
            return Err(TransportError::AuthorizationDenied.into());
        };

        self.inner
            .transport
            .send(request.bearer(Some(fresh)))
            .await
            .map_err(Into::into)
    }

    /// Obtain a usable access token, joining or starting the single flight
    ///
    /// `Ok(None)` means there is no refresh token to renew with; whatever is
    /// left of the session is purged in that case.
    async fn renew(&self, trigger: Trigger<'_>) -> Result<Option<String>, RenewalError> {
        let flight = {
            let mut slot = self.inner.renewal.lock();
            match slot.flight.clone() {
                Some(flight) => flight,
                None => {
                    if let Trigger::Stale(stale) = trigger {
                        // renewed by someone else since the token was read
                        let current = self.inner.store.access();
                        if let Some(current) = current.filter(|c| Some(c.as_str()) != stale) {
                            return Ok(Some(current));
                        }
                    }

                    let store = &self.inner.store;
                    let Some(refresh) = store.refresh().filter(|_| store.user_info().is_some())
                    else {
                        self.inner.drop_lost_session(&mut slot);
                        return Ok(None);
                    };

                    if matches!(trigger, Trigger::Stale(_)) {
                        self.inner.apply(SessionEvent::AccessDenied);
                    }
                    let flight = self.launch(refresh, slot.generation);
                    slot.flight = Some(flight.clone());
                    flight
                }
            }
        };

        let outcome = flight.clone().await;
        if matches!(outcome, Err(RenewalError::Aborted)) {
            self.inner.abandon(&flight);
        }
        outcome.map(Some)
    }

    fn launch(&self, refresh: String, generation: u64) -> Flight {
        tracing::debug!(generation, "Starting token renewal");
        let inner = Arc::clone(&self.inner);
        renewal::launch(async move {
            let outcome = inner.renewer.renew(&refresh).await;
            inner.complete_renewal(generation, outcome)
        })
    }
}
