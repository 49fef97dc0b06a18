//! Test doubles for the transport and the renewal endpoint

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use parking_lot::Mutex;
use storefront_common::AccessClaims;
use storefront_core::UserInfo;
use tokio::sync::Notify;

use super::{RenewalError, TokenRenewer};
use crate::store::{CredentialStore, MemoryCredentialStore};
use crate::transport::{ApiRequest, ApiResponse, Transport, TransportError};

/// API that accepts exactly one bearer token
#[derive(Default)]
pub(crate) struct FakeApi {
    accepted: Mutex<Option<String>>,
    failure: Mutex<Option<TransportError>>,
    last_bearer: Mutex<Option<String>>,
    calls: AtomicUsize,
    denials: AtomicUsize,
}

impl FakeApi {
    pub fn accepting(token: &str) -> Arc<Self> {
        let api = Self::default();
        *api.accepted.lock() = Some(token.to_string());
        Arc::new(api)
    }

    pub fn denying() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fail every call with `err` instead
    pub fn fail_with(&self, err: TransportError) {
        *self.failure.lock() = Some(err);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn denials(&self) -> usize {
        self.denials.load(Ordering::SeqCst)
    }

    pub fn last_bearer(&self) -> Option<String> {
        self.last_bearer.lock().clone()
    }
}

#[async_trait]
impl Transport for FakeApi {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_bearer.lock() = request.bearer.clone();

        if let Some(err) = self.failure.lock().clone() {
            return Err(err);
        }

        let accepted = self.accepted.lock().clone();
        if accepted.is_some() && request.bearer == accepted {
            Ok(ApiResponse::json_body(
                200,
                &serde_json::json!({ "path": request.path }),
            ))
        } else {
            self.denials.fetch_add(1, Ordering::SeqCst);
            Err(TransportError::AuthorizationDenied)
        }
    }
}

/// Renewal endpoint that issues a fixed token or rejects every refresh token
pub(crate) struct FakeRenewer {
    issue: Option<String>,
    gate: Option<Notify>,
    calls: AtomicUsize,
}

impl FakeRenewer {
    fn build(issue: Option<&str>, gated: bool) -> Arc<Self> {
        Arc::new(Self {
            issue: issue.map(String::from),
            gate: gated.then(Notify::new),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn issuing(token: &str) -> Arc<Self> {
        Self::build(Some(token), false)
    }

    pub fn rejecting() -> Arc<Self> {
        Self::build(None, false)
    }

    /// Like `issuing`, but each exchange waits for [`release`](Self::release)
    pub fn gated(token: &str) -> Arc<Self> {
        Self::build(Some(token), true)
    }

    pub fn gated_rejecting() -> Arc<Self> {
        Self::build(None, true)
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenRenewer for FakeRenewer {
    async fn renew(&self, _refresh_token: &str) -> Result<String, RenewalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.issue.clone().ok_or(RenewalError::Rejected)
    }
}

pub(crate) fn user() -> UserInfo {
    UserInfo::new(1, "ana", "ana@example.com")
}

/// A store holding a complete session with the given access token
pub(crate) fn signed_in_store(access: &str) -> MemoryCredentialStore {
    let store = MemoryCredentialStore::default();
    store.set_access(access).unwrap();
    store.set_refresh("refresh-1").unwrap();
    store.set_user_info(&user()).unwrap();
    store
}

pub(crate) fn expired_jwt() -> String {
    let claims = AccessClaims {
        sub: Some("1".to_string()),
        exp: Some(Utc::now().timestamp() - 60),
        iat: Some(Utc::now().timestamp() - 960),
        token_type: Some("access".to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"server-side-secret"),
    )
    .unwrap()
}
