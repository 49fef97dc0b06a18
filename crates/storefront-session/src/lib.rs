//! # storefront-session
//!
//! Authenticated-session handling for the storefront client.
//!
//! ## Features
//!
//! - **Transport boundary**: a closed error set that tells authorization
//!   failures apart from every other failure
//! - **Credential stores**: short-lived access slot, long-lived refresh and
//!   user-info slots, with cross-handle change notifications
//! - **Token guard**: attaches the bearer token, renews it once per
//!   authorization failure with a single in-flight renewal shared by all
//!   concurrent callers, and purges the session when renewal fails
//! - **Keeper**: background task that renews on an interval and follows
//!   logins/logouts made through other handles
//!
//! ## Example
//!
//! ```ignore
//! use storefront_session::{ApiRequest, MemoryCredentialStore, SessionKeeper, SessionTokenGuard};
//!
//! let store = MemoryCredentialStore::new(StoreTtl::from(&config.session));
//! let guard = SessionTokenGuard::new(transport, renewer, store, &config.session);
//! let keeper = SessionKeeper::spawn(guard.clone(), config.session.refresh_interval());
//!
//! let response = guard.send(ApiRequest::get("/orders/")).await?;
//! ```

pub mod guard;
pub mod store;
pub mod transport;

// Re-export transport types
pub use transport::{ApiRequest, ApiResponse, Method, Transport, TransportError};

// Re-export store types
pub use store::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, Slot, StoreChange, StoreChanges,
    StoreError, StoreResult, StoreTtl,
};

// Re-export guard types
pub use guard::{
    RenewalError, SessionError, SessionEvent, SessionKeeper, SessionResult, SessionState,
    SessionTokenGuard, TokenRenewer,
};
