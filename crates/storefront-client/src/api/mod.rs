//! Typed storefront API client

mod auth;
mod catalog;
mod error;
mod orders;

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use storefront_common::{AppError, AppResult, CatalogConfig, ClientConfig};
use storefront_core::{PageRange, Paginated};
use storefront_session::{
    ApiRequest, ApiResponse, CredentialStore, FileCredentialStore, MemoryCredentialStore,
    SessionKeeper, SessionTokenGuard, StoreTtl, Transport,
};

use crate::http::{HttpTokenRenewer, HttpTransport};

/// Storefront API client; cheap to clone
#[derive(Clone)]
pub struct StorefrontClient {
    transport: Arc<dyn Transport>,
    guard: SessionTokenGuard,
    catalog: CatalogConfig,
    refresh_interval: Duration,
}

impl StorefrontClient {
    /// Build a client over any transport and credential store
    pub fn new(
        transport: Arc<dyn Transport>,
        store: impl CredentialStore + 'static,
        config: &ClientConfig,
    ) -> Self {
        let renewer = Arc::new(HttpTokenRenewer::new(transport.clone()));
        let guard = SessionTokenGuard::new(transport.clone(), renewer, store, &config.session);

        Self {
            transport,
            guard,
            catalog: config.catalog.clone(),
            refresh_interval: config.session.refresh_interval(),
        }
    }

    /// Build an HTTP client, persisting credentials when a path is configured
    pub fn connect(config: &ClientConfig) -> AppResult<Self> {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config.api)?);
        let ttl = StoreTtl::from(&config.session);

        let client = match &config.session.credentials_path {
            Some(path) => {
                let store = FileCredentialStore::open(path, ttl)
                    .map_err(|e| AppError::Storage(e.to_string()))?;
                Self::new(transport, store, config)
            }
            None => Self::new(transport, MemoryCredentialStore::new(ttl), config),
        };

        tracing::info!(
            base_url = %config.api.base_url,
            session = %client.guard.state(),
            "Storefront client ready"
        );
        Ok(client)
    }

    /// The session behind authenticated calls
    pub fn session(&self) -> &SessionTokenGuard {
        &self.guard
    }

    /// Start background session upkeep at the configured interval
    #[must_use]
    pub fn keep_alive(&self) -> SessionKeeper {
        SessionKeeper::spawn(self.guard.clone(), self.refresh_interval)
    }

    /// Page-number control for a listing shown at `current_page`
    pub fn page_range<T>(&self, page: &Paginated<T>, current_page: u32) -> PageRange {
        page.page_range(
            self.catalog.page_size,
            current_page,
            self.catalog.sibling_count,
        )
    }

    /// Unauthenticated call
    async fn public<T: DeserializeOwned>(&self, request: ApiRequest) -> AppResult<T> {
        let response = self
            .transport
            .send(request)
            .await
            .map_err(error::from_transport)?;
        decode(&response)
    }

    /// Call that needs a session; fails fast without one
    async fn guarded_raw(&self, request: ApiRequest) -> AppResult<ApiResponse> {
        if !self.guard.is_authenticated() {
            return Err(AppError::NotAuthenticated);
        }
        self.guard.send(request).await.map_err(error::from_session)
    }

    async fn guarded<T: DeserializeOwned>(&self, request: ApiRequest) -> AppResult<T> {
        decode(&self.guarded_raw(request).await?)
    }
}

fn decode<T: DeserializeOwned>(response: &ApiResponse) -> AppResult<T> {
    response.json().map_err(error::from_transport)
}

fn with_body<T: Serialize + ?Sized>(request: ApiRequest, body: &T) -> AppResult<ApiRequest> {
    request.json(body).map_err(error::from_transport)
}
