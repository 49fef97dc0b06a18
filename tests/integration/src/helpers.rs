//! Test helpers for integration tests
//!
//! Provides utilities for spawning the mock API and building clients that
//! talk to it over real HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use storefront_client::{HttpTransport, StorefrontClient};
use storefront_common::ClientConfig;
use storefront_session::{CredentialStore, MemoryCredentialStore, StoreTtl, Transport};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::mock_api::MockApi;

/// Mock API server that lives as long as the test
pub struct TestServer {
    pub addr: SocketAddr,
    pub api: MockApi,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a freshly seeded mock API on an ephemeral port
    pub async fn start() -> Result<Self> {
        let api = MockApi::new();
        let app = api.router();

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self { addr, api, handle })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client configuration pointing at this server, defaults elsewhere
    pub fn config(&self) -> Result<ClientConfig> {
        let base_url = self.base_url();
        let config = ClientConfig::from_lookup(|key| match key {
            "API_BASE_URL" => Some(base_url.clone()),
            "API_TIMEOUT_SECS" => Some("5".to_string()),
            _ => None,
        })?;
        Ok(config)
    }

    /// Client with an in-memory credential store
    pub fn client(&self) -> Result<StorefrontClient> {
        let config = self.config()?;
        self.client_with_store(MemoryCredentialStore::new(StoreTtl::from(&config.session)))
    }

    /// Client over the given credential store
    pub fn client_with_store(
        &self,
        store: impl CredentialStore + 'static,
    ) -> Result<StorefrontClient> {
        let config = self.config()?;
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config.api)?);
        Ok(StorefrontClient::new(transport, store, &config))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
