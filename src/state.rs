use std::sync::Arc;

use crate::clients::jikan::{CatalogClient, CatalogTransport};
use crate::config::Config;
use crate::db::{PreferenceRepository, SessionRepository, Store, WatchlistRepository};
use crate::services::{AuthService, DemoAuthService};

/// Everything a front-end needs, built once at startup and passed around by
/// handle.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub catalog: CatalogClient,

    pub auth: Arc<dyn AuthService>,
}

impl SharedState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let catalog = CatalogClient::new(&config.catalog)?;
        let store = Store::from_config(&config);
        Ok(Self::assemble(config, store, catalog))
    }

    /// Wires the state around an explicit store and transport.
    #[must_use]
    pub fn with_parts(
        config: Config,
        store: Store,
        transport: Arc<dyn CatalogTransport>,
    ) -> Self {
        let catalog = CatalogClient::with_transport(transport, &config.catalog);
        Self::assemble(config, store, catalog)
    }

    fn assemble(config: Config, store: Store, catalog: CatalogClient) -> Self {
        let auth: Arc<dyn AuthService> =
            Arc::new(DemoAuthService::new(store.sessions(), &config.session));
        Self {
            config: Arc::new(config),
            store,
            catalog,
            auth,
        }
    }

    #[must_use]
    pub fn watchlist(&self) -> WatchlistRepository {
        self.store.watchlist()
    }

    #[must_use]
    pub fn preferences(&self) -> PreferenceRepository {
        self.store.preferences()
    }

    #[must_use]
    pub fn sessions(&self) -> SessionRepository {
        self.store.sessions()
    }
}
