use crate::commands::Dispatcher;
use crate::config::Config;
use crate::store::{CatalogStore, FileCatalog, FileRegistrations, RegistrationStore};
use std::sync::Arc;

/// Everything a connection session needs, built once at startup.
pub struct Registry {
    pub config: Arc<Config>,
    pub catalog: Arc<dyn CatalogStore>,
    pub registrations: Arc<dyn RegistrationStore>,
    pub dispatcher: Dispatcher,
}

impl Registry {
    /// File-backed stores at the configured paths, default command table.
    pub fn new(config: Config) -> Self {
        let catalog = Arc::new(FileCatalog::new(config.catalog_path.clone()));
        let registrations = Arc::new(FileRegistrations::new(config.registrations_path.clone()));
        Self::with_stores(config, catalog, registrations, Dispatcher::with_defaults())
    }

    pub fn with_stores(
        config: Config,
        catalog: Arc<dyn CatalogStore>,
        registrations: Arc<dyn RegistrationStore>,
        dispatcher: Dispatcher,
    ) -> Self {
        tracing::debug!(?dispatcher, "command table ready");
        Self {
            config: Arc::new(config),
            catalog,
            registrations,
            dispatcher,
        }
    }
}
