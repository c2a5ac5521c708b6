use std::sync::Arc;

use relay_domain::RuntimeConfig;

use crate::{ConnectionRegistry, Metrics};

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub registry: Arc<ConnectionRegistry>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: RuntimeConfig) -> Self {
        let registry = Arc::new(ConnectionRegistry::new(config.send_timeout()));
        Self {
            config,
            registry,
            metrics: Arc::new(Metrics::default()),
        }
    }
}
