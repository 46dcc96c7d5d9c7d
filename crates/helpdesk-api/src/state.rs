use std::sync::Arc;

use helpdesk_core::Orchestrator;
use helpdesk_persist::PersistClient;

use crate::config::Config;

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub persist: PersistClient,
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(config: Config, persist: PersistClient, orchestrator: Orchestrator) -> Self {
        Self {
            config: Arc::new(config),
            persist,
            orchestrator: Arc::new(orchestrator),
        }
    }
}
