use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use helpdesk_llm::CompletionClient;
use helpdesk_persist::PersistClient;

use crate::context::ContextAssembler;
use crate::formatter::Formatter;
use crate::orchestrator::Orchestrator;
use crate::research::Researcher;
use crate::scorer::QualityScorer;
use crate::session::{InMemorySessionStore, SessionStore};
use crate::title::TitleGenerator;

/// Builder for an [`Orchestrator`]
pub struct OrchestratorBuilder {
    client: Option<Arc<dyn CompletionClient>>,
    format_client: Option<Arc<dyn CompletionClient>>,
    persist: Option<PersistClient>,
    sessions: Option<Arc<dyn SessionStore>>,
    first_seed: Option<u64>,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            client: None,
            format_client: None,
            persist: None,
            sessions: None,
            first_seed: None,
        }
    }

    /// Completion client shared by every generation step
    pub fn client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Separate client for the format step
    pub fn format_client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.format_client = Some(client);
        self
    }

    pub fn persist(mut self, persist: PersistClient) -> Self {
        self.persist = Some(persist);
        self
    }

    pub fn sessions(mut self, sessions: Arc<dyn SessionStore>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    /// Fix the first variation seed. Random when unset.
    pub fn first_seed(mut self, seed: u64) -> Self {
        self.first_seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<Orchestrator> {
        let client = self
            .client
            .ok_or_else(|| anyhow!("Completion client is required"))?;
        let persist = self
            .persist
            .ok_or_else(|| anyhow!("Persist client is required"))?;
        let format_client = self.format_client.unwrap_or_else(|| client.clone());
        let sessions = self
            .sessions
            .unwrap_or_else(|| Arc::new(InMemorySessionStore::new()));
        let first_seed = self
            .first_seed
            .unwrap_or_else(|| uuid::Uuid::new_v4().as_u128() as u64);

        Ok(Orchestrator {
            assembler: ContextAssembler::new(persist.chats().clone(), persist.attachments().clone()),
            researcher: Researcher::new(client.clone()),
            formatter: Formatter::new(format_client),
            scorer: QualityScorer::new(client.clone()),
            titles: TitleGenerator::new(client),
            sessions,
            chats: persist.chats().clone(),
            conversations: persist.conversations().clone(),
            next_seed: AtomicU64::new(first_seed),
        })
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
