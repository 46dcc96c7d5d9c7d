use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use helpdesk_types::ConversationTurn;
use tokio::sync::RwLock;

/// Turns kept per session; older ones are evicted first
pub const MAX_SESSION_TURNS: usize = 10;

/// Short-lived per-session conversation window
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Turns of the session, oldest first
    async fn history(&self, session_id: &str) -> Result<Vec<ConversationTurn>>;

    /// Append a turn and trim the window as one step
    async fn append(&self, session_id: &str, turn: ConversationTurn) -> Result<()>;
}

pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Vec<ConversationTurn>>>,
    max_turns: usize,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::with_max_turns(MAX_SESSION_TURNS)
    }

    pub fn with_max_turns(max_turns: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_turns,
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn history(&self, session_id: &str) -> Result<Vec<ConversationTurn>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(session_id).cloned().unwrap_or_default())
    }

    async fn append(&self, session_id: &str, turn: ConversationTurn) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let turns = sessions.entry(session_id.to_string()).or_default();
        turns.push(turn);

        if turns.len() > self.max_turns {
            let excess = turns.len() - self.max_turns;
            turns.drain(..excess);
        }
        Ok(())
    }
}
