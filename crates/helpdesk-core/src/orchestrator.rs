use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use helpdesk_persist::{ChatStore, ConversationLog, PersistError};
use helpdesk_types::{ConversationTurn, RoutingResult, Status};

use crate::context::ContextAssembler;
use crate::error::PipelineError;
use crate::formatter::Formatter;
use crate::research::Researcher;
use crate::scorer::QualityScorer;
use crate::session::SessionStore;
use crate::title::TitleGenerator;

/// Rows of the conversation log searched for a prior answer
const RESUMMARIZE_LOOKBACK: usize = 50;

#[derive(Debug, Clone, Default)]
pub struct QueryRequest {
    pub query: String,
    pub session_id: String,
    pub chat_id: Option<String>,
    pub attachment_ids: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RegenerateRequest {
    pub query: String,
    pub session_id: String,
    pub chat_id: Option<String>,
}

/// Result of one turn.
///
/// The step statuses are for logs and callers that care; the HTTP surface
/// only exposes `summary`, `feedback` and `chat_id`.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub summary: String,
    pub feedback: String,
    /// Chat the turn was stored in, if any
    pub chat_id: Option<String>,
    pub research_status: Status,
    pub format_status: Status,
    pub quality_status: Status,
}

impl TurnOutcome {
    pub fn is_degraded(&self) -> bool {
        self.research_status.is_error()
            || self.format_status.is_error()
            || self.quality_status.is_error()
    }
}

pub struct Orchestrator {
    pub(crate) assembler: ContextAssembler,
    pub(crate) researcher: Researcher,
    pub(crate) formatter: Formatter,
    pub(crate) scorer: QualityScorer,
    pub(crate) titles: TitleGenerator,
    pub(crate) sessions: Arc<dyn SessionStore>,
    pub(crate) chats: Arc<dyn ChatStore>,
    pub(crate) conversations: Arc<dyn ConversationLog>,
    pub(crate) next_seed: AtomicU64,
}

impl Orchestrator {
    pub fn builder() -> crate::builder::OrchestratorBuilder {
        crate::builder::OrchestratorBuilder::new()
    }

    /// Answer a new query: assemble context, research, format, score, persist.
    pub async fn handle_query(&self, request: QueryRequest) -> Result<TurnOutcome, PipelineError> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(PipelineError::EmptyQuery);
        }

        let guided = self
            .assembler
            .assemble(query, request.chat_id.as_deref(), &request.attachment_ids)
            .await;
        let history = self.sessions.history(&request.session_id).await?;

        let routing = self
            .researcher
            .research(query, &guided.text, &history)
            .await
            .with_guidance(guided.guidance);
        let formatted = self.formatter.format(&routing, None).await;
        let rating = self.scorer.score(&formatted.text, query).await;

        self.sessions
            .append(&request.session_id, ConversationTurn::new(query, &formatted.text))
            .await?;
        self.log_conversation(query, &formatted.text).await;
        let chat_id = self
            .store_turn(request.chat_id.as_deref(), query, &formatted.text, true)
            .await;

        let outcome = TurnOutcome {
            summary: formatted.text,
            feedback: rating.text,
            chat_id,
            research_status: routing.status,
            format_status: formatted.status,
            quality_status: rating.status,
        };
        self.report("query", &outcome);
        Ok(outcome)
    }

    /// Re-format the most recent answer to the same query with a fresh style.
    pub async fn resummarize(&self, request: RegenerateRequest) -> Result<TurnOutcome, PipelineError> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(PipelineError::EmptyQuery);
        }

        let base = self
            .prior_response(query, &request.session_id)
            .await?
            .ok_or(PipelineError::NoPriorResponse)?;
        let guidance = self
            .assembler
            .feedback_guidance(request.chat_id.as_deref())
            .await;

        let routing = RoutingResult::success(query, base)
            .with_resummarize(true)
            .with_guidance(guidance);

        self.finish_regeneration("resummarize", &request, routing).await
    }

    /// Research the query again from scratch and format it with a fresh style.
    pub async fn reresearch(&self, request: RegenerateRequest) -> Result<TurnOutcome, PipelineError> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(PipelineError::EmptyQuery);
        }

        let guided = self
            .assembler
            .assemble(query, request.chat_id.as_deref(), &[])
            .await;
        let history = self.sessions.history(&request.session_id).await?;

        let routing = self
            .researcher
            .research(query, &guided.text, &history)
            .await
            .with_resummarize(true)
            .with_guidance(guided.guidance);

        self.finish_regeneration("reresearch", &request, routing).await
    }

    async fn finish_regeneration(
        &self,
        kind: &'static str,
        request: &RegenerateRequest,
        routing: RoutingResult,
    ) -> Result<TurnOutcome, PipelineError> {
        let query = routing.query.as_str();
        let formatted = self.formatter.format(&routing, Some(self.draw_seed())).await;
        let rating = self.scorer.score(&formatted.text, query).await;

        self.sessions
            .append(&request.session_id, ConversationTurn::new(query, &formatted.text))
            .await?;
        self.log_conversation(query, &formatted.text).await;
        let chat_id = self
            .store_turn(request.chat_id.as_deref(), query, &formatted.text, false)
            .await;

        let outcome = TurnOutcome {
            summary: formatted.text,
            feedback: rating.text,
            chat_id,
            research_status: routing.status,
            format_status: formatted.status,
            quality_status: rating.status,
        };
        self.report(kind, &outcome);
        Ok(outcome)
    }

    /// Consecutive draws differ by one, so back-to-back regenerations never
    /// share a style.
    fn draw_seed(&self) -> u64 {
        self.next_seed.fetch_add(1, Ordering::Relaxed)
    }

    /// Newest logged answer to exactly this query, then the session window.
    async fn prior_response(&self, query: &str, session_id: &str) -> Result<Option<String>, PipelineError> {
        match self.conversations.recent(RESUMMARIZE_LOOKBACK).await {
            Ok(records) => {
                if let Some(record) = records.into_iter().find(|r| r.user_query.trim() == query) {
                    return Ok(Some(record.bot_response));
                }
            }
            Err(e) => tracing::error!(error = %e, "Failed loading conversation log for resummarize"),
        }

        let history = self.sessions.history(session_id).await?;
        Ok(history
            .into_iter()
            .rev()
            .find(|turn| turn.user.trim() == query)
            .map(|turn| turn.bot))
    }

    async fn log_conversation(&self, query: &str, answer: &str) {
        if let Err(e) = self.conversations.append(query, answer).await {
            tracing::error!(error = %e, "Failed to persist conversation");
        }
    }

    /// Append the turn to its chat. With `create_missing`, an absent or
    /// unknown chat id gets a new chat; otherwise the turn is only stored
    /// when the chat exists. Returns the chat the turn ended up in.
    async fn store_turn(
        &self,
        chat_id: Option<&str>,
        query: &str,
        answer: &str,
        create_missing: bool,
    ) -> Option<String> {
        let appended = match chat_id {
            Some(id) => match self.chats.append_turn(id, query, answer).await {
                Ok(chat) => Some(chat),
                Err(PersistError::ChatNotFound(_)) => None,
                Err(e) => {
                    tracing::error!(chat_id = %id, error = %e, "Error updating chat store");
                    return chat_id.map(str::to_string);
                }
            },
            None => None,
        };

        let chat = match appended {
            Some(chat) => chat,
            None if create_missing => match self.create_with_turn(query, answer).await {
                Ok(chat) => chat,
                Err(e) => {
                    tracing::error!(error = %e, "Error creating chat");
                    return chat_id.map(str::to_string);
                }
            },
            None => {
                tracing::debug!(chat_id = ?chat_id, "Regenerated turn not stored in any chat");
                return None;
            }
        };

        if chat.has_placeholder_title() && chat.messages.len() >= 2 {
            let title = self.titles.generate(query, answer).await;
            if let Err(e) = self.chats.set_title_if_placeholder(&chat.id, &title).await {
                tracing::warn!(chat_id = %chat.id, error = %e, "Failed to set chat title");
            }
        }

        Some(chat.id)
    }

    async fn create_with_turn(
        &self,
        query: &str,
        answer: &str,
    ) -> Result<helpdesk_types::Chat, PersistError> {
        let chat = self.chats.create_chat().await?;
        self.chats.append_turn(&chat.id, query, answer).await
    }

    fn report(&self, kind: &'static str, outcome: &TurnOutcome) {
        if outcome.is_degraded() {
            tracing::warn!(
                kind,
                chat_id = ?outcome.chat_id,
                research = ?outcome.research_status,
                format = ?outcome.format_status,
                quality = ?outcome.quality_status,
                "Turn answered with degraded output"
            );
        } else {
            tracing::info!(kind, chat_id = ?outcome.chat_id, "Turn handled successfully");
        }
    }
}
