mod templates;

pub mod error;
pub mod session;
pub mod guidance;
pub mod context;
pub mod prompts;
pub mod research;
pub mod formatter;
pub mod scorer;
pub mod title;
pub mod orchestrator;
pub mod builder;

pub use error::PipelineError;
pub use session::{InMemorySessionStore, SessionStore, MAX_SESSION_TURNS};
pub use guidance::{build_feedback_guidance, GUIDANCE_HEADER};
pub use context::{ContextAssembler, GuidedQuery};
pub use prompts::{check_structure, style_for_seed, TaskShape};
pub use research::{Researcher, RESEARCH_FALLBACK};
pub use formatter::{FormattedAnswer, Formatter};
pub use scorer::QualityScorer;
pub use title::{heuristic_title, TitleGenerator};
pub use orchestrator::{Orchestrator, QueryRequest, RegenerateRequest, TurnOutcome};
pub use builder::OrchestratorBuilder;
