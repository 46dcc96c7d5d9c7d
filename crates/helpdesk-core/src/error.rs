use thiserror::Error;

/// Failures a caller has to act on. Upstream generation failures never show
/// up here; they degrade to fallback text inside the pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Empty query")]
    EmptyQuery,

    #[error("No prior response found to resummarize.")]
    NoPriorResponse,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
