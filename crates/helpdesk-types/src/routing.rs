use serde::{Deserialize, Serialize};

/// Rating text used whenever the quality scorer cannot produce one
pub const DEFAULT_QUALITY_TEXT: &str = "Response appears acceptable.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Success,
    Error,
}

impl Status {
    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error)
    }
}

/// Output of the research step, input of the format step. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingResult {
    pub response: String,
    pub query: String,
    pub status: Status,
    /// Ask the formatter for a fresh phrasing of the same content
    #[serde(default)]
    pub resummarize: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_guidance: Option<String>,
}

impl RoutingResult {
    pub fn success(query: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            query: query.into(),
            status: Status::Success,
            resummarize: false,
            feedback_guidance: None,
        }
    }

    pub fn failed(query: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            ..Self::success(query, fallback)
        }
    }

    pub fn with_resummarize(mut self, resummarize: bool) -> Self {
        self.resummarize = resummarize;
        self
    }

    pub fn with_guidance(mut self, guidance: Option<String>) -> Self {
        self.feedback_guidance = guidance;
        self
    }
}

/// Output of the quality scorer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityRating {
    pub text: String,
    pub status: Status,
}

impl QualityRating {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            status: Status::Success,
        }
    }

    /// The fixed "acceptable" rating reported when scoring fails
    pub fn fallback() -> Self {
        Self {
            text: DEFAULT_QUALITY_TEXT.to_string(),
            status: Status::Error,
        }
    }
}
