//! Prompt construction for every generation step, plus the answer layout check.

use helpdesk_types::{ConversationTurn, RoutingResult};

use crate::templates::{
    fill, FORMAT_PROMPT_TEMPLATE, GUIDANCE_BLOCK, RESEARCH_PROMPT_TEMPLATE, RESEARCH_SYSTEM_INSTRUCTION,
    SCORE_PROMPT_TEMPLATE, TITLE_PROMPT_TEMPLATE, VARIATION_BLOCK,
};

pub const SUMMARY_HEADING: &str = "### Summary";
pub const STEPS_HEADING: &str = "### Steps";
pub const KEY_POINTS_HEADING: &str = "### Key Points";
pub const TIPS_HEADING: &str = "### Tips & Notes";
pub const NEXT_STEPS_HEADING: &str = "### Next Steps & Resources";

/// History turns included in the research prompt
pub const RESEARCH_HISTORY_TURNS: usize = 3;

/// Tone hints picked by the variation seed on regenerated answers
const STYLES: &[&str] = &[
    "concise and direct, short sentences",
    "warm and reassuring, acknowledge the frustration first",
    "plain language for a non-technical reader",
    "checklist-oriented, one action per bullet",
    "example-driven, include one concrete example",
    "upbeat and encouraging, focus on what will work",
];

const PROCEDURAL_CUES: &[&str] = &[
    "how do", "how to", "how can", "how should", "steps", "step by step", "set up", "setup",
    "install", "installing", "configure", "reset", "resetting", "fix", "fixing", "troubleshoot", "enable", "disable", "change my",
    "update my", "connect", "cancel", "upgrade", "recover", "restore", "sign up", "log in",
];

/// What kind of answer the question calls for, which decides the middle section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskShape {
    /// Something the user wants to do: numbered `### Steps`
    Procedural,
    /// Something the user wants to know: bulleted `### Key Points`
    Informational,
}

impl TaskShape {
    /// Cues match whole words only, so "prefix" is not "fix".
    pub fn infer(query: &str) -> Self {
        let lowered = query.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|w| !w.is_empty())
            .collect();

        let matches_cue = |cue: &&str| {
            let cue_words: Vec<&str> = cue.split_whitespace().collect();
            words.windows(cue_words.len()).any(|window| window == cue_words.as_slice())
        };

        if PROCEDURAL_CUES.iter().any(matches_cue) {
            TaskShape::Procedural
        } else {
            TaskShape::Informational
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            TaskShape::Procedural => STEPS_HEADING,
            TaskShape::Informational => KEY_POINTS_HEADING,
        }
    }

    fn rule(&self) -> &'static str {
        match self {
            TaskShape::Procedural => {
                "Under \"### Steps\" give a numbered list of concrete actions in the order the user should take them."
            }
            TaskShape::Informational => {
                "Under \"### Key Points\" give a short bulleted list of the most important facts."
            }
        }
    }
}

pub fn style_for_seed(seed: u64) -> &'static str {
    STYLES[(seed % STYLES.len() as u64) as usize]
}

pub fn research_prompt(guided_query: &str, history: &[ConversationTurn]) -> String {
    let start = history.len().saturating_sub(RESEARCH_HISTORY_TURNS);
    let context = history[start..]
        .iter()
        .map(|turn| format!("User: {}\nBot: {}", turn.user, turn.bot))
        .collect::<Vec<_>>()
        .join("\n");

    fill(
        RESEARCH_PROMPT_TEMPLATE,
        &[
            ("system_instruction", RESEARCH_SYSTEM_INSTRUCTION),
            ("history", &context),
            ("query", guided_query),
        ],
    )
}

/// Format prompt for a research result. A seed is only honoured when the
/// result asks for a resummarized answer.
pub fn format_prompt(routing: &RoutingResult, variation_seed: Option<u64>) -> String {
    let shape = TaskShape::infer(&routing.query);

    let variation = match (routing.resummarize, variation_seed) {
        (true, Some(seed)) => fill(VARIATION_BLOCK, &[("style", style_for_seed(seed))]),
        (true, None) => fill(VARIATION_BLOCK, &[("style", STYLES[0])]),
        (false, _) => String::new(),
    };
    let guidance = routing
        .feedback_guidance
        .as_deref()
        .filter(|g| !g.trim().is_empty())
        .map(|g| fill(GUIDANCE_BLOCK, &[("guidance", g)]))
        .unwrap_or_default();

    fill(
        FORMAT_PROMPT_TEMPLATE,
        &[
            ("middle_heading", shape.heading().trim_start_matches("### ")),
            ("middle_rule", shape.rule()),
            ("variation", &variation),
            ("guidance", &guidance),
            ("query", &routing.query),
            ("response", &routing.response),
        ],
    )
}

pub fn score_prompt(answer: &str, query: &str) -> String {
    fill(SCORE_PROMPT_TEMPLATE, &[("query", query), ("answer", answer)])
}

pub fn title_prompt(user: &str, assistant: &str) -> String {
    fill(TITLE_PROMPT_TEMPLATE, &[("user", user), ("assistant", assistant)])
}

/// True when `text` has the four sections in order, with exactly one of
/// `### Steps` / `### Key Points` in second place.
pub fn check_structure(text: &str) -> bool {
    let headings: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("### "))
        .collect();

    matches!(
        headings.as_slice(),
        [SUMMARY_HEADING, middle, TIPS_HEADING, NEXT_STEPS_HEADING]
            if *middle == STEPS_HEADING || *middle == KEY_POINTS_HEADING
    )
}
