// Defensive text extraction from raw provider payloads.
//
// Some backend responses carry no primary text field and only surface content
// inside candidate structures, so every known shape is tried in turn.

use serde_json::Value;

const PRIMARY_FIELDS: [&str; 2] = ["text", "output_text"];

/// Extract the generated text from a raw completion payload.
///
/// Order: primary text field, Gemini-style `candidates[*].content.parts[*].text`,
/// then chat-completion `choices[*].message.content` / `choices[*].text`.
/// Returns `None` when nothing non-blank is found.
pub fn extract_text(raw: &Value) -> Option<String> {
    primary_text(raw)
        .or_else(|| candidate_text(raw))
        .or_else(|| choice_text(raw))
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn primary_text(raw: &Value) -> Option<String> {
    PRIMARY_FIELDS
        .iter()
        .filter_map(|field| raw.get(*field).and_then(Value::as_str))
        .find_map(non_blank)
}

fn candidate_text(raw: &Value) -> Option<String> {
    raw.get("candidates")?
        .as_array()?
        .iter()
        .find_map(|candidate| {
            let parts = candidate.pointer("/content/parts")?.as_array()?;
            let texts: Vec<&str> = parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .filter(|text| !text.trim().is_empty())
                .collect();
            non_blank(&texts.join("\n"))
        })
}

fn choice_text(raw: &Value) -> Option<String> {
    raw.get("choices")?
        .as_array()?
        .iter()
        .find_map(|choice| {
            choice
                .pointer("/message/content")
                .and_then(Value::as_str)
                .and_then(non_blank)
                .or_else(|| choice.get("text").and_then(Value::as_str).and_then(non_blank))
        })
}
