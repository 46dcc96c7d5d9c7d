pub const RESEARCH_SYSTEM_INSTRUCTION: &str = r#"You are a friendly, helpful AI assistant for customer support.
You can handle:
- Customer support questions (billing, technical issues, product information)
- General conversation and small talk
- Any other topics users want to discuss

Be conversational, warm, and helpful. For support queries, provide clear actionable advice.
For casual chat, be engaging and natural. Keep responses concise but informative."#;

pub const RESEARCH_PROMPT_TEMPLATE: &str = r#"<system_instruction>

Conversation history:
<history>

User: <query>

Assistant:"#;

pub const FORMAT_PROMPT_TEMPLATE: &str = r####"You are formatting a customer support answer for a chat window.

Rewrite the draft answer below as Markdown using exactly these four sections, in this order:
### Summary
### <middle_heading>
### Tips & Notes
### Next Steps & Resources

Rules:
- Use each heading exactly once and add no other level-3 headings.
- Under "### Summary" write one or two plain sentences that answer the question directly.
- <middle_rule>
- Keep every fact from the draft. Do not invent product names, prices, links or policies.
- Keep the tone friendly and the whole answer short enough to read on a phone.
<variation><guidance>
Original question:
<query>

Draft answer:
<response>

Formatted answer:"####;

pub const VARIATION_BLOCK: &str = r#"
This is a regenerated answer. Vary the phrasing, ordering and examples so it does not read like the previous version, while keeping the same sections.
Style for this version: <style>
"#;

pub const GUIDANCE_BLOCK: &str = r#"
The user disliked earlier answers in this chat. Address these concerns explicitly:
<guidance>
"#;

pub const SCORE_PROMPT_TEMPLATE: &str = r#"Evaluate this chatbot response for quality:

User Query: <query>
Bot Response: <answer>

Rate the response on:
1. Helpfulness (1-5)
2. Friendliness (1-5)
3. Clarity (1-5)

Provide a brief one-sentence evaluation and overall score (1-5).

Format:
Score: X/5
Evaluation: [one sentence]"#;

pub const TITLE_PROMPT_TEMPLATE: &str = r#"Create a 3-6 word chat title for this conversation topic.
User: <user>
Assistant: <assistant>
Title:"#;

/// Fill `<name>` slots in a single scan over `template`.
///
/// Inserted values are never scanned again, so a value that itself contains
/// `<query>` or `<response>` lands in the prompt verbatim. Unknown `<...>`
/// sequences are left as they are.
pub(crate) fn fill(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let slot = slots.iter().find(|(name, _)| {
            tail.starts_with(name) && tail[name.len()..].starts_with('>')
        });

        match slot {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                out.push('<');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_does_not_rescan_values() {
        let filled = fill("Q: <query>\nA: <answer>", &[("query", "what is <answer>?"), ("answer", "42")]);
        assert_eq!(filled, "Q: what is <answer>?\nA: 42");
    }

    #[test]
    fn test_fill_keeps_unknown_and_unclosed_tags() {
        assert_eq!(fill("a <b> <c", &[("c", "x")]), "a <b> <c");
        assert_eq!(fill("<c><c>", &[("c", "x")]), "xx");
    }

    #[test]
    fn test_format_template_has_every_slot() {
        for slot in ["<middle_heading>", "<middle_rule>", "<variation>", "<guidance>", "<query>", "<response>"] {
            assert_eq!(FORMAT_PROMPT_TEMPLATE.matches(slot).count(), 1, "{slot}");
        }
        assert!(FORMAT_PROMPT_TEMPLATE.contains("Under \"### Summary\""));
    }
}
