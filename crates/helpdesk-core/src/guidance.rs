//! Turns recent dislikes on a chat into numbered guidance lines.

use helpdesk_types::Chat;

/// Header placed between the query and the guidance lines
pub const GUIDANCE_HEADER: &str =
    "User feedback to consider in this chat (address these concerns explicitly and avoid repeating mistakes):";

const RECENT_FEEDBACK_WINDOW: usize = 5;
const MAX_GUIDANCE_ITEMS: usize = 3;
const MAX_REFERENCE_CHARS: usize = 220;

/// Guidance for the newest dislikes among the chat's last five feedback
/// entries, at most three. `None` when there is nothing to say.
pub fn build_feedback_guidance(chat: &Chat) -> Option<String> {
    let lines: Vec<String> = chat
        .feedback_newest_first()
        .take(RECENT_FEEDBACK_WINDOW)
        .filter(|entry| entry.is_dislike())
        .take(MAX_GUIDANCE_ITEMS)
        .enumerate()
        .filter_map(|(i, entry)| {
            let n = i + 1;
            let feedback = entry.feedback.trim();
            let reference = truncate_reference(entry.message.trim());

            match (feedback.is_empty(), reference.is_empty()) {
                (false, false) => Some(format!("{n}. {feedback} | reference: {reference}")),
                (false, true) => Some(format!("{n}. {feedback}")),
                (true, false) => Some(format!("{n}. Avoid issues like: {reference}")),
                (true, true) => None,
            }
        })
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn truncate_reference(text: &str) -> String {
    if text.chars().count() > MAX_REFERENCE_CHARS {
        let head: String = text.chars().take(MAX_REFERENCE_CHARS).collect();
        format!("{head}…")
    } else {
        text.to_string()
    }
}

/// `"{query}\n\n{header}\n{guidance}"`
pub fn append_guidance(query: &str, guidance: &str) -> String {
    format!("{query}\n\n{GUIDANCE_HEADER}\n{guidance}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_types::{FeedbackEntry, Rating};

    fn chat_with(entries: Vec<FeedbackEntry>) -> Chat {
        let mut chat = Chat::new();
        chat.feedback = entries;
        chat
    }

    #[test]
    fn test_only_recent_dislikes_newest_first() {
        let chat = chat_with(vec![
            FeedbackEntry::new(Rating::Dislike, "oldest dislike", ""),
            FeedbackEntry::new(Rating::Dislike, "d1", "r1"),
            FeedbackEntry::new(Rating::Like, "nice", "r2"),
            FeedbackEntry::new(Rating::Dislike, "d2", ""),
            FeedbackEntry::new(Rating::Unrated, "meh", "r3"),
            FeedbackEntry::new(Rating::Dislike, "", "r4"),
        ]);

        let guidance = build_feedback_guidance(&chat).unwrap();
        assert_eq!(
            guidance,
            "1. Avoid issues like: r4\n2. d2\n3. d1 | reference: r1"
        );
    }

    #[test]
    fn test_dislike_outside_window_is_ignored() {
        let mut entries = vec![FeedbackEntry::new(Rating::Dislike, "too old", "")];
        for _ in 0..5 {
            entries.push(FeedbackEntry::new(Rating::Like, "", ""));
        }

        assert_eq!(build_feedback_guidance(&chat_with(entries)), None);
    }

    #[test]
    fn test_long_reference_is_truncated() {
        let long = "x".repeat(300);
        let chat = chat_with(vec![FeedbackEntry::new(Rating::Dislike, "wrong", long)]);

        let guidance = build_feedback_guidance(&chat).unwrap();
        let reference = guidance.split(" | reference: ").nth(1).unwrap();
        assert_eq!(reference.chars().count(), MAX_REFERENCE_CHARS + 1);
        assert!(reference.ends_with('…'));
    }

    #[test]
    fn test_empty_entries_are_skipped() {
        let chat = chat_with(vec![FeedbackEntry::new(Rating::Dislike, "  ", " ")]);
        assert_eq!(build_feedback_guidance(&chat), None);
    }
}
