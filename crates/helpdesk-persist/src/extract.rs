//! Upload MIME detection and plain-text extraction.

use std::path::Path;

/// Upper bound on characters kept from one uploaded file
pub const MAX_EXTRACTED_CHARS: usize = 200_000;

const FALLBACK_MIME: &str = "application/octet-stream";
const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "csv", "log"];

/// Content type to store for an upload: the client's value when it parses as a
/// MIME type, otherwise a guess from the file extension.
pub fn safe_mime(filename: &str, content_type: Option<&str>) -> String {
    if let Some(ct) = content_type.map(str::trim).filter(|ct| !ct.is_empty()) {
        if let Ok(mime) = ct.parse::<mime_guess::mime::Mime>() {
            return mime.essence_str().to_string();
        }
    }

    mime_guess::from_path(filename)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| FALLBACK_MIME.to_string())
}

fn has_text_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| TEXT_EXTENSIONS.iter().any(|t| ext.eq_ignore_ascii_case(t)))
        .unwrap_or(false)
}

/// Text content of textual uploads, empty for everything else.
pub fn extract_text(filename: &str, mime: &str, bytes: &[u8]) -> String {
    if !(mime.starts_with("text/") || has_text_extension(filename)) {
        return String::new();
    }

    String::from_utf8_lossy(bytes)
        .chars()
        .take(MAX_EXTRACTED_CHARS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_mime() {
        assert_eq!(safe_mime("a.bin", Some("text/plain; charset=utf-8")), "text/plain");
        assert_eq!(safe_mime("report.csv", None), "text/csv");
        assert_eq!(safe_mime("report.csv", Some("  ")), "text/csv");
        assert_eq!(safe_mime("blob", Some("not a mime")), FALLBACK_MIME);
    }

    #[test]
    fn test_extract_text_only_for_text_files() {
        assert_eq!(extract_text("notes.md", FALLBACK_MIME, b"# hi"), "# hi");
        assert_eq!(extract_text("x", "text/plain", b"plain"), "plain");
        assert_eq!(extract_text("photo.png", "image/png", b"\x89PNG"), "");
    }

    #[test]
    fn test_extract_text_is_capped() {
        let big = vec![b'a'; MAX_EXTRACTED_CHARS + 10];
        assert_eq!(extract_text("big.log", "text/plain", &big).len(), MAX_EXTRACTED_CHARS);
    }
}
