//! Derive listing metadata (title, summary, date) from frontmatter or body.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use journal_render::plain_text;
use regex::Regex;

use crate::frontmatter::Frontmatter;

pub const UNTITLED: &str = "Untitled";

static INLINE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").expect("inline link pattern compiles"));

/// `title` from frontmatter, else the first `# ` heading line, else `Untitled`.
pub fn extract_title(body: &str, frontmatter: &Frontmatter) -> String {
    if let Some(title) = frontmatter.get("title") {
        return title.to_string();
    }

    body.lines()
        .filter_map(|line| line.strip_prefix("# "))
        .map(plain_text)
        .find(|title| !title.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// `summary` from frontmatter, else the first prose paragraph stripped of
/// emphasis markers and link targets, cut to `max_chars` characters.
pub fn extract_summary(body: &str, frontmatter: &Frontmatter, max_chars: usize) -> String {
    if let Some(summary) = frontmatter.get("summary") {
        return summary.to_string();
    }

    let normalized = body.replace("\r\n", "\n");
    for paragraph in normalized.split("\n\n") {
        let trimmed = paragraph.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let stripped = trimmed.replace("**", "").replace(['*', '_'], "");
        let unlinked = INLINE_LINK.replace_all(&stripped, "$1");
        let plain = unlinked.split_whitespace().collect::<Vec<_>>().join(" ");

        return truncate_chars(&plain, max_chars);
    }

    String::new()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Publication date: frontmatter `date`, else the file's modification time,
/// else the current time.
pub fn extract_date(path: &Path, frontmatter: &Frontmatter) -> DateTime<Utc> {
    if let Some(raw) = frontmatter.get("date") {
        if let Some(date) = parse_date(raw) {
            return date;
        }
        tracing::warn!(path = %path.display(), value = raw, "unrecognised date in frontmatter");
    }

    match fs::metadata(path).and_then(|meta| meta.modified()) {
        Ok(modified) => DateTime::<Utc>::from(modified),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "no modification time, using now");
            Utc::now()
        }
    }
}

/// Parse `YYYY-MM-DD`, RFC 3339, or `YYYY-MM-DD HH:MM:SS` (read as UTC).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive));
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::parse_frontmatter;
    use chrono::{Datelike, Timelike};

    fn empty() -> Frontmatter {
        Frontmatter::default()
    }

    #[test]
    fn title_prefers_frontmatter() {
        let (frontmatter, body) = parse_frontmatter("---\ntitle: Given\n---\n# Heading\n");
        assert_eq!(extract_title(body, &frontmatter), "Given");
    }

    #[test]
    fn title_falls_back_to_first_h1_then_untitled() {
        assert_eq!(
            extract_title("intro\n\n# The *Real* Title\n\n# Second", &empty()),
            "The Real Title"
        );
        assert_eq!(extract_title("## Not an h1\n", &empty()), UNTITLED);
    }

    #[test]
    fn summary_uses_first_prose_paragraph() {
        let body = "# Title\n\nSome **bold** and _quiet_ words with [a link](https://x.io).\n\nMore.";
        assert_eq!(
            extract_summary(body, &empty(), 220),
            "Some bold and quiet words with a link."
        );
    }

    #[test]
    fn summary_truncates_on_character_boundaries() {
        let body = "ééééé ééééé";
        assert_eq!(extract_summary(body, &empty(), 4), "éééé...");
        assert_eq!(extract_summary("short", &empty(), 5), "short");
    }

    #[test]
    fn summary_from_frontmatter_is_not_truncated() {
        let (frontmatter, body) = parse_frontmatter("---\nsummary: Handwritten blurb\n---\nBody");
        assert_eq!(extract_summary(body, &frontmatter, 3), "Handwritten blurb");
    }

    #[test]
    fn summary_of_heading_only_document_is_empty() {
        assert_eq!(extract_summary("# Only\n\n## Headings\n", &empty(), 10), "");
    }

    #[test]
    fn parses_supported_date_formats() {
        let day = parse_date("2023-07-04").unwrap();
        assert_eq!((day.year(), day.month(), day.day()), (2023, 7, 4));

        let rfc = parse_date("2023-07-04T10:30:00+02:00").unwrap();
        assert_eq!(rfc.hour(), 8);

        let spaced = parse_date("2023-07-04 23:15:00").unwrap();
        assert_eq!(spaced.minute(), 15);

        assert!(parse_date("July 4th").is_none());
    }

    #[test]
    fn missing_file_and_date_fall_back_to_now() {
        let before = Utc::now();
        let date = extract_date(Path::new("/definitely/not/here.md"), &empty());
        assert!(date >= before);
    }
}
