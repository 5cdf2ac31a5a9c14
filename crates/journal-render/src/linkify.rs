//! Autolinking of bare URLs that CommonMark leaves as plain text.

use std::sync::LazyLock;

use pulldown_cmark::{CowStr, Event, LinkType, Tag};
use regex::Regex;

static BARE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:https?://|www\.)[^\s<>"'`]+"#).expect("bare url pattern compiles")
});

/// Rewrite text events so bare `http(s)://` and `www.` URLs become links.
///
/// Text inside links, images, code blocks and raw `<a href>` elements is left
/// alone. A raw anchor only suppresses linking until its block ends.
pub(crate) fn autolink(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut output = Vec::with_capacity(events.len());
    let mut link_depth = 0usize;
    let mut in_code_block = false;
    let mut in_html_anchor = false;

    for event in coalesce_text(events) {
        match &event {
            Event::Start(Tag::Link(..)) | Event::Start(Tag::Image(..)) => link_depth += 1,
            Event::End(Tag::Link(..)) | Event::End(Tag::Image(..)) => {
                link_depth = link_depth.saturating_sub(1)
            }
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(Tag::CodeBlock(_)) => in_code_block = false,
            Event::Html(html) => track_html_anchor(html, &mut in_html_anchor),
            Event::Start(tag) | Event::End(tag) if is_text_block(tag) => in_html_anchor = false,
            Event::Text(text)
                if link_depth == 0
                    && !in_code_block
                    && !in_html_anchor
                    && BARE_URL.is_match(text) =>
            {
                split_urls(text, &mut output);
                continue;
            }
            _ => {}
        }
        output.push(event);
    }

    output
}

/// The parser may split one run of text into several events around delimiter
/// characters; URLs can only be found once those pieces are joined again.
fn coalesce_text(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut merged: Vec<Event<'_>> = Vec::with_capacity(events.len());
    for event in events {
        if let Event::Text(next) = &event {
            if let Some(Event::Text(previous)) = merged.last_mut() {
                let mut joined = previous.to_string();
                joined.push_str(next);
                *previous = CowStr::from(joined);
                continue;
            }
        }
        merged.push(event);
    }
    merged
}

/// Blocks whose text is linked independently of what came before.
fn is_text_block(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::Paragraph | Tag::Heading(..) | Tag::Item | Tag::TableCell | Tag::BlockQuote
    )
}

fn track_html_anchor(html: &str, in_anchor: &mut bool) {
    let lower = html.trim_start().to_ascii_lowercase();
    let tag = lower.split('>').next().unwrap_or("");
    if tag.starts_with("</a") {
        *in_anchor = false;
    } else if let Some(attrs) = tag.strip_prefix("<a") {
        // Named and id-only anchors are targets, not links.
        if attrs.starts_with(char::is_whitespace) && attrs.contains("href") {
            *in_anchor = true;
        }
    }
}

fn split_urls<'a>(text: &str, output: &mut Vec<Event<'a>>) {
    let mut cursor = 0usize;

    for found in BARE_URL.find_iter(text) {
        let url = trim_trailing_punctuation(found.as_str());
        if !has_host(url) {
            continue;
        }

        let start = found.start();
        if start > cursor {
            output.push(Event::Text(CowStr::from(text[cursor..start].to_string())));
        }

        let href = if url.len() >= 4 && url[..4].eq_ignore_ascii_case("www.") {
            format!("http://{url}")
        } else {
            url.to_string()
        };

        output.push(Event::Start(Tag::Link(
            LinkType::Autolink,
            CowStr::from(href.clone()),
            CowStr::Borrowed(""),
        )));
        output.push(Event::Text(CowStr::from(url.to_string())));
        output.push(Event::End(Tag::Link(
            LinkType::Autolink,
            CowStr::from(href),
            CowStr::Borrowed(""),
        )));

        cursor = start + url.len();
    }

    if cursor < text.len() {
        output.push(Event::Text(CowStr::from(text[cursor..].to_string())));
    }
}

fn has_host(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .or_else(|| lower.strip_prefix("www."))
        .unwrap_or("");
    rest.chars().any(|ch| ch.is_ascii_alphanumeric())
}

fn trim_trailing_punctuation(url: &str) -> &str {
    let mut end = url.len();
    while let Some(last) = url[..end].chars().last() {
        let candidate = &url[..end];
        let strip = match last {
            '.' | ',' | ':' | ';' | '!' | '?' | '*' | '_' | '~' => true,
            ')' => candidate.matches(')').count() > candidate.matches('(').count(),
            _ => false,
        };
        if !strip {
            break;
        }
        end -= last.len_utf8();
    }
    &url[..end]
}
