use pulldown_cmark::{Event, HeadingLevel, Options, Parser};

/// Heading collected for the table of contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    pub id: String,
}

/// Heading being accumulated between its start and end events.
#[derive(Debug)]
pub(crate) struct PendingHeading {
    pub level: u8,
    pub explicit_id: Option<String>,
    text: String,
}

impl PendingHeading {
    pub fn new(level: HeadingLevel, explicit_id: Option<&str>) -> Self {
        Self {
            level: heading_depth(level),
            explicit_id: explicit_id.map(str::to_owned),
            text: String::new(),
        }
    }

    /// Feed one inline event. Markup and raw HTML contribute nothing.
    pub fn push_event(&mut self, event: &Event<'_>) {
        match event {
            Event::Text(text) | Event::Code(text) => self.text.push_str(text),
            Event::SoftBreak | Event::HardBreak => self.text.push(' '),
            Event::FootnoteReference(name) => self.text.push_str(name),
            _ => {}
        }
    }

    /// Flattened heading text with whitespace collapsed.
    pub fn plain_text(&self) -> String {
        collapse_whitespace(&self.text)
    }
}

pub(crate) fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Strip inline markdown from a single line of text, leaving what a reader sees.
pub fn plain_text(input: &str) -> String {
    let mut text = String::new();
    for event in Parser::new_ext(input, Options::ENABLE_STRIKETHROUGH) {
        match event {
            Event::Text(cow) | Event::Code(cow) => text.push_str(&cow),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    collapse_whitespace(&text)
}

fn collapse_whitespace(input: &str) -> String {
    let mut collapsed = String::with_capacity(input.len());
    for (idx, segment) in input.split_whitespace().enumerate() {
        if idx > 0 {
            collapsed.push(' ');
        }
        collapsed.push_str(segment);
    }
    collapsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_drops_inline_formatting() {
        assert_eq!(plain_text("Heading **Text**"), "Heading Text");
        assert_eq!(plain_text("with [link](url) and `code`"), "with link and code");
        assert_eq!(plain_text("  spaced    out  "), "spaced out");
    }

    #[test]
    fn pending_heading_collects_text_events() {
        let mut pending = PendingHeading::new(HeadingLevel::H3, Some("custom"));
        pending.push_event(&Event::Text("Hello".into()));
        pending.push_event(&Event::SoftBreak);
        pending.push_event(&Event::Html("<br>".into()));
        pending.push_event(&Event::Code("world".into()));

        assert_eq!(pending.level, 3);
        assert_eq!(pending.explicit_id.as_deref(), Some("custom"));
        assert_eq!(pending.plain_text(), "Hello world");
    }
}
