use pulldown_cmark::{html, Event, Options, Parser, Tag};

use crate::error::RenderResult;
use crate::heading::{Heading, PendingHeading};
use crate::linkify::autolink;
use crate::slug::{slugify, IdRegistry};
use crate::toc::build_toc;

/// Heading levels that appear in the table of contents.
const TOC_LEVELS: std::ops::RangeInclusive<u8> = 2..=4;

/// Output of a single render call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rendered {
    /// Body HTML with an `id` on every table-of-contents heading.
    pub html: String,
    /// Navigation markup, empty when the document has no level 2-4 headings.
    pub toc: String,
    /// Headings listed in `toc`, in document order.
    pub headings: Vec<Heading>,
}

fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    options
}

/// Render markdown into HTML plus a table of contents.
///
/// Raw HTML in the source is passed through untouched. Both outputs come from
/// one parse, so every TOC link targets an `id` present in `html`.
pub fn render_markdown(source: &str) -> RenderResult<Rendered> {
    let events = autolink(Parser::new_ext(source, parser_options()).collect());
    let (headings, ids) = resolve_headings(&events);
    let html = write_html(&events, &ids)?;
    let toc = build_toc(&headings);

    Ok(Rendered { html, toc, headings })
}

/// Assign anchor ids in document order.
///
/// Returns the table-of-contents headings and, for every heading in the
/// document, the id to emit on its element (if any).
fn resolve_headings(events: &[Event<'_>]) -> (Vec<Heading>, Vec<Option<String>>) {
    let mut registry = IdRegistry::new();
    let mut headings = Vec::new();
    let mut ids = Vec::new();
    let mut current: Option<PendingHeading> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading(level, explicit_id, _)) => {
                current = Some(PendingHeading::new(*level, *explicit_id));
            }
            Event::End(Tag::Heading(..)) => {
                let Some(pending) = current.take() else {
                    continue;
                };
                let text = pending.plain_text();

                if TOC_LEVELS.contains(&pending.level) && !text.is_empty() {
                    let base = match pending.explicit_id {
                        Some(explicit) => explicit,
                        None => slugify(&text),
                    };
                    let id = registry.assign(&base);
                    ids.push(Some(id.clone()));
                    headings.push(Heading {
                        level: pending.level,
                        text,
                        id,
                    });
                } else {
                    ids.push(pending.explicit_id.map(|explicit| registry.assign(&explicit)));
                }
            }
            other => {
                if let Some(pending) = current.as_mut() {
                    pending.push_event(other);
                }
            }
        }
    }

    (headings, ids)
}

fn write_html<'a>(events: &[Event<'a>], ids: &'a [Option<String>]) -> RenderResult<String> {
    let mut next_heading = 0usize;
    let stream = events.iter().map(|event| match event {
        Event::Start(Tag::Heading(level, _, classes)) => {
            let id = ids.get(next_heading).and_then(|id| id.as_deref());
            next_heading += 1;
            Event::Start(Tag::Heading(*level, id, classes.clone()))
        }
        other => other.clone(),
    });

    let mut buffer = Vec::new();
    html::write_html(&mut buffer, stream)?;
    Ok(String::from_utf8(buffer)?)
}
