use std::collections::HashSet;

use journal_render::{render_markdown, slugify};
use pretty_assertions::assert_eq;
use regex::Regex;

const ARTICLE: &str = r#"# Field Notes

Some intro text with a link to https://example.com.

## Intro

First pass.

### Setup & Tools

| tool | use |
|------|-----|
| rg   | search |

## Intro

~~Old~~ new take.

#### Deep *Dive*

##### Too deep for the toc

## C++ & Go: A Comparison!
"#;

fn body_ids(html: &str) -> Vec<String> {
    let pattern = Regex::new(r#"<h[1-6] id="([^"]+)""#).unwrap();
    pattern
        .captures_iter(html)
        .map(|caps| caps[1].to_string())
        .collect()
}

fn toc_targets(toc: &str) -> Vec<String> {
    let pattern = Regex::new(r##"href="#([^"]+)""##).unwrap();
    pattern
        .captures_iter(toc)
        .map(|caps| caps[1].to_string())
        .collect()
}

#[test]
fn toc_links_match_heading_ids_in_order() {
    let rendered = render_markdown(ARTICLE).expect("render article");

    let ids = body_ids(&rendered.html);
    let targets = toc_targets(&rendered.toc);

    assert_eq!(
        targets,
        vec![
            "intro",
            "setup-tools",
            "intro-1",
            "deep-dive",
            "c-go-a-comparison"
        ]
    );
    assert_eq!(ids, targets);
}

#[test]
fn every_emitted_id_is_unique() {
    let source = "## A\n\n## A\n\n## A 1\n\n### A\n\n## a-1\n";
    let rendered = render_markdown(source).expect("render");
    let ids = body_ids(&rendered.html);

    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len(), "duplicate ids in {ids:?}");
    assert_eq!(ids, vec!["a", "a-1", "a-1-1", "a-2", "a-1-2"]);
}

#[test]
fn duplicate_titles_get_numbered_suffixes() {
    let rendered = render_markdown("## Intro\n\n## Intro\n").expect("render");
    let ids: Vec<_> = rendered.headings.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["intro", "intro-1"]);
}

#[test]
fn document_without_headings_has_empty_toc() {
    let rendered = render_markdown("Just a paragraph.\n\n# Only a title\n").expect("render");
    assert_eq!(rendered.toc, "");
    assert!(rendered.headings.is_empty());
    assert!(rendered.html.contains("<h1>Only a title</h1>"));
}

#[test]
fn rendering_is_repeatable() {
    let first = render_markdown(ARTICLE).expect("first render");
    let second = render_markdown(ARTICLE).expect("second render");
    assert_eq!(first, second);
}

#[test]
fn outer_heading_levels_stay_out_of_toc() {
    let rendered = render_markdown(ARTICLE).expect("render");
    assert!(rendered.html.contains("<h1>Field Notes</h1>"));
    assert!(rendered.html.contains("<h5>Too deep for the toc</h5>"));
    assert!(!rendered.toc.contains("Field Notes"));
    assert!(!rendered.toc.contains("Too deep"));
}

#[test]
fn toc_depths_follow_heading_levels() {
    let rendered = render_markdown("## A\n\n### B\n\n## C\n\n#### D\n").expect("render");
    let toc = &rendered.toc;

    let opens = toc.matches("<ol ").count();
    let closes = toc.matches("</ol>").count();
    assert_eq!(opens, closes);
    assert_eq!(opens, 4);
    assert!(toc.starts_with(r#"<nav class="toc-nav" aria-label="Table of contents">"#));
    assert!(toc.ends_with("</ol></nav>"));
}

#[test]
fn extensions_are_enabled() {
    let rendered = render_markdown(ARTICLE).expect("render");
    assert!(rendered.html.contains("<table>"));
    assert!(rendered.html.contains("<del>Old</del>"));
    assert!(rendered
        .html
        .contains(r#"<a href="https://example.com">https://example.com</a>."#));
}

#[test]
fn raw_html_passes_through_but_toc_labels_are_escaped() {
    let source = "<div class=\"note\">kept</div>\n\n## Use `<T>` generics\n";
    let rendered = render_markdown(source).expect("render");
    assert!(rendered.html.contains("<div class=\"note\">kept</div>"));
    assert!(rendered.toc.contains("Use &lt;T&gt; generics"));
    assert_eq!(rendered.headings[0].id, slugify("Use <T> generics"));
}

#[test]
fn heading_text_is_flattened_before_slugging() {
    let rendered =
        render_markdown("## The **bold** and [linked](https://x.example) parts\n").expect("render");
    assert_eq!(rendered.headings[0].text, "The bold and linked parts");
    assert_eq!(rendered.headings[0].id, "the-bold-and-linked-parts");
}
