use pulldown_cmark::escape::escape_html;

use crate::heading::Heading;

const NAV_OPEN: &str = r#"<nav class="toc-nav" aria-label="Table of contents">"#;
const NAV_CLOSE: &str = "</nav>";

/// Ordered-list numbering style for a nesting depth (1-based), cycling every
/// three levels.
pub fn list_type_for_depth(depth: usize) -> &'static str {
    match depth.saturating_sub(1) % 3 {
        0 => "1",
        1 => "a",
        _ => "i",
    }
}

/// One `<ol>` currently open while writing the table of contents.
#[derive(Debug, Default)]
struct OpenList {
    item_open: bool,
}

/// Build nested `<ol>` navigation markup for the provided headings.
///
/// The shallowest heading level present becomes depth 1. Moving deeper opens
/// one list per level stepped; moving shallower closes them again. An empty
/// heading list produces an empty string rather than an empty `<nav>`.
pub fn build_toc(headings: &[Heading]) -> String {
    let Some(base_level) = headings.iter().map(|heading| heading.level).min() else {
        return String::new();
    };

    let mut out = String::from(NAV_OPEN);
    let mut stack: Vec<OpenList> = Vec::new();

    for heading in headings {
        let depth = (usize::from(heading.level) + 1)
            .saturating_sub(usize::from(base_level))
            .max(1);

        while stack.len() > depth {
            close_list(&mut out, &mut stack);
        }

        while stack.len() < depth {
            let next_depth = stack.len() + 1;
            out.push_str(&format!(
                r#"<ol class="toc-list toc-depth-{next_depth}" type="{}">"#,
                list_type_for_depth(next_depth)
            ));
            stack.push(OpenList::default());
        }

        if let Some(list) = stack.last_mut() {
            if list.item_open {
                out.push_str("</li>");
            }
            list.item_open = true;
        }

        out.push_str("<li><a href=\"#");
        push_escaped(&mut out, &heading.id);
        out.push_str("\">");
        push_escaped(&mut out, &heading.text);
        out.push_str("</a>");
    }

    while !stack.is_empty() {
        close_list(&mut out, &mut stack);
    }

    out.push_str(NAV_CLOSE);
    out
}

fn close_list(out: &mut String, stack: &mut Vec<OpenList>) {
    if let Some(list) = stack.pop() {
        if list.item_open {
            out.push_str("</li>");
        }
        out.push_str("</ol>");
    }
}

fn push_escaped(out: &mut String, text: &str) {
    escape_html(&mut *out, text).ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn heading(level: u8, text: &str, id: &str) -> Heading {
        Heading {
            level,
            text: text.to_string(),
            id: id.to_string(),
        }
    }

    #[test]
    fn empty_input_produces_nothing() {
        assert_eq!(build_toc(&[]), "");
    }

    #[test]
    fn flat_list_closes_items_between_siblings() {
        let toc = build_toc(&[heading(2, "One", "one"), heading(2, "Two", "two")]);
        assert_eq!(
            toc,
            concat!(
                r#"<nav class="toc-nav" aria-label="Table of contents">"#,
                r#"<ol class="toc-list toc-depth-1" type="1">"#,
                r##"<li><a href="#one">One</a></li>"##,
                r##"<li><a href="#two">Two</a></li>"##,
                "</ol></nav>"
            )
        );
    }

    #[test]
    fn nested_list_lives_inside_parent_item() {
        let toc = build_toc(&[
            heading(2, "Parent", "parent"),
            heading(3, "Child", "child"),
            heading(2, "Next", "next"),
        ]);
        assert_eq!(
            toc,
            concat!(
                r#"<nav class="toc-nav" aria-label="Table of contents">"#,
                r#"<ol class="toc-list toc-depth-1" type="1">"#,
                r##"<li><a href="#parent">Parent</a>"##,
                r#"<ol class="toc-list toc-depth-2" type="a">"#,
                r##"<li><a href="#child">Child</a></li></ol></li>"##,
                r##"<li><a href="#next">Next</a></li>"##,
                "</ol></nav>"
            )
        );
    }

    #[test]
    fn base_level_is_the_shallowest_heading() {
        let toc = build_toc(&[heading(3, "A", "a"), heading(4, "B", "b")]);
        assert!(toc.contains(r##"toc-depth-1" type="1"><li><a href="#a">"##));
        assert!(toc.contains(r##"toc-depth-2" type="a"><li><a href="#b">"##));
        assert!(!toc.contains("toc-depth-3"));
    }

    #[test]
    fn level_jumps_open_one_list_per_step() {
        let toc = build_toc(&[
            heading(2, "A", "a"),
            heading(3, "B", "b"),
            heading(2, "C", "c"),
            heading(4, "D", "d"),
        ]);

        assert_eq!(toc.matches("<ol ").count(), toc.matches("</ol>").count());
        assert_eq!(toc.matches("<li>").count(), toc.matches("</li>").count());
        assert_eq!(toc.matches("toc-depth-2").count(), 2);
        assert_eq!(toc.matches("toc-depth-3").count(), 1);
        assert!(toc.contains(r##"type="a"><ol class="toc-list toc-depth-3" type="i"><li><a href="#d">"##));
    }

    #[test]
    fn labels_are_escaped() {
        let toc = build_toc(&[heading(2, "<script> & \"quotes\"", "x")]);
        assert!(toc.contains("&lt;script&gt; &amp; &quot;quotes&quot;"));
        assert!(!toc.contains("<script>"));
    }

    #[test]
    fn ids_are_escaped_in_hrefs() {
        let toc = build_toc(&[heading(3, "Quoted", "say-\"hi\"&more")]);
        assert!(toc.contains(r##"<a href="#say-&quot;hi&quot;&amp;more">Quoted</a>"##));
    }

    #[test]
    fn list_types_cycle_every_three_levels() {
        let styles: Vec<_> = (1..=7).map(list_type_for_depth).collect();
        assert_eq!(styles, vec!["1", "a", "i", "1", "a", "i", "1"]);
    }
}
