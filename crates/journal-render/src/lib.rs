//! Markdown rendering for the journal content server.
//!
//! [`render_markdown`] turns a markdown body into HTML and, from the same parse
//! pass, a table of contents whose links point at the `id` attributes injected
//! into the rendered headings.

mod error;
mod heading;
mod linkify;
mod markdown;
mod slug;
mod toc;

pub use error::{RenderError, RenderResult};
pub use heading::{plain_text, Heading};
pub use markdown::{render_markdown, Rendered};
pub use slug::{slugify, IdRegistry, FALLBACK_SLUG};
pub use toc::{build_toc, list_type_for_depth};
