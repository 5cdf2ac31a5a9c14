//! Content loading for the journal: markdown files on disk become typed records
//! ready for templates.

mod error;
pub mod extract;
pub mod frontmatter;
pub mod listing;
pub mod models;
mod store;

pub use error::{ContentError, ContentResult};
pub use frontmatter::{parse_frontmatter, Frontmatter};
pub use listing::{
    filter_by_tags, group_by_year, shelf_sections, sort_newest_first, tag_counts, years,
    ShelfSection, ShelfSectionDef, TagFilter, YearGroup, SHELF_SECTIONS,
};
pub use models::{About, Article, Dated, Fragment, Pixel, ShelfItem};
pub use store::{ContentKind, ContentStore};
