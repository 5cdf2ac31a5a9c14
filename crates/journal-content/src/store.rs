use std::fs;
use std::path::{Path, PathBuf};

use journal_config::{ContentSettings, PatternList, DEFAULT_SUMMARY_LENGTH};
use journal_render::{render_markdown, Rendered};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::error::{ContentError, ContentResult};
use crate::extract::{extract_date, extract_summary, extract_title};
use crate::frontmatter::{parse_frontmatter, Frontmatter};
use crate::models::{About, Article, Fragment, Pixel, ShelfItem};

const DEFAULT_SHELF_CATEGORY: &str = "books";
const MARKDOWN_EXTENSION: &str = "md";

/// Directory layout of each listable content type beneath the content root.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContentKind {
    Articles,
    Fragments,
    Shelf,
    Pixels,
}

impl ContentKind {
    pub fn dir_name(self) -> &'static str {
        match self {
            ContentKind::Articles => "articles",
            ContentKind::Fragments => "fragments",
            ContentKind::Shelf => "shelf",
            ContentKind::Pixels => "pixels",
        }
    }

    /// Depth of the markdown files below the kind's directory.
    fn depth(self) -> usize {
        match self {
            ContentKind::Shelf => 2,
            _ => 1,
        }
    }
}

/// One markdown file read, split and rendered.
struct SourceDocument {
    path: PathBuf,
    slug: String,
    frontmatter: Frontmatter,
    body: String,
    rendered: Rendered,
}

/// Reads content from disk on every call; nothing is cached between requests.
#[derive(Clone, Debug)]
pub struct ContentStore {
    root: PathBuf,
    exclude: PatternList,
    summary_length: usize,
}

impl ContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclude: PatternList::default(),
            summary_length: DEFAULT_SUMMARY_LENGTH,
        }
    }

    pub fn from_settings(settings: &ContentSettings) -> Self {
        Self {
            root: settings.root.clone(),
            exclude: settings.exclude.clone(),
            summary_length: settings.summary_length,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn articles(&self) -> ContentResult<Vec<Article>> {
        let documents = self.load(ContentKind::Articles)?;
        Ok(documents
            .into_iter()
            .map(|doc| Article {
                title: extract_title(&doc.body, &doc.frontmatter),
                summary: extract_summary(&doc.body, &doc.frontmatter, self.summary_length),
                date: extract_date(&doc.path, &doc.frontmatter),
                tags: doc.frontmatter.tags(),
                html: doc.rendered.html,
                toc: doc.rendered.toc,
                slug: doc.slug,
            })
            .collect())
    }

    pub fn article(&self, slug: &str) -> ContentResult<Option<Article>> {
        Ok(self.articles()?.into_iter().find(|a| a.slug == slug))
    }

    pub fn fragments(&self) -> ContentResult<Vec<Fragment>> {
        let documents = self.load(ContentKind::Fragments)?;
        Ok(documents
            .into_iter()
            .map(|doc| Fragment {
                title: extract_title(&doc.body, &doc.frontmatter),
                image: doc.frontmatter.get("image").map(str::to_owned),
                date: extract_date(&doc.path, &doc.frontmatter),
                html: doc.rendered.html,
                slug: doc.slug,
            })
            .collect())
    }

    pub fn fragment(&self, slug: &str) -> ContentResult<Option<Fragment>> {
        Ok(self.fragments()?.into_iter().find(|f| f.slug == slug))
    }

    pub fn shelf_items(&self) -> ContentResult<Vec<ShelfItem>> {
        let documents = self.load(ContentKind::Shelf)?;
        Ok(documents
            .into_iter()
            .map(|doc| ShelfItem {
                title: extract_title(&doc.body, &doc.frontmatter),
                category: shelf_category(&doc.path, &doc.frontmatter),
                summary: extract_summary(&doc.body, &doc.frontmatter, self.summary_length),
                date: extract_date(&doc.path, &doc.frontmatter),
                html: doc.rendered.html,
                slug: doc.slug,
            })
            .collect())
    }

    pub fn shelf_item(&self, slug: &str) -> ContentResult<Option<ShelfItem>> {
        Ok(self.shelf_items()?.into_iter().find(|item| item.slug == slug))
    }

    pub fn pixels(&self) -> ContentResult<Vec<Pixel>> {
        let documents = self.load(ContentKind::Pixels)?;
        Ok(documents
            .into_iter()
            .map(|doc| Pixel {
                title: extract_title(&doc.body, &doc.frontmatter),
                image: doc.frontmatter.get("image").map(str::to_owned),
                date: extract_date(&doc.path, &doc.frontmatter),
                html: doc.rendered.html,
                slug: doc.slug,
            })
            .collect())
    }

    /// The single `about/about.md` page.
    pub fn about(&self) -> ContentResult<About> {
        let path = self.root.join("about").join("about.md");
        if !path.is_file() {
            return Err(ContentError::NotFound { path });
        }

        let doc = read_document(path)?;
        Ok(About {
            image: doc.frontmatter.get("image").map(str::to_owned),
            date: extract_date(&doc.path, &doc.frontmatter),
            html: doc.rendered.html,
            slug: doc.slug,
        })
    }

    /// Markdown files for `kind`, in path order. A missing directory is empty.
    pub fn paths(&self, kind: ContentKind) -> ContentResult<Vec<PathBuf>> {
        let dir = self.root.join(kind.dir_name());
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "content directory missing, treating as empty");
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        let walker = WalkDir::new(&dir)
            .min_depth(kind.depth())
            .max_depth(kind.depth())
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|source| ContentError::Scan {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown(path) {
                continue;
            }
            if self.is_excluded(path) {
                tracing::debug!(path = %path.display(), "skipping excluded content");
                continue;
            }
            paths.push(path.to_path_buf());
        }

        Ok(paths)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.exclude.matches(relative)
    }

    fn load(&self, kind: ContentKind) -> ContentResult<Vec<SourceDocument>> {
        let paths = self.paths(kind)?;
        let documents = paths
            .into_par_iter()
            .map(read_document)
            .collect::<ContentResult<Vec<_>>>()?;

        tracing::debug!(kind = kind.dir_name(), count = documents.len(), "loaded content");
        Ok(documents)
    }
}

fn read_document(path: PathBuf) -> ContentResult<SourceDocument> {
    let source = fs::read_to_string(&path).map_err(|source| ContentError::Read {
        path: path.clone(),
        source,
    })?;

    let (frontmatter, body) = parse_frontmatter(&source);
    let rendered = render_markdown(body).map_err(|source| ContentError::Render {
        path: path.clone(),
        source,
    })?;

    Ok(SourceDocument {
        slug: slug_for(&path),
        body: body.to_string(),
        frontmatter,
        rendered,
        path,
    })
}

fn slug_for(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case(MARKDOWN_EXTENSION))
        .unwrap_or(false)
}

/// `category` from frontmatter, else the containing directory name, else books.
fn shelf_category(path: &Path, frontmatter: &Frontmatter) -> String {
    frontmatter
        .get("category")
        .map(str::to_owned)
        .or_else(|| {
            path.parent()
                .and_then(Path::file_name)
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| DEFAULT_SHELF_CATEGORY.to_string())
        .to_lowercase()
}
