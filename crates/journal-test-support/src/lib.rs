//! Shared test harness utilities for journal crates.

use std::fs;
use std::path::{Path, PathBuf};

use journal_config::Config;
use tempfile::TempDir;

/// Temporary site directory with a `content/` tree beneath it.
pub struct ContentFixture {
    dir: TempDir,
}

impl ContentFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(dir.path().join("content")).expect("create content root");
        ContentFixture { dir }
    }

    /// Site directory (holds `journal.toml`, `content/`, `static/`).
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn content_root(&self) -> PathBuf {
        self.dir.path().join("content")
    }

    /// Writes `contents` to `relative` under the content root, creating parents.
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        write_file(&self.content_root(), relative, contents)
    }

    /// Writes `contents` to `relative` under the site directory.
    pub fn write_site_file(&self, relative: &str, contents: &str) -> PathBuf {
        write_file(self.dir.path(), relative, contents)
    }

    pub fn article(&self, slug: &str, frontmatter: &str, body: &str) -> PathBuf {
        self.write(&format!("articles/{slug}.md"), &document(frontmatter, body))
    }

    pub fn fragment(&self, slug: &str, frontmatter: &str, body: &str) -> PathBuf {
        self.write(&format!("fragments/{slug}.md"), &document(frontmatter, body))
    }

    pub fn shelf_item(&self, category: &str, slug: &str, frontmatter: &str, body: &str) -> PathBuf {
        self.write(
            &format!("shelf/{category}/{slug}.md"),
            &document(frontmatter, body),
        )
    }

    pub fn pixel(&self, slug: &str, frontmatter: &str, body: &str) -> PathBuf {
        self.write(&format!("pixels/{slug}.md"), &document(frontmatter, body))
    }

    pub fn about(&self, frontmatter: &str, body: &str) -> PathBuf {
        self.write("about/about.md", &document(frontmatter, body))
    }

    /// Defaults resolved against the fixture directory.
    pub fn config(&self) -> Config {
        Config::defaults_in(self.dir.path())
    }
}

impl Default for ContentFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Joins a frontmatter block (without delimiters) and a body into one file.
pub fn document(frontmatter: &str, body: &str) -> String {
    if frontmatter.trim().is_empty() {
        body.to_string()
    } else {
        format!("---\n{}\n---\n{body}", frontmatter.trim())
    }
}

fn write_file(base: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = base.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(&path, contents).expect("write fixture file");
    path
}
