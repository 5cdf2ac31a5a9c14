//! Ordering, grouping and filtering of loaded records for listing pages.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Article, Dated, ShelfItem};

/// Sort so the most recent record comes first. Ties keep their load order.
pub fn sort_newest_first<T: Dated>(items: &mut [T]) {
    items.sort_by_key(|item| std::cmp::Reverse(item.date()));
}

/// Records published in one calendar year.
#[derive(Clone, Debug, Serialize)]
pub struct YearGroup<T> {
    pub year: i32,
    pub items: Vec<T>,
}

/// Group records by year, newest year first and newest record first within it.
pub fn group_by_year<T: Dated>(mut items: Vec<T>) -> Vec<YearGroup<T>> {
    sort_newest_first(&mut items);

    let mut by_year: BTreeMap<i32, Vec<T>> = BTreeMap::new();
    for item in items {
        by_year.entry(item.year()).or_default().push(item);
    }

    by_year
        .into_iter()
        .rev()
        .map(|(year, items)| YearGroup { year, items })
        .collect()
}

/// Years present in `groups`, in the same (descending) order.
pub fn years<T>(groups: &[YearGroup<T>]) -> Vec<i32> {
    groups.iter().map(|group| group.year).collect()
}

/// Tags requested through `?tags=a,b`; an article matches when it has any.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagFilter {
    tags: Vec<String>,
}

impl TagFilter {
    pub fn parse(query: Option<&str>) -> Self {
        let tags = query
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_owned)
            .collect();
        Self { tags }
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn matches(&self, article: &Article) -> bool {
        self.is_empty() || article.tags.iter().any(|tag| self.tags.contains(tag))
    }
}

pub fn filter_by_tags(articles: Vec<Article>, filter: &TagFilter) -> Vec<Article> {
    articles
        .into_iter()
        .filter(|article| filter.matches(article))
        .collect()
}

/// Number of articles carrying each tag, sorted by tag name.
pub fn tag_counts(articles: &[Article]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for tag in articles.iter().flat_map(|article| &article.tags) {
        *counts.entry(tag.clone()).or_insert(0) += 1;
    }
    counts
}

/// Fixed shelf section used for navigation and grouping.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ShelfSectionDef {
    pub key: &'static str,
    pub title: &'static str,
}

pub const SHELF_SECTIONS: [ShelfSectionDef; 3] = [
    ShelfSectionDef {
        key: "books",
        title: "Bookshelf",
    },
    ShelfSectionDef {
        key: "papers",
        title: "Papers",
    },
    ShelfSectionDef {
        key: "misc",
        title: "Miscellany",
    },
];

#[derive(Clone, Debug, Serialize)]
pub struct ShelfSection {
    pub key: &'static str,
    pub title: &'static str,
    pub items: Vec<ShelfItem>,
}

/// Bucket shelf items into [`SHELF_SECTIONS`], dropping empty sections and
/// categories that have no section.
pub fn shelf_sections(items: Vec<ShelfItem>) -> Vec<ShelfSection> {
    let mut by_category: BTreeMap<String, Vec<ShelfItem>> = BTreeMap::new();
    for item in items {
        by_category
            .entry(item.category.clone())
            .or_default()
            .push(item);
    }

    SHELF_SECTIONS
        .iter()
        .filter_map(|def| {
            let mut items = by_category.remove(def.key)?;
            sort_newest_first(&mut items);
            Some(ShelfSection {
                key: def.key,
                title: def.title,
                items,
            })
        })
        .collect()
}
