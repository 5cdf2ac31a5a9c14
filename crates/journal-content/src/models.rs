use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

/// Records that carry a publication date.
pub trait Dated {
    fn date(&self) -> DateTime<Utc>;

    fn year(&self) -> i32 {
        self.date().year()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Article {
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub date: DateTime<Utc>,
    pub html: String,
    pub toc: String,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Fragment {
    pub slug: String,
    pub title: String,
    pub image: Option<String>,
    pub date: DateTime<Utc>,
    pub html: String,
}

/// Book, paper or other item kept on the shelf.
#[derive(Clone, Debug, Serialize)]
pub struct ShelfItem {
    pub slug: String,
    pub title: String,
    pub category: String,
    pub summary: String,
    pub date: DateTime<Utc>,
    pub html: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Pixel {
    pub slug: String,
    pub title: String,
    pub image: Option<String>,
    pub date: DateTime<Utc>,
    pub html: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct About {
    pub slug: String,
    pub image: Option<String>,
    pub date: DateTime<Utc>,
    pub html: String,
}

macro_rules! impl_dated {
    ($($record:ty),+ $(,)?) => {
        $(
            impl Dated for $record {
                fn date(&self) -> DateTime<Utc> {
                    self.date
                }
            }
        )+
    };
}

impl_dated!(Article, Fragment, ShelfItem, Pixel, About);
