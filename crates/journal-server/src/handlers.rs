use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use journal_content::{
    filter_by_tags, group_by_year, shelf_sections, sort_newest_first, tag_counts, years,
    ContentError, ContentResult, ContentStore, TagFilter, SHELF_SECTIONS,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

const RECENT_ON_HOME: usize = 5;

#[derive(Debug, Default, Deserialize)]
pub struct ArticleQuery {
    pub tags: Option<String>,
}

/// Runs a blocking content load off the async runtime.
async fn load<T, F>(state: &AppState, task: F) -> ServerResult<T>
where
    F: FnOnce(&ContentStore) -> ContentResult<T> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    let loaded = tokio::task::spawn_blocking(move || task(store.as_ref())).await??;
    Ok(loaded)
}

fn page<T: Serialize>(state: &AppState, name: &str, data: &T) -> ServerResult<Response> {
    let html = state.templates.render(name, data)?;
    Ok(Html(html).into_response())
}

fn not_found_page(state: &AppState) -> ServerResult<Response> {
    let html = state
        .templates
        .render("not_found", &json!({ "title": "Page not found" }))?;
    Ok((StatusCode::NOT_FOUND, Html(html)).into_response())
}

pub async fn home(State(state): State<AppState>) -> ServerResult<Response> {
    let mut articles = load(&state, ContentStore::articles).await?;
    sort_newest_first(&mut articles);
    articles.truncate(RECENT_ON_HOME);

    page(
        &state,
        "home",
        &json!({
            "title": "Welcome",
            "intro": "Notes, fragments and things worth keeping.",
            "recent": articles,
        }),
    )
}

pub async fn articles(
    State(state): State<AppState>,
    Query(query): Query<ArticleQuery>,
) -> ServerResult<Response> {
    let all = load(&state, ContentStore::articles).await?;
    let filter = TagFilter::parse(query.tags.as_deref());
    let all_tags = tag_counts(&all);
    let groups = group_by_year(filter_by_tags(all, &filter));

    page(
        &state,
        "articles",
        &json!({
            "title": "Articles",
            "years": years(&groups),
            "groups": groups,
            "all_tags": all_tags,
            "current_tags": filter.tags(),
        }),
    )
}

pub async fn article_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ServerResult<Response> {
    let article = load(&state, move |store| store.article(&slug)).await?;
    match article {
        Some(article) => page(
            &state,
            "article_detail",
            &json!({ "title": article.title, "article": article }),
        ),
        None => not_found_page(&state),
    }
}

pub async fn fragments(State(state): State<AppState>) -> ServerResult<Response> {
    let groups = group_by_year(load(&state, ContentStore::fragments).await?);

    page(
        &state,
        "fragments",
        &json!({
            "title": "Fragments",
            "years": years(&groups),
            "groups": groups,
        }),
    )
}

pub async fn fragment_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ServerResult<Response> {
    let fragment = load(&state, move |store| store.fragment(&slug)).await?;
    match fragment {
        Some(fragment) => page(
            &state,
            "fragment_detail",
            &json!({ "title": fragment.title, "fragment": fragment }),
        ),
        None => not_found_page(&state),
    }
}

pub async fn shelf(State(state): State<AppState>) -> ServerResult<Response> {
    let sections = shelf_sections(load(&state, ContentStore::shelf_items).await?);

    page(
        &state,
        "shelf",
        &json!({
            "title": "Shelf",
            "nav": SHELF_SECTIONS,
            "sections": sections,
        }),
    )
}

pub async fn shelf_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ServerResult<Response> {
    let item = load(&state, move |store| store.shelf_item(&slug)).await?;
    match item {
        Some(item) => page(
            &state,
            "shelf_detail",
            &json!({ "title": item.title, "item": item }),
        ),
        None => not_found_page(&state),
    }
}

pub async fn pixels(State(state): State<AppState>) -> ServerResult<Response> {
    let mut pixels = load(&state, ContentStore::pixels).await?;
    sort_newest_first(&mut pixels);

    page(&state, "pixels", &json!({ "title": "Pixels", "pixels": pixels }))
}

pub async fn about(State(state): State<AppState>) -> ServerResult<Response> {
    match load(&state, ContentStore::about).await {
        Ok(about) => page(&state, "about", &json!({ "title": "About", "about": about })),
        Err(ServerError::Content(ContentError::NotFound { path })) => {
            tracing::warn!(path = %path.display(), "about page missing");
            not_found_page(&state)
        }
        Err(err) => Err(err),
    }
}

pub async fn now(State(state): State<AppState>) -> ServerResult<Response> {
    page(&state, "now", &json!({ "title": "Now" }))
}

pub async fn uses(State(state): State<AppState>) -> ServerResult<Response> {
    page(&state, "uses", &json!({ "title": "Uses" }))
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn not_found(State(state): State<AppState>) -> ServerResult<Response> {
    not_found_page(&state)
}
