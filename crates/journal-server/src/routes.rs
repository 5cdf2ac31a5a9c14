use axum::routing::get;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config.static_files.dir.clone();

    Router::new()
        .route("/", get(handlers::home))
        .route("/articles", get(handlers::articles))
        .route("/articles/{slug}", get(handlers::article_detail))
        .route("/articles/{slug}/", get(handlers::article_detail))
        .route("/fragments", get(handlers::fragments))
        .route("/fragments/{slug}", get(handlers::fragment_detail))
        .route("/fragments/{slug}/", get(handlers::fragment_detail))
        .route("/shelf", get(handlers::shelf))
        .route("/shelf/{slug}", get(handlers::shelf_detail))
        .route("/shelf/{slug}/", get(handlers::shelf_detail))
        .route("/pixels", get(handlers::pixels))
        .route("/about", get(handlers::about))
        .route("/now", get(handlers::now))
        .route("/uses", get(handlers::uses))
        .route("/health", get(handlers::health))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(handlers::not_found)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
