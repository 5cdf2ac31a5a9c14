use std::io;
use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use journal_content::ContentError;
use thiserror::Error;

/// Failures surfaced while serving a request or preparing templates.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("page not found")]
    NotFound,
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("failed to read template {path}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("template '{name}' failed to compile")]
    TemplateSyntax {
        name: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },
    #[error("template '{name}' failed to render")]
    Template {
        name: String,
        #[source]
        source: Box<handlebars::RenderError>,
    },
    #[error("failed to build template context")]
    Context(#[from] serde_json::Error),
    #[error("background task failed")]
    Task(#[from] tokio::task::JoinError),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::NotFound | ServerError::Content(ContentError::NotFound { .. }) => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::NOT_FOUND {
            return (status, "404 page not found").into_response();
        }

        tracing::error!(error = ?self, "request failed");
        (status, "Internal Server Error").into_response()
    }
}
