use std::io;
use std::path::PathBuf;

use journal_render::RenderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("failed to render {path}: {source}")]
    Render { path: PathBuf, source: RenderError },

    #[error("{path} not found")]
    NotFound { path: PathBuf },
}

pub type ContentResult<T> = Result<T, ContentError>;
