use std::io;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Failure while turning markdown into HTML. No partial output accompanies it.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write rendered html: {0}")]
    Write(#[from] io::Error),

    #[error("rendered html is not valid utf-8: {0}")]
    Encoding(#[from] FromUtf8Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
