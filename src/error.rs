use std::io;

use thiserror::Error;

/// Failure of the `/list` request. Rendered as a single page-level message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("{0}")]
    Network(String),

    #[error("malformed file list: {0}")]
    Malformed(String),
}

/// An individual image resource that could not be loaded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("failed to load {path}: {reason}")]
pub struct ResourceLoadError {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("gallery container is not present in the page")]
    ContainerMissing,

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("invalid server url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to render page: {0}")]
    Render(#[from] askama::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => RequestError::Status(status.as_u16()),
            None => RequestError::Network(err.to_string()),
        }
    }
}
