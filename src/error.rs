//! Error types for listing extraction.

use thiserror::Error;

/// Result type for showtimes operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The request never produced a response
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream answered with a non-success status
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// The page held no listing blocks; carries the page's own message
    #[error("no results: {0}")]
    EmptyResult(String),

    /// Pagination still had a next page after the configured limit
    #[error("listing has more than {max_pages} pages")]
    PageLimit { max_pages: u32 },

    #[error("invalid selector: {0}")]
    Selector(String),

    #[error("feed error: {0}")]
    Feed(#[from] rss::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for failures of the fetch itself (network or status).
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Status { .. })
    }
}
