use thiserror::Error;

/// Errors that can occur while resolving and loading mountain records.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("transport error: {message} (endpoint: {endpoint})")]
    Transport { message: String, endpoint: String },

    #[error("parse error: {message}")]
    Parse { message: String },

    #[error("fetch error: {message} (url: {url})")]
    Fetch { message: String, url: String },

    #[error("scrape error: {message}")]
    Scrape { message: String },

    #[error("search error: {message} (name: {name})")]
    Search { message: String, name: String },

    #[error("sink error: {message} (sink: {sink})")]
    Sink { message: String, sink: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `LoaderError`.
pub type Result<T> = std::result::Result<T, LoaderError>;
