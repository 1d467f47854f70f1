use thiserror::Error;

/// Everything that can abort a download, a listing, or a load.
///
/// Every variant is fatal to the command that raised it; nothing is retried.
#[derive(Error, Debug)]
pub enum Error {
    #[error("GET {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GET {url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected response shape: expected [page info, records], got {0} element(s)")]
    Shape(usize),

    #[error("world bank api error: {0}")]
    Api(String),

    #[error("page limit exceeded ({0})")]
    PageLimit(u32),

    #[error("invalid table name {0:?} (allowed: letters, digits, underscore)")]
    InvalidTableName(String),

    #[error("unsupported period {0:?}, expected a year such as 2020")]
    InvalidPeriod(String),

    #[error("database error: {0}")]
    Database(#[from] duckdb::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
