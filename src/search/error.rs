#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Search API returned status {status}")]
    ApiError { status: u16 },

    #[error("Invalid data from search API: missing or malformed field `{field}`.")]
    MalformedResponse { field: String },
}
