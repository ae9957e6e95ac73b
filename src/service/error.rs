use crate::database::error::DatabaseError;
use crate::push::error::PushError;
use crate::search::error::SearchError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ServiceError {
    #[error("Unexpected result: {message}")]
    UnexpectedResult { message: String },

    #[error("DatabaseError: {0}")]
    DatabaseError(#[from] DatabaseError),

    #[error("SearchError: {0}")]
    SearchError(#[from] SearchError),

    #[error("PushError: {0}")]
    PushError(#[from] PushError),
}
