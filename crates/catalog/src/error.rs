use api_client::error::ApiError;
use core_types::CoreError;
use database::DbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Song not found")]
    NotFound,

    #[error("Storage error: {0}")]
    Storage(DbError),

    #[error("Song detail lookup failed: {0}")]
    Lookup(#[from] ApiError),

    #[error("Date parse error: {0}")]
    DateParse(#[from] CoreError),
}

impl From<DbError> for ServiceError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound => ServiceError::NotFound,
            other => ServiceError::Storage(other),
        }
    }
}
