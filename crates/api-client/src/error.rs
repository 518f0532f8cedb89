use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("The lookup request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The lookup service answered with status {0}")]
    Status(u16),

    #[error("Failed to deserialize the lookup response: {0}")]
    Deserialization(String),
}
