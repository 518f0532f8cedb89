use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid release date '{0}', expected DD.MM.YYYY")]
    InvalidReleaseDate(String),
}
