//! The song service: the only layer that knows about both the lookup
//! service and the database, and the owner of the `DD.MM.YYYY` parsing step.

pub mod error;
pub mod service;

pub use error::ServiceError;
pub use service::SongService;
