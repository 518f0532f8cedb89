//! # Song Library Database Crate
//!
//! This crate is the persistence gateway for the `songs` table. It hides the
//! SQL and the PostgreSQL specifics behind the `SongRepository` trait.
//!
//! ## Public API
//!
//! - `connect`: The async function to establish the database connection pool.
//! - `run_migrations`: Applies the embedded migrations so the schema is up-to-date.
//! - `SongRepository`: The data access contract used by the song service.
//! - `DbRepository`: The PostgreSQL implementation, holding the connection pool.
//! - `DbError`: The specific error types that can be returned from this crate.
//!   "No such row" is always reported as `DbError::NotFound`.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use repository::{DbRepository, SongRepository};
