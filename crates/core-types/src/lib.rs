pub mod date;
pub mod error;
pub mod filter;
pub mod page;
pub mod song;

// Re-export the core types to provide a clean public API.
pub use date::{format_release_date, parse_release_date, RELEASE_DATE_FORMAT};
pub use error::CoreError;
pub use filter::{SongFilter, SongFilterInput};
pub use page::{Page, DEFAULT_PAGE, DEFAULT_PER_PAGE};
pub use song::{NewSong, Song, SongId, SongInput};
