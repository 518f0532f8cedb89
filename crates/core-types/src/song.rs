use crate::date::release_date_format;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Primary key of the `songs` table (`SERIAL`).
pub type SongId = i32;

/// A row of the `songs` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Song {
    pub id: SongId,
    pub group: String,
    pub song: String,
    #[serde(with = "release_date_format")]
    pub release_date: NaiveDate,
    /// Lyrics, one verse per line.
    pub text: String,
    pub link: String,
}

impl Song {
    /// Splits the lyrics into verses on `\n`.
    pub fn verses(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }
}

/// Every mutable column of a song. Used for inserts and full updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSong {
    pub group: String,
    pub song: String,
    pub release_date: NaiveDate,
    pub text: String,
    pub link: String,
}

impl NewSong {
    pub fn with_id(self, id: SongId) -> Song {
        Song {
            id,
            group: self.group,
            song: self.song,
            release_date: self.release_date,
            text: self.text,
            link: self.link,
        }
    }
}

/// The wire shape of a song, with the release date still in `DD.MM.YYYY` text.
///
/// Returned by the enrichment service and accepted by `PUT /songs/:id`.
/// Missing fields read as empty strings so presence can be checked after
/// deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SongInput {
    pub group: String,
    pub song: String,
    pub release_date: String,
    pub text: String,
    pub link: String,
}

impl SongInput {
    /// True when any of the five fields is empty.
    pub fn missing_required(&self) -> bool {
        [
            &self.group,
            &self.song,
            &self.release_date,
            &self.text,
            &self.link,
        ]
        .iter()
        .any(|field| field.is_empty())
    }
}
