//! In-memory `SongRepository` with the same observable rules as `DbRepository`.

use crate::repository::SongRepository;
use crate::DbError;
use async_trait::async_trait;
use core_types::{NewSong, Song, SongFilter, SongId};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

#[derive(Default)]
pub struct MockRepository {
    songs: RwLock<BTreeMap<SongId, Song>>,
    next_id: RwLock<SongId>,
    failing: AtomicBool,
}

impl MockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository already holding `songs`, numbered from 1 in order.
    pub fn with_songs(songs: impl IntoIterator<Item = NewSong>) -> Self {
        let repo = Self::new();
        {
            let mut map = repo.songs.write().unwrap();
            let mut next_id = repo.next_id.write().unwrap();
            for song in songs {
                *next_id += 1;
                map.insert(*next_id, song.with_id(*next_id));
            }
        }
        repo
    }

    /// Makes every subsequent call fail with a storage error.
    pub fn fail_all(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.songs.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Vec<Song> {
        self.songs.read().unwrap().values().cloned().collect()
    }

    fn check(&self) -> Result<(), DbError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(DbError::Query(sqlx::Error::PoolClosed))
        } else {
            Ok(())
        }
    }
}

fn matches_filter(song: &Song, filter: &SongFilter) -> bool {
    filter.group.as_ref().is_none_or(|v| &song.group == v)
        && filter.song.as_ref().is_none_or(|v| &song.song == v)
        && filter.release_date.is_none_or(|v| song.release_date == v)
        && filter.text.as_ref().is_none_or(|v| &song.text == v)
        && filter.link.as_ref().is_none_or(|v| &song.link == v)
}

#[async_trait]
impl SongRepository for MockRepository {
    async fn create_song(&self, song: &NewSong) -> Result<SongId, DbError> {
        self.check()?;
        let mut next_id = self.next_id.write().unwrap();
        *next_id += 1;
        let id = *next_id;
        self.songs
            .write()
            .unwrap()
            .insert(id, song.clone().with_id(id));
        Ok(id)
    }

    async fn get_all_songs(
        &self,
        limit: u32,
        page: u32,
        filter: &SongFilter,
    ) -> Result<(Vec<Song>, i64), DbError> {
        self.check()?;
        let songs = self.songs.read().unwrap();
        let matching: Vec<&Song> = songs.values().filter(|s| matches_filter(s, filter)).collect();
        let offset = page.saturating_sub(1) as usize * limit as usize;
        let window = matching
            .iter()
            .skip(offset)
            .take(limit as usize)
            .map(|s| (*s).clone())
            .collect();
        Ok((window, matching.len() as i64))
    }

    async fn get_song(&self, id: SongId) -> Result<Song, DbError> {
        self.check()?;
        self.songs
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(DbError::NotFound)
    }

    async fn update_song(&self, id: SongId, song: &NewSong) -> Result<(), DbError> {
        self.check()?;
        let mut songs = self.songs.write().unwrap();
        match songs.get_mut(&id) {
            Some(existing) => {
                *existing = song.clone().with_id(id);
                Ok(())
            }
            None => Err(DbError::NotFound),
        }
    }

    async fn delete_song(&self, id: SongId) -> Result<(), DbError> {
        self.check()?;
        self.songs
            .write()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(DbError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn song(group: &str, title: &str) -> NewSong {
        NewSong {
            group: group.to_string(),
            song: title.to_string(),
            release_date: NaiveDate::from_ymd_opt(2006, 6, 19).unwrap(),
            text: "a\nb".to_string(),
            link: "http://x".to_string(),
        }
    }

    #[tokio::test]
    async fn ids_are_sequential_from_one() {
        let repo = MockRepository::new();
        assert_eq!(repo.create_song(&song("Muse", "A")).await.unwrap(), 1);
        assert_eq!(repo.create_song(&song("Muse", "B")).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn pages_are_one_based_and_total_ignores_the_window() {
        let repo = MockRepository::with_songs(
            (0..7).map(|i| song("Muse", &format!("track {i}"))),
        );
        let filter = SongFilter::default();

        let (first, total) = repo.get_all_songs(3, 1, &filter).await.unwrap();
        assert_eq!(total, 7);
        assert_eq!(first.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 2, 3]);

        let (last, total) = repo.get_all_songs(3, 3, &filter).await.unwrap();
        assert_eq!(total, 7);
        assert_eq!(last.iter().map(|s| s.id).collect::<Vec<_>>(), vec![7]);

        let (beyond, total) = repo.get_all_songs(3, 4, &filter).await.unwrap();
        assert!(beyond.is_empty());
        assert_eq!(total, 7);
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let repo = MockRepository::new();
        assert!(matches!(repo.get_song(9).await, Err(DbError::NotFound)));
        assert!(matches!(
            repo.update_song(9, &song("a", "b")).await,
            Err(DbError::NotFound)
        ));
        assert!(matches!(repo.delete_song(9).await, Err(DbError::NotFound)));
        assert!(repo.is_empty());
    }
}
