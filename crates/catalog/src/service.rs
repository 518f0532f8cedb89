use crate::error::ServiceError;
use api_client::SongDetailApi;
use core_types::{parse_release_date, NewSong, Song, SongFilterInput, SongId, SongInput};
use database::SongRepository;
use std::future::Future;
use std::sync::Arc;

/// Orchestrates the song lookup and the repository.
///
/// Cheap to clone; both collaborators are shared behind `Arc`.
#[derive(Clone)]
pub struct SongService {
    repo: Arc<dyn SongRepository>,
    details: Arc<dyn SongDetailApi>,
}

impl SongService {
    pub fn new(repo: Arc<dyn SongRepository>, details: Arc<dyn SongDetailApi>) -> Self {
        Self { repo, details }
    }

    /// Looks the song up, then stores it with the fetched release date,
    /// lyrics and link. Nothing is written unless every step succeeds.
    #[tracing::instrument(skip(self))]
    pub async fn create_song(&self, group: &str, song: &str) -> Result<SongId, ServiceError> {
        logged(async {
            let detail = self.details.fetch_detail(group, song).await?;
            let release_date = parse_release_date(&detail.release_date)?;

            let new_song = NewSong {
                group: group.to_string(),
                song: song.to_string(),
                release_date,
                text: detail.text,
                link: detail.link,
            };
            Ok::<_, ServiceError>(self.repo.create_song(&new_song).await?)
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_song(&self, id: SongId) -> Result<Song, ServiceError> {
        logged(async { Ok::<_, ServiceError>(self.repo.get_song(id).await?) }).await
    }

    /// One page of songs matching `filter`, plus the total number of matches.
    /// `page` is 1-based.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_songs(
        &self,
        limit: u32,
        page: u32,
        filter: SongFilterInput,
    ) -> Result<(Vec<Song>, i64), ServiceError> {
        logged(async {
            let filter = filter.parse()?;
            let (songs, total) = self.repo.get_all_songs(limit, page, &filter).await?;
            tracing::debug!(count = songs.len(), total, "Fetched songs.");
            Ok::<_, ServiceError>((songs, total))
        })
        .await
    }

    /// Replaces every field of the song.
    #[tracing::instrument(skip(self, input), fields(group = %input.group, song = %input.song))]
    pub async fn update_song(&self, id: SongId, input: SongInput) -> Result<(), ServiceError> {
        logged(async {
            let release_date = parse_release_date(&input.release_date)?;
            let song = NewSong {
                group: input.group,
                song: input.song,
                release_date,
                text: input.text,
                link: input.link,
            };
            Ok::<_, ServiceError>(self.repo.update_song(id, &song).await?)
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_song(&self, id: SongId) -> Result<(), ServiceError> {
        logged(async { Ok::<_, ServiceError>(self.repo.delete_song(id).await?) }).await
    }
}

/// Logs the outcome of a service call once, inside the caller's span.
async fn logged<T, F>(operation: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    let result = operation.await;
    match &result {
        Ok(_) => tracing::info!("Completed."),
        Err(ServiceError::NotFound) => tracing::warn!("Song not found."),
        Err(ServiceError::DateParse(e)) => tracing::warn!(error = %e, "Rejected release date."),
        Err(e) => tracing::error!(error = %e, "Failed."),
    }
    result
}
