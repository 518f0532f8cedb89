use crate::DbError;
use async_trait::async_trait;
use core_types::{NewSong, Song, SongFilter, SongId};
use sqlx::postgres::{PgPool, Postgres};
use sqlx::QueryBuilder;

/// Column list for reading a `Song`. `"group"` is a reserved word and stays quoted.
const SELECT_SONG: &str = r#"SELECT id, "group", song, release_date, text, link FROM songs"#;

/// Data access for the `songs` table.
///
/// The service holds this as a trait object so tests can swap in
/// `mock::MockRepository`.
#[async_trait]
pub trait SongRepository: Send + Sync {
    /// Inserts a song and returns its generated id.
    async fn create_song(&self, song: &NewSong) -> Result<SongId, DbError>;

    /// Returns one page of the songs matching `filter`, plus the number of
    /// matching rows across all pages. `page` is 1-based.
    async fn get_all_songs(
        &self,
        limit: u32,
        page: u32,
        filter: &SongFilter,
    ) -> Result<(Vec<Song>, i64), DbError>;

    async fn get_song(&self, id: SongId) -> Result<Song, DbError>;

    /// Replaces every mutable column of the song.
    async fn update_song(&self, id: SongId, song: &NewSong) -> Result<(), DbError>;

    async fn delete_song(&self, id: SongId) -> Result<(), DbError>;
}

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Appends `WHERE col = $n AND ...` for every set field of the filter.
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &SongFilter) {
    if filter.is_empty() {
        return;
    }
    builder.push(" WHERE ");
    let mut conditions = builder.separated(" AND ");
    if let Some(group) = &filter.group {
        conditions.push(r#""group" = "#);
        conditions.push_bind_unseparated(group.clone());
    }
    if let Some(song) = &filter.song {
        conditions.push("song = ");
        conditions.push_bind_unseparated(song.clone());
    }
    if let Some(release_date) = filter.release_date {
        conditions.push("release_date = ");
        conditions.push_bind_unseparated(release_date);
    }
    if let Some(text) = &filter.text {
        conditions.push("text = ");
        conditions.push_bind_unseparated(text.clone());
    }
    if let Some(link) = &filter.link {
        conditions.push("link = ");
        conditions.push_bind_unseparated(link.clone());
    }
}

/// Builds the page query: filters, then `ORDER BY id LIMIT $n OFFSET $m`
/// with `offset = (page - 1) * limit`.
fn page_query(limit: u32, page: u32, filter: &SongFilter) -> QueryBuilder<'static, Postgres> {
    let offset = row_offset(limit, page);
    let mut builder = QueryBuilder::<Postgres>::new(SELECT_SONG);
    push_filters(&mut builder, filter);
    builder
        .push(" ORDER BY id LIMIT ")
        .push_bind(i64::from(limit))
        .push(" OFFSET ")
        .push_bind(offset);
    builder
}

/// Offset the page query binds for a 1-based `page`.
fn row_offset(limit: u32, page: u32) -> i64 {
    i64::from(page.saturating_sub(1)).saturating_mul(i64::from(limit))
}

fn not_found_or(e: sqlx::Error) -> DbError {
    if let sqlx::Error::RowNotFound = e {
        DbError::NotFound
    } else {
        e.into()
    }
}

#[async_trait]
impl SongRepository for DbRepository {
    async fn create_song(&self, song: &NewSong) -> Result<SongId, DbError> {
        let id = sqlx::query_scalar::<_, SongId>(
            r#"
            INSERT INTO songs ("group", song, release_date, text, link)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&song.group)
        .bind(&song.song)
        .bind(song.release_date)
        .bind(&song.text)
        .bind(&song.link)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn get_all_songs(
        &self,
        limit: u32,
        page: u32,
        filter: &SongFilter,
    ) -> Result<(Vec<Song>, i64), DbError> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM songs");
        push_filters(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut query = page_query(limit, page, filter);
        let songs = query
            .build_query_as::<Song>()
            .fetch_all(&self.pool)
            .await?;

        Ok((songs, total))
    }

    async fn get_song(&self, id: SongId) -> Result<Song, DbError> {
        let song = sqlx::query_as::<_, Song>(&format!("{SELECT_SONG} WHERE id = $1"))
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found_or)?;
        Ok(song)
    }

    async fn update_song(&self, id: SongId, song: &NewSong) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            UPDATE songs
            SET "group" = $1, song = $2, release_date = $3, text = $4, link = $5
            WHERE id = $6
            "#,
        )
        .bind(&song.group)
        .bind(&song.song)
        .bind(song.release_date)
        .bind(&song.text)
        .bind(&song.link)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn delete_song(&self, id: SongId) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM songs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sql_for(filter: &SongFilter) -> String {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM songs");
        push_filters(&mut builder, filter);
        builder.sql().to_string()
    }

    #[test]
    fn no_filters_means_no_where_clause() {
        assert_eq!(sql_for(&SongFilter::default()), "SELECT COUNT(*) FROM songs");
    }

    #[test]
    fn group_column_is_quoted() {
        let filter = SongFilter {
            group: Some("Muse".into()),
            ..Default::default()
        };
        assert_eq!(
            sql_for(&filter),
            r#"SELECT COUNT(*) FROM songs WHERE "group" = $1"#
        );
    }

    #[test]
    fn every_filter_is_a_bound_equality() {
        let filter = SongFilter {
            group: Some("Muse".into()),
            song: Some("Uprising".into()),
            release_date: NaiveDate::from_ymd_opt(2009, 9, 7),
            text: Some("x".into()),
            link: Some("http://x".into()),
        };
        assert_eq!(
            sql_for(&filter),
            r#"SELECT COUNT(*) FROM songs WHERE "group" = $1 AND song = $2 AND release_date = $3 AND text = $4 AND link = $5"#
        );
    }

    #[test]
    fn page_query_orders_by_id_and_binds_the_window() {
        let unfiltered = page_query(5, 1, &SongFilter::default());
        assert_eq!(
            unfiltered.sql(),
            r#"SELECT id, "group", song, release_date, text, link FROM songs ORDER BY id LIMIT $1 OFFSET $2"#
        );

        let filter = SongFilter {
            group: Some("Muse".into()),
            release_date: NaiveDate::from_ymd_opt(2006, 6, 19),
            ..Default::default()
        };
        let filtered = page_query(2, 3, &filter);
        assert_eq!(
            filtered.sql(),
            r#"SELECT id, "group", song, release_date, text, link FROM songs WHERE "group" = $1 AND release_date = $2 ORDER BY id LIMIT $3 OFFSET $4"#
        );
    }

    #[test]
    fn offset_skips_whole_pages() {
        assert_eq!(row_offset(5, 1), 0);
        assert_eq!(row_offset(5, 2), 5);
        assert_eq!(row_offset(2, 3), 4);
        assert_eq!(row_offset(u32::MAX, u32::MAX), i64::MAX);
    }

    #[test]
    fn filter_values_never_reach_the_sql_text() {
        let filter = SongFilter {
            song: Some("x'; DROP TABLE songs; --".into()),
            ..Default::default()
        };
        let sql = sql_for(&filter);
        assert_eq!(sql, "SELECT COUNT(*) FROM songs WHERE song = $1");
    }
}
