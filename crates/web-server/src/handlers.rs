use crate::error::{AppError, SONG_NOT_FOUND};
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use core_types::{Page, Song, SongFilterInput, SongId, SongInput};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

const ALL_FIELDS_REQUIRED: &str = "all fields are required";

/// Query string parameters by name. A repeated key keeps its first value.
#[derive(Debug, Default)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = HashMap::new();
        for (key, value) in pairs {
            params.entry(key).or_insert(value);
        }
        Self(params)
    }

    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}

/// `?page=&per_page=`, kept as text so bad values get our own message.
#[derive(Debug, Default)]
pub struct Pagination {
    page: Option<String>,
    per_page: Option<String>,
}

impl From<&QueryParams> for Pagination {
    fn from(params: &QueryParams) -> Self {
        Self {
            page: params.get("page"),
            per_page: params.get("per_page"),
        }
    }
}

impl Pagination {
    fn parse(&self) -> Result<Page, AppError> {
        let mut page = Page::default();
        if let Some(value) = non_empty(self.page.as_deref()) {
            page.page = parse_positive(value).ok_or(AppError::Validation("invalid page"))?;
        }
        if let Some(value) = non_empty(self.per_page.as_deref()) {
            page.per_page =
                parse_positive(value).ok_or(AppError::Validation("invalid per_page"))?;
        }
        Ok(page)
    }
}

#[derive(Debug, Default)]
pub struct SongFilterQuery {
    group: Option<String>,
    song: Option<String>,
    release_date: Option<String>,
    text: Option<String>,
    link: Option<String>,
}

impl From<&QueryParams> for SongFilterQuery {
    fn from(params: &QueryParams) -> Self {
        Self {
            group: params.get("group"),
            song: params.get("song"),
            release_date: params.get("release_date"),
            text: params.get("text"),
            link: params.get("link"),
        }
    }
}

impl From<SongFilterQuery> for SongFilterInput {
    fn from(query: SongFilterQuery) -> Self {
        let keep = |value: Option<String>| value.filter(|v| !v.is_empty());
        Self {
            group: keep(query.group),
            song: keep(query.song),
            release_date: keep(query.release_date),
            text: keep(query.text),
            link: keep(query.link),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateSongRequest {
    pub group: String,
    pub song: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: SongId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: u32,
    pub per_page: u32,
    /// Matching songs across all pages.
    pub total: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SongsPage {
    pub pagination: PageInfo,
    pub songs: Vec<Song>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VersesPage {
    pub verses: Vec<String>,
    pub page: u32,
    /// Verses in the whole song.
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn parse_positive(value: &str) -> Option<u32> {
    value.parse::<u32>().ok().filter(|n| *n >= 1)
}

fn parse_id(raw: &str) -> Result<SongId, AppError> {
    match raw.parse::<SongId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => {
            tracing::debug!(id = raw, "Rejected song id.");
            Err(AppError::Validation("invalid id"))
        }
    }
}

/// An id segment axum could not even decode is just another invalid id.
fn path_id(path: Result<Path<String>, PathRejection>) -> Result<SongId, AppError> {
    match path {
        Ok(Path(raw)) => parse_id(&raw),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected song id.");
            Err(AppError::Validation("invalid id"))
        }
    }
}

type RawQuery = Result<Query<Vec<(String, String)>>, QueryRejection>;

fn query_params(query: RawQuery) -> Result<QueryParams, AppError> {
    query
        .map(|Query(pairs)| QueryParams::from_pairs(pairs))
        .map_err(|rejection| {
            tracing::debug!(error = %rejection, "Rejected query string.");
            AppError::BadRequest("invalid request")
        })
}

/// # POST /api/v1/songs
/// Looks the song up and stores it.
pub async fn create_song(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateSongRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Failed to read request body.");
        AppError::BadRequest("invalid request")
    })?;
    if request.group.is_empty() || request.song.is_empty() {
        return Err(AppError::Validation(ALL_FIELDS_REQUIRED));
    }

    let id = state
        .service
        .create_song(&request.group, &request.song)
        .await
        .map_err(AppError::Internal)?;
    if id == 0 {
        return Err(AppError::NotFound(SONG_NOT_FOUND));
    }
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// # GET /api/v1/songs
/// Filtered, paginated song list.
pub async fn list_songs(
    State(state): State<Arc<AppState>>,
    query: RawQuery,
) -> Result<Json<SongsPage>, AppError> {
    let params = query_params(query)?;
    let filter = SongFilterInput::from(SongFilterQuery::from(&params));
    let page = Pagination::from(&params).parse()?;

    let (songs, total) = state
        .service
        .get_all_songs(page.per_page, page.page, filter)
        .await?;
    if songs.is_empty() {
        return Err(AppError::NotFound("songs not found"));
    }

    Ok(Json(SongsPage {
        pagination: PageInfo {
            page: page.page,
            per_page: page.per_page,
            total,
        },
        songs,
    }))
}

/// # GET /api/v1/songs/:id
/// One page of a song's verses.
pub async fn get_song_verses(
    id: Result<Path<String>, PathRejection>,
    State(state): State<Arc<AppState>>,
    query: RawQuery,
) -> Result<Json<VersesPage>, AppError> {
    let id = path_id(id)?;
    let page = Pagination::from(&query_params(query)?).parse()?;

    let song = state.service.get_song(id).await?;
    let verses = song.verses();
    let total = verses.len();
    let verses = match page.window(total) {
        Some(range) => verses[range].iter().map(|v| v.to_string()).collect(),
        None => Vec::new(),
    };

    Ok(Json(VersesPage {
        verses,
        page: page.page,
        total,
    }))
}

/// # PUT /api/v1/songs/:id
/// Replaces every field of a song.
pub async fn update_song(
    id: Result<Path<String>, PathRejection>,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SongInput>, JsonRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    let id = path_id(id)?;
    let Json(input) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Failed to read request body.");
        AppError::BadRequest("invalid data")
    })?;
    if input.missing_required() {
        return Err(AppError::Validation(ALL_FIELDS_REQUIRED));
    }

    state.service.update_song(id, input).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// # DELETE /api/v1/songs/:id
pub async fn delete_song(
    id: Result<Path<String>, PathRejection>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SuccessResponse>, AppError> {
    let id = path_id(id)?;
    state.service.delete_song(id).await?;
    Ok(Json(SuccessResponse { success: true }))
}
