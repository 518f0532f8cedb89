use crate::error::ApiError;
use crate::SongDetailApi;
use async_trait::async_trait;
use core_types::SongInput;
use std::sync::Mutex;

/// How a mock lookup should fail.
#[derive(Debug, Clone)]
pub enum MockFailure {
    Status(u16),
    Deserialization(String),
}

/// Mock lookup that returns a predefined detail or failure and remembers
/// what it was asked for.
pub struct MockSongDetailApi {
    /// Detail to return from `fetch_detail`
    pub detail: SongInput,
    /// Failure to return (takes precedence over `detail`)
    pub failure: Option<MockFailure>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockSongDetailApi {
    pub fn returning(release_date: &str, text: &str, link: &str) -> Self {
        Self {
            detail: SongInput {
                release_date: release_date.to_string(),
                text: text.to_string(),
                link: link.to_string(),
                ..Default::default()
            },
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(failure: MockFailure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::returning("", "", "")
        }
    }

    /// Every `(group, song)` pair requested so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SongDetailApi for MockSongDetailApi {
    async fn fetch_detail(&self, group: &str, song: &str) -> Result<SongInput, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push((group.to_string(), song.to_string()));

        match &self.failure {
            Some(MockFailure::Status(code)) => Err(ApiError::Status(*code)),
            Some(MockFailure::Deserialization(msg)) => Err(ApiError::Deserialization(msg.clone())),
            None => Ok(self.detail.clone()),
        }
    }
}
