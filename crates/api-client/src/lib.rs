use crate::error::ApiError;
use async_trait::async_trait;
use configuration::EnrichmentSettings;
use core_types::SongInput;
use reqwest::StatusCode;

pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

/// The interface to the external song detail lookup.
/// The song service only sees this trait, so the real HTTP client can be
/// swapped for `mock::MockSongDetailApi` in tests.
#[async_trait]
pub trait SongDetailApi: Send + Sync {
    /// Fetches release date, lyrics and link for a song.
    ///
    /// Only `release_date`, `text` and `link` of the result are meaningful;
    /// the lookup service may leave `group` and `song` out.
    async fn fetch_detail(&self, group: &str, song: &str) -> Result<SongInput, ApiError>;
}

/// HTTP client for `GET <base_url>?group=<group>&song=<song>`.
#[derive(Debug, Clone)]
pub struct EnrichmentClient {
    client: reqwest::Client,
    base_url: String,
}

impl EnrichmentClient {
    pub fn new(settings: &EnrichmentSettings) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: settings.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SongDetailApi for EnrichmentClient {
    async fn fetch_detail(&self, group: &str, song: &str) -> Result<SongInput, ApiError> {
        tracing::debug!(url = %self.base_url, group, song, "Requesting song detail.");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("group", group), ("song", song)])
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        tracing::debug!(status = status.as_u16(), body = %text, "Song detail response received.");

        if status != StatusCode::OK {
            return Err(ApiError::Status(status.as_u16()));
        }
        serde_json::from_str::<SongInput>(&text).map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode as AxumStatus, routing::get, Router};
    use std::collections::HashMap;
    use std::net::SocketAddr;
    use std::time::Duration;

    /// Answers like the real lookup service for Muse, 404s for anything else,
    /// and returns garbage for the group "broken".
    async fn info(Query(params): Query<HashMap<String, String>>) -> (AxumStatus, String) {
        match (params.get("group").map(String::as_str), params.get("song").map(String::as_str)) {
            (Some("Muse"), Some("Supermassive Black Hole")) => (
                AxumStatus::OK,
                r#"{"release_date":"19.06.2006","text":"line1\nline2\nline3","link":"http://x"}"#
                    .to_string(),
            ),
            (Some("broken"), _) => (AxumStatus::OK, "<html>not json</html>".to_string()),
            _ => (AxumStatus::NOT_FOUND, String::new()),
        }
    }

    async fn spawn_lookup() -> SocketAddr {
        let app = Router::new().route("/info", get(info));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn client_for(base_url: String) -> EnrichmentClient {
        EnrichmentClient::new(&EnrichmentSettings {
            base_url,
            timeout: Some(Duration::from_secs(5)),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn fetches_and_decodes_detail() {
        let addr = spawn_lookup().await;
        let client = client_for(format!("http://{addr}/info"));

        let detail = client
            .fetch_detail("Muse", "Supermassive Black Hole")
            .await
            .unwrap();

        assert_eq!(detail.release_date, "19.06.2006");
        assert_eq!(detail.text, "line1\nline2\nline3");
        assert_eq!(detail.link, "http://x");
    }

    #[tokio::test]
    async fn non_200_is_a_status_error() {
        let addr = spawn_lookup().await;
        let client = client_for(format!("http://{addr}/info"));

        let result = client.fetch_detail("Nobody", "Nothing").await;
        assert!(matches!(result, Err(ApiError::Status(404))));
    }

    #[tokio::test]
    async fn unparseable_body_is_a_deserialization_error() {
        let addr = spawn_lookup().await;
        let client = client_for(format!("http://{addr}/info"));

        let result = client.fetch_detail("broken", "x").await;
        assert!(matches!(result, Err(ApiError::Deserialization(_))));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_request_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = client_for(format!("http://{addr}/info"));

        let result = client.fetch_detail("Muse", "Uprising").await;
        assert!(matches!(result, Err(ApiError::Request(_))));
    }

    #[test]
    fn keeps_the_configured_base_url() {
        let client = client_for("http://lookup.local/info".to_string());
        assert_eq!(client.base_url(), "http://lookup.local/info");
    }
}
