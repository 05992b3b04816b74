//! HTTP client for the stats server.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, Response};
use tracing::{debug, info, warn};

use super::error::SyncError;
use super::SessionSync;
use crate::types::{DailyStats, SessionRecord};

const SESSION_PATH: &str = "/api/session";
const STATS_PATH: &str = "/api/stats";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Uploads completed sessions to `POST /api/session`.
#[derive(Debug, Clone)]
pub struct HttpSessionSync {
    client: Client,
    base_url: String,
}

impl HttpSessionSync {
    /// Creates a client for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not http(s) or the client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, SyncError> {
        let base_url = base_url.into();
        let trimmed = base_url.trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(SyncError::InvalidUrl(base_url));
        }

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one session record and returns the server's JSON reply.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, a non-2xx status or a non-JSON body.
    pub async fn post_session(&self, record: &SessionRecord) -> Result<serde_json::Value, SyncError> {
        let url = format!("{}{}", self.base_url, SESSION_PATH);
        debug!("POST {}", url);

        let response = self.client.post(&url).json(record).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Fetches the aggregate for one day from `GET /api/stats?date=`.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, a non-2xx status or a malformed body.
    pub async fn fetch_daily_stats(&self, date: NaiveDate) -> Result<DailyStats, SyncError> {
        let url = format!("{}{}", self.base_url, STATS_PATH);
        let date = date.format("%Y-%m-%d").to_string();
        debug!("GET {}?date={}", url, date);

        let response = self
            .client
            .get(&url)
            .query(&[("date", date.as_str())])
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn check_status(response: Response) -> Result<Response, SyncError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(SyncError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl SessionSync for HttpSessionSync {
    fn submit(&self, record: SessionRecord) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("非同期ランタイムがないためセッションを送信できません");
            return;
        };

        let sync = self.clone();
        handle.spawn(async move {
            match sync.post_session(&record).await {
                Ok(reply) => info!("Session synced: {}", reply),
                Err(e) => warn!("セッションの送信に失敗しました: {} ({})", e, e.suggestion()),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    mod construction_tests {
        use super::*;

        #[test]
        fn test_trailing_slash_trimmed() {
            let sync = HttpSessionSync::new("http://localhost:5000/").unwrap();
            assert_eq!(sync.base_url(), "http://localhost:5000");
        }

        #[test]
        fn test_rejects_non_http_url() {
            let result = HttpSessionSync::new("localhost:5000");
            assert!(matches!(result, Err(SyncError::InvalidUrl(_))));
        }
    }

    mod post_session_tests {
        use super::*;

        #[tokio::test]
        async fn test_posts_record_as_json() {
            let mut server = mockito::Server::new_async().await;
            let mock = server
                .mock("POST", "/api/session")
                .match_header("content-type", "application/json")
                .match_body(Matcher::Json(json!({
                    "start_ts": 500,
                    "end_ts": 2000,
                    "duration_sec": 1500,
                    "kind": "work"
                })))
                .with_status(201)
                .with_header("content-type", "application/json")
                .with_body(r#"{"ok":true,"id":1}"#)
                .create_async()
                .await;

            let sync = HttpSessionSync::new(server.url()).unwrap();
            let reply = sync
                .post_session(&SessionRecord::work(2000, 1500))
                .await
                .unwrap();

            assert_eq!(reply["ok"], true);
            mock.assert_async().await;
        }

        #[tokio::test]
        async fn test_server_error_is_status_error() {
            let mut server = mockito::Server::new_async().await;
            server
                .mock("POST", "/api/session")
                .with_status(400)
                .with_body("invalid kind")
                .create_async()
                .await;

            let sync = HttpSessionSync::new(server.url()).unwrap();
            let err = sync
                .post_session(&SessionRecord::work(2000, 1500))
                .await
                .unwrap_err();

            assert_eq!(err.status(), Some(400));
            assert!(err.to_string().contains("invalid kind"));
        }

        #[tokio::test]
        async fn test_non_json_reply_is_error() {
            let mut server = mockito::Server::new_async().await;
            server
                .mock("POST", "/api/session")
                .with_status(200)
                .with_body("<html>ok</html>")
                .create_async()
                .await;

            let sync = HttpSessionSync::new(server.url()).unwrap();
            let result = sync.post_session(&SessionRecord::work(2000, 1500)).await;
            assert!(matches!(result, Err(SyncError::Network(_))));
        }
    }

    mod stats_tests {
        use super::*;

        #[tokio::test]
        async fn test_fetch_daily_stats_sends_date_query() {
            let mut server = mockito::Server::new_async().await;
            let mock = server
                .mock("GET", "/api/stats")
                .match_query(Matcher::UrlEncoded("date".into(), "2026-02-24".into()))
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(
                    json!({
                        "date": "2026-02-24",
                        "total_sessions": 2,
                        "total_work_seconds": 3000,
                        "total_break_seconds": 300,
                        "sessions": []
                    })
                    .to_string(),
                )
                .create_async()
                .await;

            let sync = HttpSessionSync::new(server.url()).unwrap();
            let date = NaiveDate::from_ymd_opt(2026, 2, 24).unwrap();
            let stats = sync.fetch_daily_stats(date).await.unwrap();

            assert_eq!(stats.total_sessions, 2);
            assert_eq!(stats.total_work_seconds, 3000);
            mock.assert_async().await;
        }
    }

    mod submit_tests {
        use super::*;

        #[test]
        fn test_submit_without_runtime_is_noop() {
            let sync = HttpSessionSync::new("http://127.0.0.1:9").unwrap();
            sync.submit(SessionRecord::work(2000, 1500));
        }

        #[tokio::test]
        async fn test_submit_uploads_in_background() {
            let mut server = mockito::Server::new_async().await;
            let mock = server
                .mock("POST", "/api/session")
                .with_status(201)
                .with_header("content-type", "application/json")
                .with_body(r#"{"ok":true}"#)
                .create_async()
                .await;

            let sync = HttpSessionSync::new(server.url()).unwrap();
            sync.submit(SessionRecord::work(2000, 1500));

            for _ in 0..100 {
                if mock.matched_async().await {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            mock.assert_async().await;
        }
    }
}
