//! HTTP client for the remote history collection.
//!
//! Endpoints:
//! - `GET    /api/history`       full collection
//! - `GET    /api/history/{id}`  single entry
//! - `POST   /api/history`       add entry, replies `{status, id}`
//! - `DELETE /api/history/{id}`  remove entry
//! - `DELETE /api/history`       remove everything

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use super::entry::{EntryId, HistoryEntry, NewEntry};
use super::error::{HistoryError, Result};
use crate::config::Settings;

/// Remote history collection.
#[async_trait]
pub trait HistoryApi: Send + Sync {
    /// Fetch the full collection in server order.
    async fn list(&self) -> Result<Vec<HistoryEntry>>;

    /// Fetch a single entry.
    async fn get(&self, id: EntryId) -> Result<HistoryEntry>;

    /// Store a new entry and return its server id.
    async fn create(&self, entry: &NewEntry) -> Result<EntryId>;

    async fn delete(&self, id: EntryId) -> Result<()>;

    /// Remove every entry of the collection.
    async fn clear(&self) -> Result<()>;
}

/// `{status, message, id}` envelope returned by mutating endpoints.
#[derive(Debug, Deserialize)]
struct StatusReply {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    id: Option<EntryId>,
}

impl StatusReply {
    fn into_success(self, fallback: &str) -> Result<Self> {
        if self.status == "success" {
            Ok(self)
        } else {
            Err(HistoryError::Application(
                self.message.unwrap_or_else(|| fallback.to_string()),
            ))
        }
    }
}

/// reqwest-backed [`HistoryApi`].
#[derive(Clone)]
pub struct HttpHistoryClient {
    client: Client,
    base_url: Url,
}

impl HttpHistoryClient {
    /// Create a client from settings.
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut base_url =
            Url::parse(&settings.base_url).map_err(|e| HistoryError::Config(e.to_string()))?;
        // Url::join replaces the last path segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        // Seed the jar so a session rotated via Set-Cookie replaces the configured one
        let jar = Jar::default();
        if let Some(cookie) = &settings.session_cookie {
            HeaderValue::from_str(cookie)
                .map_err(|e| HistoryError::Config(format!("session cookie: {}", e)))?;
            jar.add_cookie_str(cookie, &base_url);
        }

        let client = Client::builder()
            .user_agent(&settings.user_agent)
            .timeout(Duration::from_secs(settings.request_timeout))
            .cookie_provider(Arc::new(jar))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| HistoryError::Config(e.to_string()))
    }

    fn collection_url(&self) -> Result<Url> {
        self.endpoint("api/history")
    }

    fn entry_url(&self, id: EntryId) -> Result<Url> {
        self.endpoint(&format!("api/history/{}", id))
    }
}

/// Check status and content type, then decode the JSON body.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(HistoryError::Http { status });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if !content_type.contains("application/json") {
        warn!("Response is not JSON, likely HTML: {:?}", content_type);
        let shown = if content_type.is_empty() {
            "missing content type".to_string()
        } else {
            content_type
        };
        return Err(HistoryError::Format(shown));
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| HistoryError::Format(e.to_string()))
}

#[async_trait]
impl HistoryApi for HttpHistoryClient {
    async fn list(&self) -> Result<Vec<HistoryEntry>> {
        let mut url = self.collection_url()?;
        // Cache busting
        url.set_query(Some(&Utc::now().timestamp_millis().to_string()));

        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let value: serde_json::Value = read_json(response).await?;

        match value {
            serde_json::Value::Null => Err(HistoryError::Format("No data received".to_string())),
            serde_json::Value::Array(_) => {
                let entries: Vec<HistoryEntry> = serde_json::from_value(value)
                    .map_err(|e| HistoryError::Format(e.to_string()))?;
                debug!("History data fetched, length: {}", entries.len());
                Ok(entries)
            }
            other => {
                warn!("History response is not an array: {}", other);
                Ok(Vec::new())
            }
        }
    }

    async fn get(&self, id: EntryId) -> Result<HistoryEntry> {
        let url = self.entry_url(id)?;
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        read_json(response).await
    }

    async fn create(&self, entry: &NewEntry) -> Result<EntryId> {
        let url = self.collection_url()?;
        debug!("POST {} ({} entry)", url, entry.kind);
        let response = self.client.post(url).json(entry).send().await?;
        let reply: StatusReply = read_json(response).await?;
        let reply = reply.into_success("Failed to save to history")?;
        reply
            .id
            .ok_or_else(|| HistoryError::Application("Server did not return an id".to_string()))
    }

    async fn delete(&self, id: EntryId) -> Result<()> {
        let url = self.entry_url(id)?;
        debug!("DELETE {}", url);
        let response = self
            .client
            .delete(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        let reply: StatusReply = read_json(response).await?;
        reply.into_success("Failed to delete entry")?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let url = self.collection_url()?;
        debug!("DELETE {}", url);
        let response = self
            .client
            .delete(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        let reply: StatusReply = read_json(response).await?;
        reply.into_success("Failed to clear history")?;
        Ok(())
    }
}
