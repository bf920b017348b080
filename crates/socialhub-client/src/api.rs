//! REST client for the notification endpoints.

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use socialhub_core::types::NotificationId;
use socialhub_entity::{Notification, NotificationKind, TargetKind};

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnreadCountBody {
    unread_count: u64,
}

#[derive(Debug, Deserialize)]
struct MutationBody {
    affected: u64,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Body of `POST /api/notifications/emit`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmitRequest {
    pub recipient_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<EmitTarget>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmitTarget {
    pub kind: TargetKind,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Authenticated client for one user.
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: Url,
    token: String,
    http: Client,
}

impl RestClient {
    /// `base_url` is the server root, e.g. `http://localhost:8000`.
    pub fn new(base_url: &str, token: impl Into<String>) -> ClientResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        Ok(Self {
            base_url,
            token: token.into(),
            http: Client::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(format!("{path}: {e}")))
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.message,
                Err(_) => status.to_string(),
            };
            return Err(ClientError::Status { status, message });
        }
        Ok(response.json().await?)
    }

    /// `GET /api/notifications/unread-count`
    pub async fn unread_count(&self) -> ClientResult<u64> {
        let response = self
            .http
            .get(self.url("/api/notifications/unread-count")?)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let body: UnreadCountBody = Self::read(response).await?;
        Ok(body.unread_count)
    }

    /// `GET /api/notifications`, newest first.
    pub async fn list_recent(&self, limit: Option<u32>) -> ClientResult<Vec<Notification>> {
        let mut url = self.url("/api/notifications")?;
        if let Some(limit) = limit {
            url.query_pairs_mut()
                .append_pair("limit", &limit.to_string());
        }
        let response = self.http.get(url).bearer_auth(&self.token).send().await?;
        Self::read(response).await
    }

    /// `PATCH /api/notifications/{id}/read`. Returns whether anything changed.
    pub async fn mark_read(&self, id: &NotificationId) -> ClientResult<bool> {
        let response = self
            .http
            .patch(self.url(&format!("/api/notifications/{id}/read"))?)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let body: MutationBody = Self::read(response).await?;
        Ok(body.affected > 0)
    }

    /// `PATCH /api/notifications/mark-all-read`
    pub async fn mark_all_read(&self) -> ClientResult<u64> {
        let response = self
            .http
            .patch(self.url("/api/notifications/mark-all-read")?)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let body: MutationBody = Self::read(response).await?;
        Ok(body.affected)
    }

    /// `DELETE /api/notifications/clear-all`
    pub async fn clear_all(&self) -> ClientResult<u64> {
        let response = self
            .http
            .delete(self.url("/api/notifications/clear-all")?)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let body: MutationBody = Self::read(response).await?;
        Ok(body.affected)
    }

    /// `POST /api/notifications/emit`, as the like and message handlers call it.
    /// `None` when the server suppressed the notification.
    pub async fn emit(&self, request: &EmitRequest) -> ClientResult<Option<Notification>> {
        let response = self
            .http
            .post(self.url("/api/notifications/emit")?)
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;
        let body: Envelope<Option<Notification>> = Self::read(response).await?;
        Ok(body.data)
    }
}
