//! Menu service client.

use async_trait::async_trait;
use foodiehub::RecordId;
use mockall::automock;
use reqwest::Client;
use serde_json::Value;

use super::{ApiError, join_url, read_json, read_unit};

/// HTTP client for the menu service.
#[derive(Debug, Clone)]
pub struct HttpMenuClient {
    base_url: String,
    http: Client,
}

impl HttpMenuClient {
    #[must_use]
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

#[async_trait]
impl MenuApi for HttpMenuClient {
    async fn menu(&self) -> Result<Value, ApiError> {
        let response = self.http.get(self.url("getmenu")).send().await?;

        read_json(response).await
    }

    async fn add_item(&self, payload: Value) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.url("addmenu"))
            .json(&payload)
            .send()
            .await?;

        read_unit(response).await
    }

    async fn update_item(&self, payload: Value) -> Result<(), ApiError> {
        let response = self
            .http
            .put(self.url("updatemenu"))
            .json(&payload)
            .send()
            .await?;

        read_unit(response).await
    }

    // "deletmenu" is the backend's own spelling.
    async fn delete_item(&self, id: &RecordId) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.url(&format!("deletmenu/{id}")))
            .send()
            .await?;

        read_unit(response).await
    }
}

/// Wire-level operations of the menu service.
#[automock]
#[async_trait]
pub trait MenuApi: Send + Sync {
    async fn menu(&self) -> Result<Value, ApiError>;

    async fn add_item(&self, payload: Value) -> Result<(), ApiError>;

    async fn update_item(&self, payload: Value) -> Result<(), ApiError>;

    async fn delete_item(&self, id: &RecordId) -> Result<(), ApiError>;
}
