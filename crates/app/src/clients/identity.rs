//! Identity service client (accounts and sessions).

use async_trait::async_trait;
use foodiehub::RecordId;
use mockall::automock;
use reqwest::Client;
use serde_json::{Value, json};

use super::{ApiError, join_url, read_json, read_unit};

/// HTTP client for the identity service.
#[derive(Debug, Clone)]
pub struct HttpIdentityClient {
    base_url: String,
    http: Client,
}

impl HttpIdentityClient {
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
impl IdentityApi for HttpIdentityClient {
    async fn login(&self, email: &str, password: &str) -> Result<Value, ApiError> {
        let body = json!({ "email": email, "password": password });
        let response = self.http.post(self.url("login")).json(&body).send().await?;

        read_json(response).await
    }

    async fn add_user(&self, payload: Value) -> Result<Value, ApiError> {
        let response = self
            .http
            .post(self.url("adduser"))
            .json(&payload)
            .send()
            .await?;

        read_json(response).await
    }

    async fn users(&self) -> Result<Value, ApiError> {
        let response = self.http.get(self.url("getusers")).send().await?;

        read_json(response).await
    }

    async fn update_user(&self, id: &RecordId, payload: Value) -> Result<Value, ApiError> {
        let response = self
            .http
            .put(self.url(&format!("updateuser/{id}")))
            .json(&payload)
            .send()
            .await?;

        read_json(response).await
    }

    async fn delete_user(&self, id: &RecordId) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.url(&format!("deleteuser/{id}")))
            .send()
            .await?;

        read_unit(response).await
    }

    async fn delete_user_with_body(&self, id: &RecordId) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.url("deleteuser"))
            .json(&json!({ "id": id }))
            .send()
            .await?;

        read_unit(response).await
    }

    async fn delete_user_via_post(&self, id: &RecordId) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.url("deleteuser"))
            .json(&json!({ "id": id }))
            .send()
            .await?;

        read_unit(response).await
    }
}

/// Wire-level operations of the identity service.
///
/// The user-deletion endpoint varies across deployed backend revisions, so
/// the three observed shapes are exposed separately; the users service runs
/// the fallback chain.
#[automock]
#[async_trait]
pub trait IdentityApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<Value, ApiError>;

    async fn add_user(&self, payload: Value) -> Result<Value, ApiError>;

    async fn users(&self) -> Result<Value, ApiError>;

    async fn update_user(&self, id: &RecordId, payload: Value) -> Result<Value, ApiError>;

    /// DELETE with the id in the path.
    async fn delete_user(&self, id: &RecordId) -> Result<(), ApiError>;

    /// DELETE with the id in a JSON body.
    async fn delete_user_with_body(&self, id: &RecordId) -> Result<(), ApiError>;

    /// POST with the id in a JSON body.
    async fn delete_user_via_post(&self, id: &RecordId) -> Result<(), ApiError>;
}
