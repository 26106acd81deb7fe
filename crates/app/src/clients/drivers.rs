//! Driver service client.
//!
//! Drivers live on the identity service host; the endpoints predate the
//! path-parameter convention, so detail fetch and status update each try the
//! newer path-style URL first and fall back to the older shape.

use async_trait::async_trait;
use foodiehub::{RecordId, orders::DriverStatus};
use mockall::automock;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

use super::{ApiError, join_url, read_json, read_unit};

/// HTTP client for the driver endpoints.
#[derive(Debug, Clone)]
pub struct HttpDriversClient {
    base_url: String,
    http: Client,
}

impl HttpDriversClient {
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

    async fn driver_by_path(&self, id: &RecordId) -> Result<Value, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("getdriver/{id}")))
            .send()
            .await?;

        read_json(response).await
    }

    async fn driver_by_query(&self, id: &RecordId) -> Result<Value, ApiError> {
        let response = self
            .http
            .get(self.url("getdriver"))
            .query(&[("id", id.as_str())])
            .send()
            .await?;

        read_json(response).await
    }

    async fn update_status_by_path(
        &self,
        id: &RecordId,
        status: &DriverStatus,
    ) -> Result<(), ApiError> {
        let response = self
            .http
            .put(self.url(&format!("updatedriver/{id}")))
            .json(&json!({ "status": status.as_wire() }))
            .send()
            .await?;

        read_unit(response).await
    }

    async fn update_status_by_body(
        &self,
        id: &RecordId,
        status: &DriverStatus,
    ) -> Result<(), ApiError> {
        let response = self
            .http
            .put(self.url("updatedriver"))
            .json(&json!({ "id": id, "status": status.as_wire() }))
            .send()
            .await?;

        read_unit(response).await
    }
}

#[async_trait]
impl DriversApi for HttpDriversClient {
    async fn roster(&self) -> Result<Value, ApiError> {
        let response = self.http.get(self.url("getdrivers")).send().await?;

        read_json(response).await
    }

    async fn driver(&self, id: &RecordId) -> Result<Value, ApiError> {
        match self.driver_by_path(id).await {
            Ok(value) => Ok(value),
            Err(error) => {
                debug!(driver_id = %id, %error, "path-style driver fetch failed, trying query form");
                self.driver_by_query(id).await
            }
        }
    }

    async fn update_status(&self, id: &RecordId, status: &DriverStatus) -> Result<(), ApiError> {
        match self.update_status_by_path(id, status).await {
            Ok(()) => Ok(()),
            Err(error) => {
                debug!(driver_id = %id, %error, "path-style driver update failed, trying body form");
                self.update_status_by_body(id, status).await
            }
        }
    }
}

/// Wire-level operations of the driver endpoints.
#[automock]
#[async_trait]
pub trait DriversApi: Send + Sync {
    async fn roster(&self) -> Result<Value, ApiError>;

    async fn driver(&self, id: &RecordId) -> Result<Value, ApiError>;

    async fn update_status(&self, id: &RecordId, status: &DriverStatus) -> Result<(), ApiError>;
}
