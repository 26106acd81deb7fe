//! Order and payment service client.

use async_trait::async_trait;
use foodiehub::{
    RecordId,
    orders::{OrderDraft, OrderStatus, PaymentDraft},
};
use mockall::automock;
use reqwest::{Client, header};
use serde_json::{Value, json};

use super::{ApiError, check_status, join_url, read_json, read_unit};

/// Requested render format of an order bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BillKind {
    Pdf,
    Json,
    Html,
}

impl BillKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Json => "json",
            Self::Html => "html",
        }
    }
}

/// A fetched bill, branched on the response content type.
#[derive(Debug, Clone)]
pub enum BillDocument {
    Pdf(Vec<u8>),
    Json(Value),
    Html(String),
}

impl BillDocument {
    pub(crate) fn from_parts(content_type: Option<&str>, body: &[u8]) -> Result<Self, ApiError> {
        let content_type = content_type.unwrap_or_default();

        if content_type.contains("application/pdf") {
            return Ok(Self::Pdf(body.to_vec()));
        }

        if content_type.contains("application/json") {
            let value = serde_json::from_slice(body)
                .map_err(|error| ApiError::MalformedResponse(error.to_string()))?;
            return Ok(Self::Json(value));
        }

        Ok(Self::Html(String::from_utf8_lossy(body).into_owned()))
    }
}

/// HTTP client for the order and payment service.
#[derive(Debug, Clone)]
pub struct HttpOrdersClient {
    base_url: String,
    http: Client,
}

impl HttpOrdersClient {
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
impl OrdersApi for HttpOrdersClient {
    async fn submit_order(&self, draft: &OrderDraft) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.url("addorder"))
            .json(draft)
            .send()
            .await?;

        read_unit(response).await
    }

    async fn orders(&self) -> Result<Value, ApiError> {
        let response = self.http.get(self.url("getorders")).send().await?;

        read_json(response).await
    }

    async fn orders_by_user(&self, user: &RecordId) -> Result<Value, ApiError> {
        let response = self
            .http
            .get(self.url("getorders"))
            .query(&[("user_id", user.as_str())])
            .send()
            .await?;

        read_json(response).await
    }

    async fn orders_by_email(&self, email: &str) -> Result<Value, ApiError> {
        let response = self
            .http
            .get(self.url("getordersms"))
            .query(&[("email", email)])
            .send()
            .await?;

        read_json(response).await
    }

    async fn paid_orders_for(&self, user: &RecordId) -> Result<Value, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("paid-orders/user/{user}")))
            .send()
            .await?;

        read_json(response).await
    }

    async fn add_paid_order(&self, draft: &PaymentDraft) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.url("paid-orders/add"))
            .json(draft)
            .send()
            .await?;

        read_unit(response).await
    }

    async fn update_status(&self, order: &RecordId, status: &OrderStatus) -> Result<(), ApiError> {
        let response = self
            .http
            .put(self.url(&format!("updatestatus/{order}")))
            .json(&json!({ "status": status.as_wire() }))
            .send()
            .await?;

        read_unit(response).await
    }

    async fn delete_order(&self, order: &RecordId) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.url(&format!("deleteorder/{order}")))
            .send()
            .await?;

        read_unit(response).await
    }

    async fn assignment_for(&self, order: &RecordId) -> Result<Value, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("getassigndrivers/{order}")))
            .send()
            .await?;

        read_json(response).await
    }

    async fn assign_driver(&self, order: &RecordId, driver: &RecordId) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.url(&format!("assigndriver/{order}")))
            .json(&json!({ "driverId": driver }))
            .send()
            .await?;

        read_unit(response).await
    }

    async fn unassign_driver(&self, order: &RecordId, driver: &RecordId) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.url(&format!("unassigndriver/{order}")))
            .json(&json!({ "driverId": driver }))
            .send()
            .await?;

        read_unit(response).await
    }

    async fn bill(&self, order: &RecordId, kind: BillKind) -> Result<BillDocument, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("bill/{order}/{}", kind.as_str())))
            .send()
            .await?;

        let response = check_status(response).await?;
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await?;

        BillDocument::from_parts(content_type.as_deref(), &body)
    }
}

/// Wire-level operations of the order and payment service.
#[automock]
#[async_trait]
pub trait OrdersApi: Send + Sync {
    async fn submit_order(&self, draft: &OrderDraft) -> Result<(), ApiError>;

    /// All orders, unscoped; admin views only.
    async fn orders(&self) -> Result<Value, ApiError>;

    async fn orders_by_user(&self, user: &RecordId) -> Result<Value, ApiError>;

    async fn orders_by_email(&self, email: &str) -> Result<Value, ApiError>;

    async fn paid_orders_for(&self, user: &RecordId) -> Result<Value, ApiError>;

    async fn add_paid_order(&self, draft: &PaymentDraft) -> Result<(), ApiError>;

    async fn update_status(&self, order: &RecordId, status: &OrderStatus) -> Result<(), ApiError>;

    async fn delete_order(&self, order: &RecordId) -> Result<(), ApiError>;

    async fn assignment_for(&self, order: &RecordId) -> Result<Value, ApiError>;

    async fn assign_driver(&self, order: &RecordId, driver: &RecordId) -> Result<(), ApiError>;

    async fn unassign_driver(&self, order: &RecordId, driver: &RecordId) -> Result<(), ApiError>;

    async fn bill(&self, order: &RecordId, kind: BillKind) -> Result<BillDocument, ApiError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn pdf_content_type_yields_raw_bytes() -> TestResult {
        let bill = BillDocument::from_parts(Some("application/pdf"), b"%PDF-1.4")?;

        assert!(
            matches!(bill, BillDocument::Pdf(bytes) if bytes == b"%PDF-1.4"),
            "expected Pdf document"
        );

        Ok(())
    }

    #[test]
    fn json_content_type_is_decoded() -> TestResult {
        let bill =
            BillDocument::from_parts(Some("application/json; charset=utf-8"), br#"{"total":5}"#)?;

        assert!(
            matches!(bill, BillDocument::Json(value) if value["total"] == 5),
            "expected decoded Json document"
        );

        Ok(())
    }

    #[test]
    fn json_content_type_with_garbage_body_is_malformed() {
        let result = BillDocument::from_parts(Some("application/json"), b"<html>oops</html>");

        assert!(
            matches!(result, Err(ApiError::MalformedResponse(_))),
            "expected MalformedResponse, got {result:?}"
        );
    }

    #[test]
    fn anything_else_falls_back_to_html_text() -> TestResult {
        let bill = BillDocument::from_parts(Some("text/html"), b"<h1>Bill</h1>")?;

        assert!(
            matches!(bill, BillDocument::Html(text) if text == "<h1>Bill</h1>"),
            "expected Html document"
        );

        let untyped = BillDocument::from_parts(None, b"plain text")?;

        assert!(
            matches!(untyped, BillDocument::Html(text) if text == "plain text"),
            "missing content type should fall back to Html"
        );

        Ok(())
    }
}
