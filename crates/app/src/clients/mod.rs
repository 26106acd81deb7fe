//! HTTP clients for the three backend services.
//!
//! Each client is a thin wire layer: it owns URL construction, status
//! checking and body decoding, and hands duck-typed JSON up to the domain
//! services, which canonicalize it exactly once. Every client sits behind an
//! `#[automock]`ed trait so orchestration logic is testable offline.

use reqwest::{Response, StatusCode};
use serde_json::Value;
use thiserror::Error;

pub mod drivers;
pub mod identity;
pub mod menu;
pub mod orders;

pub use drivers::*;
pub use identity::*;
pub use menu::*;
pub use orders::*;

/// Errors shared by all backend wire clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a usable HTTP response.
    #[error("transport failure")]
    Transport(#[source] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("request failed with status {status}: {message}")]
    Status { status: StatusCode, message: String },

    /// The body could not be decoded as the expected JSON.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error)
    }
}

/// Fail non-2xx responses, carrying whatever error text the backend sent.
pub(crate) async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();

    Err(ApiError::Status { status, message })
}

/// Decode a JSON body from a successful response.
pub(crate) async fn read_json(response: Response) -> Result<Value, ApiError> {
    let response = check_status(response).await?;
    let body = response.text().await?;

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(|error| ApiError::MalformedResponse(error.to_string()))
}

/// Run a response to completion, discarding the body.
///
/// Write endpoints answer with inconsistent bodies (JSON, plain text, or
/// nothing); only the status matters to callers.
pub(crate) async fn read_unit(response: Response) -> Result<(), ApiError> {
    check_status(response).await?;
    Ok(())
}

/// Join a configured base URL and a relative path.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{path}", base.trim_end_matches('/'))
}
