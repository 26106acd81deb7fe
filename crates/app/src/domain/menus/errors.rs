//! Menu service errors.

use thiserror::Error;

use crate::clients::ApiError;

#[derive(Debug, Error)]
pub enum MenusServiceError {
    #[error("backend request failed")]
    Api(#[source] ApiError),
}

impl From<ApiError> for MenusServiceError {
    fn from(error: ApiError) -> Self {
        Self::Api(error)
    }
}
