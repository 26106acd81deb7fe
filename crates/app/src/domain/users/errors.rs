//! User admin service errors.

use thiserror::Error;

use crate::clients::ApiError;

#[derive(Debug, Error)]
pub enum UsersServiceError {
    #[error("backend request failed")]
    Api(#[source] ApiError),
}

impl From<ApiError> for UsersServiceError {
    fn from(error: ApiError) -> Self {
        Self::Api(error)
    }
}
