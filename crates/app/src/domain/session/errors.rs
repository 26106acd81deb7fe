//! Session service errors.

use thiserror::Error;

use crate::clients::ApiError;

#[derive(Debug, Error)]
pub enum SessionServiceError {
    #[error("no authenticated session")]
    NotLoggedIn,

    #[error("stored session has no user id")]
    MissingUserId,

    #[error("response carried no identity record")]
    MalformedIdentity,

    #[error("backend request failed")]
    Api(#[source] ApiError),
}

impl From<ApiError> for SessionServiceError {
    fn from(error: ApiError) -> Self {
        Self::Api(error)
    }
}
