//! Dispatch service errors.

use thiserror::Error;

use crate::clients::ApiError;

#[derive(Debug, Error)]
pub enum DispatchServiceError {
    #[error("order carries no id to key the assignment by")]
    MissingOrderId,

    /// Unassignment needs to know which driver to release; the order view
    /// did not name one.
    #[error("order has no resolvable assigned driver")]
    MissingDriverId,

    #[error("backend request failed")]
    Api(#[source] ApiError),
}

impl From<ApiError> for DispatchServiceError {
    fn from(error: ApiError) -> Self {
        Self::Api(error)
    }
}
