//! Order service errors.

use thiserror::Error;

use crate::clients::ApiError;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    /// The principal carries neither a user id nor an email, so no order
    /// endpoint can be resolved.
    #[error("principal has no user id or email to fetch orders by")]
    NoIdentifier,

    /// The paid-orders ledger is keyed by user id only.
    #[error("principal has no user id to fetch the paid ledger by")]
    NoUserId,

    #[error("backend request failed")]
    Api(#[source] ApiError),
}

impl From<ApiError> for OrdersServiceError {
    fn from(error: ApiError) -> Self {
        Self::Api(error)
    }
}
