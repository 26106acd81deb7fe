//! Cart service errors.

use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("no authenticated session")]
    NotLoggedIn,

    #[error("failed to persist cart")]
    Storage(#[from] StorageError),
}
