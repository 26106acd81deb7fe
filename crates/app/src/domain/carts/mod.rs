//! Carts

pub mod errors;
pub mod service;
pub mod submitter;

pub use errors::CartsServiceError;
pub use service::*;
pub use submitter::{OrderSubmitter, SubmissionRecord, SubmissionStatus};
