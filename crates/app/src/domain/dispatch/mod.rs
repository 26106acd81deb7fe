//! Dispatch

pub mod errors;
pub mod service;

pub use errors::DispatchServiceError;
pub use service::*;
