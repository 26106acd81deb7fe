//! Session

pub mod errors;
pub mod models;
pub mod service;

pub use errors::SessionServiceError;
pub use service::*;
