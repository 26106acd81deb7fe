//! Reviews

pub mod models;
pub mod service;

pub use models::Review;
pub use service::*;
