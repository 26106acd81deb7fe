//! Menus

pub mod errors;
pub mod models;
pub mod service;

pub use errors::MenusServiceError;
pub use models::MenuItemDraft;
pub use service::*;
