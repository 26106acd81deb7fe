//! FoodieHub Domain Concerns

pub mod carts;
pub mod dispatch;
pub mod menus;
pub mod orders;
pub mod reviews;
pub mod session;
pub mod users;
