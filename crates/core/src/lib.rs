//! FoodieHub
//!
//! Domain engine for the FoodieHub ordering client: carts, menus, principals
//! and the canonical order/driver records reconciled against the remote
//! services. Everything in this crate is pure state and classification logic;
//! transport, persistence and orchestration live in `foodiehub-app`.

pub mod cart;
pub mod envelope;
pub mod fixtures;
pub mod ids;
pub mod menu;
pub mod money;
pub mod orders;
pub mod principal;

pub(crate) mod wire;

pub use cart::{Cart, CartLine};
pub use ids::RecordId;
pub use menu::{Category, MenuItem};
pub use orders::{
    Driver, DriverAssignment, DriverContact, DriverStatus, LineSnapshot, OrderDraft, OrderRecord,
    OrderStatus, PaidOrderRecord, PaymentDraft,
};
pub use principal::{Principal, Role, UserAccount};
