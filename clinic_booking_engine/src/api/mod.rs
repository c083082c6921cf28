//! The public API of the booking engine.
//!
//! Each struct wraps a storage backend (and, for settlement, a payment gateway) behind the trait
//! bounds from [`crate::traits`]. The HTTP layer holds these in its application state and never
//! reaches past them into the database.
mod accounts_api;
mod cart_api;
mod catalog_api;
mod errors;
mod settlement_api;

pub use accounts_api::AccountApi;
pub use cart_api::CartApi;
pub use catalog_api::CatalogApi;
pub use errors::SettlementError;
pub use settlement_api::SettlementApi;
