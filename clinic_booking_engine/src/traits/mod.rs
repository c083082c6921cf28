//! Interface contracts for the clinic booking storage backends and the payment gateway.
//!
//! The booking server never talks to the database directly; it goes through the API structs in
//! [`crate::api`], which are generic over the traits defined here. The SQLite backend in
//! [`crate::sqlite`] is the production implementation; tests substitute mocks.
//!
//! * [`AccountManagement`] owns the identity store: account lookup, idempotent registration and
//!   role assignment.
//! * [`CatalogManagement`] and [`CartManagement`] cover the unguarded CRUD surface.
//! * [`SettlementStore`] is the transactional heart of checkout: it must remove cart items and
//!   write the payment record as a single atomic unit.
//! * [`PaymentGateway`] abstracts the external charge authorisation service.

mod account_management;
mod cart_management;
mod catalog_management;
mod payment_gateway;
mod settlement_store;

pub use account_management::{AccountApiError, AccountManagement};
pub use cart_management::{CartApiError, CartManagement};
pub use catalog_management::{CatalogApiError, CatalogManagement};
pub use payment_gateway::{GatewayAuthorization, GatewayError, PaymentGateway};
pub use settlement_store::{SettlementStore, SettlementStoreError};
