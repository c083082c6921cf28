//! Clinic Booking Engine
//!
//! The storage and settlement core of the clinic booking server. This library contains no HTTP
//! types; the booking server drives it through the API structs re-exported below.
//!
//! The library is divided into three main sections:
//! 1. Database management and control ([`mod@sqlite`]). SQLite is the supported backend. You
//!    should never need to access the database directly; use the public API instead. The
//!    exception is the data types used in the database, which are defined in [`mod@db_types`]
//!    and are public.
//! 2. The public API ([`mod@api`]): accounts, catalog, cart and settlement. Backends implement
//!    the traits in [`mod@traits`] to plug in underneath it.
//! 3. The payment gateway client ([`mod@gateway`]): the Stripe-compatible HTTP client that
//!    authorises charges before the settlement transaction runs.
mod api;

pub mod db_types;
pub mod gateway;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;

pub use api::{AccountApi, CartApi, CatalogApi, SettlementApi, SettlementError};
