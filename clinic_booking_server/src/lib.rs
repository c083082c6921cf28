//! # Clinic Booking Server
//! This crate hosts the HTTP surface of the clinic booking service. It is responsible for:
//! * Issuing and verifying bearer credentials for clients.
//! * Enforcing role- and ownership-based access on guarded routes.
//! * Driving the booking engine: accounts, catalog, cart and checkout settlement.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! Route definitions and their guard chains live in [routes](routes/index.html). The authorization
//! middleware itself is in [middleware](middleware/index.html).

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
