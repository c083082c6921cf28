//! Payment gateway clients.
//!
//! The [`PaymentGateway`](crate::traits::PaymentGateway) trait lives in [`crate::traits`]; this
//! module holds the concrete Stripe-compatible HTTP client used in production.
mod stripe;

pub use stripe::{GatewayConfig, StripeGateway};
