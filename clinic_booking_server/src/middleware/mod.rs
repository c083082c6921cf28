//! The authorization gate.
//!
//! Three composable middleware stages, applied per route by the `route!` macro:
//! * [`BearerAuthFactory`] authenticates the request from its `Authorization` header and parks the
//!   validated claims in the request extensions.
//! * [`AclMiddlewareFactory`] authorizes by role, looking the authenticated subject up in the
//!   identity store.
//! * [`SelfCheckFactory`] authorizes by ownership, comparing the authenticated subject to the
//!   `{email}` path segment before anything touches the database.
//!
//! The first failing stage short-circuits; no handler logic runs after a rejection.
mod acl;
mod bearer;
mod self_check;

pub use acl::AclMiddlewareFactory;
pub use bearer::BearerAuthFactory;
pub use self_check::SelfCheckFactory;
