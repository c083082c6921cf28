mod accounts;
mod auth;
mod helpers;
mod mocks;
mod payments;
