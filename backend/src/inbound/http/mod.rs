//! HTTP inbound adapter exposing REST endpoints.

pub mod admin;
pub mod error;
pub mod export;
pub mod health;
pub mod registrations;
pub mod routes;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
