//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod auth;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod trips;
pub mod validation;
pub mod welcome;

pub use error::ApiResult;
