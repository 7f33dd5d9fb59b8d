//! Picdrop API Library
//!
//! This crate provides the HTTP handlers, middleware, and application setup.

mod handlers;
mod middleware;
mod telemetry;

pub mod error;
pub mod setup;
pub mod state;
pub mod utils;

pub use error::{ApiError, HttpAppError};
pub use middleware::REQUEST_ID_HEADER;
pub use state::AppState;
