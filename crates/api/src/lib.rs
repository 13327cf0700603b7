//! # Invoicepatch API
//!
//! The HTTP surface: a small axum application exposing the authorization
//! flow, the sparse-update operation, and PDF download.

pub mod routes;
pub mod state;

pub use routes::router;
pub use state::{AppState, AuthPort, UpdatePort};
