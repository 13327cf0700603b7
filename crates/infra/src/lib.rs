//! # Invoicepatch Infra
//!
//! Infrastructure layer: everything that talks to the outside world.
//!
//! - `auth`: credential persistence, OAuth token exchange, and the session
//!   provider that hands out bearer-authorized API sessions
//! - `books`: accounting-platform REST client and the invoice update
//!   orchestrator
//! - `config`: environment/file configuration loader
//! - `http`: thin reqwest wrapper shared by the OAuth and API clients

pub mod auth;
pub mod books;
pub mod config;
pub mod http;

pub use auth::session::{ApiSession, SessionProvider};
pub use books::updater::InvoiceUpdater;
