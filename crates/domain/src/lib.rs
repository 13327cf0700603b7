//! # Invoicepatch Domain
//!
//! Shared types for the invoicepatch workspace.
//!
//! This crate contains:
//! - The caller-facing update contract (`UpdateRequest`, `UpdateOutcome`)
//! - Error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other invoicepatch crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
