//! Accounting platform integration
//!
//! REST client for the invoice endpoints, custom-field definition parsing and
//! value coercion, PDF archival, and the update orchestrator that sequences
//! lookup, archive, resolution, and submission.

pub mod archive;
pub mod client;
pub mod fields;
pub mod types;
pub mod updater;

pub use client::BooksClient;
pub use types::{CustomFieldDefinition, CustomFieldEntry, InvoiceRef};
pub use updater::{InvoiceUpdater, TracingRecorder, UpdateRecorder};
