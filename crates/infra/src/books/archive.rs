//! PDF archival
//!
//! Writes the pre-update PDF rendering into a caller-specified directory
//! under a filename that embeds the document number, the pre-update
//! transaction date, and the current date.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use invoicepatch_domain::{InvoicePatchError, Result};
use tracing::info;

/// Archive filename: `"{doc} - {txn_date} - moved_{today}.pdf"`.
pub fn archive_filename(doc_number: &str, txn_date: NaiveDate, today: NaiveDate) -> String {
    format!("{doc_number} - {txn_date} - moved_{today}.pdf")
}

/// Create the archive directory if absent and write the PDF bytes.
pub fn write_archive(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|err| {
        InvoicePatchError::Io(format!(
            "failed to create archive directory {}: {err}",
            dir.display()
        ))
    })?;

    let path = dir.join(filename);
    std::fs::write(&path, bytes).map_err(|err| {
        InvoicePatchError::Io(format!("failed to write archive {}: {err}", path.display()))
    })?;

    info!(path = %path.display(), size = bytes.len(), "archived invoice PDF");
    Ok(path)
}
