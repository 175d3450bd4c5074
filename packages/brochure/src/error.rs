//! Typed errors for the brochure library.
//!
//! Most pipeline failures are absorbed locally rather than raised: a bad
//! page fetch lands on `PageContent::error`, a failed link selection
//! degrades to zero candidates, and a synthesis failure is reported as a
//! sentinel text chunk. The enums here cover the two classes that do
//! surface as hard errors: configuration and document export.

use thiserror::Error;

/// Errors that surface from the brochure library.
#[derive(Debug, Error)]
pub enum BrochureError {
    /// Missing or malformed configuration (fatal at startup)
    #[error("configuration error: {0}")]
    Config(String),

    /// Document export failed
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

/// Errors that can occur while exporting the brochure document.
#[derive(Debug, Error)]
pub enum ExportError {
    /// PDF conversion failed
    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

/// Result type alias for brochure operations.
pub type Result<T> = std::result::Result<T, BrochureError>;
