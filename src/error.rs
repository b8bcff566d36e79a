//! Analysis error types.

use thiserror::Error;

/// Errors that abort analysis of a single document.
///
/// Only document-level failures live here. Everything past XML parsing is
/// total: malformed paints degrade to `Mesh`, missing geometry degrades to a
/// zero fingerprint, and ambiguous shapes surface as low-confidence
/// classifications instead of errors.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("XML syntax error")]
    Xml(#[from] quick_xml::Error),

    #[error("document has no <svg> root element")]
    MissingRoot,
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
