//! Error types for the boleto-core library.
//!
//! Extraction misses and unreadable NFe documents are not errors: they are
//! recorded on the returned [`SlipData`](crate::SlipData) and
//! [`InvoiceData`](crate::InvoiceData). Only the cases below reach callers.

use thiserror::Error;

/// Main error type for the boleto library.
#[derive(Error, Debug)]
pub enum BoletoError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Issuer selection error.
    #[error("selection error: {0}")]
    Selection(#[from] SelectionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors raised while reading an NFe document.
///
/// These never leave the NFe parser; they become the error message of an
/// invalid [`InvoiceData`](crate::InvoiceData) record.
#[derive(Error, Debug)]
pub enum NfeError {
    /// Malformed XML.
    #[error("{0}")]
    Xml(#[from] quick_xml::Error),

    /// The file could not be read.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The document ended inside an element.
    #[error("unclosed element <{0}>")]
    Unclosed(String),

    /// The document has no root element.
    #[error("no root element found")]
    NoRoot,
}

/// Errors raised when choosing an issuer strategy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// The issuer name does not match any known strategy.
    #[error("issuer '{name}' not recognized (available: {})", available.join(", "))]
    UnknownIssuer { name: String, available: Vec<String> },
}

/// Result type for the boleto library.
pub type Result<T> = std::result::Result<T, BoletoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_issuer_message_lists_available() {
        let err = SelectionError::UnknownIssuer {
            name: "ACME".to_string(),
            available: vec!["CAPITAL".to_string(), "NOVAX".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "issuer 'ACME' not recognized (available: CAPITAL, NOVAX)"
        );

        let wrapped: BoletoError = err.into();
        assert!(matches!(wrapped, BoletoError::Selection(_)));
    }
}
