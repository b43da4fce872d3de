//! Electronic invoice (NFe) data models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::slip::strip_leading_zeros;

/// Data read from one NFe document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceData {
    /// Whether the document could be read.
    pub valid: bool,

    /// Reason the document is invalid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Source file name.
    pub file_name: String,

    /// Invoice number without leading zeros.
    pub invoice_number: String,

    /// Recipient CNPJ or CPF.
    pub tax_id: String,

    /// Recipient name.
    pub recipient_name: String,

    /// Invoice total.
    pub total: Decimal,

    /// Accepted recipient emails (at most two).
    pub emails: Vec<String>,

    /// Rejected or truncated email candidates.
    #[serde(default)]
    pub invalid_emails: Vec<String>,

    /// Installments (duplicatas) from the billing section.
    #[serde(default)]
    pub installments: Vec<Installment>,
}

/// One installment (duplicata) of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    /// Installment number (`nDup`).
    pub number: String,

    /// Due date in ISO form (`YYYY-MM-DD`).
    pub due_date: String,

    /// Installment value.
    pub value: Decimal,
}

impl Default for InvoiceData {
    fn default() -> Self {
        Self {
            valid: true,
            error: None,
            file_name: String::new(),
            invoice_number: String::new(),
            tax_id: String::new(),
            recipient_name: String::new(),
            total: Decimal::ZERO,
            emails: Vec::new(),
            invalid_emails: Vec::new(),
            installments: Vec::new(),
        }
    }
}

impl InvoiceData {
    /// Record for a document that could not be parsed.
    pub fn invalid(file_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(reason.into()),
            file_name: file_name.into(),
            ..Default::default()
        }
    }

    /// Record for an invoice that is only available as a PDF.
    ///
    /// The invoice number is taken from the file stem (`3-0318865.pdf`
    /// yields `318865`); every other field stays empty.
    pub fn pdf_companion(file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let stem = std::path::Path::new(&file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let number = stem.rsplit('-').next().unwrap_or(stem);

        Self {
            invoice_number: normalize_invoice_number(number),
            file_name,
            ..Default::default()
        }
    }

    /// Whether the source file is a PDF companion rather than XML.
    pub fn is_pdf(&self) -> bool {
        self.file_name.to_lowercase().ends_with(".pdf")
    }

    /// Invoice number used to pair slips and invoices.
    pub fn invoice_key(&self) -> String {
        normalize_invoice_number(&self.invoice_number)
    }

    /// Installment due on the given ISO date.
    pub fn installment_due_on(&self, iso_date: &str) -> Option<&Installment> {
        self.installments.iter().find(|i| i.due_date == iso_date)
    }
}

/// Strip leading zeros, keeping `"0"` when nothing is left.
pub fn normalize_invoice_number(number: &str) -> String {
    let stripped = strip_leading_zeros(number.trim());
    if stripped.is_empty() {
        "0".to_string()
    } else {
        stripped.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_companion_number_from_stem() {
        let nfe = InvoiceData::pdf_companion("3-0318865.pdf");
        assert!(nfe.valid);
        assert!(nfe.is_pdf());
        assert_eq!(nfe.invoice_number, "318865");
        assert!(nfe.emails.is_empty());
        assert_eq!(nfe.total, Decimal::ZERO);

        let nfe = InvoiceData::pdf_companion("0305537.PDF");
        assert_eq!(nfe.invoice_number, "305537");
    }

    #[test]
    fn test_normalize_invoice_number() {
        assert_eq!(normalize_invoice_number("000310927"), "310927");
        assert_eq!(normalize_invoice_number("0000"), "0");
        assert_eq!(normalize_invoice_number(""), "0");
    }

    #[test]
    fn test_invalid_record() {
        let nfe = InvoiceData::invalid("a.xml", "broken");
        assert!(!nfe.valid);
        assert_eq!(nfe.error.as_deref(), Some("broken"));
    }
}
