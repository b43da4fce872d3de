//! Pairing of slips with invoice records by invoice number.

use std::collections::HashMap;

use crate::models::nfe::{normalize_invoice_number, InvoiceData};
use crate::models::slip::SlipData;

/// Invoice records keyed by normalized invoice number.
///
/// Inserting a record with an existing number replaces the earlier one.
#[derive(Debug, Clone, Default)]
pub struct InvoiceIndex {
    by_number: HashMap<String, InvoiceData>,
}

impl InvoiceIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record under its normalized number.
    pub fn insert(&mut self, invoice: InvoiceData) {
        self.by_number.insert(invoice.invoice_key(), invoice);
    }

    /// Record for an invoice number (leading zeros ignored).
    pub fn get(&self, number: &str) -> Option<&InvoiceData> {
        self.by_number.get(&normalize_invoice_number(number))
    }

    /// Invoice paired with a slip, if the slip carries a number.
    pub fn find_for(&self, slip: &SlipData) -> Option<&InvoiceData> {
        match slip.invoice_key() {
            "" => None,
            key => self.by_number.get(key),
        }
    }

    /// Number of indexed invoices.
    pub fn len(&self) -> usize {
        self.by_number.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.by_number.is_empty()
    }

    /// Iterate over indexed records in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &InvoiceData> {
        self.by_number.values()
    }
}

impl FromIterator<InvoiceData> for InvoiceIndex {
    fn from_iter<I: IntoIterator<Item = InvoiceData>>(iter: I) -> Self {
        let mut index = Self::new();
        for invoice in iter {
            index.insert(invoice);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice(number: &str, name: &str) -> InvoiceData {
        InvoiceData {
            invoice_number: number.to_string(),
            recipient_name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_pair_by_normalized_number() {
        let index: InvoiceIndex = vec![invoice("310927", "A"), invoice("318865", "B")]
            .into_iter()
            .collect();

        let mut slip = SlipData::new("CAPITAL");
        slip.invoice_number = Some("0310927".to_string());
        assert_eq!(index.find_for(&slip).map(|i| i.recipient_name.as_str()), Some("A"));
        assert_eq!(index.get("000318865").map(|i| i.recipient_name.as_str()), Some("B"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_last_record_wins() {
        let index: InvoiceIndex = vec![invoice("42", "old"), invoice("0042", "new")]
            .into_iter()
            .collect();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("42").unwrap().recipient_name, "new");
    }

    #[test]
    fn test_slip_without_number_is_unpaired() {
        let index: InvoiceIndex = vec![invoice("0", "zero")].into_iter().collect();
        let slip = SlipData::new("NOVAX");
        assert!(index.find_for(&slip).is_none());
    }
}
