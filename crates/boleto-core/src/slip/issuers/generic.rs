//! Fallback strategy for slips from issuers without a dedicated layout.

use crate::slip::rules::amounts::{
    value_from_barcode, value_from_date_row, value_from_document_label, value_from_fatura,
};
use crate::slip::rules::names::{payer_below, payer_from_recipient_block, payer_inline};
use crate::slip::rules::numbers::{number_from_danfe, number_from_document_label};
use crate::slip::rules::patterns::BANK_BARCODE_LINE;
use crate::slip::SlipExtractor;

use super::recipient_or_label_tax_id;

/// Default tag for slips handled by the generic strategy.
pub const DEFAULT_GENERIC_TAG: &str = "GENERICO";

/// Broad heuristics tagged with a configurable issuer name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericExtractor {
    tag: String,
}

impl GenericExtractor {
    /// Create a generic strategy with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl Default for GenericExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_GENERIC_TAG)
    }
}

fn is_payer_or_drawee_label(line: &str) -> bool {
    let upper = line.to_uppercase();
    (upper.contains("PAGADOR") || upper.contains("SACADO")) && !upper.contains("RECIBO")
}

impl SlipExtractor for GenericExtractor {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn payer(&self, text: &str, lines: &[&str]) -> Option<String> {
        payer_from_recipient_block(lines)
            .or_else(|| payer_inline(text))
            .or_else(|| {
                payer_below(lines, is_payer_or_drawee_label, 1, |name| {
                    !BANK_BARCODE_LINE.is_match(name)
                })
            })
    }

    fn tax_id(&self, _text: &str, lines: &[&str]) -> Option<String> {
        recipient_or_label_tax_id(lines, |l| {
            let upper = l.to_uppercase();
            upper.contains("PAGADOR") || upper.contains("SACADO")
        })
    }

    fn raw_value(&self, text: &str) -> Option<String> {
        value_from_fatura(text)
            .or_else(|| value_from_document_label(text))
            .or_else(|| value_from_date_row(text))
            .or_else(|| value_from_barcode(text))
    }

    fn invoice_number(&self, lines: &[&str], _filename: &str) -> Option<String> {
        number_from_danfe(lines).or_else(|| number_from_document_label(lines))
    }
}
