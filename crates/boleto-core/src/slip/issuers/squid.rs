//! SQUID: DANFE-style slips whose invoice number may only be in the filename.

use crate::slip::rules::amounts::{
    value_from_barcode, value_from_currency_sign, value_from_date_row, value_from_document_label,
    value_from_fatura,
};
use crate::slip::rules::names::{
    is_payer_label, payer_below, payer_from_recipient_block, payer_inline,
};
use crate::slip::rules::numbers::{
    number_from_danfe, number_from_document_label, number_from_filename,
};
use crate::slip::SlipExtractor;

use super::recipient_or_label_tax_id;

/// Strategy for SQUID FIDC slips.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquidExtractor;

impl SquidExtractor {
    pub const TAG: &'static str = "SQUID";
}

impl SlipExtractor for SquidExtractor {
    fn tag(&self) -> &str {
        Self::TAG
    }

    fn payer(&self, text: &str, lines: &[&str]) -> Option<String> {
        payer_from_recipient_block(lines)
            .or_else(|| payer_below(lines, is_payer_label, 1, |_| true))
            .or_else(|| payer_inline(text))
    }

    fn tax_id(&self, _text: &str, lines: &[&str]) -> Option<String> {
        recipient_or_label_tax_id(lines, is_payer_label)
    }

    fn raw_value(&self, text: &str) -> Option<String> {
        value_from_fatura(text)
            .or_else(|| value_from_document_label(text))
            .or_else(|| value_from_date_row(text))
            .or_else(|| value_from_currency_sign(text))
            .or_else(|| value_from_barcode(text))
    }

    fn invoice_number(&self, lines: &[&str], filename: &str) -> Option<String> {
        number_from_danfe(lines)
            .or_else(|| number_from_document_label(lines))
            .or_else(|| {
                if filename.is_empty() {
                    None
                } else {
                    number_from_filename(filename)
                }
            })
    }
}
