//! NOVAX: compact slips with an inline "Pagador:" field.

use crate::slip::rules::amounts::{
    value_from_barcode, value_from_currency_sign, value_from_date_row, value_from_document_label,
};
use crate::slip::rules::names::{is_payer_label, payer_below, payer_inline};
use crate::slip::rules::numbers::number_from_document_label;
use crate::slip::rules::patterns::CNPJ_LABELED;
use crate::slip::rules::tax_id::{mentions_tax_id, tax_id_near};
use crate::slip::SlipExtractor;

/// Strategy for NOVAX FIDC slips.
#[derive(Debug, Clone, Copy, Default)]
pub struct NovaxExtractor;

impl NovaxExtractor {
    pub const TAG: &'static str = "NOVAX";
}

impl SlipExtractor for NovaxExtractor {
    fn tag(&self) -> &str {
        Self::TAG
    }

    fn payer(&self, text: &str, lines: &[&str]) -> Option<String> {
        payer_inline(text)
            .or_else(|| payer_below(lines, is_payer_label, 1, |name| !mentions_tax_id(name)))
    }

    fn tax_id(&self, text: &str, lines: &[&str]) -> Option<String> {
        tax_id_near(lines, is_payer_label, 0, 5)
            .or_else(|| CNPJ_LABELED.captures(text).map(|caps| caps[1].to_string()))
    }

    fn raw_value(&self, text: &str) -> Option<String> {
        value_from_document_label(text)
            .or_else(|| value_from_date_row(text))
            .or_else(|| value_from_currency_sign(text))
            .or_else(|| value_from_barcode(text))
    }

    fn invoice_number(&self, lines: &[&str], _filename: &str) -> Option<String> {
        number_from_document_label(lines)
    }
}
