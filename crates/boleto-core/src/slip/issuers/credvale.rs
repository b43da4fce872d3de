//! CREDVALE: boletos with a bare "Pagador" line, sometimes above the barcode.

use crate::slip::rules::amounts::{
    value_from_barcode, value_from_currency_sign, value_from_date_row, value_from_document_label,
};
use crate::slip::rules::names::{is_payer_label, payer_below, payer_dashed, payer_inline};
use crate::slip::rules::numbers::number_from_document_label;
use crate::slip::rules::patterns::{BARCODE_FIELD_START, BARCODE_LINE_START, CNPJ_FULL};
use crate::slip::rules::tax_id::tax_id_near;
use crate::slip::SlipExtractor;

/// Strategy for CREDVALE FIDC slips.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredvaleExtractor;

impl CredvaleExtractor {
    pub const TAG: &'static str = "CREDVALE";
}

fn is_bare_payer_line(line: &str) -> bool {
    line.trim() == "Pagador"
}

impl SlipExtractor for CredvaleExtractor {
    fn tag(&self) -> &str {
        Self::TAG
    }

    fn payer(&self, text: &str, lines: &[&str]) -> Option<String> {
        payer_below(lines, is_bare_payer_line, 1, |name| {
            !BARCODE_LINE_START.is_match(name)
        })
        .or_else(|| payer_dashed(text))
        .or_else(|| payer_inline(text))
        .or_else(|| {
            payer_below(lines, is_payer_label, 1, |name| {
                !BARCODE_FIELD_START.is_match(name)
            })
        })
    }

    fn tax_id(&self, text: &str, lines: &[&str]) -> Option<String> {
        tax_id_near(lines, |l| is_bare_payer_line(l) || is_payer_label(l), 0, 5)
            .or_else(|| CNPJ_FULL.captures(text).map(|caps| caps[1].to_string()))
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
