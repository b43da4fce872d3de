//! CAPITAL RS: DANFE pages followed by a traditional boleto.

use crate::slip::rules::amounts::{
    value_from_barcode, value_from_date_row, value_from_document_label, value_from_fatura,
};
use crate::slip::rules::names::{is_payer_label, payer_below, payer_from_recipient_block};
use crate::slip::rules::numbers::{number_from_danfe, number_from_document_label};
use crate::slip::SlipExtractor;

use super::recipient_or_label_tax_id;

/// Strategy for CAPITAL RS FIDC slips.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapitalExtractor;

impl CapitalExtractor {
    pub const TAG: &'static str = "CAPITAL";
}

impl SlipExtractor for CapitalExtractor {
    fn tag(&self) -> &str {
        Self::TAG
    }

    fn payer(&self, _text: &str, lines: &[&str]) -> Option<String> {
        payer_from_recipient_block(lines).or_else(|| payer_below(lines, is_payer_label, 1, |_| true))
    }

    fn tax_id(&self, _text: &str, lines: &[&str]) -> Option<String> {
        recipient_or_label_tax_id(lines, is_payer_label)
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

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const DANFE_AND_SLIP: &str = "DANFE
NÚMERO DA NOTA
Nº 0318865
DESTINATÁRIO / REMETENTE
NOME / RAZÃO SOCIAL
AREAIS DO LESTE COMERCIO LTDA
CNPJ / CPF
12.345.678/0001-90
FATURA
NUM. VENC. VALOR
001 17/02/2026 2.833,34
Beneficiário CAPITAL RS FIDC
Vencimento 17/02/2026
(=) Valor do Documento
2.833,34";

    #[test]
    fn test_danfe_layout() {
        let slip = CapitalExtractor.extract(DANFE_AND_SLIP, "boleto.pdf");

        assert_eq!(slip.issuer, "CAPITAL");
        assert_eq!(slip.payer.as_deref(), Some("AREAIS DO LESTE COMERCIO LTDA"));
        assert_eq!(slip.tax_id.as_deref(), Some("12.345.678/0001-90"));
        assert_eq!(slip.invoice_number.as_deref(), Some("318865"));
        assert_eq!(slip.due_date.as_deref(), Some("17-02"));
        assert_eq!(slip.due_date_full.as_deref(), Some("17/02/2026"));
        assert_eq!(slip.amount_value(), Some(Decimal::from_str("2833.34").unwrap()));
        assert_eq!(slip.amount_display(), Some("R$ 2.833,34"));
        assert!(slip.errors.is_empty());
    }

    #[test]
    fn test_plain_slip_with_barcode_value() {
        let text = "Beneficiário CAPITAL RS FIDC
Pagador
MERCADO CENTRAL LTDA, CNPJ 98.765.432/0001-10
Número do Documento
0310927/001
Vencimento
20/03/2026
23793.38128 60000.000003 00000.000400 1 98700001500001";

        let slip = CapitalExtractor.extract(text, "");
        assert_eq!(slip.payer.as_deref(), Some("MERCADO CENTRAL LTDA"));
        assert_eq!(slip.tax_id.as_deref(), Some("98.765.432/0001-10"));
        assert_eq!(slip.invoice_number.as_deref(), Some("310927"));
        assert_eq!(slip.due_date.as_deref(), Some("20-03"));
        assert_eq!(slip.amount_display(), Some("R$ 1.500,00"));
    }
}
