//! Amount extraction and formatting for boleto text.
//!
//! Each `value_from_*` strategy returns the raw captured string; issuers
//! try them in their own priority order and hand the first hit to
//! [`format_amount`].

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{
    BARCODE_VALUE, CURRENCY_VALUE, DOCUMENT_VALUE, DOCUMENT_VALUE_MARKED, DOC_DATE_VALUE_LINE,
    FATURA_VALUE,
};
use crate::models::slip::Amount;

/// Parse a Brazilian-formatted amount (`"2.833,34"`, `"R$ 1.234,56"`, `"150.00"`).
///
/// When a comma is present, dots are thousands separators and the comma is
/// the decimal mark. Otherwise the string is parsed as-is.
pub fn format_amount(raw: &str) -> Option<Amount> {
    let cleaned = raw.replace("R$", "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned.to_string()
    };

    Decimal::from_str(&normalized).ok().map(Amount::new)
}

/// Format a number Brazilian style without currency (`1.234,56`).
pub fn format_brl_number(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.abs());
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();
    if amount.is_sign_negative() && !amount.is_zero() {
        formatted.push('-');
    }

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    format!("{},{}", formatted, decimal_part)
}

/// Format an amount for display (`R$ 1.234,56`).
pub fn format_brl(amount: Decimal) -> String {
    format!("R$ {}", format_brl_number(amount))
}

/// Value next to a "Valor (do) Documento" label, preferring the `(=)` form.
pub fn value_from_document_label(text: &str) -> Option<String> {
    DOCUMENT_VALUE_MARKED
        .captures(text)
        .or_else(|| DOCUMENT_VALUE.captures(text))
        .map(|caps| caps[1].to_string())
}

/// Value on a "document number, date, value" row.
pub fn value_from_date_row(text: &str) -> Option<String> {
    DOC_DATE_VALUE_LINE
        .captures(text)
        .map(|caps| caps[1].to_string())
}

/// Value encoded in the 14-digit tail of a typed barcode line.
///
/// Digits 4 to 13 of the tail hold the value in cents; a zero value is
/// ignored.
pub fn value_from_barcode(text: &str) -> Option<String> {
    let caps = BARCODE_VALUE.captures(text)?;
    let code = &caps[1];
    let cents: i64 = code.get(3..13)?.parse().ok()?;
    if cents <= 0 {
        return None;
    }
    Some(format_brl_number(Decimal::new(cents, 2)))
}

/// Value from the first row of a DANFE "FATURA" block.
pub fn value_from_fatura(text: &str) -> Option<String> {
    FATURA_VALUE.captures(text).map(|caps| caps[1].to_string())
}

/// First amount following an `R$` sign.
pub fn value_from_currency_sign(text: &str) -> Option<String> {
    CURRENCY_VALUE.captures(text).map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_amount() {
        let amount = format_amount("2.833,34").unwrap();
        assert_eq!(amount.value(), dec("2833.34"));
        assert_eq!(amount.display(), "R$ 2.833,34");

        assert_eq!(format_amount("R$ 1.234,56").unwrap().value(), dec("1234.56"));
        assert_eq!(format_amount("150.00").unwrap().value(), dec("150.00"));
        assert_eq!(format_amount("0,50").unwrap().display(), "R$ 0,50");
    }

    #[test]
    fn test_format_amount_rejects_garbage() {
        assert!(format_amount("").is_none());
        assert!(format_amount("R$ ").is_none());
        assert!(format_amount("abc").is_none());
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(dec("1234.56")), "R$ 1.234,56");
        assert_eq!(format_brl(dec("12345678.9")), "R$ 12.345.678,90");
        assert_eq!(format_brl(dec("0")), "R$ 0,00");
        assert_eq!(format_brl_number(dec("999.99")), "999,99");
    }

    #[test]
    fn test_value_from_document_label() {
        let text = "(=) Valor do Documento\nR$ 2.833,34\nValor Documento 10,00";
        assert_eq!(value_from_document_label(text).as_deref(), Some("2.833,34"));

        let text = "Valor Documento: 1.500,00";
        assert_eq!(value_from_document_label(text).as_deref(), Some("1.500,00"));
    }

    #[test]
    fn test_value_from_date_row() {
        let text = "Nosso numero\n310926/004 17/02/2026 2.221,20\n";
        assert_eq!(value_from_date_row(text).as_deref(), Some("2.221,20"));
    }

    #[test]
    fn test_value_from_barcode() {
        let text = "23793.38128 60000.000003 00000.000400 1 98700002833341";
        assert_eq!(value_from_barcode(text).as_deref(), Some("2.833,34"));

        let zero = "23793.38128 60000.000003 00000.000400 1 12300000000009";
        assert_eq!(value_from_barcode(zero), None);
    }

    #[test]
    fn test_fatura_value_excludes_day_of_month() {
        let text = "FATURA / DUPLICATA\nNUM. VENC. VALOR\n001 17/02/2026 2.221,20\n002 17/03/2026 2.221,20";
        assert_eq!(value_from_fatura(text).as_deref(), Some("2.221,20"));

        let text = "fatura\nnumero vencimento valor\n  001 05/01/2026 987,65";
        assert_eq!(value_from_fatura(text).as_deref(), Some("987,65"));
    }

    #[test]
    fn test_value_from_currency_sign() {
        assert_eq!(
            value_from_currency_sign("Total R$ 99,90 pago").as_deref(),
            Some("99,90")
        );
        assert_eq!(value_from_currency_sign("sem valor"), None);
    }
}
