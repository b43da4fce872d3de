//! Canonical file names for processed slips.
//!
//! Format: `{payer} - NF {invoice number} - {DD-MM} - {R$ value}.pdf`.

use crate::models::slip::{SlipData, DUE_DATE_UNDEFINED};
use crate::slip::rules::patterns::{ILLEGAL_FILENAME_CHARS, WHITESPACE};

/// Placeholder for a missing payer.
pub const NO_PAYER: &str = "SEM_PAGADOR";
/// Placeholder for a missing invoice number.
pub const NO_INVOICE: &str = "SEM_NF";
/// Placeholder for a missing amount.
pub const NO_VALUE: &str = "SEM_VALOR";

/// Longest file name accepted by common filesystems.
pub const MAX_FILE_NAME_LEN: usize = 255;

const PDF_SUFFIX: &str = ".pdf";

/// Build the renamed file name for a slip.
///
/// Missing fields are replaced by fixed placeholders, so the result is
/// always a usable name.
pub fn generate_name(slip: &SlipData) -> String {
    let payer = non_empty(slip.payer.as_deref()).unwrap_or(NO_PAYER);
    let number = non_empty(slip.invoice_number.as_deref()).unwrap_or(NO_INVOICE);
    let due = non_empty(slip.due_date.as_deref()).unwrap_or(DUE_DATE_UNDEFINED);
    let value = non_empty(slip.amount_display()).unwrap_or(NO_VALUE);

    sanitize_file_name(&format!(
        "{} - NF {} - {} - {}{}",
        payer, number, due, value, PDF_SUFFIX
    ))
}

/// Remove characters illegal in file names, collapse whitespace and cap
/// the length at [`MAX_FILE_NAME_LEN`] characters.
pub fn sanitize_file_name(name: &str) -> String {
    let name = ILLEGAL_FILENAME_CHARS.replace_all(name, "");
    let name = WHITESPACE.replace_all(&name, " ");
    let name = name.trim();

    if name.chars().count() <= MAX_FILE_NAME_LEN {
        return name.to_string();
    }

    let keep = MAX_FILE_NAME_LEN - PDF_SUFFIX.len();
    let mut truncated: String = name.chars().take(keep).collect();
    truncated.push_str(PDF_SUFFIX);
    truncated
}

/// Variant of a generated name carrying a ` (n)` counter before the
/// extension, used when the plain name is already taken.
pub fn numbered_name(name: &str, n: usize) -> String {
    let stem = name.strip_suffix(PDF_SUFFIX).unwrap_or(name);
    let counter = format!(" ({})", n);
    let room = MAX_FILE_NAME_LEN.saturating_sub(PDF_SUFFIX.len() + counter.len());
    let stem: String = stem.chars().take(room).collect();
    format!("{}{}{}", stem, counter, PDF_SUFFIX)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::slip::Amount;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_generate_name_all_fields() {
        let mut slip = SlipData::new("CAPITAL");
        slip.payer = Some("AREAIS DO LESTE SPE LTDA".to_string());
        slip.invoice_number = Some("310227".to_string());
        slip.due_date = Some("13-01".to_string());
        slip.amount = Some(Amount::new(Decimal::from_str("2833.34").unwrap()));

        assert_eq!(
            generate_name(&slip),
            "AREAIS DO LESTE SPE LTDA - NF 310227 - 13-01 - R$ 2.833,34.pdf"
        );
    }

    #[test]
    fn test_generate_name_placeholders() {
        let mut slip = SlipData::new("GENERICO");
        slip.payer = Some(String::new());
        assert_eq!(
            generate_name(&slip),
            "SEM_PAGADOR - NF SEM_NF - A definir - SEM_VALOR.pdf"
        );
    }

    #[test]
    fn test_illegal_characters_removed() {
        let mut slip = SlipData::new("SQUID");
        slip.payer = Some("A/B: \"C\"   <D>|E*?".to_string());
        slip.invoice_number = Some("1".to_string());
        slip.due_date = Some("01-02".to_string());
        assert_eq!(generate_name(&slip), "AB C DE - NF 1 - 01-02 - SEM_VALOR.pdf");
    }

    #[test]
    fn test_long_name_truncated() {
        let mut slip = SlipData::new("NOVAX");
        slip.payer = Some("Á".repeat(300));

        let name = generate_name(&slip);
        assert_eq!(name.chars().count(), MAX_FILE_NAME_LEN);
        assert!(name.ends_with(".pdf"));
        assert!(name.starts_with("ÁÁÁ"));
    }

    #[test]
    fn test_numbered_name() {
        assert_eq!(
            numbered_name("ACME - NF 1 - 13-01 - R$ 1,00.pdf", 2),
            "ACME - NF 1 - 13-01 - R$ 1,00 (2).pdf"
        );

        let long = sanitize_file_name(&format!("{}.pdf", "Ã".repeat(300)));
        let numbered = numbered_name(&long, 12);
        assert_eq!(numbered.chars().count(), MAX_FILE_NAME_LEN);
        assert!(numbered.ends_with("Ã (12).pdf"));
    }
}
