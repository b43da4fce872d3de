//! Common regex patterns for boleto and DANFE page text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Dates
    pub static ref DATE_DMY: Regex = Regex::new(
        r"(\d{2})/(\d{2})/(\d{4})"
    ).unwrap();

    // Tax ids, full punctuated form only
    pub static ref CNPJ_FULL: Regex = Regex::new(
        r"(\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2})"
    ).unwrap();

    pub static ref CPF_FULL: Regex = Regex::new(
        r"(\d{3}\.\d{3}\.\d{3}-\d{2})"
    ).unwrap();

    pub static ref CNPJ_LABELED: Regex = Regex::new(
        r"CNPJ[:\s]*(\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2})"
    ).unwrap();

    // Payer names
    pub static ref NAME_CUT: Regex = Regex::new(
        r"(?i),|CNPJ|CPF"
    ).unwrap();

    pub static ref ILLEGAL_FILENAME_CHARS: Regex = Regex::new(
        r#"[\\/:*?"<>|]"#
    ).unwrap();

    pub static ref WHITESPACE: Regex = Regex::new(
        r"\s+"
    ).unwrap();

    /// "Pagador: NAME CNPJ ..." on whitespace-collapsed text.
    pub static ref PAYER_INLINE: Regex = Regex::new(
        r"(?i)Pagador:\s*([A-Z0-9][A-Z0-9\s.\-&]+?)(?:\s+CNPJ[/\s]|\s+CPF)"
    ).unwrap();

    /// "Pagador" line followed by "NAME - CNPJ" / "NAME - EPP - CNPJ".
    pub static ref PAYER_DASHED: Regex = Regex::new(
        r"(?im)Pagador\s*\n\s*([A-ZÀ-Ú][A-ZÀ-Ú\s.\-&]+?)\s*-\s*(?:CNPJ|CPF)"
    ).unwrap();

    // Barcode (linha digitavel) lines
    pub static ref BARCODE_LINE_START: Regex = Regex::new(
        r"^\d{5}\.\d{5}\s+\d{5}"
    ).unwrap();

    pub static ref BARCODE_FIELD_START: Regex = Regex::new(
        r"^\d{5}\.\d{5}"
    ).unwrap();

    pub static ref BANK_BARCODE_LINE: Regex = Regex::new(
        r"^\d{3}-\d\s+\d{5}\.\d{5}"
    ).unwrap();

    pub static ref BARCODE_VALUE: Regex = Regex::new(
        r"\d{5}\.\d{5}\s+\d{5}\.\d{6}\s+\d{5}\.\d{6}\s+\d\s+(\d{14})"
    ).unwrap();

    // Value labels
    pub static ref DOCUMENT_VALUE_MARKED: Regex = Regex::new(
        r"(?im)\(=\)\s*Valor\s+(?:do\s+)?Documento\s*[:\s]*(?:R\$\s*)?([\d.,]+)"
    ).unwrap();

    pub static ref DOCUMENT_VALUE: Regex = Regex::new(
        r"(?im)Valor\s+(?:do\s+)?Documento\s*[:\s]*(?:R\$\s*)?([\d.,]+)"
    ).unwrap();

    /// "310926/004 17/02/2026 2.221,20"
    pub static ref DOC_DATE_VALUE_LINE: Regex = Regex::new(
        r"\d{6}[/\d]*\s+\d{2}/\d{2}/\d{4}\s+([\d.,]+)"
    ).unwrap();

    /// DANFE billing block: two lines after "FATURA", then "NNN DD/MM/YYYY VALUE".
    /// Group 1 holds the value alone, never the day of month before it.
    pub static ref FATURA_VALUE: Regex = Regex::new(
        r"(?is)FATURA.*?[\r\n]+.*?[\r\n]+\s*\d{3}\s+\d{2}/\d{2}/\d{4}\s+(\d{1,3}(?:\.\d{3})*,\d{2})(?:\s|$)"
    ).unwrap();

    pub static ref CURRENCY_VALUE: Regex = Regex::new(
        r"R\$\s*([\d.,]+)"
    ).unwrap();

    // Invoice numbers
    pub static ref DOCUMENT_NUMBER: Regex = Regex::new(
        r"0?(\d{6})(?:/\d{3})?"
    ).unwrap();

    pub static ref DANFE_NUMBER: Regex = Regex::new(
        r"0?(\d{6})"
    ).unwrap();

    /// "3-0305537.pdf"
    pub static ref FILENAME_PREFIXED_NUMBER: Regex = Regex::new(
        r"\d+-0*(\d{6})\."
    ).unwrap();

    /// "305537.pdf"
    pub static ref FILENAME_BARE_NUMBER: Regex = Regex::new(
        r"^0*(\d{6})\."
    ).unwrap();
}
