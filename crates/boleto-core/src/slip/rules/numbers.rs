//! Invoice (NF) number extraction for slips.

use std::path::Path;

use super::patterns::{
    DANFE_NUMBER, DOCUMENT_NUMBER, FILENAME_BARE_NUMBER, FILENAME_PREFIXED_NUMBER,
};
use regex::Regex;

/// Lines scanned from a label line, the label itself included.
const LABEL_SCAN: usize = 4;

fn number_after_label(lines: &[&str], label: &str, pattern: &Regex) -> Option<String> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.to_uppercase().contains(label))
        .find_map(|(i, _)| {
            let end = (i + LABEL_SCAN).min(lines.len());
            lines[i..end]
                .iter()
                .find_map(|line| pattern.captures(line))
                .map(|caps| caps[1].to_string())
        })
}

/// Six-digit number near a "Número do Documento" label.
///
/// One leading zero and a `/NNN` installment suffix are dropped.
pub fn number_from_document_label(lines: &[&str]) -> Option<String> {
    number_after_label(lines, "MERO DO DOCUMENTO", &DOCUMENT_NUMBER)
}

/// Six-digit number near a DANFE "NÚMERO DA NOTA" label.
pub fn number_from_danfe(lines: &[&str]) -> Option<String> {
    number_after_label(lines, "MERO DA NOTA", &DANFE_NUMBER)
}

/// Number encoded in a slip filename (`3-0305537.pdf`, `305537.pdf`).
pub fn number_from_filename(filename: &str) -> Option<String> {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    FILENAME_PREFIXED_NUMBER
        .captures(name)
        .or_else(|| FILENAME_BARE_NUMBER.captures(name))
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_document_number_drops_suffix() {
        let lines = ["Beneficiário", "Número do Documento", "0310927/001"];
        assert_eq!(number_from_document_label(&lines).as_deref(), Some("310927"));
    }

    #[test]
    fn test_document_number_window() {
        let lines = ["NÚMERO DO DOCUMENTO", "a", "b", "c", "310927"];
        assert_eq!(number_from_document_label(&lines), None);
    }

    #[test]
    fn test_danfe_number() {
        let lines = ["DANFE", "NÚMERO DA NOTA", "Nº 000.318", "0318865 SÉRIE 1"];
        assert_eq!(number_from_danfe(&lines).as_deref(), Some("318865"));
    }

    #[test]
    fn test_number_from_filename() {
        assert_eq!(number_from_filename("3-0305537.pdf").as_deref(), Some("305537"));
        assert_eq!(number_from_filename("/tmp/in/305537.pdf").as_deref(), Some("305537"));
        assert_eq!(number_from_filename("3-000305537.pdf").as_deref(), Some("305537"));
        assert_eq!(number_from_filename("boleto.pdf"), None);
    }
}
