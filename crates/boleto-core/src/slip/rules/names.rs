//! Payer name heuristics shared by the issuer strategies.
//!
//! The `payer_*` helpers return `Some` as soon as a candidate is accepted,
//! even when cleaning leaves it empty; callers stop at the first `Some`.

use super::patterns::{ILLEGAL_FILENAME_CHARS, NAME_CUT, PAYER_DASHED, PAYER_INLINE, WHITESPACE};
use super::tax_id::mentions_tax_id;

/// Reduce a raw payer line to a name usable in a filename.
///
/// Keeps the text before the first comma, `CNPJ` or `CPF` (any case) and
/// drops characters that are illegal in Windows filenames.
pub fn clean_payer_name(raw: &str) -> String {
    let head = NAME_CUT.split(raw).next().unwrap_or("").trim();
    ILLEGAL_FILENAME_CHARS.replace_all(head, "").trim().to_string()
}

/// Whether a line is the DANFE "DESTINATÁRIO / REMETENTE" header.
pub fn is_recipient_header(line: &str) -> bool {
    let upper = line.to_uppercase();
    upper.contains("DESTINAT") && upper.contains("REMETENTE")
}

/// Whether a line mentions `PAGADOR` in any case.
pub fn is_payer_label(line: &str) -> bool {
    line.to_uppercase().contains("PAGADOR")
}

/// Name found `distance` lines below the first accepted label line.
///
/// Candidates are trimmed; empty ones and those refused by `accept` are
/// skipped and the scan moves on to the next label.
pub fn payer_below<L, A>(lines: &[&str], is_label: L, distance: usize, accept: A) -> Option<String>
where
    L: Fn(&str) -> bool,
    A: Fn(&str) -> bool,
{
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_label(line))
        .filter_map(|(i, _)| lines.get(i + distance).map(|l| l.trim()))
        .find(|candidate| !candidate.is_empty() && accept(candidate))
        .map(clean_payer_name)
}

/// Name two lines below a DANFE recipient header.
pub fn payer_from_recipient_block(lines: &[&str]) -> Option<String> {
    payer_below(lines, is_recipient_header, 2, |name| !mentions_tax_id(name))
}

/// `Pagador: NAME CNPJ/...` on whitespace-collapsed text.
pub fn payer_inline(text: &str) -> Option<String> {
    let compact = WHITESPACE.replace_all(text.trim(), " ");
    PAYER_INLINE
        .captures(&compact)
        .map(|caps| clean_payer_name(caps[1].trim()))
}

/// `Pagador` line followed by `NAME - CNPJ` (optionally `NAME - EPP - CNPJ`).
pub fn payer_dashed(text: &str) -> Option<String> {
    PAYER_DASHED
        .captures(text)
        .map(|caps| clean_payer_name(caps[1].trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_payer_name() {
        assert_eq!(
            clean_payer_name("AREAIS DO LESTE LTDA, CNPJ 12.345.678/0001-90"),
            "AREAIS DO LESTE LTDA"
        );
        assert_eq!(clean_payer_name("FULANO DE TAL cpf 123"), "FULANO DE TAL");
        assert_eq!(clean_payer_name("  A/B: C*D?  "), "AB CD");
        assert_eq!(clean_payer_name("CNPJ 12.345.678/0001-90"), "");
    }

    #[test]
    fn test_recipient_block() {
        let lines = [
            "DESTINATÁRIO / REMETENTE",
            "NOME / RAZÃO SOCIAL",
            "MERCADO BOM PRECO LTDA",
        ];
        assert_eq!(
            payer_from_recipient_block(&lines).as_deref(),
            Some("MERCADO BOM PRECO LTDA")
        );

        let lines = ["DESTINATARIO/REMETENTE", "x", "CNPJ 12.345.678/0001-90"];
        assert_eq!(payer_from_recipient_block(&lines), None);
    }

    #[test]
    fn test_payer_below_skips_refused_candidates() {
        let lines = ["Pagador", "", "PAGADOR", "ACME LTDA"];
        assert_eq!(
            payer_below(&lines, is_payer_label, 1, |_| true).as_deref(),
            Some("ACME LTDA")
        );
    }

    #[test]
    fn test_payer_inline() {
        let text = "Beneficiario X\nPagador:  ACME   COMERCIO LTDA\nCNPJ/CPF 12.345.678/0001-90";
        assert_eq!(payer_inline(text).as_deref(), Some("ACME COMERCIO LTDA"));
        assert_eq!(payer_inline("Pagador ACME"), None);
    }

    #[test]
    fn test_payer_dashed() {
        let text = "Pagador\nPADARIA SÃO JOÃO - EPP - CNPJ 12.345.678/0001-90";
        assert_eq!(payer_dashed(text).as_deref(), Some("PADARIA SÃO JOÃO - EPP"));
    }
}
