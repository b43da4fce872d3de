//! CNPJ/CPF extraction from a window of slip lines.

use super::patterns::{CNPJ_FULL, CPF_FULL};

/// Lines scanned when no explicit window end is given.
pub const DEFAULT_WINDOW: usize = 5;

/// Find a tax id in `lines[start..end]`.
///
/// A CNPJ anywhere in the window is preferred over a CPF, even one that
/// appears on an earlier line. `end` defaults to `start + 5` and is
/// clamped to the number of lines.
pub fn extract_tax_id(lines: &[&str], start: usize, end: Option<usize>) -> Option<String> {
    let end = end.unwrap_or(start + DEFAULT_WINDOW).min(lines.len());
    let window = lines.get(start..end)?;

    window
        .iter()
        .find_map(|line| CNPJ_FULL.captures(line))
        .or_else(|| window.iter().find_map(|line| CPF_FULL.captures(line)))
        .map(|caps| caps[1].to_string())
}

/// Search the window after every line accepted by `is_label`.
///
/// The window starts `offset` lines after the label and spans `span` lines.
pub fn tax_id_near<F>(lines: &[&str], is_label: F, offset: usize, span: usize) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_label(line))
        .find_map(|(i, _)| extract_tax_id(lines, i + offset, Some(i + span)))
}

/// Whether a line mentions a CNPJ or CPF label.
pub fn mentions_tax_id(line: &str) -> bool {
    let upper = line.to_uppercase();
    upper.contains("CNPJ") || upper.contains("CPF")
}
