//! Rule-based field extractors for boleto page text.

pub mod amounts;
pub mod dates;
pub mod names;
pub mod numbers;
pub mod patterns;
pub mod tax_id;

pub use amounts::{format_amount, format_brl};
pub use dates::{extract_due_date, to_iso_date, DueDate};
pub use names::clean_payer_name;
pub use tax_id::extract_tax_id;

/// Split page text into lines the way every heuristic expects.
///
/// Only `\n` separates lines; a trailing `\r` stays on the line.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}
