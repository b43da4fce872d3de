//! Due date extraction for boleto text.

use serde::Serialize;

use super::patterns::DATE_DMY;

/// A due date in both forms carried by a slip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DueDate {
    /// `DD-MM`, used in generated filenames.
    pub short: String,
    /// `DD/MM/YYYY`, as printed on the slip.
    pub full: String,
}

impl DueDate {
    fn from_parts(day: &str, month: &str, year: &str) -> Self {
        Self {
            short: format!("{}-{}", day, month),
            full: format!("{}/{}/{}", day, month, year),
        }
    }
}

/// Extract the due date.
///
/// The first line mentioning `VENCIMENTO` that carries a `DD/MM/YYYY` date
/// wins; otherwise the first such date anywhere in the text is used.
pub fn extract_due_date(text: &str) -> Option<DueDate> {
    let labeled = text
        .split('\n')
        .filter(|line| line.to_uppercase().contains("VENCIMENTO"))
        .find_map(|line| DATE_DMY.captures(line));

    labeled
        .or_else(|| DATE_DMY.captures(text))
        .map(|caps| DueDate::from_parts(&caps[1], &caps[2], &caps[3]))
}

/// Convert `DD/MM/YYYY` to ISO `YYYY-MM-DD`.
pub fn to_iso_date(full: &str) -> Option<String> {
    let mut parts = full.trim().split('/');
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let date = chrono::NaiveDate::from_ymd_opt(
        year.parse().ok()?,
        month.parse().ok()?,
        day.parse().ok()?,
    )?;
    Some(date.format("%Y-%m-%d").to_string())
}
