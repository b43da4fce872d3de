//! Boleto field extraction.
//!
//! Each issuer (receivables fund) prints slips with its own layout, so the
//! field heuristics live in one strategy per issuer. All strategies share
//! the [`SlipExtractor::extract`] assembly and its error bookkeeping.

pub mod issuers;
pub mod rules;
pub mod selector;

use serde::Serialize;
use tracing::debug;

pub use issuers::{
    CapitalExtractor, CredvaleExtractor, GenericExtractor, NovaxExtractor, SquidExtractor,
    DEFAULT_GENERIC_TAG,
};
pub use selector::IssuerSelector;

use crate::error::SelectionError;
use crate::models::slip::SlipData;
use rules::{extract_due_date, format_amount, split_lines};

/// An issuer-specific set of field heuristics.
pub trait SlipExtractor {
    /// Tag stored in [`SlipData::issuer`].
    fn tag(&self) -> &str;

    /// Payer name, already cleaned.
    fn payer(&self, text: &str, lines: &[&str]) -> Option<String>;

    /// Payer CNPJ/CPF.
    fn tax_id(&self, text: &str, lines: &[&str]) -> Option<String>;

    /// Raw value string, before parsing.
    fn raw_value(&self, text: &str) -> Option<String>;

    /// Invoice number referenced by the slip.
    fn invoice_number(&self, lines: &[&str], filename: &str) -> Option<String>;

    /// Extract a full record from slip text. Never fails; unresolved
    /// fields are listed in [`SlipData::errors`].
    fn extract(&self, text: &str, filename: &str) -> SlipData {
        let lines = split_lines(text);
        let mut slip = SlipData::new(self.tag());

        slip.payer = self.payer(text, &lines).filter(|p| !p.is_empty());
        if let Some(due) = extract_due_date(text) {
            slip.due_date = Some(due.short);
            slip.due_date_full = Some(due.full);
        }
        slip.invoice_number = self.invoice_number(&lines, filename);
        slip.tax_id = self.tax_id(text, &lines);
        slip.amount = self.raw_value(text).as_deref().and_then(format_amount);

        slip.record_missing_fields();

        debug!(
            issuer = self.tag(),
            filename,
            errors = slip.errors.len(),
            "Extracted slip fields"
        );

        slip
    }
}

/// Closed set of issuer strategies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "tag", rename_all = "snake_case")]
pub enum Issuer {
    Capital,
    Novax,
    Credvale,
    Squid,
    /// Fallback strategy tagged with a configurable name.
    Generic(String),
}

impl Issuer {
    /// Names accepted by [`Issuer::from_name`].
    pub const NAMES: [&'static str; 4] = ["CAPITAL", "NOVAX", "CREDVALE", "SQUID"];

    /// Look up a named strategy (case-insensitive, trimmed).
    pub fn from_name(name: &str) -> Result<Self, SelectionError> {
        match name.trim().to_uppercase().as_str() {
            "CAPITAL" => Ok(Issuer::Capital),
            "NOVAX" => Ok(Issuer::Novax),
            "CREDVALE" => Ok(Issuer::Credvale),
            "SQUID" => Ok(Issuer::Squid),
            _ => Err(SelectionError::UnknownIssuer {
                name: name.to_string(),
                available: Self::NAMES.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }

    /// Every issuer-specific strategy, in keyword priority order.
    pub fn all() -> Vec<Issuer> {
        vec![Issuer::Capital, Issuer::Novax, Issuer::Credvale, Issuer::Squid]
    }

    /// Generic strategy with the given tag.
    pub fn generic(tag: impl Into<String>) -> Self {
        Issuer::Generic(tag.into())
    }

    /// Tag stored on extracted records.
    pub fn tag(&self) -> &str {
        match self {
            Issuer::Capital => CapitalExtractor::TAG,
            Issuer::Novax => NovaxExtractor::TAG,
            Issuer::Credvale => CredvaleExtractor::TAG,
            Issuer::Squid => SquidExtractor::TAG,
            Issuer::Generic(tag) => tag,
        }
    }

    /// Run this issuer's strategy over slip text.
    pub fn extract(&self, text: &str, filename: &str) -> SlipData {
        match self {
            Issuer::Capital => CapitalExtractor.extract(text, filename),
            Issuer::Novax => NovaxExtractor.extract(text, filename),
            Issuer::Credvale => CredvaleExtractor.extract(text, filename),
            Issuer::Squid => SquidExtractor.extract(text, filename),
            Issuer::Generic(tag) => GenericExtractor::new(tag.clone()).extract(text, filename),
        }
    }
}

impl std::str::FromStr for Issuer {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl std::fmt::Display for Issuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
