//! Payment slip (boleto) data extracted from page text.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::slip::rules::amounts::format_brl;

/// Placeholder stored as the short due date when none could be extracted.
pub const DUE_DATE_UNDEFINED: &str = "A definir";

/// Extraction error: payer not found.
pub const ERR_PAYER_NOT_FOUND: &str = "Pagador não encontrado";
/// Extraction error: due date not found.
pub const ERR_DUE_DATE_NOT_FOUND: &str = "Data de vencimento não encontrada";
/// Extraction error: value not found.
pub const ERR_VALUE_NOT_FOUND: &str = "Valor não encontrado";
/// Extraction error: invoice number not found.
pub const ERR_INVOICE_NUMBER_NOT_FOUND: &str = "Número da nota não encontrado";

/// A monetary amount together with its `R$ X.XXX,XX` rendering.
///
/// Both parts are produced by [`Amount::new`], so the display string can
/// never disagree with the numeric value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Amount {
    value: Decimal,
    display: String,
}

impl Amount {
    /// Build an amount, rounding to two fraction digits.
    pub fn new(value: Decimal) -> Self {
        let value = value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
        Self {
            display: format_brl(value),
            value,
        }
    }

    /// Numeric value with two fraction digits.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Localized display string (`R$ 2.833,34`).
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Value in integer cents, or `None` when it does not fit an `i64`.
    pub fn cents(&self) -> Option<i64> {
        to_cents(self.value)
    }
}

/// Convert a decimal amount to integer cents, rounding half away from zero.
///
/// Returns `None` when the amount is too large for an `i64` cent count.
pub fn to_cents(value: Decimal) -> Option<i64> {
    use rust_decimal::prelude::ToPrimitive;

    value
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Structured data extracted from one payment slip.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlipData {
    /// Payer name, cleaned for use in a filename.
    pub payer: Option<String>,

    /// Payer CNPJ/CPF as printed on the slip.
    pub tax_id: Option<String>,

    /// Invoice (NF) number referenced by the slip.
    pub invoice_number: Option<String>,

    /// Due date in `DD-MM` form, or [`DUE_DATE_UNDEFINED`].
    pub due_date: Option<String>,

    /// Due date in `DD/MM/YYYY` form.
    pub due_date_full: Option<String>,

    /// Slip amount.
    pub amount: Option<Amount>,

    /// Tag of the issuer strategy that produced this record.
    pub issuer: String,

    /// Fields that could not be extracted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl SlipData {
    /// Create an empty record tagged with the issuer that will fill it.
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            ..Default::default()
        }
    }

    /// Numeric amount, if one was extracted.
    pub fn amount_value(&self) -> Option<Decimal> {
        self.amount.as_ref().map(Amount::value)
    }

    /// Display amount, if one was extracted.
    pub fn amount_display(&self) -> Option<&str> {
        self.amount.as_ref().map(Amount::display)
    }

    /// Invoice number with leading zeros removed (empty when absent).
    pub fn invoice_key(&self) -> &str {
        self.invoice_number
            .as_deref()
            .map(strip_leading_zeros)
            .unwrap_or("")
    }

    /// Record the fixed error for every field left unresolved.
    ///
    /// A missing due date is replaced by [`DUE_DATE_UNDEFINED`].
    pub fn record_missing_fields(&mut self) {
        if self.payer.as_deref().is_none_or(str::is_empty) {
            self.errors.push(ERR_PAYER_NOT_FOUND.to_string());
        }
        if self.due_date.is_none() {
            self.due_date = Some(DUE_DATE_UNDEFINED.to_string());
            self.errors.push(ERR_DUE_DATE_NOT_FOUND.to_string());
        }
        if self.amount.is_none() {
            self.errors.push(ERR_VALUE_NOT_FOUND.to_string());
        }
        if self.invoice_number.as_deref().is_none_or(str::is_empty) {
            self.errors.push(ERR_INVOICE_NUMBER_NOT_FOUND.to_string());
        }
    }
}

/// Strip leading zeros from an invoice number. May return an empty string.
pub fn strip_leading_zeros(number: &str) -> &str {
    number.trim_start_matches('0')
}
