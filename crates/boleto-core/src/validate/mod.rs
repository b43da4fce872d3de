//! Five-layer validation of a slip against its paired invoice.
//!
//! Layers run in order: invoice presence, tax id, payer name, value and
//! recipient emails. Only a blocking failure at the first layer stops the
//! run; the remaining slots keep their "not validated" placeholders.

mod similarity;

pub use similarity::{normalize_name, similarity_ratio};

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::models::config::ValidationConfig;
use crate::models::nfe::InvoiceData;
use crate::models::slip::{strip_leading_zeros, to_cents, SlipData};
use crate::models::validation::{
    placeholder_layers, set_layer, Layer, LayerResult, Surcharge, ValidationOutcome,
};
use crate::slip::rules::to_iso_date;

/// Default allowed value difference in cents.
pub const DEFAULT_VALUE_TOLERANCE_CENTS: i64 = 0;

/// Default minimum name similarity ratio.
pub const DEFAULT_MIN_NAME_SIMILARITY: f64 = 0.85;

/// Validates slips against invoice records.
#[derive(Debug, Clone)]
pub struct Validator {
    value_tolerance_cents: i64,
    min_name_similarity: f64,
}

impl Validator {
    /// Create a validator with the default thresholds.
    pub fn new() -> Self {
        Self {
            value_tolerance_cents: DEFAULT_VALUE_TOLERANCE_CENTS,
            min_name_similarity: DEFAULT_MIN_NAME_SIMILARITY,
        }
    }

    /// Create a validator from configuration.
    pub fn from_config(config: &ValidationConfig) -> Self {
        Self::new()
            .with_value_tolerance_cents(config.value_tolerance_cents)
            .with_min_name_similarity(config.min_name_similarity)
    }

    /// Set the allowed value difference in cents.
    pub fn with_value_tolerance_cents(mut self, cents: i64) -> Self {
        self.value_tolerance_cents = cents.max(0);
        self
    }

    /// Set the minimum name similarity ratio (0.0 - 1.0).
    pub fn with_min_name_similarity(mut self, ratio: f64) -> Self {
        self.min_name_similarity = ratio.clamp(0.0, 1.0);
        self
    }

    /// Run all layers for one slip and its paired invoice, if any.
    pub fn validate(&self, slip: &SlipData, invoice: Option<&InvoiceData>) -> ValidationOutcome {
        let mut layers = placeholder_layers();

        let presence = check_invoice(slip, invoice);
        let stop = presence.blocks;
        set_layer(&mut layers, presence, Layer::Invoice);

        let invoice = match invoice {
            Some(invoice) if !stop => invoice,
            _ => {
                let outcome = ValidationOutcome::from_layers(layers, None);
                info!(
                    invoice = slip.invoice_number.as_deref().unwrap_or("?"),
                    reason = outcome.rejection_reason.as_deref().unwrap_or(""),
                    "Slip rejected at invoice layer"
                );
                return outcome;
            }
        };

        set_layer(&mut layers, check_tax_id(slip, invoice), Layer::TaxId);
        set_layer(&mut layers, self.check_name(slip, invoice), Layer::Name);
        set_layer(&mut layers, self.check_value(slip, invoice), Layer::Value);
        set_layer(&mut layers, check_emails(invoice), Layer::Email);

        let outcome = ValidationOutcome::from_layers(layers, self.surcharge(slip, invoice));
        info!(
            invoice = %invoice.invoice_number,
            approved = outcome.approved,
            surcharge = outcome.surcharge_detected,
            "Slip validated"
        );
        outcome
    }

    fn check_name(&self, slip: &SlipData, invoice: &InvoiceData) -> LayerResult {
        let slip_name = normalize_name(slip.payer.as_deref().unwrap_or(""));
        let invoice_name = normalize_name(&invoice.recipient_name);

        if slip_name.is_empty() || invoice_name.is_empty() {
            return LayerResult::pass(Layer::Name, "Nome não disponível para comparação")
                .with_detail("nome_boleto", slip_name)
                .with_detail("nome_xml", invoice_name);
        }

        let ratio = similarity_ratio(&slip_name, &invoice_name);
        let pct = (ratio * 1000.0).round() / 10.0;
        debug!(ratio, slip_name = %slip_name, invoice_name = %invoice_name, "Name similarity");

        let result = if ratio >= self.min_name_similarity {
            LayerResult::pass(
                Layer::Name,
                format!(
                    "Similaridade {:.1}% (>={:.0}%)",
                    pct,
                    self.min_name_similarity * 100.0
                ),
            )
        } else {
            LayerResult::warn(Layer::Name, format!("Similaridade baixa ({:.1}%)", pct))
        };

        result
            .with_detail("similaridade", pct)
            .with_detail("nome_boleto", slip_name)
            .with_detail("nome_xml", invoice_name)
    }

    fn check_value(&self, slip: &SlipData, invoice: &InvoiceData) -> LayerResult {
        let Some(slip_value) = slip.amount_value() else {
            return LayerResult::pass(Layer::Value, "Valor do boleto não disponível para comparação");
        };

        let invoice_value = match comparison_value(slip, invoice) {
            Some(value) if !value.is_zero() => value,
            _ => {
                return LayerResult::pass(Layer::Value, "Valor do XML não disponível para comparação")
                    .with_detail("valor_boleto", slip_value.to_string());
            }
        };

        let Some(difference) = cents_difference(slip_value, invoice_value) else {
            return LayerResult::block(Layer::Value, "Valor divergente! Diferença fora do limite")
                .with_detail("valor_boleto", slip_value.to_string())
                .with_detail("valor_xml", invoice_value.to_string());
        };

        if to_cents(difference).is_some_and(|cents| cents <= self.value_tolerance_cents) {
            return LayerResult::pass(Layer::Value, "Valor confere")
                .with_detail("valor_boleto", slip_value.to_string())
                .with_detail("valor_xml", invoice_value.to_string());
        }

        LayerResult::block(
            Layer::Value,
            format!("Valor divergente! Diferença R$ {:.2}", difference),
        )
        .with_detail("valor_boleto", slip_value.to_string())
        .with_detail("valor_xml", invoice_value.to_string())
        .with_detail("diferenca", format!("{:.2}", difference))
    }

    /// Interest/penalty surcharge: the slip amount above the layer-4
    /// comparison value. Never affects approval.
    pub fn surcharge(&self, slip: &SlipData, invoice: &InvoiceData) -> Option<Surcharge> {
        let slip_value = slip.amount_value()?;
        let reference = comparison_value(slip, invoice).filter(|v| !v.is_zero())?;

        let difference = slip_value.checked_sub(reference)?;
        if difference <= Decimal::ZERO {
            return None;
        }

        let percentage = difference
            .checked_div(reference)?
            .checked_mul(Decimal::ONE_HUNDRED)?;

        Some(Surcharge {
            slip_amount: slip_value,
            invoice_amount: reference,
            difference: difference.round_dp(2),
            percentage: percentage.round_dp(2),
        })
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Invoice value a slip is compared against.
///
/// The installment due on the slip's due date wins; otherwise the invoice
/// total when positive.
pub fn comparison_value(slip: &SlipData, invoice: &InvoiceData) -> Option<Decimal> {
    let installment = slip
        .due_date_full
        .as_deref()
        .and_then(to_iso_date)
        .and_then(|iso| invoice.installment_due_on(&iso));

    match installment {
        Some(installment) => Some(installment.value),
        None if invoice.total > Decimal::ZERO => Some(invoice.total),
        None => None,
    }
}

/// Absolute difference of two amounts, each rounded to cents first.
/// `None` when the subtraction overflows.
fn cents_difference(a: Decimal, b: Decimal) -> Option<Decimal> {
    let round = |v: Decimal| {
        v.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
    };
    round(a).checked_sub(round(b)).map(|d| d.abs())
}

fn check_invoice(slip: &SlipData, invoice: Option<&InvoiceData>) -> LayerResult {
    let Some(invoice) = invoice else {
        let number = slip
            .invoice_number
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("?");
        return LayerResult::block(Layer::Invoice, format!("XML não encontrado para nota {}", number));
    };

    if !invoice.valid {
        let reason = invoice.error.as_deref().unwrap_or("erro desconhecido");
        return LayerResult::block(Layer::Invoice, format!("XML inválido: {}", reason));
    }

    let slip_number = slip.invoice_key();
    let invoice_number = strip_leading_zeros(&invoice.invoice_number);

    if !slip_number.is_empty() && !invoice_number.is_empty() && slip_number != invoice_number {
        return LayerResult::block(
            Layer::Invoice,
            format!(
                "Número da nota divergente: boleto={}, XML={}",
                slip_number, invoice_number
            ),
        )
        .with_detail("nf_boleto", slip_number)
        .with_detail("nf_xml", invoice_number);
    }

    LayerResult::pass(Layer::Invoice, "XML válido e número da nota confere")
        .with_detail("numero_nota", invoice_number)
}

fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn check_tax_id(slip: &SlipData, invoice: &InvoiceData) -> LayerResult {
    let slip_id = digits_only(slip.tax_id.as_deref().unwrap_or(""));
    let invoice_id = digits_only(&invoice.tax_id);

    if slip_id.is_empty() || invoice_id.is_empty() {
        return LayerResult::pass(Layer::TaxId, "CNPJ não disponível para comparação")
            .with_detail("cnpj_boleto", slip_id)
            .with_detail("cnpj_xml", invoice_id);
    }

    if slip_id == invoice_id {
        return LayerResult::pass(Layer::TaxId, "CNPJ confere").with_detail("cnpj", slip_id);
    }

    LayerResult::block(
        Layer::TaxId,
        format!("CNPJ divergente! Boleto={}, XML={}", slip_id, invoice_id),
    )
    .with_detail("cnpj_boleto", slip_id)
    .with_detail("cnpj_xml", invoice_id)
}

fn check_emails(invoice: &InvoiceData) -> LayerResult {
    if !invoice.emails.is_empty() {
        return LayerResult::pass(
            Layer::Email,
            format!("{} email(s) válido(s)", invoice.emails.len()),
        )
        .with_detail("emails", invoice.emails.clone())
        .with_detail("emails_invalidos", invoice.invalid_emails.clone());
    }

    let mut message = "Nenhum email válido encontrado".to_string();
    if !invoice.invalid_emails.is_empty() {
        let listed: Vec<String> = invoice
            .invalid_emails
            .iter()
            .map(|e| format!("'{}'", e))
            .collect();
        message.push_str(&format!(" (filtrados: [{}])", listed.join(", ")));
    }

    LayerResult::block(Layer::Email, message)
        .with_detail("emails_invalidos", invoice.invalid_emails.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::nfe::Installment;
    use crate::models::slip::Amount;
    use crate::models::validation::NOT_VALIDATED;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn slip() -> SlipData {
        SlipData {
            payer: Some("AREAIS DO LESTE COMERCIO LTDA".to_string()),
            tax_id: Some("12.345.678/0001-90".to_string()),
            invoice_number: Some("0310865".to_string()),
            due_date: Some("17-02".to_string()),
            due_date_full: Some("17/02/2026".to_string()),
            amount: Some(Amount::new(dec("1416.67"))),
            issuer: "CAPITAL".to_string(),
            errors: Vec::new(),
        }
    }

    fn invoice() -> InvoiceData {
        InvoiceData {
            file_name: "310865.xml".to_string(),
            invoice_number: "310865".to_string(),
            tax_id: "12345678000190".to_string(),
            recipient_name: "Areais do Leste Comércio Ltda.".to_string(),
            total: dec("2833.34"),
            emails: vec!["fin@areais.com.br".to_string()],
            installments: vec![
                Installment {
                    number: "001".to_string(),
                    due_date: "2026-02-17".to_string(),
                    value: dec("1416.67"),
                },
                Installment {
                    number: "002".to_string(),
                    due_date: "2026-03-17".to_string(),
                    value: dec("1416.67"),
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_all_layers_pass() {
        let outcome = Validator::new().validate(&slip(), Some(&invoice()));

        assert!(outcome.approved);
        assert_eq!(outcome.rejection_reason, None);
        assert!(outcome.layers.iter().all(|l| l.passed));
        assert_eq!(outcome.layer(Layer::Invoice).message, "XML válido e número da nota confere");
        assert_eq!(outcome.layer(Layer::TaxId).message, "CNPJ confere");
        assert_eq!(outcome.layer(Layer::Name).message, "Similaridade 100.0% (>=85%)");
        assert_eq!(outcome.layer(Layer::Value).message, "Valor confere");
        assert_eq!(outcome.layer(Layer::Email).message, "1 email(s) válido(s)");
        assert!(!outcome.surcharge_detected);
    }

    #[test]
    fn test_missing_invoice_short_circuits() {
        let outcome = Validator::new().validate(&slip(), None);

        assert!(!outcome.approved);
        assert_eq!(
            outcome.rejection_reason.as_deref(),
            Some("XML não encontrado para nota 0310865")
        );
        for layer in &outcome.layers[1..] {
            assert!(!layer.passed);
            assert!(!layer.blocks);
            assert_eq!(layer.message, NOT_VALIDATED);
        }
        assert_eq!(outcome.layers.len(), 5);
    }

    #[test]
    fn test_invalid_invoice_blocks() {
        let bad = InvoiceData::invalid("x.xml", "Erro ao parsear XML: eof");
        let outcome = Validator::new().validate(&slip(), Some(&bad));
        assert_eq!(
            outcome.rejection_reason.as_deref(),
            Some("XML inválido: Erro ao parsear XML: eof")
        );
        assert_eq!(outcome.layer(Layer::Email).message, NOT_VALIDATED);
    }

    #[test]
    fn test_number_mismatch_blocks() {
        let mut other = invoice();
        other.invoice_number = "999999".to_string();
        let outcome = Validator::new().validate(&slip(), Some(&other));
        assert_eq!(
            outcome.rejection_reason.as_deref(),
            Some("Número da nota divergente: boleto=310865, XML=999999")
        );
    }

    #[test]
    fn test_first_blocking_layer_is_reported() {
        let mut other = invoice();
        other.tax_id = "98765432000110".to_string();
        other.emails.clear();
        let outcome = Validator::new().validate(&slip(), Some(&other));

        assert!(!outcome.approved);
        assert_eq!(
            outcome.rejection_reason.as_deref(),
            Some("CNPJ divergente! Boleto=12345678000190, XML=98765432000110")
        );
        assert!(outcome.layer(Layer::Email).blocks);
        assert_eq!(outcome.layer(Layer::Email).message, "Nenhum email válido encontrado");
    }

    #[test]
    fn test_missing_tax_id_passes() {
        let mut s = slip();
        s.tax_id = None;
        let outcome = Validator::new().validate(&s, Some(&invoice()));
        assert_eq!(
            outcome.layer(Layer::TaxId).message,
            "CNPJ não disponível para comparação"
        );
        assert!(outcome.approved);
    }

    #[test]
    fn test_low_name_similarity_never_blocks() {
        let mut s = slip();
        s.payer = Some("JOSE PEREIRA".to_string());
        let outcome = Validator::new().validate(&s, Some(&invoice()));

        let name = outcome.layer(Layer::Name);
        assert!(!name.passed);
        assert!(!name.blocks);
        assert!(name.message.starts_with("Similaridade baixa ("));
        assert!(outcome.approved);
    }

    #[test]
    fn test_value_off_by_one_cent_blocks() {
        let mut s = slip();
        s.amount = Some(Amount::new(dec("1416.68")));
        let outcome = Validator::new().validate(&s, Some(&invoice()));

        assert!(!outcome.approved);
        assert_eq!(
            outcome.rejection_reason.as_deref(),
            Some("Valor divergente! Diferença R$ 0.01")
        );
        let surcharge = outcome.surcharge.unwrap();
        assert_eq!(surcharge.difference, dec("0.01"));
        assert_eq!(surcharge.invoice_amount, dec("1416.67"));
    }

    #[test]
    fn test_value_tolerance() {
        let mut s = slip();
        s.amount = Some(Amount::new(dec("1416.68")));
        let outcome = Validator::new()
            .with_value_tolerance_cents(1)
            .validate(&s, Some(&invoice()));
        assert!(outcome.approved);
    }

    #[test]
    fn test_total_used_without_matching_installment() {
        let mut s = slip();
        s.due_date_full = Some("01/01/2026".to_string());
        s.amount = Some(Amount::new(dec("2833.34")));
        let outcome = Validator::new().validate(&s, Some(&invoice()));
        assert!(outcome.approved);
    }

    #[test]
    fn test_missing_values_pass() {
        let mut s = slip();
        s.amount = None;
        let outcome = Validator::new().validate(&s, Some(&invoice()));
        assert_eq!(
            outcome.layer(Layer::Value).message,
            "Valor do boleto não disponível para comparação"
        );

        let mut inv = invoice();
        inv.installments.clear();
        inv.total = Decimal::ZERO;
        let outcome = Validator::new().validate(&slip(), Some(&inv));
        assert_eq!(
            outcome.layer(Layer::Value).message,
            "Valor do XML não disponível para comparação"
        );
        assert!(!outcome.surcharge_detected);
    }

    #[test]
    fn test_surcharge_detected_without_blocking_other_layers() {
        let mut s = slip();
        s.due_date_full = None;
        s.amount = Some(Amount::new(dec("2889.01")));
        let outcome = Validator::new().validate(&s, Some(&invoice()));

        assert!(outcome.surcharge_detected);
        let surcharge = outcome.surcharge.as_ref().unwrap();
        assert_eq!(surcharge.difference, dec("55.67"));
        assert_eq!(surcharge.percentage, dec("1.96"));
        assert_eq!(outcome.layer(Layer::Value).message, "Valor divergente! Diferença R$ 55.67");
    }

    #[test]
    fn test_filtered_emails_listed() {
        let mut inv = invoice();
        inv.emails.clear();
        inv.invalid_emails = vec!["fin@areais".to_string(), "x.".to_string()];
        let outcome = Validator::new().validate(&slip(), Some(&inv));
        assert_eq!(
            outcome.layer(Layer::Email).message,
            "Nenhum email válido encontrado (filtrados: ['fin@areais', 'x.'])"
        );
    }

    #[test]
    fn test_out_of_range_amounts_still_produce_outcome() {
        let huge = Decimal::from_scientific("7E28").unwrap();

        let mut inv = invoice();
        inv.installments.clear();
        inv.total = huge;
        let outcome = Validator::new().validate(&slip(), Some(&inv));
        assert!(!outcome.approved);
        assert!(outcome.layer(Layer::Value).blocks);
        assert_eq!(outcome.surcharge, None);

        let mut s = slip();
        s.amount = Some(Amount::new(Decimal::MAX));
        let outcome = Validator::new().validate(&s, Some(&invoice()));
        assert!(outcome
            .rejection_reason
            .as_deref()
            .is_some_and(|r| r.starts_with("Valor divergente! Diferença R$ ")));
        assert!(outcome.surcharge_detected);

        let mut inv = invoice();
        inv.installments[0].value = Decimal::MIN;
        let outcome = Validator::new().validate(&s, Some(&inv));
        assert_eq!(
            outcome.rejection_reason.as_deref(),
            Some("Valor divergente! Diferença fora do limite")
        );
        assert_eq!(outcome.surcharge, None);
        assert_eq!(Validator::new().surcharge(&s, &inv), None);
    }

    #[test]
    fn test_negative_installment_value() {
        let mut inv = invoice();
        inv.installments[0].value = dec("-100.00");
        let outcome = Validator::new().validate(&slip(), Some(&inv));

        assert_eq!(
            outcome.layer(Layer::Value).message,
            "Valor divergente! Diferença R$ 1516.67"
        );
        let surcharge = outcome.surcharge.unwrap();
        assert_eq!(surcharge.difference, dec("1516.67"));
        assert_eq!(surcharge.percentage, dec("-1516.67"));
    }

    #[test]
    fn test_tiny_reference_surcharge_overflow_is_none() {
        let mut s = slip();
        s.due_date_full = None;
        s.amount = Some(Amount::new(dec("79228162514264337593543950")));
        let mut inv = invoice();
        inv.installments.clear();
        inv.total = Decimal::new(1, 28);

        assert_eq!(Validator::new().surcharge(&s, &inv), None);
        let outcome = Validator::new().validate(&s, Some(&inv));
        assert!(outcome.layer(Layer::Value).blocks);
    }
}
