//! Results of the five-layer slip/invoice validation.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

/// Free-form details attached to a layer result.
pub type Details = BTreeMap<String, serde_json::Value>;

/// Message stored in layers that were never evaluated.
pub const NOT_VALIDATED: &str = "Não validado (camada anterior falhou)";

/// The five validation layers, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    /// Invoice present, valid and with a matching number.
    Invoice,
    /// CNPJ/CPF match.
    TaxId,
    /// Fuzzy payer/recipient name match.
    Name,
    /// Exact value match.
    Value,
    /// At least one deliverable email.
    Email,
}

impl Layer {
    /// All layers in order.
    pub const ALL: [Layer; 5] = [
        Layer::Invoice,
        Layer::TaxId,
        Layer::Name,
        Layer::Value,
        Layer::Email,
    ];

    /// Layer number (1-5).
    pub fn number(self) -> u8 {
        match self {
            Layer::Invoice => 1,
            Layer::TaxId => 2,
            Layer::Name => 3,
            Layer::Value => 4,
            Layer::Email => 5,
        }
    }

    /// Display name of the layer.
    pub fn name(self) -> &'static str {
        match self {
            Layer::Invoice => "XML",
            Layer::TaxId => "CNPJ",
            Layer::Name => "Nome",
            Layer::Value => "Valor",
            Layer::Email => "Email",
        }
    }

    fn index(self) -> usize {
        self.number() as usize - 1
    }
}

/// Outcome of one validation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerResult {
    /// Layer number (1-5).
    pub layer: u8,
    /// Layer name.
    pub name: String,
    /// Whether the check passed.
    pub passed: bool,
    /// Human-readable message.
    pub message: String,
    /// Whether a failure rejects the slip.
    pub blocks: bool,
    /// Supporting values.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: Details,
}

impl LayerResult {
    /// A passing result.
    pub fn pass(layer: Layer, message: impl Into<String>) -> Self {
        Self {
            layer: layer.number(),
            name: layer.name().to_string(),
            passed: true,
            message: message.into(),
            blocks: false,
            details: Details::new(),
        }
    }

    /// A failing result that does not reject the slip.
    pub fn warn(layer: Layer, message: impl Into<String>) -> Self {
        Self {
            passed: false,
            ..Self::pass(layer, message)
        }
    }

    /// A failing result that rejects the slip.
    pub fn block(layer: Layer, message: impl Into<String>) -> Self {
        Self {
            passed: false,
            blocks: true,
            ..Self::pass(layer, message)
        }
    }

    /// Placeholder for a layer skipped after an earlier blocking failure.
    pub fn not_validated(layer: Layer) -> Self {
        Self::warn(layer, NOT_VALIDATED)
    }

    /// Attach a detail value.
    pub fn with_detail(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

/// Interest/penalty surcharge found on a slip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Surcharge {
    /// Slip amount.
    pub slip_amount: Decimal,
    /// Invoice value the slip was compared against.
    pub invoice_amount: Decimal,
    /// Slip amount minus invoice value.
    pub difference: Decimal,
    /// Difference as a percentage of the invoice value.
    pub percentage: Decimal,
}

/// Full result of validating one slip against its invoice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationOutcome {
    /// Whether no blocking layer failed.
    pub approved: bool,
    /// Message of the first blocking layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    /// One result per layer, in order.
    pub layers: [LayerResult; 5],
    /// Whether the slip amount exceeds the invoice value.
    pub surcharge_detected: bool,
    /// Surcharge figures when detected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surcharge: Option<Surcharge>,
}

impl ValidationOutcome {
    /// Assemble an outcome from the filled layer slots.
    ///
    /// Approval and the rejection reason are derived from the slots, so the
    /// first blocking layer in ascending order always wins.
    pub fn from_layers(layers: [LayerResult; 5], surcharge: Option<Surcharge>) -> Self {
        let rejection_reason = layers
            .iter()
            .find(|l| l.blocks)
            .map(|l| l.message.clone());

        Self {
            approved: rejection_reason.is_none(),
            rejection_reason,
            layers,
            surcharge_detected: surcharge.is_some(),
            surcharge,
        }
    }

    /// Result of a given layer.
    pub fn layer(&self, layer: Layer) -> &LayerResult {
        &self.layers[layer.index()]
    }
}

/// Five slots pre-filled with "not validated" placeholders.
pub fn placeholder_layers() -> [LayerResult; 5] {
    Layer::ALL.map(LayerResult::not_validated)
}

/// Store a result in its slot.
pub fn set_layer(layers: &mut [LayerResult; 5], result: LayerResult, layer: Layer) {
    layers[layer.index()] = result;
}
