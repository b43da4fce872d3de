//! Per-slip pipeline: extract, pair, validate and rename.

use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::models::config::BoletoConfig;
use crate::models::slip::SlipData;
use crate::models::validation::ValidationOutcome;
use crate::nfe::InvoiceIndex;
use crate::rename::generate_name;
use crate::slip::{Issuer, IssuerSelector};
use crate::validate::Validator;

/// Result of processing one slip.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedSlip {
    /// Source file name.
    pub source: String,
    /// Extracted fields.
    pub slip: SlipData,
    /// Paired invoice file, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_file: Option<String>,
    /// Five-layer validation result.
    pub validation: ValidationOutcome,
    /// Generated file name.
    pub renamed: String,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ProcessedSlip {
    /// Whether the slip passed validation.
    pub fn approved(&self) -> bool {
        self.validation.approved
    }
}

/// Runs slips through the full pipeline against an invoice index.
pub struct SlipProcessor {
    selector: IssuerSelector,
    validator: Validator,
    issuer: Option<String>,
    detect_issuer: bool,
}

impl SlipProcessor {
    /// Processor with the default issuer table and thresholds.
    pub fn new() -> Self {
        Self::from_config(&BoletoConfig::default())
    }

    /// Processor configured from a [`BoletoConfig`].
    pub fn from_config(config: &BoletoConfig) -> Self {
        Self {
            selector: IssuerSelector::new(&config.issuers)
                .with_generic_tag(config.extraction.generic_tag.clone()),
            validator: Validator::from_config(&config.validation),
            issuer: config.extraction.default_issuer.clone(),
            detect_issuer: config.extraction.detect_issuer,
        }
    }

    /// Use this issuer for every slip instead of detecting it.
    pub fn with_issuer(mut self, name: impl Into<String>) -> Self {
        self.issuer = Some(name.into());
        self
    }

    /// Replace the validator.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// Strategy for a slip: the configured issuer, else keyword detection
    /// (when enabled), else the generic strategy.
    pub fn issuer_for(&self, text: &str) -> Result<Issuer> {
        match self.issuer.as_deref() {
            Some(name) => Ok(self.selector.by_name(name)?),
            None if self.detect_issuer => Ok(self.selector.select(None, text)?),
            None => Ok(self.selector.generic()),
        }
    }

    /// Extract fields from slip text.
    pub fn extract(&self, text: &str, filename: &str) -> Result<SlipData> {
        Ok(self.issuer_for(text)?.extract(text, filename))
    }

    /// Run the full pipeline for one slip.
    pub fn process(&self, text: &str, filename: &str, invoices: &InvoiceIndex) -> Result<ProcessedSlip> {
        let start = Instant::now();

        let slip = self.extract(text, filename)?;
        let invoice = invoices.find_for(&slip);
        let validation = self.validator.validate(&slip, invoice);
        let renamed = generate_name(&slip);

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            file = filename,
            issuer = %slip.issuer,
            approved = validation.approved,
            "Processed slip in {}ms",
            processing_time_ms
        );

        Ok(ProcessedSlip {
            source: filename.to_string(),
            invoice_file: invoice.map(|i| i.file_name.clone()),
            slip,
            validation,
            renamed,
            processing_time_ms,
        })
    }
}

impl Default for SlipProcessor {
    fn default() -> Self {
        Self::new()
    }
}
