//! Core library for Brazilian payment slip (boleto) processing.
//!
//! This crate provides:
//! - PDF text loading
//! - Issuer-specific boleto field extraction (payer, CNPJ/CPF, due date, value, NF number)
//! - NFe XML parsing (recipient, emails, totals, installments)
//! - Five-layer slip/invoice validation with surcharge detection
//! - Canonical file naming and email grouping for approved slips

pub mod email;
pub mod error;
pub mod models;
pub mod nfe;
pub mod pdf;
pub mod pipeline;
pub mod rename;
pub mod slip;
pub mod validate;

pub use email::{ApprovedSlip, EmailGroup, EmailGrouper};
pub use error::{BoletoError, PdfError, Result, SelectionError};
pub use models::config::{BoletoConfig, EmailLayout, IssuerProfile, IssuerTable};
pub use models::nfe::{Installment, InvoiceData};
pub use models::slip::{Amount, SlipData};
pub use models::validation::{Layer, LayerResult, Surcharge, ValidationOutcome};
pub use nfe::InvoiceIndex;
pub use pdf::{PdfExtractor, PdfProcessor};
pub use pipeline::{ProcessedSlip, SlipProcessor};
pub use rename::generate_name;
pub use slip::{Issuer, IssuerSelector, SlipExtractor};
pub use validate::Validator;
