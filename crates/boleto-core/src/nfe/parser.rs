//! NFe XML parsing into [`InvoiceData`] records.

use std::path::Path;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::emails::screen_emails;
use super::xml::{parse_document, parse_document_bytes, Element};
use crate::error::NfeError;
use crate::models::nfe::{normalize_invoice_number, Installment, InvoiceData};

lazy_static! {
    static ref ID_DIGITS: Regex = Regex::new(r"(\d{6,})").unwrap();
}

/// Parse an NFe XML file.
///
/// Never fails: unreadable or malformed files yield an invalid record.
pub fn parse_file(path: &Path) -> InvoiceData {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => return invalid(&file_name, NfeError::Io(e)),
    };

    match parse_document_bytes(&bytes) {
        Ok(root) => read_invoice(&root, &file_name),
        Err(e) => invalid(&file_name, e),
    }
}

/// Parse NFe XML held in memory.
pub fn parse_str(xml: &str, file_name: &str) -> InvoiceData {
    match parse_document(xml) {
        Ok(root) => read_invoice(&root, file_name),
        Err(e) => invalid(file_name, e),
    }
}

fn invalid(file_name: &str, error: NfeError) -> InvoiceData {
    warn!(file = file_name, error = %error, "Invalid NFe document");
    InvoiceData::invalid(file_name, format!("Erro ao parsear XML: {}", error))
}

fn read_invoice(root: &Element, file_name: &str) -> InvoiceData {
    let node = root.descendant("infNFe").unwrap_or(root);

    let mut invoice = InvoiceData {
        file_name: file_name.to_string(),
        invoice_number: invoice_number(node),
        total: total_value(node),
        installments: installments(node),
        ..Default::default()
    };

    if let Some(dest) = node.child("dest") {
        invoice.tax_id = dest
            .child_text("CNPJ")
            .or_else(|| dest.child_text("CPF"))
            .unwrap_or_default()
            .to_string();
        invoice.recipient_name = dest.child_text("xNome").unwrap_or_default().to_string();

        if let Some(raw) = dest.child_text("email") {
            let screened = screen_emails(raw);
            invoice.emails = screened.accepted;
            invoice.invalid_emails = screened.rejected;
        }
    }

    debug!(
        file = file_name,
        number = %invoice.invoice_number,
        emails = invoice.emails.len(),
        installments = invoice.installments.len(),
        "Parsed NFe"
    );

    invoice
}

fn invoice_number(node: &Element) -> String {
    if let Some(number) = node.child("ide").and_then(|ide| ide.child_text("nNF")) {
        return normalize_invoice_number(number);
    }

    node.attribute("Id")
        .and_then(|id| ID_DIGITS.captures(id))
        .map(|caps| normalize_invoice_number(&caps[1]))
        .unwrap_or_default()
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

fn total_value(node: &Element) -> Decimal {
    let Some(totals) = node.child("total").and_then(|t| t.child("ICMSTot")) else {
        return Decimal::ZERO;
    };

    ["vNF", "vProd"]
        .iter()
        .filter_map(|field| totals.child_text(field))
        .find_map(parse_decimal)
        .unwrap_or(Decimal::ZERO)
}

fn installments(node: &Element) -> Vec<Installment> {
    let Some(billing) = node.child("cobr") else {
        return Vec::new();
    };

    billing
        .children_named("dup")
        .map(|dup| Installment {
            number: dup.child_text("nDup").unwrap_or_default().to_string(),
            due_date: dup.child_text("dVenc").unwrap_or_default().to_string(),
            value: parse_decimal(dup.child_text("vDup").unwrap_or("0")).unwrap_or(Decimal::ZERO),
        })
        .collect()
}
