//! Grouping of approved slips by recipient addresses.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::Timelike;
use serde::Serialize;
use tracing::{debug, warn};

use super::template::{greeting_for_hour, render_html, subject, SlipLine, DEFAULT_RECIPIENT};
use crate::models::config::{EmailLayout, IssuerProfile};
use crate::models::nfe::InvoiceData;
use crate::models::slip::{SlipData, DUE_DATE_UNDEFINED};

/// An approved slip together with its paired invoice and source file.
#[derive(Debug, Clone, Copy)]
pub struct ApprovedSlip<'a> {
    /// Caller's identifier for the slip (file name, database id).
    pub id: &'a str,
    pub slip: &'a SlipData,
    pub invoice: Option<&'a InvoiceData>,
    /// Original slip PDF.
    pub file_path: Option<&'a Path>,
    /// Generated name; used instead of the original when that file exists.
    pub renamed: Option<&'a str>,
}

/// One outbound email.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailGroup {
    /// Recipient addresses, sorted.
    pub to: Vec<String>,
    /// Copied addresses from the issuer profile.
    pub cc: Vec<String>,
    pub subject: String,
    pub html_body: String,
    /// Slip identifiers, ordered by due date.
    pub members: Vec<String>,
    /// Invoice file names, one per distinct invoice.
    pub invoice_files: Vec<String>,
    /// Slip PDFs to attach.
    pub slip_attachments: Vec<PathBuf>,
    /// Invoice PDFs to attach. XML files are never attached.
    pub invoice_attachments: Vec<PathBuf>,
}

/// Builds [`EmailGroup`]s for one issuer.
pub struct EmailGrouper<'a> {
    issuer: &'a IssuerProfile,
    layout: &'a EmailLayout,
    invoice_dir: PathBuf,
    greeting: String,
}

impl<'a> EmailGrouper<'a> {
    /// Grouper whose invoice PDFs live in `invoice_dir`.
    ///
    /// The greeting comes from the layout, or from the local time of day.
    pub fn new(issuer: &'a IssuerProfile, layout: &'a EmailLayout, invoice_dir: impl Into<PathBuf>) -> Self {
        let greeting = match layout.greeting.as_deref() {
            Some(g) if !g.is_empty() => g.to_string(),
            _ => greeting_for_hour(chrono::Local::now().hour()).to_string(),
        };

        Self {
            issuer,
            layout,
            invoice_dir: invoice_dir.into(),
            greeting,
        }
    }

    /// Override the greeting.
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    /// Group approved slips by the sorted email addresses of their invoices.
    ///
    /// Slips without an invoice or without accepted emails are left out.
    /// Groups keep the order in which their first slip appears.
    pub fn group(&self, slips: &[ApprovedSlip<'_>], invoices: &[InvoiceData]) -> Vec<EmailGroup> {
        let pdf_by_number: HashMap<String, &InvoiceData> = invoices
            .iter()
            .filter(|i| i.is_pdf())
            .map(|i| (i.invoice_key(), i))
            .collect();

        let mut keys: Vec<Vec<String>> = Vec::new();
        let mut members: HashMap<Vec<String>, Vec<ApprovedSlip<'_>>> = HashMap::new();

        for approved in slips {
            let Some(invoice) = approved.invoice.filter(|i| !i.emails.is_empty()) else {
                debug!(slip = approved.id, "No recipient email, skipping");
                continue;
            };

            let mut key = invoice.emails.clone();
            key.sort();

            members
                .entry(key.clone())
                .or_insert_with(|| {
                    keys.push(key);
                    Vec::new()
                })
                .push(*approved);
        }

        keys.into_iter()
            .filter_map(|key| {
                let group = members.remove(&key)?;
                Some(self.build_group(key, group, &pdf_by_number))
            })
            .collect()
    }

    fn build_group(
        &self,
        to: Vec<String>,
        mut slips: Vec<ApprovedSlip<'_>>,
        pdf_by_number: &HashMap<String, &InvoiceData>,
    ) -> EmailGroup {
        slips.sort_by_key(|s| due_date_sort_key(s.slip.due_date.as_deref()));

        let mut member_ids = Vec::with_capacity(slips.len());
        let mut numbers = Vec::new();
        let mut lines = Vec::with_capacity(slips.len());
        let mut slip_attachments = Vec::new();
        let mut invoice_files = Vec::new();
        let mut invoice_attachments = Vec::new();
        let mut seen_invoices = HashSet::new();
        let mut recipient: Option<&str> = None;

        for approved in &slips {
            let slip = approved.slip;
            member_ids.push(approved.id.to_string());

            if let Some(number) = slip.invoice_number.as_deref().filter(|n| !n.is_empty()) {
                numbers.push(number.to_string());
            }

            lines.push(SlipLine::new(
                slip.invoice_number.as_deref(),
                slip.amount_display(),
                &email_due_date(slip),
            ));

            if let Some(path) = slip_attachment(approved) {
                slip_attachments.push(path);
            }

            if let Some(invoice) = approved.invoice {
                let key = invoice.invoice_key();
                if seen_invoices.insert(key.clone()) {
                    invoice_files.push(invoice.file_name.clone());
                    if let Some(pdf) = pdf_by_number.get(&key) {
                        let path = self.invoice_dir.join(&pdf.file_name);
                        if path.exists() {
                            invoice_attachments.push(path);
                        } else {
                            warn!(path = %path.display(), "Invoice PDF not found, not attached");
                        }
                    }
                }

                if recipient.is_none() && !invoice.recipient_name.is_empty() {
                    recipient = Some(invoice.recipient_name.as_str());
                }
            }

            if recipient.is_none() {
                recipient = slip.payer.as_deref().filter(|p| !p.is_empty());
            }
        }

        let html_body = render_html(
            &self.greeting,
            recipient.unwrap_or(DEFAULT_RECIPIENT),
            &lines,
            self.issuer,
            self.layout,
        );

        debug!(to = ?to, slips = member_ids.len(), "Built email group");

        EmailGroup {
            to,
            cc: self.issuer.cc_emails.clone(),
            subject: subject(&numbers),
            html_body,
            members: member_ids,
            invoice_files,
            slip_attachments,
            invoice_attachments,
        }
    }
}

/// Chronological sort key for a `DD-MM` due date (`MM-DD`).
///
/// Missing dates sort last.
pub fn due_date_sort_key(due_date: Option<&str>) -> String {
    let due = due_date.unwrap_or("99-99");
    match due.split_once('-') {
        Some((day, month)) if !month.contains('-') => format!("{}-{}", month, day),
        _ => due.to_string(),
    }
}

/// Due date shown in the email: the full date when known, else `DD/MM`.
fn email_due_date(slip: &SlipData) -> String {
    if let Some(full) = slip.due_date_full.as_deref().filter(|d| !d.is_empty()) {
        return full.to_string();
    }
    match slip.due_date.as_deref() {
        Some(short) if short != DUE_DATE_UNDEFINED => short.replace('-', "/"),
        _ => String::new(),
    }
}

fn slip_attachment(approved: &ApprovedSlip<'_>) -> Option<PathBuf> {
    let original = approved.file_path?;

    if let (Some(renamed), Some(parent)) = (approved.renamed, original.parent()) {
        let candidate = parent.join(renamed);
        if candidate.exists() {
            return Some(candidate);
        }
    }

    if original.exists() {
        Some(original.to_path_buf())
    } else {
        warn!(path = %original.display(), "Slip PDF not found, not attached");
        None
    }
}
