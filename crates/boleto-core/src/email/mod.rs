//! Grouping of approved slips into outbound emails.
//!
//! Slips whose invoices share the same recipient addresses are sent
//! together in one message. This module only prepares the message data;
//! delivery belongs to the caller.

mod grouping;
mod template;

pub use grouping::{due_date_sort_key, ApprovedSlip, EmailGroup, EmailGrouper};
pub use template::{greeting_for_hour, render_html, subject, SlipLine, DEFAULT_RECIPIENT};
