//! Issuer-specific extraction strategies.

mod capital;
mod credvale;
mod generic;
mod novax;
mod squid;

pub use capital::CapitalExtractor;
pub use credvale::CredvaleExtractor;
pub use generic::{GenericExtractor, DEFAULT_GENERIC_TAG};
pub use novax::NovaxExtractor;
pub use squid::SquidExtractor;

use super::rules::names::is_recipient_header;
use super::rules::tax_id::tax_id_near;

/// Tax id below a DANFE recipient header, else near a payer label.
fn recipient_or_label_tax_id<F>(lines: &[&str], is_label: F) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    tax_id_near(lines, is_recipient_header, 1, 6).or_else(|| tax_id_near(lines, is_label, 0, 5))
}
