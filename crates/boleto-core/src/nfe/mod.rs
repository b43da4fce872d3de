//! NFe (electronic invoice) reading and pairing.

mod emails;
mod index;
mod parser;
mod xml;

pub use emails::{is_truncated, screen_emails, ScreenedEmails, MAX_EMAILS, MAX_SECOND_EMAIL_LEN};
pub use index::InvoiceIndex;
pub use parser::{parse_file, parse_str};
