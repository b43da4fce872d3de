//! Recipient email screening for NFe documents.

use lazy_static::lazy_static;
use regex::Regex;

/// Maximum number of accepted addresses.
pub const MAX_EMAILS: usize = 2;

/// Length limit applied to the second accepted address.
pub const MAX_SECOND_EMAIL_LEN: usize = 100;

lazy_static! {
    static ref SEPARATORS: Regex = Regex::new(r"[;,\s]+").unwrap();
    static ref EMAIL: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
}

/// Accepted and rejected addresses from one raw email field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenedEmails {
    pub accepted: Vec<String>,
    pub rejected: Vec<String>,
}

/// Whether an address looks cut off by the issuing system.
pub fn is_truncated(email: &str) -> bool {
    if email.ends_with('.') || email.matches('@').count() != 1 {
        return true;
    }
    match email.split_once('@') {
        Some((_, domain)) => domain.is_empty() || !domain.contains('.'),
        None => true,
    }
}

/// Split and screen a raw email field.
///
/// Candidates are lower-cased and trimmed. Malformed or truncated ones are
/// rejected. At most [`MAX_EMAILS`] are accepted; a second address longer
/// than [`MAX_SECOND_EMAIL_LEN`] is rejected, and once two are accepted the
/// remaining candidates are ignored without being recorded.
pub fn screen_emails(raw: &str) -> ScreenedEmails {
    let mut screened = ScreenedEmails::default();

    for candidate in SEPARATORS.split(raw.trim()) {
        if screened.accepted.len() >= MAX_EMAILS {
            break;
        }

        let email = candidate.trim().to_lowercase();
        if email.is_empty() {
            continue;
        }

        if is_truncated(&email) || !EMAIL.is_match(&email) {
            screened.rejected.push(email);
        } else if !screened.accepted.is_empty() && email.chars().count() > MAX_SECOND_EMAIL_LEN {
            screened.rejected.push(email);
        } else {
            screened.accepted.push(email);
        }
    }

    screened
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_and_normalize() {
        let screened = screen_emails(" Fin@Acme.com.br ;  , compras@acme.com ");
        assert_eq!(screened.accepted, ["fin@acme.com.br", "compras@acme.com"]);
        assert!(screened.rejected.is_empty());
    }

    #[test]
    fn test_truncated_candidates_rejected() {
        let screened = screen_emails("fin@acme.com. a@@b.com x@localhost ok@acme.com");
        assert_eq!(screened.accepted, ["ok@acme.com"]);
        assert_eq!(screened.rejected, ["fin@acme.com.", "a@@b.com", "x@localhost"]);
    }

    #[test]
    fn test_oversized_second_email_rejected() {
        let long = format!("{}@example.com", "a".repeat(108));
        assert_eq!(long.len(), 120);

        let screened = screen_emails(&format!("a@b.com; {}", long));
        assert_eq!(screened.accepted, ["a@b.com"]);
        assert_eq!(screened.rejected, [long]);
    }

    #[test]
    fn test_long_first_email_accepted() {
        let long = format!("{}@example.com", "a".repeat(108));
        let screened = screen_emails(&long);
        assert_eq!(screened.accepted.len(), 1);
    }

    #[test]
    fn test_third_candidate_dropped_silently() {
        let screened = screen_emails("a@b.com, c@d.com, e@f.com, broken@");
        assert_eq!(screened.accepted, ["a@b.com", "c@d.com"]);
        assert!(screened.rejected.is_empty());
    }

    #[test]
    fn test_is_truncated() {
        assert!(is_truncated("a@b"));
        assert!(is_truncated("a@"));
        assert!(is_truncated("ab.com"));
        assert!(!is_truncated("a@b.co"));
    }
}
