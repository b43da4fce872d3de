//! Issuer selection, by explicit name or by keywords found in slip text.

use tracing::debug;

use super::issuers::DEFAULT_GENERIC_TAG;
use super::Issuer;
use crate::error::SelectionError;
use crate::models::config::IssuerTable;

/// Picks the issuer strategy for a slip.
///
/// Keyword rules are checked in table order, so more specific issuers must
/// be listed first. Profiles without a dedicated strategy fall back to the
/// generic one tagged with the profile name.
#[derive(Debug, Clone)]
pub struct IssuerSelector {
    rules: Vec<(Issuer, Vec<String>)>,
    generic_tag: String,
}

impl IssuerSelector {
    /// Build a selector from an issuer table.
    pub fn new(table: &IssuerTable) -> Self {
        let rules = table
            .iter()
            .map(|profile| {
                let issuer = Issuer::from_name(&profile.name)
                    .unwrap_or_else(|_| Issuer::generic(profile.name.trim().to_uppercase()));
                let keywords = profile.keywords.iter().map(|k| k.to_uppercase()).collect();
                (issuer, keywords)
            })
            .collect();

        Self {
            rules,
            generic_tag: DEFAULT_GENERIC_TAG.to_string(),
        }
    }

    /// Set the tag used when no issuer is detected.
    pub fn with_generic_tag(mut self, tag: impl Into<String>) -> Self {
        self.generic_tag = tag.into();
        self
    }

    /// Look up an issuer by name (case-insensitive).
    pub fn by_name(&self, name: &str) -> Result<Issuer, SelectionError> {
        if let Ok(issuer) = Issuer::from_name(name) {
            return Ok(issuer);
        }

        let wanted = name.trim().to_uppercase();
        self.rules
            .iter()
            .map(|(issuer, _)| issuer)
            .find(|issuer| matches!(issuer, Issuer::Generic(tag) if *tag == wanted))
            .cloned()
            .ok_or_else(|| SelectionError::UnknownIssuer {
                name: name.to_string(),
                available: self.available(),
            })
    }

    /// Detect the issuer from keywords in the slip text (case-insensitive).
    pub fn detect(&self, text: &str) -> Option<Issuer> {
        let upper = text.to_uppercase();
        let found = self
            .rules
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| upper.contains(k.as_str())))
            .map(|(issuer, _)| issuer.clone());

        debug!(issuer = ?found, "Issuer detection");
        found
    }

    /// Explicit name when given, else keyword detection, else the generic strategy.
    pub fn select(&self, name: Option<&str>, text: &str) -> Result<Issuer, SelectionError> {
        match name {
            Some(name) => self.by_name(name),
            None => Ok(self.detect(text).unwrap_or_else(|| self.generic())),
        }
    }

    /// The generic fallback strategy.
    pub fn generic(&self) -> Issuer {
        Issuer::generic(self.generic_tag.clone())
    }

    /// Every strategy available by name.
    pub fn all(&self) -> Vec<Issuer> {
        let mut all = Issuer::all();
        for (issuer, _) in &self.rules {
            if !all.contains(issuer) {
                all.push(issuer.clone());
            }
        }
        all
    }

    fn available(&self) -> Vec<String> {
        self.all().iter().map(|i| i.tag().to_string()).collect()
    }
}

impl Default for IssuerSelector {
    fn default() -> Self {
        Self::new(&IssuerTable::default())
    }
}
