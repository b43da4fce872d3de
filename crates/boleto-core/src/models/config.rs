//! Configuration structures for the boleto pipeline.

use serde::{Deserialize, Serialize};

use crate::error::BoletoError;

/// Main configuration for the boleto pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoletoConfig {
    /// Slip extraction configuration.
    pub extraction: ExtractionConfig,

    /// Validation thresholds.
    pub validation: ValidationConfig,

    /// Known issuers, in keyword-detection priority order.
    pub issuers: IssuerTable,

    /// Outbound email wording.
    pub email: EmailLayout,
}

/// Slip extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Issuer strategy used when none is given on the command line.
    pub default_issuer: Option<String>,

    /// Detect the issuer from slip text when none is given.
    pub detect_issuer: bool,

    /// Tag used for slips handled by the generic strategy.
    pub generic_tag: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            default_issuer: None,
            detect_issuer: true,
            generic_tag: crate::slip::DEFAULT_GENERIC_TAG.to_string(),
        }
    }
}

/// Validation thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Allowed slip/invoice difference in cents.
    pub value_tolerance_cents: i64,

    /// Minimum name similarity ratio (0.0 - 1.0).
    pub min_name_similarity: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            value_tolerance_cents: 0,
            min_name_similarity: 0.85,
        }
    }
}

/// A receivables fund that issues payment slips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuerProfile {
    /// Short name (`CAPITAL`, `NOVAX`, ...).
    pub name: String,

    /// Legal name printed in outbound emails.
    pub full_name: String,

    /// Fund CNPJ.
    #[serde(default)]
    pub tax_id: String,

    /// Addresses copied on every outbound email.
    #[serde(default)]
    pub cc_emails: Vec<String>,

    /// Keywords that identify the issuer in slip text.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl IssuerProfile {
    fn new(name: &str, full_name: &str, tax_id: &str, cc: &[&str], keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            full_name: full_name.to_string(),
            tax_id: tax_id.to_string(),
            cc_emails: cc.iter().map(|s| s.to_string()).collect(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Ordered list of issuer profiles. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssuerTable(pub Vec<IssuerProfile>);

impl Default for IssuerTable {
    fn default() -> Self {
        Self(vec![
            IssuerProfile::new(
                "CAPITAL",
                "CAPITAL RS FIDC NP MULTISSETORIAL",
                "12.910.463/0001-70",
                &["adm@jotajota.net.br"],
                &["CAPITAL RS", "CAPITAL RS FIDC"],
            ),
            IssuerProfile::new(
                "NOVAX",
                "Novax Fundo de Investimento em Direitos Creditórios",
                "28.879.551/0001-96",
                &["adm@jotajota.net.br", "controladoria@novaxfidc.com.br"],
                &["NOVAX"],
            ),
            IssuerProfile::new(
                "CREDVALE",
                "CREDVALE FUNDO DE INVESTIMENTO EM DIREITOS CREDITORIOS MULTISSETORIAL",
                "",
                &["adm@jotajota.net.br", "nichole@credvalefidc.com.br"],
                &["CREDVALE", "CREDIT VALLEY"],
            ),
            IssuerProfile::new(
                "SQUID",
                "SQUID FUNDO DE INVESTIMENTO EM DIREITOS CREDITORIOS",
                "",
                &["adm@jotajota.net.br"],
                &["SQUID"],
            ),
        ])
    }
}

impl IssuerTable {
    /// Find a profile by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&IssuerProfile> {
        let name = name.trim();
        self.0.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Iterate profiles in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &IssuerProfile> {
        self.0.iter()
    }
}

/// Customizable fragments of the outbound email body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailLayout {
    /// Fixed greeting; chosen by time of day when absent.
    pub greeting: Option<String>,

    /// Line before the recipient name.
    pub introduction: String,

    /// Closing paragraph.
    pub closing: String,

    /// Signature name.
    pub signature: String,

    /// Content id of an inline signature image.
    pub signature_image_cid: Option<String>,
}

impl Default for EmailLayout {
    fn default() -> Self {
        Self {
            greeting: None,
            introduction: "Prezado cliente,".to_string(),
            closing: "Em caso de duvidas, nossa equipe permanece a disposicao para esclarecimentos."
                .to_string(),
            signature: "Equipe de Cobranca".to_string(),
            signature_image_cid: None,
        }
    }
}

impl BoletoConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| BoletoError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| BoletoError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_issuer_order() {
        let table = IssuerTable::default();
        let names: Vec<&str> = table.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["CAPITAL", "NOVAX", "CREDVALE", "SQUID"]);
        assert_eq!(table.get(" novax ").map(|p| p.cc_emails.len()), Some(2));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: BoletoConfig =
            serde_json::from_str(r#"{"validation": {"min_name_similarity": 0.9}}"#).unwrap();
        assert_eq!(config.validation.min_name_similarity, 0.9);
        assert_eq!(config.validation.value_tolerance_cents, 0);
        assert_eq!(config.issuers.0.len(), 4);
        assert!(config.extraction.detect_issuer);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = BoletoConfig::default();
        config.extraction.default_issuer = Some("SQUID".to_string());
        config.save(&path).unwrap();

        let loaded = BoletoConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.default_issuer.as_deref(), Some("SQUID"));
        assert_eq!(loaded.email, EmailLayout::default());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = BoletoConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, BoletoError::Config(_)));
    }
}
