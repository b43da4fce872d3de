use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

const NFE_XML: &str = r#"<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe">
  <NFe><infNFe Id="NFe43260112345678000190550010003108651000000001">
    <ide><nNF>000310865</nNF></ide>
    <dest>
      <CNPJ>98765432000110</CNPJ>
      <xNome>AREAIS DO LESTE COMERCIO LTDA</xNome>
      <email>financeiro@areais.com.br</email>
    </dest>
    <total><ICMSTot><vNF>2833.34</vNF></ICMSTot></total>
  </infNFe></NFe>
</nfeProc>"#;

fn boleto() -> Command {
    Command::cargo_bin("boleto").unwrap()
}

#[test]
fn test_help_lists_commands() {
    boleto()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("nfe"))
        .stdout(predicate::str::contains("process"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_nfe_prints_invoice_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("310865.xml");
    fs::write(&path, NFE_XML).unwrap();

    boleto()
        .arg("nfe")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""invoice_number": "310865""#))
        .stdout(predicate::str::contains("financeiro@areais.com.br"));
}

#[test]
fn test_nfe_strict_fails_on_malformed_xml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.xml");
    fs::write(&path, "<nfeProc><NFe>").unwrap();

    boleto()
        .arg("nfe")
        .arg(&path)
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid NFe"));
}

#[test]
fn test_extract_missing_file() {
    boleto()
        .args(["extract", "/nonexistent/boleto.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_process_without_slips_fails() {
    let dir = tempfile::tempdir().unwrap();

    boleto()
        .arg("process")
        .arg(dir.path())
        .arg("--invoices")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No slip PDFs found"));
}

#[test]
fn test_config_init_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    let config = config.to_str().unwrap();

    boleto()
        .args(["--config", config, "config", "init"])
        .assert()
        .success();

    boleto()
        .args(["--config", config, "config", "get", "validation.min_name_similarity"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.85"));

    boleto()
        .args(["--config", config, "config", "set", "validation.value_tolerance_cents", "5"])
        .assert()
        .success();

    boleto()
        .args(["--config", config, "config", "get", "validation.value_tolerance_cents"])
        .assert()
        .success()
        .stdout(predicate::str::diff("5\n"));

    boleto()
        .args(["--config", config, "config", "set", "validation.value_tolerance_cents", "muitos"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value"));

    boleto()
        .args(["--config", config, "config", "get", "issuers.1.name"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NOVAX"));
}

#[test]
fn test_partial_config_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"extraction": {"default_issuer": "ACME"}}"#).unwrap();

    let config = config.to_str().unwrap();
    boleto()
        .args(["--config", config, "config", "get", "extraction.default_issuer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ACME"));

    boleto()
        .args(["--config", config, "config", "get", "email.signature"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Equipe de Cobranca"));
}
