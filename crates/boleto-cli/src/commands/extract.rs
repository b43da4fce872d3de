//! Extract command - read the fields of a single slip PDF.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use boleto_core::pdf::{PdfExtractor, PdfProcessor};
use boleto_core::{generate_name, SlipData, SlipProcessor};

use super::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input slip PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Issuer strategy (CAPITAL, NOVAX, CREDVALE, SQUID); detected when omitted
    #[arg(short, long)]
    issuer: Option<String>,

    /// Extract from this page only (1-indexed)
    #[arg(short, long)]
    page: Option<u32>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let extension = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if extension != "pdf" {
        anyhow::bail!("Unsupported file format: {}", extension);
    }

    info!("Extracting slip: {}", args.input.display());

    let extractor = PdfExtractor::open(&args.input)?;
    let text = match args.page {
        Some(page) => extractor.extract_page_text(page)?,
        None => extractor.extract_text()?,
    };
    if text.trim().is_empty() {
        anyhow::bail!("No text extracted from PDF");
    }

    let mut processor = SlipProcessor::from_config(&config);
    if let Some(issuer) = &args.issuer {
        processor = processor.with_issuer(issuer.clone());
    }

    let file_name = args
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");
    let slip = processor.extract(&text, file_name)?;

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&slip)?,
        OutputFormat::Text => format_text(&slip),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

pub fn format_text(slip: &SlipData) -> String {
    let mut output = String::new();

    output.push_str(&format!("Issuer:  {}\n", slip.issuer));
    output.push_str(&format!("Payer:   {}\n", slip.payer.as_deref().unwrap_or("-")));
    output.push_str(&format!("CNPJ:    {}\n", slip.tax_id.as_deref().unwrap_or("-")));
    output.push_str(&format!("NF:      {}\n", slip.invoice_number.as_deref().unwrap_or("-")));
    output.push_str(&format!(
        "Due:     {}\n",
        slip.due_date_full
            .as_deref()
            .or(slip.due_date.as_deref())
            .unwrap_or("-")
    ));
    output.push_str(&format!("Amount:  {}\n", slip.amount_display().unwrap_or("-")));
    output.push_str(&format!("Renamed: {}\n", generate_name(slip)));

    if !slip.errors.is_empty() {
        output.push_str("\nMissing:\n");
        for error in &slip.errors {
            output.push_str(&format!("  - {}\n", error));
        }
    }

    output
}
