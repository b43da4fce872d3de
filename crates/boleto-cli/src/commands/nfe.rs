//! NFe command - parse a single invoice XML.

use std::path::PathBuf;

use clap::Args;
use console::style;

use boleto_core::nfe::parse_file;
use boleto_core::InvoiceData;

/// Arguments for the nfe command.
#[derive(Args)]
pub struct NfeArgs {
    /// Input NFe XML file (a PDF yields an empty companion record)
    #[arg(required = true)]
    input: PathBuf,

    /// Exit with an error when the document is invalid
    #[arg(long)]
    strict: bool,
}

pub async fn run(args: NfeArgs) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let invoice = read_invoice(&args.input);
    println!("{}", serde_json::to_string_pretty(&invoice)?);

    if !invoice.valid {
        let reason = invoice.error.as_deref().unwrap_or("unknown error");
        if args.strict {
            anyhow::bail!("Invalid NFe {}: {}", args.input.display(), reason);
        }
        eprintln!("{} {}", style("⚠").yellow(), reason);
    }

    Ok(())
}

/// Parse an XML invoice, or build the companion record for a PDF invoice.
pub fn read_invoice(path: &std::path::Path) -> InvoiceData {
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        InvoiceData::pdf_companion(name)
    } else {
        parse_file(path)
    }
}
