//! Process command - validate a batch of slips against their invoices.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use boleto_core::pdf::{PdfExtractor, PdfProcessor};
use boleto_core::rename::numbered_name;
use boleto_core::{
    ApprovedSlip, BoletoConfig, EmailGroup, EmailGrouper, InvoiceData, InvoiceIndex,
    IssuerProfile, ProcessedSlip, SlipProcessor,
};

use super::load_config;
use super::nfe::read_invoice;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Slip PDFs (file, directory or glob pattern)
    #[arg(required = true)]
    slips: String,

    /// Directory holding the NFe XML files and invoice PDFs
    #[arg(short = 'n', long)]
    invoices: PathBuf,

    /// Issuer strategy for every slip; detected per slip when omitted
    #[arg(short, long)]
    issuer: Option<String>,

    /// Output directory for per-slip JSON results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Rename approved slip files in place
    #[arg(long)]
    rename: bool,

    /// Write email groups for approved slips to this JSON file
    #[arg(long)]
    emails: Option<PathBuf>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    processed: Option<ProcessedSlip>,
    /// Name the slip was given on disk, when renamed.
    renamed_on_disk: Option<String>,
    error: Option<String>,
}

#[derive(Serialize)]
struct BatchTotals {
    total: usize,
    approved: usize,
    rejected: usize,
    failed: usize,
    success_rate: f64,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files = slip_files(&args.slips)?;
    if files.is_empty() {
        anyhow::bail!("No slip PDFs found for: {}", args.slips);
    }

    if !args.invoices.is_dir() {
        anyhow::bail!("Invoice directory not found: {}", args.invoices.display());
    }
    let (index, invoices) = load_invoices(&args.invoices)?;

    println!(
        "{} Found {} slips and {} invoices",
        style("ℹ").blue(),
        files.len(),
        invoices.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let mut processor = SlipProcessor::from_config(&config);
    if let Some(issuer) = &args.issuer {
        processor = processor.with_issuer(issuer.clone());
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} slips")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());
    for path in files {
        match process_file(&path, &processor, &index) {
            Ok(processed) => {
                let renamed_on_disk = if args.rename && processed.approved() {
                    rename_in_place(&path, &processed.renamed)
                } else {
                    None
                };
                results.push(FileResult {
                    path,
                    processed: Some(processed),
                    renamed_on_disk,
                    error: None,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(FileResult {
                        path,
                        processed: None,
                        renamed_on_disk: None,
                        error: Some(error_msg),
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    if let Some(ref output_dir) = args.output_dir {
        for result in &results {
            if let Some(processed) = &result.processed {
                let stem = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("slip");
                let output_path = output_dir.join(format!("{}.json", stem));
                fs::write(&output_path, serde_json::to_string_pretty(processed)?)?;
                debug!("Wrote result to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    if let Some(ref emails_path) = args.emails {
        let groups = email_groups(&results, &invoices, &index, &config, &args.invoices);
        fs::write(emails_path, serde_json::to_string_pretty(&groups)?)?;
        println!(
            "{} {} email group(s) written to {}",
            style("✓").green(),
            groups.len(),
            emails_path.display()
        );
    }

    let totals = totals(&results);
    if let Some(ref output_dir) = args.output_dir {
        fs::write(output_dir.join("totals.json"), serde_json::to_string_pretty(&totals)?)?;
    }

    println!();
    println!(
        "{} Processed {} slips in {:?}",
        style("✓").green(),
        totals.total,
        start.elapsed()
    );
    println!(
        "   {} approved, {} rejected, {} failed ({:.1}% approved)",
        style(totals.approved).green(),
        style(totals.rejected).red(),
        style(totals.failed).yellow(),
        totals.success_rate
    );

    let rejected: Vec<_> = results
        .iter()
        .filter_map(|r| r.processed.as_ref().map(|p| (&r.path, p)))
        .filter(|(_, p)| !p.approved())
        .collect();
    if !rejected.is_empty() {
        println!();
        println!("{}", style("Rejected slips:").red());
        for (path, processed) in rejected {
            println!(
                "  - {}: {}",
                path.display(),
                processed.validation.rejection_reason.as_deref().unwrap_or("")
            );
        }
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Slip PDFs named by a file, a directory or a glob pattern, sorted.
fn slip_files(input: &str) -> anyhow::Result<Vec<PathBuf>> {
    let path = Path::new(input);
    let pattern = if path.is_dir() {
        path.join("*").to_string_lossy().into_owned()
    } else {
        input.to_string()
    };

    let mut files: Vec<PathBuf> = glob(&pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file() && has_extension(p, "pdf"))
        .collect();
    files.sort();
    Ok(files)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Read every invoice in a directory.
///
/// PDF companions are indexed before XML files so a parsed XML always
/// wins when both exist for the same number.
fn load_invoices(dir: &Path) -> anyhow::Result<(InvoiceIndex, Vec<InvoiceData>)> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && (has_extension(p, "xml") || has_extension(p, "pdf")))
        .collect();
    paths.sort();

    let invoices: Vec<InvoiceData> = paths.iter().map(|p| read_invoice(p)).collect();

    let mut index = InvoiceIndex::new();
    for invoice in invoices.iter().filter(|i| i.is_pdf()) {
        index.insert(invoice.clone());
    }
    for invoice in invoices.iter().filter(|i| !i.is_pdf()) {
        index.insert(invoice.clone());
    }

    info!("Indexed {} invoice numbers from {}", index.len(), dir.display());
    Ok((index, invoices))
}

fn process_file(
    path: &Path,
    processor: &SlipProcessor,
    index: &InvoiceIndex,
) -> anyhow::Result<ProcessedSlip> {
    let extractor = PdfExtractor::open(path)?;
    let text = extractor.extract_text()?;
    if text.trim().is_empty() {
        anyhow::bail!("No text extracted from PDF");
    }

    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    Ok(processor.process(&text, file_name, index)?)
}

/// Rename a slip next to itself, numbering the name when another file
/// already holds it. Returns the name used on disk.
fn rename_in_place(path: &Path, new_name: &str) -> Option<String> {
    let parent = path.parent()?;
    let mut name = new_name.to_string();
    let mut n = 1;

    loop {
        let target = parent.join(&name);
        if target == path {
            return Some(name);
        }
        if !target.exists() {
            break;
        }
        n += 1;
        name = numbered_name(new_name, n);
    }

    if n > 1 {
        warn!("{} already exists, using {}", new_name, name);
    }

    let target = parent.join(&name);
    match fs::rename(path, &target) {
        Ok(()) => {
            debug!("Renamed {} -> {}", path.display(), target.display());
            Some(name)
        }
        Err(e) => {
            warn!("Could not rename {}: {}", path.display(), e);
            None
        }
    }
}

/// One group list per issuer, since each issuer has its own cc and wording.
fn email_groups(
    results: &[FileResult],
    invoices: &[InvoiceData],
    index: &InvoiceIndex,
    config: &BoletoConfig,
    invoice_dir: &Path,
) -> Vec<EmailGroup> {
    let mut by_issuer: BTreeMap<&str, Vec<ApprovedSlip<'_>>> = BTreeMap::new();

    for result in results {
        let Some(processed) = result.processed.as_ref().filter(|p| p.approved()) else {
            continue;
        };
        by_issuer
            .entry(processed.slip.issuer.as_str())
            .or_default()
            .push(ApprovedSlip {
                id: &processed.source,
                slip: &processed.slip,
                invoice: index.find_for(&processed.slip),
                file_path: Some(result.path.as_path()),
                renamed: result.renamed_on_disk.as_deref(),
            });
    }

    let mut groups = Vec::new();
    for (issuer, slips) in by_issuer {
        let fallback;
        let profile = match config.issuers.get(issuer) {
            Some(profile) => profile,
            None => {
                warn!("No issuer profile for {}, sending without cc", issuer);
                fallback = IssuerProfile {
                    name: issuer.to_string(),
                    full_name: issuer.to_string(),
                    tax_id: String::new(),
                    cc_emails: Vec::new(),
                    keywords: Vec::new(),
                };
                &fallback
            }
        };

        let grouper = EmailGrouper::new(profile, &config.email, invoice_dir);
        groups.extend(grouper.group(&slips, invoices));
    }

    groups
}

fn totals(results: &[FileResult]) -> BatchTotals {
    let approved = results
        .iter()
        .filter(|r| r.processed.as_ref().is_some_and(|p| p.approved()))
        .count();
    let failed = results.iter().filter(|r| r.error.is_some()).count();
    let rejected = results.len() - approved - failed;
    let success_rate = if results.is_empty() {
        0.0
    } else {
        approved as f64 / results.len() as f64 * 100.0
    };

    BatchTotals {
        total: results.len(),
        approved,
        rejected,
        failed,
        success_rate,
    }
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "issuer",
        "payer",
        "tax_id",
        "invoice_number",
        "due_date",
        "amount",
        "rejection_reason",
        "surcharge",
        "renamed",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(processed) = &result.processed {
            let slip = &processed.slip;
            let status = if processed.approved() { "approved" } else { "rejected" };
            let surcharge = processed
                .validation
                .surcharge
                .as_ref()
                .map(|s| s.difference.to_string())
                .unwrap_or_default();

            wtr.write_record([
                filename,
                status,
                &slip.issuer,
                slip.payer.as_deref().unwrap_or(""),
                slip.tax_id.as_deref().unwrap_or(""),
                slip.invoice_number.as_deref().unwrap_or(""),
                slip.due_date.as_deref().unwrap_or(""),
                slip.amount_display().unwrap_or(""),
                processed.validation.rejection_reason.as_deref().unwrap_or(""),
                &surcharge,
                result.renamed_on_disk.as_deref().unwrap_or(&processed.renamed),
                &processed.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
