//! Command-line interface for building and checking SVK deliveries.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use erms_create::{OutputEncoding, SerializeOptions};

use crate::document::{NewCase, SimpleCase, SvkErms};
use crate::error::{Result, SvkError};
use crate::manifest::Manifest;
use crate::validation::{validate_document, ValidationReport};
use crate::xml::read_xml_file;

/// ERMS SVK - Build ERMS case-file deliveries for the Church of Sweden.
#[derive(Parser)]
#[command(name = "erms-svk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build an ERMS document from a YAML manifest.
    Build {
        /// Manifest describing control information, cases and documents
        manifest: PathBuf,

        /// Output XML file
        #[arg(short, long)]
        output: PathBuf,

        /// Save even if the document fails SVK validation
        #[arg(long)]
        no_validate: bool,

        /// Write without indentation
        #[arg(long)]
        compact: bool,

        /// Output encoding: UTF-8 or ISO-8859-1
        #[arg(long, default_value = "UTF-8")]
        encoding: OutputEncoding,
    },

    /// Build a document holding a single closed case.
    SimpleCase {
        /// Case number (e.g., F 2024-0001)
        #[arg(long)]
        case_number: String,

        /// Case title
        #[arg(long)]
        title: String,

        /// Name of the archive creator
        #[arg(long)]
        archive_creator: String,

        /// Organisation number, 10 digits
        #[arg(long)]
        org_number: Option<String>,

        /// Archive creator id, when there is no organisation number
        #[arg(long)]
        aid: Option<String>,

        /// Opened date (default: today)
        #[arg(long)]
        opened: Option<String>,

        /// Closed date (default: today)
        #[arg(long)]
        closed: Option<String>,

        /// Case creator
        #[arg(long)]
        creator: Option<String>,

        /// Responsible person
        #[arg(long)]
        responsible_person: Option<String>,

        /// Output XML file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Check an ERMS document against the SVK rules.
    Validate {
        /// ERMS XML file
        file: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            manifest,
            output,
            no_validate,
            compact,
            encoding,
        } => build_command(
            &manifest,
            &output,
            !no_validate,
            serialize_options(compact, encoding),
        ),
        Commands::SimpleCase {
            case_number,
            title,
            archive_creator,
            org_number,
            aid,
            opened,
            closed,
            creator,
            responsible_person,
            output,
        } => {
            let case = NewCase::new(&case_number, &title).with_archive_creator(
                &archive_creator,
                org_number.as_deref(),
                aid.as_deref(),
            );
            let simple = SimpleCase {
                opened,
                closed,
                creator,
                responsible_person,
                ..SimpleCase::new(case)
            };
            simple_case_command(&simple, &output)
        }
        Commands::Validate { file, json } => validate_command(&file, json),
    }
}

fn serialize_options(compact: bool, encoding: OutputEncoding) -> SerializeOptions {
    SerializeOptions::default()
        .with_pretty_print(!compact)
        .with_encoding(encoding)
}

/// Execute the build command.
fn build_command(
    manifest_path: &Path,
    output: &Path,
    validate: bool,
    options: SerializeOptions,
) -> Result<()> {
    println!(
        "{} {}",
        style("Building").bold(),
        style(manifest_path.display()).cyan()
    );

    let manifest = Manifest::load(manifest_path)?;
    let document = manifest.build()?;
    let stats = document.statistics();
    println!("  Cases: {}", stats.aggregations);
    println!("  Documents: {}", stats.records);

    if validate {
        let report = document.save_with_validation(output, &options)?;
        if report.warning_count > 0 {
            println!("  Warnings: {}", style(report.warning_count).yellow().bold());
            for warning in &report.warnings {
                println!("    {warning}");
            }
        }
    } else {
        document.save_to_file(output, &options)?;
    }

    println!();
    println!("{} {}", style("Saved to:").green().bold(), output.display());
    Ok(())
}

/// Execute the simple-case command.
fn simple_case_command(case: &SimpleCase, output: &Path) -> Result<()> {
    let mut document = SvkErms::new()?;
    document.create_simple_case(case)?;
    document.save_with_validation(output, &SerializeOptions::default())?;

    println!(
        "{} {}",
        style("Created case").bold(),
        style(&case.case.case_number).cyan()
    );
    println!("{} {}", style("Saved to:").green().bold(), output.display());
    Ok(())
}

/// Execute the validate command.
fn validate_command(path: &Path, json: bool) -> Result<()> {
    let xml = read_xml_file(path)?;
    let report = validate_document(&xml);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(path, &report);
    }

    if report.valid {
        Ok(())
    } else {
        Err(SvkError::ValidationFailed {
            errors: report.errors,
        })
    }
}

fn print_report(path: &Path, report: &ValidationReport) {
    if report.valid {
        println!("{} {}", style("Valid:").green().bold(), path.display());
    } else {
        println!("{} {}", style("Invalid:").red().bold(), path.display());
    }
    for error in &report.errors {
        println!("  {} {error}", style("error:").red());
    }
    for warning in &report.warnings {
        println!("  {} {warning}", style("warning:").yellow());
    }
    println!(
        "{} error(s), {} warning(s)",
        style(report.error_count).bold(),
        style(report.warning_count).bold()
    );
}
