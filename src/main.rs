#![warn(clippy::unwrap_used)]
#![doc = include_str!("../README.md")]

mod emitter;
mod error;
mod extractor;
mod logging;
mod model;
mod registry;
mod source;

use std::io;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use tracing::info;

/// Converts a bank or credit card PDF statement to CSV, written to standard output
///
/// The statement layout is picked from the file name: YYYY-MM-DD-statements-NNNN.pdf (Chase
/// credit card), YYYYMMDD-statements-NNNN-.pdf (Chase checking), YYYY-MM-DD-savings-NNNN.pdf
/// (Chase savings) or "Statement_Mon YYYY.pdf" (American Express).
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// A PDF statement, named the way the bank names downloaded statements
    input: PathBuf,
    /// Prints the raw lines found in the PDF to standard error
    #[arg(long)]
    print_lines: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    logging::setup_logging();

    let Args { input, print_lines } = Args::parse();

    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let statement = registry::lookup(&file_name)?;
    info!(
        variant = statement.variant.name(),
        period = %statement.metadata,
        "reading {input:?}"
    );

    let text = source::read_text(&input)?;
    let transactions = statement.variant.extract(
        text.lines().inspect(|line| {
            if print_lines {
                eprintln!("{line}");
            }
        }),
        &statement.metadata,
    )?;

    let total = model::net_total(&transactions)
        .ok_or_else(|| eyre!("Net total of the statement does not fit a decimal"))?;
    info!(
        account = statement.metadata.account.as_deref().unwrap_or("unknown"),
        period = %statement.metadata,
        transactions = transactions.len(),
        %total,
        "extracted statement"
    );

    emitter::emit(&transactions, io::stdout().lock())
        .context("Could not write CSV to standard output")
}
