use std::error::Error as StdError;
use std::path::PathBuf;

use rust_decimal::Decimal;
use thiserror::Error;

/// Everything that stops a statement from being exported
///
/// None of these are recovered from: a statement is either exported in full or not at all.
#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "File name '{file_name}' does not match any known statement naming convention, \
         see --help for the supported ones"
    )]
    UnrecognizedFormat { file_name: String },

    #[error("{variant} statement, line {line_number}: {reason} in '{line}'")]
    MalformedTransactionLine {
        variant: &'static str,
        line_number: usize,
        line: String,
        reason: String,
    },

    #[error(
        "{variant} statement, line {line_number}: running balance should be {expected} \
         but the statement shows {actual}"
    )]
    BalanceMismatch {
        variant: &'static str,
        line_number: usize,
        expected: Decimal,
        actual: Decimal,
    },

    #[error("Could not extract text from {path:?}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}
