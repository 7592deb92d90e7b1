//! Picks the statement layout from the name of the statement file
//!
//! Banks name downloaded statements after the statement date, and usually the account too. The
//! name is the only place where the statement period is reliably available, so it is a
//! prerequisite: a file which was renamed cannot be read.

use std::sync::LazyLock;

use chrono::{Months, NaiveDate};
use regex::{Captures, Regex};

use crate::error::Error;
use crate::extractor::StatementVariant;
use crate::model::StatementMetadata;

/// A statement file whose layout and period are known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub variant: StatementVariant,
    pub metadata: StatementMetadata,
}

struct Registration {
    file_name: Regex,
    variant: StatementVariant,
    metadata: fn(&Captures<'_>) -> Option<StatementMetadata>,
}

/// Ordered, first match wins. The literal parts of the patterns keep them mutually exclusive.
static REGISTRY: LazyLock<Vec<Registration>> = LazyLock::new(|| {
    vec![
        Registration {
            file_name: Regex::new(
                r"^(?P<year>\d{4})-(?P<month>\d{2})-(?P<day>\d{2})-statements-(?P<account>\d{4})\.(?i:pdf)$",
            )
            .expect("regex"),
            variant: StatementVariant::CreditCard,
            metadata: closing_date_metadata,
        },
        Registration {
            file_name: Regex::new(
                r"^(?P<year>\d{4})(?P<month>\d{2})(?P<day>\d{2})-statements-(?P<account>\d{4})-\.(?i:pdf)$",
            )
            .expect("regex"),
            variant: StatementVariant::Checking,
            metadata: closing_date_metadata,
        },
        Registration {
            file_name: Regex::new(
                r"^(?P<year>\d{4})-(?P<month>\d{2})-(?P<day>\d{2})-savings-(?P<account>\d{4})\.(?i:pdf)$",
            )
            .expect("regex"),
            variant: StatementVariant::Savings,
            metadata: closing_date_metadata,
        },
        Registration {
            file_name: Regex::new(
                r"^Statement_(?P<month_name>[A-Za-z]{3}) (?P<year>\d{4})\.(?i:pdf)$",
            )
            .expect("regex"),
            variant: StatementVariant::Amex,
            metadata: closing_month_metadata,
        },
    ]
});

/// Finds the layout and the period of a statement from its file name (without directories)
pub fn lookup(file_name: &str) -> Result<Statement, Error> {
    REGISTRY
        .iter()
        .find_map(|registration| {
            let captures = registration.file_name.captures(file_name)?;
            let metadata = (registration.metadata)(&captures)?;
            Some(Statement {
                variant: registration.variant,
                metadata,
            })
        })
        .ok_or_else(|| Error::UnrecognizedFormat {
            file_name: file_name.to_owned(),
        })
}

/// The file name gives the closing date; statements cover the month up to it
fn closing_date_metadata(captures: &Captures<'_>) -> Option<StatementMetadata> {
    let end = NaiveDate::from_ymd_opt(
        captures["year"].parse().ok()?,
        captures["month"].parse().ok()?,
        captures["day"].parse().ok()?,
    )?;
    let start = end.checked_sub_months(Months::new(1))?.succ_opt()?;
    Some(StatementMetadata::new(
        Some(captures["account"].to_owned()),
        start,
        end,
    ))
}

/// The file name only gives the month the statement closes in, so the period spans that month
/// and the one before
fn closing_month_metadata(captures: &Captures<'_>) -> Option<StatementMetadata> {
    let first_of_month = NaiveDate::parse_from_str(
        &format!("01 {} {}", &captures["month_name"], &captures["year"]),
        "%d %b %Y",
    )
    .ok()?;
    let start = first_of_month.checked_sub_months(Months::new(1))?;
    let end = first_of_month.checked_add_months(Months::new(1))?.pred_opt()?;
    Some(StatementMetadata::new(None, start, end))
}
