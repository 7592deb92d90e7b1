use std::io::Write;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::Transaction;

const HEADER: [&str; 5] = [
    "date",
    "description",
    "amount",
    "running_balance",
    "source_section",
];

#[derive(Debug, Serialize)]
struct Row<'a> {
    date: NaiveDate,
    description: &'a str,
    amount: String,
    running_balance: String,
    source_section: &'static str,
}

impl<'a> From<&'a Transaction> for Row<'a> {
    fn from(transaction: &'a Transaction) -> Self {
        Self {
            date: transaction.date,
            description: &transaction.description,
            amount: signed_amount(transaction.amount),
            running_balance: transaction
                .running_balance
                .map(|balance| format!("{:.2}", balance.round_dp(2)))
                .unwrap_or_default(),
            source_section: transaction.source_section.as_str(),
        }
    }
}

/// Two decimals, always with a sign
///
/// Zero has no direction and is always written `+0.00`, whatever section it was listed under.
fn signed_amount(amount: Decimal) -> String {
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        '-'
    } else {
        '+'
    };
    format!("{sign}{:.2}", amount.abs().round_dp(2))
}

/// Writes the CSV header and one row per transaction to `sink`
///
/// The header is written even when there are no transactions. `sink` is flushed but not closed.
/// Every amount carries a sign, and zero is always written `+0.00`.
pub fn emit<W: Write>(transactions: &[Transaction], sink: W) -> csv::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(sink);
    writer.write_record(HEADER)?;
    for transaction in transactions {
        writer.serialize(Row::from(transaction))?;
    }
    writer.flush()?;
    Ok(())
}
