//! Chase checking account statements
//!
//! Activity is split in sections listing unsigned amounts, whose sign depends on the section:
//!
//! ```text
//! DEPOSITS AND ADDITIONS
//! DATE DESCRIPTION AMOUNT
//! 01/03 Payroll ACME INC PPD ID: 123456 1,500.00
//! Total Deposits and Additions $1,500.00
//! CHECKS PAID
//! CHECK NO. DESCRIPTION DATE PAID AMOUNT
//! 1042 ^ 01/09 125.00
//! Total Checks Paid $125.00
//! ```

use std::sync::LazyLock;

use super::{page_noise, pattern, Layout, RowPattern, SectionRule, SignRule};
use crate::model::Section;

pub(super) static LAYOUT: LazyLock<Layout> = LazyLock::new(|| Layout {
    name: "checking",
    sections: vec![
        SectionRule::new("DEPOSITS AND ADDITIONS", Section::Deposits, SignRule::Credit),
        SectionRule::new("CHECKS PAID", Section::ChecksPaid, SignRule::Debit).with_row(
            RowPattern::check(
                r"^(?P<check>\d+)\s+(?:\^\s+)?(?:(?P<description>.+?)\s+)?(?P<month>\d{2})/(?P<day>\d{2})\s+(?P<amount>\$?[\d,]*\.\d{2})$",
            ),
        ),
        SectionRule::new("CARD PURCHASES", Section::CardPurchases, SignRule::Debit),
        SectionRule::new(
            "ATM & DEBIT CARD WITHDRAWALS",
            Section::AtmAndDebitCardWithdrawals,
            SignRule::Debit,
        ),
        SectionRule::new(
            "ELECTRONIC WITHDRAWALS",
            Section::ElectronicWithdrawals,
            SignRule::Debit,
        ),
        SectionRule::new("OTHER WITHDRAWALS", Section::OtherWithdrawals, SignRule::Debit),
        SectionRule::new("FEES", Section::Fees, SignRule::Debit),
    ],
    row: RowPattern::text(
        r"^(?P<month>\d{2})/(?P<day>\d{2})\s+(?P<description>.+?)\s+(?P<amount>\$?[\d,]*\.\d{2})$",
    ),
    terminator: pattern(r"(?i)^total\b.*\d\.\d{2}$"),
    noise: page_noise()
        .into_iter()
        .chain([
            pattern(r"(?i)^date\s+description\s+amount$"),
            pattern(r"(?i)^check\s+no\.?\s+description"),
        ])
        .collect(),
    opening_balance: None,
    closing_balance: None,
    account: Some(pattern(r"(?i)^account\s+number:\s*(?P<account>[\dX\s]+)$")),
});
