//! American Express statements
//!
//! Transactions carry a full date, and amounts are printed with a dollar sign. The merchant's
//! location or phone number often wraps onto the next line:
//!
//! ```text
//! New Charges
//! 01/05/18 AMAZON MARKETPLACE AMZN.COM/BILL WA $25.99
//! AMZN.COM/BILL
//! 01/07/18* LYFT *RIDE SUN 4PM SAN FRANCISCO CA $14.20
//! Total New Charges $40.19
//! ```

use std::sync::LazyLock;

use super::{page_noise, pattern, Layout, RowPattern, SectionRule, SignRule};
use crate::model::Section;

pub(super) static LAYOUT: LazyLock<Layout> = LazyLock::new(|| Layout {
    name: "amex",
    sections: vec![
        SectionRule::new("Payments", Section::Payments, SignRule::Credit),
        SectionRule::new("Credits", Section::Credits, SignRule::Credit),
        SectionRule::new("New Charges", Section::NewCharges, SignRule::Debit),
        SectionRule::new("Fees", Section::Fees, SignRule::Debit),
        SectionRule::new("Interest Charged", Section::Interest, SignRule::Debit),
    ],
    row: RowPattern::text(
        r"^(?P<month>\d{2})/(?P<day>\d{2})/(?P<year>\d{2})\*?\s+(?P<description>.+?)\s+(?P<amount>-?\$-?[\d,]*\.\d{2})$",
    ),
    terminator: pattern(r"(?i)^total\b.*\d\.\d{2}$"),
    noise: page_noise()
        .into_iter()
        .chain([
            pattern(r"(?i)^amount$"),
            pattern(r"(?i)^card\s+member\b"),
            pattern(r"(?i)^continued\s+on\s+(?:next\s+page|reverse)$"),
        ])
        .collect(),
    opening_balance: None,
    closing_balance: None,
    account: Some(pattern(r"(?i)^account\s+ending\s+(?P<account>[\d-]+)$")),
});
