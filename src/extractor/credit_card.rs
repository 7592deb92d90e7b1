//! Chase credit card statements
//!
//! The account activity lists the transaction date without a year, the merchant and the amount.
//! Payments are printed as negative amounts, everything else as positive ones:
//!
//! ```text
//! ACCOUNT ACTIVITY
//! Date of
//! Transaction Merchant Name or Transaction Description $ Amount
//! PAYMENTS AND OTHER CREDITS
//! 01/08 AUTOMATIC PAYMENT - THANK YOU -1,234.56
//! PURCHASE
//! 12/30 AMAZON MKTPLACE PMTS AMZN.COM/BILL WA 25.99
//! ```

use std::sync::LazyLock;

use super::{page_noise, pattern, Layout, RowPattern, SectionRule, SignRule};
use crate::model::Section;

pub(super) static LAYOUT: LazyLock<Layout> = LazyLock::new(|| Layout {
    name: "credit card",
    sections: vec![
        SectionRule::new(
            "PAYMENTS AND OTHER CREDITS",
            Section::Payments,
            SignRule::Credit,
        ),
        SectionRule::new("PURCHASE", Section::Purchases, SignRule::Debit),
        SectionRule::new("PURCHASES", Section::Purchases, SignRule::Debit),
        SectionRule::new("CASH ADVANCES", Section::CashAdvances, SignRule::Debit),
        SectionRule::new("BALANCE TRANSFERS", Section::BalanceTransfers, SignRule::Debit),
        SectionRule::new("FEES CHARGED", Section::Fees, SignRule::Debit),
        SectionRule::new("INTEREST CHARGED", Section::Interest, SignRule::Debit),
    ],
    row: RowPattern::text(
        r"^(?P<month>\d{2})/(?P<day>\d{2})\s+(?P<description>.+?)\s+(?P<amount>-?\$?-?[\d,]*\.\d{2})$",
    ),
    terminator: pattern(r"(?i)^(?:total\b.*\d\.\d{2}|\d{4}\s+totals\s+year-to-date)$"),
    noise: page_noise()
        .into_iter()
        .chain([
            pattern(r"(?i)^account\s+activity(?:\s*\(continued\))?$"),
            pattern(r"(?i)^date\s+of$"),
            pattern(r"(?i)^(?:date\s+of\s+)?transaction\s+merchant\s+name"),
        ])
        .collect(),
    opening_balance: None,
    closing_balance: None,
    account: Some(pattern(r"(?i)^account\s+number:\s*(?P<account>[\dX\s]+)$")),
});

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::error::Error;
    use crate::extractor::test::helpers::*;
    use crate::extractor::StatementVariant;
    use crate::model::Section;

    #[test]
    fn should_parse_activity_across_the_new_year() {
        let transactions = StatementVariant::CreditCard
            .extract(
                [
                    "Manage your account online at:",
                    "Account Number: XXXX XXXX XXXX 1234",
                    "Opening/Closing Date 12/29/17 - 01/28/18",
                    "ACCOUNT ACTIVITY",
                    "Date of",
                    "Transaction Merchant Name or Transaction Description $ Amount",
                    "PAYMENTS AND OTHER CREDITS",
                    "01/08 AUTOMATIC PAYMENT - THANK YOU -1,234.56",
                    "PURCHASE",
                    "12/30 AMAZON MKTPLACE PMTS AMZN.COM/BILL WA 25.99",
                    "01/02 UBER TRIP HELP.UBER.COM CA $14.20",
                    "LYFT RIDE",
                    "Page 2 of 3",
                    "ACCOUNT ACTIVITY (CONTINUED)",
                    "01/27 GROCERY STORE .99",
                    "FEES CHARGED",
                    "TOTAL FEES FOR THIS PERIOD $0.00",
                    "INTEREST CHARGED",
                    "01/28 PURCHASE INTEREST CHARGE 3.12",
                    "TOTAL INTEREST FOR THIS PERIOD $3.12",
                    "2018 Totals Year-to-Date",
                ],
                &metadata(date(2017, 12, 29), date(2018, 1, 28)),
            )
            .expect("transactions");
        assert_eq!(
            vec![
                transaction(
                    date(2018, 1, 8),
                    "AUTOMATIC PAYMENT - THANK YOU",
                    dec!(1_234.56),
                    Section::Payments
                ),
                transaction(
                    date(2017, 12, 30),
                    "AMAZON MKTPLACE PMTS AMZN.COM/BILL WA",
                    dec!(-25.99),
                    Section::Purchases
                ),
                transaction(
                    date(2018, 1, 2),
                    "UBER TRIP HELP.UBER.COM CA LYFT RIDE",
                    dec!(-14.20),
                    Section::Purchases
                ),
                transaction(
                    date(2018, 1, 27),
                    "GROCERY STORE",
                    dec!(-0.99),
                    Section::Purchases
                ),
                transaction(
                    date(2018, 1, 28),
                    "PURCHASE INTEREST CHARGE",
                    dec!(-3.12),
                    Section::Interest
                ),
            ],
            transactions
        );
    }

    #[test]
    fn should_extract_nothing_from_headers_and_totals() {
        let transactions = StatementVariant::CreditCard
            .extract(
                [
                    "ACCOUNT ACTIVITY",
                    "PAYMENTS AND OTHER CREDITS",
                    "PURCHASES",
                    "FEES CHARGED",
                    "TOTAL FEES FOR THIS PERIOD $0.00",
                    "INTEREST CHARGED",
                    "TOTAL INTEREST FOR THIS PERIOD $0.00",
                ],
                &january_2018(),
            )
            .expect("transactions");
        assert!(transactions.is_empty());
    }

    #[test]
    fn should_end_sections_on_subtotals_only() {
        let transactions = StatementVariant::CreditCard
            .extract(
                [
                    "PURCHASE",
                    "01/05 CHARGE ONE SEATTLE WA 1.00",
                    "TOTAL WINE & MORE",
                    "01/06 CHARGE TWO SEATTLE WA 2.00",
                    "2018 Totals Year-to-Date",
                    "01/07 NOT IN A SECTION 9.00",
                ],
                &january_2018(),
            )
            .expect("transactions");
        assert_eq!(
            vec![
                transaction(
                    date(2018, 1, 5),
                    "CHARGE ONE SEATTLE WA TOTAL WINE & MORE",
                    dec!(-1.00),
                    Section::Purchases
                ),
                transaction(
                    date(2018, 1, 6),
                    "CHARGE TWO SEATTLE WA",
                    dec!(-2.00),
                    Section::Purchases
                ),
            ],
            transactions
        );
    }

    #[test]
    fn should_reject_dated_lines_which_are_not_rows() {
        let result = StatementVariant::CreditCard.extract(
            ["PURCHASE", "01/02 UBER TRIP HELP.UBER.COM CA 14.20", "01/03 UBER TRIP 14.2"],
            &january_2018(),
        );
        assert!(matches!(
            result,
            Err(Error::MalformedTransactionLine { line_number: 3, .. })
        ));
    }
}
